//! In-process replacement for the key-value cache the original deployment
//! kept in memcache: a byte-bounded LRU of bincode-serialized values with
//! explicit invalidation.

use sea_orm::prelude::Uuid;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

struct SerializedLruCache<K> {
    cache: lru::LruCache<K, Vec<u8>>,
    max_size: usize,
    curr_size: usize,
}

impl<K> SerializedLruCache<K>
where
    K: std::hash::Hash + Eq + Clone,
{
    fn new(max_size: usize) -> Self {
        Self {
            cache: lru::LruCache::unbounded(),
            max_size,
            curr_size: 0,
        }
    }

    fn get<V>(&mut self, key: &K) -> anyhow::Result<Option<V>>
    where
        V: DeserializeOwned,
    {
        self.cache
            .get(key)
            .map(|data| bincode::deserialize(data).map_err(anyhow::Error::new))
            .transpose()
    }

    fn insert<V>(&mut self, key: K, value: &V) -> anyhow::Result<bool>
    where
        V: serde::Serialize,
    {
        let data = bincode::serialize(value)?;

        if let Some(entry) = self.cache.pop(&key) {
            self.curr_size -= entry.len();
        }

        if data.len() > self.max_size {
            return Ok(false);
        }

        while data.len() > (self.max_size - self.curr_size) {
            let popped = self.cache.pop_lru();
            self.curr_size -= popped.unwrap().1.len();
        }

        self.curr_size += data.len();
        self.cache.put(key, data);

        Ok(true)
    }

    fn remove(&mut self, key: &K) {
        if let Some(entry) = self.cache.pop(key) {
            self.curr_size -= entry.len();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Announcement,
    FeaturedSpeaker(Uuid),
}

pub struct CacheManager {
    cache: RwLock<SerializedLruCache<CacheKey>>,
}

impl CacheManager {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: RwLock::new(SerializedLruCache::new(max_size)),
        }
    }

    pub async fn announcement(&self) -> Option<String> {
        self.get_string(&CacheKey::Announcement).await
    }

    pub async fn set_announcement(&self, text: &str) {
        self.set_string(CacheKey::Announcement, text).await;
    }

    pub async fn clear_announcement(&self) {
        self.cache.write().await.remove(&CacheKey::Announcement);
    }

    pub async fn featured_speaker(&self, conference_id: Uuid) -> Option<String> {
        self.get_string(&CacheKey::FeaturedSpeaker(conference_id)).await
    }

    pub async fn set_featured_speaker(&self, conference_id: Uuid, note: &str) {
        self.set_string(CacheKey::FeaturedSpeaker(conference_id), note).await;
    }

    async fn get_string(&self, key: &CacheKey) -> Option<String> {
        let mut cache = self.cache.write().await;
        match cache.get::<String>(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Dropping undecodable cache entry: {}", e);
                cache.remove(key);
                None
            }
        }
    }

    async fn set_string(&self, key: CacheKey, value: &str) {
        let mut cache = self.cache.write().await;
        if let Err(e) = cache.insert(key, &value.to_string()) {
            tracing::warn!("Failed to cache value: {}", e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{CacheKey, CacheManager, SerializedLruCache};
    use sea_orm::prelude::Uuid;

    #[tokio::test]
    async fn test_announcement_round_trip() {
        let manager = CacheManager::new(1024);
        assert_eq!(manager.announcement().await, None);
        manager.set_announcement("nearly sold out").await;
        assert_eq!(
            manager.announcement().await,
            Some("nearly sold out".to_string())
        );
        manager.clear_announcement().await;
        assert_eq!(manager.announcement().await, None);
    }

    #[tokio::test]
    async fn test_featured_speaker_entries_are_per_conference() {
        let manager = CacheManager::new(1024);
        manager
            .set_featured_speaker(Uuid::from_u128(1), "Ada Lovelace")
            .await;
        assert_eq!(
            manager.featured_speaker(Uuid::from_u128(1)).await,
            Some("Ada Lovelace".to_string())
        );
        assert_eq!(manager.featured_speaker(Uuid::from_u128(2)).await, None);
    }

    #[test]
    fn test_oversized_values_are_not_cached() {
        let mut cache = SerializedLruCache::new(16);
        let big = "x".repeat(64);
        assert!(!cache.insert(CacheKey::Announcement, &big).unwrap());
        assert_eq!(cache.get::<String>(&CacheKey::Announcement).unwrap(), None);
    }

    #[test]
    fn test_old_entries_are_evicted_to_make_room() {
        let mut cache = SerializedLruCache::new(48);
        cache
            .insert(CacheKey::FeaturedSpeaker(Uuid::from_u128(1)), &"a".repeat(20))
            .unwrap();
        cache
            .insert(CacheKey::FeaturedSpeaker(Uuid::from_u128(2)), &"b".repeat(20))
            .unwrap();
        // The first entry is the least recently used one and has to go.
        assert_eq!(
            cache
                .get::<String>(&CacheKey::FeaturedSpeaker(Uuid::from_u128(1)))
                .unwrap(),
            None
        );
        assert!(cache
            .get::<String>(&CacheKey::FeaturedSpeaker(Uuid::from_u128(2)))
            .unwrap()
            .is_some());
    }
}
