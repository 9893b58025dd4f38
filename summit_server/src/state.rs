use std::sync::Arc;

use axum::extract::FromRef;
use migration::MigratorTrait;
use sea_orm::prelude::*;

use crate::cache::CacheManager;
use crate::config::Config;
use crate::db::{self, DatabaseConfig};
use crate::email::EmailQueue;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub cache: Arc<CacheManager>,
    pub email: EmailQueue,
}

impl AppState {
    pub async fn new(config: Config) -> AppState {
        let db = db::set_up_db(DatabaseConfig::new(config.db_url.clone()))
            .await
            .expect("Failed to set up database");
        Self::new_with_db_and_config(db, config).await
    }

    pub async fn new_with_db(db: DatabaseConnection) -> AppState {
        Self::new_with_db_and_config(db, Config::default()).await
    }

    pub async fn new_test_app() -> AppState {
        let db = db::set_up_db(DatabaseConfig::new("sqlite::memory:".into()))
            .await
            .expect("Failed to set up database");
        Self::new_with_db_and_config(db, Config::default()).await
    }

    async fn new_with_db_and_config(db: DatabaseConnection, config: Config) -> AppState {
        migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        AppState {
            db,
            cache: Arc::new(CacheManager::new(config.cache_size_bytes)),
            email: EmailQueue::spawn(),
            config,
        }
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(app_state: &AppState) -> DatabaseConnection {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for Arc<CacheManager> {
    fn from_ref(app_state: &AppState) -> Arc<CacheManager> {
        app_state.cache.clone()
    }
}

impl FromRef<AppState> for EmailQueue {
    fn from_ref(app_state: &AppState) -> EmailQueue {
        app_state.email.clone()
    }
}
