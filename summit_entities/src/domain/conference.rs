use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use sea_orm::{prelude::*, ActiveValue, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::schema;
use crate::EntityError;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Conference {
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub organizer_id: Uuid,
    pub topics: Vec<String>,
    pub city: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub month: i32,
    pub max_attendees: i32,
    pub seats_available: i32,
}

impl Conference {
    /// The month column is derived from the start date and kept stored so
    /// queries can filter on it, as the original entity did.
    pub fn derive_month(start_date: Option<NaiveDate>) -> i32 {
        start_date.map(|d| d.month() as i32).unwrap_or(0)
    }

    pub async fn get_one<C>(db: &C, uuid: Uuid) -> Result<Conference, EntityError>
    where
        C: ConnectionTrait,
    {
        Self::try_get(db, uuid).await?.ok_or(EntityError::RowNotFound)
    }

    pub async fn try_get<C>(db: &C, uuid: Uuid) -> Result<Option<Conference>, EntityError>
    where
        C: ConnectionTrait,
    {
        let row = schema::conference::Entity::find_by_id(uuid).one(db).await?;
        match row {
            Some(row) => Ok(Self::load_with_topics(db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_many<C>(db: &C, uuids: Vec<Uuid>) -> Result<Vec<Conference>, EntityError>
    where
        C: ConnectionTrait,
    {
        let rows = schema::conference::Entity::find()
            .filter(schema::conference::Column::Uuid.is_in(uuids.clone()))
            .all(db)
            .await?;
        if rows.len() != uuids.len() {
            return Err(EntityError::RowNotFound);
        }
        Self::load_with_topics(db, rows).await
    }

    pub async fn get_all_by_organizer<C>(
        db: &C,
        organizer_id: Uuid,
    ) -> Result<Vec<Conference>, EntityError>
    where
        C: ConnectionTrait,
    {
        let rows = schema::conference::Entity::find()
            .filter(schema::conference::Column::OrganizerId.eq(organizer_id))
            .order_by_asc(schema::conference::Column::Name)
            .all(db)
            .await?;
        Self::load_with_topics(db, rows).await
    }

    pub(crate) async fn load_with_topics<C>(
        db: &C,
        rows: Vec<schema::conference::Model>,
    ) -> Result<Vec<Conference>, EntityError>
    where
        C: ConnectionTrait,
    {
        let ids = rows.iter().map(|r| r.uuid).collect_vec();
        let mut topics_by_conference: HashMap<Uuid, Vec<String>> = HashMap::new();
        for topic in schema::conference_topic::Entity::find()
            .filter(schema::conference_topic::Column::ConferenceId.is_in(ids))
            .order_by_asc(schema::conference_topic::Column::Topic)
            .all(db)
            .await?
        {
            topics_by_conference
                .entry(topic.conference_id)
                .or_default()
                .push(topic.topic);
        }

        Ok(rows
            .into_iter()
            .map(|row| Conference {
                uuid: row.uuid,
                name: row.name,
                description: row.description,
                organizer_id: row.organizer_id,
                topics: topics_by_conference.remove(&row.uuid).unwrap_or_default(),
                city: row.city,
                start_date: row.start_date,
                end_date: row.end_date,
                month: row.month,
                max_attendees: row.max_attendees,
                seats_available: row.seats_available,
            })
            .collect_vec())
    }

    pub async fn save<C>(&self, db: &C, guarantee_insert: bool) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        let model = schema::conference::ActiveModel {
            uuid: ActiveValue::Set(self.uuid),
            name: ActiveValue::Set(self.name.clone()),
            description: ActiveValue::Set(self.description.clone()),
            organizer_id: ActiveValue::Set(self.organizer_id),
            city: ActiveValue::Set(self.city.clone()),
            start_date: ActiveValue::Set(self.start_date),
            end_date: ActiveValue::Set(self.end_date),
            month: ActiveValue::Set(self.month),
            max_attendees: ActiveValue::Set(self.max_attendees),
            seats_available: ActiveValue::Set(self.seats_available),
        };

        if guarantee_insert {
            model.insert(db).await?;
        } else {
            let existing = schema::conference::Entity::find_by_id(self.uuid).one(db).await?;
            if existing.is_some() {
                model.update(db).await?;
            } else {
                model.insert(db).await?;
            }
        }

        // Topics are rewritten wholesale; the list is tiny.
        schema::conference_topic::Entity::delete_many()
            .filter(schema::conference_topic::Column::ConferenceId.eq(self.uuid))
            .exec(db)
            .await?;
        for topic in self.topics.iter().unique() {
            schema::conference_topic::ActiveModel {
                conference_id: ActiveValue::Set(self.uuid),
                topic: ActiveValue::Set(topic.clone()),
            }
            .insert(db)
            .await?;
        }

        Ok(())
    }
}
