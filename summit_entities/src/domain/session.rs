use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use itertools::Itertools;
use sea_orm::{prelude::*, ActiveValue, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::domain::links::SpeakerLink;
use crate::schema;
use crate::EntityError;

pub const SESSION_TYPE_NOT_SPECIFIED: &str = "NOT_SPECIFIED";

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Session {
    pub uuid: Uuid,
    pub conference_id: Uuid,
    pub name: String,
    pub highlights: Option<String>,
    pub duration_minutes: Option<i32>,
    pub type_of_session: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub speakers: Vec<SpeakerLink>,
}

impl Session {
    pub async fn get_one<C>(db: &C, uuid: Uuid) -> Result<Session, EntityError>
    where
        C: ConnectionTrait,
    {
        Self::try_get(db, uuid).await?.ok_or(EntityError::RowNotFound)
    }

    pub async fn try_get<C>(db: &C, uuid: Uuid) -> Result<Option<Session>, EntityError>
    where
        C: ConnectionTrait,
    {
        let row = schema::session::Entity::find_by_id(uuid).one(db).await?;
        match row {
            Some(row) => Ok(Self::load_with_speakers(db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_all_in_conference<C>(
        db: &C,
        conference_id: Uuid,
    ) -> Result<Vec<Session>, EntityError>
    where
        C: ConnectionTrait,
    {
        let rows = schema::session::Entity::find()
            .filter(schema::session::Column::ConferenceId.eq(conference_id))
            .order_by_asc(schema::session::Column::Name)
            .all(db)
            .await?;
        Self::load_with_speakers(db, rows).await
    }

    pub async fn get_all_by_type_in_conference<C>(
        db: &C,
        conference_id: Uuid,
        type_of_session: &str,
    ) -> Result<Vec<Session>, EntityError>
    where
        C: ConnectionTrait,
    {
        let rows = schema::session::Entity::find()
            .filter(
                schema::session::Column::ConferenceId
                    .eq(conference_id)
                    .and(schema::session::Column::TypeOfSession.eq(type_of_session)),
            )
            .order_by_asc(schema::session::Column::Name)
            .all(db)
            .await?;
        Self::load_with_speakers(db, rows).await
    }

    /// All sessions a speaker is linked to, across conferences, resolved
    /// through the speaker-side snapshot table.
    pub async fn get_all_for_speaker<C>(db: &C, speaker_id: Uuid) -> Result<Vec<Session>, EntityError>
    where
        C: ConnectionTrait,
    {
        let session_ids: Vec<Uuid> = schema::speaker_session_link::Entity::find()
            .filter(schema::speaker_session_link::Column::SpeakerId.eq(speaker_id))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.session_id)
            .collect_vec();

        let rows = schema::session::Entity::find()
            .filter(schema::session::Column::Uuid.is_in(session_ids))
            .order_by_asc(schema::session::Column::Name)
            .all(db)
            .await?;
        Self::load_with_speakers(db, rows).await
    }

    pub async fn get_many<C>(db: &C, uuids: Vec<Uuid>) -> Result<Vec<Session>, EntityError>
    where
        C: ConnectionTrait,
    {
        let rows = schema::session::Entity::find()
            .filter(schema::session::Column::Uuid.is_in(uuids))
            .order_by_asc(schema::session::Column::Name)
            .all(db)
            .await?;
        Self::load_with_speakers(db, rows).await
    }

    pub async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<Session>, EntityError>
    where
        C: ConnectionTrait,
    {
        let row = schema::session::Entity::find()
            .filter(schema::session::Column::Name.eq(name))
            .one(db)
            .await?;
        match row {
            Some(row) => Ok(Self::load_with_speakers(db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub(crate) async fn load_with_speakers<C>(
        db: &C,
        rows: Vec<schema::session::Model>,
    ) -> Result<Vec<Session>, EntityError>
    where
        C: ConnectionTrait,
    {
        let ids = rows.iter().map(|r| r.uuid).collect_vec();
        let mut speakers_by_session: HashMap<Uuid, Vec<SpeakerLink>> = HashMap::new();
        for link in schema::session_speaker_link::Entity::find()
            .filter(schema::session_speaker_link::Column::SessionId.is_in(ids))
            .order_by_asc(schema::session_speaker_link::Column::SpeakerName)
            .all(db)
            .await?
        {
            speakers_by_session
                .entry(link.session_id)
                .or_default()
                .push(SpeakerLink {
                    speaker_id: link.speaker_id,
                    name: link.speaker_name,
                    number_of_sessions: None,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| Session {
                uuid: row.uuid,
                conference_id: row.conference_id,
                name: row.name,
                highlights: row.highlights,
                duration_minutes: row.duration_minutes,
                type_of_session: row.type_of_session,
                date: row.date,
                start_time: row.start_time,
                speakers: speakers_by_session.remove(&row.uuid).unwrap_or_default(),
            })
            .collect_vec())
    }

    pub async fn save<C>(&self, db: &C, guarantee_insert: bool) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        let model = schema::session::ActiveModel {
            uuid: ActiveValue::Set(self.uuid),
            conference_id: ActiveValue::Set(self.conference_id),
            name: ActiveValue::Set(self.name.clone()),
            highlights: ActiveValue::Set(self.highlights.clone()),
            duration_minutes: ActiveValue::Set(self.duration_minutes),
            type_of_session: ActiveValue::Set(self.type_of_session.clone()),
            date: ActiveValue::Set(self.date),
            start_time: ActiveValue::Set(self.start_time),
        };

        if guarantee_insert {
            model.insert(db).await?;
        } else {
            let existing = schema::session::Entity::find_by_id(self.uuid).one(db).await?;
            if existing.is_some() {
                model.update(db).await?;
            } else {
                model.insert(db).await?;
            }
        }
        Ok(())
    }

    /// Delete the session together with both sides of its speaker links
    /// and any wishlist entries pointing at it. Callers provide the
    /// transaction.
    pub async fn delete<C>(&self, db: &C) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        schema::session_speaker_link::Entity::delete_many()
            .filter(schema::session_speaker_link::Column::SessionId.eq(self.uuid))
            .exec(db)
            .await?;
        schema::speaker_session_link::Entity::delete_many()
            .filter(schema::speaker_session_link::Column::SessionId.eq(self.uuid))
            .exec(db)
            .await?;
        schema::wishlist_entry::Entity::delete_many()
            .filter(schema::wishlist_entry::Column::SessionId.eq(self.uuid))
            .exec(db)
            .await?;
        schema::session::Entity::delete_by_id(self.uuid).exec(db).await?;
        Ok(())
    }
}
