use std::collections::HashMap;

use itertools::Itertools;
use sea_orm::{prelude::*, ActiveValue, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::domain::links::SessionLink;
use crate::schema;
use crate::EntityError;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Speaker {
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sessions: Vec<SessionLink>,
}

impl Speaker {
    pub async fn get_one<C>(db: &C, uuid: Uuid) -> Result<Speaker, EntityError>
    where
        C: ConnectionTrait,
    {
        Self::try_get(db, uuid).await?.ok_or(EntityError::RowNotFound)
    }

    pub async fn try_get<C>(db: &C, uuid: Uuid) -> Result<Option<Speaker>, EntityError>
    where
        C: ConnectionTrait,
    {
        let row = schema::speaker::Entity::find_by_id(uuid).one(db).await?;
        match row {
            Some(row) => Ok(Self::load_with_sessions(db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_all<C>(db: &C) -> Result<Vec<Speaker>, EntityError>
    where
        C: ConnectionTrait,
    {
        let rows = schema::speaker::Entity::find()
            .order_by_asc(schema::speaker::Column::Name)
            .all(db)
            .await?;
        Self::load_with_sessions(db, rows).await
    }

    pub async fn get_many<C>(db: &C, uuids: Vec<Uuid>) -> Result<Vec<Speaker>, EntityError>
    where
        C: ConnectionTrait,
    {
        let rows = schema::speaker::Entity::find()
            .filter(schema::speaker::Column::Uuid.is_in(uuids.clone()))
            .all(db)
            .await?;
        if rows.len() != uuids.len() {
            return Err(EntityError::RowNotFound);
        }
        Self::load_with_sessions(db, rows).await
    }

    pub(crate) async fn load_with_sessions<C>(
        db: &C,
        rows: Vec<schema::speaker::Model>,
    ) -> Result<Vec<Speaker>, EntityError>
    where
        C: ConnectionTrait,
    {
        let ids = rows.iter().map(|r| r.uuid).collect_vec();
        let mut sessions_by_speaker: HashMap<Uuid, Vec<SessionLink>> = HashMap::new();
        for link in schema::speaker_session_link::Entity::find()
            .filter(schema::speaker_session_link::Column::SpeakerId.is_in(ids))
            .order_by_asc(schema::speaker_session_link::Column::SessionName)
            .all(db)
            .await?
        {
            sessions_by_speaker
                .entry(link.speaker_id)
                .or_default()
                .push(SessionLink {
                    session_id: link.session_id,
                    name: link.session_name,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| Speaker {
                uuid: row.uuid,
                name: row.name,
                description: row.description,
                sessions: sessions_by_speaker.remove(&row.uuid).unwrap_or_default(),
            })
            .collect_vec())
    }

    pub async fn save<C>(&self, db: &C, guarantee_insert: bool) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        let model = schema::speaker::ActiveModel {
            uuid: ActiveValue::Set(self.uuid),
            name: ActiveValue::Set(self.name.clone()),
            description: ActiveValue::Set(self.description.clone()),
        };

        if guarantee_insert {
            model.insert(db).await?;
        } else {
            let existing = schema::speaker::Entity::find_by_id(self.uuid).one(db).await?;
            if existing.is_some() {
                model.update(db).await?;
            } else {
                model.insert(db).await?;
            }
        }
        Ok(())
    }

    /// Rename the speaker and rewrite the name snapshots embedded in
    /// sessions so both sides stay in step. Runs inside the caller's
    /// transaction.
    pub async fn rename<C>(&mut self, db: &C, new_name: String) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        self.name = new_name.clone();
        self.save(db, false).await?;

        let session_side = schema::session_speaker_link::Entity::find()
            .filter(schema::session_speaker_link::Column::SpeakerId.eq(self.uuid))
            .all(db)
            .await?;
        for link in session_side {
            let mut link: schema::session_speaker_link::ActiveModel = link.into();
            link.speaker_name = ActiveValue::Set(new_name.clone());
            link.update(db).await?;
        }
        Ok(())
    }

    /// Delete the speaker and both sides of its links.
    pub async fn delete<C>(&self, db: &C) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        schema::session_speaker_link::Entity::delete_many()
            .filter(schema::session_speaker_link::Column::SpeakerId.eq(self.uuid))
            .exec(db)
            .await?;
        schema::speaker_session_link::Entity::delete_many()
            .filter(schema::speaker_session_link::Column::SpeakerId.eq(self.uuid))
            .exec(db)
            .await?;
        schema::speaker::Entity::delete_by_id(self.uuid).exec(db).await?;
        Ok(())
    }
}
