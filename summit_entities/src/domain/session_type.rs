use sea_orm::{prelude::*, ActiveValue, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::schema;
use crate::EntityError;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct SessionType {
    pub uuid: Uuid,
    pub label: String,
}

impl SessionType {
    pub async fn get_one<C>(db: &C, uuid: Uuid) -> Result<SessionType, EntityError>
    where
        C: ConnectionTrait,
    {
        let row = schema::session_type::Entity::find_by_id(uuid)
            .one(db)
            .await?
            .ok_or(EntityError::RowNotFound)?;
        Ok(SessionType {
            uuid: row.uuid,
            label: row.label,
        })
    }

    pub async fn get_all<C>(db: &C) -> Result<Vec<SessionType>, EntityError>
    where
        C: ConnectionTrait,
    {
        let rows = schema::session_type::Entity::find()
            .order_by_asc(schema::session_type::Column::Label)
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| SessionType {
                uuid: row.uuid,
                label: row.label,
            })
            .collect())
    }

    pub async fn find_by_label<C>(db: &C, label: &str) -> Result<Option<SessionType>, EntityError>
    where
        C: ConnectionTrait,
    {
        let row = schema::session_type::Entity::find()
            .filter(schema::session_type::Column::Label.eq(label))
            .one(db)
            .await?;
        Ok(row.map(|row| SessionType {
            uuid: row.uuid,
            label: row.label,
        }))
    }

    pub async fn save<C>(&self, db: &C, guarantee_insert: bool) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        let model = schema::session_type::ActiveModel {
            uuid: ActiveValue::Set(self.uuid),
            label: ActiveValue::Set(self.label.clone()),
        };
        if guarantee_insert {
            model.insert(db).await?;
        } else {
            let existing = schema::session_type::Entity::find_by_id(self.uuid).one(db).await?;
            if existing.is_some() {
                model.update(db).await?;
            } else {
                model.insert(db).await?;
            }
        }
        Ok(())
    }

    pub async fn delete<C>(&self, db: &C) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        schema::session_type::Entity::delete_by_id(self.uuid).exec(db).await?;
        Ok(())
    }
}
