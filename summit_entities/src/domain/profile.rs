use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use sea_orm::{prelude::*, ActiveValue, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::domain::links::{ConferenceLink, SessionLink};
use crate::schema;
use crate::EntityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TeeShirtSize {
    #[default]
    #[serde(rename = "NOT_SPECIFIED")]
    NotSpecified,
    #[serde(rename = "XS_M")]
    XsM,
    #[serde(rename = "XS_W")]
    XsW,
    #[serde(rename = "S_M")]
    SM,
    #[serde(rename = "S_W")]
    SW,
    #[serde(rename = "M_M")]
    MM,
    #[serde(rename = "M_W")]
    MW,
    #[serde(rename = "L_M")]
    LM,
    #[serde(rename = "L_W")]
    LW,
    #[serde(rename = "XL_M")]
    XlM,
    #[serde(rename = "XL_W")]
    XlW,
    #[serde(rename = "XXL_M")]
    XxlM,
    #[serde(rename = "XXL_W")]
    XxlW,
    #[serde(rename = "XXXL_M")]
    XxxlM,
    #[serde(rename = "XXXL_W")]
    XxxlW,
}

impl TeeShirtSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeeShirtSize::NotSpecified => "NOT_SPECIFIED",
            TeeShirtSize::XsM => "XS_M",
            TeeShirtSize::XsW => "XS_W",
            TeeShirtSize::SM => "S_M",
            TeeShirtSize::SW => "S_W",
            TeeShirtSize::MM => "M_M",
            TeeShirtSize::MW => "M_W",
            TeeShirtSize::LM => "L_M",
            TeeShirtSize::LW => "L_W",
            TeeShirtSize::XlM => "XL_M",
            TeeShirtSize::XlW => "XL_W",
            TeeShirtSize::XxlM => "XXL_M",
            TeeShirtSize::XxlW => "XXL_W",
            TeeShirtSize::XxxlM => "XXXL_M",
            TeeShirtSize::XxxlW => "XXXL_W",
        }
    }
}

impl fmt::Display for TeeShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeeShirtSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOT_SPECIFIED" => Ok(TeeShirtSize::NotSpecified),
            "XS_M" => Ok(TeeShirtSize::XsM),
            "XS_W" => Ok(TeeShirtSize::XsW),
            "S_M" => Ok(TeeShirtSize::SM),
            "S_W" => Ok(TeeShirtSize::SW),
            "M_M" => Ok(TeeShirtSize::MM),
            "M_W" => Ok(TeeShirtSize::MW),
            "L_M" => Ok(TeeShirtSize::LM),
            "L_W" => Ok(TeeShirtSize::LW),
            "XL_M" => Ok(TeeShirtSize::XlM),
            "XL_W" => Ok(TeeShirtSize::XlW),
            "XXL_M" => Ok(TeeShirtSize::XxlM),
            "XXL_W" => Ok(TeeShirtSize::XxlW),
            "XXXL_M" => Ok(TeeShirtSize::XxxlM),
            "XXXL_W" => Ok(TeeShirtSize::XxxlW),
            _ => Err(()),
        }
    }
}

/// The per-user profile, together with the attendance and wishlist lists
/// that the original datastore entity carried inline.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Profile {
    pub user_id: Uuid,
    pub display_name: String,
    pub main_email: Option<String>,
    pub tee_shirt_size: TeeShirtSize,
    pub conferences_attending: Vec<ConferenceLink>,
    pub wishlist: Vec<SessionLink>,
}

impl Profile {
    pub fn new(user_id: Uuid, display_name: String, main_email: Option<String>) -> Self {
        Profile {
            user_id,
            display_name,
            main_email,
            tee_shirt_size: TeeShirtSize::NotSpecified,
            conferences_attending: vec![],
            wishlist: vec![],
        }
    }

    pub async fn try_get<C>(db: &C, user_id: Uuid) -> Result<Option<Profile>, EntityError>
    where
        C: ConnectionTrait,
    {
        let row = schema::profile::Entity::find_by_id(user_id).one(db).await?;
        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let conferences_attending = schema::attendance::Entity::find()
            .filter(schema::attendance::Column::UserId.eq(user_id))
            .find_also_related(schema::conference::Entity)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(attendance, conference)| {
                conference.map(|c| ConferenceLink {
                    conference_id: attendance.conference_id,
                    name: c.name,
                })
            })
            .collect_vec();

        let wishlist = schema::wishlist_entry::Entity::find()
            .filter(schema::wishlist_entry::Column::UserId.eq(user_id))
            .order_by_asc(schema::wishlist_entry::Column::SessionName)
            .all(db)
            .await?
            .into_iter()
            .map(|entry| SessionLink {
                session_id: entry.session_id,
                name: entry.session_name,
            })
            .collect_vec();

        let tee_shirt_size = TeeShirtSize::from_str(&row.tee_shirt_size).unwrap_or_default();

        Ok(Some(Profile {
            user_id: row.user_id,
            display_name: row.display_name,
            main_email: row.main_email,
            tee_shirt_size,
            conferences_attending,
            wishlist,
        }))
    }

    /// Upsert the profile row. Attendance and wishlist rows are owned by
    /// the registration and wishlist paths and are not written here.
    pub async fn save<C>(&self, db: &C) -> Result<(), EntityError>
    where
        C: ConnectionTrait,
    {
        let model = schema::profile::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            display_name: ActiveValue::Set(self.display_name.clone()),
            main_email: ActiveValue::Set(self.main_email.clone()),
            tee_shirt_size: ActiveValue::Set(self.tee_shirt_size.to_string()),
        };

        let existing = schema::profile::Entity::find_by_id(self.user_id).one(db).await?;
        if existing.is_some() {
            model.update(db).await?;
        } else {
            model.insert(db).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::TeeShirtSize;
    use std::str::FromStr;

    #[test]
    fn test_tee_shirt_size_round_trips_through_storage_string() {
        for size in [
            TeeShirtSize::NotSpecified,
            TeeShirtSize::XsW,
            TeeShirtSize::MM,
            TeeShirtSize::XxxlW,
        ] {
            assert_eq!(TeeShirtSize::from_str(size.as_str()), Ok(size));
        }
    }

    #[test]
    fn test_unknown_tee_shirt_size_is_rejected() {
        assert!(TeeShirtSize::from_str("XXXXL_M").is_err());
    }
}
