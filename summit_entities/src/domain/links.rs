use sea_orm::{prelude::*, ActiveValue};
use serde::{Deserialize, Serialize};

use crate::schema;
use crate::EntityError;

/// Session snapshot carried inside speakers and wishlists.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct SessionLink {
    pub session_id: Uuid,
    pub name: String,
}

/// Speaker snapshot carried inside sessions.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct SpeakerLink {
    pub speaker_id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_sessions: Option<u64>,
}

/// Conference snapshot used in listing responses.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct ConferenceLink {
    pub conference_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Linked,
    Unlinked,
}

/// Inspect both sides of the session/speaker link pair. A one-sided link
/// is reported as a consistency error instead of being silently repaired.
pub async fn check_link_state<C>(
    db: &C,
    session_id: Uuid,
    speaker_id: Uuid,
) -> Result<LinkState, EntityError>
where
    C: ConnectionTrait,
{
    let session_side = schema::session_speaker_link::Entity::find_by_id((session_id, speaker_id))
        .one(db)
        .await?;
    let speaker_side = schema::speaker_session_link::Entity::find_by_id((speaker_id, session_id))
        .one(db)
        .await?;

    match (session_side, speaker_side) {
        (Some(_), Some(_)) => Ok(LinkState::Linked),
        (None, None) => Ok(LinkState::Unlinked),
        (Some(_), None) => Err(EntityError::Consistency(format!(
            "session {} lists speaker {}, but not the reverse",
            session_id, speaker_id
        ))),
        (None, Some(_)) => Err(EntityError::Consistency(format!(
            "speaker {} lists session {}, but not the reverse",
            speaker_id, session_id
        ))),
    }
}

/// Write both snapshot rows of a new link. Callers run this inside a
/// transaction together with `check_link_state`.
pub async fn insert_link_pair<C>(
    db: &C,
    session_id: Uuid,
    session_name: &str,
    speaker_id: Uuid,
    speaker_name: &str,
) -> Result<(), EntityError>
where
    C: ConnectionTrait,
{
    schema::session_speaker_link::ActiveModel {
        session_id: ActiveValue::Set(session_id),
        speaker_id: ActiveValue::Set(speaker_id),
        speaker_name: ActiveValue::Set(speaker_name.to_string()),
    }
    .insert(db)
    .await?;

    schema::speaker_session_link::ActiveModel {
        speaker_id: ActiveValue::Set(speaker_id),
        session_id: ActiveValue::Set(session_id),
        session_name: ActiveValue::Set(session_name.to_string()),
    }
    .insert(db)
    .await?;

    Ok(())
}

/// Remove both snapshot rows of an existing link.
pub async fn delete_link_pair<C>(
    db: &C,
    session_id: Uuid,
    speaker_id: Uuid,
) -> Result<(), EntityError>
where
    C: ConnectionTrait,
{
    schema::session_speaker_link::Entity::delete_by_id((session_id, speaker_id))
        .exec(db)
        .await?;
    schema::speaker_session_link::Entity::delete_by_id((speaker_id, session_id))
        .exec(db)
        .await?;
    Ok(())
}
