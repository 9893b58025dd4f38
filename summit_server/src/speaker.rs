use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use itertools::Itertools;
use sea_orm::{prelude::*, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use summit_entities::domain::conference::Conference;
use summit_entities::domain::speaker::Speaker;
use summit_entities::schema;

use crate::auth::ExtractAuthenticatedUser;
use crate::response::{handle_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SpeakerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakerListResponse {
    pub items: Vec<Speaker>,
}

async fn get_speaker_or_404(db: &impl ConnectionTrait, speaker_id: Uuid) -> Result<Speaker, ApiError> {
    Speaker::try_get(db, speaker_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No speaker found with key: {}", speaker_id)))
}

pub async fn get_speakers_handler(
    State(db): State<DatabaseConnection>,
) -> Result<Json<SpeakerListResponse>, ApiError> {
    let items = Speaker::get_all(&db).await?;
    Ok(Json(SpeakerListResponse { items }))
}

pub async fn create_speaker_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Json(request): Json<SpeakerRequest>,
) -> Result<Json<Speaker>, ApiError> {
    let name = request
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Speaker 'name' field required"))?;

    let speaker = Speaker {
        uuid: Uuid::new_v4(),
        name,
        description: request.description,
        sessions: vec![],
    };
    speaker.save(&db, true).await?;

    Ok(Json(speaker))
}

pub async fn get_speaker_handler(
    State(db): State<DatabaseConnection>,
    Path(speaker_id): Path<Uuid>,
) -> Result<Json<Speaker>, ApiError> {
    let speaker = get_speaker_or_404(&db, speaker_id).await?;
    Ok(Json(speaker))
}

pub async fn update_speaker_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Path(speaker_id): Path<Uuid>,
    Json(request): Json<SpeakerRequest>,
) -> Result<Json<Speaker>, ApiError> {
    let mut speaker = get_speaker_or_404(&db, speaker_id).await?;

    let txn = db.begin().await.map_err(handle_error)?;
    if let Some(name) = request.name.filter(|n| !n.is_empty()) {
        // Renaming rewrites the snapshots embedded in sessions.
        speaker.rename(&txn, name).await?;
    }
    if let Some(description) = request.description.filter(|d| !d.is_empty()) {
        speaker.description = Some(description);
        speaker.save(&txn, false).await?;
    }
    txn.commit().await.map_err(handle_error)?;

    Ok(Json(speaker))
}

pub async fn delete_speaker_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Path(speaker_id): Path<Uuid>,
) -> Result<Json<Speaker>, ApiError> {
    let speaker = get_speaker_or_404(&db, speaker_id).await?;

    let txn = db.begin().await.map_err(handle_error)?;
    speaker.delete(&txn).await?;
    txn.commit().await.map_err(handle_error)?;

    Ok(Json(speaker))
}

/// Distinct speakers across all of a conference's sessions, resolved from
/// the session-side snapshots.
pub async fn get_conference_speakers_handler(
    State(db): State<DatabaseConnection>,
    Path(conference_id): Path<Uuid>,
) -> Result<Json<SpeakerListResponse>, ApiError> {
    let conference = Conference::try_get(&db, conference_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No conference found with key: {}", conference_id))
        })?;

    let session_ids = schema::session::Entity::find()
        .filter(schema::session::Column::ConferenceId.eq(conference.uuid))
        .all(&db)
        .await
        .map_err(handle_error)?
        .into_iter()
        .map(|s| s.uuid)
        .collect_vec();

    let speaker_ids = schema::session_speaker_link::Entity::find()
        .filter(schema::session_speaker_link::Column::SessionId.is_in(session_ids))
        .all(&db)
        .await
        .map_err(handle_error)?
        .into_iter()
        .map(|link| link.speaker_id)
        .unique()
        .collect_vec();

    let items = Speaker::get_many(&db, speaker_ids).await?;
    Ok(Json(SpeakerListResponse { items }))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/speakers",
            get(get_speakers_handler).post(create_speaker_handler),
        )
        .route(
            "/speaker/:speaker_id",
            get(get_speaker_handler)
                .put(update_speaker_handler)
                .delete(delete_speaker_handler),
        )
        .route(
            "/conference/:conference_id/speakers",
            get(get_conference_speakers_handler),
        )
}
