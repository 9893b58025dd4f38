use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use itertools::Itertools;
use sea_orm::{prelude::*, ActiveValue, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use summit_entities::domain::conference::Conference;
use summit_entities::domain::links::{self, LinkState};
use summit_entities::domain::session::{Session, SESSION_TYPE_NOT_SPECIFIED};
use summit_entities::domain::speaker::Speaker;
use summit_entities::queries::{build_session_query, FilterClause};
use summit_entities::schema;

use crate::auth::ExtractAuthenticatedUser;
use crate::cache::CacheManager;
use crate::response::{handle_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionRequest {
    pub name: Option<String>,
    pub highlights: Option<String>,
    pub duration_minutes: Option<i32>,
    pub type_of_session: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub items: Vec<Session>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionQueryRequest {
    #[serde(default)]
    pub filters: Vec<FilterClause>,
    pub conference: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub success: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("Invalid date: [{}]", value)))
}

fn parse_start_time(value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ApiError::bad_request(format!("Invalid start time: [{}]", value)))
}

async fn get_session_or_404(db: &impl ConnectionTrait, session_id: Uuid) -> Result<Session, ApiError> {
    Session::try_get(db, session_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No session found with key: {}", session_id)))
}

pub async fn create_session_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Path(conference_id): Path<Uuid>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<Session>, ApiError> {
    let conference = Conference::try_get(&db, conference_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No conference found with key: {}", conference_id))
        })?;

    let name = request
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Conference session 'name' field required"))?;

    if Session::find_by_name(&db, &name).await?.is_some() {
        return Err(ApiError::bad_request("Duplicate conference session 'name'"));
    }

    let session = Session {
        uuid: Uuid::new_v4(),
        conference_id: conference.uuid,
        name,
        highlights: request.highlights,
        duration_minutes: request.duration_minutes,
        type_of_session: request
            .type_of_session
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| SESSION_TYPE_NOT_SPECIFIED.to_string()),
        date: request.date.as_deref().map(parse_date).transpose()?,
        start_time: request.start_time.as_deref().map(parse_start_time).transpose()?,
        speakers: vec![],
    };
    session.save(&db, true).await?;

    Ok(Json(session))
}

pub async fn get_conference_sessions_handler(
    State(db): State<DatabaseConnection>,
    Path(conference_id): Path<Uuid>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let items = Session::get_all_in_conference(&db, conference_id).await?;
    Ok(Json(SessionListResponse { items }))
}

pub async fn get_conference_sessions_by_type_handler(
    State(db): State<DatabaseConnection>,
    Path((conference_id, type_of_session)): Path<(Uuid, String)>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let conference = Conference::try_get(&db, conference_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No conference found with key: {}", conference_id))
        })?;

    let items =
        Session::get_all_by_type_in_conference(&db, conference.uuid, &type_of_session).await?;
    Ok(Json(SessionListResponse { items }))
}

pub async fn get_session_handler(
    State(db): State<DatabaseConnection>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    let session = get_session_or_404(&db, session_id).await?;
    Ok(Json(session))
}

pub async fn update_session_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<Session>, ApiError> {
    let mut session = get_session_or_404(&db, session_id).await?;

    if let Some(name) = request.name.filter(|n| !n.is_empty()) {
        if name != session.name && Session::find_by_name(&db, &name).await?.is_some() {
            return Err(ApiError::bad_request("Duplicate conference session 'name'"));
        }
        session.name = name;
    }
    if let Some(highlights) = request.highlights.filter(|h| !h.is_empty()) {
        session.highlights = Some(highlights);
    }
    if let Some(duration_minutes) = request.duration_minutes {
        session.duration_minutes = Some(duration_minutes);
    }
    if let Some(type_of_session) = request.type_of_session.filter(|t| !t.is_empty()) {
        session.type_of_session = type_of_session;
    }
    if let Some(date) = request.date.filter(|d| !d.is_empty()) {
        session.date = Some(parse_date(&date)?);
    }
    if let Some(start_time) = request.start_time.filter(|t| !t.is_empty()) {
        session.start_time = Some(parse_start_time(&start_time)?);
    }

    // Renaming a session has to reach the snapshot copies on the speaker
    // side and in wishlists as well.
    let txn = db.begin().await.map_err(handle_error)?;
    session.save(&txn, false).await?;
    for link in schema::speaker_session_link::Entity::find()
        .filter(schema::speaker_session_link::Column::SessionId.eq(session.uuid))
        .all(&txn)
        .await
        .map_err(handle_error)?
    {
        let mut link: schema::speaker_session_link::ActiveModel = link.into();
        link.session_name = ActiveValue::Set(session.name.clone());
        link.update(&txn).await.map_err(handle_error)?;
    }
    for entry in schema::wishlist_entry::Entity::find()
        .filter(schema::wishlist_entry::Column::SessionId.eq(session.uuid))
        .all(&txn)
        .await
        .map_err(handle_error)?
    {
        let mut entry: schema::wishlist_entry::ActiveModel = entry.into();
        entry.session_name = ActiveValue::Set(session.name.clone());
        entry.update(&txn).await.map_err(handle_error)?;
    }
    txn.commit().await.map_err(handle_error)?;

    Ok(Json(session))
}

pub async fn delete_session_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    let session = get_session_or_404(&db, session_id).await?;

    let txn = db.begin().await.map_err(handle_error)?;
    session.delete(&txn).await?;
    txn.commit().await.map_err(handle_error)?;

    Ok(Json(session))
}

pub async fn get_sessions_by_speaker_handler(
    State(db): State<DatabaseConnection>,
    Path(speaker_id): Path<Uuid>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let items = Session::get_all_for_speaker(&db, speaker_id).await?;
    Ok(Json(SessionListResponse { items }))
}

pub async fn query_sessions_handler(
    State(db): State<DatabaseConnection>,
    Json(request): Json<SessionQueryRequest>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let query =
        build_session_query(&request.filters).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let items = query.fetch(&db, request.conference).await?;
    Ok(Json(SessionListResponse { items }))
}

pub async fn add_session_speaker_handler(
    State(db): State<DatabaseConnection>,
    State(cache): State<Arc<CacheManager>>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Path((session_id, speaker_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<LinkResponse>, ApiError> {
    let txn = db.begin().await.map_err(handle_error)?;

    let session = get_session_or_404(&txn, session_id).await?;
    let speaker = Speaker::try_get(&txn, speaker_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No speaker found with key: {}", speaker_id)))?;

    match links::check_link_state(&txn, session_id, speaker_id).await? {
        LinkState::Linked => {
            return Err(ApiError::conflict("Speaker is already linked to this session"));
        }
        LinkState::Unlinked => {}
    }

    links::insert_link_pair(&txn, session.uuid, &session.name, speaker.uuid, &speaker.name).await?;
    txn.commit().await.map_err(handle_error)?;

    // A speaker with more than one session in the conference becomes the
    // conference's featured speaker.
    let conference_sessions = Session::get_all_for_speaker(&db, speaker_id)
        .await?
        .into_iter()
        .filter(|s| s.conference_id == session.conference_id)
        .collect_vec();
    if conference_sessions.len() > 1 {
        let message = format!(
            "{} is speaking at: {}",
            speaker.name,
            conference_sessions.iter().map(|s| s.name.as_str()).join(", ")
        );
        cache.set_featured_speaker(session.conference_id, &message).await;
    }

    Ok(Json(LinkResponse { success: true }))
}

pub async fn remove_session_speaker_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Path((session_id, speaker_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<LinkResponse>, ApiError> {
    let txn = db.begin().await.map_err(handle_error)?;

    get_session_or_404(&txn, session_id).await?;
    Speaker::try_get(&txn, speaker_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No speaker found with key: {}", speaker_id)))?;

    match links::check_link_state(&txn, session_id, speaker_id).await? {
        LinkState::Unlinked => {
            return Err(ApiError::not_found("Speaker is not linked to this session"));
        }
        LinkState::Linked => {}
    }

    links::delete_link_pair(&txn, session_id, speaker_id).await?;
    txn.commit().await.map_err(handle_error)?;

    Ok(Json(LinkResponse { success: true }))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/conference/:conference_id/sessions",
            post(create_session_handler).get(get_conference_sessions_handler),
        )
        .route(
            "/conference/:conference_id/sessions/type/:type_of_session",
            get(get_conference_sessions_by_type_handler),
        )
        .route(
            "/session/:session_id",
            get(get_session_handler)
                .put(update_session_handler)
                .delete(delete_session_handler),
        )
        .route(
            "/session/:session_id/speaker/:speaker_id",
            put(add_session_speaker_handler).delete(remove_session_speaker_handler),
        )
        .route("/sessions/by_speaker/:speaker_id", get(get_sessions_by_speaker_handler))
        .route("/sessions/query", post(query_sessions_handler))
}
