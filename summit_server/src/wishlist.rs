use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use itertools::Itertools;
use sea_orm::{prelude::*, ActiveValue, DatabaseConnection};
use serde::{Deserialize, Serialize};
use summit_entities::domain::session::Session;
use summit_entities::schema;

use crate::auth::ExtractAuthenticatedUser;
use crate::profile::get_or_create_profile;
use crate::response::{handle_error, ApiError};
use crate::session::SessionListResponse;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct WishlistResponse {
    pub success: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WishlistQueryRequest {
    pub conference: Option<Uuid>,
}

pub async fn add_session_to_wishlist_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<WishlistResponse>, ApiError> {
    get_or_create_profile(&db, user.uuid).await?;

    let session = Session::try_get(&db, session_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No session found with key: {}", session_id)))?;

    let existing = schema::wishlist_entry::Entity::find_by_id((user.uuid, session_id))
        .one(&db)
        .await
        .map_err(handle_error)?;
    if existing.is_some() {
        return Err(ApiError::conflict("Session already in wishlist"));
    }

    schema::wishlist_entry::ActiveModel {
        user_id: ActiveValue::Set(user.uuid),
        session_id: ActiveValue::Set(session.uuid),
        session_name: ActiveValue::Set(session.name.clone()),
    }
    .insert(&db)
    .await
    .map_err(handle_error)?;

    Ok(Json(WishlistResponse { success: true }))
}

pub async fn remove_session_from_wishlist_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<WishlistResponse>, ApiError> {
    // The key has to name a real session even when removing, the way the
    // original validated it first.
    Session::try_get(&db, session_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No session found with key: {}", session_id)))?;

    let existing = schema::wishlist_entry::Entity::find_by_id((user.uuid, session_id))
        .one(&db)
        .await
        .map_err(handle_error)?;
    if existing.is_none() {
        return Err(ApiError::conflict("Session not in wishlist"));
    }

    schema::wishlist_entry::Entity::delete_by_id((user.uuid, session_id))
        .exec(&db)
        .await
        .map_err(handle_error)?;

    Ok(Json(WishlistResponse { success: true }))
}

pub async fn get_wishlist_sessions_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Json(request): Json<WishlistQueryRequest>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let session_ids = schema::wishlist_entry::Entity::find()
        .filter(schema::wishlist_entry::Column::UserId.eq(user.uuid))
        .all(&db)
        .await
        .map_err(handle_error)?
        .into_iter()
        .map(|entry| entry.session_id)
        .collect_vec();

    let mut items = Session::get_many(&db, session_ids).await?;
    if let Some(conference_id) = request.conference {
        items.retain(|session| session.conference_id == conference_id);
    }
    Ok(Json(SessionListResponse { items }))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/session/:session_id/wishlist",
            post(add_session_to_wishlist_handler).delete(remove_session_from_wishlist_handler),
        )
        .route("/wishlist/query", post(get_wishlist_sessions_handler))
}
