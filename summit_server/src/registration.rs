use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use itertools::Itertools;
use sea_orm::{prelude::*, ActiveValue, DatabaseConnection, IntoActiveModel, TransactionTrait};
use serde::{Deserialize, Serialize};
use summit_entities::domain::conference::Conference;
use summit_entities::schema;

use crate::auth::ExtractAuthenticatedUser;
use crate::conference::{organizer_display_names, to_response_list, ConferenceListResponse};
use crate::profile::get_or_create_profile;
use crate::response::{handle_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub success: bool,
}

/// Seat accounting and the attendance row move together inside one
/// transaction, mirroring the original cross-group transaction around the
/// profile and the conference.
pub async fn register_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Path(conference_id): Path<Uuid>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    get_or_create_profile(&db, user.uuid).await?;

    let txn = db.begin().await.map_err(handle_error)?;

    let conference = schema::conference::Entity::find_by_id(conference_id)
        .one(&txn)
        .await
        .map_err(handle_error)?
        .ok_or_else(|| {
            ApiError::not_found(format!("No conference found with key: {}", conference_id))
        })?;

    let already_registered = schema::attendance::Entity::find_by_id((user.uuid, conference_id))
        .one(&txn)
        .await
        .map_err(handle_error)?
        .is_some();
    if already_registered {
        return Err(ApiError::conflict(
            "You have already registered for this conference",
        ));
    }

    if conference.seats_available <= 0 {
        return Err(ApiError::conflict("There are no seats available."));
    }

    schema::attendance::ActiveModel {
        user_id: ActiveValue::Set(user.uuid),
        conference_id: ActiveValue::Set(conference_id),
    }
    .insert(&txn)
    .await
    .map_err(handle_error)?;

    let seats_available = conference.seats_available - 1;
    let mut conference = conference.into_active_model();
    conference.seats_available = ActiveValue::Set(seats_available);
    conference.update(&txn).await.map_err(handle_error)?;

    txn.commit().await.map_err(handle_error)?;

    Ok(Json(RegistrationResponse { success: true }))
}

pub async fn unregister_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Path(conference_id): Path<Uuid>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let txn = db.begin().await.map_err(handle_error)?;

    let conference = schema::conference::Entity::find_by_id(conference_id)
        .one(&txn)
        .await
        .map_err(handle_error)?
        .ok_or_else(|| {
            ApiError::not_found(format!("No conference found with key: {}", conference_id))
        })?;

    let attendance = schema::attendance::Entity::find_by_id((user.uuid, conference_id))
        .one(&txn)
        .await
        .map_err(handle_error)?;

    // Not being registered is not an error here, the original reported it
    // as a boolean-false result.
    if attendance.is_none() {
        return Ok(Json(RegistrationResponse { success: false }));
    }

    schema::attendance::Entity::delete_by_id((user.uuid, conference_id))
        .exec(&txn)
        .await
        .map_err(handle_error)?;

    let seats_available = conference.seats_available + 1;
    let mut conference = conference.into_active_model();
    conference.seats_available = ActiveValue::Set(seats_available);
    conference.update(&txn).await.map_err(handle_error)?;

    txn.commit().await.map_err(handle_error)?;

    Ok(Json(RegistrationResponse { success: true }))
}

pub async fn get_attending_conferences_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
) -> Result<Json<ConferenceListResponse>, ApiError> {
    let conference_ids = schema::attendance::Entity::find()
        .filter(schema::attendance::Column::UserId.eq(user.uuid))
        .all(&db)
        .await
        .map_err(handle_error)?
        .into_iter()
        .map(|attendance| attendance.conference_id)
        .collect_vec();

    let conferences = Conference::get_many(&db, conference_ids).await?;
    let names = organizer_display_names(&db, &conferences).await?;
    Ok(Json(to_response_list(conferences, &names)))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/conference/:conference_id/registration",
            axum::routing::post(register_handler).delete(unregister_handler),
        )
        .route(
            "/conferences/attending",
            get(get_attending_conferences_handler),
        )
}
