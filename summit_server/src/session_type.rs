use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use sea_orm::prelude::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use summit_entities::domain::session_type::SessionType;
use summit_entities::EntityError;

use crate::auth::ExtractAuthenticatedUser;
use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionTypeRequest {
    pub label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionTypeListResponse {
    pub items: Vec<SessionType>,
}

pub async fn get_session_types_handler(
    State(db): State<DatabaseConnection>,
) -> Result<Json<SessionTypeListResponse>, ApiError> {
    let items = SessionType::get_all(&db).await?;
    Ok(Json(SessionTypeListResponse { items }))
}

pub async fn create_session_type_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Json(request): Json<SessionTypeRequest>,
) -> Result<Json<SessionType>, ApiError> {
    let label = request
        .label
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ApiError::bad_request("Conference session type 'label' field required"))?;

    if SessionType::find_by_label(&db, &label).await?.is_some() {
        return Err(ApiError::bad_request(
            "Duplicate conference session type 'label'",
        ));
    }

    let session_type = SessionType {
        uuid: Uuid::new_v4(),
        label,
    };
    session_type.save(&db, true).await?;

    Ok(Json(session_type))
}

pub async fn delete_session_type_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(_user): ExtractAuthenticatedUser,
    Path(session_type_id): Path<Uuid>,
) -> Result<Json<SessionType>, ApiError> {
    let session_type = SessionType::get_one(&db, session_type_id)
        .await
        .map_err(|e| match e {
            EntityError::RowNotFound => ApiError::not_found(format!(
                "No session type found with key: {}",
                session_type_id
            )),
            other => other.into(),
        })?;

    session_type.delete(&db).await?;
    Ok(Json(session_type))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/session_types",
            get(get_session_types_handler).post(create_session_type_handler),
        )
        .route(
            "/session_type/:session_type_id",
            delete(delete_session_type_handler),
        )
}
