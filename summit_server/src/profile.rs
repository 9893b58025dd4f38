use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use summit_entities::domain::profile::{Profile, TeeShirtSize};

use crate::auth::ExtractAuthenticatedUser;
use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub tee_shirt_size: Option<TeeShirtSize>,
}

/// Load the caller's profile, creating a default one on first access.
pub async fn get_or_create_profile(
    db: &DatabaseConnection,
    user_id: sea_orm::prelude::Uuid,
) -> Result<Profile, ApiError> {
    match Profile::try_get(db, user_id).await? {
        Some(profile) => Ok(profile),
        None => {
            let profile = Profile::new(user_id, "Anonymous User".to_string(), None);
            profile.save(db).await?;
            Ok(profile)
        }
    }
}

pub async fn get_profile_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = get_or_create_profile(&db, user.uuid).await?;
    Ok(Json(profile))
}

pub async fn save_profile_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let mut profile = get_or_create_profile(&db, user.uuid).await?;

    if let Some(display_name) = request.display_name {
        if !display_name.is_empty() {
            profile.display_name = display_name;
        }
    }
    if let Some(size) = request.tee_shirt_size {
        profile.tee_shirt_size = size;
    }
    profile.save(&db).await?;

    Ok(Json(profile))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile_handler))
        .route("/profile", post(save_profile_handler))
}
