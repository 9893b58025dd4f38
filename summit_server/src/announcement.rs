use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use itertools::Itertools;
use sea_orm::{prelude::*, DatabaseConnection, QueryOrder};
use serde::{Deserialize, Serialize};
use summit_entities::schema;

use crate::cache::CacheManager;
use crate::response::{handle_error, ApiError};
use crate::state::AppState;

const ANNOUNCEMENT_TPL: &str =
    "Last chance to attend! The following conferences are nearly sold out: ";
const NEARLY_SOLD_OUT_SEATS: i32 = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnnouncementResponse {
    pub announcement: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeaturedSpeakerResponse {
    pub message: String,
}

/// Recompute the nearly-sold-out announcement and write it through the
/// cache. The original ran this from a cron task; here callers trigger it
/// explicitly.
pub async fn refresh_announcement_handler(
    State(db): State<DatabaseConnection>,
    State(cache): State<Arc<CacheManager>>,
) -> Result<Json<AnnouncementResponse>, ApiError> {
    let nearly_sold_out = schema::conference::Entity::find()
        .filter(
            schema::conference::Column::SeatsAvailable
                .lte(NEARLY_SOLD_OUT_SEATS)
                .and(schema::conference::Column::SeatsAvailable.gt(0)),
        )
        .order_by_asc(schema::conference::Column::Name)
        .all(&db)
        .await
        .map_err(handle_error)?;

    let announcement = if nearly_sold_out.is_empty() {
        cache.clear_announcement().await;
        String::new()
    } else {
        let announcement = format!(
            "{}{}",
            ANNOUNCEMENT_TPL,
            nearly_sold_out.iter().map(|c| c.name.as_str()).join(", ")
        );
        cache.set_announcement(&announcement).await;
        announcement
    };

    Ok(Json(AnnouncementResponse { announcement }))
}

pub async fn get_announcement_handler(
    State(cache): State<Arc<CacheManager>>,
) -> Result<Json<AnnouncementResponse>, ApiError> {
    Ok(Json(AnnouncementResponse {
        announcement: cache.announcement().await.unwrap_or_default(),
    }))
}

pub async fn get_featured_speaker_handler(
    State(cache): State<Arc<CacheManager>>,
    Path(conference_id): Path<Uuid>,
) -> Result<Json<FeaturedSpeakerResponse>, ApiError> {
    Ok(Json(FeaturedSpeakerResponse {
        message: cache.featured_speaker(conference_id).await.unwrap_or_default(),
    }))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/announcement", get(get_announcement_handler))
        .route("/announcement/refresh", post(refresh_announcement_handler))
        .route(
            "/conference/:conference_id/featured_speaker",
            get(get_featured_speaker_handler),
        )
}
