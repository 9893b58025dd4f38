use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use itertools::Itertools;
use sea_orm::prelude::*;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use summit_entities::domain::conference::Conference;
use summit_entities::domain::profile::Profile;
use summit_entities::queries::{build_conference_query, FilterClause};
use summit_entities::schema;

use crate::auth::ExtractAuthenticatedUser;
use crate::email::{ConfirmationEmail, EmailQueue};
use crate::response::{handle_error, ApiError};
use crate::state::AppState;

const DEFAULT_CITY: &str = "Default City";

fn default_topics() -> Vec<String> {
    vec!["Default".to_string(), "Topic".to_string()]
}

/// Create and update share one request shape; absent fields are left
/// untouched on update and defaulted on create.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConferenceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub topics: Option<Vec<String>>,
    pub city: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_attendees: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConferenceResponse {
    #[serde(flatten)]
    pub conference: Conference,
    pub organizer_display_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConferenceListResponse {
    pub items: Vec<ConferenceResponse>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConferenceQueryRequest {
    #[serde(default)]
    pub filters: Vec<FilterClause>,
}

fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    // Datetime strings are accepted too; only the date part counts.
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("Invalid date: [{}]", value)))
}

/// Organizer display names for a batch of conferences, keyed by user id.
pub async fn organizer_display_names(
    db: &DatabaseConnection,
    conferences: &[Conference],
) -> Result<HashMap<Uuid, String>, ApiError> {
    let organizer_ids = conferences
        .iter()
        .map(|c| c.organizer_id)
        .unique()
        .collect_vec();
    let profiles = schema::profile::Entity::find()
        .filter(schema::profile::Column::UserId.is_in(organizer_ids))
        .all(db)
        .await
        .map_err(handle_error)?;
    Ok(profiles
        .into_iter()
        .map(|p| (p.user_id, p.display_name))
        .collect())
}

pub fn to_response_list(
    conferences: Vec<Conference>,
    names: &HashMap<Uuid, String>,
) -> ConferenceListResponse {
    ConferenceListResponse {
        items: conferences
            .into_iter()
            .map(|conference| {
                let organizer_display_name = names.get(&conference.organizer_id).cloned();
                ConferenceResponse {
                    conference,
                    organizer_display_name,
                }
            })
            .collect(),
    }
}

pub async fn create_conference_handler(
    State(db): State<DatabaseConnection>,
    State(email): State<EmailQueue>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Json(request): Json<ConferenceRequest>,
) -> Result<Json<ConferenceResponse>, ApiError> {
    let name = request
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Conference 'name' field required"))?;

    let start_date = request.start_date.as_deref().map(parse_date).transpose()?;
    let end_date = request.end_date.as_deref().map(parse_date).transpose()?;
    let max_attendees = request.max_attendees.unwrap_or(0);

    let conference = Conference {
        uuid: Uuid::new_v4(),
        name,
        description: request.description,
        organizer_id: user.uuid,
        topics: request
            .topics
            .filter(|t| !t.is_empty())
            .unwrap_or_else(default_topics),
        city: Some(
            request
                .city
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
        ),
        start_date,
        end_date,
        month: Conference::derive_month(start_date),
        max_attendees,
        seats_available: max_attendees.max(0),
    };
    conference.save(&db, true).await?;

    let organizer_profile = Profile::try_get(&db, user.uuid).await?;
    email.enqueue(ConfirmationEmail {
        recipient: organizer_profile.as_ref().and_then(|p| p.main_email.clone()),
        conference_name: conference.name.clone(),
    });

    let organizer_display_name = organizer_profile.map(|p| p.display_name);
    Ok(Json(ConferenceResponse {
        conference,
        organizer_display_name,
    }))
}

pub async fn get_conference_handler(
    State(db): State<DatabaseConnection>,
    Path(conference_id): Path<Uuid>,
) -> Result<Json<ConferenceResponse>, ApiError> {
    let conference = Conference::try_get(&db, conference_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No conference found with key: {}", conference_id))
        })?;

    let names = organizer_display_names(&db, std::slice::from_ref(&conference)).await?;
    let organizer_display_name = names.get(&conference.organizer_id).cloned();
    Ok(Json(ConferenceResponse {
        conference,
        organizer_display_name,
    }))
}

pub async fn update_conference_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Path(conference_id): Path<Uuid>,
    Json(request): Json<ConferenceRequest>,
) -> Result<Json<ConferenceResponse>, ApiError> {
    let mut conference = Conference::try_get(&db, conference_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No conference found with key: {}", conference_id))
        })?;

    if conference.organizer_id != user.uuid {
        return Err(ApiError::forbidden("Only the owner can update the conference."));
    }

    if let Some(name) = request.name.filter(|n| !n.is_empty()) {
        conference.name = name;
    }
    if let Some(description) = request.description.filter(|d| !d.is_empty()) {
        conference.description = Some(description);
    }
    if let Some(topics) = request.topics.filter(|t| !t.is_empty()) {
        conference.topics = topics;
    }
    if let Some(city) = request.city.filter(|c| !c.is_empty()) {
        conference.city = Some(city);
    }
    if let Some(start_date) = request.start_date.filter(|d| !d.is_empty()) {
        let start_date = parse_date(&start_date)?;
        conference.start_date = Some(start_date);
        conference.month = Conference::derive_month(Some(start_date));
    }
    if let Some(end_date) = request.end_date.filter(|d| !d.is_empty()) {
        conference.end_date = Some(parse_date(&end_date)?);
    }
    if let Some(max_attendees) = request.max_attendees {
        conference.max_attendees = max_attendees;
    }

    let txn = db.begin().await.map_err(handle_error)?;
    conference.save(&txn, false).await?;
    txn.commit().await.map_err(handle_error)?;

    let names = organizer_display_names(&db, std::slice::from_ref(&conference)).await?;
    let organizer_display_name = names.get(&conference.organizer_id).cloned();
    Ok(Json(ConferenceResponse {
        conference,
        organizer_display_name,
    }))
}

pub async fn get_created_conferences_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
) -> Result<Json<ConferenceListResponse>, ApiError> {
    let conferences = Conference::get_all_by_organizer(&db, user.uuid).await?;
    let names = organizer_display_names(&db, &conferences).await?;
    Ok(Json(to_response_list(conferences, &names)))
}

pub async fn query_conferences_handler(
    State(db): State<DatabaseConnection>,
    Json(request): Json<ConferenceQueryRequest>,
) -> Result<Json<ConferenceListResponse>, ApiError> {
    let query = build_conference_query(&request.filters)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let conferences = query.fetch(&db).await?;
    let names = organizer_display_names(&db, &conferences).await?;
    Ok(Json(to_response_list(conferences, &names)))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/conferences", post(create_conference_handler))
        .route("/conference/:conference_id", get(get_conference_handler))
        .route("/conference/:conference_id", put(update_conference_handler))
        .route("/conferences/created", get(get_created_conferences_handler))
        .route("/conferences/query", post(query_conferences_handler))
}
