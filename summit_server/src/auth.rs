use std::error::Error;
use std::str::FromStr;

use argon2::Argon2;
use axum::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::headers::authorization::{Basic, Bearer};
use axum::headers::Authorization;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router, TypedHeader};
use base64::Engine;
use hyper::http::request::Parts;
use rand::{thread_rng, Rng};
use sea_orm::{prelude::*, DatabaseConnection, IntoActiveModel};
use serde::{Deserialize, Serialize};
use summit_entities::domain::profile::Profile;
use summit_entities::schema;

use crate::response::{handle_error, ApiError};
use crate::state::AppState;

use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

#[derive(Debug)]
pub struct AuthenticatedUser {
    pub uuid: Uuid,
}

pub struct ExtractAuthenticatedUser(pub AuthenticatedUser);

#[async_trait]
impl FromRequestParts<AppState> for ExtractAuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let basic_header = TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state).await;

        if let Ok(basic_header) = basic_header {
            let decoded = basic_header.0;
            let user_name = decoded.username();
            let password = decoded.password();

            let user_uuid = Uuid::from_str(user_name)
                .map_err(|_| (StatusCode::BAD_REQUEST, "User ID is not formatted correctly"))?;

            let user = schema::user::Entity::find_by_id(user_uuid)
                .one(&state.db)
                .await
                .map_err(handle_error)?;

            let user = user.ok_or((StatusCode::UNAUTHORIZED, "User not found or password incorrect"))?;

            let password_hash = PasswordHash::new(&user.password_hash)
                .map_err(|_| (StatusCode::UNAUTHORIZED, "User not found or password incorrect"))?;
            let algs: &[&dyn PasswordVerifier] = &[&Argon2::default()];

            password_hash
                .verify_password(algs, password)
                .map_err(|_| (StatusCode::UNAUTHORIZED, "User not found or password incorrect"))?;

            Ok(ExtractAuthenticatedUser(AuthenticatedUser { uuid: user_uuid }))
        } else {
            let TypedHeader(bearer_header) =
                TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                    .await
                    .map_err(|_| (StatusCode::UNAUTHORIZED, "No valid authorization header found"))?;
            let key = base64::engine::general_purpose::STANDARD_NO_PAD
                .decode(bearer_header.0.token())
                .map_err(|_| (StatusCode::UNAUTHORIZED, "No valid authorization header found"))?;

            let hashed_key = hash_access_key(&key)
                .map_err(|_| (StatusCode::UNAUTHORIZED, "No valid authorization header found"))?;
            let key = schema::user_access_key::Entity::find_by_id(hashed_key)
                .one(&state.db)
                .await
                .map_err(handle_error)?;

            let key = key.ok_or((StatusCode::UNAUTHORIZED, "Bearer token invalid"))?;

            Ok(ExtractAuthenticatedUser(AuthenticatedUser { uuid: key.user_id }))
        }
    }
}

pub fn hash_password(pwd: &str) -> Result<String, Box<dyn Error>> {
    let salt = SaltString::generate(&mut thread_rng());
    let pwd = Argon2::default().hash_password(pwd.as_bytes(), &salt);

    Ok(pwd?.to_string())
}

// Access keys are high-entropy random values, so a fixed salt is enough
// and keeps the hash usable as a lookup key.
fn hash_access_key(key: &[u8]) -> Result<String, password_hash::Error> {
    let salt = SaltString::from_b64("c3VtbWl0c2FsdA")?;
    Ok(Argon2::default().hash_password(key, &salt)?.to_string())
}

pub fn create_key(key: &[u8], user_id: Uuid) -> Result<schema::user_access_key::Model, Box<dyn Error>> {
    Ok(schema::user_access_key::Model {
        key_hash: hash_access_key(key)?,
        user_id,
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub password: String,
    pub display_name: Option<String>,
    pub main_email: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub uuid: Uuid,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GetTokenResponse {
    pub token: String,
}

pub async fn create_user_handler(
    State(db): State<DatabaseConnection>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let new_user_uuid = Uuid::new_v4();
    let pwd = hash_password(&request.password)
        .map_err(|e| ApiError::new(e.to_string()))?;

    let model = schema::user::Model {
        uuid: new_user_uuid,
        password_hash: pwd,
    };

    model.into_active_model().insert(&db).await.map_err(handle_error)?;

    // Seed the profile right away when the caller told us who they are;
    // otherwise the profile endpoint creates a default one on first read.
    if request.display_name.is_some() || request.main_email.is_some() {
        let display_name = request
            .display_name
            .unwrap_or_else(|| "Anonymous User".to_string());
        Profile::new(new_user_uuid, display_name, request.main_email)
            .save(&db)
            .await?;
    }

    Ok(CreateUserResponse { uuid: new_user_uuid }.into())
}

pub async fn create_token_handler(
    State(db): State<DatabaseConnection>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
) -> Result<Json<GetTokenResponse>, ApiError> {
    let key: [u8; 32] = thread_rng().gen::<[u8; 32]>();

    let token = create_key(&key, user.uuid).map_err(|e| ApiError::new(e.to_string()))?;
    token.into_active_model().insert(&db).await.map_err(handle_error)?;

    Ok(GetTokenResponse {
        token: base64::engine::general_purpose::STANDARD_NO_PAD.encode(key),
    }
    .into())
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user_handler))
        .route("/tokens", post(create_token_handler))
}
