use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod announcement;
pub mod auth;
pub mod cache;
pub mod conference;
pub mod config;
pub mod db;
pub mod email;
pub mod profile;
pub mod registration;
pub mod response;
pub mod session;
pub mod session_type;
pub mod speaker;
pub mod state;
pub mod wishlist;

use crate::state::AppState;

pub async fn app_with_state(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth::router())
        .merge(profile::router())
        .merge(conference::router())
        .merge(registration::router())
        .merge(announcement::router())
        .merge(session::router())
        .merge(session_type::router())
        .merge(speaker::router())
        .merge(wishlist::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
