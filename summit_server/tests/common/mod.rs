use std::borrow::BorrowMut;
use std::future::Future;

use axum::body::Body;
use axum::http::{request::Builder, Request};
use axum::response::Response;
use base64::{engine::general_purpose, Engine as _};
use http_body::{combinators::UnsyncBoxBody, Body as _};
use sea_orm::prelude::Uuid;
use sea_orm::DatabaseConnection;
use summit_server::auth::{CreateUserRequest, CreateUserResponse, GetTokenResponse};
use summit_server::state::AppState;
use tower::Service;

#[derive(Default)]
pub struct FixtureOptions {
    pub mock_data: bool,
}

pub struct Fixture {
    pub app: axum::Router,
    pub auth: Auth,
}

pub enum Auth {
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

pub struct APIResponse {
    response: Response<UnsyncBoxBody<axum::body::Bytes, axum::Error>>,
}

impl APIResponse {
    pub fn status(&self) -> axum::http::StatusCode {
        self.response.status()
    }

    pub async fn json<T: serde::de::DeserializeOwned>(&mut self) -> T {
        let mut buf = Vec::new();

        let body = self.response.body_mut();

        while let Some(next) = body.data().await {
            buf.extend_from_slice(&next.unwrap());
        }
        serde_json::from_slice(&buf).unwrap()
    }

    #[allow(dead_code)]
    pub async fn text(&mut self) -> String {
        let mut buf = Vec::new();

        let body = self.response.body_mut();

        while let Some(next) = body.data().await {
            buf.extend_from_slice(&next.unwrap());
        }
        String::from_utf8(buf).unwrap()
    }
}

impl From<Response<UnsyncBoxBody<axum::body::Bytes, axum::Error>>> for APIResponse {
    fn from(response: Response<UnsyncBoxBody<axum::body::Bytes, axum::Error>>) -> Self {
        Self { response }
    }
}

impl Fixture {
    pub async fn new(options: FixtureOptions) -> Self {
        Self::new_with_setup(options, |_| async {}).await
    }

    pub async fn new_with_setup<F, Fut>(options: FixtureOptions, setup_func: F) -> Self
    where
        F: FnOnce(DatabaseConnection) -> Fut,
        Fut: Future<Output = ()>,
    {
        let state = AppState::new_test_app().await;
        if options.mock_data {
            summit_entities::mock::setup_mock_data(&state.db)
                .await
                .expect("Failed to seed mock data");
        }
        setup_func(state.db.clone()).await;
        let app = summit_server::app_with_state(state).await;

        Self {
            app,
            auth: Auth::None,
        }
    }

    #[allow(dead_code)]
    pub async fn default() -> Self {
        Self::new(FixtureOptions::default()).await
    }

    #[allow(dead_code)]
    pub async fn with_mock_data() -> Self {
        Self::new(FixtureOptions { mock_data: true }).await
    }

    /// Create a user through the API and switch the fixture to their
    /// basic-auth credentials.
    #[allow(dead_code)]
    pub async fn create_user_and_login(&mut self) -> Uuid {
        let mut response = self
            .post_json(
                "/api/users",
                CreateUserRequest {
                    password: "testtest".to_string(),
                    display_name: Some("Test User".to_string()),
                    main_email: Some("test@example.org".to_string()),
                },
            )
            .await;
        assert_eq!(response.status(), 200);
        let body = response.json::<CreateUserResponse>().await;

        self.auth = Auth::Basic {
            username: body.uuid.to_string(),
            password: "testtest".to_string(),
        };
        body.uuid
    }

    #[allow(dead_code)]
    pub async fn create_user_and_token(&mut self) -> (Uuid, String) {
        let user_id = self.create_user_and_login().await;

        let mut response = self.post_json_no_body("/api/tokens").await;
        assert_eq!(response.status(), 200);
        let token: GetTokenResponse = response.json().await;
        (user_id, token.token)
    }

    fn get_base_request(&self) -> Builder {
        let builder = Request::builder();

        match &self.auth {
            Auth::None => builder,
            Auth::Basic { username, password } => builder.header(
                "Authorization",
                format!(
                    "Basic {}",
                    general_purpose::STANDARD.encode(format!("{}:{}", username, password))
                ),
            ),
            Auth::Bearer { token } => {
                builder.header("Authorization", format!("Bearer {}", token))
            }
        }
    }

    #[allow(dead_code)]
    pub async fn get(&mut self, path: &str) -> APIResponse {
        let request = self
            .get_base_request()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.app.borrow_mut().call(request).await.unwrap().into()
    }

    #[allow(dead_code)]
    pub async fn post_json<T: serde::Serialize>(&mut self, path: &str, body: T) -> APIResponse {
        let request = self
            .get_base_request()
            .method("POST")
            .header("Content-Type", "application/json")
            .uri(path)
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();
        self.app.borrow_mut().call(request).await.unwrap().into()
    }

    #[allow(dead_code)]
    pub async fn post_json_no_body(&mut self, path: &str) -> APIResponse {
        let request = self
            .get_base_request()
            .method("POST")
            .header("Content-Type", "application/json")
            .uri(path)
            .body(Body::from("{}"))
            .unwrap();
        self.app.borrow_mut().call(request).await.unwrap().into()
    }

    #[allow(dead_code)]
    pub async fn put_json<T: serde::Serialize>(&mut self, path: &str, body: T) -> APIResponse {
        let request = self
            .get_base_request()
            .method("PUT")
            .header("Content-Type", "application/json")
            .uri(path)
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();
        self.app.borrow_mut().call(request).await.unwrap().into()
    }

    #[allow(dead_code)]
    pub async fn put_no_body(&mut self, path: &str) -> APIResponse {
        let request = self
            .get_base_request()
            .method("PUT")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.app.borrow_mut().call(request).await.unwrap().into()
    }

    #[allow(dead_code)]
    pub async fn delete(&mut self, path: &str) -> APIResponse {
        let request = self
            .get_base_request()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.app.borrow_mut().call(request).await.unwrap().into()
    }
}
