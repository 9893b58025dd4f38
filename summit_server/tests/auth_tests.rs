mod common;

use summit_server::auth::{CreateUserRequest, CreateUserResponse};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_create_user() {
    let response = common::Fixture::default()
        .await
        .post_json(
            "/api/users",
            CreateUserRequest {
                password: "testtest".to_string(),
                display_name: None,
                main_email: None,
            },
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[traced_test]
async fn test_can_not_create_token_without_login() {
    let response = common::Fixture::default()
        .await
        .post_json_no_body("/api/tokens")
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[traced_test]
async fn test_can_create_token_with_login() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let response = fixture.post_json_no_body("/api/tokens").await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[traced_test]
async fn test_can_not_create_token_with_wrong_password() {
    let mut fixture = common::Fixture::default().await;
    let mut response = fixture
        .post_json(
            "/api/users",
            CreateUserRequest {
                password: "testtest".to_string(),
                display_name: None,
                main_email: None,
            },
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response.json::<CreateUserResponse>().await;

    fixture.auth = common::Auth::Basic {
        username: body.uuid.to_string(),
        password: "wrong".to_string(),
    };

    let response = fixture.post_json_no_body("/api/tokens").await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[traced_test]
async fn test_bearer_token_authenticates_requests() {
    let mut fixture = common::Fixture::default().await;
    let (_user_id, token) = fixture.create_user_and_token().await;

    fixture.auth = common::Auth::Bearer { token };

    let response = fixture.get("/api/profile").await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[traced_test]
async fn test_garbage_bearer_token_is_rejected() {
    let mut fixture = common::Fixture::default().await;
    fixture.auth = common::Auth::Bearer {
        token: "AAAA".to_string(),
    };

    let response = fixture.get("/api/profile").await;
    assert_eq!(response.status(), 401);
}
