mod common;

use sea_orm::prelude::Uuid;
use serde_json::{json, Value};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_session_types_are_listed() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let mut response = fixture.get("/api/session_types").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[traced_test]
async fn test_create_session_type_requires_auth() {
    let response = common::Fixture::default()
        .await
        .post_json("/api/session_types", json!({"label": "Panel"}))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[traced_test]
async fn test_create_session_type_requires_label() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let response = fixture.post_json("/api/session_types", json!({})).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[traced_test]
async fn test_duplicate_session_type_label_is_rejected() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .post_json("/api/session_types", json!({"label": "Workshop"}))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[traced_test]
async fn test_session_type_round_trip() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let mut response = fixture
        .post_json("/api/session_types", json!({"label": "Panel"}))
        .await;
    assert_eq!(response.status(), 200);
    let session_type: Value = response.json().await;
    let uuid = session_type["uuid"].as_str().unwrap().to_string();

    let response = fixture
        .delete(&format!("/api/session_type/{}", uuid))
        .await;
    assert_eq!(response.status(), 200);

    let mut response = fixture.get("/api/session_types").await;
    let body: Value = response.json().await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[traced_test]
async fn test_deleting_unknown_session_type_is_not_found() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .delete(&format!("/api/session_type/{}", Uuid::from_u128(123456)))
        .await;
    assert_eq!(response.status(), 404);
}
