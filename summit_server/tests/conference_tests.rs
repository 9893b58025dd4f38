mod common;

use sea_orm::prelude::Uuid;
use serde_json::{json, Value};
use summit_entities::mock::{MOCK_CONFERENCE_BERLIN, MOCK_CONFERENCE_LONDON};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_create_conference_requires_auth() {
    let response = common::Fixture::default()
        .await
        .post_json("/api/conferences", json!({"name": "Test Conference"}))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[traced_test]
async fn test_create_conference_requires_name() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let response = fixture.post_json("/api/conferences", json!({})).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[traced_test]
async fn test_create_conference_applies_defaults() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let mut response = fixture
        .post_json(
            "/api/conferences",
            json!({"name": "Defaulted Conference"}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let conference: Value = response.json().await;
    assert_eq!(conference["city"], "Default City");
    assert_eq!(conference["topics"], json!(["Default", "Topic"]));
    assert_eq!(conference["max_attendees"], 0);
    assert_eq!(conference["seats_available"], 0);
    assert_eq!(conference["month"], 0);
}

#[tokio::test]
#[traced_test]
async fn test_create_conference_derives_month_and_seats() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let mut response = fixture
        .post_json(
            "/api/conferences",
            json!({
                "name": "Summer Conference",
                "city": "Lisbon",
                "start_date": "2026-07-20",
                "end_date": "2026-07-22",
                "max_attendees": 50
            }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let conference: Value = response.json().await;
    assert_eq!(conference["month"], 7);
    assert_eq!(conference["seats_available"], 50);
    assert_eq!(conference["organizer_display_name"], "Test User");
}

#[tokio::test]
#[traced_test]
async fn test_get_unknown_conference_is_not_found() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let response = fixture
        .get(&format!("/api/conference/{}", Uuid::from_u128(123456)))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_get_conference_includes_organizer_display_name() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let mut response = fixture
        .get(&format!("/api/conference/{}", MOCK_CONFERENCE_LONDON))
        .await;
    assert_eq!(response.status(), 200);
    let conference: Value = response.json().await;
    assert_eq!(conference["name"], "Intercalary Medicine Summit");
    assert_eq!(conference["organizer_display_name"], "Mock Organizer");
}

#[tokio::test]
#[traced_test]
async fn test_only_the_owner_can_update_a_conference() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .put_json(
            &format!("/api/conference/{}", MOCK_CONFERENCE_LONDON),
            json!({"name": "Hijacked"}),
        )
        .await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[traced_test]
async fn test_update_conference_recomputes_month() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let mut response = fixture
        .post_json(
            "/api/conferences",
            json!({"name": "Movable Conference", "start_date": "2026-03-01"}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let conference: Value = response.json().await;
    assert_eq!(conference["month"], 3);
    let uuid = conference["uuid"].as_str().unwrap().to_string();

    let mut response = fixture
        .put_json(
            &format!("/api/conference/{}", uuid),
            json!({"start_date": "2026-11-05", "city": "Oslo"}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let conference: Value = response.json().await;
    assert_eq!(conference["month"], 11);
    assert_eq!(conference["city"], "Oslo");
    // Untouched fields survive the partial update.
    assert_eq!(conference["name"], "Movable Conference");
}

#[tokio::test]
#[traced_test]
async fn test_created_conferences_are_scoped_to_the_caller() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let mut response = fixture.get("/api/conferences/created").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    let response = fixture
        .post_json("/api/conferences", json!({"name": "My Own Conference"}))
        .await;
    assert_eq!(response.status(), 200);

    let mut response = fixture.get("/api/conferences/created").await;
    let body: Value = response.json().await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "My Own Conference");
}

#[tokio::test]
#[traced_test]
async fn test_query_conferences_by_city() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let mut response = fixture
        .post_json(
            "/api/conferences/query",
            json!({"filters": [{"field": "CITY", "operator": "EQ", "value": "London"}]}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["uuid"], MOCK_CONFERENCE_LONDON.to_string());
}

#[tokio::test]
#[traced_test]
async fn test_query_conferences_by_topic_membership() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let mut response = fixture
        .post_json(
            "/api/conferences/query",
            json!({"filters": [{"field": "TOPIC", "operator": "EQ", "value": "Programming Languages"}]}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["uuid"], MOCK_CONFERENCE_BERLIN.to_string());
}

#[tokio::test]
#[traced_test]
async fn test_query_conferences_with_inequality() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let mut response = fixture
        .post_json(
            "/api/conferences/query",
            json!({"filters": [{"field": "MAX_ATTENDEES", "operator": "GT", "value": "50"}]}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["uuid"], MOCK_CONFERENCE_LONDON.to_string());
}

#[tokio::test]
#[traced_test]
async fn test_query_conferences_rejects_two_inequality_fields() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let response = fixture
        .post_json(
            "/api/conferences/query",
            json!({"filters": [
                {"field": "CITY", "operator": "GT", "value": "A"},
                {"field": "MONTH", "operator": "LT", "value": "9"}
            ]}),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[traced_test]
async fn test_query_conferences_rejects_unknown_field() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let response = fixture
        .post_json(
            "/api/conferences/query",
            json!({"filters": [{"field": "VENUE", "operator": "EQ", "value": "London"}]}),
        )
        .await;
    assert_eq!(response.status(), 400);
}
