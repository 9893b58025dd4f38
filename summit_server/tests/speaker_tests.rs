mod common;

use sea_orm::prelude::Uuid;
use sea_orm::{ActiveModelTrait, IntoActiveModel};
use serde_json::{json, Value};
use summit_entities::mock::{
    MOCK_CONFERENCE_LONDON, MOCK_SESSION_KEYNOTE, MOCK_SESSION_WORKSHOP, MOCK_SPEAKER_ADA,
    MOCK_SPEAKER_GRACE,
};
use summit_entities::schema;
use tracing_test::traced_test;

use crate::common::FixtureOptions;

#[tokio::test]
#[traced_test]
async fn test_create_speaker_requires_name() {
    let mut fixture = common::Fixture::default().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .post_json("/api/speakers", json!({"description": "No name"}))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[traced_test]
async fn test_speakers_are_listed() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let mut response = fixture.get("/api/speakers").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[traced_test]
async fn test_get_unknown_speaker_is_not_found() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let response = fixture
        .get(&format!("/api/speaker/{}", Uuid::from_u128(123456)))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_linking_writes_both_snapshot_sides() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .put_no_body(&format!(
            "/api/session/{}/speaker/{}",
            MOCK_SESSION_KEYNOTE, MOCK_SPEAKER_GRACE
        ))
        .await;
    assert_eq!(response.status(), 200);

    let mut response = fixture
        .get(&format!("/api/session/{}", MOCK_SESSION_KEYNOTE))
        .await;
    let session: Value = response.json().await;
    let speaker_names: Vec<&str> = session["speakers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert!(speaker_names.contains(&"Grace Hopper"));

    let mut response = fixture
        .get(&format!("/api/speaker/{}", MOCK_SPEAKER_GRACE))
        .await;
    let speaker: Value = response.json().await;
    let session_names: Vec<&str> = speaker["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert!(session_names.contains(&"Opening Keynote"));
}

#[tokio::test]
#[traced_test]
async fn test_double_linking_is_a_conflict() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    // Ada is already linked to the keynote by the mock data.
    let response = fixture
        .put_no_body(&format!(
            "/api/session/{}/speaker/{}",
            MOCK_SESSION_KEYNOTE, MOCK_SPEAKER_ADA
        ))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[traced_test]
async fn test_one_sided_link_is_a_consistency_error() {
    let mut fixture = common::Fixture::new_with_setup(
        FixtureOptions { mock_data: true },
        |db| async move {
            // Damage the pair on purpose: a session-side row without its
            // speaker-side mirror.
            schema::session_speaker_link::Model {
                session_id: MOCK_SESSION_WORKSHOP,
                speaker_id: MOCK_SPEAKER_ADA,
                speaker_name: "Ada Lovelace".to_string(),
            }
            .into_active_model()
            .insert(&db)
            .await
            .unwrap();
        },
    )
    .await;
    fixture.create_user_and_login().await;

    let response = fixture
        .put_no_body(&format!(
            "/api/session/{}/speaker/{}",
            MOCK_SESSION_WORKSHOP, MOCK_SPEAKER_ADA
        ))
        .await;
    assert_eq!(response.status(), 409);

    let response = fixture
        .delete(&format!(
            "/api/session/{}/speaker/{}",
            MOCK_SESSION_WORKSHOP, MOCK_SPEAKER_ADA
        ))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[traced_test]
async fn test_unlinking_removes_both_sides() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .delete(&format!(
            "/api/session/{}/speaker/{}",
            MOCK_SESSION_KEYNOTE, MOCK_SPEAKER_ADA
        ))
        .await;
    assert_eq!(response.status(), 200);

    let mut response = fixture
        .get(&format!("/api/session/{}", MOCK_SESSION_KEYNOTE))
        .await;
    let session: Value = response.json().await;
    assert_eq!(session["speakers"].as_array().unwrap().len(), 0);

    let mut response = fixture
        .get(&format!("/api/speaker/{}", MOCK_SPEAKER_ADA))
        .await;
    let speaker: Value = response.json().await;
    assert_eq!(speaker["sessions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[traced_test]
async fn test_unlinking_an_unlinked_pair_is_not_found() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .delete(&format!(
            "/api/session/{}/speaker/{}",
            MOCK_SESSION_KEYNOTE, MOCK_SPEAKER_GRACE
        ))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_second_session_in_conference_features_the_speaker() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let mut response = fixture
        .get(&format!(
            "/api/conference/{}/featured_speaker",
            MOCK_CONFERENCE_LONDON
        ))
        .await;
    let body: Value = response.json().await;
    assert_eq!(body["message"], "");

    // Grace already speaks at the workshop; the keynote makes two.
    let response = fixture
        .put_no_body(&format!(
            "/api/session/{}/speaker/{}",
            MOCK_SESSION_KEYNOTE, MOCK_SPEAKER_GRACE
        ))
        .await;
    assert_eq!(response.status(), 200);

    let mut response = fixture
        .get(&format!(
            "/api/conference/{}/featured_speaker",
            MOCK_CONFERENCE_LONDON
        ))
        .await;
    let body: Value = response.json().await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Grace Hopper"));
    assert!(message.contains("Opening Keynote"));
    assert!(message.contains("Suture Robotics Workshop"));
}

#[tokio::test]
#[traced_test]
async fn test_speaker_rename_rewrites_session_side_snapshot() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .put_json(
            &format!("/api/speaker/{}", MOCK_SPEAKER_ADA),
            json!({"name": "Ada King"}),
        )
        .await;
    assert_eq!(response.status(), 200);

    let mut response = fixture
        .get(&format!("/api/session/{}", MOCK_SESSION_KEYNOTE))
        .await;
    let session: Value = response.json().await;
    let speakers = session["speakers"].as_array().unwrap();
    assert_eq!(speakers.len(), 1);
    assert_eq!(speakers[0]["name"], "Ada King");
}

#[tokio::test]
#[traced_test]
async fn test_deleting_a_speaker_removes_links() {
    let mut fixture = common::Fixture::with_mock_data().await;
    fixture.create_user_and_login().await;

    let response = fixture
        .delete(&format!("/api/speaker/{}", MOCK_SPEAKER_ADA))
        .await;
    assert_eq!(response.status(), 200);

    let response = fixture
        .get(&format!("/api/speaker/{}", MOCK_SPEAKER_ADA))
        .await;
    assert_eq!(response.status(), 404);

    let mut response = fixture
        .get(&format!("/api/session/{}", MOCK_SESSION_KEYNOTE))
        .await;
    let session: Value = response.json().await;
    assert_eq!(session["speakers"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[traced_test]
async fn test_conference_speakers_are_collected_from_sessions() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let mut response = fixture
        .get(&format!(
            "/api/conference/{}/speakers",
            MOCK_CONFERENCE_LONDON
        ))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[traced_test]
async fn test_sessions_by_speaker_spans_conferences() {
    let mut fixture = common::Fixture::with_mock_data().await;
    let mut response = fixture
        .get(&format!("/api/sessions/by_speaker/{}", MOCK_SPEAKER_GRACE))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Suture Robotics Workshop");
}
