//! Deterministic fixture data for tests. All uuids are fixed so tests can
//! reference entities directly.

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{prelude::*, ActiveValue};

use crate::domain::conference::Conference;
use crate::domain::links;
use crate::domain::profile::Profile;
use crate::domain::session::{Session, SESSION_TYPE_NOT_SPECIFIED};
use crate::domain::session_type::SessionType;
use crate::domain::speaker::Speaker;
use crate::schema;
use crate::EntityError;

pub const MOCK_ORGANIZER_ID: Uuid = Uuid::from_u128(900);

pub const MOCK_CONFERENCE_LONDON: Uuid = Uuid::from_u128(1);
pub const MOCK_CONFERENCE_BERLIN: Uuid = Uuid::from_u128(2);

pub const MOCK_SESSION_KEYNOTE: Uuid = Uuid::from_u128(11);
pub const MOCK_SESSION_WORKSHOP: Uuid = Uuid::from_u128(12);
pub const MOCK_SESSION_LATE_LECTURE: Uuid = Uuid::from_u128(13);

pub const MOCK_SPEAKER_ADA: Uuid = Uuid::from_u128(21);
pub const MOCK_SPEAKER_GRACE: Uuid = Uuid::from_u128(22);

pub struct MockData {
    pub conferences: Vec<Conference>,
    pub sessions: Vec<Session>,
    pub speakers: Vec<Speaker>,
    pub session_types: Vec<SessionType>,
}

/// Seed two conferences (one of them nearly sold out), three sessions,
/// two linked speakers and a handful of session types.
pub async fn setup_mock_data<C>(db: &C) -> Result<MockData, EntityError>
where
    C: ConnectionTrait,
{
    schema::user::ActiveModel {
        uuid: ActiveValue::Set(MOCK_ORGANIZER_ID),
        password_hash: ActiveValue::Set(String::new()),
    }
    .insert(db)
    .await?;

    Profile::new(
        MOCK_ORGANIZER_ID,
        "Mock Organizer".to_string(),
        Some("organizer@example.com".to_string()),
    )
    .save(db)
    .await?;

    let london = Conference {
        uuid: MOCK_CONFERENCE_LONDON,
        name: "Intercalary Medicine Summit".to_string(),
        description: Some("Three days of clinical robotics".to_string()),
        organizer_id: MOCK_ORGANIZER_ID,
        topics: vec![
            "Medical Innovations".to_string(),
            "Robotics".to_string(),
        ],
        city: Some("London".to_string()),
        start_date: NaiveDate::from_ymd_opt(2026, 6, 10),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 12),
        month: 6,
        max_attendees: 100,
        seats_available: 100,
    };
    london.save(db, true).await?;

    let berlin = Conference {
        uuid: MOCK_CONFERENCE_BERLIN,
        name: "Systems Programming Days".to_string(),
        description: None,
        organizer_id: MOCK_ORGANIZER_ID,
        topics: vec!["Programming Languages".to_string()],
        city: Some("Berlin".to_string()),
        start_date: NaiveDate::from_ymd_opt(2026, 9, 1),
        end_date: NaiveDate::from_ymd_opt(2026, 9, 2),
        month: 9,
        max_attendees: 40,
        seats_available: 3,
    };
    berlin.save(db, true).await?;

    let keynote = Session {
        uuid: MOCK_SESSION_KEYNOTE,
        conference_id: MOCK_CONFERENCE_LONDON,
        name: "Opening Keynote".to_string(),
        highlights: Some("State of the field".to_string()),
        duration_minutes: Some(45),
        type_of_session: "Keynote".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 6, 10),
        start_time: NaiveTime::from_hms_opt(9, 0, 0),
        speakers: vec![],
    };
    keynote.save(db, true).await?;

    let workshop = Session {
        uuid: MOCK_SESSION_WORKSHOP,
        conference_id: MOCK_CONFERENCE_LONDON,
        name: "Suture Robotics Workshop".to_string(),
        highlights: None,
        duration_minutes: Some(120),
        type_of_session: "Workshop".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 6, 11),
        start_time: NaiveTime::from_hms_opt(14, 0, 0),
        speakers: vec![],
    };
    workshop.save(db, true).await?;

    let late_lecture = Session {
        uuid: MOCK_SESSION_LATE_LECTURE,
        conference_id: MOCK_CONFERENCE_LONDON,
        name: "Evening Lecture".to_string(),
        highlights: None,
        duration_minutes: None,
        type_of_session: SESSION_TYPE_NOT_SPECIFIED.to_string(),
        date: NaiveDate::from_ymd_opt(2026, 6, 11),
        start_time: NaiveTime::from_hms_opt(20, 0, 0),
        speakers: vec![],
    };
    late_lecture.save(db, true).await?;

    let ada = Speaker {
        uuid: MOCK_SPEAKER_ADA,
        name: "Ada Lovelace".to_string(),
        description: Some("Analytical engines".to_string()),
        sessions: vec![],
    };
    ada.save(db, true).await?;

    let grace = Speaker {
        uuid: MOCK_SPEAKER_GRACE,
        name: "Grace Hopper".to_string(),
        description: None,
        sessions: vec![],
    };
    grace.save(db, true).await?;

    links::insert_link_pair(db, keynote.uuid, &keynote.name, ada.uuid, &ada.name).await?;
    links::insert_link_pair(db, workshop.uuid, &workshop.name, grace.uuid, &grace.name).await?;

    let mut session_types = Vec::new();
    for (id, label) in [(31u128, "Keynote"), (32, "Workshop"), (33, "Lecture")] {
        let session_type = SessionType {
            uuid: Uuid::from_u128(id),
            label: label.to_string(),
        };
        session_type.save(db, true).await?;
        session_types.push(session_type);
    }

    let conferences = Conference::get_many(db, vec![london.uuid, berlin.uuid]).await?;
    let sessions = Session::get_all_in_conference(db, MOCK_CONFERENCE_LONDON).await?;
    let speakers = Speaker::get_many(db, vec![ada.uuid, grace.uuid]).await?;

    Ok(MockData {
        conferences,
        sessions,
        speakers,
        session_types,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::links::{check_link_state, LinkState};
    use migration::MigratorTrait;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_mock_data_is_seeded() {
        let db = setup_db().await;
        let data = setup_mock_data(&db).await.unwrap();
        assert_eq!(data.conferences.len(), 2);
        assert_eq!(data.sessions.len(), 3);
        assert_eq!(data.speakers.len(), 2);
        assert_eq!(data.session_types.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_links_are_symmetric() {
        let db = setup_db().await;
        setup_mock_data(&db).await.unwrap();

        assert_eq!(
            check_link_state(&db, MOCK_SESSION_KEYNOTE, MOCK_SPEAKER_ADA)
                .await
                .unwrap(),
            LinkState::Linked
        );
        assert_eq!(
            check_link_state(&db, MOCK_SESSION_KEYNOTE, MOCK_SPEAKER_GRACE)
                .await
                .unwrap(),
            LinkState::Unlinked
        );
    }

    #[tokio::test]
    async fn test_one_sided_link_is_detected() {
        let db = setup_db().await;
        setup_mock_data(&db).await.unwrap();

        schema::speaker_session_link::ActiveModel {
            speaker_id: ActiveValue::Set(MOCK_SPEAKER_GRACE),
            session_id: ActiveValue::Set(MOCK_SESSION_KEYNOTE),
            session_name: ActiveValue::Set("Opening Keynote".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        let result = check_link_state(&db, MOCK_SESSION_KEYNOTE, MOCK_SPEAKER_GRACE).await;
        assert!(matches!(result, Err(EntityError::Consistency(_))));
    }
}
