//! Integration tests for meetings and their reminders.
//!
//! Exercises `MeetingRepo`, `ReminderRepo` and `ProfileRepo` together:
//! - Every meeting owns exactly one reminder
//! - Rescheduling moves and re-arms the reminder
//! - Pending queries honour the cutoff, dismissal and ordering
//! - Deleting a client or meeting cascades

use chrono::{Duration, DurationRound, Utc};
use clienter_core::meeting::MeetingPatch;
use clienter_core::types::Timestamp;
use clienter_db::models::client::CreateClient;
use clienter_db::models::meeting::CreateMeeting;
use clienter_db::models::profile::UpdateProfile;
use clienter_db::repositories::{ClientRepo, DashboardRepo, MeetingRepo, ProfileRepo, ReminderRepo};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Postgres stores microseconds; truncate so comparisons are exact.
fn now() -> Timestamp {
    Utc::now()
        .duration_trunc(Duration::seconds(1))
        .expect("truncation fits")
}

fn new_meeting(client_id: Option<Uuid>, title: &str, at: Timestamp, lead: i32) -> CreateMeeting {
    CreateMeeting {
        client_id,
        title: title.to_string(),
        description: None,
        meeting_time: at,
        duration_minutes: 60,
        meeting_link: None,
        reminder_minutes: lead,
    }
}

async fn seed_client(pool: &PgPool, user: Uuid, name: &str) -> Uuid {
    let input = CreateClient {
        name: name.to_string(),
        phone: None,
        project_description: None,
        total_amount: Some(1000.0),
        advance_paid: Some(250.0),
        status: None,
    };
    ClientRepo::create(pool, user, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_meeting_creates_single_reminder(pool: PgPool) {
    let user = Uuid::new_v4();
    let at = now() + Duration::hours(2);

    let (meeting, reminder) =
        MeetingRepo::create_with_reminder(&pool, user, &new_meeting(None, "Kickoff", at, 15))
            .await
            .unwrap();

    assert_eq!(reminder.meeting_id, meeting.id);
    assert_eq!(reminder.remind_at, at - Duration::minutes(15));
    assert!(!reminder.is_dismissed);

    // A second reminder for the same meeting violates the unique constraint.
    let mut tx = pool.begin().await.unwrap();
    let err = ReminderRepo::create(&mut tx, user, meeting.id, at)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_reminders_meeting"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_id_includes_client_name(pool: PgPool) {
    let user = Uuid::new_v4();
    let client_id = seed_client(&pool, user, "Acme").await;
    let (meeting, _) = MeetingRepo::create_with_reminder(
        &pool,
        user,
        &new_meeting(Some(client_id), "Review", now() + Duration::days(1), 30),
    )
    .await
    .unwrap();

    let found = MeetingRepo::find_by_id(&pool, user, meeting.id)
        .await
        .unwrap()
        .expect("meeting exists");
    assert_eq!(found.meeting.title, "Review");
    assert_eq!(found.client_name.as_deref(), Some("Acme"));

    let for_client = MeetingRepo::list_for_client(&pool, user, client_id)
        .await
        .unwrap();
    assert_eq!(for_client.len(), 1);
}

// ---------------------------------------------------------------------------
// Rescheduling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reschedule_moves_and_rearms_reminder(pool: PgPool) {
    let user = Uuid::new_v4();
    let at = now() + Duration::hours(3);
    let (meeting, reminder) =
        MeetingRepo::create_with_reminder(&pool, user, &new_meeting(None, "Sync", at, 15))
            .await
            .unwrap();

    assert!(ReminderRepo::dismiss(&pool, user, reminder.id, now())
        .await
        .unwrap());

    let new_time = at + Duration::days(1);
    let patch = MeetingPatch {
        meeting_time: Some(new_time),
        reminder_minutes: Some(60),
        ..Default::default()
    };
    let updated = MeetingRepo::update(&pool, user, meeting.id, &patch)
        .await
        .unwrap()
        .expect("meeting exists");
    assert_eq!(updated.meeting_time, new_time);
    assert_eq!(updated.reminder_minutes, 60);

    let rearmed = ReminderRepo::find_by_meeting(&pool, user, meeting.id)
        .await
        .unwrap()
        .expect("reminder exists");
    assert_eq!(rearmed.id, reminder.id);
    assert_eq!(rearmed.remind_at, new_time - Duration::minutes(60));
    assert!(!rearmed.is_dismissed);
    assert!(rearmed.dismissed_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_edit_leaves_reminder_alone(pool: PgPool) {
    let user = Uuid::new_v4();
    let (meeting, reminder) = MeetingRepo::create_with_reminder(
        &pool,
        user,
        &new_meeting(None, "Sync", now() + Duration::hours(3), 15),
    )
    .await
    .unwrap();
    ReminderRepo::dismiss(&pool, user, reminder.id, now())
        .await
        .unwrap();

    let patch = MeetingPatch {
        title: Some("Weekly sync".into()),
        ..Default::default()
    };
    MeetingRepo::update(&pool, user, meeting.id, &patch)
        .await
        .unwrap();

    let after = ReminderRepo::find_by_meeting(&pool, user, meeting.id)
        .await
        .unwrap()
        .unwrap();
    assert!(after.is_dismissed, "non-schedule edits keep dismissal");
}

// ---------------------------------------------------------------------------
// Pending reminders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_pending_applies_cutoff_and_order(pool: PgPool) {
    let user = Uuid::new_v4();
    let now = now();

    // remind_at = meeting_time - lead; all with lead 0 for clarity.
    let stale = now - Duration::minutes(10);
    let recent = now - Duration::minutes(2);
    let later = now + Duration::hours(1);
    for (title, at) in [("later", later), ("stale", stale), ("recent", recent)] {
        MeetingRepo::create_with_reminder(&pool, user, &new_meeting(None, title, at, 0))
            .await
            .unwrap();
    }

    let cutoff = now - Duration::minutes(5);
    let pending = ReminderRepo::list_pending(&pool, user, Some(cutoff), None)
        .await
        .unwrap();
    let titles: Vec<_> = pending.iter().map(|r| r.meeting.title.as_str()).collect();
    assert_eq!(titles, vec!["recent", "later"]);

    let all = ReminderRepo::list_pending(&pool, user, None, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].meeting.title, "stale");

    let limited = ReminderRepo::list_pending(&pool, user, None, Some(1))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dismissed_reminders_are_excluded(pool: PgPool) {
    let user = Uuid::new_v4();
    let client_id = seed_client(&pool, user, "Acme").await;
    let (_, reminder) = MeetingRepo::create_with_reminder(
        &pool,
        user,
        &new_meeting(Some(client_id), "Call", now() + Duration::minutes(10), 15),
    )
    .await
    .unwrap();

    let before = ReminderRepo::list_pending(&pool, user, None, None)
        .await
        .unwrap();
    assert_eq!(before.len(), 1);
    let client = before[0].meeting.client.as_ref().expect("client joined");
    assert_eq!(client.name, "Acme");

    assert!(ReminderRepo::dismiss(&pool, user, reminder.id, now())
        .await
        .unwrap());
    let after = ReminderRepo::list_pending(&pool, user, None, None)
        .await
        .unwrap();
    assert!(after.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dismiss_unknown_or_foreign_reminder(pool: PgPool) {
    let owner = Uuid::new_v4();
    let (_, reminder) = MeetingRepo::create_with_reminder(
        &pool,
        owner,
        &new_meeting(None, "Call", now() + Duration::hours(1), 15),
    )
    .await
    .unwrap();

    assert!(!ReminderRepo::dismiss(&pool, owner, Uuid::new_v4(), now())
        .await
        .unwrap());
    assert!(!ReminderRepo::dismiss(&pool, Uuid::new_v4(), reminder.id, now())
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_delete_cascades_to_meetings_and_reminders(pool: PgPool) {
    let user = Uuid::new_v4();
    let client_id = seed_client(&pool, user, "Acme").await;
    let (meeting, _) = MeetingRepo::create_with_reminder(
        &pool,
        user,
        &new_meeting(Some(client_id), "Call", now() + Duration::hours(1), 15),
    )
    .await
    .unwrap();

    assert!(ClientRepo::delete(&pool, user, client_id).await.unwrap());

    assert!(MeetingRepo::find_by_id(&pool, user, meeting.id)
        .await
        .unwrap()
        .is_none());
    assert!(ReminderRepo::find_by_meeting(&pool, user, meeting.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_meeting_delete_cascades_to_reminder(pool: PgPool) {
    let user = Uuid::new_v4();
    let (meeting, _) = MeetingRepo::create_with_reminder(
        &pool,
        user,
        &new_meeting(None, "Call", now() + Duration::hours(1), 15),
    )
    .await
    .unwrap();

    assert!(MeetingRepo::delete(&pool, user, meeting.id).await.unwrap());
    assert_eq!(MeetingRepo::count(&pool, user).await.unwrap(), 0);
    assert!(ReminderRepo::list_pending(&pool, user, None, None)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Profiles and dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_created_lazily_with_defaults(pool: PgPool) {
    let user = Uuid::new_v4();
    assert_eq!(
        ProfileRepo::default_reminder_minutes(&pool, user)
            .await
            .unwrap(),
        None
    );

    let profile = ProfileRepo::get_or_create(&pool, user).await.unwrap();
    assert_eq!(profile.default_reminder_minutes, 15);
    assert_eq!(profile.currency, "USD");

    let patch = UpdateProfile {
        default_reminder_minutes: Some(45),
        ..Default::default()
    };
    let updated = ProfileRepo::update(&pool, user, &patch).await.unwrap();
    assert_eq!(updated.default_reminder_minutes, 45);
    assert_eq!(updated.timezone, "UTC");
    assert_eq!(
        ProfileRepo::default_reminder_minutes(&pool, user)
            .await
            .unwrap(),
        Some(45)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_open_client_amounts_skip_completed(pool: PgPool) {
    let user = Uuid::new_v4();
    seed_client(&pool, user, "Acme").await;
    let done = CreateClient {
        name: "Done Inc".into(),
        phone: None,
        project_description: None,
        total_amount: Some(9999.0),
        advance_paid: None,
        status: Some(clienter_core::client::ClientStatus::Completed),
    };
    ClientRepo::create(&pool, user, &done).await.unwrap();

    let amounts = DashboardRepo::open_client_amounts(&pool, user).await.unwrap();
    assert_eq!(amounts.len(), 1);
    assert_eq!(amounts[0].total_amount, Some(1000.0));
    assert_eq!(amounts[0].advance_paid, Some(250.0));
}
