//! Repository for the `meetings` table.
//!
//! Meetings own exactly one reminder. Creation and rescheduling write the
//! meeting and its reminder in one transaction; deletion relies on the
//! `ON DELETE CASCADE` foreign key.

use clienter_core::meeting::{remind_at, MeetingPatch};
use clienter_core::types::DbId;
use sqlx::PgPool;

use crate::models::meeting::{CreateMeeting, Meeting, MeetingWithClient};
use crate::models::reminder::Reminder;
use crate::repositories::ReminderRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, client_id, title, description, meeting_time, \
     duration_minutes, meeting_link, reminder_minutes, created_at, updated_at";

/// Same columns, qualified for joins against `clients`.
const JOINED_COLUMNS: &str = "m.id, m.user_id, m.client_id, m.title, m.description, \
     m.meeting_time, m.duration_minutes, m.meeting_link, m.reminder_minutes, \
     m.created_at, m.updated_at, c.name AS client_name";

/// Provides CRUD operations for meetings.
pub struct MeetingRepo;

impl MeetingRepo {
    /// Insert a meeting together with its single reminder.
    ///
    /// The reminder is due `reminder_minutes` before `meeting_time`.
    pub async fn create_with_reminder(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateMeeting,
    ) -> Result<(Meeting, Reminder), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO meetings
                (user_id, client_id, title, description, meeting_time,
                 duration_minutes, meeting_link, reminder_minutes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let meeting = sqlx::query_as::<_, Meeting>(&query)
            .bind(user_id)
            .bind(input.client_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.meeting_time)
            .bind(input.duration_minutes)
            .bind(&input.meeting_link)
            .bind(input.reminder_minutes)
            .fetch_one(&mut *tx)
            .await?;

        let due = remind_at(meeting.meeting_time, meeting.reminder_minutes);
        let reminder = ReminderRepo::create(&mut *tx, user_id, meeting.id, due).await?;

        tx.commit().await?;
        Ok((meeting, reminder))
    }

    /// Find a meeting by id, with its client's name.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<MeetingWithClient>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM meetings m \
             LEFT JOIN clients c ON c.id = m.client_id \
             WHERE m.id = $1 AND m.user_id = $2"
        );
        sqlx::query_as::<_, MeetingWithClient>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's meetings in chronological order.
    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<MeetingWithClient>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM meetings m \
             LEFT JOIN clients c ON c.id = m.client_id \
             WHERE m.user_id = $1 \
             ORDER BY m.meeting_time ASC"
        );
        sqlx::query_as::<_, MeetingWithClient>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List the meetings held with one client, most recent first.
    pub async fn list_for_client(
        pool: &PgPool,
        user_id: DbId,
        client_id: DbId,
    ) -> Result<Vec<Meeting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meetings \
             WHERE user_id = $1 AND client_id = $2 \
             ORDER BY meeting_time DESC"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(user_id)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Update a meeting. Only non-`None` fields in `input` are applied.
    ///
    /// When the meeting time or lead time changes, the reminder is moved to
    /// the new due time and re-armed. Returns `None` if no such meeting
    /// exists for the user.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &MeetingPatch,
    ) -> Result<Option<Meeting>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE meetings SET
                client_id = COALESCE($3, client_id),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                meeting_time = COALESCE($6, meeting_time),
                duration_minutes = COALESCE($7, duration_minutes),
                meeting_link = COALESCE($8, meeting_link),
                reminder_minutes = COALESCE($9, reminder_minutes)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let meeting = sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.client_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.meeting_time)
            .bind(input.duration_minutes)
            .bind(&input.meeting_link)
            .bind(input.reminder_minutes)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(meeting) = meeting else {
            return Ok(None);
        };

        if input.reschedules_reminder() {
            let due = remind_at(meeting.meeting_time, meeting.reminder_minutes);
            ReminderRepo::reschedule(&mut *tx, meeting.id, due).await?;
        }

        tx.commit().await?;
        Ok(Some(meeting))
    }

    /// Delete a meeting and, by cascade, its reminder.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a user's meetings.
    pub async fn count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM meetings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
