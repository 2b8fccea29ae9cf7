//! Repository for the `reminders` table.

use clienter_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::reminder::{Reminder, ReminderJoinRow, ReminderWithMeeting};

/// Column list for plain `reminders` queries.
const COLUMNS: &str =
    "id, user_id, meeting_id, remind_at, is_dismissed, dismissed_at, created_at";

/// Columns for the reminder + meeting + client join, matching `ReminderJoinRow`.
const JOINED_COLUMNS: &str = "r.id, r.user_id, r.meeting_id, r.remind_at, r.is_dismissed, \
     r.dismissed_at, m.title AS meeting_title, m.description AS meeting_description, \
     m.meeting_time, m.duration_minutes, m.meeting_link, c.id AS client_id, c.name AS client_name";

/// Provides reminder queries for the reminder engine, the notification
/// center and the dashboard.
pub struct ReminderRepo;

impl ReminderRepo {
    /// Insert the reminder for a freshly created meeting.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        meeting_id: DbId,
        remind_at: Timestamp,
    ) -> Result<Reminder, sqlx::Error> {
        let query = format!(
            "INSERT INTO reminders (user_id, meeting_id, remind_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(user_id)
            .bind(meeting_id)
            .bind(remind_at)
            .fetch_one(conn)
            .await
    }

    /// Move a meeting's reminder to a new due time and re-arm it.
    pub async fn reschedule(
        conn: &mut PgConnection,
        meeting_id: DbId,
        remind_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reminders \
             SET remind_at = $2, is_dismissed = false, dismissed_at = NULL \
             WHERE meeting_id = $1",
        )
        .bind(meeting_id)
        .bind(remind_at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find the reminder belonging to a meeting.
    pub async fn find_by_meeting(
        pool: &PgPool,
        user_id: DbId,
        meeting_id: DbId,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reminders WHERE meeting_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(meeting_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List undismissed reminders with their meeting, earliest first.
    ///
    /// When `since` is set, only reminders with `remind_at >= since` are
    /// returned. A `None` limit returns every matching row.
    pub async fn list_pending(
        pool: &PgPool,
        user_id: DbId,
        since: Option<Timestamp>,
        limit: Option<i64>,
    ) -> Result<Vec<ReminderWithMeeting>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM reminders r \
             JOIN meetings m ON m.id = r.meeting_id \
             LEFT JOIN clients c ON c.id = m.client_id \
             WHERE r.user_id = $1 AND r.is_dismissed = false \
               AND ($2::timestamptz IS NULL OR r.remind_at >= $2) \
             ORDER BY r.remind_at ASC \
             LIMIT $3"
        );
        let rows = sqlx::query_as::<_, ReminderJoinRow>(&query)
            .bind(user_id)
            .bind(since)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(ReminderWithMeeting::from).collect())
    }

    /// Mark a reminder dismissed at `at`.
    ///
    /// Returns `true` if the reminder exists for the user. Dismissing an
    /// already dismissed reminder overwrites `dismissed_at` (last write wins).
    pub async fn dismiss(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reminders \
             SET is_dismissed = true, dismissed_at = $3 \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
