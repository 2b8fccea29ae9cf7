//! Repository for the `profiles` table.

use clienter_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpdateProfile};

const COLUMNS: &str = "id, email, full_name, timezone, currency, default_reminder_minutes, \
     created_at, updated_at";

/// Profiles are keyed by the auth provider's user id and created lazily.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Return the user's profile, creating a default row on first access.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<Profile, sqlx::Error> {
        sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(user_id)
            .execute(pool)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Apply non-`None` fields to the user's profile, creating it if needed.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, full_name, timezone, currency, default_reminder_minutes)
             VALUES ($1, $2, COALESCE($3, 'UTC'), COALESCE($4, 'USD'), COALESCE($5, 15))
             ON CONFLICT (id) DO UPDATE SET
                full_name = COALESCE($2, profiles.full_name),
                timezone = COALESCE($3, profiles.timezone),
                currency = COALESCE($4, profiles.currency),
                default_reminder_minutes = COALESCE($5, profiles.default_reminder_minutes)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.full_name)
            .bind(&input.timezone)
            .bind(&input.currency)
            .bind(input.default_reminder_minutes)
            .fetch_one(pool)
            .await
    }

    /// The user's default lead time, if a profile exists.
    pub async fn default_reminder_minutes(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT default_reminder_minutes FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
