//! Profile entity model and DTOs.

use clienter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table. `id` is the auth provider's user id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub timezone: String,
    pub currency: String,
    pub default_reminder_minutes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating a profile. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
    pub default_reminder_minutes: Option<i32>,
}
