//! Handler for the dashboard summary.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use clienter_core::dashboard::{summarize_revenue, DashboardStats};
use clienter_core::types::DbId;
use clienter_db::models::client::Client;
use clienter_db::models::reminder::ReminderWithMeeting;
use clienter_db::repositories::{ClientRepo, DashboardRepo, MeetingRepo, ReminderRepo};
use clienter_db::DbPool;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const RECENT_CLIENTS: i64 = 5;
const UPCOMING_REMINDERS: i64 = 5;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_clients: Vec<Client>,
    pub upcoming_reminders: Vec<ReminderWithMeeting>,
}

async fn load_stats(pool: &DbPool, user_id: DbId) -> Result<DashboardStats, sqlx::Error> {
    let (clients, meetings, amounts) = tokio::try_join!(
        ClientRepo::count(pool, user_id),
        MeetingRepo::count(pool, user_id),
        DashboardRepo::open_client_amounts(pool, user_id),
    )?;
    Ok(DashboardStats::new(
        clients,
        meetings,
        summarize_revenue(&amounts),
    ))
}

/// GET /api/v1/dashboard
///
/// A failure computing the headline numbers is logged and reported as zeros
/// so the rest of the dashboard still renders.
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let stats = load_stats(&state.pool, user.user_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(user_id = %user.user_id, error = %e, "Failed to load dashboard stats");
            DashboardStats::default()
        });

    let (recent_clients, upcoming_reminders) = tokio::try_join!(
        ClientRepo::list_recent(&state.pool, user.user_id, RECENT_CLIENTS),
        ReminderRepo::list_pending(
            &state.pool,
            user.user_id,
            Some(Utc::now()),
            Some(UPCOMING_REMINDERS),
        ),
    )?;

    Ok(Json(DataResponse::new(Dashboard {
        stats,
        recent_clients,
        upcoming_reminders,
    })))
}
