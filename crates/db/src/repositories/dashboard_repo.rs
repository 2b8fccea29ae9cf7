//! Aggregate queries behind the dashboard.

use clienter_core::client::ClientStatus;
use clienter_core::dashboard::ClientAmounts;
use clienter_core::types::DbId;
use sqlx::{FromRow, PgPool};

#[derive(Debug, FromRow)]
struct AmountsRow {
    #[sqlx(try_from = "String")]
    status: ClientStatus,
    total_amount: Option<f64>,
    advance_paid: Option<f64>,
}

/// Read-only queries for dashboard statistics.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Financial fields of every client still counting towards revenue.
    pub async fn open_client_amounts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ClientAmounts>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AmountsRow>(
            "SELECT status, total_amount, advance_paid FROM clients \
             WHERE user_id = $1 AND status IN ('potential', 'ongoing')",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ClientAmounts {
                status: r.status,
                total_amount: r.total_amount,
                advance_paid: r.advance_paid,
            })
            .collect())
    }
}
