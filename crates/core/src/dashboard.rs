//! Dashboard revenue aggregation.

use serde::Serialize;

use crate::client::ClientStatus;

/// Financial fields of one client as read for the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct ClientAmounts {
    pub status: ClientStatus,
    pub total_amount: Option<f64>,
    pub advance_paid: Option<f64>,
}

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub clients: i64,
    pub meetings: i64,
    pub total_revenue: f64,
    pub total_paid: f64,
    pub total_due: f64,
}

/// Revenue totals over clients whose stage still counts towards revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Revenue {
    pub total_revenue: f64,
    pub total_paid: f64,
    pub total_due: f64,
}

/// Sum revenue across open clients (potential and ongoing).
pub fn summarize_revenue(clients: &[ClientAmounts]) -> Revenue {
    let (total_revenue, total_paid) = clients
        .iter()
        .filter(|c| c.status.counts_towards_revenue())
        .fold((0.0, 0.0), |(rev, paid), c| {
            (
                rev + c.total_amount.unwrap_or(0.0),
                paid + c.advance_paid.unwrap_or(0.0),
            )
        });

    Revenue {
        total_revenue,
        total_paid,
        total_due: total_revenue - total_paid,
    }
}

impl DashboardStats {
    pub fn new(clients: i64, meetings: i64, revenue: Revenue) -> Self {
        Self {
            clients,
            meetings,
            total_revenue: revenue.total_revenue,
            total_paid: revenue.total_paid,
            total_due: revenue.total_due,
        }
    }
}
