//! Client entity model and DTOs.

use clienter_core::client::{BoardCard, ClientStatus};
use clienter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub project_description: Option<String>,
    pub total_amount: Option<f64>,
    pub advance_paid: f64,
    #[sqlx(try_from = "String")]
    pub status: ClientStatus,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub phone: Option<String>,
    pub project_description: Option<String>,
    pub total_amount: Option<f64>,
    /// Defaults to 0.
    pub advance_paid: Option<f64>,
    /// Defaults to `potential`.
    pub status: Option<ClientStatus>,
}

/// DTO for updating a client. All fields are optional.
///
/// Changing `status` appends the client to the end of the new column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub project_description: Option<String>,
    pub total_amount: Option<f64>,
    pub advance_paid: Option<f64>,
    pub status: Option<ClientStatus>,
}

/// DTO for a drag-and-drop move on the board.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveClient {
    pub status: ClientStatus,
    /// Zero-based index in the target column; clamped to the column length.
    pub index: usize,
}

/// Minimal row used to plan board moves.
#[derive(Debug, Clone, FromRow)]
pub struct CardRow {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub status: ClientStatus,
    pub position: i32,
}

impl From<CardRow> for BoardCard {
    fn from(row: CardRow) -> Self {
        BoardCard {
            id: row.id,
            status: row.status,
            position: row.position,
        }
    }
}
