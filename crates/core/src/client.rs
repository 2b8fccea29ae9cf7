//! Client workflow stages and kanban ordering.
//!
//! A client sits in exactly one status column and carries an explicit
//! `position` inside that column. Drag-and-drop moves are planned here as
//! pure functions; the repository layer applies the resulting positions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a client name.
pub const MAX_NAME_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Workflow stage of a client. Stored as lowercase text in `clients.status`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Potential,
    Ongoing,
    Completed,
}

impl ClientStatus {
    /// Board columns in display order.
    pub const ALL: [ClientStatus; 3] = [
        ClientStatus::Potential,
        ClientStatus::Ongoing,
        ClientStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClientStatus::Potential => "potential",
            ClientStatus::Ongoing => "ongoing",
            ClientStatus::Completed => "completed",
        }
    }

    /// Column heading shown on the board.
    pub fn label(self) -> &'static str {
        match self {
            ClientStatus::Potential => "Potential",
            ClientStatus::Ongoing => "Ongoing",
            ClientStatus::Completed => "Completed",
        }
    }

    /// Whether clients in this stage count towards open revenue.
    pub fn counts_towards_revenue(self) -> bool {
        matches!(self, ClientStatus::Potential | ClientStatus::Ongoing)
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClientStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "potential" => Ok(ClientStatus::Potential),
            "ongoing" => Ok(ClientStatus::Ongoing),
            "completed" => Ok(ClientStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "Unknown client status '{other}'. Expected one of: potential, ongoing, completed"
            ))),
        }
    }
}

impl TryFrom<String> for ClientStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a client name: non-blank and at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Client name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Client name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate the financial fields of a client.
///
/// Both amounts must be finite and non-negative, and the advance cannot
/// exceed the total when a total is known.
pub fn validate_amounts(total_amount: Option<f64>, advance_paid: Option<f64>) -> Result<(), CoreError> {
    for (name, value) in [("total_amount", total_amount), ("advance_paid", advance_paid)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }
    }
    if let (Some(total), Some(paid)) = (total_amount, advance_paid) {
        if paid > total {
            return Err(CoreError::Validation(format!(
                "advance_paid ({paid}) cannot exceed total_amount ({total})"
            )));
        }
    }
    Ok(())
}

/// Outstanding balance; missing amounts count as zero.
pub fn balance_due(total_amount: Option<f64>, advance_paid: Option<f64>) -> f64 {
    total_amount.unwrap_or(0.0) - advance_paid.unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Kanban moves
// ---------------------------------------------------------------------------

/// A card as seen by the move planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCard {
    pub id: DbId,
    pub status: ClientStatus,
    pub position: i32,
}

/// New placement for a single card after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub id: DbId,
    pub status: ClientStatus,
    pub position: i32,
}

/// Plan a drag-and-drop move of `client_id` into `to_status` at `to_index`.
///
/// `cards` is the current content of every affected column (at least the
/// source and target columns). Returns the placements of every card in the
/// source and target columns, renumbered densely from 0. `to_index` is
/// clamped to the end of the target column.
pub fn plan_move(
    cards: &[BoardCard],
    client_id: DbId,
    to_status: ClientStatus,
    to_index: usize,
) -> Result<Vec<Placement>, CoreError> {
    let moving = cards
        .iter()
        .find(|c| c.id == client_id)
        .copied()
        .ok_or(CoreError::NotFound {
            entity: "Client",
            id: client_id,
        })?;

    let column = |status: ClientStatus| -> Vec<BoardCard> {
        let mut col: Vec<BoardCard> = cards
            .iter()
            .filter(|c| c.status == status && c.id != client_id)
            .copied()
            .collect();
        col.sort_by_key(|c| c.position);
        col
    };

    let mut target = column(to_status);
    let index = to_index.min(target.len());
    target.insert(
        index,
        BoardCard {
            status: to_status,
            ..moving
        },
    );

    let mut placements = renumber(&target, to_status);
    if moving.status != to_status {
        placements.extend(renumber(&column(moving.status), moving.status));
    }
    Ok(placements)
}

fn renumber(column: &[BoardCard], status: ClientStatus) -> Vec<Placement> {
    column
        .iter()
        .enumerate()
        .map(|(i, c)| Placement {
            id: c.id,
            status,
            position: i as i32,
        })
        .collect()
}
