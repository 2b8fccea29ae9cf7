//! Repository for the `clients` table.

use clienter_core::client::{BoardCard, ClientStatus, Placement};
use clienter_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::client::{CardRow, Client, CreateClient, UpdateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, phone, project_description, total_amount, \
     advance_paid, status, position, created_at, updated_at";

/// Board order: columns left to right, then manual position.
const BOARD_ORDER: &str = "CASE status WHEN 'potential' THEN 0 WHEN 'ongoing' THEN 1 ELSE 2 END, \
     position, created_at";

/// Provides CRUD and board operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client at the end of its status column.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateClient,
    ) -> Result<Client, sqlx::Error> {
        let status = input.status.unwrap_or_default();
        let query = format!(
            "INSERT INTO clients
                (user_id, name, phone, project_description, total_amount, advance_paid, status, position)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), $7,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM clients WHERE user_id = $1 AND status = $7))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .bind(input.name.trim())
            .bind(&input.phone)
            .bind(&input.project_description)
            .bind(input.total_amount)
            .bind(input.advance_paid)
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a client by id, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a client and lock its row for the rest of the transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// List a user's clients in board order, optionally restricted to one column.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        status: Option<ClientStatus>,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY {BOARD_ORDER}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .bind(status.map(ClientStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Most recently created clients first.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// A status change moves the client to the end of the new column.
    /// Returns `None` if no such client exists for the user.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                project_description = COALESCE($5, project_description),
                total_amount = COALESCE($6, total_amount),
                advance_paid = COALESCE($7, advance_paid),
                position = CASE
                    WHEN $8::text IS NOT NULL AND $8 <> status THEN
                        (SELECT COALESCE(MAX(c.position) + 1, 0) FROM clients c
                         WHERE c.user_id = $2 AND c.status = $8)
                    ELSE position
                END,
                status = COALESCE($8, status)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.phone)
            .bind(&input.project_description)
            .bind(input.total_amount)
            .bind(input.advance_paid)
            .bind(input.status.map(ClientStatus::as_str))
            .fetch_optional(executor)
            .await
    }

    /// Delete a client (and, by cascade, its meetings and their reminders).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a user's clients.
    pub async fn count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Load every card on the user's board and lock the rows for the rest of
    /// the transaction, so concurrent moves serialize.
    pub async fn lock_board(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<BoardCard>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CardRow>(
            "SELECT id, status, position FROM clients WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().map(BoardCard::from).collect())
    }

    /// Write planned placements. Returns the number of rows changed.
    pub async fn apply_placements(
        conn: &mut PgConnection,
        user_id: DbId,
        placements: &[Placement],
    ) -> Result<u64, sqlx::Error> {
        let mut changed = 0;
        for placement in placements {
            let result = sqlx::query(
                "UPDATE clients SET status = $3, position = $4 \
                 WHERE id = $1 AND user_id = $2 AND (status <> $3 OR position <> $4)",
            )
            .bind(placement.id)
            .bind(user_id)
            .bind(placement.status.as_str())
            .bind(placement.position)
            .execute(&mut *conn)
            .await?;
            changed += result.rows_affected();
        }
        tracing::debug!(%user_id, planned = placements.len(), changed, "Applied board placements");
        Ok(changed)
    }
}
