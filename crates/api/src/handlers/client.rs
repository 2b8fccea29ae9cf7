//! Handlers for the `/clients` resource and the kanban board.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use clienter_core::client::{balance_due, plan_move, validate_amounts, validate_name, ClientStatus};
use clienter_core::error::CoreError;
use clienter_core::types::DbId;
use clienter_db::models::client::{Client, CreateClient, MoveClient, UpdateClient};
use clienter_db::models::meeting::Meeting;
use clienter_db::repositories::{ClientRepo, MeetingRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    pub status: Option<ClientStatus>,
}

/// A client with its outstanding balance.
#[derive(Debug, Serialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,
    pub balance_due: f64,
}

impl From<Client> for ClientDetail {
    fn from(client: Client) -> Self {
        let balance_due = balance_due(client.total_amount, Some(client.advance_paid));
        Self {
            client,
            balance_due,
        }
    }
}

/// One kanban column.
#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub status: ClientStatus,
    pub label: &'static str,
    pub count: usize,
    pub clients: Vec<Client>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Client",
        id,
    })
}

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    validate_name(&input.name)?;
    validate_amounts(input.total_amount, input.advance_paid)?;

    let client = ClientRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = %user.user_id, client_id = %client.id, "Client created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(client))))
}

/// GET /api/v1/clients?status=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListClientsQuery>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let clients = ClientRepo::list(&state.pool, user.user_id, query.status).await?;
    Ok(Json(DataResponse::new(clients)))
}

/// GET /api/v1/clients/board
pub async fn board(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<BoardColumn>>>> {
    let clients = ClientRepo::list(&state.pool, user.user_id, None).await?;

    let columns = ClientStatus::ALL
        .into_iter()
        .map(|status| {
            let clients: Vec<Client> = clients
                .iter()
                .filter(|c| c.status == status)
                .cloned()
                .collect();
            BoardColumn {
                status,
                label: status.label(),
                count: clients.len(),
                clients,
            }
        })
        .collect();
    Ok(Json(DataResponse::new(columns)))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClientDetail>>> {
    let client = ClientRepo::find_by_id(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(client.into())))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }

    // Amounts are checked against the merged row, so it stays locked until
    // the update commits.
    let mut tx = state.pool.begin().await?;
    let existing = ClientRepo::find_for_update(&mut tx, user.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_amounts(
        input.total_amount.or(existing.total_amount),
        Some(input.advance_paid.unwrap_or(existing.advance_paid)),
    )?;

    let client = ClientRepo::update(&mut *tx, user.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tx.commit().await?;
    Ok(Json(DataResponse::new(client)))
}

/// DELETE /api/v1/clients/{id}
///
/// Also removes the client's meetings and their reminders.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ClientRepo::delete(&state.pool, user.user_id, id).await? {
        tracing::info!(user_id = %user.user_id, client_id = %id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/clients/{id}/move
///
/// Places the client at `index` in the `status` column and renumbers the
/// affected columns, all under a row lock on the user's board.
pub async fn move_card(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<MoveClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    let mut tx = state.pool.begin().await?;
    let cards = ClientRepo::lock_board(&mut tx, user.user_id).await?;
    let placements = plan_move(&cards, id, input.status, input.index)?;
    ClientRepo::apply_placements(&mut tx, user.user_id, &placements).await?;
    tx.commit().await?;

    let client = ClientRepo::find_by_id(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(client)))
}

/// GET /api/v1/clients/{id}/meetings
pub async fn list_meetings(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Meeting>>>> {
    ClientRepo::find_by_id(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let meetings = MeetingRepo::list_for_client(&state.pool, user.user_id, id).await?;
    Ok(Json(DataResponse::new(meetings)))
}
