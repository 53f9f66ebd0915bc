//! HTTP handlers for move ledger and inventory snapshot endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ledger::{
    AdjustmentInput, MoveLedgerService, MoveQuery, ReplayReport, TransferInput,
};
use crate::AppState;
use shared::models::{Inventory, InventoryMove};
use shared::types::DateRange;

#[derive(Debug, Deserialize)]
pub struct OnHandFilter {
    pub location_id: Option<Uuid>,
}

/// Query the move ledger
pub async fn list_moves(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<MoveQuery>,
) -> AppResult<Json<Vec<InventoryMove>>> {
    let service = MoveLedgerService::new(state.db);
    let moves = service.list_moves(current_user.0.branch_id, query).await?;
    Ok(Json(moves))
}

/// Export the move ledger for a date range as CSV
pub async fn export_moves(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(range): Query<DateRange>,
) -> AppResult<Response> {
    let service = MoveLedgerService::new(state.db);
    let csv = service
        .export_moves_csv(current_user.0.branch_id, range)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"inventory_moves.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Record a manual transfer between locations
pub async fn record_transfer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<TransferInput>,
) -> AppResult<Json<InventoryMove>> {
    let service = MoveLedgerService::new(state.db);
    let mv = service
        .record_transfer(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(mv))
}

/// Record a manual inventory adjustment
pub async fn record_adjustment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AdjustmentInput>,
) -> AppResult<Json<InventoryMove>> {
    let service = MoveLedgerService::new(state.db);
    let mv = service
        .record_adjustment(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(mv))
}

/// Get the inventory snapshot for a handling unit
pub async fn get_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Inventory>> {
    let service = MoveLedgerService::new(state.db);
    let inventory = service
        .get_inventory(current_user.0.branch_id, unit_id)
        .await?;
    Ok(Json(inventory))
}

/// List on-hand inventory
pub async fn list_on_hand(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<OnHandFilter>,
) -> AppResult<Json<Vec<Inventory>>> {
    let service = MoveLedgerService::new(state.db);
    let rows = service
        .list_on_hand(current_user.0.branch_id, filter.location_id)
        .await?;
    Ok(Json(rows))
}

/// Replay a unit's ledger and report consistency against the stored state
pub async fn verify_replay(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<ReplayReport>> {
    let service = MoveLedgerService::new(state.db);
    let report = service
        .verify_replay(current_user.0.branch_id, unit_id)
        .await?;
    Ok(Json(report))
}
