//! HTTP handlers for cycle count endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::cycle_count::{
    CreateCycleCountInput, CycleCountService, RecordCountLineInput,
};
use crate::AppState;
use shared::models::{CycleCount, CycleCountLine, CycleCountStatus};

#[derive(Debug, Deserialize)]
pub struct CountStatusInput {
    pub status: CycleCountStatus,
}

/// Schedule a cycle count
pub async fn create_cycle_count(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCycleCountInput>,
) -> AppResult<Json<CycleCount>> {
    let service = CycleCountService::new(state.db);
    let count = service
        .create_count(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(count))
}

/// List cycle counts
pub async fn list_cycle_counts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<CycleCount>>> {
    let service = CycleCountService::new(state.db);
    let counts = service.list_counts(current_user.0.branch_id).await?;
    Ok(Json(counts))
}

/// Update a cycle count's status
pub async fn update_cycle_count_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(count_id): Path<Uuid>,
    Json(input): Json<CountStatusInput>,
) -> AppResult<Json<CycleCount>> {
    let service = CycleCountService::new(state.db);
    let count = service
        .update_count_status(current_user.0.branch_id, count_id, input.status)
        .await?;
    Ok(Json(count))
}

/// Record a count line
pub async fn record_count_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordCountLineInput>,
) -> AppResult<Json<CycleCountLine>> {
    let service = CycleCountService::new(state.db);
    let line = service
        .record_line(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(line))
}

/// List lines under a cycle count
pub async fn list_count_lines(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(count_id): Path<Uuid>,
) -> AppResult<Json<Vec<CycleCountLine>>> {
    let service = CycleCountService::new(state.db);
    let lines = service
        .list_lines(current_user.0.branch_id, count_id)
        .await?;
    Ok(Json(lines))
}
