//! HTTP handlers for inbound pipeline endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inbound::{
    CreateInboundPlanInput, CreatePutawayInput, CreateQualityCheckInput, CreateReceivingInput,
    CreateReceivingLineInput, InboundService, UpdatePutawayInput,
};
use crate::AppState;
use shared::models::{
    InboundPlan, InboundPlanStatus, Putaway, PutawayStatus, QualityCheck, Receiving, ReceivingLine,
};

#[derive(Debug, Deserialize)]
pub struct PlanStatusInput {
    pub status: InboundPlanStatus,
}

#[derive(Debug, Deserialize)]
pub struct PutawayFilter {
    pub status: Option<PutawayStatus>,
}

/// Create an inbound plan
pub async fn create_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateInboundPlanInput>,
) -> AppResult<Json<InboundPlan>> {
    let service = InboundService::new(state.db);
    let plan = service
        .create_plan(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(plan))
}

/// List inbound plans
pub async fn list_plans(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<InboundPlan>>> {
    let service = InboundService::new(state.db);
    let plans = service.list_plans(current_user.0.branch_id).await?;
    Ok(Json(plans))
}

/// Get an inbound plan
pub async fn get_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> AppResult<Json<InboundPlan>> {
    let service = InboundService::new(state.db);
    let plan = service.get_plan(current_user.0.branch_id, plan_id).await?;
    Ok(Json(plan))
}

/// Update an inbound plan's status
pub async fn update_plan_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Json(input): Json<PlanStatusInput>,
) -> AppResult<Json<InboundPlan>> {
    let service = InboundService::new(state.db);
    let plan = service
        .update_plan_status(current_user.0.branch_id, plan_id, input.status)
        .await?;
    Ok(Json(plan))
}

/// Open a receiving session
pub async fn create_receiving(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateReceivingInput>,
) -> AppResult<Json<Receiving>> {
    let service = InboundService::new(state.db);
    let receiving = service
        .create_receiving(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(receiving))
}

/// Receive one handling unit
pub async fn create_receiving_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateReceivingLineInput>,
) -> AppResult<Json<ReceivingLine>> {
    let service = InboundService::new(state.db);
    let line = service
        .create_receiving_line(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(line))
}

/// List lines under a receiving session
pub async fn list_receiving_lines(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(receiving_id): Path<Uuid>,
) -> AppResult<Json<Vec<ReceivingLine>>> {
    let service = InboundService::new(state.db);
    let lines = service
        .list_receiving_lines(current_user.0.branch_id, receiving_id)
        .await?;
    Ok(Json(lines))
}

/// Record the quality check for a receiving line
pub async fn create_quality_check(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateQualityCheckInput>,
) -> AppResult<Json<QualityCheck>> {
    let service = InboundService::new(state.db);
    let qc = service
        .create_quality_check(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(qc))
}

/// Open a putaway task
pub async fn create_putaway(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePutawayInput>,
) -> AppResult<Json<Putaway>> {
    let service = InboundService::new(state.db);
    let putaway = service
        .create_putaway(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(putaway))
}

/// Update a putaway task
pub async fn update_putaway(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(putaway_id): Path<Uuid>,
    Json(input): Json<UpdatePutawayInput>,
) -> AppResult<Json<Putaway>> {
    let service = InboundService::new(state.db);
    let putaway = service
        .update_putaway(
            current_user.0.branch_id,
            current_user.0.user_id,
            putaway_id,
            input,
        )
        .await?;
    Ok(Json(putaway))
}

/// List putaway tasks
pub async fn list_putaways(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<PutawayFilter>,
) -> AppResult<Json<Vec<Putaway>>> {
    let service = InboundService::new(state.db);
    let putaways = service
        .list_putaways(current_user.0.branch_id, filter.status)
        .await?;
    Ok(Json(putaways))
}
