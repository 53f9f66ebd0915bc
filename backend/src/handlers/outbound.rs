//! HTTP handlers for outbound pipeline endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::outbound::{
    CreateAllocationInput, CreateLoadInput, CreateLoadLineInput, CreateOutboundOrderInput,
    CreatePackInput, CreatePackLineInput, CreatePickInput, CreateStageInput, CreateWaveInput,
    OutboundService, UpdatePickInput,
};
use crate::AppState;
use shared::models::{
    Allocation, Load, LoadLine, LoadStatus, OutboundOrder, OutboundOrderStatus, Pack, PackLine,
    PackStatus, Pick, Stage, StageStatus, Wave, WaveStatus,
};

#[derive(Debug, Deserialize)]
pub struct OrderStatusInput {
    pub status: OutboundOrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct WaveStatusInput {
    pub status: WaveStatus,
}

#[derive(Debug, Deserialize)]
pub struct WaveOrderInput {
    pub order_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct PackStatusInput {
    pub status: PackStatus,
}

#[derive(Debug, Deserialize)]
pub struct StageStatusInput {
    pub status: StageStatus,
}

#[derive(Debug, Deserialize)]
pub struct LoadStatusInput {
    pub status: LoadStatus,
}

/// Create an outbound order
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOutboundOrderInput>,
) -> AppResult<Json<OutboundOrder>> {
    let service = OutboundService::new(state.db);
    let order = service
        .create_order(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(order))
}

/// List outbound orders
pub async fn list_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<OutboundOrder>>> {
    let service = OutboundService::new(state.db);
    let orders = service.list_orders(current_user.0.branch_id).await?;
    Ok(Json(orders))
}

/// Get an outbound order
pub async fn get_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OutboundOrder>> {
    let service = OutboundService::new(state.db);
    let order = service.get_order(current_user.0.branch_id, order_id).await?;
    Ok(Json(order))
}

/// Update an outbound order's status
pub async fn update_order_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<OrderStatusInput>,
) -> AppResult<Json<OutboundOrder>> {
    let service = OutboundService::new(state.db);
    let order = service
        .update_order_status(current_user.0.branch_id, order_id, input.status)
        .await?;
    Ok(Json(order))
}

/// List allocations under an order
pub async fn list_order_allocations(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Vec<Allocation>>> {
    let service = OutboundService::new(state.db);
    let allocations = service
        .list_allocations_for_order(current_user.0.branch_id, order_id)
        .await?;
    Ok(Json(allocations))
}

/// Create a wave
pub async fn create_wave(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateWaveInput>,
) -> AppResult<Json<Wave>> {
    let service = OutboundService::new(state.db);
    let wave = service
        .create_wave(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(wave))
}

/// Attach an order to a wave
pub async fn add_order_to_wave(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(wave_id): Path<Uuid>,
    Json(input): Json<WaveOrderInput>,
) -> AppResult<Json<()>> {
    let service = OutboundService::new(state.db);
    service
        .add_order_to_wave(current_user.0.branch_id, wave_id, input.order_id)
        .await?;
    Ok(Json(()))
}

/// Update a wave's status
pub async fn update_wave_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(wave_id): Path<Uuid>,
    Json(input): Json<WaveStatusInput>,
) -> AppResult<Json<Wave>> {
    let service = OutboundService::new(state.db);
    let wave = service
        .update_wave_status(current_user.0.branch_id, wave_id, input.status)
        .await?;
    Ok(Json(wave))
}

/// Allocate a handling unit to an order within a wave
pub async fn create_allocation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateAllocationInput>,
) -> AppResult<Json<Allocation>> {
    let service = OutboundService::new(state.db);
    let allocation = service
        .create_allocation(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(allocation))
}

/// Open a pick task for an allocation
pub async fn create_pick(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePickInput>,
) -> AppResult<Json<Pick>> {
    let service = OutboundService::new(state.db);
    let pick = service
        .create_pick(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(pick))
}

/// Update a pick task
pub async fn update_pick(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(pick_id): Path<Uuid>,
    Json(input): Json<UpdatePickInput>,
) -> AppResult<Json<Pick>> {
    let service = OutboundService::new(state.db);
    let pick = service
        .update_pick(
            current_user.0.branch_id,
            current_user.0.user_id,
            pick_id,
            input,
        )
        .await?;
    Ok(Json(pick))
}

/// Create a pack session
pub async fn create_pack(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePackInput>,
) -> AppResult<Json<Pack>> {
    let service = OutboundService::new(state.db);
    let pack = service
        .create_pack(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(pack))
}

/// Close or reopen a pack session
pub async fn update_pack_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(pack_id): Path<Uuid>,
    Json(input): Json<PackStatusInput>,
) -> AppResult<Json<Pack>> {
    let service = OutboundService::new(state.db);
    let pack = service
        .update_pack_status(current_user.0.branch_id, pack_id, input.status)
        .await?;
    Ok(Json(pack))
}

/// Attach a handling unit to a pack
pub async fn create_pack_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePackLineInput>,
) -> AppResult<Json<PackLine>> {
    let service = OutboundService::new(state.db);
    let line = service
        .create_pack_line(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(line))
}

/// Create a staging record
pub async fn create_stage(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateStageInput>,
) -> AppResult<Json<Stage>> {
    let service = OutboundService::new(state.db);
    let stage = service
        .create_stage(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(stage))
}

/// Update a staging record's status
pub async fn update_stage_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stage_id): Path<Uuid>,
    Json(input): Json<StageStatusInput>,
) -> AppResult<Json<Stage>> {
    let service = OutboundService::new(state.db);
    let stage = service
        .update_stage_status(
            current_user.0.branch_id,
            current_user.0.user_id,
            stage_id,
            input.status,
        )
        .await?;
    Ok(Json(stage))
}

/// Create a load
pub async fn create_load(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateLoadInput>,
) -> AppResult<Json<Load>> {
    let service = OutboundService::new(state.db);
    let load = service
        .create_load(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(load))
}

/// Attach a handling unit to a load
pub async fn create_load_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateLoadLineInput>,
) -> AppResult<Json<LoadLine>> {
    let service = OutboundService::new(state.db);
    let line = service
        .create_load_line(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(line))
}

/// Update a load's status
pub async fn update_load_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(load_id): Path<Uuid>,
    Json(input): Json<LoadStatusInput>,
) -> AppResult<Json<Load>> {
    let service = OutboundService::new(state.db);
    let load = service
        .update_load_status(
            current_user.0.branch_id,
            current_user.0.user_id,
            load_id,
            input.status,
        )
        .await?;
    Ok(Json(load))
}
