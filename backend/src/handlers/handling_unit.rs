//! HTTP handlers for handling unit endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::handling_unit::{
    CreateHandlingUnitInput, HandlingUnitService, UpdateHandlingUnitInput,
};
use crate::AppState;
use shared::models::{HandlingUnit, HuStatus};

#[derive(Debug, Deserialize)]
pub struct HandlingUnitFilter {
    pub shipment_id: Option<Uuid>,
    pub status: Option<HuStatus>,
}

/// Register a handling unit
pub async fn create_handling_unit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateHandlingUnitInput>,
) -> AppResult<Json<HandlingUnit>> {
    let service = HandlingUnitService::new(state.db);
    let unit = service
        .create(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(unit))
}

/// List handling units
pub async fn list_handling_units(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<HandlingUnitFilter>,
) -> AppResult<Json<Vec<HandlingUnit>>> {
    let service = HandlingUnitService::new(state.db);
    let units = service
        .list(current_user.0.branch_id, filter.shipment_id, filter.status)
        .await?;
    Ok(Json(units))
}

/// Get a handling unit
pub async fn get_handling_unit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<HandlingUnit>> {
    let service = HandlingUnitService::new(state.db);
    let unit = service.get(current_user.0.branch_id, unit_id).await?;
    Ok(Json(unit))
}

/// Update a handling unit's descriptive attributes
pub async fn update_handling_unit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
    Json(input): Json<UpdateHandlingUnitInput>,
) -> AppResult<Json<HandlingUnit>> {
    let service = HandlingUnitService::new(state.db);
    let unit = service
        .update(current_user.0.branch_id, unit_id, input)
        .await?;
    Ok(Json(unit))
}

/// List packages consolidated onto a handling unit
pub async fn list_handling_unit_packages(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Vec<Uuid>>> {
    let service = HandlingUnitService::new(state.db);
    let packages = service
        .list_packages(current_user.0.branch_id, unit_id)
        .await?;
    Ok(Json(packages))
}

/// Deactivate a handling unit
pub async fn deactivate_handling_unit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = HandlingUnitService::new(state.db);
    service
        .deactivate(current_user.0.branch_id, unit_id)
        .await?;
    Ok(Json(()))
}
