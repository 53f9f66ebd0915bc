//! HTTP handlers for warehouse, zone and location endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::warehouse::{
    CreateLocationInput, CreateWarehouseInput, CreateZoneInput, WarehouseService,
};
use crate::AppState;
use shared::models::{Location, LocationType, Warehouse, Zone};

/// Create a warehouse
pub async fn create_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateWarehouseInput>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .create_warehouse(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(warehouse))
}

/// List warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Warehouse>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service.list_warehouses(current_user.0.branch_id).await?;
    Ok(Json(warehouses))
}

/// Get a warehouse
pub async fn get_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .get_warehouse(current_user.0.branch_id, warehouse_id)
        .await?;
    Ok(Json(warehouse))
}

/// Deactivate a warehouse
pub async fn deactivate_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = WarehouseService::new(state.db);
    service
        .deactivate_warehouse(current_user.0.branch_id, warehouse_id)
        .await?;
    Ok(Json(()))
}

/// Create a zone
pub async fn create_zone(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateZoneInput>,
) -> AppResult<Json<Zone>> {
    let service = WarehouseService::new(state.db);
    let zone = service
        .create_zone(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(zone))
}

/// List zones under a warehouse
pub async fn list_zones(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<Vec<Zone>>> {
    let service = WarehouseService::new(state.db);
    let zones = service
        .list_zones(current_user.0.branch_id, warehouse_id)
        .await?;
    Ok(Json(zones))
}

#[derive(Debug, Deserialize)]
pub struct LocationFilter {
    pub zone_id: Option<Uuid>,
    pub location_type: Option<LocationType>,
}

/// Create a location
pub async fn create_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateLocationInput>,
) -> AppResult<Json<Location>> {
    let service = WarehouseService::new(state.db);
    let location = service
        .create_location(current_user.0.branch_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(location))
}

/// List locations, optionally filtered by zone or type
pub async fn list_locations(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<LocationFilter>,
) -> AppResult<Json<Vec<Location>>> {
    let service = WarehouseService::new(state.db);
    let locations = service
        .list_locations(current_user.0.branch_id, filter.zone_id, filter.location_type)
        .await?;
    Ok(Json(locations))
}

/// Get a location
pub async fn get_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<Location>> {
    let service = WarehouseService::new(state.db);
    let location = service
        .get_location(current_user.0.branch_id, location_id)
        .await?;
    Ok(Json(location))
}

/// Deactivate a location
pub async fn deactivate_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = WarehouseService::new(state.db);
    service
        .deactivate_location(current_user.0.branch_id, location_id)
        .await?;
    Ok(Json(()))
}
