//! Route definitions for the Warehouse Execution Core

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - location graph
        .nest("/warehouses", warehouse_routes())
        .nest("/locations", location_routes())
        // Protected routes - handling units
        .nest("/handling-units", handling_unit_routes())
        // Protected routes - move ledger and snapshot
        .nest("/inventory", inventory_routes())
        // Protected routes - inbound pipeline
        .nest("/inbound", inbound_routes())
        // Protected routes - outbound pipeline
        .nest("/outbound", outbound_routes())
        // Protected routes - cycle counting
        .nest("/cycle-counts", cycle_count_routes())
}

/// Warehouse and zone routes (protected)
fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_warehouses).post(handlers::create_warehouse))
        .route(
            "/:warehouse_id",
            get(handlers::get_warehouse).delete(handlers::deactivate_warehouse),
        )
        .route(
            "/:warehouse_id/zones",
            get(handlers::list_zones),
        )
        .route("/zones", post(handlers::create_zone))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Location routes (protected)
fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_locations).post(handlers::create_location))
        .route(
            "/:location_id",
            get(handlers::get_location).delete(handlers::deactivate_location),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Handling unit routes (protected)
fn handling_unit_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_handling_units).post(handlers::create_handling_unit),
        )
        .route(
            "/:unit_id",
            get(handlers::get_handling_unit)
                .put(handlers::update_handling_unit)
                .delete(handlers::deactivate_handling_unit),
        )
        .route("/:unit_id/packages", get(handlers::list_handling_unit_packages))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Move ledger and inventory snapshot routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        // Ledger
        .route("/moves", get(handlers::list_moves))
        .route("/moves/export", get(handlers::export_moves))
        .route("/transfers", post(handlers::record_transfer))
        .route("/adjustments", post(handlers::record_adjustment))
        // Snapshot
        .route("/on-hand", get(handlers::list_on_hand))
        .route("/units/:unit_id", get(handlers::get_inventory))
        .route("/units/:unit_id/replay", get(handlers::verify_replay))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inbound pipeline routes (protected)
fn inbound_routes() -> Router<AppState> {
    Router::new()
        // Plans
        .route("/plans", get(handlers::list_plans).post(handlers::create_plan))
        .route("/plans/:plan_id", get(handlers::get_plan))
        .route("/plans/:plan_id/status", put(handlers::update_plan_status))
        // Receiving
        .route("/receivings", post(handlers::create_receiving))
        .route("/receivings/lines", post(handlers::create_receiving_line))
        .route(
            "/receivings/:receiving_id/lines",
            get(handlers::list_receiving_lines),
        )
        // Quality checks
        .route("/quality-checks", post(handlers::create_quality_check))
        // Putaway
        .route("/putaways", get(handlers::list_putaways).post(handlers::create_putaway))
        .route("/putaways/:putaway_id", put(handlers::update_putaway))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Outbound pipeline routes (protected)
fn outbound_routes() -> Router<AppState> {
    Router::new()
        // Orders
        .route("/orders", get(handlers::list_orders).post(handlers::create_order))
        .route("/orders/:order_id", get(handlers::get_order))
        .route("/orders/:order_id/status", put(handlers::update_order_status))
        .route(
            "/orders/:order_id/allocations",
            get(handlers::list_order_allocations),
        )
        // Waves
        .route("/waves", post(handlers::create_wave))
        .route("/waves/:wave_id/orders", post(handlers::add_order_to_wave))
        .route("/waves/:wave_id/status", put(handlers::update_wave_status))
        // Allocation and picking
        .route("/allocations", post(handlers::create_allocation))
        .route("/picks", post(handlers::create_pick))
        .route("/picks/:pick_id", put(handlers::update_pick))
        // Packing
        .route("/packs", post(handlers::create_pack))
        .route("/packs/lines", post(handlers::create_pack_line))
        .route("/packs/:pack_id/status", put(handlers::update_pack_status))
        // Staging
        .route("/stages", post(handlers::create_stage))
        .route("/stages/:stage_id/status", put(handlers::update_stage_status))
        // Loading and dispatch
        .route("/loads", post(handlers::create_load))
        .route("/loads/lines", post(handlers::create_load_line))
        .route("/loads/:load_id/status", put(handlers::update_load_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Cycle count routes (protected)
fn cycle_count_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_cycle_counts).post(handlers::create_cycle_count),
        )
        .route("/:count_id/status", put(handlers::update_cycle_count_status))
        .route("/:count_id/lines", get(handlers::list_count_lines))
        .route("/lines", post(handlers::record_count_line))
        .route_layer(middleware::from_fn(auth_middleware))
}
