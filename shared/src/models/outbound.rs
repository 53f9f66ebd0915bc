//! Outbound pipeline models: order → wave → allocation → pick → pack → stage → load

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "outbound_order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundOrderStatus {
    Draft,
    Released,
    Picking,
    Packing,
    Staged,
    Dispatched,
    Closed,
}

/// Request to ship handling units out of a warehouse
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OutboundOrder {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub shipment_id: Uuid,
    pub warehouse_id: Uuid,
    pub requested_ship_date: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub priority: i16,
    pub status: OutboundOrderStatus,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "wave_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaveStatus {
    Draft,
    Run,
    Released,
    Done,
}

/// Batch of outbound orders released together for picking
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wave {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub warehouse_id: Uuid,
    pub planned_at: DateTime<Utc>,
    pub status: WaveStatus,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reservation of a stored handling unit against an order within a wave.
/// Creating one is the ALLOCATE entry point; the move records the unit's
/// current location as both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Allocation {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub wave_id: Uuid,
    pub order_id: Uuid,
    pub handling_unit_id: Uuid,
    pub location_id: Uuid,
    pub allocated_at: DateTime<Utc>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pick_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickStatus {
    Open,
    Assigned,
    Picked,
    Cancelled,
}

/// Pick task, one per allocation. Only the transition into `Picked` produces
/// a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pick {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub allocation_id: Uuid,
    pub from_location_id: Uuid,
    pub to_location_id: Option<Uuid>,
    pub status: PickStatus,
    pub assigned_to: Option<Uuid>,
    pub picked_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pack_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackStatus {
    Open,
    Packed,
}

/// Packing session at a pack location for one order
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pack {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub order_id: Uuid,
    pub pack_location_id: Uuid,
    pub status: PackStatus,
    pub packed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attachment of a handling unit to a pack. Creating one is the PACK entry
/// point.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PackLine {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub pack_id: Uuid,
    pub handling_unit_id: Uuid,
    pub label_no: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stage_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    Open,
    Staged,
}

/// Pre-dispatch holding step for an order. The transition into `Staged` fans
/// out one STAGE move per allocation under the order.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Stage {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub order_id: Uuid,
    pub stage_location_id: Uuid,
    pub status: StageStatus,
    pub staged_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "load_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    Open,
    Loaded,
    Dispatched,
}

/// Vehicle load at a dock. The transition into `Dispatched` fans out one
/// DISPATCH move per load line and takes the units off hand.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Load {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub warehouse_id: Uuid,
    pub dock_location_id: Option<Uuid>,
    pub vehicle_no: Option<String>,
    pub driver_name: Option<String>,
    pub seal_no: Option<String>,
    pub status: LoadStatus,
    pub loaded_at: Option<DateTime<Utc>>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attachment of a handling unit (via its order) to a load. Creating one is
/// the LOAD entry point.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoadLine {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub load_id: Uuid,
    pub order_id: Uuid,
    pub handling_unit_id: Uuid,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
