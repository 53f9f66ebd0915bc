//! Warehouse location graph: Warehouse → Zone → Location
//!
//! Static reference data maintained by configuration. Pipeline activity never
//! mutates or cascades into these records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operating model of a warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "warehouse_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WarehouseType {
    /// Operated by the forwarder itself
    Own,
    /// Operated by a handling agent
    Agent,
}

/// A physical warehouse
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Warehouse {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub code: String,
    pub warehouse_type: WarehouseType,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A zone within a warehouse
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Zone {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub warehouse_id: Uuid,
    pub name: String,
    pub code: String,
    pub temp_min: Option<Decimal>,
    pub temp_max: Option<Decimal>,
    pub max_volume: Decimal,
    pub volume_uom_id: Option<Uuid>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Functional type of a location, one per pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "location_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Receiving,
    Qc,
    Storage,
    Pick,
    Pack,
    Stage,
    Dock,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Receiving => "RECEIVING",
            LocationType::Qc => "QC",
            LocationType::Storage => "STORAGE",
            LocationType::Pick => "PICK",
            LocationType::Pack => "PACK",
            LocationType::Stage => "STAGE",
            LocationType::Dock => "DOCK",
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A storage/handling location within a zone
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub zone_id: Uuid,
    pub code: String,
    pub name: String,
    pub location_type: LocationType,
    pub barcode: Option<String>,
    pub max_volume: Decimal,
    pub max_gross_weight: Decimal,
    pub weight_uom_id: Option<Uuid>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
