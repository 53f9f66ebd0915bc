//! Handling unit models
//!
//! A handling unit is one physical load (carton, pallet, crate, bag or
//! container) belonging to a shipment. Its `status` field is a cache of the
//! move ledger and is only ever written through the ledger path.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Physical form of a handling unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "hu_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HuType {
    Carton,
    Pallet,
    Crate,
    Bag,
    Container,
}

impl HuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HuType::Carton => "CARTON",
            HuType::Pallet => "PALLET",
            HuType::Crate => "CRATE",
            HuType::Bag => "BAG",
            HuType::Container => "CONTAINER",
        }
    }
}

/// Pipeline status of a handling unit, driven exclusively by the move ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "hu_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HuStatus {
    Planned,
    Received,
    QcHold,
    Stored,
    Allocated,
    Picked,
    Packed,
    Staged,
    Loaded,
    Dispatched,
}

impl HuStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HuStatus::Planned => "PLANNED",
            HuStatus::Received => "RECEIVED",
            HuStatus::QcHold => "QC_HOLD",
            HuStatus::Stored => "STORED",
            HuStatus::Allocated => "ALLOCATED",
            HuStatus::Picked => "PICKED",
            HuStatus::Packed => "PACKED",
            HuStatus::Staged => "STAGED",
            HuStatus::Loaded => "LOADED",
            HuStatus::Dispatched => "DISPATCHED",
        }
    }

    /// Terminal status: no further moves may be logged for the unit.
    pub fn is_terminal(&self) -> bool {
        matches!(self, HuStatus::Dispatched)
    }
}

impl std::fmt::Display for HuStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A handling unit tracked through the warehouse
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HandlingUnit {
    pub id: Uuid,
    pub branch_id: Uuid,
    /// Shipment the unit belongs to (external domain, read-only reference)
    pub shipment_id: Uuid,
    /// External label printed on the unit
    pub hu_code: String,
    pub hu_type: HuType,
    pub status: HuStatus,
    pub gross_weight: Decimal,
    pub net_weight: Decimal,
    pub volume: Decimal,
    pub weight_uom_id: Option<Uuid>,
    pub volume_uom_id: Option<Uuid>,
    pub container_no: Option<String>,
    pub seal_no: Option<String>,
    pub barcode: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
