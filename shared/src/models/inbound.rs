//! Inbound pipeline models: plan → receiving → QC → putaway
//!
//! Each entity records intent or completion of one inbound stage and carries
//! its own narrow status enum. Ledger effects are driven by the backend
//! orchestrator, not by these records themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inbound_plan_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundPlanStatus {
    Draft,
    Confirmed,
    Arrived,
    Closed,
}

/// Planned arrival of a shipment's handling units at a warehouse
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InboundPlan {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub shipment_id: Uuid,
    pub warehouse_id: Uuid,
    pub eta: Option<DateTime<Utc>>,
    pub dock_location_id: Option<Uuid>,
    pub status: InboundPlanStatus,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "receiving_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceivingStatus {
    Open,
    Done,
}

/// One receiving session against an inbound plan
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Receiving {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub inbound_plan_id: Uuid,
    pub receiving_location_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub status: ReceivingStatus,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Physical condition observed at receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "receiving_condition", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceivingCondition {
    Good,
    Damaged,
    Missing,
}

/// One handling unit physically received. Creating a line is the RECEIVE
/// entry point of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReceivingLine {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub receiving_id: Uuid,
    pub handling_unit_id: Uuid,
    pub condition: ReceivingCondition,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "qc_result", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QcResult {
    Pass,
    Hold,
    Fail,
}

/// Quality check, one per receiving line. `qc_location_id` may be null when a
/// unit is checked in place.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QualityCheck {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub receiving_line_id: Uuid,
    pub qc_location_id: Option<Uuid>,
    pub result: QcResult,
    pub discrepancy: Option<String>,
    pub checked_at: DateTime<Utc>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "putaway_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PutawayStatus {
    Open,
    Assigned,
    Done,
    Cancelled,
}

impl PutawayStatus {
    /// Open tasks block a second putaway for the same unit.
    pub fn is_open(&self) -> bool {
        matches!(self, PutawayStatus::Open | PutawayStatus::Assigned)
    }
}

/// Putaway task moving a received unit into storage. Only the transition into
/// `Done` produces a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Putaway {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub handling_unit_id: Uuid,
    pub from_location_id: Uuid,
    pub to_location_id: Uuid,
    pub status: PutawayStatus,
    pub assigned_to: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
