//! Cycle counting models
//!
//! Counts reconcile the inventory snapshot against what is physically on the
//! floor. A count line that finds a unit somewhere else produces an ADJUST
//! move, which relocates without touching pipeline status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cycle_count_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleCountStatus {
    Planned,
    InProgress,
    Done,
}

/// Scheduled count of a warehouse
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CycleCount {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub warehouse_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub status: CycleCountStatus,
    pub note: Option<String>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One counted location/unit pair
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CycleCountLine {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub cycle_count_id: Uuid,
    pub location_id: Uuid,
    pub handling_unit_id: Option<Uuid>,
    pub expected_present: bool,
    pub found_present: bool,
    pub note: Option<String>,
    pub counted_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
