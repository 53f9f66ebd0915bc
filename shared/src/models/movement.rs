//! Move ledger and inventory snapshot models
//!
//! `InventoryMove` is the append-only source of truth for every location and
//! status change a handling unit undergoes. `Inventory` is a one-row-per-unit
//! materialized view derived from it. The handling unit's `status` field is a
//! cache of the ledger; the replay helpers here reconstruct both and are what
//! the tests check the stored state against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::handling_unit::HuStatus;

/// Type of an inventory move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "move_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveType {
    Receive,
    Qc,
    Putaway,
    Transfer,
    Allocate,
    Pick,
    Pack,
    Stage,
    Load,
    Dispatch,
    Adjust,
}

impl MoveType {
    pub const ALL: [MoveType; 11] = [
        MoveType::Receive,
        MoveType::Qc,
        MoveType::Putaway,
        MoveType::Transfer,
        MoveType::Allocate,
        MoveType::Pick,
        MoveType::Pack,
        MoveType::Stage,
        MoveType::Load,
        MoveType::Dispatch,
        MoveType::Adjust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveType::Receive => "RECEIVE",
            MoveType::Qc => "QC",
            MoveType::Putaway => "PUTAWAY",
            MoveType::Transfer => "TRANSFER",
            MoveType::Allocate => "ALLOCATE",
            MoveType::Pick => "PICK",
            MoveType::Pack => "PACK",
            MoveType::Stage => "STAGE",
            MoveType::Load => "LOAD",
            MoveType::Dispatch => "DISPATCH",
            MoveType::Adjust => "ADJUST",
        }
    }

    /// Handling-unit status implied by this move type.
    ///
    /// `Transfer` and `Adjust` relocate a unit without touching its status;
    /// every other move type maps to exactly one pipeline status.
    pub fn status_effect(&self) -> Option<HuStatus> {
        match self {
            MoveType::Receive => Some(HuStatus::Received),
            MoveType::Qc => Some(HuStatus::QcHold),
            MoveType::Putaway => Some(HuStatus::Stored),
            MoveType::Allocate => Some(HuStatus::Allocated),
            MoveType::Pick => Some(HuStatus::Picked),
            MoveType::Pack => Some(HuStatus::Packed),
            MoveType::Stage => Some(HuStatus::Staged),
            MoveType::Load => Some(HuStatus::Loaded),
            MoveType::Dispatch => Some(HuStatus::Dispatched),
            MoveType::Transfer | MoveType::Adjust => None,
        }
    }
}

impl std::fmt::Display for MoveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable ledger row. Never updated or deleted after insert.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryMove {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub handling_unit_id: Uuid,
    pub move_type: MoveType,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    /// Reference back to the pipeline record that produced this move
    pub ref_code: Option<String>,
    pub moved_at: DateTime<Utc>,
    pub note: Option<String>,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Current location snapshot, one row per handling unit.
///
/// `location_id` must equal the `to_location_id` of the unit's most recent
/// move with a non-null destination; `on_hand` goes false on dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inventory {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub handling_unit_id: Uuid,
    pub location_id: Option<Uuid>,
    pub on_hand: bool,
    pub last_moved_at: Option<DateTime<Utc>>,
    pub user_add: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Replay a unit's move types in ledger order and return the status the
/// cache field must hold.
pub fn replay_status(moves: &[MoveType]) -> HuStatus {
    moves.iter().fold(HuStatus::Planned, |status, mv| {
        mv.status_effect().unwrap_or(status)
    })
}

/// Replay `(move_type, to_location)` pairs and return the location the
/// inventory snapshot must hold: the destination of the last move that had one.
pub fn replay_location(moves: &[(MoveType, Option<Uuid>)]) -> Option<Uuid> {
    moves.iter().rev().find_map(|(_, to)| *to)
}

/// Replay move types and return whether the unit is still on hand.
pub fn replay_on_hand(moves: &[MoveType]) -> bool {
    replay_status(moves) != HuStatus::Dispatched
}

/// Edge-trigger predicate: true only when this write moved the record into
/// the target status. Re-saving a record already in the target status is not
/// an edge and must produce no ledger effect.
pub fn transitioned_into<S: PartialEq>(previous: &S, current: &S, target: &S) -> bool {
    previous != current && current == target
}
