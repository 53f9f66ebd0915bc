//! Outbound pipeline tests
//!
//! Allocation, staging fan-out and dispatch semantics at the model level,
//! checked through the ledger replay helpers.

use proptest::prelude::*;
use uuid::Uuid;

use shared::models::{
    replay_location, replay_on_hand, replay_status, transitioned_into, HuStatus, LoadStatus,
    MoveType, StageStatus,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// ALLOCATE records the unit's current location as both endpoints, so it
    /// must never change the replayed snapshot location
    #[test]
    fn test_allocate_preserves_location() {
        let rack = Uuid::new_v4();

        let ledger = vec![
            (MoveType::Putaway, Some(rack)),
            (MoveType::Allocate, Some(rack)),
        ];

        let types: Vec<MoveType> = ledger.iter().map(|(m, _)| *m).collect();
        assert_eq!(replay_location(&ledger), Some(rack));
        assert_eq!(replay_status(&types), HuStatus::Allocated);
    }

    /// Staging an order fans out one STAGE move per allocated unit, all to
    /// the stage location
    #[test]
    fn test_stage_fan_out_one_move_per_unit() {
        let stage_lane = Uuid::new_v4();
        let allocated_units: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        // One status change on the order, N ledger rows
        let fan_out: Vec<(Uuid, MoveType, Option<Uuid>)> = allocated_units
            .iter()
            .map(|unit| (*unit, MoveType::Stage, Some(stage_lane)))
            .collect();

        assert_eq!(fan_out.len(), allocated_units.len());
        for (_, move_type, to_location) in &fan_out {
            assert_eq!(*move_type, MoveType::Stage);
            assert_eq!(*to_location, Some(stage_lane));
        }
    }

    /// An order with zero allocations stages with zero ledger rows
    #[test]
    fn test_stage_with_no_allocations_is_a_no_op() {
        let allocated_units: Vec<Uuid> = Vec::new();
        let fan_out: Vec<Uuid> = allocated_units.iter().copied().collect();
        assert!(fan_out.is_empty());

        // Re-staging a staged order is not an edge either
        assert!(!transitioned_into(
            &StageStatus::Staged,
            &StageStatus::Staged,
            &StageStatus::Staged,
        ));
    }

    /// LOAD with no dock location leaves the snapshot at the stage lane
    #[test]
    fn test_load_without_dock_keeps_stage_location() {
        let stage_lane = Uuid::new_v4();

        let ledger = vec![
            (MoveType::Stage, Some(stage_lane)),
            (MoveType::Load, None),
        ];

        let types: Vec<MoveType> = ledger.iter().map(|(m, _)| *m).collect();
        assert_eq!(replay_status(&types), HuStatus::Loaded);
        assert_eq!(replay_location(&ledger), Some(stage_lane));
    }

    /// Dispatching a load is an edge on OPEN→DISPATCHED and LOADED→DISPATCHED
    /// but not on a re-save of a dispatched load
    #[test]
    fn test_dispatch_edge_detection() {
        assert!(transitioned_into(
            &LoadStatus::Loaded,
            &LoadStatus::Dispatched,
            &LoadStatus::Dispatched,
        ));
        assert!(transitioned_into(
            &LoadStatus::Open,
            &LoadStatus::Dispatched,
            &LoadStatus::Dispatched,
        ));
        assert!(!transitioned_into(
            &LoadStatus::Dispatched,
            &LoadStatus::Dispatched,
            &LoadStatus::Dispatched,
        ));
    }

    /// The full outbound ledger ends off hand with DISPATCHED status
    #[test]
    fn test_full_outbound_ledger() {
        let moves = [
            MoveType::Allocate,
            MoveType::Pick,
            MoveType::Pack,
            MoveType::Stage,
            MoveType::Load,
            MoveType::Dispatch,
        ];

        assert_eq!(replay_status(&moves), HuStatus::Dispatched);
        assert!(!replay_on_hand(&moves));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Dispatch fan-out: every unit on the load ends DISPATCHED and off hand,
    /// regardless of its prior ledger
    #[test]
    fn prop_dispatch_fan_out_takes_all_units_off_hand(
        histories in prop::collection::vec(
            prop::collection::vec(
                prop::sample::select(
                    MoveType::ALL
                        .iter()
                        .copied()
                        .filter(|m| *m != MoveType::Dispatch)
                        .collect::<Vec<_>>(),
                ),
                0..10,
            ),
            1..6,
        ),
    ) {
        for mut history in histories {
            history.push(MoveType::Dispatch);
            prop_assert_eq!(replay_status(&history), HuStatus::Dispatched);
            prop_assert!(!replay_on_hand(&history));
        }
    }

    /// Stage fan-out row count equals the number of allocations under the
    /// order, and a repeated stage write adds nothing
    #[test]
    fn prop_stage_fan_out_count(allocations in 0usize..10) {
        let mut rows = 0usize;
        let mut status = StageStatus::Open;

        for write in [StageStatus::Staged, StageStatus::Staged] {
            if transitioned_into(&status, &write, &StageStatus::Staged) {
                rows += allocations;
            }
            status = write;
        }

        prop_assert_eq!(rows, allocations);
    }
}
