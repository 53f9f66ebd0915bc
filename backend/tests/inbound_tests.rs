//! Inbound pipeline tests
//!
//! Receiving, QC and putaway logic at the model level: the edge-trigger
//! predicate that guards putaway completion, and the ledger sequences the
//! inbound entry points produce.

use proptest::prelude::*;
use uuid::Uuid;

use shared::models::{
    replay_location, replay_status, transitioned_into, HuStatus, MoveType, PutawayStatus,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Completing an open putaway is an edge and must log a move
    #[test]
    fn test_open_to_done_is_an_edge() {
        assert!(transitioned_into(
            &PutawayStatus::Open,
            &PutawayStatus::Done,
            &PutawayStatus::Done,
        ));
        assert!(transitioned_into(
            &PutawayStatus::Assigned,
            &PutawayStatus::Done,
            &PutawayStatus::Done,
        ));
    }

    /// Re-saving a completed putaway is not an edge: no second PUTAWAY move
    #[test]
    fn test_done_to_done_is_not_an_edge() {
        assert!(!transitioned_into(
            &PutawayStatus::Done,
            &PutawayStatus::Done,
            &PutawayStatus::Done,
        ));
    }

    /// Updates that do not reach the target status are not edges
    #[test]
    fn test_non_target_transitions_are_not_edges() {
        assert!(!transitioned_into(
            &PutawayStatus::Open,
            &PutawayStatus::Assigned,
            &PutawayStatus::Done,
        ));
        assert!(!transitioned_into(
            &PutawayStatus::Open,
            &PutawayStatus::Cancelled,
            &PutawayStatus::Done,
        ));
    }

    /// Open and assigned tasks are the ones blocking a new putaway
    #[test]
    fn test_open_statuses() {
        assert!(PutawayStatus::Open.is_open());
        assert!(PutawayStatus::Assigned.is_open());
        assert!(!PutawayStatus::Done.is_open());
        assert!(!PutawayStatus::Cancelled.is_open());
    }

    /// Receive then QC then putaway: the canonical inbound ledger leaves the
    /// unit STORED at the putaway destination
    #[test]
    fn test_inbound_ledger_sequence() {
        let receiving_bay = Uuid::new_v4();
        let qc_bench = Uuid::new_v4();
        let rack = Uuid::new_v4();

        let ledger = vec![
            (MoveType::Receive, Some(receiving_bay)),
            (MoveType::Qc, Some(qc_bench)),
            (MoveType::Putaway, Some(rack)),
        ];

        let types: Vec<MoveType> = ledger.iter().map(|(m, _)| *m).collect();
        assert_eq!(replay_status(&types), HuStatus::Stored);
        assert_eq!(replay_location(&ledger), Some(rack));
    }

    /// QC with no location (checked in place) holds the unit where it was
    /// received
    #[test]
    fn test_qc_in_place_keeps_receiving_location() {
        let receiving_bay = Uuid::new_v4();

        let ledger = vec![
            (MoveType::Receive, Some(receiving_bay)),
            (MoveType::Qc, None),
        ];

        let types: Vec<MoveType> = ledger.iter().map(|(m, _)| *m).collect();
        assert_eq!(replay_status(&types), HuStatus::QcHold);
        assert_eq!(replay_location(&ledger), Some(receiving_bay));
    }

    /// Receiving the same unit twice produces two RECEIVE rows; the status
    /// cache converges on RECEIVED either way
    #[test]
    fn test_double_receive_converges() {
        let once = [MoveType::Receive];
        let twice = [MoveType::Receive, MoveType::Receive];
        assert_eq!(replay_status(&once), replay_status(&twice));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The edge predicate fires at most once across any status history: for a
    /// monotone walk that reaches DONE and stays there, exactly one
    /// consecutive pair is an edge into DONE
    #[test]
    fn prop_edge_fires_once_per_completion(done_at in 1usize..8, tail in 0usize..4) {
        let mut history = vec![PutawayStatus::Open];
        for _ in 1..done_at {
            history.push(PutawayStatus::Assigned);
        }
        history.push(PutawayStatus::Done);
        for _ in 0..tail {
            history.push(PutawayStatus::Done);
        }

        let edges = history
            .windows(2)
            .filter(|w| transitioned_into(&w[0], &w[1], &PutawayStatus::Done))
            .count();

        prop_assert_eq!(edges, 1);
    }

    /// The edge predicate is target-selective: a transition is an edge for
    /// exactly one target (the status it lands on), or none at all when the
    /// status does not change
    #[test]
    fn prop_edge_is_target_selective(
        prev in prop::sample::select(vec![
            PutawayStatus::Open,
            PutawayStatus::Assigned,
            PutawayStatus::Done,
            PutawayStatus::Cancelled,
        ]),
        next in prop::sample::select(vec![
            PutawayStatus::Open,
            PutawayStatus::Assigned,
            PutawayStatus::Done,
            PutawayStatus::Cancelled,
        ]),
    ) {
        let targets = [
            PutawayStatus::Open,
            PutawayStatus::Assigned,
            PutawayStatus::Done,
            PutawayStatus::Cancelled,
        ];

        let firing = targets
            .iter()
            .filter(|t| transitioned_into(&prev, &next, t))
            .count();

        prop_assert_eq!(firing, usize::from(prev != next));
    }
}
