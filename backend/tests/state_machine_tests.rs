//! Handling-unit state machine tests
//!
//! The status field is a cache of the move ledger: each move type maps to at
//! most one status, and replaying a ledger in order must reproduce exactly
//! the stored status.

use proptest::prelude::*;

use shared::models::{replay_status, HuStatus, MoveType};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate an arbitrary move type
fn move_type_strategy() -> impl Strategy<Value = MoveType> {
    prop::sample::select(MoveType::ALL.to_vec())
}

/// Generate an arbitrary ledger as a sequence of move types
fn ledger_strategy() -> impl Strategy<Value = Vec<MoveType>> {
    prop::collection::vec(move_type_strategy(), 0..20)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Every status-effecting move type maps to exactly the expected status
    #[test]
    fn test_status_effect_mapping() {
        let expected = [
            (MoveType::Receive, HuStatus::Received),
            (MoveType::Qc, HuStatus::QcHold),
            (MoveType::Putaway, HuStatus::Stored),
            (MoveType::Allocate, HuStatus::Allocated),
            (MoveType::Pick, HuStatus::Picked),
            (MoveType::Pack, HuStatus::Packed),
            (MoveType::Stage, HuStatus::Staged),
            (MoveType::Load, HuStatus::Loaded),
            (MoveType::Dispatch, HuStatus::Dispatched),
        ];

        for (move_type, status) in expected {
            assert_eq!(move_type.status_effect(), Some(status));
        }
    }

    /// Transfer and adjust relocate without touching status
    #[test]
    fn test_transfer_and_adjust_have_no_status_effect() {
        assert_eq!(MoveType::Transfer.status_effect(), None);
        assert_eq!(MoveType::Adjust.status_effect(), None);
    }

    /// An empty ledger leaves the unit in its initial status
    #[test]
    fn test_empty_ledger_replays_to_planned() {
        assert_eq!(replay_status(&[]), HuStatus::Planned);
    }

    /// Only dispatch is terminal
    #[test]
    fn test_only_dispatched_is_terminal() {
        let all = [
            HuStatus::Planned,
            HuStatus::Received,
            HuStatus::QcHold,
            HuStatus::Stored,
            HuStatus::Allocated,
            HuStatus::Picked,
            HuStatus::Packed,
            HuStatus::Staged,
            HuStatus::Loaded,
            HuStatus::Dispatched,
        ];

        for status in all {
            assert_eq!(status.is_terminal(), status == HuStatus::Dispatched);
        }
    }

    /// The full inbound/outbound pipeline walks through every status in order
    #[test]
    fn test_full_pipeline_replay() {
        let moves = [
            MoveType::Receive,
            MoveType::Qc,
            MoveType::Putaway,
            MoveType::Allocate,
            MoveType::Pick,
            MoveType::Pack,
            MoveType::Stage,
            MoveType::Load,
            MoveType::Dispatch,
        ];

        let mut expected = HuStatus::Planned;
        for (i, mv) in moves.iter().enumerate() {
            expected = mv.status_effect().unwrap();
            assert_eq!(replay_status(&moves[..=i]), expected);
        }
        assert_eq!(expected, HuStatus::Dispatched);
    }

    /// A transfer in the middle of the pipeline does not disturb the status
    #[test]
    fn test_transfer_mid_pipeline_preserves_status() {
        let moves = [
            MoveType::Receive,
            MoveType::Putaway,
            MoveType::Transfer,
            MoveType::Transfer,
        ];
        assert_eq!(replay_status(&moves), HuStatus::Stored);
    }

    /// Repeating a move type is idempotent on the replayed status
    #[test]
    fn test_repeated_move_is_idempotent_on_status() {
        let once = [MoveType::Receive, MoveType::Pack];
        let twice = [MoveType::Receive, MoveType::Pack, MoveType::Pack];
        assert_eq!(replay_status(&once), replay_status(&twice));
    }

    /// Move type wire names are SCREAMING_SNAKE_CASE
    #[test]
    fn test_move_type_names() {
        for mv in MoveType::ALL {
            let name = mv.as_str();
            assert!(!name.is_empty());
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
        assert_eq!(HuStatus::QcHold.as_str(), "QC_HOLD");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Replayed status is always the status effect of the last
    /// status-effecting move, or PLANNED when there is none
    #[test]
    fn prop_replay_matches_last_status_effect(ledger in ledger_strategy()) {
        let expected = ledger
            .iter()
            .rev()
            .find_map(|mv| mv.status_effect())
            .unwrap_or(HuStatus::Planned);

        prop_assert_eq!(replay_status(&ledger), expected);
    }

    /// Appending transfers and adjusts never changes the replayed status
    #[test]
    fn prop_relocation_moves_are_status_neutral(
        ledger in ledger_strategy(),
        extra in prop::collection::vec(
            prop::sample::select(vec![MoveType::Transfer, MoveType::Adjust]),
            0..5,
        ),
    ) {
        let mut extended = ledger.clone();
        extended.extend(extra);
        prop_assert_eq!(replay_status(&extended), replay_status(&ledger));
    }

    /// Replay is a left fold: replaying a prefix then continuing equals
    /// replaying the whole ledger
    #[test]
    fn prop_replay_is_prefix_composable(ledger in ledger_strategy(), split in 0usize..20) {
        let split = split.min(ledger.len());
        let prefix_status = replay_status(&ledger[..split]);

        let continued = ledger[split..]
            .iter()
            .fold(prefix_status, |status, mv| mv.status_effect().unwrap_or(status));

        prop_assert_eq!(continued, replay_status(&ledger));
    }
}
