//! Business logic services
//!
//! All pipeline writes that change a handling unit's state funnel through
//! `ledger::log_move_in_tx` so the ledger row, the snapshot upsert and the
//! status cache always commit together.

pub mod cycle_count;
pub mod handling_unit;
pub mod inbound;
pub mod ledger;
pub mod outbound;
pub mod warehouse;

pub use cycle_count::CycleCountService;
pub use handling_unit::HandlingUnitService;
pub use inbound::InboundService;
pub use ledger::MoveLedgerService;
pub use outbound::OutboundService;
pub use warehouse::WarehouseService;
