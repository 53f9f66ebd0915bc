//! Domain models for the Warehouse Execution Core

mod cycle_count;
mod handling_unit;
mod inbound;
mod movement;
mod outbound;
mod warehouse;

pub use cycle_count::*;
pub use handling_unit::*;
pub use inbound::*;
pub use movement::*;
pub use outbound::*;
pub use warehouse::*;
