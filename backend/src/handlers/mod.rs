//! HTTP request handlers

pub mod cycle_count;
pub mod handling_unit;
pub mod health;
pub mod inbound;
pub mod inventory;
pub mod outbound;
pub mod warehouse;

pub use cycle_count::*;
pub use handling_unit::*;
pub use health::*;
pub use inbound::*;
pub use inventory::*;
pub use outbound::*;
pub use warehouse::*;
