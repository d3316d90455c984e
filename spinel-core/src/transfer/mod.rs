//! Transfer engines
//!
//! - [`blocking`]: synchronous byte loop bounded by per-byte deadlines
//! - [`state`]: interrupt-driven state machine advanced one byte per
//!   transfer-complete interrupt

pub mod blocking;
pub mod state;

pub use state::{TransferMode, TransferState};
