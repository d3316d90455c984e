//! Configuration encoding
//!
//! Turns a declarative [`TransferConfig`] into the register values the
//! driver's lifecycle operations write.

pub mod encode;

pub use encode::{encode, pin_directions, RegisterImage};
pub use spinel_hal::spi::{BitOrder, ClockRate, Mode, Phase, Polarity, Role, TransferConfig};
