//! Spinel Hardware Abstraction Layer
//!
//! This crate defines the register-level traits that a chip backend
//! implements so the Spinel transfer engine can drive its SPI block.
//! The engine itself never touches memory-mapped I/O directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / interrupt vector         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  spinel-core (transfer engine)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  spinel-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip backend (SPCR / SPSR / SPDR)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`registers::SpiRegisters`] - Control, status and data register access
//! - [`time::Monotonic`] - Millisecond clock for blocking timeouts
//!
//! Bus configuration types live in [`spi`].

#![no_std]
#![deny(unsafe_code)]

pub mod registers;
pub mod spi;
pub mod time;

// Re-export key traits at crate root for convenience
pub use registers::{PinDirections, SpiRegisters};
pub use spi::{BitOrder, ClockRate, Mode, Phase, Polarity, Role, TransferConfig};
pub use time::Monotonic;
