//! Board-agnostic SPI transfer engine
//!
//! Drives a byte-wide SPI block (control, status and data registers) in
//! either bus role:
//!
//! - Configuration encoding and lifecycle (init, deinit, presets)
//! - Blocking transfers with a per-byte timeout
//! - Interrupt-driven transfers advanced one byte per interrupt
//! - Completion hook and interrupt vector binding
//! - `embedded-hal` `SpiBus` adapter over the blocking engine

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod bus;
pub mod config;
pub mod driver;
pub mod error;
pub mod irq;
pub mod transfer;

#[cfg(test)]
mod testing;

pub use bus::BlockingBus;
pub use driver::{CompletionHook, SpiUnit};
pub use error::{TransferError, TransferResult};
pub use irq::{InterruptBinding, InterruptHandler};
pub use transfer::{TransferMode, TransferState};
