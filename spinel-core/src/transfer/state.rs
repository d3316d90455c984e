//! Interrupt-driven transfer state machine
//!
//! One [`TransferState`] exists per SPI unit. Foreground code arms it, the
//! transfer-complete interrupt advances it by one byte per firing.
//!
//! # States
//!
//! ```text
//!            arm_*  (remaining == 0)
//!   ┌──────┐ ─────────────────────────▶ ┌──────────────────────────┐
//!   │ Idle │                            │ Transmitting / Receiving │ ◀─┐
//!   └──────┘ ◀───────────────────────── │ / TransmittingReceiving  │ ──┘ advance
//!            last byte completed        └──────────────────────────┘
//! ```
//!
//! `remaining` is the admission gate: a new transfer may be armed as soon
//! as it reaches zero. The mode tag lags one interrupt behind for the
//! transmit kinds, because the last byte written is still on the wire when
//! `remaining` hits zero:
//!
//! - Transmitting: the interrupt after `remaining` reaches zero only
//!   retires the mode. Arming during that window is allowed.
//! - TransmittingReceiving: that interrupt performs the final read, so the
//!   receive buffer gets exactly one read per byte. The gate stays closed
//!   until the read is done.
//!
//! The first byte of a transmit kind is always written by the arming call,
//! never by the interrupt.

use core::mem;

use spinel_hal::SpiRegisters;

use crate::error::{TransferError, TransferResult};

/// Which byte-advance routine the interrupt runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferMode {
    /// No transfer armed
    Idle,
    /// Writing a transmit buffer
    Transmitting,
    /// Filling a receive buffer
    Receiving,
    /// Writing and filling in lockstep
    TransmittingReceiving,
}

/// Active transfer with the buffers it borrows
#[derive(Debug)]
enum Active<'a> {
    Idle,
    Transmitting { tx: &'a [u8] },
    Receiving { rx: &'a mut [u8] },
    TransmittingReceiving { tx: &'a [u8], rx: &'a mut [u8] },
}

/// Shared transfer state
///
/// Buffers are borrowed from the caller for `'a`; the state never owns
/// them. A finished receive buffer is parked until [`take_received`] hands
/// it back.
///
/// [`take_received`]: TransferState::take_received
#[derive(Debug)]
pub struct TransferState<'a> {
    active: Active<'a>,
    /// One past the last transmitted element
    tx_cursor: usize,
    /// One past the last received element
    rx_cursor: usize,
    /// Bytes not yet advanced
    remaining: usize,
    /// Receive buffer of the last finished transfer
    received: Option<&'a mut [u8]>,
}

impl Default for TransferState<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TransferState<'a> {
    /// Idle, zeroed state
    pub const fn new() -> Self {
        Self {
            active: Active::Idle,
            tx_cursor: 0,
            rx_cursor: 0,
            remaining: 0,
            received: None,
        }
    }

    /// Current mode tag
    pub fn mode(&self) -> TransferMode {
        match self.active {
            Active::Idle => TransferMode::Idle,
            Active::Transmitting { .. } => TransferMode::Transmitting,
            Active::Receiving { .. } => TransferMode::Receiving,
            Active::TransmittingReceiving { .. } => TransferMode::TransmittingReceiving,
        }
    }

    /// Bytes not yet advanced
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Check whether a new transfer would be rejected
    pub fn is_busy(&self) -> bool {
        self.remaining > 0 || self.final_read_pending()
    }

    /// A full-duplex transfer has written its last byte but not read it back
    fn final_read_pending(&self) -> bool {
        matches!(self.active, Active::TransmittingReceiving { .. })
    }

    /// Transmit cursor
    pub fn tx_cursor(&self) -> usize {
        self.tx_cursor
    }

    /// Receive cursor
    pub fn rx_cursor(&self) -> usize {
        self.rx_cursor
    }

    /// Arm a transmit-only transfer
    ///
    /// Writes the first byte immediately. Empty buffers are a no-op.
    pub fn arm_transmit<R: SpiRegisters>(&mut self, regs: &R, tx: &'a [u8]) -> TransferResult {
        self.admit()?;
        let Some(&first) = tx.first() else {
            return Ok(());
        };

        self.retire();
        self.active = Active::Transmitting { tx };
        self.tx_cursor = 1;
        self.remaining = tx.len() - 1;

        regs.write_data(first);
        Ok(())
    }

    /// Arm a receive-only transfer
    ///
    /// Nothing is written; reception starts with the first transfer-complete
    /// interrupt. Empty buffers are a no-op.
    pub fn arm_receive(&mut self, rx: &'a mut [u8]) -> TransferResult {
        self.admit()?;
        if rx.is_empty() {
            return Ok(());
        }

        self.retire();
        self.rx_cursor = 0;
        self.remaining = rx.len();
        self.active = Active::Receiving { rx };
        Ok(())
    }

    /// Arm a full-duplex transfer
    ///
    /// Both buffers must have the same length. Writes the first byte
    /// immediately. Empty buffers are a no-op.
    pub fn arm_transmit_receive<R: SpiRegisters>(
        &mut self,
        regs: &R,
        tx: &'a [u8],
        rx: &'a mut [u8],
    ) -> TransferResult {
        self.admit()?;
        if tx.len() != rx.len() {
            return Err(TransferError::LengthMismatch);
        }
        let Some(&first) = tx.first() else {
            return Ok(());
        };

        self.retire();
        self.tx_cursor = 1;
        self.rx_cursor = 0;
        self.remaining = tx.len() - 1;
        self.active = Active::TransmittingReceiving { tx, rx };

        regs.write_data(first);
        Ok(())
    }

    /// Advance the active transfer by one byte
    ///
    /// Called once per transfer-complete interrupt. Never panics: cursors
    /// are bounded by `remaining`, and buffer accesses are checked anyway.
    pub fn advance<R: SpiRegisters>(&mut self, regs: &R) {
        match &mut self.active {
            Active::Idle => {}

            Active::Transmitting { tx } => {
                if self.remaining > 0 {
                    if let Some(&byte) = tx.get(self.tx_cursor) {
                        regs.write_data(byte);
                    }
                    self.tx_cursor += 1;
                    self.remaining -= 1;
                } else {
                    // Last byte has left the shift register
                    self.retire();
                }
            }

            Active::Receiving { rx } => {
                let byte = regs.read_data();
                if let Some(slot) = rx.get_mut(self.rx_cursor) {
                    *slot = byte;
                }
                self.rx_cursor += 1;
                self.remaining = self.remaining.saturating_sub(1);

                if self.remaining == 0 {
                    self.retire();
                }
            }

            Active::TransmittingReceiving { tx, rx } => {
                if self.remaining > 0 {
                    // Read-after-write: the receive buffer still holds the
                    // byte clocked in by the previous exchange
                    if let Some(&byte) = tx.get(self.tx_cursor) {
                        regs.write_data(byte);
                    }
                    let received = regs.read_data();
                    if let Some(slot) = rx.get_mut(self.rx_cursor) {
                        *slot = received;
                    }
                    self.tx_cursor += 1;
                    self.rx_cursor += 1;
                    self.remaining -= 1;
                } else {
                    // Final exchange: capture the last received byte
                    let received = regs.read_data();
                    if let Some(slot) = rx.get_mut(self.rx_cursor) {
                        *slot = received;
                    }
                    self.rx_cursor += 1;
                    self.retire();
                }
            }
        }
    }

    /// Hand back the receive buffer of the last finished transfer
    pub fn take_received(&mut self) -> Option<&'a mut [u8]> {
        self.received.take()
    }

    fn admit(&self) -> TransferResult {
        if self.is_busy() {
            Err(TransferError::Busy)
        } else {
            Ok(())
        }
    }

    /// Return to Idle, parking any receive buffer
    fn retire(&mut self) {
        match mem::replace(&mut self.active, Active::Idle) {
            Active::Idle => return,
            Active::Transmitting { .. } => {}
            Active::Receiving { rx } | Active::TransmittingReceiving { rx, .. } => {
                self.received = Some(rx);
            }
        }

        trace!("SPI transfer retired after {} rx bytes", self.rx_cursor);
        self.tx_cursor = 0;
        self.rx_cursor = 0;
        self.remaining = 0;
    }
}
