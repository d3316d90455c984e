//! Blocking transfer engine
//!
//! Exchanges bytes synchronously, busy-waiting on the transfer-complete flag.
//! Every byte gets its own deadline, computed from the monotonic clock when
//! its wait starts. A byte whose deadline passes is not retried and does not
//! abort the loop: the data register is still accessed exactly once per byte
//! and the engine moves on. The count of such bytes is reported at the end.
//!
//! The transfer-complete interrupt should be disabled while these run;
//! otherwise the completion hook also fires for these bytes.

use spinel_hal::{Monotonic, SpiRegisters};

use crate::error::{TransferError, TransferResult};

/// Spin until the transfer-complete flag sets or the byte's budget runs out
///
/// Returns `false` when the deadline passed first.
pub fn wait_complete<R, C>(regs: &R, clock: &C, timeout_ms: u32) -> bool
where
    R: SpiRegisters,
    C: Monotonic,
{
    let deadline = clock.deadline_ms(timeout_ms);
    loop {
        if regs.transfer_complete() {
            return true;
        }
        if clock.expired(deadline) {
            return false;
        }
        core::hint::spin_loop();
    }
}

/// Write one byte, wait, then read the byte clocked in
///
/// Returns the received byte and whether the wait completed in time.
pub fn exchange_byte<R, C>(regs: &R, clock: &C, byte: u8, timeout_ms: u32) -> (u8, bool)
where
    R: SpiRegisters,
    C: Monotonic,
{
    regs.write_data(byte);
    let in_time = wait_complete(regs, clock, timeout_ms);
    (regs.read_data(), in_time)
}

/// Transmit every byte of `data`
pub fn transmit<R, C>(regs: &R, clock: &C, data: &[u8], timeout_ms: u32) -> TransferResult
where
    R: SpiRegisters,
    C: Monotonic,
{
    let mut timed_out = 0;
    for &byte in data {
        regs.write_data(byte);
        if !wait_complete(regs, clock, timeout_ms) {
            timed_out += 1;
        }
    }
    outcome(timed_out)
}

/// Fill `buf` with bytes clocked in by the remote side
///
/// Nothing is written; the peer must drive the clock (peripheral role).
pub fn receive<R, C>(regs: &R, clock: &C, buf: &mut [u8], timeout_ms: u32) -> TransferResult
where
    R: SpiRegisters,
    C: Monotonic,
{
    let mut timed_out = 0;
    for slot in buf.iter_mut() {
        if !wait_complete(regs, clock, timeout_ms) {
            timed_out += 1;
        }
        *slot = regs.read_data();
    }
    outcome(timed_out)
}

/// Exchange `tx` for `rx`, byte by byte
///
/// Both buffers must have the same length; nothing is written otherwise.
pub fn transmit_receive<R, C>(
    regs: &R,
    clock: &C,
    tx: &[u8],
    rx: &mut [u8],
    timeout_ms: u32,
) -> TransferResult
where
    R: SpiRegisters,
    C: Monotonic,
{
    if tx.len() != rx.len() {
        return Err(TransferError::LengthMismatch);
    }

    let mut timed_out = 0;
    for (&byte, slot) in tx.iter().zip(rx.iter_mut()) {
        let (received, in_time) = exchange_byte(regs, clock, byte, timeout_ms);
        if !in_time {
            timed_out += 1;
        }
        *slot = received;
    }
    outcome(timed_out)
}

/// Exchange every byte of `data`, replacing it with the byte received
pub fn transfer_in_place<R, C>(regs: &R, clock: &C, data: &mut [u8], timeout_ms: u32) -> TransferResult
where
    R: SpiRegisters,
    C: Monotonic,
{
    let mut timed_out = 0;
    for slot in data.iter_mut() {
        let (received, in_time) = exchange_byte(regs, clock, *slot, timeout_ms);
        if !in_time {
            timed_out += 1;
        }
        *slot = received;
    }
    outcome(timed_out)
}

fn outcome(timed_out: usize) -> TransferResult {
    if timed_out == 0 {
        Ok(())
    } else {
        warn!("SPI blocking transfer: {} byte(s) timed out", timed_out);
        Err(TransferError::TimedOut { bytes: timed_out })
    }
}
