//! `embedded-hal` bus adapter
//!
//! Lets device drivers written against `embedded_hal::spi::SpiBus` run on a
//! [`SpiUnit`] through the blocking engine. Chip select is not handled here;
//! wrap the bus in an `SpiDevice` implementation for that.

use embedded_hal::spi::{ErrorType, SpiBus};
use spinel_hal::{Monotonic, SpiRegisters};

use crate::driver::SpiUnit;
use crate::error::{TransferError, TransferResult};

/// Byte clocked out when only reading
const DUMMY: u8 = 0x00;

/// Blocking `SpiBus` over a shared [`SpiUnit`]
pub struct BlockingBus<'d, 'a, R, C> {
    unit: &'d SpiUnit<'a, R, C>,
    timeout_ms: u32,
}

impl<'d, 'a, R, C> BlockingBus<'d, 'a, R, C> {
    /// Wrap `unit`, allowing each byte `timeout_ms` to complete
    pub fn new(unit: &'d SpiUnit<'a, R, C>, timeout_ms: u32) -> Self {
        Self { unit, timeout_ms }
    }

    /// Per-byte timeout in milliseconds
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Change the per-byte timeout
    pub fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }
}

impl<R, C> ErrorType for BlockingBus<'_, '_, R, C> {
    type Error = TransferError;
}

impl<R: SpiRegisters, C: Monotonic> SpiBus<u8> for BlockingBus<'_, '_, R, C> {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(DUMMY);
        self.unit.transfer_in_place(words, self.timeout_ms)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.unit.transmit(words, self.timeout_ms)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let common = read.len().min(write.len());
        let (read_head, read_tail) = read.split_at_mut(common);
        let (write_head, write_tail) = write.split_at(common);

        let mut timed_out = 0;
        tally(
            &mut timed_out,
            self.unit.transmit_receive(write_head, read_head, self.timeout_ms),
        )?;
        // Extra writes: received bytes are discarded
        tally(&mut timed_out, self.unit.transmit(write_tail, self.timeout_ms))?;
        // Extra reads: pad with dummies
        read_tail.fill(DUMMY);
        tally(
            &mut timed_out,
            self.unit.transfer_in_place(read_tail, self.timeout_ms),
        )?;

        if timed_out == 0 {
            Ok(())
        } else {
            Err(TransferError::TimedOut { bytes: timed_out })
        }
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.unit.transfer_in_place(words, self.timeout_ms)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // Every blocking call returns after its last byte
        Ok(())
    }
}

/// Accumulate timed-out bytes across segments, passing other errors through
fn tally(timed_out: &mut usize, result: TransferResult) -> TransferResult {
    match result {
        Err(TransferError::TimedOut { bytes }) => {
            *timed_out += bytes;
            Ok(())
        }
        other => other,
    }
}
