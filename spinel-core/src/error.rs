//! Transfer outcomes
//!
//! The engine never aborts on these conditions: a busy arming call leaves the
//! in-flight transfer untouched, and a timed-out byte still gets its register
//! access. Callers that want the fire-and-forget behaviour discard the result.

/// Errors reported by transfer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// An async transfer is still in flight; the request was dropped
    Busy,
    /// This many bytes exhausted their per-byte timeout budget
    TimedOut {
        /// Number of bytes whose wait elapsed
        bytes: usize,
    },
    /// Transmit and receive buffers differ in length
    LengthMismatch,
}

impl embedded_hal::spi::Error for TransferError {
    fn kind(&self) -> embedded_hal::spi::ErrorKind {
        embedded_hal::spi::ErrorKind::Other
    }
}

/// Result type for transfer operations
pub type TransferResult = Result<(), TransferError>;
