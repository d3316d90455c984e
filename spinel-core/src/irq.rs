//! Interrupt vector binding
//!
//! Interrupt vectors take no arguments, so the driver they serve has to be
//! found through a `static`. An [`InterruptBinding`] is that slot: the
//! application binds a `'static` handler once, and the vector calls
//! [`dispatch`](InterruptBinding::dispatch).
//!
//! ```ignore
//! static SPI0_IRQ: InterruptBinding<Spi0> = InterruptBinding::new();
//!
//! #[interrupt]
//! fn SPI_STC() {
//!     SPI0_IRQ.dispatch();
//! }
//! ```

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::driver::SpiUnit;
use spinel_hal::SpiRegisters;

/// Something an interrupt vector can drive
pub trait InterruptHandler {
    /// Handle one occurrence of the interrupt
    fn on_interrupt(&self);
}

impl<'a, R: SpiRegisters, C> InterruptHandler for SpiUnit<'a, R, C> {
    fn on_interrupt(&self) {
        SpiUnit::on_interrupt(self);
    }
}

/// Static slot connecting an interrupt vector to its handler
pub struct InterruptBinding<T: 'static> {
    handler: Mutex<CriticalSectionRawMutex, Cell<Option<&'static T>>>,
}

impl<T: 'static> InterruptBinding<T> {
    /// Create an unbound slot
    pub const fn new() -> Self {
        Self {
            handler: Mutex::new(Cell::new(None)),
        }
    }

    /// Route the interrupt to `handler`, replacing any previous binding
    pub fn bind(&self, handler: &'static T) {
        self.handler.lock(|slot| slot.set(Some(handler)));
    }

    /// Stop routing the interrupt
    pub fn unbind(&self) {
        self.handler.lock(|slot| slot.set(None));
    }

    /// Check whether a handler is bound
    pub fn is_bound(&self) -> bool {
        self.handler.lock(|slot| slot.get().is_some())
    }
}

impl<T: InterruptHandler + 'static> InterruptBinding<T> {
    /// Run the bound handler, if any
    ///
    /// Call this from the interrupt vector.
    pub fn dispatch(&self) {
        if let Some(handler) = self.handler.lock(Cell::get) {
            handler.on_interrupt();
        }
    }
}

impl<T: 'static> Default for InterruptBinding<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        hits: AtomicUsize,
    }

    impl InterruptHandler for Counter {
        fn on_interrupt(&self) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_unbound_dispatch_is_noop() {
        let binding: InterruptBinding<Counter> = InterruptBinding::new();
        assert!(!binding.is_bound());
        binding.dispatch();
    }

    #[test]
    fn test_dispatch_reaches_handler() {
        static COUNTER: Counter = Counter {
            hits: AtomicUsize::new(0),
        };
        static BINDING: InterruptBinding<Counter> = InterruptBinding::new();

        BINDING.bind(&COUNTER);
        assert!(BINDING.is_bound());

        BINDING.dispatch();
        BINDING.dispatch();
        assert_eq!(COUNTER.hits.load(Ordering::SeqCst), 2);

        BINDING.unbind();
        BINDING.dispatch();
        assert_eq!(COUNTER.hits.load(Ordering::SeqCst), 2);
    }
}
