//! SPI unit driver
//!
//! [`SpiUnit`] owns one register block, a monotonic clock, the async
//! transfer state and the completion hook. It is meant to live in a
//! `static` so the interrupt vector can reach it:
//!
//! ```ignore
//! static SPI0: SpiUnit<'static, Spi0Regs, SysTick> = SpiUnit::new(Spi0Regs, SysTick);
//! static SPI0_IRQ: InterruptBinding<SpiUnit<'static, Spi0Regs, SysTick>> = InterruptBinding::new();
//!
//! SPI0.default_controller_init();
//! SPI0_IRQ.bind(&SPI0);
//! SPI0.enable_interrupt();
//! SPI0.transmit_async(&FRAME)?;
//! ```
//!
//! The state is only touched inside a critical section, both when the
//! foreground arms a transfer and when the interrupt advances it.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use spinel_hal::registers::control;
use spinel_hal::{Monotonic, SpiRegisters, TransferConfig};

use crate::config::{encode, pin_directions};
use crate::error::{TransferError, TransferResult};
use crate::transfer::{blocking, TransferMode, TransferState};

/// Callback run after every transfer-complete interrupt
pub type CompletionHook = fn();

/// One SPI peripheral instance
pub struct SpiUnit<'a, R, C> {
    regs: R,
    clock: C,
    state: Mutex<CriticalSectionRawMutex, RefCell<TransferState<'a>>>,
    hook: Mutex<CriticalSectionRawMutex, Cell<Option<CompletionHook>>>,
}

impl<'a, R, C> SpiUnit<'a, R, C> {
    /// Create an idle unit with no completion hook
    pub const fn new(regs: R, clock: C) -> Self {
        Self {
            regs,
            clock,
            state: Mutex::new(RefCell::new(TransferState::new())),
            hook: Mutex::new(Cell::new(None)),
        }
    }

    /// Underlying register block
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Clock used for blocking deadlines
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Install the completion hook, replacing any previous one
    pub fn set_completion_hook(&self, hook: CompletionHook) {
        self.hook.lock(|slot| slot.set(Some(hook)));
    }

    /// Remove the completion hook
    pub fn clear_completion_hook(&self) {
        self.hook.lock(|slot| slot.set(None));
    }

    /// Bytes left to advance in the async transfer
    pub fn remaining(&self) -> usize {
        self.state.lock(|state| state.borrow().remaining())
    }

    /// Whether an async transfer still holds the engine
    pub fn is_busy(&self) -> bool {
        self.state.lock(|state| state.borrow().is_busy())
    }

    /// Mode the next interrupt will run
    pub fn mode(&self) -> TransferMode {
        self.state.lock(|state| state.borrow().mode())
    }

    /// Claim the buffer of the last completed receiving transfer
    ///
    /// `None` until the transfer has retired.
    pub fn take_received(&self) -> Option<&'a mut [u8]> {
        self.state.lock(|state| state.borrow_mut().take_received())
    }
}

impl<'a, R: SpiRegisters, C> SpiUnit<'a, R, C> {
    // ---- Peripheral control ----

    /// Enable the peripheral
    pub fn enable(&self) {
        self.regs.set_control_bits(control::SPE);
    }

    /// Disable the peripheral
    pub fn disable(&self) {
        self.regs.clear_control_bits(control::SPE);
    }

    /// Enable the transfer-complete interrupt
    pub fn enable_interrupt(&self) {
        self.regs.set_control_bits(control::SPIE);
    }

    /// Disable the transfer-complete interrupt
    pub fn disable_interrupt(&self) {
        self.regs.clear_control_bits(control::SPIE);
    }

    /// Check whether the transfer-complete interrupt is enabled
    pub fn interrupt_enabled(&self) -> bool {
        self.regs.read_control() & control::SPIE != 0
    }

    // ---- Lifecycle ----

    /// Apply a configuration
    ///
    /// Leaves the peripheral and its interrupt disabled; call
    /// [`enable`](Self::enable) afterwards.
    pub fn init(&self, config: &TransferConfig) {
        self.regs.set_pin_directions(pin_directions(config.role));

        let image = encode(config);
        self.regs.write_control(image.control);
        self.regs.set_double_speed(image.double_speed);

        debug!(
            "SPI configured: control={=u8:#x} double_speed={} divider={}",
            image.control,
            image.double_speed,
            config.clock_rate.divider()
        );
    }

    /// Clear the control register, disabling the peripheral and its interrupt
    pub fn deinit(&self) {
        self.regs.write_control(0);
        debug!("SPI deinitialized");
    }

    /// Controller, MSB first, mode 0, f/16, then enable
    pub fn default_controller_init(&self) {
        self.init(&TransferConfig::default_controller());
        self.enable();
    }

    /// Peripheral, MSB first, mode 0, then enable
    pub fn default_peripheral_init(&self) {
        self.init(&TransferConfig::default_peripheral());
        self.enable();
    }

    // ---- Async arming ----

    /// Start an interrupt-driven transmit of `tx`
    ///
    /// The first byte is written before returning; the interrupt sends the rest.
    pub fn transmit_async(&self, tx: &'a [u8]) -> TransferResult {
        let result = self
            .state
            .lock(|state| state.borrow_mut().arm_transmit(&self.regs, tx));
        Self::note_rejection(result)
    }

    /// Start an interrupt-driven receive into `rx`
    ///
    /// Reclaim the filled buffer with [`take_received`](Self::take_received).
    pub fn receive_async(&self, rx: &'a mut [u8]) -> TransferResult {
        let result = self.state.lock(|state| state.borrow_mut().arm_receive(rx));
        Self::note_rejection(result)
    }

    /// Start an interrupt-driven full-duplex exchange of `tx` into `rx`
    pub fn transmit_receive_async(&self, tx: &'a [u8], rx: &'a mut [u8]) -> TransferResult {
        let result = self
            .state
            .lock(|state| state.borrow_mut().arm_transmit_receive(&self.regs, tx, rx));
        Self::note_rejection(result)
    }

    /// Transfer-complete interrupt entry point
    ///
    /// Advances the async transfer by one byte, then runs the completion
    /// hook. The hook runs outside the state lock and may arm a new transfer.
    pub fn on_interrupt(&self) {
        self.state
            .lock(|state| state.borrow_mut().advance(&self.regs));

        if let Some(hook) = self.hook.lock(Cell::get) {
            hook();
        }
    }

    fn note_rejection(result: TransferResult) -> TransferResult {
        if result == Err(TransferError::Busy) {
            debug!("SPI busy, async request dropped");
        }
        result
    }
}

impl<'a, R: SpiRegisters, C: Monotonic> SpiUnit<'a, R, C> {
    // ---- Blocking transfers ----

    /// Transmit `data`, waiting up to `timeout_ms` for each byte
    pub fn transmit(&self, data: &[u8], timeout_ms: u32) -> TransferResult {
        self.check_polling();
        blocking::transmit(&self.regs, &self.clock, data, timeout_ms)
    }

    /// Receive into `buf`, waiting up to `timeout_ms` for each byte
    pub fn receive(&self, buf: &mut [u8], timeout_ms: u32) -> TransferResult {
        self.check_polling();
        blocking::receive(&self.regs, &self.clock, buf, timeout_ms)
    }

    /// Exchange `tx` for `rx`, waiting up to `timeout_ms` for each byte
    pub fn transmit_receive(&self, tx: &[u8], rx: &mut [u8], timeout_ms: u32) -> TransferResult {
        self.check_polling();
        blocking::transmit_receive(&self.regs, &self.clock, tx, rx, timeout_ms)
    }

    /// Exchange `data` in place, waiting up to `timeout_ms` for each byte
    pub fn transfer_in_place(&self, data: &mut [u8], timeout_ms: u32) -> TransferResult {
        self.check_polling();
        blocking::transfer_in_place(&self.regs, &self.clock, data, timeout_ms)
    }

    fn check_polling(&self) {
        if self.interrupt_enabled() {
            warn!("SPI blocking transfer with transfer-complete interrupt enabled");
        }
    }
}
