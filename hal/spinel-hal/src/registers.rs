//! SPI register abstractions
//!
//! The SPI block is three byte-wide registers:
//!
//! ```text
//! control  │ SPIE │ SPE │ DORD │ MSTR │ CPOL │ CPHA │ SPR1 │ SPR0 │
//! status   │ SPIF │ WCOL│  -   │  -   │  -   │  -   │  -   │ SPI2X│
//! data     │            shift register / receive buffer            │
//! ```
//!
//! Writing the data register starts an exchange. The transfer-complete flag
//! (SPIF) is cleared by hardware when the data register is read after the
//! status register reported it set.
//!
//! All methods take `&self`: register blocks are shared between foreground
//! code and the interrupt handler, the way memory-mapped peripherals are.

/// Control register bit positions
pub mod control {
    /// Transfer-complete interrupt enable
    pub const SPIE: u8 = 1 << 7;
    /// Peripheral enable
    pub const SPE: u8 = 1 << 6;
    /// Data order (1 = LSB first)
    pub const DORD: u8 = 1 << 5;
    /// Controller select (1 = drives the clock)
    pub const MSTR: u8 = 1 << 4;
    /// Clock polarity
    pub const CPOL: u8 = 1 << 3;
    /// Clock phase
    pub const CPHA: u8 = 1 << 2;
    /// Clock rate select, bit 1
    pub const SPR1: u8 = 1 << 1;
    /// Clock rate select, bit 0
    pub const SPR0: u8 = 1 << 0;
    /// Both clock rate bits
    pub const SPR_MASK: u8 = SPR1 | SPR0;
}

/// Status register bit positions
pub mod status {
    /// Transfer complete
    pub const SPIF: u8 = 1 << 7;
    /// Write collision
    pub const WCOL: u8 = 1 << 6;
    /// Double speed
    pub const SPI2X: u8 = 1 << 0;
}

/// Pin directions required by a bus role
///
/// `true` means the pin is driven by this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinDirections {
    /// Controller-out / peripheral-in
    pub mosi_output: bool,
    /// Controller-in / peripheral-out
    pub miso_output: bool,
    /// Serial clock
    pub sck_output: bool,
}

impl PinDirections {
    /// Controller drives MOSI and SCK
    pub const CONTROLLER: Self = Self {
        mosi_output: true,
        miso_output: false,
        sck_output: true,
    };

    /// Peripheral drives MISO only
    pub const PERIPHERAL: Self = Self {
        mosi_output: false,
        miso_output: true,
        sck_output: false,
    };
}

/// SPI register block
///
/// Implemented by chip backends over the real registers and by test stubs.
pub trait SpiRegisters {
    /// Read the control register
    fn read_control(&self) -> u8;

    /// Write the control register
    fn write_control(&self, value: u8);

    /// Read the status register
    fn read_status(&self) -> u8;

    /// Write the writable status bits (double speed only)
    fn write_status(&self, value: u8);

    /// Read the data register (retrieves the last clocked-in byte)
    fn read_data(&self) -> u8;

    /// Write the data register (starts an exchange)
    fn write_data(&self, value: u8);

    /// Configure the MOSI/MISO/SCK pin directions
    fn set_pin_directions(&self, pins: PinDirections);

    /// Check the transfer-complete flag
    fn transfer_complete(&self) -> bool {
        self.read_status() & status::SPIF != 0
    }

    /// Set control bits with a read-modify-write
    fn set_control_bits(&self, mask: u8) {
        self.write_control(self.read_control() | mask);
    }

    /// Clear control bits with a read-modify-write
    fn clear_control_bits(&self, mask: u8) {
        self.write_control(self.read_control() & !mask);
    }

    /// Set or clear the double-speed bit, leaving the rest of status alone
    fn set_double_speed(&self, enabled: bool) {
        let current = self.read_status() & status::SPI2X;
        let value = if enabled {
            current | status::SPI2X
        } else {
            current & !status::SPI2X
        };
        self.write_status(value);
    }
}
