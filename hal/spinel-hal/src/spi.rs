//! SPI bus configuration
//!
//! Declarative description of how the bus should be clocked. The transfer
//! engine encodes these into register images; nothing here touches hardware.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of the bus drives the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    /// Clock is driven by a remote controller
    Peripheral,
    /// This device drives SCK
    #[default]
    Controller,
}

/// Bit order on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BitOrder {
    /// Most significant bit first
    #[default]
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    #[default]
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    #[default]
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

/// Bus clock as a divider of the core clock
///
/// The discriminant is the 3-bit hardware selector: bits 0-1 are the
/// control register rate bits, bit 2 is the status register double-speed bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ClockRate {
    Div2 = 4,
    #[default]
    Div4 = 0,
    Div8 = 5,
    Div16 = 1,
    Div32 = 6,
    Div64 = 2,
    Div128 = 3,
}

impl ClockRate {
    /// Raw 3-bit selector
    pub fn selector(self) -> u8 {
        self as u8
    }

    /// Rate bits for the control register (SPR1:SPR0)
    pub fn rate_bits(self) -> u8 {
        self.selector() & 0b11
    }

    /// Whether the double-speed bit must be set
    pub fn double_speed(self) -> bool {
        (self.selector() >> 2) & 1 == 1
    }

    /// Core clock divider this selector produces
    pub fn divider(self) -> u16 {
        match self {
            ClockRate::Div2 => 2,
            ClockRate::Div4 => 4,
            ClockRate::Div8 => 8,
            ClockRate::Div16 => 16,
            ClockRate::Div32 => 32,
            ClockRate::Div64 => 64,
            ClockRate::Div128 => 128,
        }
    }
}

/// SPI transfer configuration
///
/// Applied once by the driver's `init`; not mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransferConfig {
    /// Controller or peripheral
    pub role: Role,
    /// Bit order on the wire
    pub bit_order: BitOrder,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
    /// Clock divider selector
    pub clock_rate: ClockRate,
}

impl TransferConfig {
    /// Controller, MSB first, mode 0, core clock / 16
    pub const fn default_controller() -> Self {
        Self {
            role: Role::Controller,
            bit_order: BitOrder::MsbFirst,
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
            clock_rate: ClockRate::Div16,
        }
    }

    /// Peripheral, MSB first, mode 0
    ///
    /// The clock rate is unused in peripheral role; the selector stays at zero.
    pub const fn default_peripheral() -> Self {
        Self {
            role: Role::Peripheral,
            bit_order: BitOrder::MsbFirst,
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
            clock_rate: ClockRate::Div4,
        }
    }

    /// Replace polarity and phase from a combined SPI mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        let (polarity, phase) = mode.into();
        self.polarity = polarity;
        self.phase = phase;
        self
    }

    /// Current polarity/phase as a combined SPI mode
    pub fn mode(&self) -> Mode {
        match (self.polarity, self.phase) {
            (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => Mode::Mode0,
            (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => Mode::Mode1,
            (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => Mode::Mode2,
            (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => Mode::Mode3,
        }
    }
}
