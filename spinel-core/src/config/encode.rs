//! Register image encoding
//!
//! The clock selector is split across two registers: its low two bits land
//! in the control register (SPR1:SPR0) and bit 2 becomes the status
//! register's double-speed flag.

use spinel_hal::registers::{control, PinDirections};
use spinel_hal::spi::{BitOrder, Phase, Polarity, Role, TransferConfig};

/// Register values produced from a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterImage {
    /// Control register value (peripheral and interrupt left disabled)
    pub control: u8,
    /// Status register double-speed bit
    pub double_speed: bool,
}

/// Encode a configuration into register values
pub fn encode(config: &TransferConfig) -> RegisterImage {
    let mut value = 0u8;

    if config.bit_order == BitOrder::LsbFirst {
        value |= control::DORD;
    }
    if config.role == Role::Controller {
        value |= control::MSTR;
    }
    if config.polarity == Polarity::IdleHigh {
        value |= control::CPOL;
    }
    if config.phase == Phase::CaptureOnSecondTransition {
        value |= control::CPHA;
    }
    value |= config.clock_rate.rate_bits() & control::SPR_MASK;

    RegisterImage {
        control: value,
        double_speed: config.clock_rate.double_speed(),
    }
}

/// Pin directions for a bus role
pub fn pin_directions(role: Role) -> PinDirections {
    match role {
        Role::Controller => PinDirections::CONTROLLER,
        Role::Peripheral => PinDirections::PERIPHERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinel_hal::spi::{ClockRate, Mode};

    #[test]
    fn test_default_controller_image() {
        let image = encode(&TransferConfig::default_controller());

        // MSTR + SPR0 (f/16)
        assert_eq!(image.control, control::MSTR | control::SPR0);
        assert!(!image.double_speed);
    }

    #[test]
    fn test_default_peripheral_image() {
        let image = encode(&TransferConfig::default_peripheral());
        assert_eq!(image.control, 0);
        assert!(!image.double_speed);
    }

    #[test]
    fn test_never_enables_peripheral_or_interrupt() {
        let config = TransferConfig {
            role: Role::Controller,
            bit_order: BitOrder::LsbFirst,
            polarity: Polarity::IdleHigh,
            phase: Phase::CaptureOnSecondTransition,
            clock_rate: ClockRate::Div128,
        };
        let image = encode(&config);

        assert_eq!(image.control & (control::SPE | control::SPIE), 0);
        assert_eq!(
            image.control,
            control::DORD | control::MSTR | control::CPOL | control::CPHA | control::SPR_MASK
        );
    }

    #[test]
    fn test_mode_bits() {
        let base = TransferConfig::default_controller();

        let image = encode(&base.with_mode(Mode::Mode1));
        assert_eq!(image.control & (control::CPOL | control::CPHA), control::CPHA);

        let image = encode(&base.with_mode(Mode::Mode2));
        assert_eq!(image.control & (control::CPOL | control::CPHA), control::CPOL);

        let image = encode(&base.with_mode(Mode::Mode3));
        assert_eq!(
            image.control & (control::CPOL | control::CPHA),
            control::CPOL | control::CPHA
        );
    }

    #[test]
    fn test_double_speed_rates() {
        let mut config = TransferConfig::default_controller();

        config.clock_rate = ClockRate::Div2;
        let image = encode(&config);
        assert!(image.double_speed);
        assert_eq!(image.control & control::SPR_MASK, 0);

        config.clock_rate = ClockRate::Div32;
        let image = encode(&config);
        assert!(image.double_speed);
        assert_eq!(image.control & control::SPR_MASK, control::SPR1);
    }

    #[test]
    fn test_pin_directions() {
        let pins = pin_directions(Role::Controller);
        assert!(pins.mosi_output && pins.sck_output);
        assert!(!pins.miso_output);

        let pins = pin_directions(Role::Peripheral);
        assert!(pins.miso_output);
        assert!(!pins.mosi_output && !pins.sck_output);
    }
}
