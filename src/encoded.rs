//! Binary-encoded buttons: N GPIOs carry the number of the pressed button.
//!
//! A diode matrix or a 74LS148 priority encoder turns up to 2^N - 1
//! mutually exclusive switches into an N-bit number. Code 0 means no
//! button is pressed, so virtual pins start at 1:
//!
//!   - S1 = 001 = 1
//!   - S2 = 010 = 2
//!   - S3 = 011 = 3
//!   - ...
//!
//! Bit `i` of the virtual pin is set when `pins[i]` is at the pressed level.

use crate::error::Error;
use crate::event::Level;
use crate::source::{read_level, VirtualPins};
use embedded_hal::digital::InputPin;

/// Virtual pin reported when no encoded button is pressed.
pub const NO_BUTTON_PIN: u8 = 0;

/// N physical pins decoded into one virtual pin.
pub struct EncodedPins<P, const N: usize> {
    pins: [P; N],
    pressed_level: Level,
}

/// 2 pins, 3 buttons (virtual pins 1..=3).
pub type Encoded4To2Pins<P> = EncodedPins<P, 2>;

/// 3 pins, 7 buttons (virtual pins 1..=7).
pub type Encoded8To3Pins<P> = EncodedPins<P, 3>;

impl<P: InputPin, const N: usize> EncodedPins<P, N> {
    /// `released_level` is the level of an encoder bit when its buttons are
    /// released. A 74LS148 is pulled up, so `High`. `Unknown` is treated as
    /// `High`.
    pub fn new(pins: [P; N], released_level: Level) -> Result<Self, Error> {
        if N == 0 {
            return Err(Error::NoPins);
        }
        if N > 8 {
            return Err(Error::TooManyPins);
        }

        let pressed_level = match released_level {
            Level::Low => Level::High,
            _ => Level::Low,
        };
        debug!("encoder: {=usize} pins, pressed={}", N, pressed_level);

        Ok(Self {
            pins,
            pressed_level,
        })
    }

    pub fn pins_mut(&mut self) -> &mut [P; N] {
        &mut self.pins
    }

    pub fn release(self) -> [P; N] {
        self.pins
    }
}

impl<P: InputPin, const N: usize> VirtualPins for EncodedPins<P, N> {
    fn virtual_pin(&mut self) -> Option<u8> {
        let pressed = self.pressed_level;
        let mut virtual_pin = 0u8;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            match read_level(pin) {
                Level::Unknown => return None,
                level if level == pressed => virtual_pin |= 1 << bit,
                _ => {}
            }
        }
        Some(virtual_pin)
    }

    fn no_button_pin(&self) -> u8 {
        NO_BUTTON_PIN
    }

    fn pressed_level(&self) -> Level {
        self.pressed_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ButtonSource;
    use crate::testing::FakePin;

    #[test]
    fn two_pins_both_pressed_is_three() {
        // Pull-up wiring: a pressed bit reads low.
        let bit0 = FakePin::new(false);
        let bit1 = FakePin::new(false);
        let mut encoder = Encoded4To2Pins::new([&bit0, &bit1], Level::High).unwrap();
        assert_eq!(encoder.virtual_pin(), Some(3));
    }

    #[test]
    fn all_released_is_no_button() {
        let bit0 = FakePin::new(true);
        let bit1 = FakePin::new(true);
        let mut encoder = Encoded4To2Pins::new([&bit0, &bit1], Level::High).unwrap();
        assert_eq!(encoder.virtual_pin(), Some(0));
        assert_eq!(encoder.no_button_pin(), 0);
    }

    #[test]
    fn bit_order_follows_pin_order() {
        let bit0 = FakePin::new(true);
        let bit1 = FakePin::new(false);
        let bit2 = FakePin::new(true);
        let mut encoder = Encoded8To3Pins::new([&bit0, &bit1, &bit2], Level::Low).unwrap();
        // Pull-down wiring: high means pressed.
        assert_eq!(encoder.virtual_pin(), Some(0b101));
    }

    #[test]
    fn read_button_synthesizes_levels() {
        let bit0 = FakePin::new(false);
        let bit1 = FakePin::new(true);
        let mut encoder = Encoded4To2Pins::new([&bit0, &bit1], Level::High).unwrap();
        assert_eq!(encoder.read_button(1), Level::Low);
        assert_eq!(encoder.read_button(2), Level::High);
        assert_eq!(encoder.read_button(3), Level::High);
    }

    #[test]
    fn failed_read_is_unknown() {
        let bit0 = FakePin::new(false);
        let bit1 = FakePin::new(false);
        bit1.set_failing(true);
        let mut encoder = Encoded4To2Pins::new([&bit0, &bit1], Level::High).unwrap();
        assert_eq!(encoder.virtual_pin(), None);
        assert_eq!(encoder.read_button(3), Level::Unknown);
    }

    #[test]
    fn rejects_bad_pin_counts() {
        let none: [&FakePin; 0] = [];
        assert!(matches!(EncodedPins::new(none, Level::High), Err(Error::NoPins)));

        let pin = FakePin::new(true);
        let nine = [&pin; 9];
        assert!(matches!(EncodedPins::new(nine, Level::High), Err(Error::TooManyPins)));
    }
}
