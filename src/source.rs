//! Pin reading strategies.
//!
//! A `ButtonSource` turns a button's pin id into a level. Three strategies
//! are provided:
//!
//! - **Direct**: one GPIO per button (`DirectPins`)
//! - **Encoded**: N GPIOs carrying a binary button number (`EncodedPins`)
//! - **Ladder**: one ADC channel behind a resistor ladder (`LadderPin`)
//!
//! The shared-signal strategies implement `VirtualPins` and get their
//! `ButtonSource` impl for free.

use crate::event::Level;
use embedded_hal::digital::InputPin;

/// Reads the raw (undebounced) level of a button's pin.
pub trait ButtonSource {
    fn read_button(&mut self, pin: u8) -> Level;
}

/// Source of a 16-bit ADC reading, e.g. a oneshot read of an analog pin.
pub trait AnalogRead {
    type Error: core::fmt::Debug;

    fn read_analog(&mut self) -> Result<u16, Self::Error>;
}

/// A physical signal shared by several buttons, decoded into the single
/// virtual pin that is currently active.
pub trait VirtualPins {
    /// Read the hardware once and return the active virtual pin, or `None`
    /// if the read failed.
    fn virtual_pin(&mut self) -> Option<u8>;

    /// Virtual pin id meaning "no button pressed".
    fn no_button_pin(&self) -> u8;

    /// Level reported for the button whose virtual pin is active.
    fn pressed_level(&self) -> Level;

    /// Synthesized level for `pin`, given the active virtual pin.
    fn level_for(&self, pin: u8, active: Option<u8>) -> Level {
        let pressed = self.pressed_level();
        match active {
            Some(active) if active == pin => pressed,
            Some(_) => pressed.inverted(),
            None => Level::Unknown,
        }
    }
}

impl<V: VirtualPins> ButtonSource for V {
    /// Reads the whole shared signal for a single button. `ButtonGroup`
    /// avoids this cost when several buttons share the signal.
    fn read_button(&mut self, pin: u8) -> Level {
        let active = self.virtual_pin();
        self.level_for(pin, active)
    }
}

/// Read a digital input as a `Level`, mapping a failed read to `Unknown`.
pub(crate) fn read_level<P: InputPin>(pin: &mut P) -> Level {
    match pin.is_high() {
        Ok(high) => Level::from(high),
        Err(_) => {
            warn!("pin read failed");
            Level::Unknown
        }
    }
}

/// One GPIO per button; a button's pin id indexes into `pins`.
pub struct DirectPins<P, const N: usize> {
    pins: [P; N],
}

impl<P: InputPin, const N: usize> DirectPins<P, N> {
    pub fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    pub fn pins_mut(&mut self) -> &mut [P; N] {
        &mut self.pins
    }

    pub fn release(self) -> [P; N] {
        self.pins
    }
}

impl<P: InputPin, const N: usize> ButtonSource for DirectPins<P, N> {
    /// An out-of-range pin id reads as `Unknown`.
    fn read_button(&mut self, pin: u8) -> Level {
        match self.pins.get_mut(pin as usize) {
            Some(p) => read_level(p),
            None => Level::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePin;

    #[test]
    fn direct_pins_read_by_index() {
        let a = FakePin::new(true);
        let b = FakePin::new(false);
        let mut pins = DirectPins::new([&a, &b]);

        assert_eq!(pins.read_button(0), Level::High);
        assert_eq!(pins.read_button(1), Level::Low);

        b.set_high(true);
        assert_eq!(pins.read_button(1), Level::High);
    }

    #[test]
    fn direct_pins_out_of_range_is_unknown() {
        let a = FakePin::new(true);
        let mut pins = DirectPins::new([&a]);
        assert_eq!(pins.read_button(3), Level::Unknown);
    }

    #[test]
    fn level_inversion_keeps_unknown() {
        assert_eq!(Level::Low.inverted(), Level::High);
        assert_eq!(Level::High.inverted(), Level::Low);
        assert_eq!(Level::Unknown.inverted(), Level::Unknown);
    }
}
