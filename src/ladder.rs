//! Resistor-ladder buttons: one ADC channel, one voltage level per button.
//!
//! Each button pulls the analog pin to a distinct voltage through a
//! resistor divider. `levels` lists the expected ADC reading for each
//! button in increasing order, with the last entry being the reading when
//! nothing is pressed (e.g. 1023 for a 10-bit ADC, 4095 for 12-bit).
//!
//! A reading maps to the first index whose midpoint with the next level is
//! above it, so the virtual pin of the button at `levels[i]` is `i`, and
//! `levels.len() - 1` means "no button".

use crate::error::Error;
use crate::event::Level;
use crate::source::{AnalogRead, VirtualPins};

/// Map an ADC reading onto an index of `levels`.
///
/// Linear search over the midpoints of adjacent levels. Midpoints are
/// truncated integer means, computed wide so 16-bit ADCs do not overflow.
/// Returns `levels.len() - 1` when the reading is above every midpoint.
///
/// Virtual pins are `u8`: with more than 256 levels, indices past 255
/// saturate to 255. `LadderPin::new` rejects such tables.
pub fn extract_index(levels: &[u16], reading: u16) -> u8 {
    let index = levels
        .windows(2)
        .position(|pair| {
            let threshold = (u32::from(pair[0]) + u32::from(pair[1])) / 2;
            u32::from(reading) < threshold
        })
        .unwrap_or(levels.len().saturating_sub(1));
    u8::try_from(index).unwrap_or(u8::MAX)
}

/// An analog pin decoded into one virtual pin via a level table.
pub struct LadderPin<'l, A> {
    adc: A,
    levels: &'l [u16],
    pressed_level: Level,
}

impl<'l, A: AnalogRead> LadderPin<'l, A> {
    /// `released_level` is the level the virtual buttons report when not
    /// pressed. It only needs to match the `Button`s on this ladder.
    pub fn new(adc: A, levels: &'l [u16], released_level: Level) -> Result<Self, Error> {
        if levels.len() < 2 {
            return Err(Error::TooFewLevels);
        }
        if levels.len() > usize::from(u8::MAX) + 1 {
            return Err(Error::TooManyLevels);
        }
        if levels.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::LevelsNotIncreasing);
        }

        let pressed_level = match released_level {
            Level::Low => Level::High,
            _ => Level::Low,
        };
        debug!("ladder: {=usize} levels, pressed={}", levels.len(), pressed_level);

        Ok(Self {
            adc,
            levels,
            pressed_level,
        })
    }

    pub fn levels(&self) -> &'l [u16] {
        self.levels
    }

    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }

    pub fn release(self) -> A {
        self.adc
    }
}

impl<A: AnalogRead> VirtualPins for LadderPin<'_, A> {
    fn virtual_pin(&mut self) -> Option<u8> {
        match self.adc.read_analog() {
            Ok(reading) => Some(extract_index(self.levels, reading)),
            Err(_) => {
                warn!("ladder: adc read failed");
                None
            }
        }
    }

    fn no_button_pin(&self) -> u8 {
        u8::try_from(self.levels.len() - 1).unwrap_or(u8::MAX)
    }

    fn pressed_level(&self) -> Level {
        self.pressed_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ButtonSource;
    use crate::testing::FakeAnalog;

    #[test]
    fn two_levels_split_at_midpoint() {
        let levels = [0, 1023];
        assert_eq!(extract_index(&levels, 0), 0);
        assert_eq!(extract_index(&levels, 510), 0);
        assert_eq!(extract_index(&levels, 511), 1);
        assert_eq!(extract_index(&levels, 1023), 1);
    }

    #[test]
    fn four_button_ladder() {
        // 10-bit ADC, four buttons plus "no button".
        let levels = [0, 327, 512, 844, 1023];
        assert_eq!(extract_index(&levels, 5), 0);
        assert_eq!(extract_index(&levels, 162), 0);
        assert_eq!(extract_index(&levels, 163), 1);
        assert_eq!(extract_index(&levels, 500), 2);
        assert_eq!(extract_index(&levels, 700), 3);
        assert_eq!(extract_index(&levels, 932), 3);
        assert_eq!(extract_index(&levels, 933), 4);
    }

    #[test]
    fn sixteen_bit_levels_do_not_overflow() {
        let levels = [0, 60_000, 65_535];
        assert_eq!(extract_index(&levels, 62_000), 1);
        assert_eq!(extract_index(&levels, 62_768), 2);
    }

    #[test]
    fn oversized_table_saturates_index() {
        let mut levels = [0u16; 300];
        for (i, level) in levels.iter_mut().enumerate() {
            *level = (i as u16) * 100;
        }
        assert_eq!(extract_index(&levels, 0), 0);
        assert_eq!(extract_index(&levels, 25_500), 255);
        assert_eq!(extract_index(&levels, 25_649), 255);
        assert_eq!(extract_index(&levels, 29_900), 255);
        assert_eq!(extract_index(&[], 100), 0);
    }

    #[test]
    fn ladder_reads_virtual_pin() {
        let levels = [0, 512, 1023];
        let adc = FakeAnalog::new(1023);
        let mut ladder = LadderPin::new(&adc, &levels, Level::High).unwrap();
        assert_eq!(ladder.no_button_pin(), 2);
        assert_eq!(ladder.virtual_pin(), Some(2));

        adc.set(500);
        assert_eq!(ladder.virtual_pin(), Some(1));
        assert_eq!(ladder.read_button(1), Level::Low);
        assert_eq!(ladder.read_button(0), Level::High);
    }

    #[test]
    fn failed_adc_read_is_unknown() {
        let levels = [0, 1023];
        let adc = FakeAnalog::new(0);
        adc.set_failing(true);
        let mut ladder = LadderPin::new(&adc, &levels, Level::High).unwrap();
        assert_eq!(ladder.virtual_pin(), None);
        assert_eq!(ladder.read_button(0), Level::Unknown);
    }

    #[test]
    fn rejects_bad_level_tables() {
        let adc = FakeAnalog::new(0);
        assert!(matches!(
            LadderPin::new(&adc, &[1023], Level::High),
            Err(Error::TooFewLevels)
        ));
        let long = [0u16; 257];
        assert!(matches!(
            LadderPin::new(&adc, &long, Level::High),
            Err(Error::TooManyLevels)
        ));
        assert!(matches!(
            LadderPin::new(&adc, &[0, 600, 500, 1023], Level::High),
            Err(Error::LevelsNotIncreasing)
        ));
    }
}
