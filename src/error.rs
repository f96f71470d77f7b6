//! Unified error type for buttonkit.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! The classifier itself never fails; these errors come from building a
//! pin virtualizer or from the optional `ButtonConfig::validate()` check.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Encoder
    /// An encoder needs at least one physical pin.
    NoPins,

    /// Virtual pin ids are `u8`, so an encoder can use at most 8 pins.
    TooManyPins,

    // Resistor ladder
    /// A ladder needs at least one button level plus the "no button" level.
    TooFewLevels,

    /// Virtual pin ids are `u8`, so a ladder can have at most 256 levels.
    TooManyLevels,

    /// Ladder levels must be strictly increasing.
    LevelsNotIncreasing,

    // Timing
    /// A delay is too close to the 16-bit timestamp rollover to be detected.
    DelayTooLong(TimingParam),

    /// Timing windows are ordered in a way that disables some gestures.
    InconsistentTiming,
}

/// Names the timing parameter that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingParam {
    Debounce,
    Click,
    DoubleClick,
    LongPress,
    RepeatPressDelay,
    RepeatPressInterval,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NoPins => f.write_str("encoder has no pins"),
            Error::TooManyPins => f.write_str("encoder has more than 8 pins"),
            Error::TooFewLevels => f.write_str("ladder needs at least 2 levels"),
            Error::TooManyLevels => f.write_str("ladder has more than 256 levels"),
            Error::LevelsNotIncreasing => f.write_str("ladder levels are not increasing"),
            Error::DelayTooLong(param) => write!(f, "{:?} delay exceeds rollover margin", param),
            Error::InconsistentTiming => f.write_str("timing windows are inconsistent"),
        }
    }
}
