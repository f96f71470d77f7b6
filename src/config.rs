//! Timing defaults, feature flags and the shared button configuration.
//!
//! All timing parameters have a compile-time default here so they can be
//! tuned in one place; a `ButtonConfig` starts from these defaults and can
//! override each one during setup. Many buttons share a single config.

use crate::error::{Error, TimingParam};
use crate::event::EventHandler;

// Timing defaults (ms)

/// Time a raw reading must hold steady before it is trusted.
pub const DEFAULT_DEBOUNCE_DELAY_MS: u16 = 20;

/// Longest press that still counts as a click.
pub const DEFAULT_CLICK_DELAY_MS: u16 = 200;

/// Longest gap between two clicks that merges them into a double-click.
pub const DEFAULT_DOUBLE_CLICK_DELAY_MS: u16 = 400;

/// Hold time before a LongPressed event.
pub const DEFAULT_LONG_PRESS_DELAY_MS: u16 = 1000;

/// Hold time before the first RepeatPressed event.
pub const DEFAULT_REPEAT_PRESS_DELAY_MS: u16 = 1000;

/// Period between subsequent RepeatPressed events.
pub const DEFAULT_REPEAT_PRESS_INTERVAL_MS: u16 = 200;

/// Largest delay `ButtonConfig::validate()` accepts.
///
/// Timestamps are 16-bit and wrap every 65.536 s. A delay must be crossed
/// by some poll before the elapsed time wraps, so leave room for a late
/// poll below `u16::MAX`.
pub const MAX_DELAY_MS: u16 = 65_000;

/// Suggested polling period: at least 4 samples per debounce window.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5;

/// Independently switchable gesture features (a 16-bit mask).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Features(u16);

impl Features {
    /// No optional events; only Pressed and Released are emitted.
    pub const NONE: Features = Features(0);
    /// Emit Clicked.
    pub const CLICK: Features = Features(0x001);
    /// Emit DoubleClicked.
    pub const DOUBLE_CLICK: Features = Features(0x002);
    /// Emit LongPressed.
    pub const LONG_PRESS: Features = Features(0x004);
    /// Emit RepeatPressed while held.
    pub const REPEAT_PRESS: Features = Features(0x008);
    /// Suppress Released after a Clicked.
    pub const SUPPRESS_AFTER_CLICK: Features = Features(0x010);
    /// Suppress Released after a DoubleClicked.
    pub const SUPPRESS_AFTER_DOUBLE_CLICK: Features = Features(0x020);
    /// Replace Released with LongReleased after a LongPressed.
    pub const SUPPRESS_AFTER_LONG_PRESS: Features = Features(0x040);
    /// Suppress Released after RepeatPressed events.
    pub const SUPPRESS_AFTER_REPEAT_PRESS: Features = Features(0x080);
    /// Withhold Clicked until it can no longer become a DoubleClicked.
    pub const SUPPRESS_CLICK_BEFORE_DOUBLE_CLICK: Features = Features(0x100);
    /// All of the suppression features.
    pub const SUPPRESS_ALL: Features = Features(0x1F0);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn from_bits(bits: u16) -> Self {
        Features(bits)
    }

    /// True if every bit of `other` is set.
    pub const fn contains(self, other: Features) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Features) -> Self {
        Features(self.0 | other.0)
    }

    pub const fn difference(self, other: Features) -> Self {
        Features(self.0 & !other.0)
    }
}

impl core::ops::BitOr for Features {
    type Output = Features;

    fn bitor(self, rhs: Features) -> Features {
        self.union(rhs)
    }
}

impl core::ops::BitOrAssign for Features {
    fn bitor_assign(&mut self, rhs: Features) {
        *self = self.union(rhs);
    }
}

/// Timing thresholds, feature mask and event handler shared by buttons.
///
/// Configure it during setup, then hand out `&ButtonConfig` to every
/// button. Buttons only read it, so one config can serve a whole device.
#[derive(Clone, Copy)]
pub struct ButtonConfig<'h> {
    debounce_delay: u16,
    click_delay: u16,
    double_click_delay: u16,
    long_press_delay: u16,
    repeat_press_delay: u16,
    repeat_press_interval: u16,
    features: Features,
    handler: Option<&'h dyn EventHandler>,
}

impl<'h> ButtonConfig<'h> {
    /// Create a config with default timings, no features and no handler.
    pub const fn new() -> Self {
        Self {
            debounce_delay: DEFAULT_DEBOUNCE_DELAY_MS,
            click_delay: DEFAULT_CLICK_DELAY_MS,
            double_click_delay: DEFAULT_DOUBLE_CLICK_DELAY_MS,
            long_press_delay: DEFAULT_LONG_PRESS_DELAY_MS,
            repeat_press_delay: DEFAULT_REPEAT_PRESS_DELAY_MS,
            repeat_press_interval: DEFAULT_REPEAT_PRESS_INTERVAL_MS,
            features: Features::NONE,
            handler: None,
        }
    }

    pub fn debounce_delay(&self) -> u16 {
        self.debounce_delay
    }

    pub fn set_debounce_delay(&mut self, ms: u16) {
        self.debounce_delay = ms;
    }

    pub fn click_delay(&self) -> u16 {
        self.click_delay
    }

    pub fn set_click_delay(&mut self, ms: u16) {
        self.click_delay = ms;
    }

    pub fn double_click_delay(&self) -> u16 {
        self.double_click_delay
    }

    pub fn set_double_click_delay(&mut self, ms: u16) {
        self.double_click_delay = ms;
    }

    pub fn long_press_delay(&self) -> u16 {
        self.long_press_delay
    }

    pub fn set_long_press_delay(&mut self, ms: u16) {
        self.long_press_delay = ms;
    }

    pub fn repeat_press_delay(&self) -> u16 {
        self.repeat_press_delay
    }

    pub fn set_repeat_press_delay(&mut self, ms: u16) {
        self.repeat_press_delay = ms;
    }

    pub fn repeat_press_interval(&self) -> u16 {
        self.repeat_press_interval
    }

    pub fn set_repeat_press_interval(&mut self, ms: u16) {
        self.repeat_press_interval = ms;
    }

    /// Current feature mask.
    pub fn features(&self) -> Features {
        self.features
    }

    /// Enable one or more features.
    pub fn set_feature(&mut self, features: Features) {
        self.features |= features;
    }

    /// Disable one or more features.
    pub fn clear_feature(&mut self, features: Features) {
        self.features = self.features.difference(features);
    }

    /// True if every feature in `features` is enabled.
    pub fn is_feature(&self, features: Features) -> bool {
        self.features.contains(features)
    }

    /// Disable all features.
    pub fn reset_features(&mut self) {
        self.features = Features::NONE;
    }

    /// Install the handler that receives every event from buttons using
    /// this config.
    pub fn set_event_handler(&mut self, handler: &'h dyn EventHandler) {
        self.handler = Some(handler);
    }

    /// Remove the handler. Events are then silently dropped.
    pub fn clear_event_handler(&mut self) {
        self.handler = None;
    }

    pub fn event_handler(&self) -> Option<&'h dyn EventHandler> {
        self.handler
    }

    /// Check the timings for values the classifier cannot honour.
    ///
    /// Nothing enforces this; a config that fails validation still works
    /// but detects fewer gestures.
    pub fn validate(&self) -> Result<(), Error> {
        let delays = [
            (self.debounce_delay, TimingParam::Debounce),
            (self.click_delay, TimingParam::Click),
            (self.double_click_delay, TimingParam::DoubleClick),
            (self.long_press_delay, TimingParam::LongPress),
            (self.repeat_press_delay, TimingParam::RepeatPressDelay),
            (self.repeat_press_interval, TimingParam::RepeatPressInterval),
        ];
        for (delay, param) in delays {
            if delay > MAX_DELAY_MS {
                return Err(Error::DelayTooLong(param));
            }
        }

        if self.debounce_delay >= self.click_delay || self.click_delay > self.double_click_delay {
            return Err(Error::InconsistentTiming);
        }

        Ok(())
    }
}

/// Config used by `Button::new` until another one is assigned.
pub const DEFAULT_BUTTON_CONFIG: ButtonConfig<'static> = ButtonConfig::new();

impl Default for ButtonConfig<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ButtonConfig<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ButtonConfig")
            .field("debounce_delay", &self.debounce_delay)
            .field("click_delay", &self.click_delay)
            .field("double_click_delay", &self.double_click_delay)
            .field("long_press_delay", &self.long_press_delay)
            .field("repeat_press_delay", &self.repeat_press_delay)
            .field("repeat_press_interval", &self.repeat_press_interval)
            .field("features", &self.features)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
