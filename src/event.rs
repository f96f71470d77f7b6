//! Button levels, event types and the handler interface.

use crate::button::Button;

/// Logical level of a button pin.
///
/// `Unknown` is the third state a button starts in after (re)initialization,
/// and what a failed pin read reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
    Unknown,
}

impl Level {
    /// Swap `Low` and `High`. `Unknown` stays `Unknown`.
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
            Level::Unknown => Level::Unknown,
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Level::Unknown)
    }
}

impl From<bool> for Level {
    /// `true` is `High`.
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Events a button can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Debounced transition to the pressed level.
    Pressed,
    /// Debounced transition to the released level.
    Released,
    /// Pressed and released within the click delay.
    Clicked,
    /// Two clicks within the double-click delay.
    DoubleClicked,
    /// Held for at least the long-press delay. Fires once per press.
    LongPressed,
    /// Auto-generated while held, after the repeat delay and then every
    /// repeat interval.
    RepeatPressed,
    /// Replaces `Released` after a long press when
    /// `Features::SUPPRESS_AFTER_LONG_PRESS` is enabled.
    LongReleased,
}

/// Receives events from every button sharing a `ButtonConfig`.
///
/// Called synchronously from inside `check`, on the polling thread. `level`
/// is the debounced level at dispatch time; the physical pin may already
/// have moved on.
pub trait EventHandler {
    fn handle_event(&self, button: &Button<'_>, event: Event, level: Level);
}

impl<F> EventHandler for F
where
    F: Fn(&Button<'_>, Event, Level),
{
    fn handle_event(&self, button: &Button<'_>, event: Event, level: Level) {
        self(button, event, level)
    }
}
