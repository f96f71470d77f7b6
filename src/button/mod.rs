//! Per-button debounce and gesture classifier.
//!
//! A `Button` holds only explicit state (a tri-state level, a byte of flags
//! and four 16-bit timestamps), so `check` can be called from any polling
//! loop and resumed at any time. Every call runs the same fixed pipeline:
//!
//! 1. debounce filter - a changed reading must hold for the debounce delay
//! 2. initialization gate - the first accepted reading is the baseline
//! 3. edge detection - Pressed / Released plus click classification
//! 4. long-press timer
//! 5. repeat-press timer
//! 6. click window closure - postponed clicks and orphaned clicks
//!
//! All durations are compared with wrapping `u16` subtraction, which stays
//! correct across the 65.536 s timestamp rollover as long as each delay is
//! well below that bound.

mod flags;


use crate::config::{ButtonConfig, Features, DEFAULT_BUTTON_CONFIG};
use crate::event::{Event, Level};
use crate::source::ButtonSource;
use flags::Flags;

/// Milliseconds elapsed from `since` to `now`, rollover-safe.
#[inline]
fn elapsed(now: u16, since: u16) -> u16 {
    now.wrapping_sub(since)
}

/// One logical button.
///
/// `pin` is either a physical pin id (read through a `ButtonSource`) or a
/// virtual pin id assigned by an encoder or resistor ladder.
#[derive(Debug)]
pub struct Button<'c> {
    config: &'c ButtonConfig<'c>,
    pin: u8,
    id: u8,
    released_level: Level,
    flags: Flags,
    last_level: Level,
    // Each timestamp is only meaningful while its flag is set.
    debounce_time: u16,
    click_time: u16,
    press_time: u16,
    repeat_time: u16,
}

impl<'c> Button<'c> {
    /// Create a button on the default config, in the pristine `Unknown`
    /// state.
    ///
    /// The default config has default timings, no features and no handler,
    /// so nothing is dispatched until `set_config` points the button at a
    /// real one (`ButtonGroup::new` does this).
    pub const fn new(pin: u8, released_level: Level, id: u8) -> Self {
        Self::with_config(&DEFAULT_BUTTON_CONFIG, pin, released_level, id)
    }

    /// Create a button on `config`, in the pristine `Unknown` state.
    ///
    /// `released_level` is the pin level when the button is not pressed:
    /// `High` for a pull-up wiring, `Low` for a pull-down. `Unknown` is
    /// treated as `High`.
    pub const fn with_config(
        config: &'c ButtonConfig<'c>,
        pin: u8,
        released_level: Level,
        id: u8,
    ) -> Self {
        Self {
            config,
            pin,
            id,
            released_level: Self::normalize(released_level),
            flags: Flags::empty(),
            last_level: Level::Unknown,
            debounce_time: 0,
            click_time: 0,
            press_time: 0,
            repeat_time: 0,
        }
    }

    const fn normalize(released_level: Level) -> Level {
        match released_level {
            Level::Low => Level::Low,
            _ => Level::High,
        }
    }

    /// Reset to the pristine state with new identity parameters.
    pub fn init(&mut self, pin: u8, released_level: Level, id: u8) {
        self.pin = pin;
        self.id = id;
        self.released_level = Self::normalize(released_level);
        self.reinit();
    }

    /// Reset to the pristine state, keeping pin, id and wiring.
    ///
    /// The next accepted reading becomes the baseline and emits nothing.
    pub fn reinit(&mut self) {
        self.flags = Flags::empty();
        self.last_level = Level::Unknown;
        self.debounce_time = 0;
        self.click_time = 0;
        self.press_time = 0;
        self.repeat_time = 0;
    }

    pub fn config(&self) -> &'c ButtonConfig<'c> {
        self.config
    }

    pub fn set_config(&mut self, config: &'c ButtonConfig<'c>) {
        self.config = config;
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Opaque user identifier, e.g. an index into application data.
    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn released_level(&self) -> Level {
        self.released_level
    }

    /// Last debounced level: `Low`, `High`, or `Unknown` before the first
    /// accepted reading.
    pub fn last_level(&self) -> Level {
        self.last_level
    }

    /// True if `level` is this button's released level.
    pub fn is_released(&self, level: Level) -> bool {
        level == self.released_level
    }

    /// True if the debounced state is pressed.
    pub fn is_pressed(&self) -> bool {
        self.last_level.is_known() && !self.is_released(self.last_level)
    }

    /// Read the pin directly, without debouncing or dispatching events.
    ///
    /// Meant for boot-time checks such as "was the button held at reset".
    pub fn is_pressed_raw<S: ButtonSource + ?Sized>(&self, source: &mut S) -> bool {
        let level = source.read_button(self.pin);
        level.is_known() && !self.is_released(level)
    }

    /// Read this button's pin from `source` and advance the state machine.
    ///
    /// `now_ms` is a monotonic millisecond clock; only its low 16 bits are
    /// used. Call at least 3-5 times per debounce delay.
    pub fn check<S: ButtonSource + ?Sized>(&mut self, now_ms: u32, source: &mut S) {
        let level = source.read_button(self.pin);
        self.check_state(now_ms, level);
    }

    /// Advance the state machine with an already-read level.
    ///
    /// Used by `ButtonGroup` after it has read the shared signal once. An
    /// `Unknown` level (failed read) is ignored for this tick.
    pub fn check_state(&mut self, now_ms: u32, level: Level) {
        if !level.is_known() {
            return;
        }
        let now = now_ms as u16;

        let Some(edge_time) = self.check_debounced(now, level) else {
            return;
        };
        if !self.check_initialized(level) {
            return;
        }
        self.check_event(now, edge_time, level);
    }

    /// Returns the time the accepted transition was first seen, or `None`
    /// while the reading is still settling.
    fn check_debounced(&mut self, now: u16, level: Level) -> Option<u16> {
        if self.flags.get(Flags::DEBOUNCING) {
            if elapsed(now, self.debounce_time) >= self.config.debounce_delay() {
                self.flags.clear(Flags::DEBOUNCING);
                Some(self.debounce_time)
            } else {
                None
            }
        } else if level == self.last_level {
            Some(now)
        } else {
            self.flags.set(Flags::DEBOUNCING);
            self.debounce_time = now;
            None
        }
    }

    /// The first accepted reading only establishes the baseline.
    fn check_initialized(&mut self, level: Level) -> bool {
        if self.last_level.is_known() {
            return true;
        }
        self.last_level = level;
        false
    }

    fn check_event(&mut self, now: u16, edge_time: u16, level: Level) {
        if level != self.last_level {
            // Settle pending clicks as of the moment the edge happened, so
            // the debounce delay never decides whether two clicks pair up.
            self.check_click_window(edge_time);

            self.last_level = level;
            if self.is_released(level) {
                self.check_released(edge_time);
            } else {
                self.check_pressed(edge_time);
            }
        }

        let config = self.config;
        if config.is_feature(Features::LONG_PRESS) {
            self.check_long_press(now, level);
        }
        if config.is_feature(Features::REPEAT_PRESS) {
            self.check_repeat_press(now, level);
        }

        self.check_click_window(now);
    }

    fn check_pressed(&mut self, time: u16) {
        self.press_time = time;
        self.flags.set(Flags::PRESSED);
        self.handle_event(Event::Pressed);
    }

    fn check_released(&mut self, time: u16) {
        let config = self.config;

        let click = if config.is_feature(Features::CLICK) || config.is_feature(Features::DOUBLE_CLICK) {
            self.check_clicked(time)
        } else {
            None
        };

        let long_released = self.flags.get(Flags::LONG_PRESSED)
            && config.is_feature(Features::SUPPRESS_AFTER_LONG_PRESS);
        let suppress = long_released
            || (self.flags.get(Flags::REPEAT_PRESSED)
                && config.is_feature(Features::SUPPRESS_AFTER_REPEAT_PRESS))
            || (self.flags.get(Flags::CLICKED) && config.is_feature(Features::SUPPRESS_AFTER_CLICK))
            || (self.flags.get(Flags::DOUBLE_CLICKED)
                && config.is_feature(Features::SUPPRESS_AFTER_DOUBLE_CLICK));

        self.flags.clear(Flags::PRESSED);
        self.flags.clear(Flags::DOUBLE_CLICKED);
        self.flags.clear(Flags::LONG_PRESSED);
        self.flags.clear(Flags::REPEAT_PRESSED);

        if long_released {
            self.handle_event(Event::LongReleased);
        } else if !suppress {
            self.handle_event(Event::Released);
        }

        if let Some(event) = click {
            self.handle_event(event);
        }
    }

    /// Classify the press that just ended. Returns the click event to emit
    /// after the release, if any.
    fn check_clicked(&mut self, time: u16) -> Option<Event> {
        // Not a click unless we saw the press. This happens when the button
        // was already held when the baseline was taken.
        if !self.flags.get(Flags::PRESSED)
            || elapsed(time, self.press_time) > self.config.click_delay()
        {
            self.cancel_pending_click();
            return None;
        }

        let config = self.config;
        if config.is_feature(Features::DOUBLE_CLICK) && self.check_double_clicked(time) {
            // No triple clicks: the second click does not become pending.
            self.flags.clear(Flags::CLICKED);
            return Some(Event::DoubleClicked);
        }

        self.click_time = time;
        self.flags.set(Flags::CLICKED);

        if !config.is_feature(Features::CLICK) {
            return None;
        }
        if config.is_feature(Features::DOUBLE_CLICK)
            && config.is_feature(Features::SUPPRESS_CLICK_BEFORE_DOUBLE_CLICK)
        {
            self.flags.set(Flags::CLICK_POSTPONED);
            return None;
        }
        Some(Event::Clicked)
    }

    fn check_double_clicked(&mut self, time: u16) -> bool {
        if !self.flags.get(Flags::CLICKED) {
            return false;
        }
        if elapsed(time, self.click_time) > self.config.double_click_delay() {
            return false;
        }

        // The withheld Clicked is absorbed into the DoubleClicked.
        self.flags.clear(Flags::CLICK_POSTPONED);
        self.flags.set(Flags::DOUBLE_CLICKED);
        true
    }

    /// A press too long to be a click ends any chance of a double-click, so
    /// a withheld Clicked is delivered now.
    fn cancel_pending_click(&mut self) {
        self.flags.clear(Flags::CLICKED);
        if self.flags.get(Flags::CLICK_POSTPONED) {
            self.flags.clear(Flags::CLICK_POSTPONED);
            self.handle_event(Event::Clicked);
        }
    }

    fn check_long_press(&mut self, now: u16, level: Level) {
        if self.is_released(level)
            || !self.flags.get(Flags::PRESSED)
            || self.flags.get(Flags::LONG_PRESSED)
        {
            return;
        }
        if elapsed(now, self.press_time) >= self.config.long_press_delay() {
            self.flags.set(Flags::LONG_PRESSED);
            self.handle_event(Event::LongPressed);
        }
    }

    /// Repeats stay on a fixed grid anchored at the press edge, so poll
    /// jitter does not accumulate. A stalled poll skips the repeats it
    /// missed rather than firing them in a burst.
    fn check_repeat_press(&mut self, now: u16, level: Level) {
        if self.is_released(level) || !self.flags.get(Flags::PRESSED) {
            return;
        }

        let interval = self.config.repeat_press_interval();
        if self.flags.get(Flags::REPEAT_PRESSED) {
            if elapsed(now, self.repeat_time) < interval {
                return;
            }
            self.repeat_time = self.repeat_time.wrapping_add(interval);
        } else {
            let delay = self.config.repeat_press_delay();
            if elapsed(now, self.press_time) < delay {
                return;
            }
            // First repeat fires right at the delay, not one interval later.
            self.flags.set(Flags::REPEAT_PRESSED);
            self.repeat_time = self.press_time.wrapping_add(delay);
        }

        let behind = elapsed(now, self.repeat_time);
        self.repeat_time = if interval == 0 {
            now
        } else {
            self.repeat_time.wrapping_add(behind - behind % interval)
        };
        self.handle_event(Event::RepeatPressed);
    }

    /// Resolve clicks whose double-click window has closed.
    ///
    /// Runs every tick, not just on edges. Without the orphan cleanup a
    /// click could pair with an unrelated click one timestamp rollover
    /// (65.5 s) later.
    fn check_click_window(&mut self, now: u16) {
        let window = self.config.double_click_delay();

        if self.flags.get(Flags::CLICK_POSTPONED) && elapsed(now, self.click_time) > window {
            self.flags.clear(Flags::CLICK_POSTPONED);
            self.handle_event(Event::Clicked);
        }

        if self.flags.get(Flags::CLICKED) && elapsed(now, self.click_time) > window {
            self.flags.clear(Flags::CLICKED);
        }
    }

    fn handle_event(&self, event: Event) {
        trace!("button {=u8} (id {=u8}): {}", self.pin, self.id, event);
        if let Some(handler) = self.config.event_handler() {
            handler.handle_event(self, event, self.last_level);
        }
    }
}
