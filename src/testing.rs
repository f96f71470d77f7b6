//! Test doubles for exercising buttons without hardware.
//!
//! Time is already an explicit argument to `check`, so no fake clock is
//! needed: a test just passes the millisecond value it wants.
//!
//! - `EventTracker` records dispatched events (fixed capacity, no alloc)
//! - `FakePin` / `FakeAnalog` stand in for a GPIO and an ADC channel
//! - `FakeSource` serves settable levels per pin id
//! - `ButtonHelper` presses, releases and ticks one button

use core::cell::{Cell, RefCell};

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use heapless::Vec;

use crate::button::Button;
use crate::event::{Event, EventHandler, Level};
use crate::source::{AnalogRead, ButtonSource};

/// Records kept per tracker. A single tick rarely emits more than three.
pub const MAX_EVENTS: usize = 16;

/// One dispatched event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventRecord {
    pub pin: u8,
    pub id: u8,
    pub event: Event,
    pub level: Level,
}

/// An `EventHandler` that remembers what it was given.
///
/// Events beyond `MAX_EVENTS` are dropped.
#[derive(Debug, Default)]
pub struct EventTracker {
    records: RefCell<Vec<EventRecord, MAX_EVENTS>>,
}

impl EventTracker {
    pub const fn new() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
        }
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn record(&self, index: usize) -> Option<EventRecord> {
        self.records.borrow().get(index).copied()
    }

    pub fn records(&self) -> Vec<EventRecord, MAX_EVENTS> {
        self.records.borrow().clone()
    }

    /// Just the event types, in dispatch order.
    pub fn events(&self) -> Vec<Event, MAX_EVENTS> {
        self.records.borrow().iter().map(|r| r.event).collect()
    }

    /// How many times `event` was dispatched.
    pub fn count(&self, event: Event) -> usize {
        self.records.borrow().iter().filter(|r| r.event == event).count()
    }
}

impl EventHandler for EventTracker {
    fn handle_event(&self, button: &Button<'_>, event: Event, level: Level) {
        let record = EventRecord {
            pin: button.pin(),
            id: button.id(),
            event,
            level,
        };
        let _ = self.records.borrow_mut().push(record);
    }
}

/// Error reported by a `FakePin` set to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakePinError;

impl embedded_hal::digital::Error for FakePinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A GPIO input whose level the test sets. Read through `&FakePin`, so the
/// test keeps a handle while a source owns the reference.
#[derive(Debug, Default)]
pub struct FakePin {
    high: Cell<bool>,
    failing: Cell<bool>,
}

impl FakePin {
    pub const fn new(high: bool) -> Self {
        Self {
            high: Cell::new(high),
            failing: Cell::new(false),
        }
    }

    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    /// Make subsequent reads return an error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl ErrorType for &FakePin {
    type Error = FakePinError;
}

impl InputPin for &FakePin {
    fn is_high(&mut self) -> Result<bool, FakePinError> {
        if self.failing.get() {
            return Err(FakePinError);
        }
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, FakePinError> {
        self.is_high().map(|high| !high)
    }
}

/// An ADC channel whose reading the test sets.
#[derive(Debug, Default)]
pub struct FakeAnalog {
    value: Cell<u16>,
    failing: Cell<bool>,
}

impl FakeAnalog {
    pub const fn new(value: u16) -> Self {
        Self {
            value: Cell::new(value),
            failing: Cell::new(false),
        }
    }

    pub fn set(&self, value: u16) {
        self.value.set(value);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl AnalogRead for &FakeAnalog {
    type Error = FakePinError;

    fn read_analog(&mut self) -> Result<u16, FakePinError> {
        if self.failing.get() {
            return Err(FakePinError);
        }
        Ok(self.value.get())
    }
}

/// Serves a settable level for each of `N` pin ids.
#[derive(Debug)]
pub struct FakeSource<const N: usize> {
    levels: [Level; N],
}

impl<const N: usize> FakeSource<N> {
    pub const fn new(level: Level) -> Self {
        Self { levels: [level; N] }
    }

    pub fn set(&mut self, pin: u8, level: Level) {
        if let Some(slot) = self.levels.get_mut(pin as usize) {
            *slot = level;
        }
    }
}

impl<const N: usize> ButtonSource for FakeSource<N> {
    fn read_button(&mut self, pin: u8) -> Level {
        self.levels.get(pin as usize).copied().unwrap_or(Level::Unknown)
    }
}

/// Drives one button through press / release / idle ticks.
///
/// Each call clears the tracker first, so after a call the tracker holds
/// exactly the events that tick produced.
pub struct ButtonHelper<'a, 'c> {
    button: &'a mut Button<'c>,
    tracker: &'a EventTracker,
}

impl<'a, 'c> ButtonHelper<'a, 'c> {
    pub fn new(button: &'a mut Button<'c>, tracker: &'a EventTracker) -> Self {
        Self { button, tracker }
    }

    /// Reset the button and the tracker to their pristine state.
    pub fn init(&mut self) {
        self.tracker.clear();
        self.button.reinit();
    }

    /// Feed the pressed level at `time`.
    pub fn press(&mut self, time: u32) {
        let level = self.button.released_level().inverted();
        self.tick(time, level);
    }

    /// Feed the released level at `time`.
    pub fn release(&mut self, time: u32) {
        let level = self.button.released_level();
        self.tick(time, level);
    }

    /// Feed the button's current debounced level at `time`, i.e. let time
    /// pass without touching the button.
    pub fn check(&mut self, time: u32) {
        let level = match self.button.last_level() {
            Level::Unknown => self.button.released_level(),
            level => level,
        };
        self.tick(time, level);
    }

    pub fn button(&self) -> &Button<'c> {
        &*self.button
    }

    fn tick(&mut self, time: u32, level: Level) {
        self.tracker.clear();
        self.button.check_state(time, level);
    }
}
