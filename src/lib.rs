//! Debounced button events for embedded targets.
//!
//! A `Button` turns a raw, noisy pin level into a stream of gestures:
//! Pressed, Released, Clicked, DoubleClicked, LongPressed, RepeatPressed
//! and LongReleased. Timing and feature flags live in a `ButtonConfig`
//! shared by any number of buttons.
//!
//! Pins are read through a `ButtonSource`:
//!   - `DirectPins` - one GPIO per button (embedded-hal `InputPin`)
//!   - `EncodedPins` - N GPIOs carrying a binary button number
//!   - `LadderPin` - one ADC channel behind a resistor ladder
//!
//! No heap, no clock: the caller passes a millisecond timestamp to every
//! `check`. With the `embassy` feature, `poll` provides ready-made polling
//! loops on `embassy-time`.
//!
//! Usage: `cargo test` runs everything on the host.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod button;
pub mod config;
pub mod encoded;
pub mod error;
pub mod event;
pub mod group;
pub mod ladder;
#[cfg(feature = "embassy")]
pub mod poll;
pub mod source;
pub mod testing;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use button::Button;
pub use config::{ButtonConfig, Features};
pub use encoded::{Encoded4To2Pins, Encoded8To3Pins, EncodedPins};
pub use error::{Error, TimingParam};
pub use event::{Event, EventHandler, Level};
pub use group::{ButtonGroup, EncodedButtonGroup, LadderButtonGroup};
pub use ladder::LadderPin;
pub use source::{AnalogRead, ButtonSource, DirectPins, VirtualPins};
