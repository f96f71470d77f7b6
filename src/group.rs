//! Batch driver for buttons that share one physical signal.
//!
//! Calling `Button::check` on each button of an encoder or ladder would
//! re-read the hardware once per button. A `ButtonGroup` reads the signal
//! once per tick, then feeds every button its synthesized level.

use crate::button::Button;
use crate::config::ButtonConfig;
use crate::encoded::EncodedPins;
use crate::ladder::LadderPin;
use crate::source::VirtualPins;

/// Buttons on an N-pin binary encoder.
pub type EncodedButtonGroup<'b, 'c, P, const N: usize> = ButtonGroup<'b, 'c, EncodedPins<P, N>>;

/// Buttons on a resistor ladder.
pub type LadderButtonGroup<'b, 'c, 'l, A> = ButtonGroup<'b, 'c, LadderPin<'l, A>>;

/// A virtual-pin source plus the buttons it drives.
pub struct ButtonGroup<'b, 'c, V> {
    source: V,
    buttons: &'b mut [Button<'c>],
}

impl<'b, 'c, V: VirtualPins> ButtonGroup<'b, 'c, V> {
    /// Take over `buttons` and point each of them at `config`.
    ///
    /// Each button's pin must be its virtual pin on `source`.
    pub fn new(source: V, config: &'c ButtonConfig<'c>, buttons: &'b mut [Button<'c>]) -> Self {
        for button in buttons.iter_mut() {
            button.set_config(config);
        }
        debug!(
            "group: {=usize} buttons, no-button pin {=u8}",
            buttons.len(),
            source.no_button_pin()
        );
        Self { source, buttons }
    }

    /// Read the shared signal once and advance every button.
    pub fn check_buttons(&mut self, now_ms: u32) {
        let active = self.source.virtual_pin();
        for button in self.buttons.iter_mut() {
            let level = self.source.level_for(button.pin(), active);
            button.check_state(now_ms, level);
        }
    }

    /// Reset every button to its pristine `Unknown` state.
    pub fn reinit(&mut self) {
        debug!("group: reinit {=usize} buttons", self.buttons.len());
        for button in self.buttons.iter_mut() {
            button.reinit();
        }
    }

    pub fn no_button_pin(&self) -> u8 {
        self.source.no_button_pin()
    }

    pub fn buttons(&self) -> &[Button<'c>] {
        &*self.buttons
    }

    pub fn buttons_mut(&mut self) -> &mut [Button<'c>] {
        &mut *self.buttons
    }

    pub fn source(&self) -> &V {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut V {
        &mut self.source
    }

    /// Give back the source; the buttons keep their config.
    pub fn release(self) -> V {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Features;
    use crate::encoded::Encoded4To2Pins;
    use crate::event::{Event, Level};
    use crate::testing::{EventTracker, FakeAnalog, FakePin};

    #[test]
    fn group_assigns_shared_config() {
        let other = ButtonConfig::new();
        let mut config = ButtonConfig::new();
        config.set_debounce_delay(5);

        let mut buttons = [
            Button::with_config(&other, 1, Level::High, 0),
            Button::with_config(&other, 2, Level::High, 1),
        ];
        let bit0 = FakePin::new(true);
        let bit1 = FakePin::new(true);
        let encoder = Encoded4To2Pins::new([&bit0, &bit1], Level::High).unwrap();
        let group = ButtonGroup::new(encoder, &config, &mut buttons);

        for button in group.buttons() {
            assert_eq!(button.config().debounce_delay(), 5);
        }
    }

    #[test]
    fn encoder_drives_only_the_active_button() {
        let tracker = EventTracker::new();
        let mut config = ButtonConfig::new();
        config.set_event_handler(&tracker);

        let mut buttons = [
            Button::with_config(&config, 1, Level::High, 0),
            Button::with_config(&config, 2, Level::High, 1),
            Button::with_config(&config, 3, Level::High, 2),
        ];
        let bit0 = FakePin::new(true);
        let bit1 = FakePin::new(true);
        let encoder = Encoded4To2Pins::new([&bit0, &bit1], Level::High).unwrap();
        let mut group = ButtonGroup::new(encoder, &config, &mut buttons);

        // Baseline: nothing pressed.
        group.check_buttons(0);
        group.check_buttons(50);
        assert!(tracker.is_empty());

        // Press S2 (bit1 low).
        bit1.set_high(false);
        group.check_buttons(100);
        group.check_buttons(130);
        assert_eq!(tracker.len(), 1);
        let record = tracker.record(0).unwrap();
        assert_eq!(record.pin, 2);
        assert_eq!(record.event, Event::Pressed);
        assert_eq!(record.level, Level::Low);

        tracker.clear();
        bit1.set_high(true);
        group.check_buttons(200);
        group.check_buttons(230);
        assert_eq!(tracker.events().as_slice(), &[Event::Released]);
        assert_eq!(tracker.record(0).unwrap().pin, 2);
    }

    #[test]
    fn ladder_group_clicks() {
        let tracker = EventTracker::new();
        let mut config = ButtonConfig::new();
        config.set_feature(Features::CLICK);
        config.set_event_handler(&tracker);

        let levels = [0, 512, 1023];
        let adc = FakeAnalog::new(1023);
        let ladder = LadderPin::new(&adc, &levels, Level::High).unwrap();
        let mut buttons = [
            Button::with_config(&config, 0, Level::High, 0),
            Button::with_config(&config, 1, Level::High, 1),
        ];
        let mut group = ButtonGroup::new(ladder, &config, &mut buttons);
        assert_eq!(group.no_button_pin(), 2);

        group.check_buttons(0);
        group.check_buttons(30);

        adc.set(490);
        for t in (40..=120).step_by(5) {
            group.check_buttons(t);
        }
        adc.set(1023);
        for t in (125..=200).step_by(5) {
            group.check_buttons(t);
        }

        assert_eq!(
            tracker.events().as_slice(),
            &[Event::Pressed, Event::Released, Event::Clicked]
        );
        assert!(tracker.records().iter().all(|r| r.pin == 1));
    }

    #[test]
    fn failed_read_freezes_every_button() {
        let tracker = EventTracker::new();
        let mut config = ButtonConfig::new();
        config.set_event_handler(&tracker);

        let levels = [0, 1023];
        let adc = FakeAnalog::new(1023);
        let ladder = LadderPin::new(&adc, &levels, Level::High).unwrap();
        let mut buttons = [Button::with_config(&config, 0, Level::High, 0)];
        let mut group = ButtonGroup::new(ladder, &config, &mut buttons);

        group.check_buttons(0);
        group.check_buttons(30);
        adc.set(0);
        adc.set_failing(true);
        for t in (35..=200).step_by(5) {
            group.check_buttons(t);
        }
        assert!(tracker.is_empty());
        assert_eq!(group.buttons()[0].last_level(), Level::High);
    }

    #[test]
    fn reinit_returns_buttons_to_unknown() {
        let config = ButtonConfig::new();
        let mut buttons = [Button::with_config(&config, 1, Level::High, 0)];
        let bit0 = FakePin::new(true);
        let encoder = EncodedPins::new([&bit0], Level::High).unwrap();
        let mut group = ButtonGroup::new(encoder, &config, &mut buttons);

        group.check_buttons(0);
        group.check_buttons(30);
        assert_eq!(group.buttons()[0].last_level(), Level::High);

        group.reinit();
        assert_eq!(group.buttons()[0].last_level(), Level::Unknown);
    }
}
