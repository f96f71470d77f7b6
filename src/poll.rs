//! Async polling loops on top of `embassy-time`.
//!
//! The classifier is clock-agnostic; these helpers supply `now_ms` from
//! `Instant::now()` and call `check` at a fixed cadence. Spawn one from an
//! embassy task:
//!
//! ```ignore
//! #[embassy_executor::task]
//! async fn buttons(mut group: LadderButtonGroup<'static, 'static, 'static, Adc>) -> ! {
//!     buttonkit::poll::poll_group(&mut group, Duration::from_millis(5)).await
//! }
//! ```

use crate::button::Button;
use crate::group::ButtonGroup;
use crate::source::{ButtonSource, VirtualPins};
use embassy_time::{Duration, Instant, Ticker};

/// Default polling period, a quarter of the default debounce delay.
pub const DEFAULT_POLL_INTERVAL: Duration =
    Duration::from_millis(crate::config::DEFAULT_POLL_INTERVAL_MS);

/// Low 32 bits of the embassy clock in milliseconds. The button only keeps
/// the low 16.
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Poll independent buttons that all read from `source`. Never returns.
pub async fn poll_buttons<S: ButtonSource>(
    buttons: &mut [Button<'_>],
    source: &mut S,
    interval: Duration,
) -> ! {
    debug!("poll: {=usize} buttons every {=u64} ms", buttons.len(), interval.as_millis());
    let mut ticker = Ticker::every(interval);
    loop {
        let now = now_ms();
        for button in buttons.iter_mut() {
            button.check(now, source);
        }
        ticker.next().await;
    }
}

/// Poll a group sharing one encoder or ladder. Never returns.
pub async fn poll_group<V: VirtualPins>(group: &mut ButtonGroup<'_, '_, V>, interval: Duration) -> ! {
    debug!(
        "poll: group of {=usize} every {=u64} ms",
        group.buttons().len(),
        interval.as_millis()
    );
    let mut ticker = Ticker::every(interval);
    loop {
        group.check_buttons(now_ms());
        ticker.next().await;
    }
}
