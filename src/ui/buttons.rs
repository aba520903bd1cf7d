//! Polled GPIO button input with settle-time debouncing.
//!
//! Three physical buttons (active-high, external pull-down):
//!   - PREV   - cursor back
//!   - NEXT   - cursor forward
//!   - SELECT - context-dependent: enter / confirm / play-stop
//!
//! The lines are sampled once per control-loop pass. At most one event is
//! reported per pass, PREV winning over NEXT winning over SELECT. Once an
//! event has been reported the next sample is held off for
//! `BUTTON_SETTLE_MS`, which is the only debounce the buttons get.

use crate::config::BUTTON_SETTLE_MS;
use crate::ui::ButtonEvent;
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

/// A set of button lines that can be sampled without waiting.
pub trait ButtonLines {
    /// Read every line once and return the highest-priority pressed button.
    fn sample(&mut self) -> Option<ButtonEvent>;
}

impl<T: ButtonLines + ?Sized> ButtonLines for &mut T {
    fn sample(&mut self) -> Option<ButtonEvent> {
        (**self).sample()
    }
}

/// The three front-panel buttons on GPIO inputs.
pub struct Buttons<P> {
    prev: P,
    next: P,
    select: P,
}

impl<P: InputPin> Buttons<P> {
    pub fn new(prev: P, next: P, select: P) -> Self {
        Self { prev, next, select }
    }

    /// Give the pins back.
    pub fn release(self) -> (P, P, P) {
        (self.prev, self.next, self.select)
    }
}

impl<P: InputPin> ButtonLines for Buttons<P> {
    fn sample(&mut self) -> Option<ButtonEvent> {
        // A pin that cannot be read counts as released.
        if self.prev.is_high().unwrap_or(false) {
            Some(ButtonEvent::Prev)
        } else if self.next.is_high().unwrap_or(false) {
            Some(ButtonEvent::Next)
        } else if self.select.is_high().unwrap_or(false) {
            Some(ButtonEvent::Select)
        } else {
            None
        }
    }
}

/// Turns raw line samples into discrete button events.
pub struct Debouncer<L> {
    lines: L,
    settle_ms: u32,
    settling: bool,
}

impl<L: ButtonLines> Debouncer<L> {
    pub fn new(lines: L) -> Self {
        Self::with_settle(lines, BUTTON_SETTLE_MS)
    }

    pub fn with_settle(lines: L, settle_ms: u32) -> Self {
        Self {
            lines,
            settle_ms,
            settling: false,
        }
    }

    /// Sample the buttons once.
    ///
    /// If the previous call produced an event, this first blocks for the
    /// settle period, so whatever the caller did with that event (state
    /// change, redraw) happens before the wait.
    pub async fn poll<D: DelayNs>(&mut self, delay: &mut D) -> Option<ButtonEvent> {
        if self.settling {
            delay.delay_ms(self.settle_ms).await;
            self.settling = false;
        }

        let event = self.lines.sample();
        if let Some(event) = event {
            debug!("Button: {}", event);
            self.settling = true;
        }
        event
    }

    /// True when the next `poll` will wait out a settle period first.
    pub fn is_settling(&self) -> bool {
        self.settling
    }
}
