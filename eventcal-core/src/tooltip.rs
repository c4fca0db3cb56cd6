//! Hover tooltip with debounced dismissal.
//!
//! Leaving an event block does not hide the tooltip right away: it stays up
//! for `TOOLTIP_DISMISS_DELAY` so the pointer can travel from the block into
//! the tooltip itself. Entering the tooltip in that window cancels the
//! dismissal. Time is passed in by the caller.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const TOOLTIP_DISMISS_DELAY: Duration = Duration::from_millis(100);

/// Screen position the tooltip is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum State {
    #[default]
    Hidden,
    Shown {
        event_id: String,
        at: ScreenPoint,
    },
    Leaving {
        event_id: String,
        at: ScreenPoint,
        since: Instant,
    },
}

#[derive(Debug, Clone, Default)]
pub struct HoverTooltip {
    state: State,
}

impl HoverTooltip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered an event block.
    pub fn hover(&mut self, event_id: impl Into<String>, at: ScreenPoint) {
        self.state = State::Shown {
            event_id: event_id.into(),
            at,
        };
    }

    /// Pointer left the event block or the tooltip; start the dismissal timer.
    pub fn leave(&mut self, now: Instant) {
        if let State::Shown { event_id, at } = std::mem::take(&mut self.state) {
            self.state = State::Leaving {
                event_id,
                at,
                since: now,
            };
        }
    }

    /// Pointer entered the tooltip; cancel a pending dismissal.
    pub fn enter_tooltip(&mut self) {
        if let State::Leaving { event_id, at, .. } = std::mem::take(&mut self.state) {
            self.state = State::Shown { event_id, at };
        }
    }

    /// Advance the timer. Returns true if the tooltip was hidden by this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = matches!(
            &self.state,
            State::Leaving { since, .. }
                if now.saturating_duration_since(*since) >= TOOLTIP_DISMISS_DELAY
        );
        if expired {
            self.state = State::Hidden;
        }
        expired
    }

    pub fn dismiss(&mut self) {
        self.state = State::Hidden;
    }

    /// Event id and anchor of the visible tooltip, if any.
    pub fn visible(&self) -> Option<(&str, ScreenPoint)> {
        match &self.state {
            State::Hidden => None,
            State::Shown { event_id, at } | State::Leaving { event_id, at, .. } => {
                Some((event_id.as_str(), *at))
            }
        }
    }

    /// Instant at which a pending dismissal fires.
    pub fn dismiss_deadline(&self) -> Option<Instant> {
        match &self.state {
            State::Leaving { since, .. } => Some(*since + TOOLTIP_DISMISS_DELAY),
            _ => None,
        }
    }
}
