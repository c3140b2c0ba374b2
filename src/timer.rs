//! Wall-clock timers with freeze/resume semantics.
//!
//! Every wait in the game (countdown, spawn gap, score cadence, jump lock,
//! game-over report) is a [`Timer`]. Timers are polled with the current
//! instant rather than counting ticks, so irregular tick spacing never
//! stretches or shrinks a delay. Freezing a timer stores the remaining delay;
//! resuming re-arms it with exactly that remainder.

use crate::constants::MIN_TIMER_PERIOD_MS;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Armed { deadline: Instant },
    Frozen { remaining: Duration },
    Expired,
    Cancelled,
}

/// One-shot or repeating timer keyed to wall-clock time
#[derive(Debug, Clone)]
pub struct Timer {
    period: Duration,
    repeating: bool,
    state: TimerState,
}

impl Timer {
    /// One-shot timer expiring `delay` after `start`
    pub fn once(delay: Duration, start: Instant) -> Self {
        Self {
            period: delay,
            repeating: false,
            state: TimerState::Armed { deadline: start + delay },
        }
    }

    /// Timer expiring every `period`, first at `start + period`.
    /// Periods shorter than one millisecond are raised to it.
    pub fn repeating(period: Duration, start: Instant) -> Self {
        let period = period.max(Duration::from_millis(MIN_TIMER_PERIOD_MS));
        Self {
            period,
            repeating: true,
            state: TimerState::Armed { deadline: start + period },
        }
    }

    /// Number of expirations up to and including `now`.
    ///
    /// A repeating timer that was polled late reports every period it missed
    /// and keeps its original phase. Frozen, expired and cancelled timers
    /// report zero.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let TimerState::Armed { deadline } = self.state else {
            return 0;
        };
        if now < deadline {
            return 0;
        }

        if !self.repeating {
            self.state = TimerState::Expired;
            return 1;
        }

        let overdue = now.duration_since(deadline).as_nanos() / self.period.as_nanos();
        let fired = u32::try_from(overdue.saturating_add(1)).unwrap_or(u32::MAX);
        self.state = TimerState::Armed {
            deadline: deadline + self.period * fired,
        };
        fired
    }

    /// Freeze the remaining delay; no-op unless armed
    pub fn pause(&mut self, now: Instant) {
        if let TimerState::Armed { deadline } = self.state {
            self.state = TimerState::Frozen {
                remaining: deadline.saturating_duration_since(now),
            };
        }
    }

    /// Re-arm a frozen timer with its stored remainder; no-op unless frozen
    pub fn resume(&mut self, now: Instant) {
        if let TimerState::Frozen { remaining } = self.state {
            self.state = TimerState::Armed { deadline: now + remaining };
        }
    }

    /// Cancel the timer. Cancelling twice, or after expiry, changes nothing.
    pub fn cancel(&mut self) {
        if matches!(self.state, TimerState::Armed { .. } | TimerState::Frozen { .. }) {
            self.state = TimerState::Cancelled;
        }
    }

    /// Time left until the next expiration, `None` once expired or cancelled
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.state {
            TimerState::Armed { deadline } => Some(deadline.saturating_duration_since(now)),
            TimerState::Frozen { remaining } => Some(remaining),
            TimerState::Expired | TimerState::Cancelled => None,
        }
    }

    /// Next expiration instant while armed
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            TimerState::Armed { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. } | TimerState::Frozen { .. })
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.state, TimerState::Frozen { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == TimerState::Cancelled
    }

    pub const fn period(&self) -> Duration {
        self.period
    }
}
