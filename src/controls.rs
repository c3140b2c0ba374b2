//! Gesture-to-command arbitration: jump edge trigger, jump debounce lock and
//! duck arbitration.

use crate::{gesture::SignalState, timer::Timer};
use std::time::{Duration, Instant};

/// Conditions a jump must satisfy besides a rising mouth edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpGate {
    pub grounded: bool,
    pub ducking: bool,
    pub locked: bool,
}

impl JumpGate {
    pub const fn is_open(&self) -> bool {
        self.grounded && !self.ducking && !self.locked
    }
}

/// Fires on CLOSED -> OPEN transitions of the mouth signal
#[derive(Debug, Clone)]
pub struct EdgeTrigger {
    previous: SignalState,
}

impl Default for EdgeTrigger {
    fn default() -> Self {
        Self {
            previous: SignalState::Closed,
        }
    }
}

impl EdgeTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the current mouth state and decide whether to jump.
    ///
    /// The observed state always becomes the new previous state, so an edge
    /// that arrives while the gate is shut is consumed, not deferred.
    pub fn evaluate(&mut self, current: SignalState, gate: JumpGate) -> bool {
        let rising = self.previous == SignalState::Closed && current == SignalState::Open;
        self.previous = current;
        rising && gate.is_open()
    }

    pub const fn previous(&self) -> SignalState {
        self.previous
    }
}

/// Wall-clock debounce window engaged after every accepted jump
#[derive(Debug, Clone)]
pub struct JumpLock {
    window: Duration,
    timer: Option<Timer>,
}

impl JumpLock {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self { window, timer: None }
    }

    /// Lock jumping for the debounce window starting at `now`
    pub fn engage(&mut self, now: Instant) {
        self.timer = Some(Timer::once(self.window, now));
    }

    /// Whether the lock is still held at `now`; releases it once expired
    pub fn is_locked(&mut self, now: Instant) -> bool {
        let released = match &mut self.timer {
            Some(timer) => timer.poll(now) > 0 || !timer.is_pending(),
            None => false,
        };
        if released {
            self.timer = None;
        }
        self.timer.is_some()
    }

    /// Lock state as of the last update, without advancing time
    pub fn is_held(&self) -> bool {
        self.timer.is_some()
    }

    /// Instant at which the lock releases, `None` when unlocked or frozen
    pub fn expiry(&self) -> Option<Instant> {
        self.timer.as_ref().and_then(Timer::deadline)
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().and_then(|timer| timer.remaining(now))
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(timer) = &mut self.timer {
            timer.pause(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(timer) = &mut self.timer {
            timer.resume(now);
        }
    }

    pub fn release(&mut self) {
        self.timer = None;
    }

    pub const fn window(&self) -> Duration {
        self.window
    }
}

/// Outcome of duck arbitration for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuckDecision {
    /// Switch into the ducking posture
    Enter,
    /// Leave the ducking posture
    Exit,
    /// Stay in the current posture
    Hold,
}

/// Maps the eye signal to the ducking posture
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckArbiter;

impl DuckArbiter {
    /// Closed eyes duck only while grounded; anything else ends a duck.
    /// A duck request while airborne is ignored.
    pub fn decide(eye: SignalState, grounded: bool, ducking: bool) -> DuckDecision {
        let wants_duck = eye == SignalState::Closed && grounded;
        match (wants_duck, ducking) {
            (true, false) => DuckDecision::Enter,
            (false, true) => DuckDecision::Exit,
            _ => DuckDecision::Hold,
        }
    }
}
