//! Collision gate: the single point where an overlap becomes game over.

use crate::timer::Timer;
use log::info;
use std::time::{Duration, Instant};

/// Axis-aligned bounding box in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Aabb {
    /// Box centered horizontally on `center_x` and resting on `bottom`
    pub fn from_bottom_center(center_x: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left: center_x - width / 2.0,
            top: bottom - height,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Self) -> bool {
        self.left < other.right() && other.left < self.right() && self.top < other.bottom() && other.top < self.bottom()
    }
}

/// Converts the first overlap into a terminal game-over and a delayed score report
#[derive(Debug, Clone)]
pub struct CollisionGate {
    report_delay: Duration,
    tripped: Option<u64>,
    report: Option<Timer>,
}

impl CollisionGate {
    #[must_use]
    pub const fn new(report_delay: Duration) -> Self {
        Self {
            report_delay,
            tripped: None,
            report: None,
        }
    }

    /// Trip the gate with the current score. Returns `false` if it already tripped.
    pub fn trip(&mut self, score: u64, now: Instant) -> bool {
        if self.tripped.is_some() {
            return false;
        }
        info!("Collision at score {}", score);
        self.tripped = Some(score);
        self.report = Some(Timer::once(self.report_delay, now));
        true
    }

    /// Final score once the report delay has elapsed; yields at most once
    pub fn poll_report(&mut self, now: Instant) -> Option<u64> {
        let fired = self.report.as_mut().map_or(0, |timer| timer.poll(now));
        if fired > 0 {
            self.report = None;
            return self.tripped;
        }
        None
    }

    pub const fn is_tripped(&self) -> bool {
        self.tripped.is_some()
    }

    /// Score captured when the gate tripped
    pub const fn final_score(&self) -> Option<u64> {
        self.tripped
    }
}
