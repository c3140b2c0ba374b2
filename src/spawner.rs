//! Obstacle scheduling.
//!
//! While the game runs, the spawner keeps exactly one pending spawn timer.
//! When it fires, an obstacle of a uniformly chosen kind appears just past the
//! right edge of the play field and the next gap is sampled right away.

use crate::{
    constants::{
        BROCCOLI_HITBOX_HEIGHT, DEFAULT_OBSTACLE_MAX_GAP_MS, DEFAULT_OBSTACLE_MIN_GAP_MS, DEFAULT_RUN_SPEED,
        DEFAULT_WORLD_WIDTH, MILK_HITBOX_HEIGHT, OBSTACLE_HITBOX_WIDTH, OBSTACLE_OFFSCREEN_MARGIN,
        OBSTACLE_SPAWN_OFFSET,
    },
    timer::Timer,
};
use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Broccoli,
    Milk,
}

impl ObstacleKind {
    pub const fn hitbox_height(self) -> f64 {
        match self {
            Self::Broccoli => BROCCOLI_HITBOX_HEIGHT,
            Self::Milk => MILK_HITBOX_HEIGHT,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Broccoli => "broccoli",
            Self::Milk => "milk",
        }
    }
}

/// An obstacle scrolling toward the character
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u64,
    pub kind: ObstacleKind,
    /// Horizontal center position
    pub x: f64,
    /// Constant horizontal velocity (negative is leftward)
    pub velocity_x: f64,
}

impl Obstacle {
    pub const fn hitbox_width(&self) -> f64 {
        OBSTACLE_HITBOX_WIDTH
    }

    pub const fn hitbox_height(&self) -> f64 {
        self.kind.hitbox_height()
    }

    /// Move by `elapsed` at constant velocity
    pub fn advance(&mut self, elapsed: Duration) {
        self.x += self.velocity_x * elapsed.as_secs_f64();
    }

    /// Fully past the left edge of the play field
    pub fn is_offscreen(&self) -> bool {
        self.x < -OBSTACLE_OFFSCREEN_MARGIN
    }
}

/// Spawner parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnConfig {
    pub min_gap: Duration,
    pub max_gap: Duration,
    pub kinds: Vec<ObstacleKind>,
    pub run_speed: f64,
    pub world_width: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_gap: Duration::from_millis(DEFAULT_OBSTACLE_MIN_GAP_MS),
            max_gap: Duration::from_millis(DEFAULT_OBSTACLE_MAX_GAP_MS),
            kinds: vec![ObstacleKind::Broccoli, ObstacleKind::Milk],
            run_speed: DEFAULT_RUN_SPEED,
            world_width: DEFAULT_WORLD_WIDTH,
        }
    }
}

/// Self-rescheduling obstacle spawner
pub struct ObstacleSpawner {
    config: SpawnConfig,
    rng: StdRng,
    timer: Option<Timer>,
    next_id: u64,
}

impl ObstacleSpawner {
    #[must_use]
    pub fn new(config: SpawnConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            timer: None,
            next_id: 0,
        }
    }

    /// Schedule the first spawn
    pub fn start(&mut self, now: Instant) {
        let delay = self.sample_delay();
        debug!("First obstacle in {} ms", delay.as_millis());
        self.timer = Some(Timer::once(delay, now));
    }

    /// Uniform delay in `[min_gap, max_gap]` at millisecond resolution
    pub fn sample_delay(&mut self) -> Duration {
        let min = u64::try_from(self.config.min_gap.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.config.max_gap.as_millis()).unwrap_or(u64::MAX);
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(self.rng.gen_range(min..=max))
    }

    /// Spawn if the pending timer has expired, then schedule the next one.
    ///
    /// The next gap runs from the deadline that just fired, so late polls do
    /// not stretch it. If that gap has already passed as well, it runs from
    /// `now` instead and a late poll still yields a single obstacle.
    pub fn poll(&mut self, now: Instant) -> Option<Obstacle> {
        let Some(timer) = self.timer.as_mut() else {
            return None;
        };
        let fired_at = timer.deadline();
        if timer.poll(now) == 0 {
            return None;
        }

        let obstacle = self.create_obstacle();
        let delay = self.sample_delay();
        let anchor = fired_at
            .filter(|deadline| deadline.checked_add(delay).is_some_and(|next| next > now))
            .unwrap_or(now);
        debug!("Next obstacle in {} ms", delay.as_millis());
        self.timer = Some(Timer::once(delay, anchor));
        obstacle
    }

    fn create_obstacle(&mut self) -> Option<Obstacle> {
        let kind = *self.config.kinds.choose(&mut self.rng)?;
        let id = self.next_id;
        self.next_id += 1;
        Some(Obstacle {
            id,
            kind,
            x: self.config.world_width + OBSTACLE_SPAWN_OFFSET,
            velocity_x: -self.config.run_speed,
        })
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

    /// Drop the pending spawn; safe to call repeatedly
    pub fn cancel(&mut self) {
        if let Some(timer) = &mut self.timer {
            timer.cancel();
        }
    }

    /// Time until the pending spawn
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().and_then(|timer| timer.remaining(now))
    }

    pub fn is_scheduled(&self) -> bool {
        self.timer.as_ref().is_some_and(Timer::is_pending)
    }

    /// Number of obstacles created so far
    pub const fn spawned(&self) -> u64 {
        self.next_id
    }

    pub const fn config(&self) -> &SpawnConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn spawner(seed: u64) -> ObstacleSpawner {
        ObstacleSpawner::new(SpawnConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_spawn_after_delay_and_reschedule() {
        let t0 = Instant::now();
        let mut spawner = spawner(7);
        spawner.start(t0);

        let first = spawner.remaining(t0).unwrap();
        assert!(spawner.poll(t0 + first - Duration::from_millis(1)).is_none());

        let fired_at = t0 + first;
        let obstacle = spawner.poll(fired_at).unwrap();
        assert_eq!(obstacle.x, DEFAULT_WORLD_WIDTH + OBSTACLE_SPAWN_OFFSET);
        assert_eq!(obstacle.velocity_x, -DEFAULT_RUN_SPEED);
        assert!(spawner.is_scheduled());

        let next = spawner.remaining(fired_at).unwrap();
        assert!(next >= Duration::from_millis(1500) && next <= Duration::from_millis(2500));
    }

    #[test]
    fn test_gaps_do_not_drift_with_tick_spacing() {
        let config = SpawnConfig {
            min_gap: Duration::from_millis(2500),
            max_gap: Duration::from_millis(2500),
            ..SpawnConfig::default()
        };
        let mut spawner = ObstacleSpawner::new(config, StdRng::seed_from_u64(5));
        let t0 = Instant::now();
        spawner.start(t0 + Duration::from_millis(3500));

        let mut spawned_at = Vec::new();
        let mut elapsed = 0;
        while spawned_at.len() < 4 {
            elapsed += 16;
            if spawner.poll(t0 + Duration::from_millis(elapsed)).is_some() {
                spawned_at.push(elapsed);
            }
        }

        // Each spawn lands on the first 16ms tick at or after 6000, 8500, 11000, 13500
        assert_eq!(spawned_at, vec![6000, 8512, 11008, 13504]);
        assert_eq!(
            spawner.remaining(t0 + Duration::from_millis(13504)),
            Some(Duration::from_millis(2496))
        );
    }

    #[test]
    fn test_pause_keeps_remaining() {
        let t0 = Instant::now();
        let mut spawner = spawner(1);
        spawner.start(t0);
        let total = spawner.remaining(t0).unwrap();

        let paused_at = t0 + Duration::from_millis(700);
        spawner.pause(paused_at);
        let frozen = spawner.remaining(paused_at).unwrap();
        assert_eq!(frozen, total - Duration::from_millis(700));
        assert!(spawner.poll(paused_at + Duration::from_secs(60)).is_none());

        let resumed_at = paused_at + Duration::from_secs(60);
        spawner.resume(resumed_at);
        assert_eq!(spawner.remaining(resumed_at), Some(frozen));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let t0 = Instant::now();
        let mut spawner = spawner(3);
        spawner.start(t0);
        spawner.cancel();
        spawner.cancel();
        assert!(!spawner.is_scheduled());
        assert!(spawner.poll(t0 + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn test_obstacle_moves_left_and_leaves() {
        let mut obstacle = Obstacle {
            id: 0,
            kind: ObstacleKind::Milk,
            x: 0.0,
            velocity_x: -260.0,
        };
        obstacle.advance(Duration::from_millis(100));
        assert!((obstacle.x + 26.0).abs() < 1e-9);
        assert!(!obstacle.is_offscreen());
        obstacle.advance(Duration::from_millis(100));
        assert!(obstacle.is_offscreen());
        assert_eq!(obstacle.hitbox_height(), MILK_HITBOX_HEIGHT);
    }

    proptest! {
        #[test]
        fn prop_spawn_delay_within_bounds(seed in any::<u64>()) {
            let mut spawner = spawner(seed);
            for _ in 0..32 {
                let delay = spawner.sample_delay();
                prop_assert!(delay >= Duration::from_millis(1500));
                prop_assert!(delay <= Duration::from_millis(2500));
            }
        }

        #[test]
        fn prop_kind_from_configured_set(seed in any::<u64>()) {
            let config = SpawnConfig { kinds: vec![ObstacleKind::Milk], ..SpawnConfig::default() };
            let mut spawner = ObstacleSpawner::new(config, StdRng::seed_from_u64(seed));
            let t0 = Instant::now();
            spawner.start(t0);
            let mut now = t0;
            for _ in 0..8 {
                now += spawner.remaining(now).unwrap();
                let obstacle = spawner.poll(now).unwrap();
                prop_assert_eq!(obstacle.kind, ObstacleKind::Milk);
            }
        }
    }
}
