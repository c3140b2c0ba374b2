//! Headless physics host.
//!
//! Stands in for a rendering engine: integrates the character's vertical
//! motion against the ground line, applies the velocity commands the game
//! emits, and tests the character hitbox against the obstacle field.

use crate::{
    character::Hitbox,
    collision::Aabb,
    config::Config,
    game::GameEvent,
    spawner::Obstacle,
};
use log::debug;
use std::time::Duration;

/// Vertical physics of the character on a flat ground line
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    gravity: f64,
    ground_y: f64,
    character_x: f64,
    /// Bottom edge of the character (y grows downward)
    y: f64,
    velocity: f64,
}

impl SimulatedHost {
    #[must_use]
    pub fn new(gravity: f64, ground_y: f64, character_x: f64) -> Self {
        Self {
            gravity,
            ground_y,
            character_x,
            y: ground_y,
            velocity: 0.0,
        }
    }

    /// Host matching the configured world and physics
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.physics.gravity,
            config.world.height - config.world.ground_height,
            config.world.character_x,
        )
    }

    /// React to the commands carried by game events
    pub fn apply(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Jumped { velocity } => {
                    debug!("Host launching with velocity {}", velocity);
                    self.velocity = *velocity;
                }
                GameEvent::GameOver { .. } => self.velocity = 0.0,
                _ => {}
            }
        }
    }

    /// Integrate `dt` of motion; a frozen world does not move
    pub fn step(&mut self, dt: Duration, active: bool) {
        if !active {
            return;
        }
        let dt = dt.as_secs_f64();
        self.velocity += self.gravity * dt;
        self.y += self.velocity * dt;
        if self.y >= self.ground_y {
            self.y = self.ground_y;
            self.velocity = 0.0;
        }
    }

    /// On the ground and not moving up
    pub fn grounded(&self) -> bool {
        self.y >= self.ground_y && self.velocity >= 0.0
    }

    /// Height of the character's feet above the ground
    pub fn altitude(&self) -> f64 {
        self.ground_y - self.y
    }

    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    pub const fn ground_y(&self) -> f64 {
        self.ground_y
    }

    /// Character box for the given hitbox size
    pub fn character_box(&self, hitbox: Hitbox) -> Aabb {
        Aabb::from_bottom_center(self.character_x, self.y, hitbox.width, hitbox.height)
    }

    /// Id of the first obstacle overlapping the character, if any
    pub fn overlapping(&self, hitbox: Hitbox, obstacles: &[Obstacle]) -> Option<u64> {
        let character = self.character_box(hitbox);
        obstacles
            .iter()
            .find(|obstacle| {
                let bounds =
                    Aabb::from_bottom_center(obstacle.x, self.ground_y, obstacle.hitbox_width(), obstacle.hitbox_height());
                character.overlaps(&bounds)
            })
            .map(|obstacle| obstacle.id)
    }
}
