//! State of the controlled character.
//!
//! Only the game state machine mutates a [`CharacterState`]; hosts read it to
//! pick animations and hitboxes and report back a grounded flag.

use crate::{
    constants::{CHARACTER_DUCKING_HEIGHT, CHARACTER_HITBOX_WIDTH, CHARACTER_STANDING_HEIGHT},
    controls::JumpLock,
};
use std::time::{Duration, Instant};

/// Posture of the character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    Running,
    Jumping,
    Ducking,
    Hit,
}

/// Axis-aligned hitbox size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub width: f64,
    pub height: f64,
}

impl Hitbox {
    pub const STANDING: Self = Self {
        width: CHARACTER_HITBOX_WIDTH,
        height: CHARACTER_STANDING_HEIGHT,
    };

    pub const DUCKING: Self = Self {
        width: CHARACTER_HITBOX_WIDTH,
        height: CHARACTER_DUCKING_HEIGHT,
    };
}

/// Posture, velocity command, hitbox and jump lock of the character
#[derive(Debug, Clone)]
pub struct CharacterState {
    posture: Posture,
    vertical_velocity: f64,
    hitbox: Hitbox,
    jump_lock: JumpLock,
}

impl CharacterState {
    #[must_use]
    pub const fn new(jump_debounce: Duration) -> Self {
        Self {
            posture: Posture::Running,
            vertical_velocity: 0.0,
            hitbox: Hitbox::STANDING,
            jump_lock: JumpLock::new(jump_debounce),
        }
    }

    pub const fn posture(&self) -> Posture {
        self.posture
    }

    /// Last commanded vertical velocity (negative is up)
    pub const fn vertical_velocity(&self) -> f64 {
        self.vertical_velocity
    }

    pub const fn hitbox(&self) -> Hitbox {
        self.hitbox
    }

    pub fn is_ducking(&self) -> bool {
        self.posture == Posture::Ducking
    }

    pub fn jump_locked(&self) -> bool {
        self.jump_lock.is_held()
    }

    pub fn jump_lock_expiry(&self) -> Option<Instant> {
        self.jump_lock.expiry()
    }

    pub fn jump_lock_remaining(&self, now: Instant) -> Option<Duration> {
        self.jump_lock.remaining(now)
    }

    pub(crate) fn jump_lock_mut(&mut self) -> &mut JumpLock {
        &mut self.jump_lock
    }

    /// Launch upward and engage the debounce lock
    pub(crate) fn jump(&mut self, jump_force: f64, now: Instant) {
        self.posture = Posture::Jumping;
        self.vertical_velocity = -jump_force;
        self.jump_lock.engage(now);
    }

    pub(crate) fn start_duck(&mut self) {
        self.posture = Posture::Ducking;
        self.hitbox = Hitbox::DUCKING;
    }

    /// Leave the duck; the running posture resumes only on the ground
    pub(crate) fn stop_duck(&mut self, grounded: bool) {
        self.hitbox = Hitbox::STANDING;
        self.posture = if grounded { Posture::Running } else { Posture::Jumping };
    }

    /// Back on the ground after a jump
    pub(crate) fn land(&mut self) {
        if self.posture == Posture::Jumping {
            self.posture = Posture::Running;
            self.vertical_velocity = 0.0;
        }
    }

    pub(crate) fn hit(&mut self) {
        self.posture = Posture::Hit;
        self.vertical_velocity = 0.0;
        self.hitbox = Hitbox::STANDING;
    }
}
