//! Game state machine.
//!
//! Owns the phase (countdown, running, paused, game over), the character, the
//! obstacle field and every game timer. The host drives it with [`tick`]
//! calls carrying the current instant, the grounded flag and the latest
//! classifier snapshot, forwards overlap events through [`on_overlap`], and
//! applies the returned [`GameEvent`]s to its physics and rendering.
//!
//! [`tick`]: GameStateMachine::tick
//! [`on_overlap`]: GameStateMachine::on_overlap

use crate::{
    character::{CharacterState, Posture},
    collision::CollisionGate,
    constants::{
        DEFAULT_COUNTDOWN_SECONDS, DEFAULT_GAME_OVER_DELAY_MS, DEFAULT_GO_GRACE_MS, DEFAULT_JUMP_DEBOUNCE_MS,
        DEFAULT_JUMP_FORCE, DEFAULT_SCORE_INTERVAL_MS,
    },
    controls::{DuckArbiter, DuckDecision, EdgeTrigger, JumpGate},
    gesture::ControlState,
    spawner::{Obstacle, ObstacleSpawner, SpawnConfig},
    timer::Timer,
};
use log::{debug, info};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How the player controls the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Mouth opens to jump, eyes close to duck; losing the face pauses
    Face,
    /// Tap to jump; never pauses on its own
    Touch,
}

impl Default for ControlMode {
    fn default() -> Self {
        Self::Face
    }
}

/// High-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Seconds left before "GO"; zero during the grace delay after it
    Countdown { remaining: u32 },
    Running,
    Paused,
    GameOver { final_score: u64 },
}

/// Why the game is paused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// The classifier reported no face
    FaceLost,
    /// The host requested it
    Host,
}

/// Notifications for the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CountdownTick { remaining: u32 },
    Go,
    Started,
    Paused(PauseReason),
    Resumed,
    /// Apply this vertical velocity to the character (negative is up)
    Jumped { velocity: f64 },
    Landed,
    DuckStarted,
    DuckEnded,
    ObstacleSpawned(Obstacle),
    ObstacleRemoved { id: u64 },
    GameOver { final_score: u64 },
    /// Delayed final score hand-off; the session is over
    ScoreReported { final_score: u64 },
}

/// Session parameters, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub mode: ControlMode,
    pub countdown_seconds: u32,
    pub go_grace: Duration,
    pub score_interval: Duration,
    pub jump_force: f64,
    pub jump_debounce: Duration,
    pub game_over_delay: Duration,
    pub spawn: SpawnConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: ControlMode::Face,
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            go_grace: Duration::from_millis(DEFAULT_GO_GRACE_MS),
            score_interval: Duration::from_millis(DEFAULT_SCORE_INTERVAL_MS),
            jump_force: DEFAULT_JUMP_FORCE,
            jump_debounce: Duration::from_millis(DEFAULT_JUMP_DEBOUNCE_MS),
            game_over_delay: Duration::from_millis(DEFAULT_GAME_OVER_DELAY_MS),
            spawn: SpawnConfig::default(),
        }
    }
}

/// One game session from countdown to reported score
pub struct GameStateMachine {
    settings: GameSettings,
    phase: GamePhase,
    pause_reason: Option<PauseReason>,
    character: CharacterState,
    edge: EdgeTrigger,
    spawner: ObstacleSpawner,
    gate: CollisionGate,
    countdown_started: Instant,
    countdown_timer: Timer,
    go_timer: Option<Timer>,
    score_timer: Option<Timer>,
    score: u64,
    obstacles: Vec<Obstacle>,
    last_tick: Option<Instant>,
    events: Vec<GameEvent>,
}

impl GameStateMachine {
    /// Start a session; the countdown begins at `now`
    pub fn new(settings: GameSettings, rng: StdRng, now: Instant) -> Self {
        info!(
            "New session in {:?} mode, countdown {} s",
            settings.mode, settings.countdown_seconds
        );
        let mut machine = Self {
            phase: GamePhase::Countdown {
                remaining: settings.countdown_seconds,
            },
            pause_reason: None,
            character: CharacterState::new(settings.jump_debounce),
            edge: EdgeTrigger::new(),
            spawner: ObstacleSpawner::new(settings.spawn.clone(), rng),
            gate: CollisionGate::new(settings.game_over_delay),
            countdown_started: now,
            countdown_timer: Timer::repeating(Duration::from_secs(1), now),
            go_timer: None,
            score_timer: None,
            score: 0,
            obstacles: Vec::new(),
            last_tick: None,
            events: Vec::new(),
            settings,
        };
        if machine.settings.countdown_seconds == 0 {
            machine.begin_grace(now);
        }
        machine
    }

    /// Advance the session to `now`.
    ///
    /// `control` is whatever the classifier last produced; it may be one frame
    /// stale. Returns every event raised since the previous call, including
    /// those raised by host commands in between.
    pub fn tick(&mut self, now: Instant, grounded: bool, control: ControlState) -> Vec<GameEvent> {
        if matches!(self.phase, GamePhase::Countdown { .. }) {
            self.advance_countdown(now);
        }

        match self.phase {
            GamePhase::Running => self.run_tick(now, grounded, control),
            GamePhase::Paused => {
                let face_back = self.settings.mode == ControlMode::Face && control.face_detected;
                if face_back && self.pause_reason == Some(PauseReason::FaceLost) {
                    self.resume_running(now);
                    self.run_tick(now, grounded, control);
                }
            }
            GamePhase::GameOver { .. } => {
                if let Some(final_score) = self.gate.poll_report(now) {
                    info!("Reporting final score {}", final_score);
                    self.obstacles.clear();
                    self.events.push(GameEvent::ScoreReported { final_score });
                }
            }
            GamePhase::Countdown { .. } => {}
        }

        std::mem::take(&mut self.events)
    }

    fn advance_countdown(&mut self, now: Instant) {
        let GamePhase::Countdown { mut remaining } = self.phase else {
            return;
        };

        if remaining > 0 {
            for _ in 0..self.countdown_timer.poll(now) {
                remaining -= 1;
                if remaining > 0 {
                    self.events.push(GameEvent::CountdownTick { remaining });
                } else {
                    break;
                }
            }
            self.phase = GamePhase::Countdown { remaining };
            if remaining == 0 {
                let go_at = self.countdown_started + Duration::from_secs(u64::from(self.settings.countdown_seconds));
                self.begin_grace(go_at);
            }
        }

        let go = self.go_timer.as_mut().map_or(0, |timer| timer.poll(now));
        if go > 0 {
            self.go_timer = None;
            // Cadences start from the scheduled instant, not from this tick
            let started_at = self.countdown_started + self.countdown_total();
            self.start_running(started_at, now);
        }
    }

    fn countdown_total(&self) -> Duration {
        Duration::from_secs(u64::from(self.settings.countdown_seconds)) + self.settings.go_grace
    }

    fn begin_grace(&mut self, go_at: Instant) {
        self.countdown_timer.cancel();
        self.go_timer = Some(Timer::once(self.settings.go_grace, go_at));
        self.events.push(GameEvent::Go);
        debug!("GO");
    }

    fn start_running(&mut self, started_at: Instant, now: Instant) {
        info!("Game started");
        self.phase = GamePhase::Running;
        self.score_timer = Some(Timer::repeating(self.settings.score_interval, started_at));
        self.spawner.start(started_at);
        self.last_tick = Some(now);
        self.events.push(GameEvent::Started);
    }

    fn run_tick(&mut self, now: Instant, grounded: bool, control: ControlState) {
        // Settle everything that came due while running
        self.settle(now);
        if let Some(obstacle) = self.spawner.poll(now) {
            debug!("Spawned {} #{}", obstacle.kind.name(), obstacle.id);
            self.events.push(GameEvent::ObstacleSpawned(obstacle.clone()));
            self.obstacles.push(obstacle);
        }
        let locked = self.character.jump_lock_mut().is_locked(now);

        if self.settings.mode == ControlMode::Face && !control.face_detected {
            self.enter_pause(now, PauseReason::FaceLost);
            return;
        }

        if grounded && self.character.posture() == Posture::Jumping {
            self.character.land();
            self.events.push(GameEvent::Landed);
        }

        if self.settings.mode != ControlMode::Face {
            return;
        }

        // Duck is decided first and shuts the jump gate for this tick
        match DuckArbiter::decide(control.eye, grounded, self.character.is_ducking()) {
            DuckDecision::Enter => {
                debug!("Duck");
                self.character.start_duck();
                self.events.push(GameEvent::DuckStarted);
            }
            DuckDecision::Exit => {
                debug!("Stand up");
                self.character.stop_duck(grounded);
                self.events.push(GameEvent::DuckEnded);
            }
            DuckDecision::Hold => {}
        }

        let gate = JumpGate {
            grounded,
            ducking: self.character.is_ducking(),
            locked,
        };
        if self.edge.evaluate(control.mouth, gate) {
            self.perform_jump(now);
        }
    }

    /// Scroll obstacles and count score increments up to `now`
    fn settle(&mut self, now: Instant) {
        let elapsed = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);
        self.advance_obstacles(elapsed);
        if let Some(timer) = &mut self.score_timer {
            self.score += u64::from(timer.poll(now));
        }
    }

    fn advance_obstacles(&mut self, elapsed: Duration) {
        for obstacle in &mut self.obstacles {
            obstacle.advance(elapsed);
        }
        let events = &mut self.events;
        self.obstacles.retain(|obstacle| {
            let keep = !obstacle.is_offscreen();
            if !keep {
                events.push(GameEvent::ObstacleRemoved { id: obstacle.id });
            }
            keep
        });
    }

    fn perform_jump(&mut self, now: Instant) {
        debug!("Jump");
        self.character.jump(self.settings.jump_force, now);
        self.events.push(GameEvent::Jumped {
            velocity: self.character.vertical_velocity(),
        });
    }

    fn enter_pause(&mut self, now: Instant, reason: PauseReason) {
        self.settle(now);
        info!("Paused ({:?})", reason);
        self.phase = GamePhase::Paused;
        self.pause_reason = Some(reason);
        self.spawner.pause(now);
        if let Some(timer) = &mut self.score_timer {
            timer.pause(now);
        }
        self.character.jump_lock_mut().pause(now);
        self.events.push(GameEvent::Paused(reason));
    }

    fn resume_running(&mut self, now: Instant) {
        info!("Resumed");
        self.phase = GamePhase::Running;
        self.pause_reason = None;
        self.spawner.resume(now);
        if let Some(timer) = &mut self.score_timer {
            timer.resume(now);
        }
        self.character.jump_lock_mut().resume(now);
        self.last_tick = Some(now);
        self.events.push(GameEvent::Resumed);
    }

    /// Jump command. Ignored unless running, grounded, standing and unlocked.
    pub fn jump(&mut self, now: Instant, grounded: bool) -> bool {
        if self.phase != GamePhase::Running || !grounded {
            return false;
        }
        if matches!(self.character.posture(), Posture::Ducking | Posture::Hit) {
            return false;
        }
        if self.character.jump_lock_mut().is_locked(now) {
            debug!("Jump ignored: locked");
            return false;
        }
        self.perform_jump(now);
        true
    }

    /// Tap input; only meaningful in touch mode
    pub fn tap(&mut self, now: Instant, grounded: bool) -> bool {
        if self.settings.mode != ControlMode::Touch {
            return false;
        }
        self.jump(now, grounded)
    }

    /// Enter the ducking posture. Ignored unless running, grounded and standing.
    pub fn start_duck(&mut self, grounded: bool) -> bool {
        if self.phase != GamePhase::Running || !grounded || self.character.posture() != Posture::Running {
            return false;
        }
        self.character.start_duck();
        self.events.push(GameEvent::DuckStarted);
        true
    }

    /// Leave the ducking posture. Ignored unless ducking.
    pub fn stop_duck(&mut self, grounded: bool) -> bool {
        if !self.character.is_ducking() {
            return false;
        }
        self.character.stop_duck(grounded);
        self.events.push(GameEvent::DuckEnded);
        true
    }

    /// Host-requested pause; only from running
    pub fn pause(&mut self, now: Instant) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.enter_pause(now, PauseReason::Host);
        true
    }

    /// Host-requested resume; only from paused
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.resume_running(now);
        true
    }

    /// Character/obstacle overlap reported by the host.
    ///
    /// The first overlap while running ends the game with the current score;
    /// every later call is a no-op returning `false`.
    pub fn on_overlap(&mut self, now: Instant) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.settle(now);
        if !self.gate.trip(self.score, now) {
            return false;
        }

        let final_score = self.score;
        self.phase = GamePhase::GameOver { final_score };
        self.character.hit();
        self.spawner.cancel();
        if let Some(timer) = &mut self.score_timer {
            timer.cancel();
        }
        self.character.jump_lock_mut().release();
        info!("Game over, score {}", final_score);
        self.events.push(GameEvent::GameOver { final_score });
        true
    }

    /// Events raised by host commands since the last tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    pub const fn pause_reason(&self) -> Option<PauseReason> {
        self.pause_reason
    }

    pub const fn score(&self) -> u64 {
        self.score
    }

    pub const fn character(&self) -> &CharacterState {
        &self.character
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub const fn mode(&self) -> ControlMode {
        self.settings.mode
    }

    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// Whether the host should integrate physics
    pub fn physics_active(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Time until the next obstacle spawn
    pub fn spawn_remaining(&self, now: Instant) -> Option<Duration> {
        self.spawner.remaining(now)
    }

    /// Time until the next score increment
    pub fn score_remaining(&self, now: Instant) -> Option<Duration> {
        self.score_timer.as_ref().and_then(|timer| timer.remaining(now))
    }

    /// Number of obstacles spawned this session
    pub const fn obstacles_spawned(&self) -> u64 {
        self.spawner.spawned()
    }
}
