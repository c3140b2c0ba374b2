//! Main application module for the face runner.
//!
//! A [`GameApp`] plays one session per [`GameApp::run`] call on a virtual
//! clock. Landmark frames come from a [`GestureScript`], are classified at the
//! frame cadence, and the game machine plus a [`SimulatedHost`] advance at the
//! tick cadence. With `realtime` set, the loop sleeps so virtual time tracks
//! the wall clock.

use crate::{
    config::Config,
    game::{ControlMode, GameEvent, GamePhase, GameStateMachine},
    gesture::{GestureClassifier, SignalState},
    landmarks::{synthetic_face, LandmarkFrame},
    score_store::ScoreStore,
    sim::SimulatedHost,
    Error, Result,
};
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// Ratios the scripted provider renders for each signal level
const MOUTH_OPEN_RATIO: f64 = 0.6;
const MOUTH_CLOSED_RATIO: f64 = 0.1;
const EYE_OPEN_RATIO: f64 = 0.3;
const EYE_CLOSED_RATIO: f64 = 0.05;

/// One timed change in a gesture script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Offset from session start
    pub at_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth: Option<SignalState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye: Option<SignalState>,

    /// Face visibility; setting mouth or eye implies a visible face
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<bool>,

    /// Touch input
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tap: bool,
}

impl ScriptStep {
    fn is_empty(&self) -> bool {
        self.mouth.is_none() && self.eye.is_none() && self.face.is_none() && !self.tap
    }
}

/// Timed sequence of facial gestures and taps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GestureScript {
    steps: Vec<ScriptStep>,
}

impl GestureScript {
    /// Build a script, checking that steps are in time order and do something
    pub fn new(steps: Vec<ScriptStep>) -> Result<Self> {
        for (index, pair) in steps.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(Error::ScriptError(format!(
                    "Step {} at {} ms comes before the previous step at {} ms",
                    index + 1,
                    pair[1].at_ms,
                    pair[0].at_ms
                )));
            }
        }
        if let Some(index) = steps.iter().position(ScriptStep::is_empty) {
            return Err(Error::ScriptError(format!("Step {} changes nothing", index)));
        }

        Ok(Self { steps })
    }

    /// Parse a YAML list of steps
    pub fn from_yaml(content: &str) -> Result<Self> {
        let steps: Vec<ScriptStep> = serde_yaml::from_str(content)
            .map_err(|e| Error::ScriptError(format!("Failed to parse script: {}", e)))?;
        Self::new(steps)
    }

    /// Load a YAML script file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Offset of the last step
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.steps.last().map_or(0, |step| step.at_ms))
    }
}

/// Landmark provider replaying a gesture script
pub struct ScriptedProvider<'a> {
    steps: &'a [ScriptStep],
    cursor: usize,
    mouth: SignalState,
    eye: SignalState,
    face: bool,
}

impl<'a> ScriptedProvider<'a> {
    /// Starts with a visible face, mouth closed and eyes open
    pub fn new(script: &'a GestureScript) -> Self {
        Self {
            steps: script.steps(),
            cursor: 0,
            mouth: SignalState::Closed,
            eye: SignalState::Open,
            face: true,
        }
    }

    /// Apply every step due by `elapsed`; returns the number of taps among them
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let mut taps = 0;

        while let Some(step) = self.steps.get(self.cursor) {
            if step.at_ms > elapsed_ms {
                break;
            }
            if let Some(mouth) = step.mouth {
                self.mouth = mouth;
            }
            if let Some(eye) = step.eye {
                self.eye = eye;
            }
            let shows_face = step.mouth.is_some() || step.eye.is_some();
            self.face = step.face.unwrap_or(self.face || shows_face);
            if step.tap {
                taps += 1;
            }
            self.cursor += 1;
        }

        taps
    }

    /// Landmark frame for the current levels
    pub fn frame(&self) -> LandmarkFrame {
        if !self.face {
            return LandmarkFrame::NoFace;
        }
        let mouth = match self.mouth {
            SignalState::Open => MOUTH_OPEN_RATIO,
            SignalState::Closed => MOUTH_CLOSED_RATIO,
        };
        let eye = match self.eye {
            SignalState::Open => EYE_OPEN_RATIO,
            SignalState::Closed => EYE_CLOSED_RATIO,
        };
        LandmarkFrame::Face(synthetic_face(mouth, eye))
    }
}

/// Per-session run options
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Seed for obstacle spawning
    pub seed: u64,
    /// Virtual time after which an unfinished session stops
    pub duration: Duration,
    /// Sleep so virtual time tracks the wall clock
    pub realtime: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            duration: Duration::from_secs(60),
            realtime: false,
        }
    }
}

/// Outcome of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Score handed off after game over, `None` if the session timed out
    pub final_score: Option<u64>,
    /// Score when the session stopped
    pub score: u64,
    pub best: u64,
    pub is_new_best: bool,
    pub phase: GamePhase,
    pub jumps: u32,
    pub ducks: u32,
    pub pauses: u32,
    pub obstacles_spawned: u64,
    /// Virtual time played
    pub elapsed: Duration,
}

impl SessionSummary {
    fn new(best: u64) -> Self {
        Self {
            final_score: None,
            score: 0,
            best,
            is_new_best: false,
            phase: GamePhase::Countdown { remaining: 0 },
            jumps: 0,
            ducks: 0,
            pauses: 0,
            obstacles_spawned: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Runs game sessions against a best-score store
pub struct GameApp<S: ScoreStore> {
    config: Config,
    store: S,
}

impl<S: ScoreStore> GameApp<S> {
    /// Create a new application from a validated configuration
    pub fn new(config: Config, store: S) -> Result<Self> {
        config.validate()?;
        info!(
            "Initializing face runner ({:?} mode, tick {} ms, frame {} ms)",
            config.control.mode, config.control.tick_ms, config.control.frame_ms
        );
        Ok(Self { config, store })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Play one session from countdown to score report or timeout
    pub fn run(&mut self, script: &GestureScript, options: &SessionOptions) -> Result<SessionSummary> {
        if options.duration.is_zero() {
            return Err(Error::InvalidInput("Session duration must be greater than 0".to_string()));
        }
        let tick = Duration::from_millis(self.config.control.tick_ms);
        let frame = Duration::from_millis(self.config.control.frame_ms);

        let start = Instant::now();
        let mut game = GameStateMachine::new(
            self.config.game_settings(),
            StdRng::seed_from_u64(options.seed),
            start,
        );
        let mut classifier = GestureClassifier::from_config(&self.config.detection)?;
        let face_mode = game.mode() == ControlMode::Face;
        classifier.set_ready(face_mode);
        let mut host = SimulatedHost::from_config(&self.config);
        let mut provider = ScriptedProvider::new(script);
        let mut summary = SessionSummary::new(self.store.best());

        info!("Starting session (seed {}, best {})", options.seed, summary.best);
        let events = game.drain_events();
        self.handle_events(&events, &mut summary)?;

        let mut next_frame = Duration::ZERO;
        let mut next_tick = tick;
        let mut last_tick = Duration::ZERO;

        loop {
            let elapsed = next_frame.min(next_tick);
            if elapsed > options.duration {
                info!("Session time limit reached");
                break;
            }
            if options.realtime {
                let wall = start.elapsed();
                if elapsed > wall {
                    std::thread::sleep(elapsed - wall);
                }
            }
            let now = start + elapsed;
            summary.elapsed = elapsed;

            // Frames go first when both are due
            if next_frame <= next_tick {
                let taps = provider.advance(elapsed);
                if face_mode {
                    classifier.process(&provider.frame());
                }
                for _ in 0..taps {
                    if !game.tap(now, host.grounded()) {
                        debug!("Tap ignored");
                    }
                }
                let events = game.drain_events();
                host.apply(&events);
                self.handle_events(&events, &mut summary)?;
                next_frame += frame;
                continue;
            }

            host.step(elapsed - last_tick, game.physics_active());
            last_tick = elapsed;
            next_tick += tick;

            let events = game.tick(now, host.grounded(), classifier.state());
            host.apply(&events);
            let mut reported = self.handle_events(&events, &mut summary)?;

            if game.physics_active() {
                if let Some(id) = host.overlapping(game.character().hitbox(), game.obstacles()) {
                    debug!("Overlap with obstacle #{}", id);
                    if game.on_overlap(now) {
                        let events = game.drain_events();
                        host.apply(&events);
                        reported |= self.handle_events(&events, &mut summary)?;
                    }
                }
            }

            if reported {
                break;
            }
        }

        summary.score = game.score();
        summary.phase = game.phase();
        summary.obstacles_spawned = game.obstacles_spawned();
        let (frames, rejected) = classifier.frame_counts();
        info!(
            "Session finished: score {}, best {}, {} frames ({} rejected)",
            summary.score, summary.best, frames, rejected
        );
        Ok(summary)
    }

    /// Log events and fold them into the summary; `true` once the score is reported
    fn handle_events(&mut self, events: &[GameEvent], summary: &mut SessionSummary) -> Result<bool> {
        let mut reported = false;
        for event in events {
            match event {
                GameEvent::CountdownTick { remaining } => info!("{}...", remaining),
                GameEvent::Go => info!("GO!"),
                GameEvent::Started => info!("Running"),
                GameEvent::Paused(reason) => {
                    summary.pauses += 1;
                    info!("Paused: {:?}", reason);
                }
                GameEvent::Resumed => info!("Resumed"),
                GameEvent::Jumped { velocity } => {
                    summary.jumps += 1;
                    debug!("Jump (velocity {})", velocity);
                }
                GameEvent::DuckStarted => {
                    summary.ducks += 1;
                    debug!("Duck");
                }
                GameEvent::Landed | GameEvent::DuckEnded | GameEvent::ObstacleRemoved { .. } => {
                    debug!("{:?}", event);
                }
                GameEvent::ObstacleSpawned(obstacle) => {
                    debug!("Obstacle #{} ({})", obstacle.id, obstacle.kind.name());
                }
                GameEvent::GameOver { final_score } => info!("Game over! Score: {}", final_score),
                GameEvent::ScoreReported { final_score } => {
                    let record = self.store.record(*final_score)?;
                    summary.final_score = Some(*final_score);
                    summary.best = record.best;
                    summary.is_new_best = record.is_new_best;
                    if record.is_new_best {
                        info!("New best score: {}", record.best);
                    } else {
                        info!("Score {} (best {})", final_score, record.best);
                    }
                    reported = true;
                }
            }
        }
        Ok(reported)
    }
}
