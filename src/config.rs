//! Configuration management for the face runner

use crate::{
    constants::{
        DEFAULT_CHARACTER_X, DEFAULT_COUNTDOWN_SECONDS, DEFAULT_EYE_CLOSED_THRESHOLD, DEFAULT_FRAME_MS,
        DEFAULT_GAME_OVER_DELAY_MS, DEFAULT_GO_GRACE_MS, DEFAULT_GRAVITY, DEFAULT_GROUND_HEIGHT,
        DEFAULT_JUMP_DEBOUNCE_MS, DEFAULT_JUMP_FORCE, DEFAULT_MOUTH_OPEN_THRESHOLD, DEFAULT_OBSTACLE_MAX_GAP_MS,
        DEFAULT_OBSTACLE_MIN_GAP_MS, DEFAULT_RUN_SPEED, DEFAULT_SCORE_INTERVAL_MS, DEFAULT_SMOOTH_FRAMES,
        DEFAULT_TICK_MS, DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH, MAX_TIMING_MS,
    },
    filters::{create_filter, RatioFilter},
    game::{ControlMode, GameSettings},
    spawner::{ObstacleKind, SpawnConfig},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Character physics
    pub physics: PhysicsConfig,

    /// Play field geometry
    pub world: WorldConfig,

    /// Obstacle spawning
    pub obstacles: ObstacleConfig,

    /// Gesture detection
    pub detection: DetectionConfig,

    /// Game timers
    pub timing: TimingConfig,

    /// Input mode and host loop cadence
    pub control: ControlConfig,
}

/// Physics parameters (pixels, pixels per second)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration
    pub gravity: f64,

    /// Upward launch speed of a jump
    pub jump_force: f64,

    /// Leftward speed of every obstacle
    pub run_speed: f64,
}

/// Play field geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub ground_height: f64,

    /// Horizontal position of the character
    pub character_x: f64,
}

/// Obstacle spawn parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Shortest gap between spawns
    pub min_gap_ms: u64,

    /// Longest gap between spawns
    pub max_gap_ms: u64,

    /// Obstacle kinds to choose from
    pub types: Vec<ObstacleKind>,
}

/// Gesture detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Mouth is OPEN above this smoothed ratio
    pub mouth_open_threshold: f64,

    /// Eyes are CLOSED below this smoothed ratio
    pub eye_closed_threshold: f64,

    /// Frames in the smoothing window
    pub smooth_frames: usize,

    /// Smoothing filter (moving_average, none)
    pub smoothing: String,
}

/// Game timer parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub jump_debounce_ms: u64,
    pub countdown_seconds: u32,

    /// Delay between "GO" and the start of play
    pub go_grace_ms: u64,

    /// Score increments by one per interval
    pub score_interval_ms: u64,

    /// Delay between a collision and the final score report
    pub game_over_delay_ms: u64,
}

/// Input mode and host loop cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// face or touch
    pub mode: ControlMode,

    /// Game tick period
    pub tick_ms: u64,

    /// Landmark frame period
    pub frame_ms: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            jump_force: DEFAULT_JUMP_FORCE,
            run_speed: DEFAULT_RUN_SPEED,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            ground_height: DEFAULT_GROUND_HEIGHT,
            character_x: DEFAULT_CHARACTER_X,
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            min_gap_ms: DEFAULT_OBSTACLE_MIN_GAP_MS,
            max_gap_ms: DEFAULT_OBSTACLE_MAX_GAP_MS,
            types: vec![ObstacleKind::Broccoli, ObstacleKind::Milk],
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            mouth_open_threshold: DEFAULT_MOUTH_OPEN_THRESHOLD,
            eye_closed_threshold: DEFAULT_EYE_CLOSED_THRESHOLD,
            smooth_frames: DEFAULT_SMOOTH_FRAMES,
            smoothing: "moving_average".to_string(),
        }
    }
}

impl DetectionConfig {
    /// Filter spec for [`create_filter`]; an explicit window in `smoothing` wins
    pub fn filter_spec(&self) -> String {
        if self.smoothing.contains(':') {
            self.smoothing.clone()
        } else {
            format!("{}:{}", self.smoothing, self.smooth_frames)
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            jump_debounce_ms: DEFAULT_JUMP_DEBOUNCE_MS,
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            go_grace_ms: DEFAULT_GO_GRACE_MS,
            score_interval_ms: DEFAULT_SCORE_INTERVAL_MS,
            game_over_delay_ms: DEFAULT_GAME_OVER_DELAY_MS,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            mode: ControlMode::Face,
            tick_ms: DEFAULT_TICK_MS,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the smoothing filter from configuration
    pub fn create_filter(&self) -> Result<Box<dyn RatioFilter>> {
        create_filter(&self.detection.filter_spec())
    }

    /// Spawner parameters
    pub fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig {
            min_gap: Duration::from_millis(self.obstacles.min_gap_ms),
            max_gap: Duration::from_millis(self.obstacles.max_gap_ms),
            kinds: self.obstacles.types.clone(),
            run_speed: self.physics.run_speed,
            world_width: self.world.width,
        }
    }

    /// Session parameters for the game state machine
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            mode: self.control.mode,
            countdown_seconds: self.timing.countdown_seconds,
            go_grace: Duration::from_millis(self.timing.go_grace_ms),
            score_interval: Duration::from_millis(self.timing.score_interval_ms),
            jump_force: self.physics.jump_force,
            jump_debounce: Duration::from_millis(self.timing.jump_debounce_ms),
            game_over_delay: Duration::from_millis(self.timing.game_over_delay_ms),
            spawn: self.spawn_config(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate thresholds
        if !(self.detection.mouth_open_threshold.is_finite() && self.detection.mouth_open_threshold > 0.0) {
            return Err(Error::ConfigError(
                "Mouth open threshold must be a positive number".to_string(),
            ));
        }
        if !(self.detection.eye_closed_threshold.is_finite() && self.detection.eye_closed_threshold > 0.0) {
            return Err(Error::ConfigError(
                "Eye closed threshold must be a positive number".to_string(),
            ));
        }

        // Validate smoothing
        if self.detection.smooth_frames == 0 {
            return Err(Error::ConfigError(
                "Smoothing window size must be greater than 0".to_string(),
            ));
        }
        self.create_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing filter: {e}")))?;

        // Validate obstacles
        if self.obstacles.min_gap_ms > self.obstacles.max_gap_ms {
            return Err(Error::ConfigError(
                "Obstacle min gap must not exceed max gap".to_string(),
            ));
        }
        if self.obstacles.min_gap_ms == 0 {
            return Err(Error::ConfigError("Obstacle min gap must be greater than 0".to_string()));
        }
        if self.obstacles.types.is_empty() {
            return Err(Error::ConfigError(
                "At least one obstacle type must be configured".to_string(),
            ));
        }

        // Validate physics
        for (name, value) in [
            ("Gravity", self.physics.gravity),
            ("Jump force", self.physics.jump_force),
            ("Run speed", self.physics.run_speed),
            ("World width", self.world.width),
            ("World height", self.world.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::ConfigError(format!("{name} must be a positive number")));
            }
        }
        if !(0.0..self.world.height).contains(&self.world.ground_height) {
            return Err(Error::ConfigError(
                "Ground height must be within the world height".to_string(),
            ));
        }

        // Validate timers
        if self.timing.score_interval_ms == 0 {
            return Err(Error::ConfigError("Score interval must be greater than 0".to_string()));
        }
        if self.control.tick_ms == 0 || self.control.frame_ms == 0 {
            return Err(Error::ConfigError(
                "Tick and frame periods must be greater than 0".to_string(),
            ));
        }
        for (name, value) in [
            ("Jump debounce", self.timing.jump_debounce_ms),
            ("Countdown", u64::from(self.timing.countdown_seconds).saturating_mul(1000)),
            ("GO grace", self.timing.go_grace_ms),
            ("Score interval", self.timing.score_interval_ms),
            ("Game over delay", self.timing.game_over_delay_ms),
            ("Obstacle max gap", self.obstacles.max_gap_ms),
            ("Tick period", self.control.tick_ms),
            ("Frame period", self.control.frame_ms),
        ] {
            if value > MAX_TIMING_MS {
                return Err(Error::ConfigError(format!(
                    "{name} must not exceed {MAX_TIMING_MS} ms"
                )));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Runner Configuration

# Character physics (pixels, pixels per second)
physics:
  gravity: 900.0
  jump_force: 650.0
  run_speed: 260.0

# Play field
world:
  width: 480.0
  height: 640.0
  ground_height: 100.0
  character_x: 80.0

# Obstacle spawning
obstacles:
  min_gap_ms: 1500
  max_gap_ms: 2500
  types: [broccoli, milk]

# Gesture detection
detection:
  mouth_open_threshold: 0.35
  eye_closed_threshold: 0.15
  smooth_frames: 3
  smoothing: "moving_average"

# Game timers
timing:
  jump_debounce_ms: 150
  countdown_seconds: 3
  go_grace_ms: 500
  score_interval_ms: 100
  game_over_delay_ms: 1000

# Input mode (face, touch) and loop cadence
control:
  mode: face
  tick_ms: 16
  frame_ms: 33
"#;
