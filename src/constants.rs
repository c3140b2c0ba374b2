//! Constants used throughout the application

/// Number of points in a face-mesh landmark set
pub const FACE_MESH_LANDMARKS: usize = 468;

/// Lip landmarks (vertical pair)
pub const UPPER_LIP: usize = 13;
pub const LOWER_LIP: usize = 14;

/// Mouth corner landmarks (horizontal pair)
pub const MOUTH_LEFT_CORNER: usize = 61;
pub const MOUTH_RIGHT_CORNER: usize = 291;

/// Left eye landmarks: top lid, bottom lid, outer corner, inner corner
pub const LEFT_EYE_TOP: usize = 159;
pub const LEFT_EYE_BOTTOM: usize = 145;
pub const LEFT_EYE_LEFT: usize = 33;
pub const LEFT_EYE_RIGHT: usize = 133;

/// Right eye landmarks: top lid, bottom lid, inner corner, outer corner
pub const RIGHT_EYE_TOP: usize = 386;
pub const RIGHT_EYE_BOTTOM: usize = 374;
pub const RIGHT_EYE_LEFT: usize = 362;
pub const RIGHT_EYE_RIGHT: usize = 263;

/// Gesture thresholds
pub const DEFAULT_MOUTH_OPEN_THRESHOLD: f64 = 0.35;
pub const DEFAULT_EYE_CLOSED_THRESHOLD: f64 = 0.15;

/// Default smoothing window (frames)
pub const DEFAULT_SMOOTH_FRAMES: usize = 3;

/// Physics defaults (pixels, pixels per second)
pub const DEFAULT_GRAVITY: f64 = 900.0;
pub const DEFAULT_JUMP_FORCE: f64 = 650.0;
pub const DEFAULT_RUN_SPEED: f64 = 260.0;

/// Play field defaults
pub const DEFAULT_WORLD_WIDTH: f64 = 480.0;
pub const DEFAULT_WORLD_HEIGHT: f64 = 640.0;
pub const DEFAULT_GROUND_HEIGHT: f64 = 100.0;
pub const DEFAULT_CHARACTER_X: f64 = 80.0;

/// Upper bound for every configured delay, period and countdown (milliseconds)
pub const MAX_TIMING_MS: u64 = 3_600_000;

/// Shortest period a repeating timer accepts
pub const MIN_TIMER_PERIOD_MS: u64 = 1;

/// Obstacle spawn gap bounds (milliseconds)
pub const DEFAULT_OBSTACLE_MIN_GAP_MS: u64 = 1500;
pub const DEFAULT_OBSTACLE_MAX_GAP_MS: u64 = 2500;

/// Obstacles spawn this far past the right edge and are dropped this far past the left
pub const OBSTACLE_SPAWN_OFFSET: f64 = 50.0;
pub const OBSTACLE_OFFSCREEN_MARGIN: f64 = 50.0;

/// Obstacle hitbox dimensions
pub const OBSTACLE_HITBOX_WIDTH: f64 = 30.0;
pub const BROCCOLI_HITBOX_HEIGHT: f64 = 30.0;
pub const MILK_HITBOX_HEIGHT: f64 = 50.0;

/// Character hitbox dimensions
pub const CHARACTER_HITBOX_WIDTH: f64 = 40.0;
pub const CHARACTER_STANDING_HEIGHT: f64 = 50.0;
pub const CHARACTER_DUCKING_HEIGHT: f64 = 25.0;

/// Timing defaults (milliseconds unless noted)
pub const DEFAULT_JUMP_DEBOUNCE_MS: u64 = 150;
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 3;
pub const DEFAULT_GO_GRACE_MS: u64 = 500;
pub const DEFAULT_SCORE_INTERVAL_MS: u64 = 100;
pub const DEFAULT_GAME_OVER_DELAY_MS: u64 = 1000;

/// Host loop cadence defaults (milliseconds)
pub const DEFAULT_TICK_MS: u64 = 16;
pub const DEFAULT_FRAME_MS: u64 = 33;

/// Key under which the host persists the best score
pub const BEST_SCORE_KEY: &str = "dinoHighScore";

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
