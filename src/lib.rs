//! Facial-gesture controlled endless runner.
//!
//! This library turns per-frame facial landmarks into game commands and runs
//! the game session that consumes them:
//! - Mouth and eye ratios smoothed over a short frame window
//! - Threshold classification into a read-only control snapshot
//! - Edge-triggered, debounced jumps and posture-gated ducking
//! - A countdown / running / paused / game-over state machine with obstacle
//!   spawning and a single collision gate
//!
//! The pipeline consists of:
//! 1. A landmark provider delivering a face-mesh point set or "no face"
//! 2. The [`gesture::GestureClassifier`] producing a [`gesture::ControlState`]
//! 3. The [`game::GameStateMachine`] ticking with that snapshot
//! 4. A physics host applying the returned events and reporting overlaps
//!
//! # Examples
//!
//! ## Classifying Frames
//!
//! ```no_run
//! use face_runner::{gesture::GestureClassifier, landmarks::{synthetic_face, LandmarkFrame}};
//!
//! let mut classifier = GestureClassifier::with_defaults();
//! for _ in 0..3 {
//!     classifier.process(&LandmarkFrame::Face(synthetic_face(0.6, 0.3)));
//! }
//! let state = classifier.state();
//! println!("Mouth: {:?}, eyes: {:?}", state.mouth, state.eye);
//! ```
//!
//! ## Driving a Session
//!
//! ```no_run
//! use face_runner::{
//!     game::GameStateMachine,
//!     gesture::GestureClassifier,
//!     sim::SimulatedHost,
//!     config::Config,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::time::{Duration, Instant};
//!
//! let config = Config::default();
//! let start = Instant::now();
//! let mut game = GameStateMachine::new(config.game_settings(), StdRng::seed_from_u64(7), start);
//! let mut host = SimulatedHost::from_config(&config);
//! let classifier = GestureClassifier::with_defaults();
//!
//! let tick = Duration::from_millis(16);
//! let mut now = start;
//! while !game.is_game_over() {
//!     now += tick;
//!     host.step(tick, game.physics_active());
//!     let events = game.tick(now, host.grounded(), classifier.state());
//!     host.apply(&events);
//!     if game.physics_active() && host.overlapping(game.character().hitbox(), game.obstacles()).is_some() {
//!         game.on_overlap(now);
//!     }
//! }
//! println!("Final score: {}", game.score());
//! ```
//!
//! ## Scripted Runs
//!
//! ```no_run
//! use face_runner::{
//!     app::{GameApp, GestureScript, SessionOptions},
//!     config::Config,
//!     score_store::FileScoreStore,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let script = GestureScript::from_file("jump.yaml")?;
//! let store = FileScoreStore::open("scores.yaml")?;
//! let mut app = GameApp::new(Config::default(), store)?;
//! let summary = app.run(&script, &SessionOptions::default())?;
//! println!("Score: {:?}, best: {}", summary.final_score, summary.best);
//! # Ok(())
//! # }
//! ```

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

/// Signal filtering algorithms for smoothing facial ratios
pub mod filters;

/// Landmark input contract and ratio extraction
pub mod landmarks;

/// Gesture classification into control state
pub mod gesture;

/// Pausable one-shot and repeating timers
pub mod timer;

/// Jump edge detection, debouncing and duck arbitration
pub mod controls;

/// Character posture and hitbox
pub mod character;

/// Obstacle spawning
pub mod spawner;

/// Collision boxes and the game-over gate
pub mod collision;

/// Game state machine
pub mod game;

/// Headless physics host
pub mod sim;

/// Best score persistence
pub mod score_store;

/// Main application module
pub mod app;

pub use error::{Error, Result};
