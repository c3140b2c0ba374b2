//! Gesture classification from landmark frames.
//!
//! The classifier is the only writer of [`ControlState`]. It smooths the mouth
//! and eye ratios of every frame and thresholds the averages into discrete
//! open/closed states. Consumers read a copied snapshot through
//! [`GestureClassifier::state`] and may see a value that is one frame stale.

use crate::{
    config::DetectionConfig,
    constants::{DEFAULT_EYE_CLOSED_THRESHOLD, DEFAULT_MOUTH_OPEN_THRESHOLD, DEFAULT_SMOOTH_FRAMES},
    filters::{create_filter, moving_average::MovingAverageFilter, RatioFilter},
    landmarks::{LandmarkFrame, RawRatios},
    Result,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Discrete state of a facial signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalState {
    #[serde(alias = "open")]
    Open,
    #[serde(alias = "closed")]
    Closed,
}

/// Snapshot of the classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    /// Mouth state, OPEN above the mouth threshold
    pub mouth: SignalState,
    /// Eye state, CLOSED below the eye threshold
    pub eye: SignalState,
    /// Whether the most recent frame contained a usable face
    pub face_detected: bool,
    /// Whether the landmark provider is up and delivering frames
    pub ready: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            mouth: SignalState::Closed,
            eye: SignalState::Open,
            face_detected: false,
            ready: false,
        }
    }
}

/// Classification thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub mouth_open: f64,
    pub eye_closed: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            mouth_open: DEFAULT_MOUTH_OPEN_THRESHOLD,
            eye_closed: DEFAULT_EYE_CLOSED_THRESHOLD,
        }
    }
}

/// Turns landmark frames into mouth/eye states
pub struct GestureClassifier {
    thresholds: GestureThresholds,
    filter: Box<dyn RatioFilter>,
    state: ControlState,
    averages: Option<RawRatios>,
    frames: u64,
    rejected_frames: u64,
}

impl GestureClassifier {
    /// Create a classifier with an explicit smoothing filter
    pub fn new(thresholds: GestureThresholds, filter: Box<dyn RatioFilter>) -> Self {
        Self {
            thresholds,
            filter,
            state: ControlState::default(),
            averages: None,
            frames: 0,
            rejected_frames: 0,
        }
    }

    /// Classifier with default thresholds and a 3-frame moving average
    pub fn with_defaults() -> Self {
        Self::new(
            GestureThresholds::default(),
            Box::new(MovingAverageFilter::new(DEFAULT_SMOOTH_FRAMES)),
        )
    }

    /// Build a classifier from the detection section of the configuration
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        let filter = create_filter(&config.filter_spec())?;
        info!(
            "Gesture classifier using {} (mouth > {}, eye < {})",
            filter.name(),
            config.mouth_open_threshold,
            config.eye_closed_threshold
        );

        Ok(Self::new(
            GestureThresholds {
                mouth_open: config.mouth_open_threshold,
                eye_closed: config.eye_closed_threshold,
            },
            filter,
        ))
    }

    /// Classify one frame and return the updated snapshot.
    ///
    /// A no-face or malformed frame only clears `face_detected`; the smoothing
    /// windows and the last mouth/eye states are kept so classification picks
    /// up from the previous averages once the face returns.
    pub fn process(&mut self, frame: &LandmarkFrame) -> ControlState {
        self.frames += 1;

        let ratios = match frame {
            LandmarkFrame::NoFace => None,
            LandmarkFrame::Face(points) => match RawRatios::try_from_landmarks(points) {
                Ok(ratios) => Some(ratios),
                Err(e) => {
                    self.rejected_frames += 1;
                    debug!("Rejected landmark set: {}", e);
                    None
                }
            },
        };

        match ratios {
            Some(raw) => {
                let (mouth_avg, eye_avg) = self.filter.apply(raw.mouth, raw.eye);
                self.averages = Some(RawRatios {
                    mouth: mouth_avg,
                    eye: eye_avg,
                });
                self.state.mouth = if mouth_avg > self.thresholds.mouth_open {
                    SignalState::Open
                } else {
                    SignalState::Closed
                };
                self.state.eye = if eye_avg < self.thresholds.eye_closed {
                    SignalState::Closed
                } else {
                    SignalState::Open
                };
                self.state.face_detected = true;
            }
            None => self.state.face_detected = false,
        }

        self.state
    }

    /// Read-only snapshot of the latest classification
    pub const fn state(&self) -> ControlState {
        self.state
    }

    /// Mark the landmark provider as running (or stopped)
    pub fn set_ready(&mut self, ready: bool) {
        self.state.ready = ready;
    }

    /// Latest smoothed ratios, `None` until a usable frame arrives
    pub const fn averages(&self) -> Option<RawRatios> {
        self.averages
    }

    /// Total frames seen and frames rejected as malformed
    pub const fn frame_counts(&self) -> (u64, u64) {
        (self.frames, self.rejected_frames)
    }

    pub const fn thresholds(&self) -> GestureThresholds {
        self.thresholds
    }
}
