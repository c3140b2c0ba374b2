//! Landmark input contract for the gesture classifier.
//!
//! The landmark provider hands over either a face-mesh point set or an
//! explicit "no face" marker. Everything the classifier needs from a point set
//! is reduced here to a pair of ratios, and any set that cannot produce them
//! (missing indices, non-finite coordinates, collapsed spans) is rejected so
//! the rest of the crate never sees a half-valid frame.

use crate::constants::{
    EPSILON, FACE_MESH_LANDMARKS, LEFT_EYE_BOTTOM, LEFT_EYE_LEFT, LEFT_EYE_RIGHT, LEFT_EYE_TOP, LOWER_LIP,
    MOUTH_LEFT_CORNER, MOUTH_RIGHT_CORNER, RIGHT_EYE_BOTTOM, RIGHT_EYE_LEFT, RIGHT_EYE_RIGHT, RIGHT_EYE_TOP,
    UPPER_LIP,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Normalized landmark coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One delivery from the landmark provider
#[derive(Debug, Clone, PartialEq)]
pub enum LandmarkFrame {
    /// Landmarks of the first detected face, indexed by face-mesh topology
    Face(Vec<Landmark>),
    /// The provider saw no face in this frame
    NoFace,
}

impl LandmarkFrame {
    /// Build a frame from an optional point set; an empty set means no face
    pub fn from_points(points: Option<Vec<Landmark>>) -> Self {
        match points {
            Some(points) if !points.is_empty() => Self::Face(points),
            _ => Self::NoFace,
        }
    }

    /// Ratios for this frame, `None` for no-face and malformed frames alike
    pub fn ratios(&self) -> Option<RawRatios> {
        match self {
            Self::Face(points) => RawRatios::from_landmarks(points),
            Self::NoFace => None,
        }
    }
}

/// Per-frame mouth and eye ratios, not retained after classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRatios {
    /// Vertical lip separation over mouth width
    pub mouth: f64,
    /// Mean eye aspect ratio of both eyes
    pub eye: f64,
}

impl RawRatios {
    /// Compute ratios from a landmark set
    pub fn from_landmarks(points: &[Landmark]) -> Option<Self> {
        Self::try_from_landmarks(points).ok()
    }

    /// Compute ratios, reporting why a landmark set is unusable
    pub fn try_from_landmarks(points: &[Landmark]) -> Result<Self> {
        let mouth = span_ratio(points, UPPER_LIP, LOWER_LIP, MOUTH_LEFT_CORNER, MOUTH_RIGHT_CORNER)?;
        let left_eye = span_ratio(points, LEFT_EYE_TOP, LEFT_EYE_BOTTOM, LEFT_EYE_LEFT, LEFT_EYE_RIGHT)?;
        let right_eye = span_ratio(points, RIGHT_EYE_TOP, RIGHT_EYE_BOTTOM, RIGHT_EYE_LEFT, RIGHT_EYE_RIGHT)?;

        Ok(Self {
            mouth,
            eye: (left_eye + right_eye) / 2.0,
        })
    }
}

fn point(points: &[Landmark], index: usize) -> Result<&Landmark> {
    let point = points.get(index).ok_or_else(|| {
        Error::LandmarkError(format!("Missing landmark {} (got {} points)", index, points.len()))
    })?;
    if !point.is_finite() {
        return Err(Error::LandmarkError(format!("Landmark {} is not finite", index)));
    }
    Ok(point)
}

/// |bottom.y - top.y| / |right.x - left.x|
fn span_ratio(points: &[Landmark], top: usize, bottom: usize, left: usize, right: usize) -> Result<f64> {
    let vertical = (point(points, bottom)?.y - point(points, top)?.y).abs();
    let horizontal = (point(points, right)?.x - point(points, left)?.x).abs();
    if horizontal < EPSILON {
        return Err(Error::LandmarkError(format!(
            "Landmarks {} and {} have no horizontal span",
            left, right
        )));
    }

    let ratio = vertical / horizontal;
    if !ratio.is_finite() {
        return Err(Error::LandmarkError(format!("Ratio over landmarks {}-{} is not finite", top, bottom)));
    }
    Ok(ratio)
}

/// Build a full landmark set whose ratios equal the requested values.
///
/// Used by the scripted landmark provider and by tests; points that do not
/// take part in a ratio sit at the face center.
pub fn synthetic_face(mouth_ratio: f64, eye_ratio: f64) -> Vec<Landmark> {
    let mut points = vec![Landmark::new(0.5, 0.5); FACE_MESH_LANDMARKS];

    let mouth_width = 0.2;
    let mouth_gap = mouth_ratio * mouth_width;
    points[MOUTH_LEFT_CORNER] = Landmark::new(0.4, 0.7);
    points[MOUTH_RIGHT_CORNER] = Landmark::new(0.4 + mouth_width, 0.7);
    points[UPPER_LIP] = Landmark::new(0.5, 0.7 - mouth_gap / 2.0);
    points[LOWER_LIP] = Landmark::new(0.5, 0.7 + mouth_gap / 2.0);

    let eye_width = 0.12;
    let eye_gap = eye_ratio * eye_width;
    for (top, bottom, left, right, left_x) in [
        (LEFT_EYE_TOP, LEFT_EYE_BOTTOM, LEFT_EYE_LEFT, LEFT_EYE_RIGHT, 0.30),
        (RIGHT_EYE_TOP, RIGHT_EYE_BOTTOM, RIGHT_EYE_LEFT, RIGHT_EYE_RIGHT, 0.58),
    ] {
        points[left] = Landmark::new(left_x, 0.4);
        points[right] = Landmark::new(left_x + eye_width, 0.4);
        points[top] = Landmark::new(left_x + eye_width / 2.0, 0.4 - eye_gap / 2.0);
        points[bottom] = Landmark::new(left_x + eye_width / 2.0, 0.4 + eye_gap / 2.0);
    }

    points
}
