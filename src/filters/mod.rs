//! Signal smoothing for per-frame facial ratios.
//!
//! Raw mouth and eye ratios jitter from frame to frame. A filter smooths both
//! channels before the classifier thresholds them.

/// Moving average filter backed by bounded sample windows
pub mod moving_average;

use crate::constants::DEFAULT_SMOOTH_FRAMES;
use crate::Result;

/// Trait for all ratio filters
pub trait RatioFilter: Send + Sync {
    /// Apply filter to a (mouth, eye) ratio pair
    fn apply(&mut self, mouth: f64, eye: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl RatioFilter for NoFilter {
    fn apply(&mut self, mouth: f64, eye: f64) -> (f64, f64) {
        (mouth, eye)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a ratio filter from a spec such as `none`, `moving_average` or `moving_average:5`
pub fn create_filter(filter_spec: &str) -> Result<Box<dyn RatioFilter>> {
    let lowered = filter_spec.to_lowercase();
    let mut parts = lowered.split(':');
    let name = parts.next().unwrap_or_default();
    let param = parts.next();

    if parts.next().is_some() {
        return Err(crate::Error::FilterError(format!(
            "Too many parameters in filter spec: {filter_spec}"
        )));
    }

    match name {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "moving_average" | "movingaverage" => {
            let window = match param {
                Some(raw) => raw.parse::<usize>().map_err(|_| {
                    crate::Error::FilterError(format!("Window size must be a positive integer, got {raw}"))
                })?,
                None => DEFAULT_SMOOTH_FRAMES,
            };
            if window == 0 {
                return Err(crate::Error::FilterError(
                    "Window size must be greater than 0".to_string(),
                ));
            }
            Ok(Box::new(moving_average::MovingAverageFilter::new(window)))
        }
        _ => Err(crate::Error::FilterError(format!("Unknown filter type: {filter_spec}"))),
    }
}
