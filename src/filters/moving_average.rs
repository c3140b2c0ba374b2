use std::collections::VecDeque;
use super::RatioFilter;

/// Bounded FIFO window of ratio samples with a running average
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    capacity: usize,
    samples: VecDeque<f64>,
    average: Option<f64>,
}

impl SmoothingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Window size must be greater than 0");
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
            average: None,
        }
    }

    /// Insert a sample, evicting the oldest when full, and return the new average
    pub fn push(&mut self, sample: f64) -> f64 {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);

        let avg = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        self.average = Some(avg);
        avg
    }

    /// Average of the retained samples, `None` before the first insert
    pub fn average(&self) -> Option<f64> {
        self.average
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.average = None;
    }
}

/// Moving average over the mouth and eye channels
pub struct MovingAverageFilter {
    mouth: SmoothingWindow,
    eye: SmoothingWindow,
}

impl MovingAverageFilter {
    pub fn new(window_size: usize) -> Self {
        Self {
            mouth: SmoothingWindow::new(window_size),
            eye: SmoothingWindow::new(window_size),
        }
    }

    pub fn mouth_window(&self) -> &SmoothingWindow {
        &self.mouth
    }

    pub fn eye_window(&self) -> &SmoothingWindow {
        &self.eye
    }
}

impl RatioFilter for MovingAverageFilter {
    fn apply(&mut self, mouth: f64, eye: f64) -> (f64, f64) {
        (self.mouth.push(mouth), self.eye.push(eye))
    }

    fn reset(&mut self) {
        self.mouth.clear();
        self.eye.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_moving_average() {
        let mut filter = MovingAverageFilter::new(3);

        let (m1, e1) = filter.apply(0.10, 0.30);
        assert_eq!(m1, 0.10);
        assert_eq!(e1, 0.30);

        let (m2, e2) = filter.apply(0.30, 0.10);
        assert!((m2 - 0.20).abs() < 1e-12);
        assert!((e2 - 0.20).abs() < 1e-12);

        let (m3, _) = filter.apply(0.50, 0.20);
        assert!((m3 - 0.30).abs() < 1e-12);

        // Window is full, oldest value should be dropped
        let (m4, _) = filter.apply(0.70, 0.20);
        assert!((m4 - 0.50).abs() < 1e-12);
        assert_eq!(filter.mouth_window().len(), 3);
    }

    #[test]
    fn test_window_average_before_insert() {
        let window = SmoothingWindow::new(3);
        assert!(window.average().is_none());
        assert!(window.is_empty());
    }

    #[test]
    fn test_reset_clears_both_channels() {
        let mut filter = MovingAverageFilter::new(3);
        filter.apply(1.0, 1.0);
        filter.reset();
        assert!(filter.mouth_window().is_empty());
        assert!(filter.eye_window().average().is_none());
    }

    proptest! {
        #[test]
        fn prop_window_never_exceeds_capacity(
            capacity in 1usize..8,
            samples in prop::collection::vec(-10.0f64..10.0, 0..64),
        ) {
            let mut window = SmoothingWindow::new(capacity);
            for sample in samples {
                window.push(sample);
                prop_assert!(window.len() <= capacity);
            }
        }

        #[test]
        fn prop_average_is_mean_of_last_samples(
            samples in prop::collection::vec(0.0f64..2.0, 1..64),
        ) {
            let mut window = SmoothingWindow::new(3);
            let mut reported = 0.0;
            for &sample in &samples {
                reported = window.push(sample);
            }
            let tail = &samples[samples.len().saturating_sub(3)..];
            let expected = tail.iter().sum::<f64>() / tail.len() as f64;
            prop_assert!((reported - expected).abs() < 1e-9);
        }
    }
}
