use super::{GesturePhase, GestureSample};
use crate::geometry::Vector2;

/// Ring buffer size for velocity tracking samples.
const HISTORY_SIZE: usize = 20;

/// Only use samples within the last 100ms for velocity calculation.
const HORIZON_MS: i64 = 100;

/// If no movement for this duration, assume the pointer has stopped.
const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Default)]
struct DataPointAtTime {
    time_ms: i64,
    position: f32,
}

/// 1D velocity estimate from timestamped positions.
///
/// Fits a least-squares line through the samples inside the horizon and
/// returns its slope in units per second.
#[derive(Clone, Default)]
pub struct VelocityTracker {
    samples: [Option<DataPointAtTime>; HISTORY_SIZE],
    index: usize,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_data_point(&mut self, time_ms: i64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(DataPointAtTime { time_ms, position });
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }

    /// Velocity in units per second; zero with fewer than two usable samples
    pub fn calculate_velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        // Walk backwards from the newest sample while inside the horizon
        let mut points = Vec::with_capacity(HISTORY_SIZE);
        let mut previous_time = newest.time_ms;
        for offset in 0..HISTORY_SIZE {
            let slot = (self.index + HISTORY_SIZE - offset) % HISTORY_SIZE;
            let Some(point) = self.samples[slot] else {
                break;
            };
            let age = newest.time_ms - point.time_ms;
            let gap = previous_time - point.time_ms;
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            previous_time = point.time_ms;
            points.push(point);
        }

        if points.len() < 2 {
            return 0.0;
        }

        let n = points.len() as f64;
        let mean_t = points
            .iter()
            .map(|p| (p.time_ms - newest.time_ms) as f64)
            .sum::<f64>()
            / n;
        let mean_x = points.iter().map(|p| p.position as f64).sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for point in &points {
            let dt = (point.time_ms - newest.time_ms) as f64 - mean_t;
            covariance += dt * (point.position as f64 - mean_x);
            variance += dt * dt;
        }
        if variance == 0.0 {
            return 0.0;
        }

        // Slope is per millisecond
        let velocity = (covariance / variance * 1000.0) as f32;
        if velocity.is_finite() {
            velocity
        } else {
            0.0
        }
    }
}

/// Builds gesture samples from raw vertical translations, estimating velocity.
#[derive(Clone, Default)]
pub struct DragTracker {
    tracker: VelocityTracker,
    active: bool,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn begin(&mut self, time_ms: i64) -> GestureSample {
        self.tracker.reset();
        self.tracker.add_data_point(time_ms, 0.0);
        self.active = true;
        GestureSample::begin()
    }

    pub fn update(&mut self, translation: f32, time_ms: i64) -> GestureSample {
        self.sample(GesturePhase::Change, translation, time_ms)
    }

    pub fn end(&mut self, translation: f32, time_ms: i64) -> GestureSample {
        let sample = self.sample(GesturePhase::End, translation, time_ms);
        self.active = false;
        sample
    }

    pub fn cancel(&mut self, translation: f32) -> GestureSample {
        self.active = false;
        self.tracker.reset();
        GestureSample::cancel(translation)
    }

    fn sample(&mut self, phase: GesturePhase, translation: f32, time_ms: i64) -> GestureSample {
        self.tracker.add_data_point(time_ms, translation);
        let velocity = Vector2::vertical(self.tracker.calculate_velocity());
        GestureSample::new(phase, translation, velocity)
    }
}
