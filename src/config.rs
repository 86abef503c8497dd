use crate::animation::SpringConfig;

/// Tunable parameters for a slide transition
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Release velocity (units per second) that decides the outcome on its own
    pub velocity_threshold: f32,
    /// Progress past which a slow release finishes the transition
    pub progress_threshold: f32,
    /// Damping ratio of the spring-back animation (1.0 = critically damped)
    pub damping_ratio: f32,
    /// Reference duration of the spring-back animation, in seconds
    pub duration_secs: f32,
    /// Highest y the presenting surface may reach while dragged
    pub presenting_top_max_y: Option<f32>,
    /// Highest y the dismissing surface may reach while dragged
    pub dismissing_top_max_y: Option<f32>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 300.0,
            progress_threshold: 0.5,
            damping_ratio: 0.98,
            duration_secs: 0.6,
            presenting_top_max_y: None,
            dismissing_top_max_y: None,
        }
    }
}

impl InteractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity_threshold(mut self, threshold: f32) -> Self {
        self.velocity_threshold = threshold;
        self
    }

    pub fn progress_threshold(mut self, threshold: f32) -> Self {
        self.progress_threshold = threshold;
        self
    }

    pub fn damping_ratio(mut self, ratio: f32) -> Self {
        self.damping_ratio = ratio;
        self
    }

    pub fn duration_secs(mut self, duration: f32) -> Self {
        self.duration_secs = duration;
        self
    }

    /// Clamp the presenting surface so it never goes above `y`
    pub fn presenting_top_max_y(mut self, y: f32) -> Self {
        self.presenting_top_max_y = Some(y);
        self
    }

    /// Clamp the dismissing surface so it never goes above `y`
    pub fn dismissing_top_max_y(mut self, y: f32) -> Self {
        self.dismissing_top_max_y = Some(y);
        self
    }

    /// Spring parameters derived from the damping ratio and duration
    pub fn spring(&self) -> SpringConfig {
        SpringConfig::from_damping_ratio(self.damping_ratio, self.duration_secs)
    }

    pub(crate) fn presenting_metrics(&self) -> MetricConfig {
        MetricConfig {
            top_max_y: self.presenting_top_max_y,
            velocity_threshold: self.velocity_threshold,
            progress_threshold: self.progress_threshold,
        }
    }

    pub(crate) fn dismissing_metrics(&self) -> MetricConfig {
        MetricConfig {
            top_max_y: self.dismissing_top_max_y,
            velocity_threshold: self.velocity_threshold,
            progress_threshold: self.progress_threshold,
        }
    }
}

/// Per-provider geometry and decision parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricConfig {
    /// Optional topmost y clamp for the dragged surface
    pub top_max_y: Option<f32>,
    pub velocity_threshold: f32,
    pub progress_threshold: f32,
}

impl Default for MetricConfig {
    fn default() -> Self {
        InteractionConfig::default().presenting_metrics()
    }
}
