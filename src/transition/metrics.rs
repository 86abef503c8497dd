//! Geometry and release decisions for presenting and dismissing.
//!
//! Both providers move a surface vertically over a travel distance equal to
//! the container height. Presenting pulls the incoming surface up from below
//! the container; dismissing pushes the outgoing surface back down below it.

use super::{SurfaceKey, TransitionContext};
use crate::config::MetricConfig;
use crate::geometry::Rect;

/// Progress for `signed_translation` over `distance`, zero when the distance is degenerate
fn normalized(signed_translation: f32, distance: f32) -> f32 {
    if !distance.is_finite() || distance <= 0.0 {
        return 0.0;
    }
    let progress = signed_translation / distance;
    if progress.is_finite() {
        progress
    } else {
        0.0
    }
}

fn clamp_top(y: f32, top_max_y: Option<f32>) -> f32 {
    match top_max_y {
        Some(top) => top.max(y),
        None => y,
    }
}

/// Geometry and decisions for one direction of a slide transition
pub trait MetricProvider {
    /// Surface moved by the transition
    fn target_surface(&self, context: &dyn TransitionContext) -> Option<SurfaceKey>;

    /// Frame the surface rests at when the transition is cancelled
    fn initial_frame(&self, context: &dyn TransitionContext) -> Option<Rect>;

    /// Frame the surface rests at when the transition finishes
    fn final_frame(&self, context: &dyn TransitionContext) -> Option<Rect>;

    /// Surface y at `progress` over a travel of `distance`
    fn vertical_position(
        &self,
        context: &dyn TransitionContext,
        progress: f32,
        distance: f32,
    ) -> Option<f32>;

    /// Whether a gesture released at `progress` moving at `velocity` finishes the transition
    fn should_finish(&self, progress: f32, velocity: f32) -> bool;

    /// Translation that reproduces the surface's current position through
    /// [`progress`](Self::progress) and [`vertical_position`](Self::vertical_position)
    fn interruption_translation(&self, context: &dyn TransitionContext) -> Option<f32>;

    /// Progress for a vertical translation. Not clamped to `[0, 1]`.
    fn progress(&self, vertical_translation: f32, distance: f32) -> f32;
}

/// Metrics for sliding the incoming surface up into view
#[derive(Debug, Clone, Default)]
pub struct PresentingMetrics {
    config: MetricConfig,
}

impl PresentingMetrics {
    pub fn new(config: MetricConfig) -> Self {
        Self { config }
    }
}

impl MetricProvider for PresentingMetrics {
    fn target_surface(&self, context: &dyn TransitionContext) -> Option<SurfaceKey> {
        context.surface(SurfaceKey::To).map(|_| SurfaceKey::To)
    }

    fn initial_frame(&self, context: &dyn TransitionContext) -> Option<Rect> {
        let bottom = context.container_bounds().max_y();
        self.final_frame(context).map(|frame| frame.with_y(bottom))
    }

    fn final_frame(&self, context: &dyn TransitionContext) -> Option<Rect> {
        context.final_frame(SurfaceKey::To)
    }

    fn vertical_position(
        &self,
        context: &dyn TransitionContext,
        progress: f32,
        distance: f32,
    ) -> Option<f32> {
        let final_y = self.final_frame(context)?.y;
        let y = final_y + distance * (1.0 - progress);
        Some(clamp_top(y, self.config.top_max_y))
    }

    fn should_finish(&self, progress: f32, velocity: f32) -> bool {
        let threshold = self.config.velocity_threshold;
        // A fast downward flick cancels no matter how far along we are
        if velocity > threshold {
            return false;
        }
        progress > self.config.progress_threshold || velocity < -threshold
    }

    fn interruption_translation(&self, context: &dyn TransitionContext) -> Option<f32> {
        let current_y = context.surface(SurfaceKey::To)?.frame().y;
        let distance = context.container_bounds().height;
        // Unclamped y at zero progress
        let start_y = self.final_frame(context)?.y + distance;
        Some(current_y - start_y)
    }

    fn progress(&self, vertical_translation: f32, distance: f32) -> f32 {
        normalized(-vertical_translation, distance)
    }
}

/// Metrics for sliding the outgoing surface down out of view
#[derive(Debug, Clone, Default)]
pub struct DismissingMetrics {
    config: MetricConfig,
}

impl DismissingMetrics {
    pub fn new(config: MetricConfig) -> Self {
        Self { config }
    }
}

impl MetricProvider for DismissingMetrics {
    fn target_surface(&self, context: &dyn TransitionContext) -> Option<SurfaceKey> {
        context.surface(SurfaceKey::From).map(|_| SurfaceKey::From)
    }

    fn initial_frame(&self, context: &dyn TransitionContext) -> Option<Rect> {
        context.initial_frame(SurfaceKey::From)
    }

    fn final_frame(&self, context: &dyn TransitionContext) -> Option<Rect> {
        let bottom = context.container_bounds().max_y();
        self.initial_frame(context).map(|frame| frame.with_y(bottom))
    }

    fn vertical_position(
        &self,
        context: &dyn TransitionContext,
        progress: f32,
        distance: f32,
    ) -> Option<f32> {
        let initial_y = self.initial_frame(context)?.y;
        let y = initial_y + distance * progress;
        Some(clamp_top(y, self.config.top_max_y))
    }

    fn should_finish(&self, progress: f32, velocity: f32) -> bool {
        let threshold = self.config.velocity_threshold;
        // A fast upward flick keeps the surface no matter how far it was dragged
        if velocity < -threshold {
            return false;
        }
        progress > self.config.progress_threshold || velocity > threshold
    }

    fn interruption_translation(&self, context: &dyn TransitionContext) -> Option<f32> {
        let current_y = context.surface(SurfaceKey::From)?.frame().y;
        let start_y = self.initial_frame(context)?.y;
        Some(current_y - start_y)
    }

    fn progress(&self, vertical_translation: f32, distance: f32) -> f32 {
        normalized(vertical_translation, distance)
    }
}
