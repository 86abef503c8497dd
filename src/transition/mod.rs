//! Interactive slide transitions.
//!
//! The host's transition system owns the session ([`TransitionContext`]) and
//! the surfaces being moved ([`Surface`]). The [`InteractionController`] turns
//! gestures into surface positions, decides whether a released gesture
//! finishes or cancels, and hands the rest of the motion to an
//! [`AnimationDriver`](crate::animation::AnimationDriver).

mod interaction;
mod metrics;
#[cfg(test)]
pub(crate) mod mock;

pub use interaction::{InteractionController, InteractionState};
pub use metrics::{DismissingMetrics, MetricProvider, PresentingMetrics};

use crate::geometry::Rect;

/// Which kind of transition the controller is driving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionPhase {
    /// The surface slides up into view (or is shown and may be dismissed)
    Presenting,
    /// The surface slides down out of view
    Dismissing,
    /// Nothing is presented
    #[default]
    None,
}

/// Surfaces taking part in a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKey {
    /// The surface being transitioned away from
    From,
    /// The surface being transitioned to
    To,
}

/// A movable surface owned by the host's view hierarchy
pub trait Surface {
    fn frame(&self) -> Rect;

    fn set_frame(&mut self, frame: Rect);

    /// Enable or disable touch handling for everything inside the surface
    fn set_descendants_interactive(&mut self, interactive: bool);
}

/// One transition session of the host's transition system
pub trait TransitionContext {
    /// Bounds of the container the surfaces move in
    fn container_bounds(&self) -> Rect;

    fn surface(&self, key: SurfaceKey) -> Option<&dyn Surface>;

    fn surface_mut(&mut self, key: SurfaceKey) -> Option<&mut dyn Surface>;

    /// Frame of `key` before the transition
    fn initial_frame(&self, key: SurfaceKey) -> Option<Rect>;

    /// Frame of `key` once the transition completes
    fn final_frame(&self, key: SurfaceKey) -> Option<Rect>;

    fn update_interactive_transition(&mut self, progress: f32);

    fn finish_interactive_transition(&mut self);

    fn cancel_interactive_transition(&mut self);

    fn complete_transition(&mut self, completed: bool);
}

/// Capabilities the controller asks of the host application
pub trait TransitionHost {
    /// Begin dismissing the presented surface.
    ///
    /// Hosts that can build the session right away return its context, which
    /// the controller starts immediately. Hosts that start the session later
    /// return `None` and call
    /// [`InteractionController::start_interactive_transition`] themselves.
    fn request_dismissal(&mut self) -> Option<Box<dyn TransitionContext>>;

    /// Install or remove the container-wide listener that lets a new gesture
    /// grab the surface while it springs back.
    fn set_interruption_capture(&mut self, installed: bool);
}

/// How a transition session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The `phase` transition ran to its end
    Finished(InteractionPhase),
    /// The `phase` transition returned to where it started
    Cancelled(InteractionPhase),
}
