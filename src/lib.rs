//! Interruptible, gesture-driven slide transitions for modal surfaces.
//!
//! A presented surface slides up from below its container and can be dragged
//! back down to dismiss it. The [`InteractionController`] follows the finger
//! while a gesture is active, decides on release whether the transition
//! finishes or springs back, and lets a new gesture grab the surface mid-spring
//! without it jumping.
//!
//! The host supplies the collaborators: a [`TransitionContext`] per session, a
//! [`TransitionHost`] that can begin dismissals, and optionally its own
//! [`AnimationDriver`]. Hosts without an animator use the built-in
//! [`SpringAnimator`] and call [`InteractionController::tick`] every frame.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod transition;

pub use animation::{AnimationDriver, AnimationHandle, SpringAnimator};
pub use config::InteractionConfig;
pub use error::TransitionError;
pub use transition::{
    InteractionController, InteractionPhase, Surface, TransitionContext, TransitionHost,
};

pub mod prelude {
    pub use crate::animation::{
        AnimationDriver, AnimationEvent, AnimationHandle, SpringAnimation, SpringAnimator,
        SpringConfig,
    };
    pub use crate::config::InteractionConfig;
    pub use crate::error::TransitionError;
    pub use crate::geometry::{Rect, Vector2};
    pub use crate::gesture::{
        Directions, DragTracker, GesturePhase, GestureSample, ScrollObserver,
    };
    pub use crate::transition::{
        InteractionController, InteractionPhase, InteractionState, MetricProvider, Surface,
        SurfaceKey, TransitionContext, TransitionHost, TransitionOutcome,
    };
}
