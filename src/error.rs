use thiserror::Error;

use crate::transition::{InteractionPhase, SurfaceKey};

/// Reasons a transition step could not run.
///
/// None of these are surfaced to the user: the controller logs them and skips
/// the step, closing the session as cancelled when it cannot continue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error("No interaction phase set before starting the transition")]
    MissingPhase,
    #[error("Transition context has no {0:?} surface")]
    MissingSurface(SurfaceKey),
    #[error("Transition context has no frame for the {0:?} surface")]
    MissingFrame(SurfaceKey),
    #[error("A {0:?} transition is already attached")]
    SessionActive(InteractionPhase),
    #[error("No transition context is attached")]
    NoSession,
}
