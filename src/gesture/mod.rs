//! Gesture input consumed by the interaction controller.
//!
//! Gestures arrive already recognized: the host's recognizer reports phase
//! transitions with the vertical translation since the gesture began and the
//! current velocity. This module adapts that stream: [`OneWayGesture`] filters
//! it down to a single allowed direction, and [`DragTracker`] produces samples
//! for hosts whose recognizer only reports positions.

mod filter;
mod velocity;

pub use filter::{Directions, OneWayGesture, ScrollObserver};
pub use velocity::{DragTracker, VelocityTracker};

use crate::geometry::Vector2;

/// Lifecycle phase of a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Begin,
    Change,
    End,
    /// The recognizer gave up on the gesture (not a user release)
    Cancel,
}

/// One event from a drag gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub phase: GesturePhase,
    /// Vertical translation since the gesture began (positive is downward)
    pub translation: f32,
    /// Current velocity in units per second
    pub velocity: Vector2,
}

impl GestureSample {
    pub fn new(phase: GesturePhase, translation: f32, velocity: Vector2) -> Self {
        Self {
            phase,
            translation,
            velocity,
        }
    }

    pub fn begin() -> Self {
        Self::new(GesturePhase::Begin, 0.0, Vector2::ZERO)
    }

    pub fn change(translation: f32, velocity_y: f32) -> Self {
        Self::new(
            GesturePhase::Change,
            translation,
            Vector2::vertical(velocity_y),
        )
    }

    pub fn end(translation: f32, velocity_y: f32) -> Self {
        Self::new(GesturePhase::End, translation, Vector2::vertical(velocity_y))
    }

    pub fn cancel(translation: f32) -> Self {
        Self::new(GesturePhase::Cancel, translation, Vector2::ZERO)
    }
}

/// Gesture translation and velocity after removing the interruption offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureStatus {
    pub vertical_translation: f32,
    pub velocity: Vector2,
}

impl GestureStatus {
    /// Status of `sample` for a session whose surface was re-grabbed at `interruption_offset`
    pub fn from_sample(sample: &GestureSample, interruption_offset: f32) -> Self {
        Self {
            vertical_translation: sample.translation - interruption_offset,
            velocity: sample.velocity,
        }
    }
}
