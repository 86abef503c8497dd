use bitflags::bitflags;

use super::{GesturePhase, GestureSample};

bitflags! {
    /// Vertical directions a one-way gesture may start in
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Directions: u8 {
        /// Finger moving toward the top of the container
        const UP   = 0b01;
        /// Finger moving toward the bottom of the container
        const DOWN = 0b10;
    }
}

impl Directions {
    /// Direction of a non-zero vertical translation
    fn of_translation(translation: f32) -> Self {
        if translation < 0.0 {
            Directions::UP
        } else {
            Directions::DOWN
        }
    }
}

/// Read-only source of a scroll surface's vertical content offset.
///
/// A one-way dismissal gesture may only start while the content is scrolled
/// to the top, so dragging down inside a scrolled list scrolls the list.
pub trait ScrollObserver {
    fn content_offset_y(&self) -> f32;

    /// Whether a one-way gesture may begin at the current offset
    fn allows_gesture(&self) -> bool {
        self.content_offset_y() <= 0.0
    }
}

impl<F: Fn() -> f32> ScrollObserver for F {
    fn content_offset_y(&self) -> f32 {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FilterState {
    Idle,
    /// Gesture began but has not moved yet
    Pending(GestureSample),
    Tracking,
    /// Gesture rejected until the next begin
    Failed,
}

/// Directional filter over a raw gesture stream.
///
/// A begin is held back until the first movement. If that movement goes in an
/// allowed direction the held begin is released together with the change and
/// the gesture is tracked to its end, reversals included. Otherwise the
/// gesture fails and nothing is forwarded until the next begin. The gate is
/// consulted at begin; a closed gate fails the gesture immediately.
pub struct OneWayGesture {
    directions: Directions,
    gate: Box<dyn Fn() -> bool>,
    state: FilterState,
}

impl OneWayGesture {
    pub fn new(directions: Directions, gate: impl Fn() -> bool + 'static) -> Self {
        Self {
            directions,
            gate: Box::new(gate),
            state: FilterState::Idle,
        }
    }

    /// Filter that only checks direction
    pub fn ungated(directions: Directions) -> Self {
        Self::new(directions, || true)
    }

    /// Whether the current gesture has been recognized and is being forwarded
    pub fn is_tracking(&self) -> bool {
        self.state == FilterState::Tracking
    }

    /// Feed one raw sample; returns the samples to forward, in order.
    ///
    /// `allowed` is an extra gate from the caller (for example a scroll
    /// observer) combined with the filter's own gate at begin.
    pub fn filter(&mut self, sample: GestureSample, allowed: bool) -> Vec<GestureSample> {
        match sample.phase {
            GesturePhase::Begin => {
                self.state = if allowed && (self.gate)() {
                    FilterState::Pending(sample)
                } else {
                    log::debug!("One-way gesture gated at begin");
                    FilterState::Failed
                };
                Vec::new()
            }
            GesturePhase::Change => match self.state {
                FilterState::Pending(begin) => {
                    if sample.translation == 0.0 {
                        return Vec::new();
                    }
                    let direction = Directions::of_translation(sample.translation);
                    if self.directions.contains(direction) {
                        self.state = FilterState::Tracking;
                        vec![begin, sample]
                    } else {
                        log::debug!("One-way gesture failed: moved {:?}", direction);
                        self.state = FilterState::Failed;
                        Vec::new()
                    }
                }
                FilterState::Tracking => vec![sample],
                FilterState::Idle | FilterState::Failed => Vec::new(),
            },
            GesturePhase::End | GesturePhase::Cancel => {
                let forwarded = if self.state == FilterState::Tracking {
                    vec![sample]
                } else {
                    Vec::new()
                };
                self.state = FilterState::Idle;
                forwarded
            }
        }
    }
}
