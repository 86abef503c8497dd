//! The animation driver seam and the built-in frame-stepped spring driver.
//!
//! The interaction controller never runs animations itself. It hands a
//! [`SpringAnimation`] to an [`AnimationDriver`] and later learns that the
//! animation finished, either from [`AnimationDriver::advance`] (drivers that
//! are stepped by the host's frame loop, like [`SpringAnimator`]) or from the
//! host calling back into the controller (drivers backed by a platform
//! animator).

use super::{Animatable, SpringConfig, SpringState};
use crate::geometry::Rect;
use crate::transition::SurfaceKey;

/// Distance from the target (in fractions of the travel) at which a spring counts as settled
const SETTLE_THRESHOLD: f32 = 0.001;

/// Identifies one animation started on a driver
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A request to move a surface from one frame to another with spring timing
#[derive(Clone, Debug, PartialEq)]
pub struct SpringAnimation {
    /// Surface being animated
    pub target: SurfaceKey,
    /// Frame at the start of the animation
    pub from: Rect,
    /// Resting frame
    pub to: Rect,
    /// Initial velocity in fractions of the total travel per second
    pub initial_velocity: f32,
    /// Spring parameters
    pub spring: SpringConfig,
}

impl SpringAnimation {
    /// Frame at the given normalized spring position
    pub fn frame_at(&self, position: f32) -> Rect {
        Rect::lerp(&self.from, &self.to, position)
    }
}

/// What happened during one driver step
#[derive(Clone, Debug, PartialEq)]
pub enum AnimationEvent {
    /// No animation is running
    Idle,
    /// The animation moved to a new interpolated frame
    Frame { handle: AnimationHandle, frame: Rect },
    /// The animation reached its resting frame
    Completed { handle: AnimationHandle, frame: Rect },
}

/// Runs spring animations for the interaction controller
pub trait AnimationDriver {
    /// Start running `animation`, replacing any animation still in flight
    fn start(&mut self, animation: SpringAnimation) -> AnimationHandle;

    /// Stop the animation where it is and return its current interpolated frame.
    ///
    /// Returns `None` when `handle` is not running any more.
    fn stop(&mut self, handle: AnimationHandle) -> Option<Rect>;

    /// Advance by `dt_secs`. Drivers that run on their own clock keep the default.
    fn advance(&mut self, _dt_secs: f32) -> AnimationEvent {
        AnimationEvent::Idle
    }
}

struct RunningSpring {
    handle: AnimationHandle,
    animation: SpringAnimation,
    state: SpringState,
}

/// Frame-stepped spring driver, advanced from the host's frame loop
#[derive(Default)]
pub struct SpringAnimator {
    next_id: u64,
    running: Option<RunningSpring>,
}

impl SpringAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an animation is in flight
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Current interpolated frame of the running animation, if any
    pub fn current_frame(&self) -> Option<Rect> {
        self.running
            .as_ref()
            .map(|running| running.animation.frame_at(running.state.position))
    }
}

impl AnimationDriver for SpringAnimator {
    fn start(&mut self, animation: SpringAnimation) -> AnimationHandle {
        self.next_id += 1;
        let handle = AnimationHandle::new(self.next_id);

        let mut state = SpringState::with_velocity(animation.initial_velocity);
        if animation.from == animation.to {
            state.settle();
        }

        if let Some(previous) = self.running.take() {
            log::debug!("Spring {:?} replaced by {:?}", previous.handle, handle);
        }
        self.running = Some(RunningSpring {
            handle,
            animation,
            state,
        });
        handle
    }

    fn stop(&mut self, handle: AnimationHandle) -> Option<Rect> {
        match self.running.take() {
            Some(running) if running.handle == handle => {
                Some(running.animation.frame_at(running.state.position))
            }
            other => {
                self.running = other;
                None
            }
        }
    }

    fn advance(&mut self, dt_secs: f32) -> AnimationEvent {
        let Some(running) = self.running.as_mut() else {
            return AnimationEvent::Idle;
        };

        let position = running.state.step(dt_secs, &running.animation.spring);
        if running.state.is_settled(SETTLE_THRESHOLD) {
            let handle = running.handle;
            let frame = running.animation.to;
            self.running = None;
            return AnimationEvent::Completed { handle, frame };
        }

        AnimationEvent::Frame {
            handle: running.handle,
            frame: running.animation.frame_at(position),
        }
    }
}
