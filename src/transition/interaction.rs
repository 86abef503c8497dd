//! The interaction state machine.
//!
//! A session moves `Idle -> Active -> Animating -> Idle`. While Active, every
//! gesture change is written straight through to the target surface. A
//! release hands the surface to the animation driver, and a new gesture while
//! the spring runs stops it where it is and returns to Active, re-anchoring
//! the gesture so the surface does not jump.

use std::mem;

use super::{
    DismissingMetrics, InteractionPhase, MetricProvider, PresentingMetrics, SurfaceKey,
    TransitionContext, TransitionHost, TransitionOutcome,
};
use crate::animation::{
    project_velocity, AnimationDriver, AnimationEvent, AnimationHandle, SpringAnimation,
    SpringAnimator,
};
use crate::config::InteractionConfig;
use crate::error::TransitionError;
use crate::geometry::Rect;
use crate::gesture::{
    Directions, GesturePhase, GestureSample, GestureStatus, OneWayGesture, ScrollObserver,
};

/// Where the controller is in a transition session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// No transition context attached
    Idle,
    /// A gesture (or the host) is positioning the surface directly
    Active,
    /// Springing to the finished frame
    Finishing,
    /// Springing back to the starting frame
    Cancelling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnimationKind {
    Finish,
    Cancel,
}

struct ActiveSession {
    phase: InteractionPhase,
    context: Box<dyn TransitionContext>,
    target: SurfaceKey,
    /// Total travel, the container height
    distance: f32,
    initial_frame: Rect,
    final_frame: Rect,
}

enum SessionState {
    Idle,
    Active(ActiveSession),
    Animating {
        session: ActiveSession,
        kind: AnimationKind,
        handle: AnimationHandle,
    },
}

/// Surface a phase moves, used to name what is missing
fn expected_surface(phase: InteractionPhase) -> SurfaceKey {
    match phase {
        InteractionPhase::Dismissing => SurfaceKey::From,
        _ => SurfaceKey::To,
    }
}

/// Phase left behind once a `phase` session finishes or cancels
fn resolved_phase(phase: InteractionPhase, finished: bool) -> InteractionPhase {
    match (phase, finished) {
        (InteractionPhase::Presenting, true) => InteractionPhase::Presenting,
        (InteractionPhase::Presenting, false) => InteractionPhase::None,
        (InteractionPhase::Dismissing, true) => InteractionPhase::None,
        (InteractionPhase::Dismissing, false) => InteractionPhase::Presenting,
        (InteractionPhase::None, _) => InteractionPhase::None,
    }
}

/// Close a context that never became a session
fn close_cancelled(context: &mut dyn TransitionContext) {
    context.cancel_interactive_transition();
    context.complete_transition(false);
}

/// Drives interactive present/dismiss slide transitions from gesture samples
pub struct InteractionController<D: AnimationDriver = SpringAnimator> {
    config: InteractionConfig,
    phase: InteractionPhase,
    presenting: Box<dyn MetricProvider>,
    dismissing: Box<dyn MetricProvider>,
    state: SessionState,
    /// A live gesture is driving (or about to drive) the session
    gesture_driven: bool,
    /// Dismissal requested from the host whose context has not arrived yet
    dismissal_pending: bool,
    /// Subtracted from raw gesture translation after a re-grab
    interruption_offset: f32,
    driver: D,
    host: Option<Box<dyn TransitionHost>>,
    capture_installed: bool,
    one_way: Option<OneWayGesture>,
    scroll_observer: Option<Box<dyn ScrollObserver>>,
}

impl InteractionController<SpringAnimator> {
    pub fn new() -> Self {
        Self::with_config(InteractionConfig::default())
    }

    pub fn with_config(config: InteractionConfig) -> Self {
        Self::with_driver(config, SpringAnimator::new())
    }
}

impl Default for InteractionController<SpringAnimator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: AnimationDriver> InteractionController<D> {
    pub fn with_driver(config: InteractionConfig, driver: D) -> Self {
        Self {
            presenting: Box::new(PresentingMetrics::new(config.presenting_metrics())),
            dismissing: Box::new(DismissingMetrics::new(config.dismissing_metrics())),
            config,
            phase: InteractionPhase::None,
            state: SessionState::Idle,
            gesture_driven: false,
            dismissal_pending: false,
            interruption_offset: 0.0,
            driver,
            host: None,
            capture_installed: false,
            one_way: None,
            scroll_observer: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn set_host(&mut self, host: impl TransitionHost + 'static) {
        self.host = Some(Box::new(host));
    }

    /// Replace the geometry used for `phase`
    pub fn set_metrics(&mut self, phase: InteractionPhase, metrics: Box<dyn MetricProvider>) {
        match phase {
            InteractionPhase::Presenting => self.presenting = metrics,
            InteractionPhase::Dismissing => self.dismissing = metrics,
            InteractionPhase::None => log::warn!("No metrics are used while nothing is presented"),
        }
    }

    pub fn interaction_phase(&self) -> InteractionPhase {
        self.phase
    }

    /// Select the transition the next session runs. Ignored while a session is attached.
    pub fn set_interaction_phase(&mut self, phase: InteractionPhase) {
        if self.is_interaction_in_progress() {
            log::warn!(
                "Ignoring phase change to {:?} during a {:?} transition",
                phase,
                self.phase
            );
            return;
        }
        self.phase = phase;
    }

    /// Whether a transition context is attached and not yet finished or cancelled
    pub fn is_interaction_in_progress(&self) -> bool {
        !matches!(self.state, SessionState::Idle)
    }

    pub fn state(&self) -> InteractionState {
        match &self.state {
            SessionState::Idle => InteractionState::Idle,
            SessionState::Active(_) => InteractionState::Active,
            SessionState::Animating {
                kind: AnimationKind::Finish,
                ..
            } => InteractionState::Finishing,
            SessionState::Animating {
                kind: AnimationKind::Cancel,
                ..
            } => InteractionState::Cancelling,
        }
    }

    /// Handle of the spring currently running, if any
    pub fn active_animation(&self) -> Option<AnimationHandle> {
        match &self.state {
            SessionState::Animating { handle, .. } => Some(*handle),
            _ => None,
        }
    }

    pub fn interruption_offset(&self) -> f32 {
        self.interruption_offset
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Gate one-way gestures on a scroll surface being scrolled to its top
    pub fn set_scroll_observer(&mut self, observer: impl ScrollObserver + 'static) {
        self.scroll_observer = Some(Box::new(observer));
    }

    pub fn clear_scroll_observer(&mut self) {
        self.scroll_observer = None;
    }

    /// Filter gestures from [`handle_gesture`](Self::handle_gesture) to those
    /// starting in `directions`, and only while `gate` allows.
    pub fn attach_one_way_gesture(
        &mut self,
        directions: Directions,
        gate: impl Fn() -> bool + 'static,
    ) {
        self.one_way = Some(OneWayGesture::new(directions, gate));
    }

    /// Attach `context` and start driving its transition.
    ///
    /// The interaction phase must already be set. Without a gesture in
    /// progress the transition animates straight to its end. A context that
    /// cannot be started is closed as cancelled.
    pub fn start_interactive_transition(&mut self, context: Box<dyn TransitionContext>) {
        if let Err(err) = self.try_start(context) {
            log::warn!("Interactive transition not started: {}", err);
        }
    }

    fn try_start(&mut self, mut context: Box<dyn TransitionContext>) -> Result<(), TransitionError> {
        if self.is_interaction_in_progress() {
            close_cancelled(context.as_mut());
            return Err(TransitionError::SessionActive(self.phase));
        }

        // The gesture that asked for this dismissal was released before the
        // context arrived: run it as a dismissal and spring straight back.
        let late_dismissal =
            mem::take(&mut self.dismissal_pending) && self.phase == InteractionPhase::Presenting;
        if late_dismissal {
            log::debug!("Dismissal context arrived after its gesture ended");
            self.phase = InteractionPhase::Dismissing;
        }

        let phase = self.phase;
        let metrics: &dyn MetricProvider = match phase {
            InteractionPhase::Presenting => self.presenting.as_ref(),
            InteractionPhase::Dismissing => self.dismissing.as_ref(),
            InteractionPhase::None => {
                self.gesture_driven = false;
                close_cancelled(context.as_mut());
                return Err(TransitionError::MissingPhase);
            }
        };

        let prepared = metrics
            .target_surface(context.as_ref())
            .ok_or(TransitionError::MissingSurface(expected_surface(phase)))
            .and_then(|target| {
                let initial = metrics
                    .initial_frame(context.as_ref())
                    .ok_or(TransitionError::MissingFrame(target))?;
                let final_frame = metrics
                    .final_frame(context.as_ref())
                    .ok_or(TransitionError::MissingFrame(target))?;
                Ok((target, initial, final_frame))
            });
        let (target, initial_frame, final_frame) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                self.gesture_driven = false;
                self.phase = resolved_phase(phase, false);
                close_cancelled(context.as_mut());
                return Err(err);
            }
        };

        let distance = context.container_bounds().height;
        if let Some(surface) = context.surface_mut(target) {
            if phase == InteractionPhase::Presenting {
                surface.set_frame(initial_frame);
            }
            surface.set_descendants_interactive(false);
        }

        log::debug!(
            "Started {:?} transition over {} (gesture driven: {})",
            phase,
            distance,
            self.gesture_driven
        );

        self.interruption_offset = 0.0;
        self.state = SessionState::Active(ActiveSession {
            phase,
            context,
            target,
            distance,
            initial_frame,
            final_frame,
        });

        if late_dismissal {
            self.begin_animation(AnimationKind::Cancel, 0.0);
        } else if !self.gesture_driven {
            self.begin_animation(AnimationKind::Finish, 0.0);
        }
        Ok(())
    }

    /// Feed a sample from the surface's own drag recognizer.
    ///
    /// Samples pass through the one-way filter when one is attached.
    pub fn handle_gesture(&mut self, sample: GestureSample) {
        let samples = match self.one_way.as_mut() {
            Some(filter) => {
                let allowed = self
                    .scroll_observer
                    .as_ref()
                    .map_or(true, |observer| observer.allows_gesture());
                filter.filter(sample, allowed)
            }
            None => vec![sample],
        };

        for sample in samples {
            self.process_sample(&sample);
        }
    }

    /// Feed a sample from the container-wide interruption-capture listener.
    ///
    /// Ignored unless the listener is currently installed.
    pub fn handle_capture_gesture(&mut self, sample: GestureSample) {
        if !self.capture_installed {
            log::trace!("Capture gesture ignored, listener not installed");
            return;
        }
        self.process_sample(&sample);
    }

    fn process_sample(&mut self, sample: &GestureSample) {
        match sample.phase {
            GesturePhase::Begin => self.gesture_began(),
            GesturePhase::Change => self.gesture_changed(sample),
            GesturePhase::End => self.gesture_released(sample, false),
            GesturePhase::Cancel => self.gesture_released(sample, true),
        }
    }

    fn gesture_began(&mut self) {
        match self.state {
            SessionState::Idle => {
                if self.phase != InteractionPhase::Presenting {
                    log::trace!("Gesture began with nothing to drive ({:?})", self.phase);
                    return;
                }
                let Some(host) = self.host.as_mut() else {
                    log::warn!("Gesture began on a presented surface but no host can dismiss it");
                    return;
                };

                log::debug!("Gesture began a dismissal");
                self.phase = InteractionPhase::Dismissing;
                self.gesture_driven = true;
                self.dismissal_pending = true;
                if let Some(context) = host.request_dismissal() {
                    self.start_interactive_transition(context);
                }
            }
            SessionState::Active(_) => self.gesture_driven = true,
            SessionState::Animating { .. } => self.interrupt(),
        }
    }

    /// Stop the running spring where it is and hand the surface back to the gesture
    fn interrupt(&mut self) {
        let (mut session, kind, handle) = match mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Animating {
                session,
                kind,
                handle,
            } => (session, kind, handle),
            other => {
                self.state = other;
                return;
            }
        };

        let stopped = self.driver.stop(handle).or_else(|| {
            session
                .context
                .surface(session.target)
                .map(|surface| surface.frame())
        });
        if let (Some(frame), Some(surface)) = (stopped, session.context.surface_mut(session.target))
        {
            surface.set_frame(frame);
        }

        let metrics: &dyn MetricProvider = match session.phase {
            InteractionPhase::Presenting => self.presenting.as_ref(),
            _ => self.dismissing.as_ref(),
        };
        self.interruption_offset = match metrics.interruption_translation(session.context.as_ref())
        {
            Some(translation) => -translation,
            None => {
                log::warn!(
                    "{}; re-grabbing without an offset",
                    TransitionError::MissingSurface(session.target)
                );
                0.0
            }
        };

        log::debug!(
            "Interrupted {:?} animation at {:?}, offset {}",
            kind,
            stopped,
            self.interruption_offset
        );
        self.gesture_driven = true;
        self.state = SessionState::Active(session);
    }

    fn gesture_changed(&mut self, sample: &GestureSample) {
        let status = GestureStatus::from_sample(sample, self.interruption_offset);
        let SessionState::Active(session) = &mut self.state else {
            return;
        };

        let metrics: &dyn MetricProvider = match session.phase {
            InteractionPhase::Presenting => self.presenting.as_ref(),
            _ => self.dismissing.as_ref(),
        };
        let progress = metrics.progress(status.vertical_translation, session.distance);
        let Some(y) = metrics.vertical_position(session.context.as_ref(), progress, session.distance)
        else {
            log::warn!("{}", TransitionError::MissingFrame(session.target));
            return;
        };

        let Some(surface) = session.context.surface_mut(session.target) else {
            log::warn!("{}", TransitionError::MissingSurface(session.target));
            return;
        };
        surface.set_frame(session.final_frame.with_y(y));
        session.context.update_interactive_transition(progress);

        log::trace!("Gesture progress {:.3} at y {:.1}", progress, y);
    }

    /// A user release (`cancelled == false`) or a recognizer-level cancel
    fn gesture_released(&mut self, sample: &GestureSample, cancelled: bool) {
        let status = GestureStatus::from_sample(sample, self.interruption_offset);
        let decision = match &self.state {
            SessionState::Active(session) => {
                let metrics: &dyn MetricProvider = match session.phase {
                    InteractionPhase::Presenting => self.presenting.as_ref(),
                    _ => self.dismissing.as_ref(),
                };
                let progress = metrics.progress(status.vertical_translation, session.distance);
                Some(!cancelled && metrics.should_finish(progress, status.velocity.y))
            }
            _ => None,
        };
        let Some(should_finish) = decision else {
            if matches!(self.state, SessionState::Idle) {
                self.abandon_pending_dismissal();
            }
            return;
        };

        self.gesture_driven = false;
        if should_finish {
            self.begin_animation(AnimationKind::Finish, status.velocity.y);
        } else {
            self.begin_animation(AnimationKind::Cancel, status.velocity.y);
        }

        if !cancelled {
            self.install_interruption_capture();
        }
    }

    /// The gesture that asked for a dismissal ended before the host attached a context
    fn abandon_pending_dismissal(&mut self) {
        if self.gesture_driven && self.phase == InteractionPhase::Dismissing {
            log::debug!("Dismissal gesture ended before the transition started");
            self.phase = InteractionPhase::Presenting;
        }
        self.gesture_driven = false;
    }

    fn begin_animation(&mut self, kind: AnimationKind, velocity_y: f32) {
        let session = match mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Active(session) => session,
            other => {
                self.state = other;
                return;
            }
        };

        let to = match kind {
            AnimationKind::Finish => session.final_frame,
            AnimationKind::Cancel => session.initial_frame,
        };
        let from = session
            .context
            .surface(session.target)
            .map_or(to, |surface| surface.frame());
        let initial_velocity = project_velocity(velocity_y, from.y, to.y);

        let handle = self.driver.start(SpringAnimation {
            target: session.target,
            from,
            to,
            initial_velocity,
            spring: self.config.spring(),
        });
        log::debug!(
            "{:?} {:?} from y {} to y {} (velocity {:.3})",
            kind,
            session.phase,
            from.y,
            to.y,
            initial_velocity
        );

        self.state = SessionState::Animating {
            session,
            kind,
            handle,
        };
    }

    /// Spring the attached session back to its starting frame, as a recognizer
    /// cancel would. A running finish animation is stopped where it is first.
    pub fn cancel_interactive_transition(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Idle => return Err(TransitionError::NoSession),
            SessionState::Animating {
                kind: AnimationKind::Cancel,
                ..
            } => return Ok(()),
            SessionState::Animating { .. } => self.interrupt(),
            SessionState::Active(_) => {}
        }
        self.gesture_driven = false;
        self.begin_animation(AnimationKind::Cancel, 0.0);
        Ok(())
    }

    /// Advance a frame-stepped driver by `dt_secs`, writing the interpolated
    /// frame and finalizing the session when the spring settles.
    pub fn tick(&mut self, dt_secs: f32) -> Option<TransitionOutcome> {
        match self.driver.advance(dt_secs) {
            AnimationEvent::Idle => None,
            AnimationEvent::Frame { handle, frame } => {
                self.apply_animation_frame(handle, frame);
                None
            }
            AnimationEvent::Completed { handle, frame } => {
                self.apply_animation_frame(handle, frame);
                self.on_animation_completed(handle)
            }
        }
    }

    fn apply_animation_frame(&mut self, handle: AnimationHandle, frame: Rect) {
        if let SessionState::Animating {
            session,
            handle: running,
            ..
        } = &mut self.state
        {
            if *running == handle {
                if let Some(surface) = session.context.surface_mut(session.target) {
                    surface.set_frame(frame);
                }
            }
        }
    }

    /// Report that the animation `handle` ran to completion.
    ///
    /// Completions for animations that were stopped or replaced are ignored.
    pub fn on_animation_completed(&mut self, handle: AnimationHandle) -> Option<TransitionOutcome> {
        match &self.state {
            SessionState::Animating { handle: running, .. } if *running == handle => {}
            _ => {
                log::debug!("Ignoring completion of stale animation {:?}", handle);
                return None;
            }
        }

        let SessionState::Animating { session, kind, .. } =
            mem::replace(&mut self.state, SessionState::Idle)
        else {
            return None;
        };
        Some(self.finalize(session, kind == AnimationKind::Finish))
    }

    fn finalize(&mut self, session: ActiveSession, finished: bool) -> TransitionOutcome {
        let ActiveSession {
            phase,
            mut context,
            target,
            initial_frame,
            final_frame,
            ..
        } = session;

        // Session state is cleared before any collaborator runs, so a callback
        // that starts the next session sees an idle controller.
        self.interruption_offset = 0.0;
        self.gesture_driven = false;
        self.phase = resolved_phase(phase, finished);

        let resting = if finished { final_frame } else { initial_frame };
        match context.surface_mut(target) {
            Some(surface) => {
                surface.set_frame(resting);
                surface.set_descendants_interactive(true);
            }
            None => log::warn!("{}", TransitionError::MissingSurface(target)),
        }

        if finished {
            context.finish_interactive_transition();
            context.complete_transition(true);
        } else {
            context.cancel_interactive_transition();
            context.complete_transition(false);
        }

        if self.phase == InteractionPhase::None {
            self.remove_interruption_capture();
        }

        log::debug!(
            "{:?} transition {}",
            phase,
            if finished { "finished" } else { "cancelled" }
        );
        if finished {
            TransitionOutcome::Finished(phase)
        } else {
            TransitionOutcome::Cancelled(phase)
        }
    }

    fn install_interruption_capture(&mut self) {
        if self.capture_installed {
            return;
        }
        if let Some(host) = self.host.as_mut() {
            host.set_interruption_capture(true);
            self.capture_installed = true;
        }
    }

    fn remove_interruption_capture(&mut self) {
        if !self.capture_installed {
            return;
        }
        if let Some(host) = self.host.as_mut() {
            host.set_interruption_capture(false);
        }
        self.capture_installed = false;
    }
}

impl<D: AnimationDriver> Drop for InteractionController<D> {
    fn drop(&mut self) {
        let session = match mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => return,
            SessionState::Active(session) => session,
            SessionState::Animating {
                session, handle, ..
            } => {
                self.driver.stop(handle);
                session
            }
        };

        log::debug!("Controller dropped during a {:?} transition", session.phase);
        let ActiveSession {
            mut context,
            target,
            ..
        } = session;
        if let Some(surface) = context.surface_mut(target) {
            surface.set_descendants_interactive(true);
        }
        close_cancelled(context.as_mut());
    }
}
