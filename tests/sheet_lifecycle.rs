use std::cell::RefCell;
use std::rc::Rc;

use slidesheet::prelude::*;

const CONTAINER: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 390.0,
    height: 844.0,
};
const PRESENTED: Rect = Rect {
    x: 0.0,
    y: 44.0,
    width: 390.0,
    height: 800.0,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared view state of a single sheet
#[derive(Debug)]
struct Scene {
    sheet: Rect,
    touch_enabled: bool,
    touch_toggles: usize,
    progress: Vec<f32>,
    completions: Vec<bool>,
    dismissal_requests: usize,
    capture_installed: bool,
}

impl Scene {
    fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            sheet: PRESENTED.with_y(CONTAINER.max_y()),
            touch_enabled: true,
            touch_toggles: 0,
            progress: Vec::new(),
            completions: Vec::new(),
            dismissal_requests: 0,
            capture_installed: false,
        }))
    }
}

struct SheetSurface(Rc<RefCell<Scene>>);

impl Surface for SheetSurface {
    fn frame(&self) -> Rect {
        self.0.borrow().sheet
    }

    fn set_frame(&mut self, frame: Rect) {
        self.0.borrow_mut().sheet = frame;
    }

    fn set_descendants_interactive(&mut self, interactive: bool) {
        let mut scene = self.0.borrow_mut();
        scene.touch_enabled = interactive;
        scene.touch_toggles += 1;
    }
}

/// Context moving the sheet in or out
struct SheetContext {
    key: SurfaceKey,
    sheet: SheetSurface,
    scene: Rc<RefCell<Scene>>,
}

impl SheetContext {
    fn presenting(scene: &Rc<RefCell<Scene>>) -> Box<dyn TransitionContext> {
        Box::new(Self {
            key: SurfaceKey::To,
            sheet: SheetSurface(scene.clone()),
            scene: scene.clone(),
        })
    }

    fn dismissing(scene: &Rc<RefCell<Scene>>) -> Box<dyn TransitionContext> {
        Box::new(Self {
            key: SurfaceKey::From,
            sheet: SheetSurface(scene.clone()),
            scene: scene.clone(),
        })
    }
}

impl TransitionContext for SheetContext {
    fn container_bounds(&self) -> Rect {
        CONTAINER
    }

    fn surface(&self, key: SurfaceKey) -> Option<&dyn Surface> {
        (key == self.key).then_some(&self.sheet as &dyn Surface)
    }

    fn surface_mut(&mut self, key: SurfaceKey) -> Option<&mut dyn Surface> {
        if key == self.key {
            Some(&mut self.sheet as &mut dyn Surface)
        } else {
            None
        }
    }

    fn initial_frame(&self, key: SurfaceKey) -> Option<Rect> {
        (key == SurfaceKey::From && self.key == key).then_some(PRESENTED)
    }

    fn final_frame(&self, key: SurfaceKey) -> Option<Rect> {
        (key == SurfaceKey::To && self.key == key).then_some(PRESENTED)
    }

    fn update_interactive_transition(&mut self, progress: f32) {
        self.scene.borrow_mut().progress.push(progress);
    }

    fn finish_interactive_transition(&mut self) {}

    fn cancel_interactive_transition(&mut self) {}

    fn complete_transition(&mut self, completed: bool) {
        self.scene.borrow_mut().completions.push(completed);
    }
}

struct SheetHost(Rc<RefCell<Scene>>);

impl TransitionHost for SheetHost {
    fn request_dismissal(&mut self) -> Option<Box<dyn TransitionContext>> {
        self.0.borrow_mut().dismissal_requests += 1;
        Some(SheetContext::dismissing(&self.0))
    }

    fn set_interruption_capture(&mut self, installed: bool) {
        self.0.borrow_mut().capture_installed = installed;
    }
}

fn presented_sheet(scene: &Rc<RefCell<Scene>>) -> InteractionController {
    let mut controller = InteractionController::new();
    controller.set_host(SheetHost(scene.clone()));
    controller.set_interaction_phase(InteractionPhase::Presenting);
    controller.start_interactive_transition(SheetContext::presenting(scene));
    assert_eq!(
        settle(&mut controller),
        Some(TransitionOutcome::Finished(InteractionPhase::Presenting))
    );
    controller
}

fn settle(controller: &mut InteractionController) -> Option<TransitionOutcome> {
    for _ in 0..600 {
        if let Some(outcome) = controller.tick(1.0 / 60.0) {
            return Some(outcome);
        }
    }
    None
}

#[test]
fn present_then_drag_to_dismiss() {
    init_logger();
    let scene = Scene::new();
    let mut controller = presented_sheet(&scene);
    assert_eq!(scene.borrow().sheet, PRESENTED);
    assert!(scene.borrow().touch_enabled);

    let mut drag = DragTracker::new();
    controller.handle_gesture(drag.begin(0));
    for step in 1..=10 {
        controller.handle_gesture(drag.update(step as f32 * 30.0, step * 16));
    }
    assert_eq!(scene.borrow().dismissal_requests, 1);
    assert!(!scene.borrow().touch_enabled);
    assert_eq!(scene.borrow().progress.len(), 10);
    let dragged_to = scene.borrow().sheet.y;
    assert!((dragged_to - (PRESENTED.y + 300.0)).abs() < 1e-2, "got {}", dragged_to);

    // 300 of 844 is short of half way, but the release is a quick flick down
    let release = drag.end(320.0, 168);
    assert!(release.velocity.y > 300.0, "got {}", release.velocity.y);
    controller.handle_gesture(release);
    assert_eq!(controller.state(), InteractionState::Finishing);
    assert!(scene.borrow().capture_installed);

    assert_eq!(
        settle(&mut controller),
        Some(TransitionOutcome::Finished(InteractionPhase::Dismissing))
    );
    let scene = scene.borrow();
    assert_eq!(scene.sheet.y, CONTAINER.max_y());
    assert!(scene.touch_enabled);
    assert!(!scene.capture_installed);
    assert_eq!(scene.completions, vec![true, true]);
    assert_eq!(controller.interaction_phase(), InteractionPhase::None);
}

#[test]
fn regrab_mid_spring_and_put_back() {
    init_logger();
    let scene = Scene::new();
    let mut controller = presented_sheet(&scene);

    controller.handle_gesture(GestureSample::begin());
    controller.handle_gesture(GestureSample::change(600.0, 1500.0));
    controller.handle_gesture(GestureSample::end(600.0, 1500.0));
    for _ in 0..4 {
        controller.tick(1.0 / 60.0);
    }

    let grabbed_at = scene.borrow().sheet.y;
    controller.handle_capture_gesture(GestureSample::begin());
    assert_eq!(controller.state(), InteractionState::Active);
    assert_eq!(scene.borrow().sheet.y, grabbed_at);

    // Dragging up by 200 moves the sheet by exactly that from where it was caught
    controller.handle_capture_gesture(GestureSample::change(-200.0, -900.0));
    let moved_to = scene.borrow().sheet.y;
    assert!((moved_to - (grabbed_at - 200.0)).abs() < 1e-2, "got {}", moved_to);

    controller.handle_capture_gesture(GestureSample::end(-200.0, -900.0));
    assert_eq!(controller.state(), InteractionState::Cancelling);
    assert_eq!(
        settle(&mut controller),
        Some(TransitionOutcome::Cancelled(InteractionPhase::Dismissing))
    );

    assert_eq!(scene.borrow().sheet, PRESENTED);
    assert_eq!(controller.interaction_phase(), InteractionPhase::Presenting);
    assert!(scene.borrow().touch_enabled);
    // One disable and one enable per session, two sessions
    assert_eq!(scene.borrow().touch_toggles, 4);
}

#[test]
fn next_session_can_start_from_outcome() {
    let scene = Scene::new();
    let mut controller = presented_sheet(&scene);

    controller.handle_gesture(GestureSample::begin());
    controller.handle_gesture(GestureSample::change(700.0, 0.0));
    controller.handle_gesture(GestureSample::end(700.0, 0.0));
    let outcome = settle(&mut controller);
    assert_eq!(
        outcome,
        Some(TransitionOutcome::Finished(InteractionPhase::Dismissing))
    );

    // The dismissal is fully resolved, so presenting again starts cleanly
    assert!(!controller.is_interaction_in_progress());
    controller.set_interaction_phase(InteractionPhase::Presenting);
    controller.start_interactive_transition(SheetContext::presenting(&scene));
    assert_eq!(controller.state(), InteractionState::Finishing);
    assert_eq!(
        settle(&mut controller),
        Some(TransitionOutcome::Finished(InteractionPhase::Presenting))
    );
    assert_eq!(scene.borrow().sheet, PRESENTED);
}

/// Driver running on the host's own clock; the host reports completion
#[derive(Default)]
struct HostAnimator {
    started: Vec<SpringAnimation>,
    stopped: Vec<AnimationHandle>,
}

impl AnimationDriver for HostAnimator {
    fn start(&mut self, animation: SpringAnimation) -> AnimationHandle {
        self.started.push(animation);
        AnimationHandle::new(self.started.len() as u64)
    }

    fn stop(&mut self, handle: AnimationHandle) -> Option<Rect> {
        self.stopped.push(handle);
        let animation = self.started.get(handle.id() as usize - 1)?;
        Some(animation.frame_at(0.5))
    }
}

#[test]
fn host_clocked_driver_reports_completion() {
    let scene = Scene::new();
    let mut controller =
        InteractionController::with_driver(InteractionConfig::default(), HostAnimator::default());
    controller.set_interaction_phase(InteractionPhase::Presenting);
    controller.start_interactive_transition(SheetContext::presenting(&scene));

    let animation = controller.driver().started[0].clone();
    assert_eq!(animation.to, PRESENTED);
    assert_eq!(animation.from, PRESENTED.with_y(CONTAINER.max_y()));
    assert_eq!(animation.initial_velocity, 0.0);
    assert_eq!(animation.spring, InteractionConfig::default().spring());

    // Nothing happens on tick; the host owns the clock
    assert_eq!(controller.tick(1.0 / 60.0), None);

    let handle = controller.active_animation().unwrap();
    assert_eq!(
        controller.on_animation_completed(handle),
        Some(TransitionOutcome::Finished(InteractionPhase::Presenting))
    );
    assert_eq!(scene.borrow().sheet, PRESENTED);
    assert_eq!(controller.on_animation_completed(handle), None);
}

#[test]
fn release_velocity_is_projected_onto_remaining_travel() {
    let scene = Scene::new();
    let mut controller =
        InteractionController::with_driver(InteractionConfig::default(), HostAnimator::default());
    controller.set_host(SheetHost(scene.clone()));
    controller.set_interaction_phase(InteractionPhase::Presenting);
    controller.start_interactive_transition(SheetContext::presenting(&scene));
    let presented = controller.active_animation().unwrap();
    controller.on_animation_completed(presented);

    controller.handle_gesture(GestureSample::begin());
    controller.handle_gesture(GestureSample::change(422.0, 0.0));
    controller.handle_gesture(GestureSample::end(422.0, 844.0));

    let finish = controller.driver().started.last().unwrap().clone();
    assert_eq!(finish.from.y, PRESENTED.y + 422.0);
    assert_eq!(finish.to.y, CONTAINER.max_y());
    // 844 per second over 378 remaining
    assert!((finish.initial_velocity - 844.0 / 378.0).abs() < 1e-4);
}

#[test]
fn scrolled_content_blocks_dismissal() {
    let scene = Scene::new();
    let mut controller = presented_sheet(&scene);
    controller.attach_one_way_gesture(Directions::DOWN, || true);
    let content_offset = Rc::new(RefCell::new(120.0_f32));
    let offset = content_offset.clone();
    controller.set_scroll_observer(move || *offset.borrow());

    controller.handle_gesture(GestureSample::begin());
    controller.handle_gesture(GestureSample::change(80.0, 400.0));
    controller.handle_gesture(GestureSample::end(80.0, 400.0));
    assert_eq!(scene.borrow().dismissal_requests, 0);
    assert_eq!(scene.borrow().sheet, PRESENTED);

    *content_offset.borrow_mut() = 0.0;
    controller.handle_gesture(GestureSample::begin());
    controller.handle_gesture(GestureSample::change(80.0, 400.0));
    assert_eq!(scene.borrow().dismissal_requests, 1);
    let dragged_to = scene.borrow().sheet.y;
    assert!((dragged_to - (PRESENTED.y + 80.0)).abs() < 1e-2, "got {}", dragged_to);
}
