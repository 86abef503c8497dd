//! Recording collaborators for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::{Surface, SurfaceKey, TransitionContext, TransitionHost};
use crate::geometry::Rect;

const SURFACE_WIDTH: f32 = 400.0;
const SURFACE_HEIGHT: f32 = 700.0;

/// Everything a mock context was told, shared with the test after the
/// context moves into the controller
#[derive(Debug, Default)]
pub(crate) struct ContextLog {
    pub frames: HashMap<SurfaceKey, Rect>,
    pub interactive: Vec<(SurfaceKey, bool)>,
    pub updates: Vec<f32>,
    pub finished: usize,
    pub cancelled: usize,
    pub completed: Vec<bool>,
}

impl ContextLog {
    pub fn frame(&self, key: SurfaceKey) -> Rect {
        self.frames[&key]
    }

    pub fn touch_changes(&self, key: SurfaceKey, interactive: bool) -> usize {
        self.interactive
            .iter()
            .filter(|&&entry| entry == (key, interactive))
            .count()
    }

    pub fn last_update(&self) -> Option<f32> {
        self.updates.last().copied()
    }
}

pub(crate) struct MockSurface {
    key: SurfaceKey,
    log: Rc<RefCell<ContextLog>>,
}

impl Surface for MockSurface {
    fn frame(&self) -> Rect {
        self.log.borrow().frame(self.key)
    }

    fn set_frame(&mut self, frame: Rect) {
        self.log.borrow_mut().frames.insert(self.key, frame);
    }

    fn set_descendants_interactive(&mut self, interactive: bool) {
        self.log
            .borrow_mut()
            .interactive
            .push((self.key, interactive));
    }
}

pub(crate) struct MockContext {
    container: Rect,
    surfaces: HashMap<SurfaceKey, MockSurface>,
    initial_frames: HashMap<SurfaceKey, Rect>,
    final_frames: HashMap<SurfaceKey, Rect>,
    pub log: Rc<RefCell<ContextLog>>,
}

impl MockContext {
    pub fn empty(height: f32) -> Self {
        Self {
            container: Rect::new(0.0, 0.0, SURFACE_WIDTH, height),
            surfaces: HashMap::new(),
            initial_frames: HashMap::new(),
            final_frames: HashMap::new(),
            log: Rc::new(RefCell::new(ContextLog::default())),
        }
    }

    /// Presentation of a surface that rests at `final_y`
    pub fn presenting(height: f32, final_y: f32) -> Self {
        let frame = Rect::new(0.0, final_y, SURFACE_WIDTH, SURFACE_HEIGHT);
        let mut context = Self::empty(height);
        context.add_surface(SurfaceKey::To, frame);
        context.final_frames.insert(SurfaceKey::To, frame);
        context
    }

    /// Dismissal of a surface currently shown at `y`
    pub fn dismissing(height: f32, y: f32) -> Self {
        let frame = Rect::new(0.0, y, SURFACE_WIDTH, SURFACE_HEIGHT);
        let mut context = Self::empty(height);
        context.add_surface(SurfaceKey::From, frame);
        context.initial_frames.insert(SurfaceKey::From, frame);
        context
    }

    pub fn add_surface(&mut self, key: SurfaceKey, frame: Rect) {
        self.log.borrow_mut().frames.insert(key, frame);
        self.surfaces.insert(
            key,
            MockSurface {
                key,
                log: self.log.clone(),
            },
        );
    }

    pub fn remove_final_frame(&mut self, key: SurfaceKey) {
        self.final_frames.remove(&key);
    }

    pub fn set_surface_y(&mut self, key: SurfaceKey, y: f32) {
        let mut log = self.log.borrow_mut();
        if let Some(frame) = log.frames.get_mut(&key) {
            frame.y = y;
        }
    }

    pub fn log(&self) -> Rc<RefCell<ContextLog>> {
        self.log.clone()
    }
}

impl TransitionContext for MockContext {
    fn container_bounds(&self) -> Rect {
        self.container
    }

    fn surface(&self, key: SurfaceKey) -> Option<&dyn Surface> {
        self.surfaces.get(&key).map(|s| s as &dyn Surface)
    }

    fn surface_mut(&mut self, key: SurfaceKey) -> Option<&mut dyn Surface> {
        self.surfaces.get_mut(&key).map(|s| s as &mut dyn Surface)
    }

    fn initial_frame(&self, key: SurfaceKey) -> Option<Rect> {
        self.initial_frames.get(&key).copied()
    }

    fn final_frame(&self, key: SurfaceKey) -> Option<Rect> {
        self.final_frames.get(&key).copied()
    }

    fn update_interactive_transition(&mut self, progress: f32) {
        self.log.borrow_mut().updates.push(progress);
    }

    fn finish_interactive_transition(&mut self) {
        self.log.borrow_mut().finished += 1;
    }

    fn cancel_interactive_transition(&mut self) {
        self.log.borrow_mut().cancelled += 1;
    }

    fn complete_transition(&mut self, completed: bool) {
        self.log.borrow_mut().completed.push(completed);
    }
}

#[derive(Default)]
pub(crate) struct HostLog {
    pub dismissal_requests: usize,
    pub capture: Vec<bool>,
    pub dismissals: VecDeque<MockContext>,
}

impl HostLog {
    pub fn capture_installed(&self) -> bool {
        self.capture.last().copied().unwrap_or(false)
    }
}

pub(crate) struct MockHost {
    pub log: Rc<RefCell<HostLog>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(HostLog::default())),
        }
    }

    /// Hand out `context` on the next dismissal request
    pub fn queue_dismissal(&self, context: MockContext) {
        self.log.borrow_mut().dismissals.push_back(context);
    }
}

impl TransitionHost for MockHost {
    fn request_dismissal(&mut self) -> Option<Box<dyn TransitionContext>> {
        let mut log = self.log.borrow_mut();
        log.dismissal_requests += 1;
        log.dismissals
            .pop_front()
            .map(|context| Box::new(context) as Box<dyn TransitionContext>)
    }

    fn set_interruption_capture(&mut self, installed: bool) {
        self.log.borrow_mut().capture.push(installed);
    }
}
