// extensions/scheduler.rs
//
// Registry of active tweens, advanced once per animation frame.
//
// The host owns the frame loop: it tells the scheduler how to ask for a
// frame, then feeds frame timestamps (ms) into `advance_all`.
//
// Usage:
//   let scheduler = TweenScheduler::new();
//   scheduler.set_frame_request(|| request_animation_frame());
//   scheduler.tween(&marker, 300.0).to([("x", 40.0)]).start();
//   scheduler.advance_all(now);  // from the frame callback

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::api::config::EditorConfig;
use super::animatable::Animatable;
use super::tween::Tween;

/// One schedulable unit. Implemented by the shared cell behind each `Tween<T>`
/// so tweens over different target types share one registry.
pub(crate) trait Advance {
    /// Run one frame of this tween at timestamp `now`.
    fn advance(&self, now: f64);

    /// Reset, start and advance once. Used to hand off a chain.
    fn launch(self: Rc<Self>, now: f64);
}

struct Entry {
    id: u64,
    tween: Rc<dyn Advance>,
}

pub(crate) struct Registry {
    /// Sorted by `id`: registration order.
    active: Vec<Entry>,
    next_id: u64,
    frame_pending: bool,
    frame_request: Option<Box<dyn FnMut()>>,
    default_total_time: f64,
}

impl Registry {
    fn position(&self, id: u64) -> Result<usize, usize> {
        self.active.binary_search_by_key(&id, |e| e.id)
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.position(id).is_ok()
    }

    pub(crate) fn insert(&mut self, tween: Rc<dyn Advance>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.active.push(Entry { id, tween });
        log::trace!("tween {} registered ({} active)", id, self.active.len());
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        match self.position(id) {
            Ok(idx) => {
                self.active.remove(idx);
                log::trace!("tween {} removed ({} active)", id, self.active.len());
                true
            }
            Err(_) => false,
        }
    }

    /// First entry registered after `cursor`.
    fn next_after(&self, cursor: u64) -> Option<(u64, Rc<dyn Advance>)> {
        let idx = self.active.partition_point(|e| e.id <= cursor);
        self.active.get(idx).map(|e| (e.id, Rc::clone(&e.tween)))
    }
}

/// Handle to a tween registry. Cloning shares the same registry.
///
/// Exactly one frame request is outstanding at a time, and only while at least
/// one tween is registered.
#[derive(Clone)]
pub struct TweenScheduler {
    registry: Rc<RefCell<Registry>>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                active: Vec::new(),
                next_id: 0,
                frame_pending: false,
                frame_request: None,
                default_total_time: config.default_tween_ms,
            })),
        }
    }

    /// Install the hook that asks the host for the next animation frame.
    /// Without one, hosts poll `frame_requested()` instead.
    pub fn set_frame_request(&self, request: impl FnMut() + 'static) {
        self.registry.borrow_mut().frame_request = Some(Box::new(request));
        self.request_frame();
    }

    /// Create an inert tween over `target` lasting `total_time` ms.
    pub fn tween<T: Animatable + 'static>(&self, target: &Rc<RefCell<T>>, total_time: f64) -> Tween<T> {
        Tween::new(self, target, total_time)
    }

    /// Create a tween with the configured default duration.
    pub fn tween_default<T: Animatable + 'static>(&self, target: &Rc<RefCell<T>>) -> Tween<T> {
        let total_time = self.registry.borrow().default_total_time;
        Tween::new(self, target, total_time)
    }

    /// Advance every registered tween once, in registration order.
    ///
    /// Tweens started during the pass are advanced in the same pass; tweens
    /// stopped during the pass are skipped.
    pub fn advance_all(&self, now: f64) {
        self.registry.borrow_mut().frame_pending = false;

        let mut cursor = 0;
        loop {
            let next = self.registry.borrow().next_after(cursor);
            let Some((id, tween)) = next else { break };
            cursor = id;
            tween.advance(now);
        }

        self.request_frame();
    }

    /// Whether a frame has been requested and not yet delivered.
    pub fn frame_requested(&self) -> bool {
        self.registry.borrow().frame_pending
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.registry.borrow().active.len()
    }

    /// Whether there are no active tweens.
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().active.is_empty()
    }

    /// Drop every active tween without firing callbacks.
    pub fn clear(&self) {
        let dropped = std::mem::take(&mut self.registry.borrow_mut().active);
        log::debug!("cleared {} active tweens", dropped.len());
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<Registry>> {
        Rc::downgrade(&self.registry)
    }

    pub(crate) fn from_registry(registry: Rc<RefCell<Registry>>) -> Self {
        Self { registry }
    }

    /// Register `tween` unless `slot` still names a live registration.
    /// Returns the registration id.
    pub(crate) fn register(&self, tween: Rc<dyn Advance>, slot: Option<u64>) -> u64 {
        let id = {
            let mut registry = self.registry.borrow_mut();
            match slot {
                Some(id) if registry.contains(id) => id,
                _ => registry.insert(tween),
            }
        };
        self.request_frame();
        id
    }

    pub(crate) fn deregister(&self, id: u64) -> bool {
        self.registry.borrow_mut().remove(id)
    }

    /// Ask the host for a frame if tweens are waiting and none is outstanding.
    fn request_frame(&self) {
        let hook = {
            let mut registry = self.registry.borrow_mut();
            if registry.frame_pending || registry.active.is_empty() {
                return;
            }
            registry.frame_pending = true;
            registry.frame_request.take()
        };

        // The hook runs with the registry released so it may call back in.
        if let Some(mut hook) = hook {
            hook();
            let mut registry = self.registry.borrow_mut();
            if registry.frame_request.is_none() {
                registry.frame_request = Some(hook);
            }
        }
    }
}

impl Default for TweenScheduler {
    fn default() -> Self {
        Self::new()
    }
}
