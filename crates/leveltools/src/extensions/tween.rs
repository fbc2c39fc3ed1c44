// extensions/tween.rs
//
// Tween system: animates named numeric fields of a shared target over time.
// Completely decoupled from rendering: targets only need `Animatable`.
//
// Usage:
//   let scheduler = TweenScheduler::new();
//   let sprite = Rc::new(RefCell::new(sprite));
//   scheduler.tween(&sprite, 300.0)
//       .to([("x", 120.0), ("alpha", 0.0)])
//       .easing(Easing::QuadraticOut)
//       .on_complete(|s| s.borrow_mut().set_property("visible", 0.0))
//       .start();
//   scheduler.advance_all(frame_time_ms);  // every animation frame

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::animatable::Animatable;
use super::color::{channel_delta, lerp_color};
use super::easing::Easing;
use super::scheduler::{Advance, Registry, TweenScheduler};

/// Duration used when none is given, in milliseconds.
pub const DEFAULT_TOTAL_TIME: f64 = 200.0;

/// What happens when a tween reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop, fire `on_complete`, start the chained tween.
    #[default]
    Once,
    /// Jump back to the start values and play again.
    Loop,
    /// Swap start and end and play back (yoyo).
    PingPong,
}

/// Where a property's literal value sits.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Origin {
    /// Animate from the current field value to this one.
    To(f64),
    /// Animate from this value to the current field value.
    From(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Delta {
    Scalar(f64),
    /// Per-channel increments for 0xRRGGBB values.
    Channels([f64; 3]),
}

#[derive(Debug, Clone)]
struct Property {
    key: String,
    eased: bool,
    origin: Origin,
    color: bool,
    start: f64,
    end: f64,
    delta: Delta,
}

impl Property {
    fn new(key: String, origin: Origin, eased: bool, color: bool) -> Self {
        Self {
            key,
            eased,
            origin,
            color,
            start: 0.0,
            end: 0.0,
            delta: Delta::Scalar(0.0),
        }
    }

    /// Fix start/end against the field's value at start time.
    fn resolve(&mut self, current: f64) {
        match self.origin {
            Origin::To(to) => {
                self.start = current;
                self.end = to;
            }
            Origin::From(from) => {
                self.start = from;
                self.end = current;
            }
        }
        self.recompute_delta();
    }

    fn recompute_delta(&mut self) {
        self.delta = if self.color {
            Delta::Channels(channel_delta(self.start, self.end))
        } else {
            Delta::Scalar(self.end - self.start)
        };
    }

    fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.recompute_delta();
    }

    fn value_at(&self, percent: f64) -> f64 {
        match self.delta {
            Delta::Scalar(inc) => self.start + inc * percent,
            Delta::Channels(inc) => lerp_color(self.start, inc, percent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Timing {
    /// Next tick fixes start/end times.
    Unresolved,
    Running { start: f64, end: f64 },
    Finished,
}

struct TweenState {
    total_time: f64,
    properties: Vec<Property>,
    wait_time: Option<f64>,
    /// Set until `on_wait_complete` has fired for the current run.
    wait_pending: bool,
    loop_mode: TweenLoop,
    repeat: f64,
    easing: Option<Easing>,
    timing: Timing,
    /// Registration id while active.
    slot: Option<u64>,
    next: Option<Rc<dyn Advance>>,
}

type Callback<T> = Box<dyn FnMut(&Rc<RefCell<T>>)>;

#[derive(Clone, Copy)]
enum Hook {
    Update,
    Complete,
    WaitComplete,
}

struct Callbacks<T> {
    update: Option<Callback<T>>,
    complete: Option<Callback<T>>,
    wait_complete: Option<Callback<T>>,
}

impl<T> Callbacks<T> {
    fn slot(&mut self, hook: Hook) -> &mut Option<Callback<T>> {
        match hook {
            Hook::Update => &mut self.update,
            Hook::Complete => &mut self.complete,
            Hook::WaitComplete => &mut self.wait_complete,
        }
    }
}

struct TweenCell<T: Animatable + 'static> {
    target: Rc<RefCell<T>>,
    scheduler: Weak<RefCell<Registry>>,
    state: RefCell<TweenState>,
    callbacks: RefCell<Callbacks<T>>,
}

/// A single tween. Cheap to clone; clones control the same animation.
///
/// Configuration methods consume and return the handle so they chain; `start`
/// goes last. Nothing moves until the tween is started and its scheduler is
/// advanced.
pub struct Tween<T: Animatable + 'static> {
    cell: Rc<TweenCell<T>>,
}

impl<T: Animatable + 'static> Clone for Tween<T> {
    fn clone(&self) -> Self {
        Self { cell: Rc::clone(&self.cell) }
    }
}

impl<T: Animatable + 'static> Tween<T> {
    /// Create an inert tween over `target` lasting `total_time` ms.
    pub fn new(scheduler: &TweenScheduler, target: &Rc<RefCell<T>>, total_time: f64) -> Self {
        Self::attached(scheduler.downgrade(), target, total_time)
    }

    fn attached(scheduler: Weak<RefCell<Registry>>, target: &Rc<RefCell<T>>, total_time: f64) -> Self {
        Self {
            cell: Rc::new(TweenCell {
                target: Rc::clone(target),
                scheduler,
                state: RefCell::new(TweenState {
                    total_time,
                    properties: Vec::new(),
                    wait_time: None,
                    wait_pending: false,
                    loop_mode: TweenLoop::Once,
                    repeat: 0.0,
                    easing: None,
                    timing: Timing::Unresolved,
                    slot: None,
                    next: None,
                }),
                callbacks: RefCell::new(Callbacks {
                    update: None,
                    complete: None,
                    wait_complete: None,
                }),
            }),
        }
    }

    // -- Properties --

    /// Animate each key from its current value to the given one (eased).
    pub fn to<K: Into<String>>(self, props: impl IntoIterator<Item = (K, f64)>) -> Self {
        self.push(props, Origin::To, true, false)
    }

    /// Like `to`; with `eased = false` these keys ignore the easing curve.
    pub fn to_with<K: Into<String>>(self, props: impl IntoIterator<Item = (K, f64)>, eased: bool) -> Self {
        self.push(props, Origin::To, eased, false)
    }

    /// Animate each key from the given value to its current value (eased).
    pub fn from<K: Into<String>>(self, props: impl IntoIterator<Item = (K, f64)>) -> Self {
        self.push(props, Origin::From, true, false)
    }

    pub fn from_with<K: Into<String>>(self, props: impl IntoIterator<Item = (K, f64)>, eased: bool) -> Self {
        self.push(props, Origin::From, eased, false)
    }

    /// `to` for 0xRRGGBB fields, interpolated per channel.
    pub fn color_to<K: Into<String>>(self, props: impl IntoIterator<Item = (K, f64)>) -> Self {
        self.push(props, Origin::To, true, true)
    }

    pub fn color_to_with<K: Into<String>>(self, props: impl IntoIterator<Item = (K, f64)>, eased: bool) -> Self {
        self.push(props, Origin::To, eased, true)
    }

    /// `from` for 0xRRGGBB fields, interpolated per channel.
    pub fn color_from<K: Into<String>>(self, props: impl IntoIterator<Item = (K, f64)>) -> Self {
        self.push(props, Origin::From, true, true)
    }

    pub fn color_from_with<K: Into<String>>(self, props: impl IntoIterator<Item = (K, f64)>, eased: bool) -> Self {
        self.push(props, Origin::From, eased, true)
    }

    fn push<K: Into<String>>(
        self,
        props: impl IntoIterator<Item = (K, f64)>,
        origin: fn(f64) -> Origin,
        eased: bool,
        color: bool,
    ) -> Self {
        {
            let mut state = self.cell.state.borrow_mut();
            for (key, value) in props {
                state.properties.push(Property::new(key.into(), origin(value), eased, color));
            }
        }
        self
    }

    // -- Timing and replay --

    /// Delay the first advancement by `ms` after start.
    pub fn wait(self, ms: f64) -> Self {
        {
            let mut state = self.cell.state.borrow_mut();
            state.wait_time = Some(ms);
            state.wait_pending = true;
        }
        self
    }

    /// Play back and forth. Each reversal costs 0.5 of `repeat`.
    pub fn yoyo(self, enabled: bool, repeat: f64) -> Self {
        self.replay(TweenLoop::PingPong, enabled, repeat)
    }

    /// Restart from the start values. Each restart costs 1 of `repeat`.
    pub fn looping(self, enabled: bool, repeat: f64) -> Self {
        self.replay(TweenLoop::Loop, enabled, repeat)
    }

    fn replay(self, mode: TweenLoop, enabled: bool, repeat: f64) -> Self {
        {
            let mut state = self.cell.state.borrow_mut();
            if enabled {
                state.loop_mode = mode;
                state.repeat = repeat;
            } else if state.loop_mode == mode {
                state.loop_mode = TweenLoop::Once;
            }
        }
        self
    }

    /// Curve applied to eased properties. Linear when never set.
    pub fn easing(self, easing: Easing) -> Self {
        self.cell.state.borrow_mut().easing = Some(easing);
        self
    }

    /// Change the duration of one playthrough.
    pub fn over(self, ms: f64) -> Self {
        self.cell.state.borrow_mut().total_time = ms;
        self
    }

    // -- Callbacks --

    // Callbacks get the shared target and run with nothing borrowed, so they
    // may start other tweens on it. A callback that needs this tween should
    // capture `downgrade()`: a strong handle inside its own callback is a
    // reference cycle and the tween is never freed.

    /// Called after every frame that moved the properties.
    pub fn on_update(self, callback: impl FnMut(&Rc<RefCell<T>>) + 'static) -> Self {
        self.cell.callbacks.borrow_mut().update = Some(Box::new(callback));
        self
    }

    /// Called once when the tween finishes normally (not on `stop`).
    pub fn on_complete(self, callback: impl FnMut(&Rc<RefCell<T>>) + 'static) -> Self {
        self.cell.callbacks.borrow_mut().complete = Some(Box::new(callback));
        self
    }

    /// Called once when the `wait` delay has elapsed.
    pub fn on_wait_complete(self, callback: impl FnMut(&Rc<RefCell<T>>) + 'static) -> Self {
        self.cell.callbacks.borrow_mut().wait_complete = Some(Box::new(callback));
        self
    }

    // -- Chaining --

    /// Create the tween that starts when this one completes, and return it
    /// for configuration.
    pub fn chain<U: Animatable + 'static>(&self, target: &Rc<RefCell<U>>, total_time: f64) -> Tween<U> {
        let next = Tween::attached(self.cell.scheduler.clone(), target, total_time);
        self.chain_tween(&next)
    }

    /// Start `next` when this tween completes.
    pub fn chain_tween<U: Animatable + 'static>(&self, next: &Tween<U>) -> Tween<U> {
        let successor: Rc<dyn Advance> = next.cell.clone();
        self.cell.state.borrow_mut().next = Some(successor);
        next.clone()
    }

    // -- Lifecycle --

    /// Resolve start/end values, write the start values onto the target and
    /// register with the scheduler. Starting again re-resolves.
    pub fn start(&self) -> Self {
        Rc::clone(&self.cell).start();
        self.clone()
    }

    /// Deregister without firing any callback.
    pub fn stop(&self) -> Self {
        self.cell.stop();
        self.clone()
    }

    /// Forget resolved timing so the next tick starts the clock again.
    pub fn reset(&self) -> Self {
        self.cell.reset();
        self.clone()
    }

    /// Whether the tween is registered with its scheduler.
    pub fn is_running(&self) -> bool {
        let slot = self.cell.state.borrow().slot;
        match (slot, self.cell.scheduler.upgrade()) {
            (Some(id), Some(registry)) => registry.borrow().contains(id),
            _ => false,
        }
    }

    pub fn total_time(&self) -> f64 {
        self.cell.state.borrow().total_time
    }

    pub fn loop_mode(&self) -> TweenLoop {
        self.cell.state.borrow().loop_mode
    }

    pub fn target(&self) -> Rc<RefCell<T>> {
        Rc::clone(&self.cell.target)
    }

    /// Handle that does not keep the tween alive. Capture this, not a clone,
    /// in the tween's own callbacks.
    pub fn downgrade(&self) -> WeakTween<T> {
        WeakTween { cell: Rc::downgrade(&self.cell) }
    }
}

/// Non-owning tween handle; see [`Tween::downgrade`].
pub struct WeakTween<T: Animatable + 'static> {
    cell: Weak<TweenCell<T>>,
}

impl<T: Animatable + 'static> Clone for WeakTween<T> {
    fn clone(&self) -> Self {
        Self { cell: Weak::clone(&self.cell) }
    }
}

impl<T: Animatable + 'static> WeakTween<T> {
    /// The tween, if any strong handle or its scheduler still holds it.
    pub fn upgrade(&self) -> Option<Tween<T>> {
        self.cell.upgrade().map(|cell| Tween { cell })
    }
}

impl<T: Animatable + 'static> TweenCell<T> {
    fn scheduler(&self) -> Option<TweenScheduler> {
        self.scheduler.upgrade().map(TweenScheduler::from_registry)
    }

    fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.timing = Timing::Unresolved;
        state.wait_pending = state.wait_time.is_some();
    }

    fn start(self: Rc<Self>) {
        let Some(scheduler) = self.scheduler() else {
            log::warn!("tween started after its scheduler was dropped; ignoring");
            return;
        };

        self.reset();
        {
            let mut state = self.state.borrow_mut();
            let mut target = self.target.borrow_mut();
            for property in state.properties.iter_mut() {
                let current = target
                    .property(&property.key)
                    .filter(|v| !v.is_nan())
                    .unwrap_or(0.0);
                property.resolve(current);
                target.set_property(&property.key, property.start);
            }
        }

        let slot = self.state.borrow().slot;
        let this: Rc<dyn Advance> = self.clone();
        let id = scheduler.register(this, slot);
        self.state.borrow_mut().slot = Some(id);
    }

    fn stop(&self) {
        let slot = self.state.borrow_mut().slot.take();
        if let (Some(id), Some(scheduler)) = (slot, self.scheduler()) {
            scheduler.deregister(id);
        }
    }

    fn is_registered(&self) -> bool {
        self.state.borrow().slot.is_some()
    }

    /// Run a callback with the tween state released, so it may reconfigure,
    /// stop or restart any tween (this one included).
    fn fire(&self, hook: Hook) {
        let taken = self.callbacks.borrow_mut().slot(hook).take();
        if let Some(mut callback) = taken {
            callback(&self.target);
            let mut callbacks = self.callbacks.borrow_mut();
            let slot = callbacks.slot(hook);
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    fn first_tick(&self, now: f64) {
        let mut state = self.state.borrow_mut();
        let start = match state.wait_time {
            Some(wait) if state.wait_pending => now + wait,
            _ => now,
        };
        state.timing = Timing::Running { start, end: start + state.total_time };
    }

    fn tail_tick(&self, now: f64, start: f64, end: f64) {
        let wait_done = {
            let mut state = self.state.borrow_mut();
            let done = state.wait_pending && now > start;
            if done {
                state.wait_pending = false;
            }
            done
        };
        if wait_done {
            self.fire(Hook::WaitComplete);
            if !self.is_registered() {
                return;
            }
        }

        if now > end {
            self.complete(now);
        } else if now > start {
            self.interpolate(now, start);
            self.fire(Hook::Update);
        }
    }

    fn interpolate(&self, now: f64, start: f64) {
        let state = self.state.borrow();
        let raw = if state.total_time > 0.0 {
            (now - start) / state.total_time
        } else {
            1.0
        };
        let eased = state.easing.map_or(raw, |easing| easing.apply(raw));

        let mut target = self.target.borrow_mut();
        for property in &state.properties {
            let percent = if property.eased { eased } else { raw };
            target.set_property(&property.key, property.value_at(percent));
        }
    }

    fn complete(&self, now: f64) {
        let finished = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let mut target = self.target.borrow_mut();
            for property in &state.properties {
                target.set_property(&property.key, property.end);
            }

            match state.loop_mode {
                TweenLoop::Loop if state.repeat > 0.0 => {
                    state.repeat -= 1.0;
                    for property in &state.properties {
                        target.set_property(&property.key, property.start);
                    }
                    state.timing = Timing::Unresolved;
                    state.wait_pending = state.wait_time.is_some();
                    None
                }
                TweenLoop::PingPong if state.repeat > 0.0 => {
                    state.repeat -= 0.5;
                    for property in state.properties.iter_mut() {
                        property.reverse();
                    }
                    state.timing = Timing::Running { start: now, end: now + state.total_time };
                    None
                }
                _ => {
                    state.timing = Timing::Finished;
                    Some((state.slot.take(), state.next.clone()))
                }
            }
        };

        let Some((slot, next)) = finished else { return };
        if let (Some(id), Some(scheduler)) = (slot, self.scheduler()) {
            scheduler.deregister(id);
        }
        log::debug!("tween finished at {:.1}ms", now);

        self.fire(Hook::Complete);
        if let Some(next) = next {
            log::trace!("starting chained tween");
            next.launch(now);
        }
    }
}

impl<T: Animatable + 'static> Advance for TweenCell<T> {
    fn advance(&self, now: f64) {
        let timing = self.state.borrow().timing;
        match timing {
            Timing::Unresolved => self.first_tick(now),
            Timing::Running { start, end } => self.tail_tick(now, start, end),
            Timing::Finished => {}
        }
    }

    fn launch(self: Rc<Self>, now: f64) {
        Rc::clone(&self).start();
        self.advance(now);
    }
}
