use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Date, Function};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use leveltools::{Debounce, Throttle};

// The gates only decide. The JS function is called after their borrow is
// released, so it may call back into the same gate.
fn decide() {}
fn decide_with(_: ()) {}

struct PendingCall {
    gate: Debounce<fn()>,
    timer: Option<i32>,
}

/// Page-level debounce: each `invoke()` cancels the pending call and
/// schedules a new one `ms` later with `setTimeout`.
///
/// Usage (JS):
///   const save = new Debounce(500, () => persistLayout());
///   save.invoke();      // later
///   save.invoke(true);  // now
#[wasm_bindgen(js_name = Debounce)]
pub struct JsDebounce {
    pending: Rc<RefCell<PendingCall>>,
    callback: Function,
    on_timeout: Closure<dyn FnMut()>,
}

#[wasm_bindgen(js_class = Debounce)]
impl JsDebounce {
    #[wasm_bindgen(constructor)]
    pub fn new(ms: f64, callback: Function) -> JsDebounce {
        let pending = Rc::new(RefCell::new(PendingCall {
            gate: Debounce::new(ms, decide as fn()),
            timer: None,
        }));
        let on_timeout = {
            let pending = Rc::clone(&pending);
            let callback = callback.clone();
            Closure::<dyn FnMut()>::new(move || {
                let due = {
                    let mut pending = pending.borrow_mut();
                    pending.timer = None;
                    pending.gate.flush()
                };
                if due {
                    apply(&callback, &Array::new());
                }
            })
        };
        JsDebounce {
            pending,
            callback,
            on_timeout,
        }
    }

    /// Cancel the pending call, then call now (`immediate`) or after the delay.
    pub fn invoke(&self, immediate: Option<bool>) {
        let immediate = immediate.unwrap_or(false);
        let (stale, delay) = {
            let mut pending = self.pending.borrow_mut();
            pending.gate.invoke(Date::now(), immediate);
            (pending.timer.take(), pending.gate.delay())
        };
        if let Some(handle) = stale {
            clear_timer(handle);
        }

        if immediate {
            apply(&self.callback, &Array::new());
            return;
        }
        match set_timer(self.on_timeout.as_ref().unchecked_ref(), delay) {
            Some(handle) => self.pending.borrow_mut().timer = Some(handle),
            None => self.pending.borrow_mut().gate.cancel(),
        }
    }

    /// Drop the pending call without running it.
    pub fn cancel(&self) {
        let stale = {
            let mut pending = self.pending.borrow_mut();
            pending.gate.cancel();
            pending.timer.take()
        };
        if let Some(handle) = stale {
            clear_timer(handle);
        }
    }

    #[wasm_bindgen(getter, js_name = isPending)]
    pub fn is_pending(&self) -> bool {
        self.pending.borrow().gate.is_pending()
    }
}

impl Drop for JsDebounce {
    fn drop(&mut self) {
        // The timeout closure dies with us.
        self.cancel();
    }
}

/// Page-level throttle: forwards the first call, then drops calls until
/// `ms` have passed.
///
/// Usage (JS):
///   const drag = new Throttle(300, (x, y) => moveTile(x, y));
///   drag.call([x, y]);
#[wasm_bindgen(js_name = Throttle)]
pub struct JsThrottle {
    gate: RefCell<Throttle<(), fn(())>>,
    callback: Function,
}

#[wasm_bindgen(js_class = Throttle)]
impl JsThrottle {
    #[wasm_bindgen(constructor)]
    pub fn new(ms: f64, callback: Function) -> JsThrottle {
        JsThrottle {
            gate: RefCell::new(Throttle::new(ms, decide_with as fn(()))),
            callback,
        }
    }

    /// Forward `args`, spread into the callback, unless cooling down.
    /// Returns whether the call went through.
    pub fn call(&self, args: Option<Array>) -> bool {
        let forwarded = self.gate.borrow_mut().call(Date::now(), ());
        if forwarded {
            apply(&self.callback, &args.unwrap_or_else(Array::new));
        }
        forwarded
    }

    #[wasm_bindgen(getter, js_name = isCoolingDown)]
    pub fn is_cooling_down(&self) -> bool {
        self.gate.borrow().is_cooling_down(Date::now())
    }
}

fn apply(callback: &Function, args: &Array) {
    if let Err(err) = callback.apply(&JsValue::NULL, args) {
        log::error!("timed callback threw: {:?}", err);
    }
}

fn set_timer(handler: &Function, ms: f64) -> Option<i32> {
    let Some(window) = web_sys::window() else {
        log::warn!("no window: debounced call dropped");
        return None;
    };
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(handler, ms.max(0.0) as i32) {
        Ok(handle) => Some(handle),
        Err(err) => {
            log::warn!("setTimeout failed: {:?}", err);
            None
        }
    }
}

fn clear_timer(handle: i32) {
    if let Some(window) = web_sys::window() {
        window.clear_timeout_with_handle(handle);
    }
}
