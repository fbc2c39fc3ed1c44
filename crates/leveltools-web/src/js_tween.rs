use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object};
use wasm_bindgen::prelude::*;

use leveltools::{Easing, Tween};

use crate::default_scheduler;
use crate::js_target::{numeric_entries, JsTarget};

/// JS-facing tween over a plain object, registered with the default
/// scheduler. Every method returns a tween so calls chain as in
/// `new Tween(sprite, 300).to({x: 10}).start()`.
#[wasm_bindgen(js_name = Tween)]
pub struct JsTween {
    inner: Tween<JsTarget>,
}

#[wasm_bindgen(js_class = Tween)]
impl JsTween {
    #[wasm_bindgen(constructor)]
    pub fn new(target: Object, total_time: Option<f64>) -> JsTween {
        let scheduler = default_scheduler();
        let target = Rc::new(RefCell::new(JsTarget(target)));
        let inner = match total_time {
            Some(ms) => scheduler.tween(&target, ms),
            None => scheduler.tween_default(&target),
        };
        JsTween { inner }
    }

    pub fn to(&self, props: &Object, eased: Option<bool>) -> JsTween {
        self.wrap(self.inner.clone().to_with(numeric_entries(props), eased.unwrap_or(true)))
    }

    pub fn from(&self, props: &Object, eased: Option<bool>) -> JsTween {
        self.wrap(self.inner.clone().from_with(numeric_entries(props), eased.unwrap_or(true)))
    }

    #[wasm_bindgen(js_name = colorTo)]
    pub fn color_to(&self, props: &Object, eased: Option<bool>) -> JsTween {
        self.wrap(self.inner.clone().color_to_with(numeric_entries(props), eased.unwrap_or(true)))
    }

    #[wasm_bindgen(js_name = colorFrom)]
    pub fn color_from(&self, props: &Object, eased: Option<bool>) -> JsTween {
        self.wrap(self.inner.clone().color_from_with(numeric_entries(props), eased.unwrap_or(true)))
    }

    pub fn wait(&self, ms: f64) -> JsTween {
        self.wrap(self.inner.clone().wait(ms))
    }

    pub fn yoyo(&self, enabled: Option<bool>, repeat: Option<f64>) -> JsTween {
        self.wrap(self.inner.clone().yoyo(enabled.unwrap_or(true), repeat.unwrap_or(1.0)))
    }

    #[wasm_bindgen(js_name = loop)]
    pub fn looping(&self, enabled: Option<bool>, repeat: Option<f64>) -> JsTween {
        self.wrap(self.inner.clone().looping(enabled.unwrap_or(true), repeat.unwrap_or(1.0)))
    }

    /// `name` is `Family.Variant`, e.g. `Quadratic.Out`.
    pub fn easing(&self, name: &str) -> Result<JsTween, JsValue> {
        let easing: Easing = name
            .parse()
            .map_err(|err: leveltools::UnknownEasing| JsValue::from_str(&err.to_string()))?;
        Ok(self.wrap(self.inner.clone().easing(easing)))
    }

    pub fn over(&self, ms: f64) -> JsTween {
        self.wrap(self.inner.clone().over(ms))
    }

    #[wasm_bindgen(js_name = onUpdate)]
    pub fn on_update(&self, callback: Function) -> JsTween {
        self.wrap(self.inner.clone().on_update(js_callback(callback)))
    }

    #[wasm_bindgen(js_name = onComplete)]
    pub fn on_complete(&self, callback: Function) -> JsTween {
        self.wrap(self.inner.clone().on_complete(js_callback(callback)))
    }

    #[wasm_bindgen(js_name = onWaitComplete)]
    pub fn on_wait_complete(&self, callback: Function) -> JsTween {
        self.wrap(self.inner.clone().on_wait_complete(js_callback(callback)))
    }

    /// Create and return the tween that starts when this one completes.
    pub fn chain(&self, target: Object, total_time: Option<f64>) -> JsTween {
        let next = JsTween::new(target, total_time);
        self.inner.chain_tween(&next.inner);
        next
    }

    #[wasm_bindgen(js_name = chainTween)]
    pub fn chain_tween(&self, next: &JsTween) -> JsTween {
        self.wrap(self.inner.chain_tween(&next.inner))
    }

    pub fn start(&self) -> JsTween {
        self.wrap(self.inner.start())
    }

    pub fn stop(&self) -> JsTween {
        self.wrap(self.inner.stop())
    }

    pub fn reset(&self) -> JsTween {
        self.wrap(self.inner.reset())
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    #[wasm_bindgen(getter, js_name = totalTime)]
    pub fn total_time(&self) -> f64 {
        self.inner.total_time()
    }
}

impl JsTween {
    fn wrap(&self, inner: Tween<JsTarget>) -> JsTween {
        JsTween { inner }
    }
}

fn js_callback(callback: Function) -> impl FnMut(&Rc<RefCell<JsTarget>>) + 'static {
    move |target: &Rc<RefCell<JsTarget>>| {
        let object = target.borrow().0.clone();
        if let Err(err) = callback.call1(&JsValue::NULL, &object) {
            log::error!("tween callback threw: {:?}", err);
        }
    }
}
