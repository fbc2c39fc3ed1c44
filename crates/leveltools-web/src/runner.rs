use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use leveltools::TweenScheduler;

/// Drives a `TweenScheduler` from `requestAnimationFrame`.
///
/// The scheduler asks for a frame whenever tweens are waiting; each frame
/// callback advances every tween with the browser's frame timestamp and the
/// scheduler re-requests while work remains. At most one request is
/// outstanding.
pub struct FrameLoop {
    scheduler: TweenScheduler,
    /// Kept alive for as long as the browser may call it.
    _on_frame: Closure<dyn FnMut(f64)>,
}

impl FrameLoop {
    pub fn attach(scheduler: TweenScheduler) -> Self {
        let ticking = scheduler.clone();
        let on_frame = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            ticking.advance_all(time);
        });
        let callback: js_sys::Function = on_frame.as_ref().unchecked_ref::<js_sys::Function>().clone();

        scheduler.set_frame_request(move || {
            let Some(window) = web_sys::window() else {
                log::warn!("no window: tween frames will not run");
                return;
            };
            if let Err(err) = window.request_animation_frame(&callback) {
                log::warn!("requestAnimationFrame failed: {:?}", err);
            }
        });

        Self {
            scheduler,
            _on_frame: on_frame,
        }
    }

    pub fn scheduler(&self) -> &TweenScheduler {
        &self.scheduler
    }
}
