use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub type Task = Box<dyn FnOnce()>;

/// Single-threaded continuation queue. Every animation step releases control
/// and resumes through one of these two calls, never by blocking.
pub trait Scheduler {
    fn after(&self, delay_ms: u32, task: Task);
    fn next_frame(&self, task: Task);
}

pub type SharedScheduler = Rc<dyn Scheduler>;

/// Browser event loop: `setTimeout` through gloo and `requestAnimationFrame`.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn after(&self, delay_ms: u32, task: Task) {
        let timeout = Timeout::new(delay_ms, move || task());
        timeout.forget();
    }

    fn next_frame(&self, task: Task) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || task());
        if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {:?}", err);
        }
    }
}
