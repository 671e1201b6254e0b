//! `setInterval` wrapper (WASM only)
//!
//! The interval is cleared when the guard is dropped.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Live browser interval; dropping it cancels the timer
pub struct Interval {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    /// Call `f` every `period_ms`. Returns `None` outside a browser window.
    pub fn new(period_ms: u32, f: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let closure = Closure::<dyn FnMut()>::new(f);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .ok()?;
        Some(Self {
            id,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}
