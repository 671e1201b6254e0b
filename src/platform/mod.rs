//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (`js_sys::Date` on web, `SystemTime` natively)
//! - Periodic tasks (virtual schedule, `setInterval` guards on web)

pub mod schedule;
#[cfg(target_arch = "wasm32")]
pub mod interval;

use std::cell::Cell;
use std::rc::Rc;

pub use schedule::{MAX_CATCH_UP_RUNS, Schedule, TaskKind};

/// Source of wall-clock time in ms since the Unix epoch
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Virtual clock for tests and scripted sessions
///
/// Clones share the same time, so a test can keep one handle and advance it
/// while the engine reads another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance_ms(secs * 1000.0);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
