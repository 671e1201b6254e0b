//! Tap Economy - An incremental tapper game economy
//!
//! Core modules:
//! - `economy`: Pure game economy (state, cost curve, income math)
//! - `engine`: Command handling, passive accrual, autosave scheduling
//! - `persistence`: Save/load with offline earnings reconciliation
//! - `platform`: Clock and periodic task scheduling
//! - `themes`: Built-in themed configurations
//! - `view`: Markup-free view models for the presentation layer

pub mod economy;
pub mod engine;
pub mod format;
pub mod persistence;
pub mod platform;
pub mod themes;
pub mod view;

pub use economy::{AccrualMode, EconomyConfig, GameState, View, WalletStatus};
pub use engine::{Command, Engine, EngineEvent, PurchaseOutcome};
pub use format::format_number;
pub use persistence::{LoadOutcome, MemoryStore, Store, StoreError};
pub use platform::{Clock, ManualClock, SystemClock};

/// Economy constants shared by every theme
pub mod consts {
    /// Milliseconds per second (all timestamps are ms since Unix epoch)
    pub const MS_PER_SECOND: f64 = 1000.0;
    /// Seconds per hour; passive income rates are expressed per hour
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
    /// Milliseconds per day, used for the "days active" statistic
    pub const MS_PER_DAY: f64 = 86_400_000.0;

    /// Passive tick period used by every theme
    pub const DEFAULT_TICK_INTERVAL_MS: u32 = 1000;
    /// Default autosave period
    pub const DEFAULT_SAVE_INTERVAL_MS: u32 = 15_000;
}

/// Seconds elapsed between two ms timestamps, clamped at zero
#[inline]
pub fn elapsed_secs(from_ms: f64, to_ms: f64) -> f64 {
    let secs = (to_ms - from_ms) / consts::MS_PER_SECOND;
    if secs.is_finite() { secs.max(0.0) } else { 0.0 }
}
