//! Game economy module
//!
//! All gameplay math and state lives here. This module must stay pure:
//! - No clock reads (timestamps are passed in)
//! - No storage or DOM access
//! - Stable serialization order (upgrade levels keyed in a sorted map)

pub mod config;
pub mod math;
pub mod state;

pub use config::{AccrualMode, ConfigError, EconomyConfig, UpgradeDefinition, ViewDefinition};
pub use math::{accrual, days_active, income_per_hour, upgrade_cost};
pub use state::{GameState, View, WalletStatus};
