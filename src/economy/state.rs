//! Game state and presentation selectors
//!
//! Everything persisted between sessions lives in `GameState`. The JSON field
//! names are part of the save format and must not change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::EconomyConfig;
use super::math::income_per_hour;

/// Which screen the presentation layer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Tapper,
    Upgrades,
    Stats,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Tapper => "tapper",
            View::Upgrades => "upgrades",
            View::Stats => "stats",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "tapper" => Some(View::Tapper),
            "upgrades" => Some(View::Upgrades),
            "stats" => Some(View::Stats),
            _ => None,
        }
    }
}

/// Latest wallet connection report (display only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WalletStatus {
    pub connected: bool,
    pub address: Option<String>,
}

impl WalletStatus {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            connected: true,
            address: Some(address.into()),
        }
    }

    /// Short `abcd...wxyz` form of the address, or `fallback` when disconnected
    pub fn display_address(&self, fallback: &str) -> String {
        match (&self.connected, &self.address) {
            (true, Some(addr)) => {
                let chars: Vec<char> = addr.chars().collect();
                if chars.len() <= 8 {
                    addr.clone()
                } else {
                    let head: String = chars[..4].iter().collect();
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("{head}...{tail}")
                }
            }
            _ => fallback.to_string(),
        }
    }
}

/// Complete persisted game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Spendable balance
    pub currency: f64,
    /// Credited per tap
    pub currency_per_tap: f64,
    /// Passive income, derived from `upgrades`
    pub currency_per_hour: f64,
    /// Lifetime tap count
    pub total_taps: u64,
    /// Lifetime currency from taps, passive income and offline earnings
    pub total_currency_generated: f64,
    /// Creation time (ms since epoch)
    pub start_date: f64,
    /// Time of the last save (ms since epoch); absent in legacy saves
    pub last_saved: Option<f64>,
    /// Upgrade levels by id; absent ids are level 0
    pub upgrades: BTreeMap<String, u32>,
    pub active_view: View,
    pub wallet: WalletStatus,
}

impl GameState {
    /// Create a brand new state at `now_ms`
    pub fn new(now_ms: f64, currency_per_tap: f64) -> Self {
        Self {
            currency: 0.0,
            currency_per_tap,
            currency_per_hour: 0.0,
            total_taps: 0,
            total_currency_generated: 0.0,
            start_date: now_ms,
            last_saved: Some(now_ms),
            upgrades: BTreeMap::new(),
            active_view: View::default(),
            wallet: WalletStatus::default(),
        }
    }

    /// Fresh state for a theme
    pub fn fresh(config: &EconomyConfig, now_ms: f64) -> Self {
        Self::new(now_ms, config.tap_value)
    }

    /// Current level of an upgrade (0 if never bought)
    pub fn level(&self, id: &str) -> u32 {
        self.upgrades.get(id).copied().unwrap_or(0)
    }

    /// Rebuild `currency_per_hour` from upgrade levels
    pub fn recompute_income(&mut self, config: &EconomyConfig) {
        self.currency_per_hour = income_per_hour(&self.upgrades, config);
    }

    /// Credit currency that counts toward the lifetime total
    pub fn credit(&mut self, amount: f64) {
        self.currency += amount;
        self.total_currency_generated += amount;
    }
}
