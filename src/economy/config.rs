//! Theme configuration
//!
//! One `EconomyConfig` describes a complete themed variant of the game:
//! labels, tap value, cost growth, the upgrade table, navigation and timing.
//! Configs are plain data and can be loaded from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::math::upgrade_cost;
use super::state::View;
use crate::consts::*;

/// Errors found while validating a configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Cost growth must be a finite multiplier of at least 1.
    #[error("invalid cost growth {0}: must be finite and >= 1")]
    InvalidGrowth(f64),

    /// Upgrade base cost must be positive.
    #[error("upgrade `{id}` has invalid base cost {cost}")]
    InvalidBaseCost { id: String, cost: f64 },

    /// Upgrade rate per level must be non-negative.
    #[error("upgrade `{id}` has invalid rate {rate}")]
    InvalidRate { id: String, rate: f64 },

    /// Tap value must be non-negative.
    #[error("invalid tap value {0}")]
    InvalidTapValue(f64),

    #[error("duplicate upgrade id `{0}`")]
    DuplicateUpgrade(String),

    #[error("configuration defines no views")]
    NoViews,

    #[error("{name} interval must be positive")]
    InvalidInterval { name: &'static str },

    #[error("empty storage key")]
    EmptyStorageKey,

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// How passive income is credited on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AccrualMode {
    /// Credit the real time elapsed since the previous tick
    #[default]
    Elapsed,
    /// Credit exactly one nominal tick period, regardless of timer drift
    FixedStep,
}

/// A purchasable, levelable income source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDefinition {
    pub id: String,
    pub name: String,
    pub base_cost: f64,
    /// Income per hour contributed by each level
    pub base_rate_per_level: f64,
    #[serde(default)]
    pub icon: String,
}

impl UpgradeDefinition {
    pub fn new(id: &str, name: &str, base_cost: f64, base_rate_per_level: f64, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_cost,
            base_rate_per_level,
            icon: icon.to_string(),
        }
    }

    /// Price of the next level when `level` levels are owned
    pub fn cost_at(&self, level: u32, growth: f64) -> f64 {
        upgrade_cost(self.base_cost, growth, level)
    }
}

/// Navigation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub id: View,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl ViewDefinition {
    pub fn new(id: View, name: &str, icon: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

fn default_tap_value() -> f64 {
    1.0
}

fn default_tick_interval() -> u32 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_save_interval() -> u32 {
    DEFAULT_SAVE_INTERVAL_MS
}

fn default_disconnected_label() -> String {
    "Disconnected".to_string()
}

/// Complete configuration of one themed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomyConfig {
    /// Theme identifier (used by `themes::by_id`)
    pub id: String,
    /// Title shown in the header
    pub name: String,
    pub currency_name: String,
    pub currency_symbol: String,
    #[serde(default = "default_tap_value")]
    pub tap_value: f64,
    /// Cost multiplier per owned level
    pub growth: f64,
    /// Upgrade table, in display order
    pub upgrades: Vec<UpgradeDefinition>,
    /// Navigation, in display order
    pub views: Vec<ViewDefinition>,
    /// Persistence slot; changing it orphans older saves
    pub storage_key: String,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u32,
    #[serde(default = "default_save_interval")]
    pub save_interval_ms: u32,
    #[serde(default)]
    pub accrual: AccrualMode,
    /// Header label while no wallet is connected
    #[serde(default = "default_disconnected_label")]
    pub disconnected_label: String,
}

impl EconomyConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.growth.is_finite() || self.growth < 1.0 {
            return Err(ConfigError::InvalidGrowth(self.growth));
        }
        if !self.tap_value.is_finite() || self.tap_value < 0.0 {
            return Err(ConfigError::InvalidTapValue(self.tap_value));
        }

        for (i, upgrade) in self.upgrades.iter().enumerate() {
            if !upgrade.base_cost.is_finite() || upgrade.base_cost <= 0.0 {
                return Err(ConfigError::InvalidBaseCost {
                    id: upgrade.id.clone(),
                    cost: upgrade.base_cost,
                });
            }
            if !upgrade.base_rate_per_level.is_finite() || upgrade.base_rate_per_level < 0.0 {
                return Err(ConfigError::InvalidRate {
                    id: upgrade.id.clone(),
                    rate: upgrade.base_rate_per_level,
                });
            }
            if self.upgrades[..i].iter().any(|u| u.id == upgrade.id) {
                return Err(ConfigError::DuplicateUpgrade(upgrade.id.clone()));
            }
        }

        if self.views.is_empty() {
            return Err(ConfigError::NoViews);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval { name: "tick" });
        }
        if self.save_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval { name: "save" });
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }

    /// Look up an upgrade definition by id
    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDefinition> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    /// Look up a navigation entry by its string id
    pub fn view(&self, id: &str) -> Option<&ViewDefinition> {
        let view = View::from_id(id)?;
        self.views.iter().find(|v| v.id == view)
    }

    /// Nominal tick period in seconds
    pub fn tick_secs(&self) -> f64 {
        self.tick_interval_ms as f64 / MS_PER_SECOND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes;

    #[test]
    fn test_builtin_themes_validate() {
        for theme in themes::all() {
            assert_eq!(theme.validate(), Ok(()), "theme {}", theme.id);
        }
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let json = r#"{
            "id": "mini",
            "name": "Mini",
            "currencyName": "Coins",
            "currencySymbol": "C",
            "growth": 1.15,
            "upgrades": [
                { "id": "a", "name": "A", "baseCost": 50, "baseRatePerLevel": 5 }
            ],
            "views": [ { "id": "tapper", "name": "Tap" } ],
            "storageKey": "mini_v1"
        }"#;
        let config = EconomyConfig::from_json(json).unwrap();
        assert_eq!(config.tap_value, 1.0);
        assert_eq!(config.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(config.save_interval_ms, DEFAULT_SAVE_INTERVAL_MS);
        assert_eq!(config.accrual, AccrualMode::Elapsed);
        assert_eq!(config.disconnected_label, "Disconnected");
        assert_eq!(config.upgrade("a").unwrap().icon, "");
        assert!(config.view("tapper").is_some());
        assert!(config.view("stats").is_none());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = themes::galactic_diplomacy();
        config.growth = 0.9;
        assert_eq!(config.validate(), Err(ConfigError::InvalidGrowth(0.9)));

        let mut config = themes::galactic_diplomacy();
        config.upgrades[0].base_cost = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseCost { .. })));

        let mut config = themes::galactic_diplomacy();
        config.upgrades[1].base_rate_per_level = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRate { .. })));

        let mut config = themes::galactic_diplomacy();
        let dup = config.upgrades[0].clone();
        config.upgrades.push(dup);
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateUpgrade(_))));

        let mut config = themes::galactic_diplomacy();
        config.views.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoViews));

        let mut config = themes::galactic_diplomacy();
        config.save_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidInterval { name: "save" }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(EconomyConfig::from_json("{not json"), Err(ConfigError::Parse(_))));
    }
}
