//! Built-in themes
//!
//! Every theme runs the same economy; only labels, the upgrade table, cost
//! growth and save cadence differ.

use crate::economy::{AccrualMode, EconomyConfig, UpgradeDefinition, View, ViewDefinition};

/// Theme used when none is requested
pub const DEFAULT_THEME: &str = "galactic-diplomacy";

fn views(tapper: (&str, &str), upgrades: (&str, &str), stats: (&str, &str)) -> Vec<ViewDefinition> {
    vec![
        ViewDefinition::new(View::Tapper, tapper.0, tapper.1),
        ViewDefinition::new(View::Upgrades, upgrades.0, upgrades.1),
        ViewDefinition::new(View::Stats, stats.0, stats.1),
    ]
}

/// Diplomatic influence across the galaxy
pub fn galactic_diplomacy() -> EconomyConfig {
    EconomyConfig {
        id: "galactic-diplomacy".into(),
        name: "Galactic Diplomat".into(),
        currency_name: "Influence".into(),
        currency_symbol: "💠".into(),
        tap_value: 1.0,
        growth: 1.18,
        upgrades: vec![
            UpgradeDefinition::new("treaties", "Interstellar Treaties", 50.0, 1.0, "📜"),
            UpgradeDefinition::new("xenolinguistics", "Language Academies", 250.0, 5.0, "👽"),
            UpgradeDefinition::new("networks", "Hyper-relay Network", 1000.0, 20.0, "🛰️"),
            UpgradeDefinition::new("biotech", "Bio-regeneration Clinics", 5000.0, 80.0, "🧬"),
            UpgradeDefinition::new("robotics", "Robotic Envoys", 20_000.0, 300.0, "🤖"),
            UpgradeDefinition::new("artifacts", "Artifact Studies", 100_000.0, 1200.0, "🛸"),
        ],
        views: views(("Galaxy", "🌌"), ("Projects", "🚀"), ("Records", "📊")),
        storage_key: "galacticDiplomacySave_v1".into(),
        tick_interval_ms: 1000,
        save_interval_ms: 15_000,
        accrual: AccrualMode::Elapsed,
        disconnected_label: "Disconnected".into(),
    }
}

/// Peacekeeping tapper
pub fn peace_kombat() -> EconomyConfig {
    EconomyConfig {
        id: "peace-kombat".into(),
        name: "Peace Kombat".into(),
        currency_name: "Peace".into(),
        currency_symbol: "🕊️".into(),
        tap_value: 1.0,
        growth: 1.15,
        upgrades: vec![
            UpgradeDefinition::new("volunteers", "Volunteer Corps", 50.0, 1.0, "🙋"),
            UpgradeDefinition::new("mediators", "Mediators", 250.0, 5.0, "🤝"),
            UpgradeDefinition::new("aid", "Aid Convoys", 1000.0, 20.0, "🚚"),
            UpgradeDefinition::new("schools", "Schools", 5000.0, 80.0, "🏫"),
            UpgradeDefinition::new("summits", "World Summits", 20_000.0, 300.0, "🌍"),
        ],
        views: views(("Tap", "✋"), ("Missions", "🎯"), ("Stats", "📊")),
        storage_key: "peaceKombatSave_v2".into(),
        tick_interval_ms: 1000,
        save_interval_ms: 10_000,
        accrual: AccrualMode::Elapsed,
        disconnected_label: "Not connected".into(),
    }
}

/// Crypto mining farm
pub fn crypto_farm() -> EconomyConfig {
    EconomyConfig {
        id: "crypto-farm".into(),
        name: "Crypto Farm".into(),
        currency_name: "Hash".into(),
        currency_symbol: "⛏️".into(),
        tap_value: 1.0,
        growth: 1.17,
        upgrades: vec![
            UpgradeDefinition::new("gpu", "Graphics Card", 50.0, 1.0, "🖥️"),
            UpgradeDefinition::new("rig", "Mining Rig", 250.0, 5.0, "🔧"),
            UpgradeDefinition::new("asic", "ASIC Miner", 1000.0, 20.0, "📟"),
            UpgradeDefinition::new("cooling", "Immersion Cooling", 5000.0, 80.0, "❄️"),
            UpgradeDefinition::new("datacenter", "Data Center", 20_000.0, 300.0, "🏭"),
            UpgradeDefinition::new("fusion", "Fusion Plant", 100_000.0, 1200.0, "⚛️"),
        ],
        views: views(("Mine", "⛏️"), ("Hardware", "🛠️"), ("Stats", "📈")),
        storage_key: "cryptoFarmSave_v1".into(),
        tick_interval_ms: 1000,
        save_interval_ms: 12_000,
        accrual: AccrualMode::Elapsed,
        disconnected_label: "Disconnected".into(),
    }
}

/// Dragon hoarding gold
pub fn dragon_hoard() -> EconomyConfig {
    EconomyConfig {
        id: "dragon-hoard".into(),
        name: "Dragon Hoard".into(),
        currency_name: "Gold".into(),
        currency_symbol: "🪙".into(),
        tap_value: 1.0,
        growth: 1.20,
        upgrades: vec![
            UpgradeDefinition::new("kobolds", "Kobold Diggers", 50.0, 1.0, "🦎"),
            UpgradeDefinition::new("raids", "Village Raids", 250.0, 5.0, "🔥"),
            UpgradeDefinition::new("mines", "Dwarven Mines", 1000.0, 20.0, "⛰️"),
            UpgradeDefinition::new("tribute", "Royal Tribute", 5000.0, 80.0, "👑"),
            UpgradeDefinition::new("wyrmlings", "Wyrmling Brood", 20_000.0, 300.0, "🐉"),
        ],
        views: views(("Lair", "🏔️"), ("Hoard", "💰"), ("Legend", "📜")),
        storage_key: "dragonHoardSave_v1".into(),
        tick_interval_ms: 1000,
        save_interval_ms: 10_000,
        accrual: AccrualMode::Elapsed,
        disconnected_label: "No wallet".into(),
    }
}

/// All built-in themes
pub fn all() -> Vec<EconomyConfig> {
    vec![galactic_diplomacy(), peace_kombat(), crypto_farm(), dragon_hoard()]
}

/// Look up a built-in theme by id
pub fn by_id(id: &str) -> Option<EconomyConfig> {
    all().into_iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_ids_unique_and_resolvable() {
        let themes = all();
        for theme in &themes {
            assert_eq!(by_id(&theme.id).as_ref(), Some(theme));
            assert_eq!(themes.iter().filter(|t| t.id == theme.id).count(), 1);
            assert_eq!(themes.iter().filter(|t| t.storage_key == theme.storage_key).count(), 1);
        }
        assert!(by_id(DEFAULT_THEME).is_some());
        assert!(by_id("missing").is_none());
    }

    #[test]
    fn test_growth_in_observed_range() {
        for theme in all() {
            assert!((1.15..=1.20).contains(&theme.growth), "theme {}", theme.id);
            assert!((10_000..=15_000).contains(&theme.save_interval_ms));
            assert_eq!(theme.tick_interval_ms, 1000);
            assert_eq!(theme.tap_value, 1.0);
        }
    }
}
