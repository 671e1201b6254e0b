//! View models
//!
//! Markup-free snapshots for the presentation layer. Numbers are already
//! formatted; the renderer only places strings.

use crate::economy::{EconomyConfig, GameState, View, days_active};
use crate::format::format_number;

/// Header: title and wallet badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub title: String,
    pub wallet_label: String,
    pub wallet_connected: bool,
}

/// Main tapping screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapperView {
    /// Currency icon shown beside the amounts
    pub symbol: String,
    pub currency: String,
    pub per_hour: String,
    pub per_tap: String,
}

/// One entry of the upgrade shop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeCard {
    pub id: String,
    pub icon: String,
    pub name: String,
    /// Income added per level, formatted
    pub rate: String,
    pub level: u32,
    pub cost: String,
    /// Currency icon shown beside the cost
    pub symbol: String,
    pub affordable: bool,
}

/// Lifetime statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_taps: String,
    pub total_generated: String,
    pub days_active: u64,
}

/// Navigation button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub id: View,
    pub icon: String,
    pub name: String,
    pub active: bool,
}

pub fn header(config: &EconomyConfig, state: &GameState) -> HeaderView {
    HeaderView {
        title: config.name.clone(),
        wallet_label: state.wallet.display_address(&config.disconnected_label),
        wallet_connected: state.wallet.connected,
    }
}

pub fn tapper(config: &EconomyConfig, state: &GameState) -> TapperView {
    TapperView {
        symbol: config.currency_symbol.clone(),
        currency: format_number(state.currency),
        per_hour: format_number(state.currency_per_hour),
        per_tap: format!("+{}", format_number(state.currency_per_tap)),
    }
}

/// Shop cards in configuration order
pub fn upgrades(config: &EconomyConfig, state: &GameState) -> Vec<UpgradeCard> {
    config
        .upgrades
        .iter()
        .map(|u| {
            let level = state.level(&u.id);
            let cost = u.cost_at(level, config.growth);
            UpgradeCard {
                id: u.id.clone(),
                icon: u.icon.clone(),
                name: u.name.clone(),
                rate: format!("+{}", format_number(u.base_rate_per_level)),
                level,
                cost: format_number(cost),
                symbol: config.currency_symbol.clone(),
                affordable: state.currency >= cost,
            }
        })
        .collect()
}

pub fn stats(state: &GameState, now_ms: f64) -> StatsView {
    StatsView {
        total_taps: format_number(state.total_taps as f64),
        total_generated: format_number(state.total_currency_generated),
        days_active: days_active(state.start_date, now_ms),
    }
}

pub fn nav(config: &EconomyConfig, state: &GameState) -> Vec<NavItem> {
    config
        .views
        .iter()
        .map(|v| NavItem {
            id: v.id,
            icon: v.icon.clone(),
            name: v.name.clone(),
            active: v.id == state.active_view,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MS_PER_DAY;
    use crate::economy::WalletStatus;
    use crate::themes;

    #[test]
    fn test_upgrade_cards_reflect_level_and_affordability() {
        let config = themes::galactic_diplomacy();
        let mut state = GameState::fresh(&config, 0.0);
        state.currency = 60.0;
        state.upgrades.insert("treaties".into(), 1);

        let cards = upgrades(&config, &state);
        assert_eq!(cards.len(), config.upgrades.len());
        assert_eq!(cards[0].id, "treaties");
        assert_eq!(cards[0].level, 1);
        // floor(50 * 1.18) = 59
        assert_eq!(cards[0].cost, "59");
        assert_eq!(cards[0].symbol, "💠");
        assert_eq!(cards[0].name, "Interstellar Treaties");
        assert!(cards[0].affordable);
        assert_eq!(cards[1].cost, "250");
        assert!(!cards[1].affordable);
        assert_eq!(cards[5].cost, "100K");
        assert_eq!(cards[5].rate, "+1.20K");
    }

    #[test]
    fn test_header_wallet_label() {
        let config = themes::galactic_diplomacy();
        let mut state = GameState::fresh(&config, 0.0);
        assert_eq!(header(&config, &state).wallet_label, "Disconnected");

        state.wallet = WalletStatus::connected("EQD4FPq-PRDieyQKkizFTRtSDyucUIqrj0v_zXJmqaDp6_0t");
        let view = header(&config, &state);
        assert_eq!(view.wallet_label, "EQD4...6_0t");
        assert!(view.wallet_connected);
    }

    #[test]
    fn test_stats_and_nav() {
        let config = themes::galactic_diplomacy();
        let mut state = GameState::fresh(&config, 0.0);
        state.total_taps = 1234;
        state.total_currency_generated = 2_500_000.0;
        state.active_view = View::Stats;

        let view = stats(&state, MS_PER_DAY * 2.5);
        assert_eq!(view.total_taps, "1.23K");
        assert_eq!(view.total_generated, "2.50M");
        assert_eq!(view.days_active, 2);

        let items = nav(&config, &state);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, View::Tapper);
        assert!(!items[0].icon.is_empty());
        assert_eq!(
            items.iter().filter(|i| i.active).map(|i| i.id).collect::<Vec<_>>(),
            vec![View::Stats]
        );
    }

    #[test]
    fn test_tapper_view() {
        let config = themes::galactic_diplomacy();
        let mut state = GameState::fresh(&config, 0.0);
        state.currency = 1500.0;
        state.currency_per_hour = 26.0;
        let view = tapper(&config, &state);
        assert_eq!(view.symbol, "💠");
        assert_eq!(view.currency, "1.50K");
        assert_eq!(view.per_hour, "26");
        assert_eq!(view.per_tap, "+1");
    }
}
