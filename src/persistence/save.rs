//! Save and load of `GameState`
//!
//! Load order matters: offline earnings use the `currencyPerHour` that was
//! saved, and only afterwards is the rate rebuilt from the live upgrade table.

use serde_json::{Map, Value};

use super::{Store, StoreError};
use crate::economy::{EconomyConfig, GameState, WalletStatus, accrual};
use crate::elapsed_secs;

/// What happened when a save slot was loaded
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No save existed; fresh state
    Fresh,
    /// Save restored and offline earnings credited
    Restored {
        elapsed_secs: f64,
        offline_earnings: f64,
    },
    /// Save was unreadable and has been thrown away; fresh state
    Discarded { reason: String },
}

/// Stamp `last_saved` and write the state under `key`
pub fn save_state(
    store: &mut dyn Store,
    key: &str,
    state: &mut GameState,
    now_ms: f64,
) -> Result<(), StoreError> {
    state.last_saved = Some(now_ms);
    let json = serde_json::to_string(state).map_err(|e| StoreError::Encode(e.to_string()))?;
    store.set(key, &json)
}

/// Load the save for `config`, falling back to fresh state
///
/// Never fails: unreadable saves are removed from the store and replaced by
/// a fresh state.
pub fn load_state(
    store: &mut dyn Store,
    config: &EconomyConfig,
    now_ms: f64,
) -> (GameState, LoadOutcome) {
    let key = config.storage_key.as_str();
    let fresh = GameState::fresh(config, now_ms);

    let raw = match store.get(key) {
        Ok(Some(blob)) => parse_save(&blob),
        Ok(None) => {
            log::info!("No save found under `{}`, starting fresh", key);
            return (fresh, LoadOutcome::Fresh);
        }
        Err(e) => Err(e.to_string()),
    };

    match raw {
        Ok(raw) => {
            let (state, elapsed, offline) = restore(raw, fresh, config, now_ms);
            log::info!(
                "Save restored: {:.0}s offline, {:.2} {} earned",
                elapsed,
                offline,
                config.currency_name
            );
            (
                state,
                LoadOutcome::Restored {
                    elapsed_secs: elapsed,
                    offline_earnings: offline,
                },
            )
        }
        Err(reason) => {
            log::warn!("Discarding unreadable save `{}`: {}", key, reason);
            if let Err(e) = store.remove(key) {
                log::error!("Could not remove save `{}`: {}", key, e);
            }
            (fresh, LoadOutcome::Discarded { reason })
        }
    }
}

fn parse_save(blob: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(blob) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("save is not a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn restore(
    raw: Map<String, Value>,
    fresh: GameState,
    config: &EconomyConfig,
    now_ms: f64,
) -> (GameState, f64, f64) {
    // Offline window and rate come from the save as written
    let since = raw
        .get("lastSaved")
        .and_then(Value::as_f64)
        .or_else(|| raw.get("startDate").and_then(Value::as_f64))
        .unwrap_or(now_ms);
    let saved_rate = raw
        .get("currencyPerHour")
        .and_then(Value::as_f64)
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(0.0);
    let elapsed = elapsed_secs(since, now_ms);
    let offline = accrual(saved_rate, elapsed);

    let mut state = merge_over_defaults(&fresh, raw);
    state.credit(offline);
    state.wallet = WalletStatus::default();
    state.currency_per_tap = config.tap_value;
    state.recompute_income(config);

    (state, elapsed, offline)
}

/// Overlay saved fields on a fresh state
///
/// Missing fields keep their defaults, unknown fields are dropped, and a
/// field that fails to deserialize falls back to its default on its own.
fn merge_over_defaults(fresh: &GameState, raw: Map<String, Value>) -> GameState {
    let defaults = match serde_json::to_value(fresh) {
        Ok(Value::Object(map)) => map,
        _ => return fresh.clone(),
    };

    let mut merged = defaults.clone();
    for (key, value) in raw {
        if !defaults.contains_key(&key) {
            continue;
        }
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value);
        if serde_json::from_value::<GameState>(Value::Object(candidate.clone())).is_ok() {
            merged = candidate;
        } else {
            log::warn!("Ignoring malformed save field `{}`", key);
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|_| fresh.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::themes;
    use serde_json::json;

    const NOW: f64 = 1_700_000_000_000.0;

    fn config() -> EconomyConfig {
        themes::galactic_diplomacy()
    }

    #[test]
    fn test_missing_save_is_fresh() {
        let mut store = MemoryStore::new();
        let (state, outcome) = load_state(&mut store, &config(), NOW);
        assert_eq!(outcome, LoadOutcome::Fresh);
        assert_eq!(state, GameState::fresh(&config(), NOW));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let config = config();
        let mut store = MemoryStore::new();
        let mut state = GameState::fresh(&config, NOW);
        state.currency = 125.0;
        state.total_taps = 40;
        state.upgrades.insert("treaties".into(), 2);
        state.recompute_income(&config);

        save_state(&mut store, &config.storage_key, &mut state, NOW).unwrap();
        assert_eq!(state.last_saved, Some(NOW));

        let (loaded, outcome) = load_state(&mut store, &config, NOW);
        assert_eq!(
            outcome,
            LoadOutcome::Restored {
                elapsed_secs: 0.0,
                offline_earnings: 0.0
            }
        );
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_offline_earnings_from_saved_rate() {
        let config = config();
        let blob = json!({
            "currency": 10.0,
            "currencyPerHour": 3600.0,
            "totalCurrencyGenerated": 10.0,
            "startDate": NOW - 1_000_000.0,
            "lastSaved": NOW - 100_000.0,
        });
        let mut store = MemoryStore::with_entry(&config.storage_key, &blob.to_string());

        let (state, outcome) = load_state(&mut store, &config, NOW);
        match outcome {
            LoadOutcome::Restored {
                elapsed_secs,
                offline_earnings,
            } => {
                assert_eq!(elapsed_secs, 100.0);
                assert!((99.0..=101.0).contains(&offline_earnings));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!((state.currency - 110.0).abs() < 1e-9);
        assert!((state.total_currency_generated - 110.0).abs() < 1e-9);
        // No upgrades owned, so the live rate is zero after the credit
        assert_eq!(state.currency_per_hour, 0.0);
    }

    #[test]
    fn test_legacy_save_falls_back_to_start_date() {
        let config = config();
        let blob = json!({
            "currency": 0.0,
            "currencyPerHour": 36.0,
            "startDate": NOW - 3_600_000.0,
        });
        let mut store = MemoryStore::with_entry(&config.storage_key, &blob.to_string());

        let (state, _) = load_state(&mut store, &config, NOW);
        assert!((state.currency - 36.0).abs() < 1e-9);
        assert_eq!(state.start_date, NOW - 3_600_000.0);
    }

    #[test]
    fn test_future_timestamp_earns_nothing() {
        let config = config();
        let blob = json!({ "currencyPerHour": 3600.0, "lastSaved": NOW + 60_000.0 });
        let mut store = MemoryStore::with_entry(&config.storage_key, &blob.to_string());
        let (state, _) = load_state(&mut store, &config, NOW);
        assert_eq!(state.currency, 0.0);
    }

    #[test]
    fn test_rate_recomputed_after_offline_credit() {
        let config = config();
        // Saved rate disagrees with the upgrade table; it is only trusted for
        // the offline window
        let blob = json!({
            "currencyPerHour": 7200.0,
            "lastSaved": NOW - 10_000.0,
            "upgrades": { "treaties": 3, "xenolinguistics": 1, "retired": 9 },
        });
        let mut store = MemoryStore::with_entry(&config.storage_key, &blob.to_string());

        let (state, _) = load_state(&mut store, &config, NOW);
        assert!((state.currency - 20.0).abs() < 1e-9);
        assert_eq!(state.currency_per_hour, 3.0 * 1.0 + 5.0);
        assert_eq!(state.level("retired"), 9);
    }

    #[test]
    fn test_corrupt_save_discarded() {
        let config = config();
        let mut store = MemoryStore::with_entry(&config.storage_key, "{{{ definitely not json");

        let (state, outcome) = load_state(&mut store, &config, NOW);
        assert!(matches!(outcome, LoadOutcome::Discarded { .. }));
        assert_eq!(state, GameState::fresh(&config, NOW));
        assert!(!store.contains(&config.storage_key));
    }

    #[test]
    fn test_non_object_save_discarded() {
        let config = config();
        let mut store = MemoryStore::with_entry(&config.storage_key, "[1, 2, 3]");
        let (_, outcome) = load_state(&mut store, &config, NOW);
        assert!(matches!(outcome, LoadOutcome::Discarded { .. }));
    }

    #[test]
    fn test_malformed_field_falls_back_alone() {
        let config = config();
        let blob = json!({
            "currency": 42.0,
            "totalTaps": "many",
            "activeView": "stats",
            "lastSaved": NOW,
            "someFutureField": true,
        });
        let mut store = MemoryStore::with_entry(&config.storage_key, &blob.to_string());

        let (state, _) = load_state(&mut store, &config, NOW);
        assert_eq!(state.currency, 42.0);
        assert_eq!(state.total_taps, 0);
        assert_eq!(state.active_view, crate::economy::View::Stats);
    }

    #[test]
    fn test_wallet_not_trusted_from_save() {
        let config = config();
        let blob = json!({
            "lastSaved": NOW,
            "wallet": { "connected": true, "address": "UQBvW8Z5huBkMJYd" },
        });
        let mut store = MemoryStore::with_entry(&config.storage_key, &blob.to_string());
        let (state, _) = load_state(&mut store, &config, NOW);
        assert_eq!(state.wallet, WalletStatus::default());
    }

    #[test]
    fn test_save_write_failure_keeps_state() {
        let config = config();
        let mut store = MemoryStore::with_quota(8);
        let mut state = GameState::fresh(&config, NOW);
        state.currency = 5.0;
        let before = state.clone();

        let err = save_state(&mut store, &config.storage_key, &mut state, NOW + 1.0).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(state.currency, before.currency);
        assert_eq!(state.upgrades, before.upgrades);
    }

    /// Store whose reads always fail; counts removal attempts
    #[derive(Default)]
    struct BrokenStore {
        fail_remove: bool,
        removes: usize,
    }

    impl Store for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Read {
                key: key.to_string(),
                reason: "SecurityError".to_string(),
            })
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.removes += 1;
            if self.fail_remove {
                return Err(StoreError::Remove {
                    key: key.to_string(),
                    reason: "SecurityError".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_read_failure_discards_and_starts_fresh() {
        let config = config();
        let mut store = BrokenStore::default();

        let (state, outcome) = load_state(&mut store, &config, NOW);
        match outcome {
            LoadOutcome::Discarded { reason } => assert!(reason.contains("SecurityError")),
            other => panic!("expected discard, got {other:?}"),
        }
        assert_eq!(state, GameState::fresh(&config, NOW));
        assert_eq!(store.removes, 1);
    }

    #[test]
    fn test_remove_failure_after_bad_read_still_loads() {
        let config = config();
        let mut store = BrokenStore {
            fail_remove: true,
            ..Default::default()
        };

        let (state, outcome) = load_state(&mut store, &config, NOW);
        assert!(matches!(outcome, LoadOutcome::Discarded { .. }));
        assert_eq!(state, GameState::fresh(&config, NOW));
        assert_eq!(store.removes, 1);
    }
}
