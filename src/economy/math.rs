//! Cost curve and income math

use std::collections::BTreeMap;

use super::config::EconomyConfig;
use crate::consts::*;

/// Price of the next level: `floor(base_cost * growth^level)`
///
/// Truncated, not rounded. Affordability checks compare against this exact
/// value, so the floor matters at the boundary.
#[inline]
pub fn upgrade_cost(base_cost: f64, growth: f64, level: u32) -> f64 {
    (base_cost * growth.powf(level as f64)).floor()
}

/// Total passive income per hour for a set of upgrade levels
///
/// Linear in level and additive across upgrades. Ids missing from the
/// configuration contribute nothing.
pub fn income_per_hour(levels: &BTreeMap<String, u32>, config: &EconomyConfig) -> f64 {
    levels
        .iter()
        .filter_map(|(id, &level)| {
            config
                .upgrade(id)
                .map(|u| level as f64 * u.base_rate_per_level)
        })
        .sum()
}

/// Currency earned over `seconds` at `rate_per_hour`
#[inline]
pub fn accrual(rate_per_hour: f64, seconds: f64) -> f64 {
    rate_per_hour / SECONDS_PER_HOUR * seconds
}

/// Whole days since `start_ms`, never less than 1
pub fn days_active(start_ms: f64, now_ms: f64) -> u64 {
    let days = ((now_ms - start_ms) / MS_PER_DAY).floor();
    if days.is_finite() && days >= 1.0 { days as u64 } else { 1 }
}
