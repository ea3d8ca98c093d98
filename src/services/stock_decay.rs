//! Stock Decay Simulator
//!
//! Presentation-only urgency: once a variant is shown, its displayed stock
//! walks linearly from the real count down to a floor over one decay period.
//! Real backend stock is never touched and always caps the displayed value;
//! records live in a side table keyed by variant key and vanish on reset.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use crate::domain::value_objects::Quantity;

#[derive(Clone, Debug)]
pub struct DecayConfig {
    pub period: Duration,
    /// Lowest displayed count while real stock is positive.
    pub min_stock: u32,
}

impl Default for DecayConfig {
    fn default() -> Self { Self { period: Duration::hours(12), min_stock: 1 } }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecayRecord {
    pub baseline_stock: Quantity,
    pub activated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct StockDecaySimulator {
    config: DecayConfig,
    records: HashMap<String, DecayRecord>,
}

impl StockDecaySimulator {
    pub fn new(config: DecayConfig) -> Self { Self { config, records: HashMap::new() } }

    pub fn config(&self) -> &DecayConfig { &self.config }

    pub fn activate_variant(&mut self, option_id: &str, real_stock: u32) -> bool {
        self.activate_variant_at(option_id, real_stock, Utc::now())
    }

    /// Starts decay for `option_id`. Returns `false` if it was already active;
    /// the existing baseline and timer are kept.
    pub fn activate_variant_at(&mut self, option_id: &str, real_stock: u32, now: DateTime<Utc>) -> bool {
        if self.records.contains_key(option_id) { return false; }
        self.records.insert(option_id.to_string(), DecayRecord { baseline_stock: Quantity::new(real_stock), activated_at: now });
        tracing::debug!(option_id, baseline = real_stock, "Decay activated");
        true
    }

    pub fn current_stock(&self, option_id: &str, real_stock: u32) -> u32 {
        self.current_stock_at(option_id, real_stock, Utc::now())
    }

    pub fn current_stock_at(&self, option_id: &str, real_stock: u32, now: DateTime<Utc>) -> u32 {
        let Some(record) = self.records.get(option_id) else { return real_stock };
        let baseline = record.baseline_stock;
        if baseline.is_zero() || real_stock == 0 { return 0; }

        let floor = self.config.min_stock.min(baseline.value());
        let span = u128::from(baseline.value() - floor);
        let period_ms = self.config.period.num_milliseconds().max(1) as u128;
        let elapsed_ms = (now - record.activated_at).num_milliseconds().clamp(0, i64::MAX) as u128;
        let dropped = span * elapsed_ms.min(period_ms) / period_ms;

        let decayed = baseline.subtract(dropped as u32).map(|q| q.value()).unwrap_or(floor).max(floor);
        decayed.min(real_stock)
    }

    pub fn is_active(&self, option_id: &str) -> bool { self.records.contains_key(option_id) }

    pub fn record(&self, option_id: &str) -> Option<&DecayRecord> { self.records.get(option_id) }

    /// Drops every record; all options show real stock until re-activated.
    pub fn reset_all_variants(&mut self) -> usize {
        let cleared = self.records.len();
        self.records.clear();
        tracing::debug!(cleared, "Decay records reset");
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> { DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc) }

    #[test]
    fn test_inactive_returns_real_stock() {
        let sim = StockDecaySimulator::default();
        assert_eq!(sim.current_stock_at("a", 17, t0() + Duration::hours(5)), 17);
    }

    #[test]
    fn test_linear_decay_to_floor() {
        let mut sim = StockDecaySimulator::new(DecayConfig::default());
        sim.activate_variant_at("a", 25, t0());
        assert_eq!(sim.current_stock_at("a", 25, t0()), 25);
        assert_eq!(sim.current_stock_at("a", 25, t0() + Duration::hours(6)), 13);
        assert_eq!(sim.current_stock_at("a", 25, t0() + Duration::hours(12)), 1);
        assert_eq!(sim.current_stock_at("a", 25, t0() + Duration::days(30)), 1);
    }

    #[test]
    fn test_monotonic_non_increasing() {
        let mut sim = StockDecaySimulator::default();
        sim.activate_variant_at("a", 9, t0());
        let mut last = u32::MAX;
        for minutes in (0..=13 * 60).step_by(7) {
            let now = sim.current_stock_at("a", 9, t0() + Duration::minutes(minutes));
            assert!(now <= last);
            assert!(now >= 1);
            last = now;
        }
    }

    #[test]
    fn test_activation_is_idempotent() {
        let mut sim = StockDecaySimulator::default();
        assert!(sim.activate_variant_at("a", 10, t0()));
        assert!(!sim.activate_variant_at("a", 50, t0() + Duration::hours(6)));
        assert_eq!(sim.record("a").unwrap().baseline_stock.value(), 10);
        assert_eq!(sim.record("a").unwrap().activated_at, t0());
    }

    #[test]
    fn test_zero_stock_stays_zero() {
        let mut sim = StockDecaySimulator::default();
        sim.activate_variant_at("a", 0, t0());
        assert_eq!(sim.current_stock_at("a", 0, t0() + Duration::hours(1)), 0);
    }

    #[test]
    fn test_clock_before_activation_shows_baseline() {
        let mut sim = StockDecaySimulator::default();
        sim.activate_variant_at("a", 8, t0());
        assert_eq!(sim.current_stock_at("a", 8, t0() - Duration::hours(1)), 8);
    }

    #[test]
    fn test_real_stock_caps_decayed_value() {
        let mut sim = StockDecaySimulator::default();
        sim.activate_variant_at("128", 9, t0());
        assert_eq!(sim.current_stock_at("128", 0, t0()), 0);
        assert_eq!(sim.current_stock_at("128", 4, t0()), 4);
        assert_eq!(sim.current_stock_at("128", 40, t0() + Duration::hours(12)), 1);
    }

    #[test]
    fn test_reset_restores_real_stock() {
        let mut sim = StockDecaySimulator::default();
        sim.activate_variant_at("a", 30, t0());
        sim.activate_variant_at("b", 4, t0());
        assert_eq!(sim.reset_all_variants(), 2);
        assert!(!sim.is_active("a"));
        assert_eq!(sim.current_stock("a", 30), 30);
        assert_eq!(sim.current_stock("b", 4), 4);
    }
}
