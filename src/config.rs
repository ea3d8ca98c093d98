//! Engine configuration
//!
//! Read from the process environment after loading an optional `.env` file.
//!
//! | Variable             | Default                              |
//! |----------------------|--------------------------------------|
//! | `RATE_API_URL`       | `https://open.er-api.com/v6/latest`  |
//! | `RATE_TIMEOUT_SECS`  | `10`                                 |
//! | `BASE_CURRENCY`      | `HTG`                                |
//! | `LIVE_RATE_FROM`     | `USD`                                |
//! | `LIVE_RATE_TO`       | `HTG`                                |
//! | `FALLBACK_RATE`      | `130.82`                             |
//! | `EXTRA_RATES`        | empty, e.g. `EUR=0.0069,CAD=0.0104`  |
//! | `DISPLAY_CURRENCIES` | `HTG,USD`                            |
//! | `DECAY_PERIOD_SECS`  | `43200`                              |
//! | `DECAY_MIN_STOCK`    | `1`                                  |

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use crate::domain::value_objects::Currency;
use crate::services::currency::{ExchangeRateTable, HttpRateProvider, LivePair, FALLBACK_USD_HTG};
use crate::services::stock_decay::DecayConfig;
use crate::{EngineError, Result};

pub const DEFAULT_RATE_API_URL: &str = "https://open.er-api.com/v6/latest";

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub rate_api_url: String,
    pub rate_timeout: Duration,
    pub base_currency: Currency,
    pub live_pair: LivePair,
    pub fallback_rate: Decimal,
    pub extra_rates: HashMap<Currency, Decimal>,
    pub display_currencies: Vec<Currency>,
    pub decay: DecayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_api_url: DEFAULT_RATE_API_URL.to_string(),
            rate_timeout: Duration::from_secs(10),
            base_currency: Currency::htg(),
            live_pair: LivePair::default(),
            fallback_rate: FALLBACK_USD_HTG,
            extra_rates: HashMap::new(),
            display_currencies: vec![Currency::htg(), Currency::usd()],
            decay: DecayConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key → value source; missing keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup("RATE_API_URL") { config.rate_api_url = url; }
        if let Some(raw) = lookup("RATE_TIMEOUT_SECS") { config.rate_timeout = Duration::from_secs(parse("RATE_TIMEOUT_SECS", &raw)?); }
        if let Some(raw) = lookup("BASE_CURRENCY") { config.base_currency = currency("BASE_CURRENCY", &raw)?; }
        if let Some(raw) = lookup("LIVE_RATE_FROM") { config.live_pair.from = currency("LIVE_RATE_FROM", &raw)?; }
        if let Some(raw) = lookup("LIVE_RATE_TO") { config.live_pair.to = currency("LIVE_RATE_TO", &raw)?; }
        if let Some(raw) = lookup("FALLBACK_RATE") {
            let rate: Decimal = parse("FALLBACK_RATE", &raw)?;
            if rate <= Decimal::ZERO { return Err(EngineError::Config(format!("FALLBACK_RATE must be positive, got {}", raw))); }
            config.fallback_rate = rate;
        }
        if let Some(raw) = lookup("EXTRA_RATES") { config.extra_rates = rate_list(&raw)?; }
        if let Some(raw) = lookup("DISPLAY_CURRENCIES") {
            config.display_currencies = raw.split(',').filter(|s| !s.trim().is_empty()).map(|s| currency("DISPLAY_CURRENCIES", s)).collect::<Result<_>>()?;
        }
        if let Some(raw) = lookup("DECAY_PERIOD_SECS") {
            config.decay.period = chrono::Duration::try_seconds(parse("DECAY_PERIOD_SECS", &raw)?)
                .ok_or_else(|| EngineError::Config(format!("DECAY_PERIOD_SECS out of range: {}", raw)))?;
        }
        if let Some(raw) = lookup("DECAY_MIN_STOCK") { config.decay.min_stock = parse("DECAY_MIN_STOCK", &raw)?; }
        Ok(config)
    }

    pub fn rate_table(&self) -> Result<ExchangeRateTable> {
        Ok(ExchangeRateTable::new(self.base_currency.clone(), self.extra_rates.clone(), self.live_pair.clone(), self.fallback_rate)?)
    }

    pub fn rate_provider(&self) -> Result<HttpRateProvider> {
        HttpRateProvider::new(&self.rate_api_url, self.rate_timeout).map_err(|e| EngineError::Config(e.to_string()))
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| EngineError::Config(format!("{} has invalid value {:?}", key, raw)))
}

fn currency(key: &str, raw: &str) -> Result<Currency> {
    Currency::new(raw).map_err(|e| EngineError::Config(format!("{}: {}", key, e)))
}

fn rate_list(raw: &str) -> Result<HashMap<Currency, Decimal>> {
    raw.split(',').filter(|s| !s.trim().is_empty()).map(|pair| {
        let (code, rate) = pair.split_once('=').ok_or_else(|| EngineError::Config(format!("EXTRA_RATES entry {:?} is not CODE=RATE", pair)))?;
        Ok((currency("EXTRA_RATES", code)?, parse("EXTRA_RATES", rate)?))
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_currency, Currency::htg());
        assert_eq!(config.fallback_rate, Decimal::new(13082, 2));
        assert_eq!(config.decay.period, chrono::Duration::hours(12));
        assert_eq!(config.display_currencies, vec![Currency::htg(), Currency::usd()]);
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("FALLBACK_RATE", "131.5"),
            ("EXTRA_RATES", "eur=0.0069, CAD=0.0104"),
            ("DISPLAY_CURRENCIES", "USD,EUR"),
            ("DECAY_PERIOD_SECS", "3600"),
            ("DECAY_MIN_STOCK", "2"),
        ])).unwrap();
        assert_eq!(config.fallback_rate, Decimal::new(1315, 1));
        assert_eq!(config.extra_rates.get(&Currency::new("EUR").unwrap()), Some(&Decimal::new(69, 4)));
        assert_eq!(config.display_currencies.len(), 2);
        assert_eq!(config.decay.min_stock, 2);
        assert!(config.rate_table().unwrap().rate(&Currency::new("CAD").unwrap()).is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(EngineConfig::from_lookup(lookup(&[("FALLBACK_RATE", "0")])), Err(EngineError::Config(_))));
        assert!(EngineConfig::from_lookup(lookup(&[("DECAY_MIN_STOCK", "-1")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[("BASE_CURRENCY", "dollars")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[("EXTRA_RATES", "EUR")])).is_err());
        assert!(matches!(EngineConfig::from_lookup(lookup(&[("DECAY_PERIOD_SECS", "9223372036854775807")])), Err(EngineError::Config(_))));
        assert!(matches!(EngineConfig::from_lookup(lookup(&[("DECAY_PERIOD_SECS", "99999999999999999")])), Err(EngineError::Config(_))));
    }
}
