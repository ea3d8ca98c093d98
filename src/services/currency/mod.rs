//! Currency Conversion Service
//!
//! Rates sit in a single-slot cache: readers clone the current
//! `Arc<ExchangeRateTable>`, the fetch completion handler swaps in a new one.
//! Concurrent fetches race and the last one to complete wins. Reads may be
//! stale, never torn.

pub mod provider;
pub mod rates;

use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::{Arc, RwLock};
use crate::domain::value_objects::{Currency, CurrencyError, Money};

pub use provider::{HttpRateProvider, RateFetchError, RateProvider};
pub use rates::{ExchangeRateTable, LivePair, FALLBACK_USD_HTG};

pub struct CurrencyService<P> {
    provider: P,
    table: RwLock<Arc<ExchangeRateTable>>,
}

impl<P: RateProvider> CurrencyService<P> {
    pub fn new(provider: P, table: ExchangeRateTable) -> Self {
        Self { provider, table: RwLock::new(Arc::new(table)) }
    }

    /// Current snapshot.
    pub fn table(&self) -> Arc<ExchangeRateTable> {
        match self.table.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn replace(&self, next: ExchangeRateTable) {
        match self.table.write() {
            Ok(mut guard) => *guard = Arc::new(next),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(next),
        }
    }

    pub fn base_currency(&self) -> Currency { self.table().base().clone() }

    /// Fetches the live pair rate and installs it. On any failure the
    /// fallback rate is installed instead. Returns the rate now in effect.
    pub async fn fetch_live_rate(&self) -> Decimal {
        let current = self.table();
        let pair = current.live_pair().clone();
        let fetched = self.provider.fetch_rate(&pair.from, &pair.to).await
            .and_then(|rate| current.with_live_rate(rate).map_err(RateFetchError::from));
        let next = match fetched {
            Ok(next) => {
                tracing::info!(from = %pair.from, to = %pair.to, rate = %next.pair_rate(), "Live exchange rate fetched");
                next
            }
            Err(e) => {
                tracing::warn!(from = %pair.from, to = %pair.to, fallback = %current.fallback_rate(), error = %e, "Live rate unavailable, using fallback");
                current.with_fallback()
            }
        };
        let rate = next.pair_rate();
        self.replace(next);
        rate
    }

    /// Converts `amount` between two currencies. The live pair converts
    /// directly by its rate; everything else goes through the base currency.
    pub fn convert(&self, amount: Decimal, from: &Currency, to: &Currency) -> Result<Decimal, CurrencyError> {
        if from == to { return Ok(amount); }
        let table = self.table();
        let pair = table.live_pair();
        if pair.covers(from, to) {
            let rate = table.pair_rate();
            return Ok(if from == &pair.from { amount * rate } else { amount / rate });
        }
        let in_base = amount / table.rate(from)?;
        Ok(in_base * table.rate(to)?)
    }

    /// Converts a base-currency amount into `currency`.
    pub fn to_money(&self, amount: Decimal, currency: &Currency) -> Result<Money, CurrencyError> {
        let base = self.base_currency();
        let converted = self.convert(amount, &base, currency)?;
        Ok(Money::new(converted.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero), currency.clone()))
    }

    /// Converts a base-currency amount and renders it, e.g. `$12.50`.
    pub fn format(&self, amount: Decimal, currency: &Currency) -> Result<String, CurrencyError> {
        Ok(self.to_money(amount, currency)?.to_string())
    }
}
