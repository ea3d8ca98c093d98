//! Exchange rate table

use rust_decimal::Decimal;
use std::collections::HashMap;
use crate::domain::value_objects::{Currency, CurrencyError};

/// USD→HTG rate used while the live fetch is pending or after it fails.
pub const FALLBACK_USD_HTG: Decimal = Decimal::from_parts(13082, 0, 0, false, 2);

/// Pair covered by the live feed: one `from` unit is worth `live_rate` of `to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LivePair { pub from: Currency, pub to: Currency }

impl LivePair {
    pub fn covers(&self, a: &Currency, b: &Currency) -> bool {
        (a == &self.from && b == &self.to) || (a == &self.to && b == &self.from)
    }
}

impl Default for LivePair {
    fn default() -> Self { Self { from: Currency::usd(), to: Currency::htg() } }
}

/// Immutable snapshot of rates relative to `base` (base units × rate = target units).
/// The rate of `live_pair.from` is derived as `rates[to] / live_rate`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeRateTable {
    base: Currency,
    rates: HashMap<Currency, Decimal>,
    live_pair: LivePair,
    live_rate: Option<Decimal>,
    fallback_rate: Decimal,
}

impl ExchangeRateTable {
    /// Builds a table using the fallback until a live rate arrives.
    /// Non-positive static rates are dropped; a non-positive fallback is rejected.
    pub fn new(base: Currency, static_rates: HashMap<Currency, Decimal>, live_pair: LivePair, fallback_rate: Decimal) -> Result<Self, CurrencyError> {
        Ok(Self::assemble(base, static_rates, live_pair, positive(fallback_rate)?))
    }

    fn assemble(base: Currency, static_rates: HashMap<Currency, Decimal>, live_pair: LivePair, fallback_rate: Decimal) -> Self {
        let mut rates: HashMap<Currency, Decimal> = static_rates.into_iter().filter(|(_, r)| *r > Decimal::ZERO).collect();
        rates.insert(base.clone(), Decimal::ONE);
        let table = Self { base, rates, live_pair, live_rate: None, fallback_rate };
        table.derive(fallback_rate)
    }

    pub fn base(&self) -> &Currency { &self.base }
    pub fn live_pair(&self) -> &LivePair { &self.live_pair }
    pub fn live_rate(&self) -> Option<Decimal> { self.live_rate }
    pub fn fallback_rate(&self) -> Decimal { self.fallback_rate }
    pub fn is_live(&self) -> bool { self.live_rate.is_some() }

    /// Live rate if one was fetched, else the fallback.
    pub fn pair_rate(&self) -> Decimal { self.live_rate.unwrap_or(self.fallback_rate) }

    pub fn rate(&self, currency: &Currency) -> Result<Decimal, CurrencyError> {
        self.rates.get(currency).copied().ok_or_else(|| CurrencyError::UnknownCurrency(currency.code().to_string()))
    }

    pub fn currencies(&self) -> impl Iterator<Item = &Currency> { self.rates.keys() }

    pub fn with_live_rate(&self, rate: Decimal) -> Result<Self, CurrencyError> {
        let rate = positive(rate)?;
        let mut next = self.derive(rate);
        next.live_rate = Some(rate);
        Ok(next)
    }

    pub fn with_fallback(&self) -> Self {
        let mut next = self.derive(self.fallback_rate);
        next.live_rate = None;
        next
    }

    fn derive(&self, pair_rate: Decimal) -> Self {
        let mut next = self.clone();
        if self.live_pair.from == self.base {
            next.rates.insert(self.live_pair.to.clone(), pair_rate);
        } else if let Some(secondary) = self.rates.get(&self.live_pair.to).copied() {
            next.rates.insert(self.live_pair.from.clone(), secondary / pair_rate);
        }
        next
    }
}

fn positive(rate: Decimal) -> Result<Decimal, CurrencyError> {
    if rate > Decimal::ZERO { Ok(rate) } else { Err(CurrencyError::InvalidRate(rate.to_string())) }
}

impl Default for ExchangeRateTable {
    fn default() -> Self { Self::assemble(Currency::htg(), HashMap::new(), LivePair::default(), FALLBACK_USD_HTG) }
}
