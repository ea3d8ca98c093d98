//! Live exchange rate providers

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use crate::domain::value_objects::{Currency, CurrencyError};

#[derive(Debug, Error)]
pub enum RateFetchError {
    #[error("Rate request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate provider returned status {0}")]
    Status(u16),

    #[error("Rate payload has no usable entry for {0}")]
    MissingRate(String),

    #[error("Rate provider unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Rejected(#[from] CurrencyError),
}

/// Source of `from`→`to` rates (one `from` unit in `to` units).
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, RateFetchError>;
}

#[derive(Debug, Deserialize)]
struct RatesPayload {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Public exchange-rate endpoint: `GET <endpoint>/<FROM>` → `{"rates": {"HTG": 131.2, ...}}`.
#[derive(Clone, Debug)]
pub struct HttpRateProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRateProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RateFetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.into().trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, RateFetchError> {
        let url = format!("{}/{}", self.endpoint, from.code());
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(RateFetchError::Status(resp.status().as_u16()));
        }
        let payload = resp.json::<RatesPayload>().await?;
        parse_rate(&payload, to)
    }
}

fn parse_rate(payload: &RatesPayload, to: &Currency) -> Result<Decimal, RateFetchError> {
    payload.rates.get(to.code())
        .and_then(|r| Decimal::try_from(*r).ok())
        .filter(|r| *r > Decimal::ZERO)
        .ok_or_else(|| RateFetchError::MissingRate(to.code().to_string()))
}
