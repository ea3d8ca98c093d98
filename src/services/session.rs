//! Configurator session
//!
//! Owns the selection state and decay records for one product view. The
//! current selection path is activated in the decay simulator whenever the
//! selection settles. Decay is keyed by the full path since option ids may
//! repeat across branches.

use std::sync::Arc;
use rust_decimal::Decimal;
use uuid::Uuid;
use crate::domain::aggregates::{Configurator, Dimension, SelectionPath, VariantHierarchy};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Currency, CurrencyError};
use crate::services::currency::{CurrencyService, RateProvider};
use crate::services::stock_decay::{DecayConfig, StockDecaySimulator};

/// Displayed count at or below which stock is flagged as low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockSignal { SoldOut, Low(u32), InStock(u32) }

impl StockSignal {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Self::SoldOut,
            n if n <= LOW_STOCK_THRESHOLD => Self::Low(n),
            n => Self::InStock(n),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::SoldOut => "Out of Stock".to_string(),
            Self::Low(n) => format!("Only {} left - order soon!", n),
            Self::InStock(_) => "In Stock".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ConfiguratorSession {
    id: Uuid,
    configurator: Configurator,
    decay: StockDecaySimulator,
}

impl ConfiguratorSession {
    pub fn new(hierarchy: Arc<VariantHierarchy>, decay: DecayConfig) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, product_id = %hierarchy.product_id, "Configurator opened");
        let mut session = Self { id, configurator: Configurator::new(hierarchy), decay: StockDecaySimulator::new(decay) };
        session.activate_current();
        session
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn configurator(&self) -> &Configurator { &self.configurator }
    pub fn selection(&self) -> &SelectionPath { self.configurator.selection() }
    pub fn decay(&self) -> &StockDecaySimulator { &self.decay }

    pub fn select_option(&mut self, dimension: Dimension, option_id: &str) -> bool {
        let changed = self.configurator.select_option(dimension, option_id);
        if changed { self.activate_current(); }
        changed
    }

    pub fn effective_price(&self) -> Decimal { self.configurator.effective_price() }

    /// Real stock of the current selection, before decay.
    pub fn effective_stock(&self) -> u32 { self.configurator.effective_stock() }

    /// Stock shown to the shopper.
    pub fn displayed_stock(&self) -> u32 {
        let real = self.configurator.effective_stock();
        match self.decay_key() {
            Some(key) => self.decay.current_stock(&key, real),
            None => real,
        }
    }

    /// Decay record key of the current selection, e.g. `black/128`.
    pub fn decay_key(&self) -> Option<String> {
        let entries = self.selection().entries();
        if entries.is_empty() { return None; }
        Some(entries.iter().map(|(_, id)| id.as_str()).collect::<Vec<_>>().join("/"))
    }

    pub fn stock_signal(&self) -> StockSignal { StockSignal::from_count(self.displayed_stock()) }

    pub fn formatted_price<P: RateProvider>(&self, currency_service: &CurrencyService<P>, currency: &Currency) -> Result<String, CurrencyError> {
        currency_service.format(self.effective_price(), currency)
    }

    /// Switches to another product: selection and decay state start over.
    pub fn load_product(&mut self, hierarchy: Arc<VariantHierarchy>) {
        let cleared = self.decay.reset_all_variants();
        tracing::info!(session_id = %self.id, product_id = %hierarchy.product_id, cleared, "Product changed");
        self.configurator = Configurator::new(hierarchy);
        self.activate_current();
    }

    pub fn reset_decay(&mut self) -> usize { self.decay.reset_all_variants() }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { self.configurator.take_events() }

    fn activate_current(&mut self) {
        let real = self.configurator.effective_stock();
        if let Some(key) = self.decay_key() {
            self.decay.activate_variant(&key, real);
        }
    }
}
