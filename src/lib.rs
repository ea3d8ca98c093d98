//! OpenSASE Variants
//!
//! Variant configuration and pricing resolution for the storefront.
//!
//! ## Features
//! - Cascading option selection (color → storage → network → condition)
//! - Deepest-selection price and stock resolution
//! - Time-based stock urgency signalling
//! - Live exchange rates with fallback, conversion and formatting
//! - Template-driven SKU generation and seller price edits

pub mod config;
pub mod domain;
pub mod services;
pub mod telemetry;

use thiserror::Error;
use crate::domain::value_objects::{CurrencyError, SkuError};
use crate::services::seller::StoreError;

pub use config::EngineConfig;
pub use domain::aggregates::{Configurator, Dimension, PriceRange, ProductRecord, SelectionPath, VariantDimension, VariantHierarchy, VariantOption};
pub use domain::value_objects::{Currency, Money, Sku};
pub use services::{ConfiguratorSession, CurrencyService, PriceEditor, StockDecaySimulator, StockSignal, TemplateCatalog};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid SKU: {0}")]
    InvalidSku(#[from] SkuError),

    #[error("Currency error: {0}")]
    Currency(#[from] CurrencyError),

    #[error("Backend write failed: {0}")]
    Backend(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
