//! Domain events
use crate::domain::aggregates::Dimension;
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Selection(SelectionEvent),
    Variant(VariantEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectionEvent {
    /// The shopper picked an option explicitly.
    OptionSelected { dimension: Dimension, option_id: String },
    /// A default was filled in for an unselected dimension.
    DefaultApplied { dimension: Dimension, option_id: String },
    /// Deeper selections dropped after a parent changed.
    Invalidated { from: Dimension, cleared: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum VariantEvent {
    PriceUpdated { variant_id: String, old_price: Option<Decimal>, new_price: Decimal },
    SkuAssigned { variant_id: String, sku: String },
}
