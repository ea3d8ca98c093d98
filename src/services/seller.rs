//! Seller tooling: variant price edits and SKU drafting
//!
//! Price edits are validated before any write. The local variant list only
//! changes once the backend store acknowledges the write; failures are
//! reported to the caller and never retried here.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationError};
use crate::domain::aggregates::{PriceRange, VariantDimension, VariantHierarchy};
use crate::domain::events::{DomainEvent, VariantEvent};
use crate::domain::value_objects::Sku;
use crate::services::sku::VariantTemplate;
use crate::{EngineError, Result};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Backend persistence of edited variant prices.
#[async_trait]
pub trait VariantPriceStore: Send + Sync {
    async fn update_variant_price(&self, variant_id: &str, new_price: Decimal) -> std::result::Result<(), StoreError>;
}

#[derive(Debug, Clone, Validate)]
pub struct PriceEdit {
    #[validate(length(min = 1))]
    pub variant_id: String,
    #[validate(custom = "non_negative")]
    pub new_price: Decimal,
}

fn non_negative(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if *price < Decimal::ZERO { return Err(ValidationError::new("negative_price")); }
    Ok(())
}

impl PriceEdit {
    /// Parses the seller's raw input; non-numeric and negative values are rejected.
    pub fn parse(variant_id: impl Into<String>, raw: &str) -> Result<Self> {
        let new_price = Decimal::from_str(raw.trim()).map_err(|_| EngineError::InvalidPrice(raw.to_string()))?;
        let edit = Self { variant_id: variant_id.into(), new_price };
        edit.validate()?;
        Ok(edit)
    }
}

/// One row of the seller's variant list, inactive variants included.
#[derive(Clone, Debug, PartialEq)]
pub struct SellerVariant {
    pub id: String,
    pub name: String,
    pub price: Option<Decimal>,
    pub stock: u32,
    pub active: bool,
    pub sku: Option<Sku>,
}

impl SellerVariant {
    /// Every option of the hierarchy, depth-first.
    pub fn flatten(hierarchy: &VariantHierarchy) -> Vec<SellerVariant> {
        fn walk(dimension: &VariantDimension, out: &mut Vec<SellerVariant>) {
            for option in &dimension.options {
                out.push(SellerVariant {
                    id: option.id.clone(),
                    name: option.display_name.clone(),
                    price: option.price,
                    stock: option.available_stock(),
                    active: option.active,
                    sku: None,
                });
                if let Some(children) = option.children.as_ref() { walk(children, out); }
            }
        }
        let mut out = Vec::new();
        if let Some(root) = hierarchy.declared_root() { walk(root, &mut out); }
        out
    }
}

pub struct PriceEditor<S> {
    store: S,
    variants: Vec<SellerVariant>,
    events: Vec<DomainEvent>,
}

impl<S: VariantPriceStore> PriceEditor<S> {
    pub fn new(store: S, variants: Vec<SellerVariant>) -> Self { Self { store, variants, events: vec![] } }

    pub fn variants(&self) -> &[SellerVariant] { &self.variants }

    pub fn active_variants(&self) -> impl Iterator<Item = &SellerVariant> { self.variants.iter().filter(|v| v.active) }

    /// Min/max price over active variants.
    pub fn price_range(&self) -> Option<PriceRange> {
        let prices = self.active_variants().filter_map(|v| v.price);
        prices.fold(None, |range, p| match range {
            None => Some(PriceRange { min: p, max: p }),
            Some(PriceRange { min, max }) => Some(PriceRange { min: min.min(p), max: max.max(p) }),
        })
    }

    /// Validates, writes through the store, then commits locally and returns
    /// the refreshed price range.
    pub async fn apply_price_edit(&mut self, variant_id: &str, raw_price: &str) -> Result<Option<PriceRange>> {
        let edit = PriceEdit::parse(variant_id, raw_price)?;
        let index = self.variants.iter().position(|v| v.id == edit.variant_id)
            .ok_or_else(|| EngineError::VariantNotFound(edit.variant_id.clone()))?;

        if let Err(e) = self.store.update_variant_price(&edit.variant_id, edit.new_price).await {
            tracing::warn!(variant_id = %edit.variant_id, error = %e, "Price update rejected");
            return Err(e.into());
        }

        let old_price = self.variants[index].price.replace(edit.new_price);
        tracing::info!(variant_id = %edit.variant_id, new_price = %edit.new_price, "Variant price updated");
        self.raise_event(DomainEvent::Variant(VariantEvent::PriceUpdated { variant_id: edit.variant_id, old_price, new_price: edit.new_price }));
        Ok(self.price_range())
    }

    pub fn assign_sku(&mut self, variant_id: &str, sku: Sku) -> Result<()> {
        let variant = self.variants.iter_mut().find(|v| v.id == variant_id)
            .ok_or_else(|| EngineError::VariantNotFound(variant_id.to_string()))?;
        variant.sku = Some(sku.clone());
        self.raise_event(DomainEvent::Variant(VariantEvent::SkuAssigned { variant_id: variant_id.to_string(), sku: sku.to_string() }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

/// A variant being created or edited by the seller.
#[derive(Clone, Debug, Default)]
pub struct VariantDraft {
    pub name: String,
    pub fields: HashMap<String, String>,
    manual_sku: Option<Sku>,
}

impl VariantDraft {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), ..Self::default() } }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Manual SKU replacing the generated one.
    pub fn override_sku(&mut self, raw: &str) -> Result<&Sku> {
        let sku = Sku::new(raw)?;
        Ok(&*self.manual_sku.insert(sku))
    }

    pub fn clear_override(&mut self) { self.manual_sku = None; }

    pub fn generated_sku(&self, template: &VariantTemplate) -> String { template.generate_sku(&self.name, &self.fields) }

    pub fn resolve_sku(&self, template: &VariantTemplate) -> Result<Sku> {
        match &self.manual_sku {
            Some(sku) => Ok(sku.clone()),
            None => Ok(Sku::new(self.generated_sku(template))?),
        }
    }
}
