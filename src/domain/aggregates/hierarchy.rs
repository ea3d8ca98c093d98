//! Variant Hierarchy
//!
//! A product's configurable axes form a fixed-depth option tree:
//! color → storage → network → condition. Each option may carry the option
//! list of the next dimension. A product may omit dimensions at the tail (or,
//! for flat catalogs, start at storage) but never reorders them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension { Color, Storage, Network, Condition }

impl Dimension {
    pub const ORDER: [Dimension; 4] = [Self::Color, Self::Storage, Self::Network, Self::Condition];

    pub fn key(&self) -> &'static str {
        match self { Self::Color => "color", Self::Storage => "storage", Self::Network => "network", Self::Condition => "condition" }
    }

    /// The dimension nested directly under this one.
    pub fn next(&self) -> Option<Dimension> {
        match self { Self::Color => Some(Self::Storage), Self::Storage => Some(Self::Network), Self::Network => Some(Self::Condition), Self::Condition => None }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.key()) }
}

impl FromStr for Dimension {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER.into_iter().find(|d| d.key().eq_ignore_ascii_case(s.trim())).ok_or_else(|| format!("unknown dimension: {}", s))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionFlags { pub bestseller: bool, pub limited: bool }

/// One choice within a dimension.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariantOption {
    pub id: String,
    pub display_name: String,
    /// Absolute price in the base currency.
    pub price: Option<Decimal>,
    /// Real backend stock.
    pub stock: Option<u32>,
    pub active: bool,
    pub flags: OptionFlags,
    pub children: Option<VariantDimension>,
}

impl VariantOption {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: display_name.into(), price: None, stock: None, active: true, flags: OptionFlags::default(), children: None }
    }
    pub fn with_price(mut self, price: Decimal) -> Self { self.price = Some(price); self }
    pub fn with_stock(mut self, stock: u32) -> Self { self.stock = Some(stock); self }
    pub fn with_children(mut self, children: VariantDimension) -> Self { self.children = Some(children); self }
    pub fn with_flags(mut self, flags: OptionFlags) -> Self { self.flags = flags; self }
    pub fn inactive(mut self) -> Self { self.active = false; self }

    /// Own stock when the catalog sets one, otherwise the sum over selectable children.
    pub fn available_stock(&self) -> u32 {
        match (self.stock, self.child_dimension()) {
            (Some(stock), _) => stock,
            (None, Some(children)) => children.selectable().map(|o| o.available_stock()).fold(0u32, u32::saturating_add),
            (None, None) => 0,
        }
    }

    /// The next dimension, or `None` when it has nothing to select.
    pub fn child_dimension(&self) -> Option<&VariantDimension> {
        self.children.as_ref().filter(|d| d.is_applicable())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariantDimension {
    pub key: Dimension,
    pub options: Vec<VariantOption>,
}

impl VariantDimension {
    pub fn new(key: Dimension, options: Vec<VariantOption>) -> Self { Self { key, options } }

    /// Lookup including inactive options.
    pub fn find(&self, id: &str) -> Option<&VariantOption> { self.options.iter().find(|o| o.id == id) }

    pub fn find_selectable(&self, id: &str) -> Option<&VariantOption> { self.selectable().find(|o| o.id == id) }

    pub fn selectable(&self) -> impl Iterator<Item = &VariantOption> { self.options.iter().filter(|o| o.active) }

    pub fn is_applicable(&self) -> bool { self.selectable().next().is_some() }

    /// First in-stock option, else the first one declared.
    pub fn default_option(&self) -> Option<&VariantOption> {
        self.selectable().find(|o| o.available_stock() > 0).or_else(|| self.selectable().next())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriceRange { pub min: Decimal, pub max: Decimal }

impl PriceRange {
    pub fn is_single(&self) -> bool { self.min == self.max }
}

/// Read model for one product view. Never mutated once loaded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariantHierarchy {
    pub product_id: String,
    pub name: String,
    pub base_price: Option<Decimal>,
    pub base_stock: Option<u32>,
    root: Option<VariantDimension>,
}

impl VariantHierarchy {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { product_id: product_id.into(), name: name.into(), base_price: None, base_stock: None, root: None }
    }
    pub fn with_base(mut self, price: Option<Decimal>, stock: Option<u32>) -> Self { self.base_price = price; self.base_stock = stock; self }
    pub fn with_root(mut self, root: VariantDimension) -> Self { self.root = Some(root); self }

    /// Top dimension, skipped when it has no selectable options.
    pub fn root(&self) -> Option<&VariantDimension> { self.root.as_ref().filter(|d| d.is_applicable()) }

    /// Top dimension as declared, inactive options included.
    pub fn declared_root(&self) -> Option<&VariantDimension> { self.root.as_ref() }

    /// Min/max over every priced active option, falling back to the product price.
    pub fn price_range(&self) -> Option<PriceRange> {
        let mut prices = Vec::new();
        if let Some(root) = self.root.as_ref() { collect_prices(root, &mut prices); }
        let min = prices.iter().min().copied();
        let max = prices.iter().max().copied();
        match (min, max) {
            (Some(min), Some(max)) => Some(PriceRange { min, max }),
            _ => self.base_price.map(|p| PriceRange { min: p, max: p }),
        }
    }

    /// Builds the tree from a catalog record, accepting both the nested
    /// color-level shape and the flat `storage_variants` fallback.
    pub fn from_record(record: ProductRecord) -> Self {
        let root = if !record.variants.is_empty() {
            build_dimension(record.variants, Dimension::Color)
        } else {
            build_dimension(record.storage_variants, Dimension::Storage)
        };
        tracing::debug!(product_id = %record.id, root = ?root.as_ref().map(|d| d.key), "Loaded variant hierarchy");
        Self { product_id: record.id, name: record.name, base_price: record.price, base_stock: record.stock, root }
    }
}

fn collect_prices(dimension: &VariantDimension, out: &mut Vec<Decimal>) {
    for option in dimension.selectable() {
        if let Some(price) = option.price { out.push(price); }
        if let Some(children) = option.children.as_ref() { collect_prices(children, out); }
    }
}

fn build_dimension(records: Vec<OptionRecord>, key: Dimension) -> Option<VariantDimension> {
    if records.is_empty() { return None; }
    let options = records.into_iter().map(|r| r.into_option(key)).collect();
    Some(VariantDimension::new(key, options))
}

// =============================================================================
// Inbound catalog records
// =============================================================================

/// Product record as delivered by the catalog backend.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub variants: Vec<OptionRecord>,
    #[serde(default)]
    pub storage_variants: Vec<OptionRecord>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRecord {
    pub id: String,
    #[serde(default, alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub limited: bool,
    #[serde(default)]
    pub storage_options: Vec<OptionRecord>,
    #[serde(default)]
    pub network_options: Vec<OptionRecord>,
    #[serde(default)]
    pub condition_options: Vec<OptionRecord>,
}

fn default_active() -> bool { true }

impl OptionRecord {
    fn into_option(mut self, key: Dimension) -> VariantOption {
        let children = match key.next() {
            Some(Dimension::Storage) => build_dimension(std::mem::take(&mut self.storage_options), Dimension::Storage),
            Some(Dimension::Network) => build_dimension(std::mem::take(&mut self.network_options), Dimension::Network),
            Some(Dimension::Condition) => build_dimension(std::mem::take(&mut self.condition_options), Dimension::Condition),
            _ => None,
        };
        VariantOption {
            id: self.id,
            display_name: self.display_name,
            price: self.price,
            stock: self.stock,
            active: self.active,
            flags: OptionFlags { bestseller: self.bestseller, limited: self.limited },
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(key: Dimension, options: Vec<VariantOption>) -> VariantDimension { VariantDimension::new(key, options) }

    #[test]
    fn test_dimension_order() {
        assert_eq!(Dimension::Color.next(), Some(Dimension::Storage));
        assert_eq!(Dimension::Condition.next(), None);
        assert_eq!("Network".parse::<Dimension>(), Ok(Dimension::Network));
        assert!("size".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_default_prefers_in_stock() {
        let d = dim(Dimension::Storage, vec![
            VariantOption::new("s1", "64GB").with_stock(0),
            VariantOption::new("s2", "128GB").with_stock(3),
        ]);
        assert_eq!(d.default_option().unwrap().id, "s2");
    }

    #[test]
    fn test_default_falls_back_to_first() {
        let d = dim(Dimension::Storage, vec![
            VariantOption::new("s1", "64GB").with_stock(0),
            VariantOption::new("s2", "128GB"),
        ]);
        assert_eq!(d.default_option().unwrap().id, "s1");
    }

    #[test]
    fn test_inactive_options_knowable_not_selectable() {
        let d = dim(Dimension::Color, vec![
            VariantOption::new("red", "Red").with_stock(5).inactive(),
            VariantOption::new("blue", "Blue"),
        ]);
        assert!(d.find("red").is_some());
        assert!(d.find_selectable("red").is_none());
        assert_eq!(d.default_option().unwrap().id, "blue");
    }

    #[test]
    fn test_available_stock_sums_children() {
        let color = VariantOption::new("black", "Black").with_children(dim(Dimension::Storage, vec![
            VariantOption::new("a", "64GB").with_stock(2),
            VariantOption::new("b", "128GB").with_stock(4),
            VariantOption::new("c", "256GB").with_stock(9).inactive(),
        ]));
        assert_eq!(color.available_stock(), 6);
    }

    #[test]
    fn test_empty_child_dimension_not_applicable() {
        let option = VariantOption::new("x", "X").with_children(dim(Dimension::Network, vec![]));
        assert!(option.child_dimension().is_none());
    }

    #[test]
    fn test_from_nested_record() {
        let record: ProductRecord = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "iPhone 15",
            "price": 799,
            "variants": [{
                "id": "midnight",
                "name": "Midnight",
                "storageOptions": [{
                    "id": "128",
                    "name": "128GB",
                    "price": 829.5,
                    "networkOptions": [{ "id": "vz", "name": "Verizon", "stock": 4 }]
                }]
            }]
        })).unwrap();
        let h = VariantHierarchy::from_record(record);
        let root = h.root().unwrap();
        assert_eq!(root.key, Dimension::Color);
        let storage = root.find("midnight").unwrap().child_dimension().unwrap();
        assert_eq!(storage.key, Dimension::Storage);
        assert_eq!(storage.options[0].price, Some(Decimal::new(8295, 1)));
        let network = storage.options[0].child_dimension().unwrap();
        assert_eq!(network.key, Dimension::Network);
        assert_eq!(network.options[0].stock, Some(4));
    }

    #[test]
    fn test_from_flat_storage_record() {
        let record: ProductRecord = serde_json::from_value(serde_json::json!({
            "id": "p2",
            "price": 100,
            "storage_variants": [{ "id": "s1", "name": "64GB", "price": 120 }, { "id": "s2", "name": "256GB", "price": 180, "active": false }]
        })).unwrap();
        let h = VariantHierarchy::from_record(record);
        assert_eq!(h.root().unwrap().key, Dimension::Storage);
        assert_eq!(h.price_range(), Some(PriceRange { min: Decimal::new(120, 0), max: Decimal::new(120, 0) }));
    }

    #[test]
    fn test_price_range_falls_back_to_base() {
        let h = VariantHierarchy::new("p3", "Bare").with_base(Some(Decimal::new(50, 0)), None);
        assert!(h.root().is_none());
        assert!(h.price_range().unwrap().is_single());
    }
}
