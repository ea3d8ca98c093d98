//! Category templates
//!
//! Each template lists the attribute fields a seller fills in for a variant
//! and binds the SKU generator for its category.

use std::collections::HashMap;
use std::sync::Arc;
use super::{FieldCodes, NameToken, PlaceholderSkuGenerator, RuleSkuGenerator, SkuGenerator};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantField { pub key: &'static str, pub label: &'static str }

#[derive(Clone, Debug)]
pub struct VariantTemplate {
    pub id: String,
    pub icon: &'static str,
    pub variant_fields: Vec<VariantField>,
    pub default_variant_names: Vec<&'static str>,
    generator: Arc<dyn SkuGenerator>,
}

impl VariantTemplate {
    pub fn new(id: impl Into<String>, icon: &'static str, variant_fields: Vec<VariantField>, default_variant_names: Vec<&'static str>, generator: Arc<dyn SkuGenerator>) -> Self {
        Self { id: id.into(), icon, variant_fields, default_variant_names, generator }
    }

    pub fn generate_sku(&self, variant_name: &str, fields: &HashMap<String, String>) -> String {
        self.generator.generate(variant_name, fields)
    }

    /// Stand-in for unknown template ids.
    pub fn fallback() -> Self {
        Self::new("generic", "📦", vec![], vec![], Arc::new(PlaceholderSkuGenerator))
    }
}

const STORAGE: &[(&str, &str)] = &[("64GB", "64GB"), ("128GB", "128GB"), ("256GB", "256GB"), ("512GB", "512GB"), ("1TB", "1TB")];
const NETWORK: &[(&str, &str)] = &[("Unlocked", "UNL"), ("Verizon", "VZ"), ("AT&T", "ATT"), ("T-Mobile", "TMO"), ("Digicel", "DGC"), ("Natcom", "NAT")];
const GRADE: &[(&str, &str)] = &[("Brand New", "NEW"), ("Like New", "LN"), ("Excellent", "EXC"), ("Good", "GD"), ("Fair", "FR"), ("Refurbished", "REF")];
const PROCESSOR: &[(&str, &str)] = &[("Intel i5", "I5"), ("Intel i7", "I7"), ("Intel i9", "I9"), ("Apple M2", "M2"), ("Apple M3", "M3"), ("Ryzen 7", "R7")];
const RAM: &[(&str, &str)] = &[("8GB", "8G"), ("16GB", "16G"), ("32GB", "32G"), ("64GB", "64G")];
const DISK: &[(&str, &str)] = &[("256GB SSD", "256S"), ("512GB SSD", "512S"), ("1TB SSD", "1TS"), ("2TB SSD", "2TS"), ("1TB HDD", "1TH")];
const APPAREL_SIZE: &[(&str, &str)] = &[("XS", "XS"), ("S", "S"), ("M", "M"), ("L", "L"), ("XL", "XL"), ("XXL", "XXL")];
const MATERIAL: &[(&str, &str)] = &[("Cotton", "COT"), ("Polyester", "POL"), ("Linen", "LIN"), ("Wool", "WOL"), ("Denim", "DNM")];
const SHOE_SIZE: &[(&str, &str)] = &[("38", "38"), ("39", "39"), ("40", "40"), ("41", "41"), ("42", "42"), ("43", "43"), ("44", "44"), ("45", "45")];
const WIDTH: &[(&str, &str)] = &[("Narrow", "N"), ("Standard", "M"), ("Wide", "W")];

fn smartphone() -> VariantTemplate {
    VariantTemplate::new(
        "smartphone",
        "📱",
        vec![
            VariantField { key: "storage", label: "Storage" },
            VariantField { key: "networkStatus", label: "Network" },
            VariantField { key: "productGrade", label: "Condition" },
        ],
        vec!["Midnight", "Starlight", "Blue", "Pink", "Yellow"],
        Arc::new(RuleSkuGenerator {
            prefix: "IPH15",
            name_token: NameToken::Prefix(4),
            fields: vec![
                FieldCodes { field: "storage", codes: STORAGE },
                FieldCodes { field: "networkStatus", codes: NETWORK },
                FieldCodes { field: "productGrade", codes: GRADE },
            ],
            delimiter: '-',
        }),
    )
}

fn laptop() -> VariantTemplate {
    VariantTemplate::new(
        "laptop",
        "💻",
        vec![
            VariantField { key: "processor", label: "Processor" },
            VariantField { key: "ram", label: "Memory" },
            VariantField { key: "storage", label: "Storage" },
        ],
        vec!["Space Gray", "Silver"],
        Arc::new(RuleSkuGenerator {
            prefix: "LPT",
            name_token: NameToken::Initials,
            fields: vec![
                FieldCodes { field: "processor", codes: PROCESSOR },
                FieldCodes { field: "ram", codes: RAM },
                FieldCodes { field: "storage", codes: DISK },
            ],
            delimiter: '-',
        }),
    )
}

fn clothing() -> VariantTemplate {
    VariantTemplate::new(
        "clothing",
        "👕",
        vec![
            VariantField { key: "size", label: "Size" },
            VariantField { key: "material", label: "Material" },
        ],
        vec!["Black", "White", "Navy"],
        Arc::new(RuleSkuGenerator {
            prefix: "CLO",
            name_token: NameToken::Prefix(3),
            fields: vec![
                FieldCodes { field: "size", codes: APPAREL_SIZE },
                FieldCodes { field: "material", codes: MATERIAL },
            ],
            delimiter: '-',
        }),
    )
}

fn shoes() -> VariantTemplate {
    VariantTemplate::new(
        "shoes",
        "👟",
        vec![
            VariantField { key: "size", label: "Size" },
            VariantField { key: "width", label: "Width" },
        ],
        vec!["Black", "White"],
        Arc::new(RuleSkuGenerator {
            prefix: "SHO",
            name_token: NameToken::Prefix(3),
            fields: vec![
                FieldCodes { field: "size", codes: SHOE_SIZE },
                FieldCodes { field: "width", codes: WIDTH },
            ],
            delimiter: '-',
        }),
    )
}

/// Template id → template, with a placeholder template for misses.
#[derive(Clone, Debug)]
pub struct TemplateCatalog {
    templates: HashMap<String, VariantTemplate>,
    fallback: VariantTemplate,
}

impl TemplateCatalog {
    pub fn empty() -> Self { Self { templates: HashMap::new(), fallback: VariantTemplate::fallback() } }

    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for template in [smartphone(), laptop(), clothing(), shoes()] { catalog.insert(template); }
        catalog
    }

    pub fn insert(&mut self, template: VariantTemplate) { self.templates.insert(template.id.clone(), template); }

    pub fn contains(&self, id: &str) -> bool { self.templates.contains_key(id) }

    /// Never fails: unknown ids resolve to the placeholder template.
    pub fn get(&self, id: &str) -> &VariantTemplate {
        self.templates.get(id).unwrap_or_else(|| {
            tracing::debug!(template_id = id, "Unknown template, using fallback");
            &self.fallback
        })
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self { Self::builtin() }
}
