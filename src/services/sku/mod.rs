//! SKU Generation Engine
//!
//! SKUs are a pure function of the variant name and its attribute values:
//! `PREFIX-NAME-FIELD1-FIELD2...`. Collisions with existing SKUs are the
//! seller workflow's concern, not the generator's.

pub mod templates;

use std::collections::HashMap;
use std::fmt;

pub use templates::{TemplateCatalog, VariantField, VariantTemplate};

/// Token for values missing from a field's lookup table.
pub const UNKNOWN_TOKEN: &str = "UNK";
/// SKU produced for unknown template ids.
pub const PLACEHOLDER_SKU: &str = "SKU-PENDING";

pub trait SkuGenerator: Send + Sync + fmt::Debug {
    fn generate(&self, variant_name: &str, fields: &HashMap<String, String>) -> String;
}

/// How the variant display name becomes a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameToken {
    /// First `n` letters, e.g. `Midnight` → `MIDN`.
    Prefix(usize),
    /// First letter of each word, e.g. `Space Gray` → `SG`.
    Initials,
}

impl NameToken {
    pub fn derive(&self, name: &str) -> String {
        let token: String = match self {
            Self::Prefix(n) => name.chars().filter(|c| c.is_alphabetic()).take(*n).collect(),
            Self::Initials => name.split_whitespace().filter_map(|w| w.chars().find(|c| c.is_alphabetic())).collect(),
        };
        if token.is_empty() { UNKNOWN_TOKEN.to_string() } else { token.to_uppercase() }
    }
}

/// Closed abbreviation table for one attribute field.
#[derive(Clone, Debug)]
pub struct FieldCodes {
    pub field: &'static str,
    pub codes: &'static [(&'static str, &'static str)],
}

impl FieldCodes {
    /// Code for a present value; unrecognized values encode as `UNK`.
    pub fn encode(&self, value: &str) -> &'static str {
        let value = value.trim();
        self.codes.iter()
            .find(|(raw, _)| raw.eq_ignore_ascii_case(value))
            .map(|(_, code)| *code)
            .unwrap_or(UNKNOWN_TOKEN)
    }
}

#[derive(Clone, Debug)]
pub struct RuleSkuGenerator {
    pub prefix: &'static str,
    pub name_token: NameToken,
    pub fields: Vec<FieldCodes>,
    pub delimiter: char,
}

impl SkuGenerator for RuleSkuGenerator {
    fn generate(&self, variant_name: &str, fields: &HashMap<String, String>) -> String {
        let mut tokens = Vec::with_capacity(self.fields.len() + 2);
        tokens.push(self.prefix.to_string());
        tokens.push(self.name_token.derive(variant_name));
        // Fields the variant does not have (dimensions it omits) are skipped.
        let present = self.fields.iter().filter_map(|codes| {
            fields.get(codes.field).filter(|v| !v.trim().is_empty()).map(|v| codes.encode(v))
        });
        tokens.extend(present.map(str::to_string));
        tokens.join(self.delimiter.to_string().as_str())
    }
}

/// Degenerate generator for templates that could not be resolved.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderSkuGenerator;

impl SkuGenerator for PlaceholderSkuGenerator {
    fn generate(&self, _variant_name: &str, _fields: &HashMap<String, String>) -> String { PLACEHOLDER_SKU.to_string() }
}
