//! Aggregates module
pub mod hierarchy;
pub mod configurator;

pub use hierarchy::{Dimension, OptionFlags, OptionRecord, PriceRange, ProductRecord, VariantDimension, VariantHierarchy, VariantOption};
pub use configurator::{Configurator, SelectionPath};
