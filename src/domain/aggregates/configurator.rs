//! Configurator Aggregate
//!
//! Tracks the option chosen at each dimension and resolves the effective
//! price and stock. Selecting at dimension `d` drops every deeper selection
//! (those options belonged to the previous branch) and fills the newly exposed
//! dimensions with defaults.

use std::sync::Arc;
use rust_decimal::Decimal;
use serde::Serialize;
use crate::domain::aggregates::hierarchy::{Dimension, VariantDimension, VariantHierarchy, VariantOption};
use crate::domain::events::{DomainEvent, SelectionEvent};

/// Ordered dimension → option id entries, one per exposed dimension, top-down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SelectionPath { entries: Vec<(Dimension, String)> }

impl SelectionPath {
    pub fn new() -> Self { Self::default() }
    pub fn get(&self, dimension: Dimension) -> Option<&str> {
        self.entries.iter().find(|(d, _)| *d == dimension).map(|(_, id)| id.as_str())
    }
    pub fn entries(&self) -> &[(Dimension, String)] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    fn truncate(&mut self, depth: usize) { self.entries.truncate(depth); }
    fn push(&mut self, dimension: Dimension, id: String) { self.entries.push((dimension, id)); }
}

#[derive(Clone, Debug)]
pub struct Configurator {
    hierarchy: Arc<VariantHierarchy>,
    path: SelectionPath,
    events: Vec<DomainEvent>,
}

impl Configurator {
    /// Starts a configurator with defaults already applied.
    pub fn new(hierarchy: Arc<VariantHierarchy>) -> Self {
        let mut configurator = Self { hierarchy, path: SelectionPath::new(), events: vec![] };
        configurator.auto_select_defaults();
        configurator
    }

    pub fn hierarchy(&self) -> &VariantHierarchy { &self.hierarchy }
    pub fn selection(&self) -> &SelectionPath { &self.path }

    /// Sets `dimension` to `option_id`, clears deeper entries and re-applies
    /// defaults below. Unknown ids or dimensions not exposed by the current
    /// path leave the selection untouched and return `false`.
    pub fn select_option(&mut self, dimension: Dimension, option_id: &str) -> bool {
        let hierarchy = Arc::clone(&self.hierarchy);
        let Some((depth, exposed)) = locate(&hierarchy, &self.path, dimension) else {
            tracing::debug!(%dimension, option_id, "Dimension not exposed by current selection");
            return false;
        };
        let Some(option) = exposed.find_selectable(option_id) else {
            tracing::debug!(%dimension, option_id, "Option not found");
            return false;
        };

        let cleared = self.path.len().saturating_sub(depth + 1);
        self.path.truncate(depth);
        self.path.push(dimension, option.id.clone());
        if cleared > 0 {
            self.raise_event(DomainEvent::Selection(SelectionEvent::Invalidated { from: dimension, cleared }));
        }
        self.raise_event(DomainEvent::Selection(SelectionEvent::OptionSelected { dimension, option_id: option.id.clone() }));
        tracing::debug!(%dimension, option_id, cleared, "Option selected");

        self.auto_select_defaults();
        true
    }

    /// Fills every unselected exposed dimension, top-down, with its default
    /// option. Entries that no longer resolve are replaced. Returns how many
    /// defaults were applied; a second call returns 0.
    pub fn auto_select_defaults(&mut self) -> usize {
        let hierarchy = Arc::clone(&self.hierarchy);
        let mut current = hierarchy.root();
        let mut depth = 0;
        let mut applied = 0;

        while let Some(dimension) = current {
            let chosen = match self.path.entries().get(depth) {
                Some((key, id)) if *key == dimension.key => dimension.find_selectable(id),
                _ => None,
            };
            let option = match chosen {
                Some(option) => option,
                None => {
                    let Some(default) = dimension.default_option() else { break };
                    self.path.truncate(depth);
                    self.path.push(dimension.key, default.id.clone());
                    self.raise_event(DomainEvent::Selection(SelectionEvent::DefaultApplied { dimension: dimension.key, option_id: default.id.clone() }));
                    applied += 1;
                    default
                }
            };
            current = option.child_dimension();
            depth += 1;
        }

        self.path.truncate(depth);
        applied
    }

    /// Selected options from the root down to the deepest one.
    pub fn selected_options(&self) -> Vec<&VariantOption> {
        let mut selected = Vec::with_capacity(self.path.len());
        let mut current = self.hierarchy.root();
        for (key, id) in self.path.entries() {
            let Some(dimension) = current.filter(|d| d.key == *key) else { break };
            let Some(option) = dimension.find_selectable(id) else { break };
            selected.push(option);
            current = option.child_dimension();
        }
        selected
    }

    pub fn deepest_selected(&self) -> Option<&VariantOption> { self.selected_options().pop() }

    /// Price of the deepest selected option that carries one, else the product price, else zero.
    pub fn effective_price(&self) -> Decimal {
        self.selected_options().iter().rev().find_map(|o| o.price)
            .or(self.hierarchy.base_price)
            .unwrap_or(Decimal::ZERO)
    }

    /// Stock resolved the same way as [`Configurator::effective_price`].
    pub fn effective_stock(&self) -> u32 {
        self.selected_options().iter().rev().find_map(|o| o.stock)
            .or(self.hierarchy.base_stock)
            .unwrap_or(0)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

/// Depth and option list of `dimension` as exposed by the selections above it.
fn locate<'h>(hierarchy: &'h VariantHierarchy, path: &SelectionPath, dimension: Dimension) -> Option<(usize, &'h VariantDimension)> {
    let mut current = hierarchy.root();
    let mut depth = 0;
    loop {
        let exposed = current?;
        if exposed.key == dimension { return Some((depth, exposed)); }
        let (key, id) = path.entries().get(depth)?;
        if *key != exposed.key { return None; }
        current = exposed.find_selectable(id)?.child_dimension();
        depth += 1;
    }
}
