//! Classifying cells by style tag and collecting per-kind records.

use super::adapter::DiagramSource;
use super::attributes::{fields_for, read_attributes, AttributeField};
use super::connectivity;
use super::payload::{ComponentRecord, NetworkPayload};
use crate::components::ComponentKind;
use crate::style::{self, StyleCache};

/// Accumulates records per component kind during one flattening pass.
pub struct Collector {
    lists: Vec<Vec<ComponentRecord>>,
    fields: Vec<Vec<AttributeField>>,
    cache: StyleCache,
    skipped: usize,
    unknown: usize,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    /// Creates an empty collector with one list per component kind.
    pub fn new() -> Self {
        Self {
            lists: vec![Vec::new(); ComponentKind::ALL.len()],
            fields: ComponentKind::ALL.iter().map(|&kind| fields_for(kind)).collect(),
            cache: StyleCache::new(),
            skipped: 0,
            unknown: 0,
        }
    }

    /// Classifies the cell's style tag, if it has a recognised one.
    pub fn classify<S: DiagramSource + ?Sized>(
        &mut self,
        source: &S,
        cell: &str,
    ) -> Option<ComponentKind> {
        let raw = source.style_of(cell)?;
        let Some(tag) = style::component_tag(self.cache.get(raw)) else {
            self.skipped += 1;
            return None;
        };
        let kind = ComponentKind::from_tag(tag);
        if kind.is_none() {
            log::debug!("ignoring cell {cell} with non-component tag {tag:?}");
            self.unknown += 1;
        }
        kind
    }

    /// Classifies one cell and appends its record to the matching list.
    pub fn visit<S: DiagramSource + ?Sized>(&mut self, source: &S, cell: &str) {
        let Some(kind) = self.classify(source, cell) else {
            return;
        };

        let list = &self.lists[kind.order_index()];
        let typ = format!("{}{}", kind.record_label(), list.len());
        let name = match source.label_of(cell) {
            Some(label) if !label.trim().is_empty() => label.to_string(),
            _ => cell.to_string(),
        };
        let buses = connectivity::resolve(source, &mut self.cache, cell, kind.connectivity());
        if buses.iter().any(|(_, bus)| bus.is_none()) {
            log::debug!("{typ} ({cell}) has unresolved bus references");
        }
        let attributes = read_attributes(source, cell, &self.fields[kind.order_index()]);

        self.lists[kind.order_index()].push(ComponentRecord {
            kind,
            typ,
            id: cell.to_string(),
            name,
            buses,
            attributes,
        });
    }

    /// Number of cells skipped for lacking a component tag.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of cells whose tag names no component kind.
    pub fn unknown(&self) -> usize {
        self.unknown
    }

    /// Concatenates all lists in canonical kind order.
    pub fn finish(self) -> NetworkPayload {
        NetworkPayload::from_records(self.lists.into_iter().flatten().collect())
    }
}
