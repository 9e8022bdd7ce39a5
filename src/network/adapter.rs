//! Narrow read-only view of a diagram, as needed by the flattening pass.
//!
//! The flattening code only ever asks for a cell's style, label, named
//! attributes, edge terminals and incident edges. [`DiagramSource`] is that
//! surface; [`DiagramView`] implements it over a [`Diagram`] with the
//! id index and incidence lists built once up front.

use crate::types::{CellKind, Diagram};
use std::collections::HashMap;

/// What the flattening pass needs to know about a diagram.
pub trait DiagramSource {
    /// All cell ids in collection order.
    fn cell_ids(&self) -> Vec<&str>;

    /// Raw style string of a cell.
    fn style_of(&self, id: &str) -> Option<&str>;

    /// Display label of a cell.
    fn label_of(&self, id: &str) -> Option<&str>;

    /// Named attribute from the cell's value object.
    fn attribute_of(&self, id: &str, name: &str) -> Option<&str>;

    /// Source and target of an edge; `None` when `id` is not an edge.
    fn terminals_of(&self, id: &str) -> Option<(Option<&str>, Option<&str>)>;

    /// Edges touching a cell, in incidence order.
    fn incident_edges(&self, id: &str) -> Vec<&str>;
}

/// Indexed view over a [`Diagram`].
pub struct DiagramView<'a> {
    diagram: &'a Diagram,
    index: HashMap<&'a str, usize>,
    incidence: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> DiagramView<'a> {
    /// Indexes cells by id and edges by endpoint.
    pub fn new(diagram: &'a Diagram) -> Self {
        let mut index = HashMap::with_capacity(diagram.cells.len());
        let mut incidence: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for (position, cell) in diagram.cells.iter().enumerate() {
            index.entry(cell.id.as_str()).or_insert(position);
            if let CellKind::Edge { source, target } = &cell.kind {
                for end in [source, target].into_iter().flatten() {
                    let edges = incidence.entry(end.as_str()).or_default();
                    // A self-loop is still one incident edge.
                    if edges.last() != Some(&cell.id.as_str()) {
                        edges.push(cell.id.as_str());
                    }
                }
            }
        }
        Self {
            diagram,
            index,
            incidence,
        }
    }

    fn cell(&self, id: &str) -> Option<&'a crate::types::Cell> {
        self.index.get(id).map(|&position| &self.diagram.cells[position])
    }
}

impl DiagramSource for DiagramView<'_> {
    fn cell_ids(&self) -> Vec<&str> {
        self.diagram.cells.iter().map(|cell| cell.id.as_str()).collect()
    }

    fn style_of(&self, id: &str) -> Option<&str> {
        self.cell(id).map(|cell| cell.style.as_str())
    }

    fn label_of(&self, id: &str) -> Option<&str> {
        self.cell(id)
            .and_then(|cell| cell.value.as_ref())
            .map(|value| value.label.as_str())
    }

    fn attribute_of(&self, id: &str, name: &str) -> Option<&str> {
        self.cell(id)
            .and_then(|cell| cell.attributes())
            .and_then(|bag| bag.get(name))
    }

    fn terminals_of(&self, id: &str) -> Option<(Option<&str>, Option<&str>)> {
        self.cell(id)
            .and_then(|cell| cell.terminals())
            .map(|(source, target)| (source.map(String::as_str), target.map(String::as_str)))
    }

    fn incident_edges(&self, id: &str) -> Vec<&str> {
        self.incidence.get(id).cloned().unwrap_or_default()
    }
}
