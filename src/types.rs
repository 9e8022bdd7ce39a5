//! Core data types for the diagram model.
//!
//! A [`Diagram`] is an ordered collection of [`Cell`]s. Vertices carry a
//! geometry, edges carry two optional terminal references. Either kind can
//! hold a [`CellValue`] with a display label and the [`AttributeBag`] of
//! electrical parameters the dialogs edit.

use crate::components::ComponentKind;
use crate::constants::{BUS_HEIGHT, BUS_WIDTH, NODE_HEIGHT, NODE_WIDTH, STYLE_TAG_KEY};
use crate::style;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a cell within a diagram.
pub type CellId = String;

/// Generates a fresh cell id.
pub fn new_cell_id() -> CellId {
    Uuid::new_v4().simple().to_string()
}

/// Ordered name/value string pairs; the persisted parameter set of a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeBag {
    entries: Vec<(String, String)>,
}

impl AttributeBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the named attribute, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the named attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets an attribute, keeping the position of an existing entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterates attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = AttributeBag::new();
        for (name, value) in iter {
            bag.set(name, value);
        }
        bag
    }
}

/// The value object hanging off a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    /// Display label shown on the canvas
    pub label: String,
    /// Electrical parameters
    #[serde(default)]
    pub attributes: AttributeBag,
}

/// Position and size of a vertex in world units; `(x, y)` is the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Centre x
    pub x: f32,
    /// Centre y
    pub y: f32,
    /// Full width
    pub width: f32,
    /// Full height
    pub height: f32,
}

impl Geometry {
    /// Geometry centred on `position` with the given size.
    pub fn centered(position: (f32, f32), size: (f32, f32)) -> Self {
        Self {
            x: position.0,
            y: position.1,
            width: size.0,
            height: size.1,
        }
    }

    /// Default size for a vertex of the given kind.
    pub fn default_size(kind: Option<ComponentKind>) -> (f32, f32) {
        match kind {
            Some(kind) if kind.is_bus_like() => (BUS_WIDTH, BUS_HEIGHT),
            _ => (NODE_WIDTH, NODE_HEIGHT),
        }
    }
}

/// Whether a cell is a vertex or an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellKind {
    /// A node placed on the canvas
    Vertex {
        /// Placement and size
        geometry: Geometry,
    },
    /// A connection between two cells; either end may be dangling
    Edge {
        /// Cell the edge starts at
        source: Option<CellId>,
        /// Cell the edge ends at
        target: Option<CellId>,
    },
}

/// A node or edge in the diagram graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Unique within the diagram
    pub id: CellId,
    /// Raw `key=value;...` style string
    #[serde(default)]
    pub style: String,
    /// Label and attributes; `None` for plain shapes
    #[serde(default)]
    pub value: Option<CellValue>,
    /// Vertex geometry or edge endpoints
    pub kind: CellKind,
}

impl Cell {
    /// Creates a vertex of the given component kind centred at `position`.
    pub fn component(kind: ComponentKind, label: impl Into<String>, position: (f32, f32)) -> Self {
        Self {
            id: new_cell_id(),
            style: style::with_style_value("", STYLE_TAG_KEY, kind.tag()),
            value: Some(CellValue {
                label: label.into(),
                attributes: AttributeBag::new(),
            }),
            kind: CellKind::Vertex {
                geometry: Geometry::centered(position, Geometry::default_size(Some(kind))),
            },
        }
    }

    /// Creates an edge between two cells with the given style.
    pub fn edge(style: impl Into<String>, source: Option<CellId>, target: Option<CellId>) -> Self {
        Self {
            id: new_cell_id(),
            style: style.into(),
            value: None,
            kind: CellKind::Edge { source, target },
        }
    }

    /// Replaces the generated id; handy when mirroring an existing document.
    pub fn with_id(mut self, id: impl Into<CellId>) -> Self {
        self.id = id.into();
        self
    }

    /// Adds or overrides one attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.value
            .get_or_insert_with(CellValue::default)
            .attributes
            .set(name, value);
        self
    }

    /// Whether the cell is a vertex.
    pub fn is_vertex(&self) -> bool {
        matches!(self.kind, CellKind::Vertex { .. })
    }

    /// Whether the cell is an edge.
    pub fn is_edge(&self) -> bool {
        matches!(self.kind, CellKind::Edge { .. })
    }

    /// Geometry of a vertex; `None` for edges.
    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            CellKind::Vertex { geometry } => Some(geometry),
            CellKind::Edge { .. } => None,
        }
    }

    /// Mutable geometry of a vertex.
    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        match &mut self.kind {
            CellKind::Vertex { geometry } => Some(geometry),
            CellKind::Edge { .. } => None,
        }
    }

    /// Source and target of an edge; `None` for vertices.
    pub fn terminals(&self) -> Option<(Option<&CellId>, Option<&CellId>)> {
        match &self.kind {
            CellKind::Edge { source, target } => Some((source.as_ref(), target.as_ref())),
            CellKind::Vertex { .. } => None,
        }
    }

    /// Whether this edge has `id` at either end.
    pub fn touches(&self, id: &str) -> bool {
        match self.terminals() {
            Some((source, target)) => {
                source.map(String::as_str) == Some(id) || target.map(String::as_str) == Some(id)
            }
            None => false,
        }
    }

    /// Display label, falling back to an empty string.
    pub fn label(&self) -> &str {
        self.value.as_ref().map(|v| v.label.as_str()).unwrap_or("")
    }

    /// Attribute bag, if the cell has a value object.
    pub fn attributes(&self) -> Option<&AttributeBag> {
        self.value.as_ref().map(|v| &v.attributes)
    }

    /// Component kind named by the style tag, if any.
    pub fn component_kind(&self) -> Option<ComponentKind> {
        let map = style::parse_style(&self.style);
        style::component_tag(&map).and_then(ComponentKind::from_tag)
    }
}

/// The diagram graph: cells in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    /// Cells in insertion order; later cells draw on top
    pub cells: Vec<Cell>,
}

impl Diagram {
    /// Creates an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the diagram to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a diagram from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Looks up a cell by id.
    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    /// Mutable lookup by id.
    pub fn cell_mut(&mut self, id: &str) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|cell| cell.id == id)
    }

    /// Appends a cell and returns its id.
    pub fn add_cell(&mut self, cell: Cell) -> CellId {
        let id = cell.id.clone();
        self.cells.push(cell);
        id
    }

    /// Connects two existing cells with an edge of the given style.
    ///
    /// # Returns
    ///
    /// The new edge's id, or an error message if either end doesn't exist.
    pub fn connect(&mut self, style: &str, source: &str, target: &str) -> Result<CellId, String> {
        if self.cell(source).is_none() {
            return Err("Source cell does not exist".to_string());
        }
        if self.cell(target).is_none() {
            return Err("Target cell does not exist".to_string());
        }
        Ok(self.add_cell(Cell::edge(
            style,
            Some(source.to_string()),
            Some(target.to_string()),
        )))
    }

    /// Removes a cell together with every edge touching it.
    ///
    /// # Returns
    ///
    /// The removed cells with their former indices, in ascending index
    /// order, so the removal can be reverted exactly. Empty if the cell
    /// didn't exist.
    pub fn remove_cell(&mut self, id: &str) -> Vec<(usize, Cell)> {
        self.remove_cells(&[id.to_string()])
    }

    /// Removes several cells and every edge touching any of them.
    pub fn remove_cells(&mut self, ids: &[CellId]) -> Vec<(usize, Cell)> {
        if !ids.iter().any(|id| self.cell(id).is_some()) {
            return Vec::new();
        }
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.cells.len());
        for (index, cell) in self.cells.drain(..).enumerate() {
            if ids.iter().any(|id| cell.id == *id || cell.touches(id)) {
                removed.push((index, cell));
            } else {
                kept.push(cell);
            }
        }
        self.cells = kept;
        removed
    }

    /// Reinserts cells removed by [`Diagram::remove_cell`].
    pub fn restore_cells(&mut self, removed: &[(usize, Cell)]) {
        for (index, cell) in removed {
            let at = (*index).min(self.cells.len());
            self.cells.insert(at, cell.clone());
        }
    }

    /// Vertices in collection order.
    pub fn vertices(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_vertex())
    }

    /// Edges in collection order.
    pub fn edges(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_edge())
    }
}
