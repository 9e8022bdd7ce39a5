//! Flattening of the diagram graph into the solver's record collection.
//!
//! # Module Organization
//!
//! - `adapter` - the read-only [`DiagramSource`] surface and its [`Diagram`] view
//! - `attributes` - sparse attribute reads
//! - `connectivity` - bus resolution from incident edges
//! - `collector` - per-kind classification and record accumulation
//! - `payload` - the positional, canonical-order wire form

mod adapter;
mod attributes;
mod collector;
mod connectivity;
mod payload;

pub use adapter::{DiagramSource, DiagramView};
pub use attributes::{fields_for, read_attributes, AttributeField};
pub use collector::Collector;
pub use connectivity::{adjacent_buses, neighbours, resolve, BusRefs};
pub use payload::{ComponentRecord, NetworkPayload};

use crate::types::Diagram;

/// Flattens any [`DiagramSource`] in one synchronous pass.
///
/// Cells are visited in collection order; each recognised component lands
/// in its kind's list, and the lists are concatenated in canonical order.
pub fn flatten_source<S: DiagramSource + ?Sized>(source: &S) -> NetworkPayload {
    let mut collector = Collector::new();
    let ids = source.cell_ids();
    for id in &ids {
        collector.visit(source, id);
    }
    log::debug!(
        "flattened {} cells: {} untagged, {} non-component",
        ids.len(),
        collector.skipped(),
        collector.unknown()
    );
    collector.finish()
}

/// Flattens a [`Diagram`].
pub fn flatten(diagram: &Diagram) -> NetworkPayload {
    flatten_source(&DiagramView::new(diagram))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentKind;
    use crate::types::Cell;

    const WIRE: &str = "shapeELXXX=NotEditableLine";

    fn component(diagram: &mut Diagram, kind: ComponentKind, id: &str, name: &str) {
        diagram.add_cell(Cell::component(kind, name, (0.0, 0.0)).with_id(id));
    }

    fn grid_with_line() -> Diagram {
        let mut d = Diagram::new();
        // Line first in the collection to show it still serializes last.
        d.add_cell(
            Cell::edge("shapeELXXX=Line", Some("b1".into()), Some("b2".into()))
                .with_id("line")
                .with_attribute("length_km", "2"),
        );
        component(&mut d, ComponentKind::Bus, "b1", "Bus 1");
        component(&mut d, ComponentKind::ExternalGrid, "grid", "Grid");
        component(&mut d, ComponentKind::Bus, "b2", "Bus 2");
        d.connect(WIRE, "grid", "b1").unwrap();
        d
    }

    #[test]
    fn ext_grid_two_buses_and_line() {
        let payload = flatten(&grid_with_line());
        let typs: Vec<_> = payload.records().iter().map(|r| r.typ.as_str()).collect();
        assert_eq!(typs, vec!["External Grid0", "Bus0", "Bus1", "Line0"]);

        let line = &payload.records()[3];
        assert_eq!(line.bus("from_bus"), Some("b1"));
        assert_eq!(line.bus("to_bus"), Some("b2"));
        assert_eq!(line.attribute("length_km"), Some("2"));
        assert_eq!(payload.records()[0].bus("bus"), Some("b1"));
    }

    #[test]
    fn untagged_and_sentinel_cells_are_excluded() {
        let mut d = grid_with_line();
        d.add_cell(
            Cell::component(ComponentKind::Load, "annotation", (0.0, 0.0))
                .with_id("note"),
        );
        if let Some(note) = d.cell_mut("note") {
            note.style = "text;html=1".into();
        }
        let payload = flatten(&d);
        assert_eq!(payload.len(), 4);
        assert!(payload.records().iter().all(|r| r.id != "note"));
        // The connector edge carries the sentinel and never shows up either.
        assert!(payload.records().iter().all(|r| !r.typ.starts_with("NotEditable")));
    }

    #[test]
    fn unknown_tags_are_dropped_silently() {
        let mut d = Diagram::new();
        d.add_cell(
            Cell::component(ComponentKind::Bus, "b", (0.0, 0.0))
                .with_id("result"),
        );
        if let Some(cell) = d.cell_mut("result") {
            cell.style = "shapeELXXX=Result".into();
        }
        assert!(flatten(&d).is_empty());
    }

    #[test]
    fn labels_count_per_kind_across_interleaving() {
        let mut d = Diagram::new();
        let kinds = [
            ComponentKind::Load,
            ComponentKind::Bus,
            ComponentKind::Load,
            ComponentKind::Generator,
            ComponentKind::Load,
            ComponentKind::Bus,
        ];
        for (n, kind) in kinds.iter().enumerate() {
            component(&mut d, *kind, &format!("c{n}"), "");
        }
        let payload = flatten(&d);
        let loads: Vec<_> = payload.of_kind(ComponentKind::Load).map(|r| r.typ.clone()).collect();
        assert_eq!(loads, vec!["Load0", "Load1", "Load2"]);
        let load_ids: Vec<_> = payload.of_kind(ComponentKind::Load).map(|r| r.id.clone()).collect();
        assert_eq!(load_ids, vec!["c0", "c2", "c4"]);
        let buses: Vec<_> = payload.of_kind(ComponentKind::Bus).map(|r| r.typ.clone()).collect();
        assert_eq!(buses, vec!["Bus0", "Bus1"]);
    }

    #[test]
    fn canonical_order_ignores_traversal_order() {
        let mut d = Diagram::new();
        for (n, kind) in ComponentKind::ALL.iter().rev().enumerate() {
            component(&mut d, *kind, &format!("c{n}"), "");
        }
        let payload = flatten(&d);
        let kinds: Vec<_> = payload.records().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, ComponentKind::ALL.to_vec());
        assert_eq!(payload.records()[0].typ, "Simulation Parameters0");
    }

    #[test]
    fn name_falls_back_to_id() {
        let mut d = Diagram::new();
        component(&mut d, ComponentKind::Bus, "bus-7", "  ");
        let payload = flatten(&d);
        assert_eq!(payload.records()[0].name, "bus-7");
    }

    #[test]
    fn missing_optional_attribute_is_not_null() {
        let mut d = Diagram::new();
        d.add_cell(
            Cell::component(ComponentKind::Transformer, "T", (0.0, 0.0))
                .with_id("t")
                .with_attribute("sn_mva", "40"),
        );
        let json = flatten(&d).to_json().unwrap();
        assert!(!json.contains("vector_group"));
        assert!(json.contains(r#""sn_mva":"40""#));
        assert!(json.contains(r#""hv_bus":null"#));
    }

    #[test]
    fn flattening_is_deterministic() {
        let mut d = grid_with_line();
        component(&mut d, ComponentKind::Transformer, "t", "T1");
        d.connect(WIRE, "t", "b2").unwrap();
        d.connect(WIRE, "b1", "t").unwrap();
        let first = flatten(&d).to_json().unwrap();
        let second = flatten(&d).to_json().unwrap();
        assert_eq!(first, second);
    }

    struct Fixed;

    impl DiagramSource for Fixed {
        fn cell_ids(&self) -> Vec<&str> {
            vec!["b", "g"]
        }
        fn style_of(&self, id: &str) -> Option<&str> {
            match id {
                "b" => Some("shapeELXXX=Bus"),
                "g" => Some("shapeELXXX=Generator"),
                "e" => Some(""),
                _ => None,
            }
        }
        fn label_of(&self, _id: &str) -> Option<&str> {
            None
        }
        fn attribute_of(&self, id: &str, name: &str) -> Option<&str> {
            (id == "g" && name == "p_mw").then_some("5")
        }
        fn terminals_of(&self, id: &str) -> Option<(Option<&str>, Option<&str>)> {
            (id == "e").then_some((Some("g"), Some("b")))
        }
        fn incident_edges(&self, id: &str) -> Vec<&str> {
            match id {
                "b" | "g" => vec!["e"],
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn works_against_any_source() {
        let payload = flatten_source(&Fixed);
        let json = payload.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"0":{"typ":"Generator0","name":"g","id":"g","bus":"b","p_mw":"5"},"1":{"typ":"Bus0","name":"b","id":"b"}}"#
        );
    }
}
