//! Importing diagrams saved as mxGraph XML.
//!
//! Accepts a bare `mxGraphModel` document or one wrapped in the usual
//! `mxfile`/`diagram` envelope. Component parameters live on a wrapper
//! element around the `mxCell` (`<object label=".." vn_kv="20">`); every
//! wrapper attribute other than `id` and `label` lands in the attribute bag
//! in document order.

use crate::components::ComponentKind;
use crate::style;
use crate::types::{AttributeBag, Cell, CellKind, CellValue, Diagram, Geometry};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use thiserror::Error;

/// Why an mxGraph document could not be read.
#[derive(Error, Debug)]
pub enum ImportError {
    /// XML that does not parse
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Attribute that does not parse
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    /// Document has no `mxGraphModel`
    #[error("no mxGraphModel element found")]
    NoModel,

    /// Diagram content is deflate-compressed
    #[error("compressed diagram content is not supported; save uncompressed XML")]
    Compressed,

    /// Geometry attribute that is not a number
    #[error("attribute {attribute} has non-numeric value {value:?}")]
    Number {
        /// Attribute name
        attribute: String,
        /// Text found instead of a number
        value: String,
    },
}

/// Attributes carried by a wrapper element, waiting for its `mxCell`.
#[derive(Debug, Default)]
struct Wrapper {
    tag: String,
    id: Option<String>,
    label: Option<String>,
    bag: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct PendingCell {
    id: Option<String>,
    style: String,
    value: Option<String>,
    vertex: bool,
    edge: bool,
    source: Option<String>,
    target: Option<String>,
    geometry: Option<Geometry>,
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn read_attributes(e: &BytesStart) -> Result<Vec<(String, String)>, ImportError> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn number(attrs: &[(String, String)], key: &str) -> Result<f32, ImportError> {
    match attrs.iter().find(|(k, _)| k == key) {
        None => Ok(0.0),
        Some((_, value)) => value.trim().parse().map_err(|_| ImportError::Number {
            attribute: key.to_string(),
            value: value.clone(),
        }),
    }
}

fn begin_cell(e: &BytesStart) -> Result<PendingCell, ImportError> {
    let mut cell = PendingCell::default();
    for (key, value) in read_attributes(e)? {
        match key.as_str() {
            "id" => cell.id = Some(value),
            "style" => cell.style = value,
            "value" => cell.value = Some(value),
            "vertex" => cell.vertex = value == "1",
            "edge" => cell.edge = value == "1",
            "source" => cell.source = Some(value),
            "target" => cell.target = Some(value),
            _ => {}
        }
    }
    Ok(cell)
}

/// Reads `mxGeometry` and converts the top-left origin to a centre.
fn read_geometry(e: &BytesStart) -> Result<Option<Geometry>, ImportError> {
    let attrs = read_attributes(e)?;
    if attrs.iter().any(|(k, v)| k == "as" && v != "geometry") {
        return Ok(None);
    }
    let x = number(&attrs, "x")?;
    let y = number(&attrs, "y")?;
    let width = number(&attrs, "width")?;
    let height = number(&attrs, "height")?;
    Ok(Some(Geometry {
        x: x + width / 2.0,
        y: y + height / 2.0,
        width,
        height,
    }))
}

fn finish_cell(pending: PendingCell, wrapper: Option<&Wrapper>) -> Option<Cell> {
    // Layer cells are neither vertices nor edges.
    if !pending.vertex && !pending.edge {
        return None;
    }
    let id = wrapper
        .and_then(|w| w.id.clone())
        .or(pending.id)
        .unwrap_or_else(crate::types::new_cell_id);
    let label = wrapper
        .and_then(|w| w.label.clone())
        .or(pending.value)
        .unwrap_or_default();
    let attributes: AttributeBag = wrapper
        .map(|w| w.bag.iter().cloned().collect())
        .unwrap_or_default();
    let value = (!label.is_empty() || !attributes.is_empty() || wrapper.is_some())
        .then_some(CellValue { label, attributes });

    let kind = if pending.edge {
        CellKind::Edge {
            source: pending.source,
            target: pending.target,
        }
    } else {
        let mut geometry = pending.geometry.unwrap_or(Geometry {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        });
        if geometry.width <= 0.0 || geometry.height <= 0.0 {
            let kind = style::component_tag(&style::parse_style(&pending.style))
                .and_then(ComponentKind::from_tag);
            let (width, height) = Geometry::default_size(kind);
            geometry.width = width;
            geometry.height = height;
        }
        CellKind::Vertex { geometry }
    };

    Some(Cell {
        id,
        style: pending.style,
        value,
        kind,
    })
}

/// Parses an mxGraph XML document into a [`Diagram`].
///
/// Cells keep their document order, which is also the order the
/// flattening pass will visit them in.
pub fn parse_mxgraph(xml: &str) -> Result<Diagram, ImportError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut diagram = Diagram::new();
    let mut saw_model = false;
    let mut in_diagram = false;
    let mut in_root = false;
    let mut wrapper: Option<Wrapper> = None;
    let mut pending: Option<PendingCell> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let tag = local_name(e);
                match tag.as_str() {
                    "diagram" => in_diagram = true,
                    "mxGraphModel" => saw_model = true,
                    "root" if saw_model => in_root = true,
                    "mxCell" if in_root => pending = Some(begin_cell(e)?),
                    "mxGeometry" => {
                        if let Some(cell) = pending.as_mut() {
                            if cell.geometry.is_none() {
                                cell.geometry = read_geometry(e)?;
                            }
                        }
                    }
                    _ if in_root && pending.is_none() => {
                        let mut w = Wrapper {
                            tag: tag.clone(),
                            ..Wrapper::default()
                        };
                        for (key, value) in read_attributes(e)? {
                            match key.as_str() {
                                "id" => w.id = Some(value),
                                "label" => w.label = Some(value),
                                _ => w.bag.push((key, value)),
                            }
                        }
                        wrapper = Some(w);
                    }
                    _ => {}
                }
            }
            Event::Empty(ref e) => {
                let tag = local_name(e);
                match tag.as_str() {
                    "mxGraphModel" => saw_model = true,
                    "mxCell" if in_root => {
                        let cell = begin_cell(e)?;
                        if let Some(cell) = finish_cell(cell, wrapper.as_ref()) {
                            diagram.add_cell(cell);
                        }
                    }
                    "mxGeometry" => {
                        if let Some(cell) = pending.as_mut() {
                            if cell.geometry.is_none() {
                                cell.geometry = read_geometry(e)?;
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match tag.as_str() {
                    "diagram" => in_diagram = false,
                    "root" => in_root = false,
                    "mxCell" => {
                        if let Some(cell) = pending.take() {
                            if let Some(cell) = finish_cell(cell, wrapper.as_ref()) {
                                diagram.add_cell(cell);
                            }
                        }
                    }
                    _ => {
                        if pending.is_none() && wrapper.as_ref().is_some_and(|w| w.tag == tag) {
                            wrapper = None;
                        }
                    }
                }
            }
            Event::Text(_) if in_diagram && !saw_model => return Err(ImportError::Compressed),
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_model {
        return Err(ImportError::NoModel);
    }
    log::info!("imported {} cells from mxGraph XML", diagram.cells.len());
    Ok(diagram)
}

/// Reads and parses an mxGraph XML file.
pub fn load_mxgraph(path: &Path) -> crate::Result<Diagram> {
    let xml = std::fs::read_to_string(path)?;
    Ok(parse_mxgraph(&xml)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network;

    const SAMPLE: &str = r#"<mxfile host="app">
  <diagram id="d" name="Page-1">
    <mxGraphModel dx="800" dy="600" grid="1">
      <root>
        <mxCell id="0"/>
        <mxCell id="1" parent="0"/>
        <object label="Grid" id="g" vm_pu="1.02" s_sc_max_mva="1000">
          <mxCell style="shapeELXXX=External Grid;html=1" vertex="1" parent="1">
            <mxGeometry x="100" y="40" width="60" height="40" as="geometry"/>
          </mxCell>
        </object>
        <object label="Bus 1" id="b1" vn_kv="20">
          <mxCell style="shapeELXXX=Bus" vertex="1" parent="1">
            <mxGeometry x="50" y="140" width="160" height="10" as="geometry"/>
          </mxCell>
        </object>
        <mxCell id="w1" style="shapeELXXX=NotEditableLine;endArrow=none" edge="1" parent="1" source="g" target="b1">
          <mxGeometry relative="1" as="geometry">
            <mxPoint x="1" y="2" as="sourcePoint"/>
          </mxGeometry>
        </mxCell>
        <mxCell id="note" value="Feeder &amp; notes" style="text;html=1" vertex="1" parent="1">
          <mxGeometry x="300" y="300" width="80" height="20" as="geometry"/>
        </mxCell>
      </root>
    </mxGraphModel>
  </diagram>
</mxfile>"#;

    #[test]
    fn imports_wrapped_cells_with_attributes() {
        let diagram = parse_mxgraph(SAMPLE).unwrap();
        let ids: Vec<_> = diagram.cells.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["g", "b1", "w1", "note"]);

        let grid = diagram.cell("g").unwrap();
        assert_eq!(grid.label(), "Grid");
        assert_eq!(grid.component_kind(), Some(ComponentKind::ExternalGrid));
        let attrs: Vec<_> = grid.attributes().unwrap().iter().collect();
        assert_eq!(attrs, vec![("vm_pu", "1.02"), ("s_sc_max_mva", "1000")]);

        let geometry = grid.geometry().unwrap();
        assert_eq!((geometry.x, geometry.y), (130.0, 60.0));
    }

    #[test]
    fn edges_and_escaped_values_survive() {
        let diagram = parse_mxgraph(SAMPLE).unwrap();
        let wire = diagram.cell("w1").unwrap();
        assert_eq!(wire.terminals(), Some((Some(&"g".to_string()), Some(&"b1".to_string()))));
        assert_eq!(diagram.cell("note").unwrap().label(), "Feeder & notes");
    }

    #[test]
    fn imported_diagram_flattens() {
        let diagram = parse_mxgraph(SAMPLE).unwrap();
        let payload = network::flatten(&diagram);
        assert_eq!(payload.len(), 2);
        let grid = &payload.records()[0];
        assert_eq!(grid.typ, "External Grid0");
        assert_eq!(grid.bus("bus"), Some("b1"));
        assert_eq!(grid.attribute("vm_pu"), Some("1.02"));
    }

    #[test]
    fn bare_model_is_accepted() {
        let xml = r#"<mxGraphModel><root><mxCell id="0"/><mxCell id="1" parent="0"/>
            <mxCell id="b" style="shapeELXXX=Bus" vertex="1"><mxGeometry width="0" height="0" as="geometry"/></mxCell>
        </root></mxGraphModel>"#;
        let diagram = parse_mxgraph(xml).unwrap();
        assert_eq!(diagram.cells.len(), 1);
        let geometry = diagram.cells[0].geometry().unwrap();
        assert_eq!(geometry.width, crate::constants::BUS_WIDTH);
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            parse_mxgraph("<mxfile><diagram>7VjbbtswDP0aP</diagram></mxfile>"),
            Err(ImportError::Compressed)
        ));
        assert!(matches!(parse_mxgraph("<svg></svg>"), Err(ImportError::NoModel)));
        assert!(parse_mxgraph("<mxGraphModel><root></mxGraphModel>").is_err());
        let bad_number = r#"<mxGraphModel><root><mxCell id="v" vertex="1"><mxGeometry x="abc" as="geometry"/></mxCell></root></mxGraphModel>"#;
        assert!(matches!(
            parse_mxgraph(bad_number),
            Err(ImportError::Number { .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.drawio");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_mxgraph(&path).unwrap().cells.len(), 4);
        assert!(load_mxgraph(&dir.path().join("missing.xml")).is_err());
    }
}
