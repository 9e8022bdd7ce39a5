//! # GridSketch
//!
//! A schematic editor for electrical networks. Components such as buses,
//! lines, transformers, generators and loads are placed on a canvas and
//! wired together; the drawing is then flattened into a component list
//! and handed to an external load-flow solver.
//!
//! ## Features
//! - Placing, moving, wiring and deleting components with undo/redo
//! - Per-component parameter dialogs with validation
//! - Flattening a drawing into the solver payload
//! - Importing mxGraph XML drawings
//! - Saving and loading diagrams as JSON
//! - Running the solver over HTTP and showing its response

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod components;
pub mod constants;
pub mod dialog;
pub mod error;
pub mod examples;
pub mod mxgraph;
pub mod network;
pub mod schema;
pub mod solver;
pub mod style;
pub mod types;
mod ui;

pub use error::{Error, Result};
pub use ui::GridSketchApp;

/// Runs the editor window.
///
/// File dialogs and solver requests run on a tokio runtime that lives as
/// long as the window. State saved by a previous session is restored.
///
/// # Example
///
/// ```no_run
/// fn main() -> gridsketch::Result<()> {
///     gridsketch::run_app()
/// }
/// ```
pub fn run_app() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "GridSketch",
        options,
        Box::new(|cc| {
            let app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| match GridSketchApp::from_json(&json) {
                    Ok(app) => Some(app),
                    Err(err) => {
                        log::warn!("Discarding saved app state: {err}");
                        None
                    }
                })
                .unwrap_or_default();
            Ok(Box::new(app))
        }),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentKind;
    use crate::types::{Cell, Diagram};

    #[test]
    fn test_diagram_default() {
        let diagram = Diagram::default();
        assert!(diagram.cells.is_empty());
        assert!(network::flatten(&diagram).is_empty());
    }

    #[test]
    fn test_component_cell_creation() {
        let cell = Cell::component(ComponentKind::Bus, "B1", (10.0, 20.0));
        assert!(cell.is_vertex());
        assert_eq!(cell.label(), "B1");
        assert_eq!(cell.component_kind(), Some(ComponentKind::Bus));
    }
}
