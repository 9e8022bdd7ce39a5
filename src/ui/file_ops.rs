//! File operations: saving and loading diagrams, importing mxGraph XML and
//! exporting the flattened payload.
//!
//! Dialogs and disk I/O run on tokio tasks; results come back over the
//! file channel and are applied on the next frame.

use super::state::{FileOperationResult, GridSketchApp, PendingFileOperation};
use crate::examples::{self, ExampleKind};
use crate::mxgraph;
use crate::network;
use crate::types::Diagram;
use eframe::egui;
use std::sync::mpsc::Sender;

fn report(sender: &Option<Sender<FileOperationResult>>, result: FileOperationResult) {
    if let Some(tx) = sender {
        // The receiver lives as long as the app
        let _ = tx.send(result);
    }
}

impl GridSketchApp {
    /// Applies finished file operations and starts the queued one.
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        let results: Vec<_> = match &self.file.file_operation_receiver {
            Some(receiver) => receiver.try_iter().collect(),
            None => Vec::new(),
        };
        for result in results {
            self.apply_file_result(result);
        }

        let Some(operation) = self.file.pending_operation.take() else {
            return;
        };
        let ctx = ctx.clone();
        let sender = self.file.file_operation_sender.clone();

        match operation {
            PendingFileOperation::Save => {
                let Some(path) = self.file.current_path.clone() else {
                    self.file.pending_operation = Some(PendingFileOperation::SaveAs);
                    return;
                };
                let json = match self.diagram.to_json() {
                    Ok(json) => json,
                    Err(err) => {
                        self.show_alert(format!("Failed to serialize diagram: {err}"));
                        return;
                    }
                };
                tokio::spawn(async move {
                    match std::fs::write(&path, json) {
                        Ok(()) => report(&sender, FileOperationResult::SaveCompleted(path)),
                        Err(e) => report(
                            &sender,
                            FileOperationResult::OperationFailed(format!("Failed to save file: {e}")),
                        ),
                    }
                    ctx.request_repaint();
                });
            }
            PendingFileOperation::SaveAs => {
                let json = match self.diagram.to_json() {
                    Ok(json) => json,
                    Err(err) => {
                        self.show_alert(format!("Failed to serialize diagram: {err}"));
                        return;
                    }
                };
                tokio::spawn(async move {
                    if let Some(handle) = rfd::AsyncFileDialog::new()
                        .add_filter("Diagram", &["json"])
                        .set_file_name("diagram.json")
                        .save_file()
                        .await
                    {
                        let path = handle.path().display().to_string();
                        match std::fs::write(handle.path(), json) {
                            Ok(()) => report(&sender, FileOperationResult::SaveCompleted(path)),
                            Err(e) => report(
                                &sender,
                                FileOperationResult::OperationFailed(format!("Failed to save file: {e}")),
                            ),
                        }
                    }
                    ctx.request_repaint();
                });
            }
            PendingFileOperation::Load => {
                tokio::spawn(async move {
                    if let Some(handle) = rfd::AsyncFileDialog::new()
                        .add_filter("Diagram", &["json"])
                        .pick_file()
                        .await
                    {
                        let path = handle.path().display().to_string();
                        match std::fs::read_to_string(handle.path()) {
                            Ok(json) => report(&sender, FileOperationResult::LoadCompleted(path, json)),
                            Err(e) => report(
                                &sender,
                                FileOperationResult::OperationFailed(format!("Failed to read file: {e}")),
                            ),
                        }
                    }
                    ctx.request_repaint();
                });
            }
            PendingFileOperation::ImportXml => {
                tokio::spawn(async move {
                    if let Some(handle) = rfd::AsyncFileDialog::new()
                        .add_filter("mxGraph XML", &["xml", "drawio"])
                        .pick_file()
                        .await
                    {
                        let path = handle.path().display().to_string();
                        match mxgraph::load_mxgraph(handle.path()) {
                            Ok(diagram) => {
                                report(&sender, FileOperationResult::ImportCompleted(path, diagram))
                            }
                            Err(e) => report(
                                &sender,
                                FileOperationResult::OperationFailed(format!("Failed to import {path}: {e}")),
                            ),
                        }
                    }
                    ctx.request_repaint();
                });
            }
            PendingFileOperation::ExportPayload => {
                let payload = network::flatten(&self.diagram);
                let json = match payload.to_json_pretty() {
                    Ok(json) => json,
                    Err(err) => {
                        self.show_alert(format!("Failed to serialize payload: {err}"));
                        return;
                    }
                };
                tokio::spawn(async move {
                    if let Some(handle) = rfd::AsyncFileDialog::new()
                        .add_filter("JSON", &["json"])
                        .set_file_name("network.json")
                        .save_file()
                        .await
                    {
                        let path = handle.path().display().to_string();
                        match std::fs::write(handle.path(), json) {
                            Ok(()) => report(&sender, FileOperationResult::ExportCompleted(path)),
                            Err(e) => report(
                                &sender,
                                FileOperationResult::OperationFailed(format!("Failed to export payload: {e}")),
                            ),
                        }
                    }
                    ctx.request_repaint();
                });
            }
        }
    }

    /// Applies one finished file operation to the app.
    pub fn apply_file_result(&mut self, result: FileOperationResult) {
        match result {
            FileOperationResult::SaveCompleted(path) => {
                log::info!("saved {path}");
                self.file.current_path = Some(path);
                self.file.has_unsaved_changes = false;
            }
            FileOperationResult::LoadCompleted(path, content) => match Diagram::from_json(&content) {
                Ok(diagram) => {
                    log::info!("loaded {path} ({} cells)", diagram.cells.len());
                    self.replace_diagram(diagram);
                    self.file.current_path = Some(path);
                }
                Err(err) => self.show_alert(format!("Failed to parse {path}: {err}")),
            },
            FileOperationResult::ImportCompleted(path, diagram) => {
                log::info!("imported {path}");
                self.replace_diagram(diagram);
                // Imported documents are saved in the native format, not written back
                self.file.has_unsaved_changes = true;
            }
            FileOperationResult::ExportCompleted(path) => {
                log::info!("exported payload to {path}");
            }
            FileOperationResult::OperationFailed(error) => self.show_alert(error),
        }
    }

    /// Swaps in a new diagram and resets everything tied to the old one.
    pub fn replace_diagram(&mut self, diagram: Diagram) {
        self.diagram = diagram;
        self.file.current_path = None;
        self.file.has_unsaved_changes = false;
        self.interaction.clear_selection();
        self.dialogs.cancel();
        self.undo_history.clear();
        self.canvas.offset = egui::Vec2::ZERO;
        self.canvas.zoom_factor = 1.0;
    }

    /// Opens a file dialog to save the diagram under a new name.
    pub fn save_as_diagram(&mut self) {
        self.file.pending_operation = Some(PendingFileOperation::SaveAs);
    }

    /// Saves to the current path, or falls back to "Save As".
    pub fn save_diagram(&mut self) {
        if self.file.current_path.is_some() {
            self.file.pending_operation = Some(PendingFileOperation::Save);
        } else {
            self.save_as_diagram();
        }
    }

    /// Asks for a diagram file to open.
    pub fn load_diagram(&mut self) {
        self.file.pending_operation = Some(PendingFileOperation::Load);
    }

    /// Asks for an mxGraph XML file to import.
    pub fn import_mxgraph(&mut self) {
        self.file.pending_operation = Some(PendingFileOperation::ImportXml);
    }

    /// Asks where to write the flattened network.
    pub fn export_payload(&mut self) {
        self.file.pending_operation = Some(PendingFileOperation::ExportPayload);
    }

    /// Replaces the diagram with an empty one.
    pub fn new_diagram(&mut self) {
        self.replace_diagram(Diagram::new());
    }

    /// Replaces the diagram with a built-in sample.
    pub fn load_sample(&mut self, kind: ExampleKind) {
        self.replace_diagram(examples::build_example(kind));
        // A sample is a fresh, unsaved document
        self.file.has_unsaved_changes = true;
    }
}
