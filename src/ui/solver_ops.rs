//! Running the load flow from the editor.
//!
//! The request runs on tokio's blocking pool; its outcome comes back over
//! the solver channel and is picked up at the start of a frame.

use super::rendering::create_json_layouter;
use super::state::GridSketchApp;
use crate::network;
use crate::solver::{self, SolverError};
use eframe::egui;

impl GridSketchApp {
    /// Flattens the diagram and submits it to the solver.
    ///
    /// An empty network is reported straight away without a request.
    pub fn run_simulation(&mut self, ctx: &egui::Context) {
        if self.solver.in_flight {
            log::debug!("simulation already running");
            return;
        }
        let payload = network::flatten(&self.diagram);
        if payload.is_empty() {
            self.show_alert(crate::Error::from(SolverError::EmptyNetwork).to_string());
            return;
        }

        let config = self.solver.config.clone();
        let sender = self.solver.sender.clone();
        let ctx = ctx.clone();
        self.solver.in_flight = true;
        tokio::task::spawn_blocking(move || {
            let outcome = solver::submit(&config, &payload).map_err(|err| crate::Error::from(err).to_string());
            if let Some(tx) = sender {
                let _ = tx.send(outcome);
            }
            ctx.request_repaint();
        });
    }

    /// Picks up a finished solver request, if any.
    pub fn poll_solver(&mut self) {
        let Some(receiver) = &self.solver.receiver else {
            return;
        };
        let Ok(outcome) = receiver.try_recv() else {
            return;
        };
        self.solver.in_flight = false;
        match outcome {
            Ok(result) => {
                log::info!("simulation finished");
                self.solver.last_result = Some(result);
            }
            Err(message) => self.show_alert(message),
        }
    }

    /// Shows the flattened payload without sending it.
    pub fn preview_payload(&mut self) {
        match network::flatten(&self.diagram).to_json_pretty() {
            Ok(json) => self.payload_preview = Some(json),
            Err(err) => self.show_alert(crate::Error::from(err).to_string()),
        }
    }

    /// Results, payload preview and solver settings windows.
    pub fn draw_solver_windows(&mut self, ctx: &egui::Context) {
        if let Some(result) = &self.solver.last_result {
            let text = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
            let mut open = true;
            json_window(ctx, "Simulation Results", &text, &mut open);
            if !open {
                self.solver.last_result = None;
            }
        }

        if let Some(text) = &self.payload_preview {
            let mut open = true;
            json_window(ctx, "Network Payload", text, &mut open);
            if !open {
                self.payload_preview = None;
            }
        }

        if self.solver.show_settings {
            self.draw_solver_settings(ctx);
        }
    }

    fn draw_solver_settings(&mut self, ctx: &egui::Context) {
        let mut open = true;
        let mut save = false;
        egui::Window::new("Solver Settings")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("solver_settings").num_columns(2).show(ui, |ui| {
                    ui.label("Endpoint:");
                    ui.text_edit_singleline(&mut self.solver.config.endpoint);
                    ui.end_row();
                    ui.label("Timeout (s):");
                    ui.text_edit_singleline(&mut self.solver.temp_timeout);
                    ui.end_row();
                });
                if ui.button("Save").clicked() {
                    save = true;
                }
            });

        if save {
            let config = std::mem::take(&mut self.solver.config);
            self.solver.config = config.with_overrides(None, Some(self.solver.temp_timeout.clone()));
            self.solver.temp_timeout = self.solver.config.timeout_secs.to_string();
            self.solver.show_settings = false;
        } else if !open {
            self.solver.show_settings = false;
        }
    }

    /// Shows the solver settings window.
    pub fn open_solver_settings(&mut self) {
        self.solver.temp_timeout = self.solver.config.timeout_secs.to_string();
        self.solver.show_settings = true;
    }
}

fn json_window(ctx: &egui::Context, title: &str, text: &str, open: &mut bool) {
    egui::Window::new(title)
        .open(open)
        .default_size([480.0, 420.0])
        .resizable(true)
        .show(ctx, |ui| {
            if ui.button("Copy").clicked() {
                ui.ctx().copy_text(text.to_string());
            }
            egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                let mut shown = text;
                let mut layouter = create_json_layouter(text);
                ui.add(
                    egui::TextEdit::multiline(&mut shown)
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .layouter(&mut layouter),
                );
            });
        });
}
