//! User interface of the diagram editor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main GridSketchApp
//! - `canvas` - Canvas navigation, zooming, panning, dragging and hit testing
//! - `rendering` - Drawing vertices, edges, grid and overlays
//! - `dialogs` - Component parameter and alert windows
//! - `file_ops` - Save/load, mxGraph import and payload export
//! - `solver_ops` - Running the load flow and showing results
//! - `highlighters` - JSON syntax highlighting
//! - `undo` - Undo/redo history

mod canvas;
mod dialogs;
mod file_ops;
mod highlighters;
mod rendering;
mod solver_ops;
mod state;
mod undo;

pub use state::{EdgeTool, GridSketchApp};
pub use undo::{UndoAction, UndoHistory, UndoableDiagram};

use self::state::PendingConfirmAction;
use crate::components::ComponentKind;
use crate::dialog;
use crate::examples;
use crate::types::*;
use eframe::egui;

impl eframe::App for GridSketchApp {
    /// Persist app state between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string("app_state", json),
            Err(err) => log::error!("Failed to serialize app state: {err}"),
        }
    }

    /// Lays out the toolbar, properties panel, canvas and windows for one frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_operations(ctx);
        self.poll_solver();

        self.handle_undo_redo_keys(ctx);
        self.handle_delete_key(ctx);
        self.handle_file_shortcuts(ctx);

        // Intercept window close requests while there are unsaved changes
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.file.has_unsaved_changes && !self.file.allow_close_on_next_request {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                if !self.file.show_unsaved_dialog {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::Quit);
                }
            } else {
                self.file.allow_close_on_next_request = false;
            }
        }

        // Restore the window size once per session
        if !self.applied_viewport_restore {
            if let Some((w, h)) = self.window_inner_size {
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(w, h)));
            }
            self.applied_viewport_restore = true;
        }
        let size = ctx.input(|i| i.screen_rect().size());
        self.window_inner_size = Some((size.x, size.y));

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let viewport_width = ctx.input(|i| i.screen_rect().width());
        let max_width = (viewport_width * 0.9).max(180.0);
        egui::SidePanel::right("properties_panel")
            .resizable(true)
            .default_width(self.properties_panel_width.clamp(180.0, max_width))
            .show(ctx, |ui| {
                self.properties_panel_width = ui.available_width().clamp(180.0, max_width);
                self.draw_properties_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.draw_unsaved_dialog(ctx);
        self.draw_component_dialog(ctx);
        self.draw_solver_windows(ctx);
        self.draw_alert(ctx);
    }
}

impl GridSketchApp {
    /// Runs `action` now, or asks first when there are unsaved changes.
    fn request_confirmed(&mut self, action: PendingConfirmAction, ctx: &egui::Context) {
        if self.file.has_unsaved_changes {
            self.file.show_unsaved_dialog = true;
            self.file.pending_confirm_action = Some(action);
        } else {
            self.perform_confirmed(action, ctx);
        }
    }

    fn perform_confirmed(&mut self, action: PendingConfirmAction, ctx: &egui::Context) {
        match action {
            PendingConfirmAction::New => self.new_diagram(),
            PendingConfirmAction::Open => self.load_diagram(),
            PendingConfirmAction::ImportXml => self.import_mxgraph(),
            PendingConfirmAction::LoadSample(kind) => self.load_sample(kind),
            PendingConfirmAction::Quit => {
                // Let exactly one close request through
                self.file.allow_close_on_next_request = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn draw_unsaved_dialog(&mut self, ctx: &egui::Context) {
        if !self.file.show_unsaved_dialog {
            return;
        }
        let (title, confirm_label) = match self.file.pending_confirm_action {
            Some(PendingConfirmAction::Quit) => ("Unsaved changes: Quit?", "Discard and Quit"),
            Some(PendingConfirmAction::New) => ("Unsaved changes: Create New?", "Discard and Create New"),
            Some(PendingConfirmAction::Open) => ("Unsaved changes: Open File?", "Discard and Open"),
            Some(PendingConfirmAction::ImportXml) => ("Unsaved changes: Import?", "Discard and Import"),
            Some(PendingConfirmAction::LoadSample(_)) => ("Unsaved changes: Load Sample?", "Discard and Load"),
            None => ("Unsaved changes", "Discard"),
        };
        let mut choice = None;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("You have unsaved changes. Are you sure you want to continue?");
                ui.horizontal(|ui| {
                    if ui.button(confirm_label).clicked() {
                        choice = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        choice = Some(false);
                    }
                });
            });

        if let Some(confirmed) = choice {
            let action = self.file.pending_confirm_action.take();
            self.file.show_unsaved_dialog = false;
            if let (true, Some(action)) = (confirmed, action) {
                self.perform_confirmed(action, ctx);
            }
        }
    }

    /// New, Open, Save, Save As and Quit shortcuts on Cmd/Ctrl.
    fn handle_file_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (save_as, save, open, new, quit) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            let shift = i.modifiers.shift;
            (
                cmd && shift && i.key_pressed(egui::Key::S),
                cmd && !shift && i.key_pressed(egui::Key::S),
                cmd && i.key_pressed(egui::Key::O),
                cmd && i.key_pressed(egui::Key::N),
                cmd && i.key_pressed(egui::Key::Q),
            )
        });
        if save_as {
            self.save_as_diagram();
        } else if save {
            self.save_diagram();
        }
        if open {
            self.request_confirmed(PendingConfirmAction::Open, ctx);
        }
        if new {
            self.request_confirmed(PendingConfirmAction::New, ctx);
        }
        if quit {
            self.request_confirmed(PendingConfirmAction::Quit, ctx);
        }
    }

    /// Ctrl+Z undoes; Ctrl+Shift+Z or Ctrl+Y redoes.
    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift) {
            self.perform_undo();
        } else if ctx.input(|i| {
            (i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift)
                || (i.key_pressed(egui::Key::Y) && i.modifiers.command)
        }) {
            self.perform_redo();
        }
    }

    /// Delete removes the selection together with every edge touching it.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || !ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            return;
        }
        self.delete_selection();
    }

    /// Removes the selected vertices, or the selected edge, as one undo step.
    pub fn delete_selection(&mut self) {
        let ids: Vec<CellId> = if !self.interaction.selected_cells.is_empty() {
            self.interaction.selected_cells.clone()
        } else if let Some(edge) = &self.interaction.selected_edge {
            vec![edge.clone()]
        } else {
            return;
        };
        let removed = self.diagram.remove_cells(&ids);
        if removed.is_empty() {
            return;
        }
        log::debug!("deleted {} cells", removed.len());
        self.undo_history.push_action(UndoAction::CellsDeleted { removed });
        self.interaction.clear_selection();
        self.dialogs.close_if_orphaned(&self.diagram);
        self.file.has_unsaved_changes = true;
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        ui.horizontal(|ui| {
            if ui.button("New").clicked() {
                self.request_confirmed(PendingConfirmAction::New, &ctx);
            }
            if ui.button("Open").clicked() {
                self.request_confirmed(PendingConfirmAction::Open, &ctx);
            }
            if ui.button("Save").clicked() {
                self.save_diagram();
            }
            if ui.button("Save As").clicked() {
                self.save_as_diagram();
            }
            ui.menu_button("Samples", |ui| {
                for info in examples::all_examples() {
                    if ui.button(info.name).clicked() {
                        self.request_confirmed(PendingConfirmAction::LoadSample(info.kind), &ctx);
                        ui.close();
                    }
                }
            });

            ui.separator();

            if ui.button("Import XML").clicked() {
                self.request_confirmed(PendingConfirmAction::ImportXml, &ctx);
            }
            if ui.button("Export Payload").clicked() {
                self.export_payload();
            }

            ui.separator();

            ui.add_enabled_ui(self.undo_history.can_undo(), |ui| {
                if ui.button("⟲ Undo").clicked() {
                    self.perform_undo();
                }
            });
            ui.add_enabled_ui(self.undo_history.can_redo(), |ui| {
                if ui.button("⟳ Redo").clicked() {
                    self.perform_redo();
                }
            });

            ui.separator();

            ui.add_enabled_ui(!self.solver.in_flight, |ui| {
                if ui.button("▶ Run Simulation").clicked() {
                    self.run_simulation(&ctx);
                }
            });
            if self.solver.in_flight {
                ui.spinner();
            }
            if ui.button("Preview Payload").clicked() {
                self.preview_payload();
            }
            if ui.button("Solver…").clicked() {
                self.open_solver_settings();
            }

            ui.separator();

            ui.label("Edges:");
            egui::ComboBox::from_id_salt("edge_tool_combo")
                .selected_text(match self.interaction.edge_tool {
                    EdgeTool::Connector => "Connector",
                    EdgeTool::Component(kind) => kind.display_name(),
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.interaction.edge_tool, EdgeTool::Connector, "Connector");
                    for kind in [ComponentKind::Line, ComponentKind::DcLine] {
                        ui.selectable_value(
                            &mut self.interaction.edge_tool,
                            EdgeTool::Component(kind),
                            kind.display_name(),
                        );
                    }
                });

            ui.separator();
            ui.checkbox(&mut self.canvas.show_grid, "Show Grid");
            ui.checkbox(&mut self.dark_mode, "Dark Mode");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dirty = if self.file.has_unsaved_changes { "*" } else { "" };
                match &self.file.current_path {
                    Some(path) => ui.label(format!("{path}{dirty}")),
                    None => ui.label(format!("Untitled{dirty}")),
                };
                ui.label(format!("Zoom: {:.0}%", self.canvas.zoom_factor * 100.0));
            });
        });
    }

    /// Details of the selected cell, or usage hints when nothing is selected.
    fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.heading("Properties");
                ui.separator();

                if let Some(selected_id) = self.interaction.selected_cell().cloned() {
                    match self.diagram.cell(&selected_id).cloned() {
                        Some(cell) => self.draw_cell_properties(ui, &cell),
                        None => {
                            ui.label("Cell not found");
                        }
                    }
                } else if self.interaction.selected_cells.len() > 1 {
                    ui.label(format!("{} cells selected", self.interaction.selected_cells.len()));
                    ui.colored_label(egui::Color32::GRAY, "Press Delete to remove");
                } else if let Some(edge_id) = self.interaction.selected_edge.clone() {
                    match self.diagram.cell(&edge_id).cloned() {
                        Some(edge) => self.draw_edge_properties(ui, &edge),
                        None => {
                            ui.label("Edge not found");
                        }
                    }
                } else {
                    self.draw_no_selection_info(ui);
                }

                ui.separator();
                let payload = crate::network::flatten(&self.diagram);
                ui.label(format!("Network: {} components", payload.len()));
            });
    }

    fn draw_cell_properties(&mut self, ui: &mut egui::Ui, cell: &Cell) {
        let kind = cell.component_kind();
        ui.label(format!(
            "Type: {}",
            kind.map(ComponentKind::display_name).unwrap_or("Shape")
        ));
        ui.separator();

        ui.label("Name:");
        if self.interaction.editing_name.as_deref() == Some(cell.id.as_str()) {
            self.draw_name_editor(ui, &cell.id);
        } else {
            let shown = if cell.label().is_empty() { "(unnamed)" } else { cell.label() };
            if ui.button(shown).clicked() {
                self.start_editing_name(&cell.id, cell.label());
            }
        }

        if let Some(geometry) = cell.geometry() {
            ui.label(format!("Position: ({:.1}, {:.1})", geometry.x, geometry.y));
        }

        ui.separator();
        self.draw_attributes(ui, cell);

        let connectivity = kind.map(ComponentKind::connectivity);
        if let Some(connectivity) = connectivity.filter(|c| c.arity() > 0) {
            ui.separator();
            let view = crate::network::DiagramView::new(&self.diagram);
            let mut cache = crate::style::StyleCache::new();
            let buses = crate::network::resolve(&view, &mut cache, &cell.id, connectivity);
            egui::Grid::new("bus_refs").num_columns(2).show(ui, |ui| {
                for (field, bus) in &buses {
                    ui.label(*field);
                    let label = bus
                        .as_deref()
                        .and_then(|id| self.diagram.cell(id))
                        .map(|bus| bus.label().to_string())
                        .unwrap_or_else(|| "(not connected)".to_string());
                    ui.label(label);
                    ui.end_row();
                }
            });
        }
    }

    fn draw_edge_properties(&mut self, ui: &mut egui::Ui, edge: &Cell) {
        let kind = edge.component_kind().filter(|kind| kind.is_edge_kind());
        ui.label(format!(
            "Type: {}",
            kind.map(ComponentKind::display_name).unwrap_or("Connector")
        ));
        ui.separator();
        if let Some((source, target)) = edge.terminals() {
            let name = |id: Option<&CellId>| {
                id.and_then(|id| self.diagram.cell(id))
                    .map(|cell| cell.label().to_string())
                    .unwrap_or_else(|| "(dangling)".to_string())
            };
            ui.label(format!("From: {}", name(source)));
            ui.label(format!("To: {}", name(target)));
        }
        if kind.is_some() {
            ui.separator();
            ui.label(format!("Name: {}", edge.label()));
            self.draw_attributes(ui, edge);
        }
        ui.separator();
        ui.colored_label(egui::Color32::GRAY, "Press Delete to remove");
    }

    /// Attribute list plus the button that opens the parameter dialog.
    fn draw_attributes(&mut self, ui: &mut egui::Ui, cell: &Cell) {
        match cell.attributes().filter(|bag| !bag.is_empty()) {
            Some(bag) => {
                egui::Grid::new(("attributes", &cell.id))
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (name, value) in bag.iter() {
                            ui.label(name);
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            }
            None => {
                ui.colored_label(egui::Color32::GRAY, "No parameters set");
            }
        }
        let editable = dialog::dialog_kind(cell).is_ok();
        ui.add_enabled_ui(editable && !self.dialogs.is_open(), |ui| {
            if ui.button("Edit Parameters…").clicked() {
                self.open_component_dialog(&cell.id);
            }
        });
    }

    fn draw_name_editor(&mut self, ui: &mut egui::Ui, cell_id: &str) {
        let response = ui.text_edit_singleline(&mut self.interaction.temp_name);

        if !self.interaction.focus_requested_for_edit {
            response.request_focus();
            self.interaction.focus_requested_for_edit = true;
        }
        if self.interaction.should_select_text && response.has_focus() {
            self.interaction.should_select_text = false;
            let len = self.interaction.temp_name.chars().count();
            ui.memory_mut(|mem| {
                let state = mem
                    .data
                    .get_temp_mut_or_default::<egui::text_edit::TextEditState>(response.id);
                state.cursor.set_char_range(Some(egui::text::CCursorRange::two(
                    egui::text::CCursor::new(0),
                    egui::text::CCursor::new(len),
                )));
            });
        }

        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (response.has_focus() && enter) || (response.lost_focus() && !enter) {
            self.save_name_change(cell_id);
        }
    }

    fn start_editing_name(&mut self, cell_id: &str, current_name: &str) {
        self.interaction.editing_name = Some(cell_id.to_string());
        self.interaction.temp_name = current_name.to_string();
        self.interaction.should_select_text = true;
        self.interaction.focus_requested_for_edit = false;
    }

    /// Writes the edited name to the cell as one undo step.
    fn save_name_change(&mut self, cell_id: &str) {
        self.interaction.editing_name = None;
        let new_name = self.interaction.temp_name.trim().to_string();
        let Some(cell) = self.diagram.cell_mut(cell_id) else {
            return;
        };
        let value = cell.value.get_or_insert_with(CellValue::default);
        if value.label == new_name {
            return;
        }
        let old_name = std::mem::replace(&mut value.label, new_name.clone());
        self.undo_history.push_action(UndoAction::CellRenamed {
            cell_id: cell_id.to_string(),
            old_name,
            new_name,
        });
        self.file.has_unsaved_changes = true;
    }

    fn draw_no_selection_info(&self, ui: &mut egui::Ui) {
        ui.label("Nothing selected");
        ui.separator();
        ui.label("Right-click the canvas to place components");
        ui.label("Shift-drag between components to connect them");
        ui.label("Double-click a component to edit its parameters");
        ui.label("Middle-click and drag to pan");
    }

    /// Right-click palette of every component kind.
    fn draw_context_menu(&mut self, ui: &mut egui::Ui) {
        let screen_pos = egui::pos2(self.context_menu.screen_pos.0, self.context_menu.screen_pos.1);

        let area_response = egui::Area::new(egui::Id::new("context_menu"))
            .fixed_pos(screen_pos)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label("Place Component:");
                    ui.separator();
                    egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                        for kind in ComponentKind::ALL {
                            if kind.is_edge_kind() {
                                let label = format!("{} (shift-drag)", kind.display_name());
                                if ui.button(label).clicked() {
                                    self.interaction.edge_tool = EdgeTool::Component(kind);
                                    self.context_menu.show = false;
                                }
                            } else if ui.button(kind.display_name()).clicked() {
                                self.create_cell_at_pos(kind);
                                self.context_menu.show = false;
                            }
                        }
                    });
                    ui.separator();
                    if ui.button("Cancel").clicked() {
                        self.context_menu.show = false;
                    }
                })
            });

        if !self.context_menu.just_opened && ui.input(|i| i.pointer.primary_clicked()) {
            if let Some(click_pos) = ui.input(|i| i.pointer.interact_pos()) {
                if !area_response.response.rect.contains(click_pos) {
                    self.context_menu.show = false;
                }
            }
        }
        self.context_menu.just_opened = false;
    }

    /// Places a vertex of `kind` where the palette was opened and starts
    /// editing its name.
    pub fn create_cell_at_pos(&mut self, kind: ComponentKind) -> CellId {
        let cell = Cell::component(kind, kind.display_name(), self.context_menu.world_pos);
        let cell_id = self.diagram.add_cell(cell);
        self.undo_history.push_action(UndoAction::CellsCreated {
            cell_ids: vec![cell_id.clone()],
        });

        self.interaction.clear_selection();
        self.interaction.selected_cells.push(cell_id.clone());
        self.start_editing_name(&cell_id, kind.display_name());
        self.file.has_unsaved_changes = true;
        cell_id
    }

    /// Allocates the canvas, runs its interactions and paints it.
    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        // Put the origin in the middle of an empty canvas
        if self.canvas.offset == egui::Vec2::ZERO && self.diagram.cells.is_empty() {
            self.canvas.offset = response.rect.center().to_vec2();
        }

        self.handle_canvas_panning(ui, &response);
        self.handle_canvas_zoom(ui, &response);
        // Before dragging, so a marquee wins over a drag
        self.handle_canvas_interactions(ui, &response);
        self.handle_cell_dragging(ui, &response);

        self.render_diagram(&painter, response.rect);

        if self.context_menu.show {
            self.draw_context_menu(ui);
        }
    }

    /// Click selection, marquee selection, double-click and the palette.
    fn handle_canvas_interactions(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        if ui.input(|i| i.pointer.primary_down())
            && !self.interaction.is_panning
            && self.interaction.dragging_cell.is_none()
            && self.interaction.drawing_edge_from.is_none()
            && self.interaction.pending_shift_from.is_none()
        {
            if let Some(pos) = response.interact_pointer_pos() {
                if self.interaction.marquee_start.is_some() {
                    self.interaction.marquee_end = Some(pos);
                } else {
                    let world_pos = self.screen_to_world(pos);
                    let over_cell = self.find_cell_at_position(world_pos).is_some();
                    let over_edge = self.find_edge_at_position(world_pos).is_some();
                    if !over_cell && !over_edge {
                        self.interaction.marquee_start = Some(pos);
                        self.interaction.marquee_end = Some(pos);
                        self.interaction.marquee_additive = ui.input(|i| i.modifiers.shift);
                        if !self.interaction.marquee_additive {
                            self.interaction.clear_selection();
                        }
                    }
                }
            }
        } else if let (Some(start), Some(end)) = (
            self.interaction.marquee_start.take(),
            self.interaction.marquee_end.take(),
        ) {
            let world_rect = egui::Rect::from_two_pos(self.screen_to_world(start), self.screen_to_world(end));
            if !self.interaction.marquee_additive {
                self.interaction.selected_cells.clear();
            }
            for cell in self.diagram.vertices() {
                let Some(geometry) = cell.geometry() else {
                    continue;
                };
                if world_rect.contains(egui::pos2(geometry.x, geometry.y))
                    && !self.interaction.selected_cells.contains(&cell.id)
                {
                    self.interaction.selected_cells.push(cell.id.clone());
                }
            }
            self.interaction.selected_edge = None;
            self.interaction.editing_name = None;
            self.interaction.marquee_additive = false;
        }

        if response.double_clicked() && !self.interaction.is_panning {
            if let Some(pos) = response.interact_pointer_pos() {
                let world_pos = self.screen_to_world(pos);
                let target = self
                    .find_cell_at_position(world_pos)
                    .or_else(|| self.find_edge_at_position(world_pos));
                // Plain connectors have nothing to edit; any other tag goes
                // to the dialog, which reports tags it cannot handle
                let editable = target
                    .as_deref()
                    .and_then(|id| self.diagram.cell(id))
                    .is_some_and(|cell| {
                        let parsed = crate::style::parse_style(&cell.style);
                        crate::style::component_tag(&parsed).is_some()
                    });
                if let (true, Some(cell_id)) = (editable, target) {
                    self.open_component_dialog(&cell_id);
                }
            }
        } else if response.clicked()
            && !self.interaction.is_panning
            && self.interaction.dragging_cell.is_none()
            && self.interaction.pending_shift_from.is_none()
        {
            if let Some(pos) = response.interact_pointer_pos() {
                let world_pos = self.screen_to_world(pos);
                if let Some(cell_id) = self.find_cell_at_position(world_pos) {
                    if ui.input(|i| i.modifiers.shift) {
                        self.interaction.toggle_selected(&cell_id);
                    } else {
                        self.interaction.clear_selection();
                        self.interaction.selected_cells.push(cell_id);
                    }
                } else if let Some(edge_id) = self.find_edge_at_position(world_pos) {
                    self.interaction.clear_selection();
                    self.interaction.selected_edge = Some(edge_id);
                } else {
                    self.interaction.clear_selection();
                }
            }
        }

        if response.secondary_clicked()
            && !self.interaction.is_panning
            && self.interaction.dragging_cell.is_none()
        {
            if let Some(screen_pos) = response.interact_pointer_pos() {
                let world_pos = self.screen_to_world(screen_pos);
                self.context_menu.screen_pos = (screen_pos.x, screen_pos.y);
                self.context_menu.world_pos = (world_pos.x, world_pos.y);
                self.context_menu.show = true;
                self.context_menu.just_opened = true;
            }
        }
    }

    fn after_history_step(&mut self) {
        self.file.has_unsaved_changes = true;
        self.interaction.clear_selection();
        self.dialogs.close_if_orphaned(&self.diagram);
    }

    /// Reverts the most recent edit.
    pub fn perform_undo(&mut self) {
        if let Some(action) = self.undo_history.pop_undo() {
            if let Some(redo_action) = self.diagram.revert(&action) {
                self.undo_history.push_redo(redo_action);
                self.after_history_step();
            }
        }
    }

    /// Reapplies the most recently undone edit.
    pub fn perform_redo(&mut self) {
        if let Some(action) = self.undo_history.pop_redo() {
            if let Some(undo_action) = self.diagram.revert(&action) {
                // push_action would clear the redo stack
                self.undo_history.push_undo(undo_action);
                self.after_history_step();
            }
        }
    }
}

#[cfg(test)]
mod tests;
