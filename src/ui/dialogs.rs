//! Windows for component parameters and alerts.

use super::state::GridSketchApp;
use super::UndoAction;
use crate::dialog::{flag_is_set, FormState};
use crate::schema::FieldType;
use eframe::egui;

/// What the user did with the dialog this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogChoice {
    Apply,
    Cancel,
}

impl GridSketchApp {
    /// Opens the parameter dialog for a cell.
    ///
    /// A dialog that is already showing keeps the slot; failures are
    /// logged and shown as an alert.
    pub fn open_component_dialog(&mut self, cell_id: &str) {
        match self.dialogs.open(&self.diagram, cell_id) {
            Ok(true) => log::debug!("opened dialog for {cell_id}"),
            Ok(false) => {}
            Err(err) => self.show_alert(crate::Error::from(err).to_string()),
        }
    }

    /// Validates the open dialog and writes it back on success.
    pub fn commit_component_dialog(&mut self) {
        let Some(applied) = self.dialogs.apply() else {
            return;
        };
        match applied.write_to(&mut self.diagram) {
            Some((old_value, new_value)) => {
                if old_value.as_ref() != Some(&new_value) {
                    self.undo_history.push_action(UndoAction::ValueChanged {
                        cell_id: applied.cell_id,
                        old_value,
                        new_value: Some(new_value),
                    });
                    self.file.has_unsaved_changes = true;
                }
            }
            None => log::warn!("cell {} vanished before its dialog was applied", applied.cell_id),
        }
    }

    /// Draws the open parameter dialog, if any.
    pub fn draw_component_dialog(&mut self, ctx: &egui::Context) {
        self.dialogs.close_if_orphaned(&self.diagram);
        let Some(session) = self.dialogs.session_mut() else {
            return;
        };
        let title = format!("{} Parameters", session.form.kind.display_name());
        let mut choice = None;
        let mut open = true;

        egui::Window::new(title)
            .id(egui::Id::new("component_dialog"))
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .default_width(360.0)
            .show(ctx, |ui| {
                choice = draw_form(ui, &mut session.form);
            });

        if !open {
            choice = Some(DialogChoice::Cancel);
        }
        match choice {
            Some(DialogChoice::Apply) => self.commit_component_dialog(),
            Some(DialogChoice::Cancel) => self.dialogs.cancel(),
            None => {}
        }
    }

    /// Blocking message window; dismissed with OK.
    pub fn draw_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.alert else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("GridSketch")
            .id(egui::Id::new("alert_window"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alert = None;
        }
    }
}

fn draw_form(ui: &mut egui::Ui, form: &mut FormState) -> Option<DialogChoice> {
    ui.horizontal(|ui| {
        ui.label("Name:");
        ui.text_edit_singleline(&mut form.name);
    });
    ui.separator();

    let tabs = form.tabs();
    if tabs.len() > 1 {
        ui.horizontal(|ui| {
            for tab in &tabs {
                ui.selectable_value(&mut form.active_tab, *tab, tab.title());
            }
        });
        ui.separator();
    }
    if !tabs.contains(&form.active_tab) {
        if let Some(first) = tabs.first() {
            form.active_tab = *first;
        }
    }

    let tab = form.active_tab;
    let mut errors: Vec<(&'static str, String)> = Vec::new();
    for spec in form.fields().iter().filter(|spec| spec.tab == tab) {
        if let Some(err) = form.error_for(spec.id) {
            errors.push((spec.id, err.reason.clone()));
        }
    }

    egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
        egui::Grid::new(("dialog_fields", tab))
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                for (spec, buffer) in form.tab_entries_mut(tab) {
                    ui.label(spec.label);
                    match spec.ty {
                        FieldType::Bool => {
                            let mut checked = flag_is_set(spec, buffer);
                            if ui.checkbox(&mut checked, "").changed() {
                                *buffer = checked.to_string();
                            }
                        }
                        FieldType::Choice(options) => {
                            egui::ComboBox::from_id_salt(spec.id)
                                .selected_text(buffer.as_str())
                                .show_ui(ui, |ui| {
                                    if spec.optional {
                                        ui.selectable_value(buffer, String::new(), "(none)");
                                    }
                                    for option in options {
                                        ui.selectable_value(buffer, option.to_string(), *option);
                                    }
                                });
                        }
                        _ => {
                            let hint = if spec.optional { "optional" } else { "" };
                            ui.add(egui::TextEdit::singleline(buffer).hint_text(hint).desired_width(140.0));
                        }
                    }
                    ui.label(spec.unit.unwrap_or(""));
                    ui.end_row();

                    if let Some((_, reason)) = errors.iter().find(|(id, _)| *id == spec.id) {
                        ui.label("");
                        ui.colored_label(ui.visuals().error_fg_color, reason.as_str());
                        ui.end_row();
                    }
                }
            });
    });

    if !form.errors().is_empty() {
        ui.colored_label(
            ui.visuals().error_fg_color,
            format!("{} field(s) need attention", form.errors().len()),
        );
    }

    ui.separator();
    let mut choice = None;
    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            choice = Some(DialogChoice::Apply);
        }
        if ui.button("Cancel").clicked() {
            choice = Some(DialogChoice::Cancel);
        }
    });
    choice
}
