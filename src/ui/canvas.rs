//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning, zooming, vertex dragging, edge drawing,
//! hit testing and coordinate transformations between screen and world space.

use super::state::{EdgeTool, GridSketchApp};
use crate::constants::{CLICK_THRESHOLD, EDGE_HIT_TOLERANCE, GRID_SIZE, NOT_EDITABLE_LINE, STYLE_TAG_KEY};
use crate::types::*;
use crate::ui::UndoAction;
use eframe::egui;

/// Style string for a new edge carrying the given component tag.
pub(crate) fn edge_style(tag: &str) -> String {
    format!("{STYLE_TAG_KEY}={tag};endArrow=none")
}

impl GridSketchApp {
    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Snaps a position to the nearest grid point.
    pub fn snap_to_grid(&self, pos: egui::Pos2) -> egui::Pos2 {
        egui::pos2(
            (pos.x / GRID_SIZE).round() * GRID_SIZE,
            (pos.y / GRID_SIZE).round() * GRID_SIZE,
        )
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning.
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        // `command` is Cmd on macOS and Ctrl elsewhere
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    self.canvas.offset += current_pos - last_pos;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming.
    ///
    /// The world point under the cursor stays fixed; zoom is clamped
    /// between 0.25x and 5.0x and only applies while hovering the canvas.
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }
        let mouse_pos = ui
            .input(|i| i.pointer.hover_pos())
            .or_else(|| response.interact_pointer_pos());
        let Some(mouse_pos) = mouse_pos else {
            return;
        };
        if !response.rect.contains(mouse_pos) {
            return;
        }

        let anchor = self.screen_to_world(mouse_pos);
        let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
        let old_zoom = self.canvas.zoom_factor;
        self.canvas.zoom_factor = (old_zoom + zoom_delta).clamp(0.25, 5.0);

        if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
            self.canvas.offset += mouse_pos - self.world_to_screen(anchor);
        }
    }

    /// Handles vertex dragging and shift-drag edge drawing with the left button.
    ///
    /// Shift-press on a vertex is held as pending until the pointer moves
    /// past [`CLICK_THRESHOLD`]; released before that it toggles selection.
    pub fn handle_cell_dragging(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        // An active marquee owns the pointer
        if self.interaction.marquee_start.is_some() {
            return;
        }
        if ui.input(|i| i.pointer.primary_down()) && !self.interaction.is_panning {
            let Some(current_pos) = response.interact_pointer_pos() else {
                return;
            };
            let world_pos = self.screen_to_world(current_pos);
            let shift_held = ui.input(|i| i.modifiers.shift);

            if self.interaction.dragging_cell.is_none()
                && self.interaction.drawing_edge_from.is_none()
                && self.interaction.pending_shift_from.is_none()
            {
                if let Some(cell_id) = self.find_cell_at_position(world_pos) {
                    if shift_held {
                        self.interaction.pending_shift_from = Some(cell_id);
                        self.interaction.pending_shift_start = Some(current_pos);
                    } else {
                        self.start_cell_drag(cell_id, world_pos);
                    }
                }
            } else if let Some(dragging_id) = self.interaction.dragging_cell.clone() {
                self.update_dragged_positions(&dragging_id, world_pos, shift_held);
            } else if self.interaction.drawing_edge_from.is_some() {
                self.interaction.edge_draw_pos = Some(current_pos);
            } else if let (Some(from_id), Some(start_pos)) = (
                self.interaction.pending_shift_from.clone(),
                self.interaction.pending_shift_start,
            ) {
                let moved = (self.screen_to_world(current_pos) - self.screen_to_world(start_pos)).length();
                if moved >= CLICK_THRESHOLD {
                    self.interaction.drawing_edge_from = Some(from_id);
                    self.interaction.edge_draw_pos = Some(current_pos);
                    self.interaction.pending_shift_from = None;
                    self.interaction.pending_shift_start = None;
                }
            }
        } else {
            if self.interaction.drawing_edge_from.is_some() {
                if let Some(current_pos) = response.interact_pointer_pos() {
                    let world_pos = self.screen_to_world(current_pos);
                    self.finalize_edge(world_pos);
                }
            }

            // Shift-click without a drag
            if let Some(cell_id) = self.interaction.pending_shift_from.take() {
                self.interaction.toggle_selected(&cell_id);
            }
            self.interaction.pending_shift_start = None;

            if self.interaction.dragging_cell.is_some() {
                self.record_drag();
            }

            self.interaction.dragging_cell = None;
            self.interaction.drag_original_positions.clear();
            self.interaction.drawing_edge_from = None;
            self.interaction.edge_draw_pos = None;
        }
    }

    fn start_cell_drag(&mut self, cell_id: CellId, world_pos: egui::Pos2) {
        if !self.interaction.selected_cells.contains(&cell_id) {
            self.interaction.clear_selection();
            self.interaction.selected_cells.push(cell_id.clone());
        }

        self.interaction.drag_original_positions = self
            .interaction
            .selected_cells
            .iter()
            .filter_map(|id| {
                let geometry = self.diagram.cell(id)?.geometry()?;
                Some((id.clone(), (geometry.x, geometry.y)))
            })
            .collect();

        if let Some(geometry) = self.diagram.cell(&cell_id).and_then(Cell::geometry) {
            self.interaction.drag_offset = egui::pos2(geometry.x, geometry.y) - world_pos;
        }
        self.interaction.dragging_cell = Some(cell_id);
    }

    /// Moves the dragged vertex under the pointer and every other selected
    /// vertex by the same delta. Shift snaps the dragged vertex to the grid.
    fn update_dragged_positions(&mut self, cell_id: &str, world_pos: egui::Pos2, snap: bool) {
        let mut target = world_pos + self.interaction.drag_offset;
        if snap {
            target = self.snap_to_grid(target);
        }
        let Some(current) = self.diagram.cell(cell_id).and_then(Cell::geometry).copied() else {
            return;
        };
        let delta = egui::vec2(target.x - current.x, target.y - current.y);
        for id in self.interaction.selected_cells.clone() {
            if let Some(geometry) = self.diagram.cell_mut(&id).and_then(Cell::geometry_mut) {
                geometry.x += delta.x;
                geometry.y += delta.y;
            }
        }
    }

    /// Records one undo step for the whole drag, if anything moved.
    fn record_drag(&mut self) {
        let moves: Vec<_> = self
            .interaction
            .drag_original_positions
            .iter()
            .filter_map(|(id, old)| {
                let geometry = self.diagram.cell(id)?.geometry()?;
                let new = (geometry.x, geometry.y);
                (new != *old).then(|| (id.clone(), *old, new))
            })
            .collect();
        if !moves.is_empty() {
            self.undo_history.push_action(UndoAction::CellsMoved { moves });
            self.file.has_unsaved_changes = true;
        }
    }

    /// Creates the edge being drawn if the pointer was released over another vertex.
    fn finalize_edge(&mut self, world_pos: egui::Pos2) {
        let Some(from_id) = self.interaction.drawing_edge_from.clone() else {
            return;
        };
        let Some(to_id) = self.find_cell_at_position(world_pos) else {
            return;
        };
        if from_id == to_id {
            return;
        }
        let created = match self.interaction.edge_tool {
            EdgeTool::Connector => self.diagram.connect(&edge_style(NOT_EDITABLE_LINE), &from_id, &to_id),
            EdgeTool::Component(kind) => {
                let mut cell = Cell::edge(edge_style(kind.tag()), Some(from_id.clone()), Some(to_id.clone()));
                cell.value = Some(CellValue {
                    label: kind.display_name().to_string(),
                    attributes: AttributeBag::new(),
                });
                Ok(self.diagram.add_cell(cell))
            }
        };
        match created {
            Ok(edge_id) => {
                log::debug!("connected {from_id} -> {to_id} with {edge_id}");
                self.undo_history.push_action(UndoAction::CellsCreated {
                    cell_ids: vec![edge_id],
                });
                self.file.has_unsaved_changes = true;
            }
            Err(err) => log::warn!("could not connect {from_id} -> {to_id}: {err}"),
        }
    }

    /// World-space rectangle of a vertex.
    pub fn cell_world_rect(geometry: &Geometry) -> egui::Rect {
        egui::Rect::from_center_size(
            egui::pos2(geometry.x, geometry.y),
            egui::vec2(geometry.width, geometry.height),
        )
    }

    /// Finds the topmost vertex at the given world position, if any.
    pub fn find_cell_at_position(&self, pos: egui::Pos2) -> Option<CellId> {
        self.diagram
            .vertices()
            .filter(|cell| {
                cell.geometry()
                    .is_some_and(|geometry| Self::cell_world_rect(geometry).contains(pos))
            })
            .last()
            .map(|cell| cell.id.clone())
    }

    /// World-space centres of an edge's two ends, if both are vertices.
    pub fn edge_endpoints(&self, edge: &Cell) -> Option<(egui::Pos2, egui::Pos2)> {
        let (source, target) = edge.terminals()?;
        let centre = |id: Option<&CellId>| {
            let geometry = self.diagram.cell(id?)?.geometry()?;
            Some(egui::pos2(geometry.x, geometry.y))
        };
        Some((centre(source)?, centre(target)?))
    }

    /// Finds the topmost edge passing within [`EDGE_HIT_TOLERANCE`] of `pos`.
    pub fn find_edge_at_position(&self, pos: egui::Pos2) -> Option<CellId> {
        self.diagram
            .edges()
            .filter(|edge| {
                self.edge_endpoints(edge)
                    .is_some_and(|(start, end)| point_to_line_distance(pos, start, end) < EDGE_HIT_TOLERANCE)
            })
            .last()
            .map(|edge| edge.id.clone())
    }
}

/// Distance from a point to a line segment.
pub(crate) fn point_to_line_distance(point: egui::Pos2, line_start: egui::Pos2, line_end: egui::Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;
    let line_len_sq = line_vec.length_sq();

    if line_len_sq < 0.0001 {
        return point_vec.length();
    }

    let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    (point - (line_start + line_vec * t)).length()
}
