//! Canvas rendering for vertices, edges and the grid.
//!
//! Layers are drawn back to front: grid, edges, the edge preview, vertices,
//! then the marquee rectangle.

use super::highlighters;
use super::state::GridSketchApp;
use crate::components::ComponentKind;
use crate::types::*;
use eframe::egui;
use eframe::epaint::StrokeKind;

const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);

/// Fill colour for a vertex of the given kind.
fn kind_color(kind: Option<ComponentKind>) -> egui::Color32 {
    use ComponentKind::*;
    match kind {
        Some(Bus | DcBus) => egui::Color32::from_rgb(40, 40, 40),
        Some(ExternalGrid) => egui::Color32::from_rgb(170, 170, 230),
        Some(Generator | StaticGenerator | AsymmetricStaticGenerator) => egui::Color32::LIGHT_GREEN,
        Some(Load | AsymmetricLoad | DcLoad | Motor | Ward | ExtendedWard) => egui::Color32::LIGHT_RED,
        Some(Transformer | ThreeWindingTransformer | Impedance) => egui::Color32::LIGHT_BLUE,
        Some(Storage | DcSource) => egui::Color32::from_rgb(250, 210, 120),
        Some(SimulationParameters) => egui::Color32::from_rgb(220, 220, 160),
        Some(_) => egui::Color32::from_rgb(200, 200, 200),
        None => egui::Color32::from_rgb(235, 235, 235),
    }
}

impl GridSketchApp {
    /// Renders every diagram element on the canvas.
    pub fn render_diagram(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if self.canvas.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        for edge in self.diagram.edges() {
            let is_selected = self.interaction.selected_edge.as_deref() == Some(edge.id.as_str());
            self.draw_edge(painter, edge, is_selected);
        }

        if let (Some(from_id), Some(draw_pos)) = (
            self.interaction.drawing_edge_from.as_deref(),
            self.interaction.edge_draw_pos,
        ) {
            self.draw_edge_preview(painter, from_id, draw_pos);
        }

        for cell in self.diagram.vertices() {
            self.draw_vertex(painter, cell);
        }

        if let (Some(start), Some(end)) = (self.interaction.marquee_start, self.interaction.marquee_end) {
            let rect = egui::Rect::from_two_pos(start, end);
            painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(100, 150, 255, 40));
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.5, SELECTION_COLOR), StrokeKind::Inside);
        }
    }

    /// Draws a zoom-aware grid; skipped when lines would be under two pixels apart.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let grid_size = crate::constants::GRID_SIZE;
        if grid_size * self.canvas.zoom_factor < 2.0 {
            return;
        }
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32));

        let top_left = self.screen_to_world(canvas_rect.min);
        let bottom_right = self.screen_to_world(canvas_rect.max);

        let mut x = (top_left.x / grid_size).floor() * grid_size;
        while x <= bottom_right.x {
            let screen_x = self.world_to_screen(egui::pos2(x, 0.0)).x;
            painter.line_segment(
                [
                    egui::pos2(screen_x, canvas_rect.min.y),
                    egui::pos2(screen_x, canvas_rect.max.y),
                ],
                stroke,
            );
            x += grid_size;
        }

        let mut y = (top_left.y / grid_size).floor() * grid_size;
        while y <= bottom_right.y {
            let screen_y = self.world_to_screen(egui::pos2(0.0, y)).y;
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, screen_y),
                    egui::pos2(canvas_rect.max.x, screen_y),
                ],
                stroke,
            );
            y += grid_size;
        }
    }

    /// Draws an edge between the centres of its two vertices.
    ///
    /// Line components are drawn thicker and labelled at their midpoint;
    /// plain connectors are thin grey lines. Dangling edges are not drawn.
    pub fn draw_edge(&self, painter: &egui::Painter, edge: &Cell, is_selected: bool) {
        let Some((start, end)) = self.edge_endpoints(edge) else {
            return;
        };
        let start = self.world_to_screen(start);
        let end = self.world_to_screen(end);
        let zoom = self.canvas.zoom_factor;

        let kind = edge.component_kind().filter(|kind| kind.is_edge_kind());
        let (color, width) = match (is_selected, kind) {
            (true, _) => (SELECTION_COLOR, 3.0),
            (false, Some(ComponentKind::DcLine)) => (egui::Color32::from_rgb(200, 120, 40), 3.0),
            (false, Some(_)) => (egui::Color32::from_rgb(60, 90, 160), 3.0),
            (false, None) => (egui::Color32::DARK_GRAY, 1.5),
        };
        painter.line_segment([start, end], egui::Stroke::new(width * zoom.max(0.5), color));

        if kind.is_some() && !edge.label().is_empty() {
            let font_id = egui::FontId::proportional((11.0 * zoom).clamp(8.0, 36.0));
            let text_color = if self.dark_mode {
                egui::Color32::from_gray(220)
            } else {
                egui::Color32::from_gray(30)
            };
            painter.text(
                start + (end - start) * 0.5 + egui::vec2(6.0 * zoom, 0.0),
                egui::Align2::LEFT_CENTER,
                edge.label(),
                font_id,
                text_color,
            );
        }
    }

    /// Preview line from the source vertex to the pointer while drawing an edge.
    ///
    /// Red while hovering the source itself, which would not connect.
    pub fn draw_edge_preview(&self, painter: &egui::Painter, from_id: &str, to_screen_pos: egui::Pos2) {
        let Some(geometry) = self.diagram.cell(from_id).and_then(Cell::geometry) else {
            return;
        };
        let from_screen = self.world_to_screen(egui::pos2(geometry.x, geometry.y));
        let hovered = self.find_cell_at_position(self.screen_to_world(to_screen_pos));
        let color = if hovered.as_deref() == Some(from_id) {
            egui::Color32::from_rgb(255, 80, 80)
        } else {
            SELECTION_COLOR
        };
        painter.line_segment([from_screen, to_screen_pos], egui::Stroke::new(2.0, color));
        painter.circle_filled(to_screen_pos, 4.0, color);
    }

    /// Renders one vertex.
    ///
    /// Buses are drawn as solid bars with their name beside them; every
    /// other vertex is a rounded box coloured by component kind.
    pub fn draw_vertex(&self, painter: &egui::Painter, cell: &Cell) {
        let Some(geometry) = cell.geometry() else {
            return;
        };
        let zoom = self.canvas.zoom_factor;
        let screen_pos = self.world_to_screen(egui::pos2(geometry.x, geometry.y));
        let size = egui::vec2(geometry.width, geometry.height) * zoom;
        let rect = egui::Rect::from_center_size(screen_pos, size);
        let kind = cell.component_kind();

        let is_dragging = self.interaction.dragging_cell.as_deref() == Some(cell.id.as_str());
        let is_selected = self.interaction.selected_cells.contains(&cell.id);
        let mut color = kind_color(kind);
        if is_dragging {
            color = color.gamma_multiply(0.8);
        }

        let is_bus = kind.is_some_and(ComponentKind::is_bus_like);
        let rounding = if is_bus { 1.0 } else { 5.0 };
        painter.rect_filled(rect, rounding, color);

        let (stroke_color, stroke_width) = if is_dragging {
            (egui::Color32::from_rgb(255, 165, 0), 4.0)
        } else if is_selected {
            (egui::Color32::YELLOW, 3.0)
        } else if is_bus {
            (egui::Color32::BLACK, 1.0)
        } else {
            (egui::Color32::BLACK, 2.0)
        };
        painter.rect_stroke(
            rect,
            rounding,
            egui::Stroke::new(stroke_width, stroke_color),
            StrokeKind::Outside,
        );

        if is_bus {
            let font_id = egui::FontId::proportional((12.0 * zoom).clamp(8.0, 48.0));
            let text_color = if self.dark_mode {
                egui::Color32::from_gray(230)
            } else {
                egui::Color32::BLACK
            };
            painter.text(
                egui::pos2(rect.max.x + 6.0 * zoom, rect.center().y),
                egui::Align2::LEFT_CENTER,
                cell.label(),
                font_id,
                text_color,
            );
        } else {
            self.draw_vertex_text(painter, cell, kind, rect);
        }
    }

    /// Name plus a smaller kind caption, wrapped to the box.
    fn draw_vertex_text(
        &self,
        painter: &egui::Painter,
        cell: &Cell,
        kind: Option<ComponentKind>,
        rect: egui::Rect,
    ) {
        let zoom = self.canvas.zoom_factor;
        let font_id = egui::FontId::proportional((12.0 * zoom).clamp(8.0, 48.0));
        let caption_font = egui::FontId::proportional((9.0 * zoom).clamp(6.0, 36.0));

        let max_width = rect.width() - 10.0 * zoom;
        let lines = self.wrap_text(cell.label(), max_width, &font_id, painter);
        let line_height = painter.fonts_mut(|f| f.row_height(&font_id));
        let caption = kind.map(ComponentKind::display_name);
        let caption_height = if caption.is_some() {
            painter.fonts_mut(|f| f.row_height(&caption_font))
        } else {
            0.0
        };

        let total_height = line_height * lines.len() as f32 + caption_height;
        let mut y = rect.center().y - total_height / 2.0 + line_height / 2.0;
        for line in &lines {
            painter.text(
                egui::pos2(rect.center().x, y),
                egui::Align2::CENTER_CENTER,
                line,
                font_id.clone(),
                egui::Color32::BLACK,
            );
            y += line_height;
        }
        if let Some(caption) = caption {
            painter.text(
                egui::pos2(rect.center().x, y - line_height / 2.0 + caption_height / 2.0),
                egui::Align2::CENTER_CENTER,
                caption,
                caption_font,
                egui::Color32::from_gray(60),
            );
        }
    }

    /// Wraps text at word boundaries to fit `max_width`.
    ///
    /// A single word wider than the limit gets a line of its own.
    pub fn wrap_text(
        &self,
        text: &str,
        max_width: f32,
        font_id: &egui::FontId,
        painter: &egui::Painter,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current_line = String::new();

        for word in text.split_whitespace() {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{current_line} {word}")
            };
            let width = painter.fonts_mut(|f| {
                f.layout_no_wrap(candidate.clone(), font_id.clone(), egui::Color32::BLACK)
                    .size()
                    .x
            });

            if width <= max_width {
                current_line = candidate;
            } else if !current_line.is_empty() {
                lines.push(std::mem::replace(&mut current_line, word.to_string()));
            } else {
                lines.push(word.to_string());
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
        if lines.is_empty() {
            lines.push(text.to_string());
        }
        lines
    }
}

/// Layouter that highlights a read-only JSON document.
pub fn create_json_layouter(
    json: &str,
) -> impl FnMut(&egui::Ui, &dyn egui::TextBuffer, f32) -> std::sync::Arc<egui::Galley> + '_ {
    move |ui: &egui::Ui, _text: &dyn egui::TextBuffer, wrap_width: f32| {
        let font_id = egui::TextStyle::Monospace.resolve(ui.style());
        let mut layout_job = highlighters::highlight_json(json, font_id, ui.visuals().dark_mode);
        layout_job.wrap.max_width = wrap_width;
        ui.fonts_mut(|f| f.layout_job(layout_job))
    }
}
