//! Application state management structures.
//!
//! This module contains the state structures that track the editor's current
//! UI state: canvas navigation, user interactions, the palette menu, file
//! operations and the solver round trip.

use super::undo::UndoHistory;
use crate::components::ComponentKind;
use crate::dialog::DialogManager;
use crate::solver::SolverConfig;
use crate::types::*;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// State related to canvas navigation and display.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Current canvas pan offset (in screen space)
    #[serde(skip)]
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal)
    pub zoom_factor: f32,
    pub show_grid: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            show_grid: true,
        }
    }
}

/// What a shift-drag between two vertices creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeTool {
    /// Plain connector, never part of the payload
    Connector,
    /// An edge-drawn component (Line or DC Line)
    Component(ComponentKind),
}

/// State related to user interactions with cells and canvas.
///
/// Nothing here outlives a session.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionState {
    /// Selected vertices
    #[serde(skip)]
    pub selected_cells: Vec<CellId>,
    #[serde(skip)]
    pub selected_edge: Option<CellId>,
    /// Vertex whose name is being edited in the properties panel
    #[serde(skip)]
    pub editing_name: Option<CellId>,
    #[serde(skip)]
    pub temp_name: String,
    #[serde(skip)]
    pub should_select_text: bool,
    #[serde(skip)]
    pub focus_requested_for_edit: bool,
    #[serde(skip)]
    pub dragging_cell: Option<CellId>,
    /// Positions of every dragged vertex before the drag, for undo
    #[serde(skip)]
    pub drag_original_positions: Vec<(CellId, (f32, f32))>,
    /// Offset from mouse to the dragged vertex's centre
    #[serde(skip)]
    pub drag_offset: egui::Vec2,
    #[serde(skip)]
    pub is_panning: bool,
    #[serde(skip)]
    pub last_pan_pos: Option<egui::Pos2>,
    /// Marquee corners in screen space
    #[serde(skip)]
    pub marquee_start: Option<egui::Pos2>,
    #[serde(skip)]
    pub marquee_end: Option<egui::Pos2>,
    #[serde(skip)]
    pub marquee_additive: bool,
    /// Vertex an edge is being drawn from
    #[serde(skip)]
    pub drawing_edge_from: Option<CellId>,
    #[serde(skip)]
    pub edge_draw_pos: Option<egui::Pos2>,
    /// Shift-press on a vertex that becomes an edge once dragged far enough
    #[serde(skip)]
    pub pending_shift_from: Option<CellId>,
    #[serde(skip)]
    pub pending_shift_start: Option<egui::Pos2>,
    #[serde(skip)]
    pub edge_tool: EdgeTool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            selected_cells: Vec::new(),
            selected_edge: None,
            editing_name: None,
            temp_name: String::new(),
            should_select_text: false,
            focus_requested_for_edit: false,
            dragging_cell: None,
            drag_original_positions: Vec::new(),
            drag_offset: egui::Vec2::ZERO,
            is_panning: false,
            last_pan_pos: None,
            marquee_start: None,
            marquee_end: None,
            marquee_additive: false,
            drawing_edge_from: None,
            edge_draw_pos: None,
            pending_shift_from: None,
            pending_shift_start: None,
            edge_tool: EdgeTool::Connector,
        }
    }
}

impl InteractionState {
    /// The single selected vertex, if exactly one is selected.
    pub fn selected_cell(&self) -> Option<&CellId> {
        match self.selected_cells.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_cells.clear();
        self.selected_edge = None;
        self.editing_name = None;
    }

    /// Adds or removes a vertex from the selection.
    pub fn toggle_selected(&mut self, id: &str) {
        match self.selected_cells.iter().position(|s| s == id) {
            Some(index) => {
                self.selected_cells.remove(index);
            }
            None => self.selected_cells.push(id.to_string()),
        }
        self.selected_edge = None;
        self.editing_name = None;
    }
}

/// Right-click component palette.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct ContextMenuState {
    #[serde(skip)]
    pub show: bool,
    #[serde(skip)]
    pub screen_pos: (f32, f32),
    /// Where a picked component is placed
    #[serde(skip)]
    pub world_pos: (f32, f32),
    /// Keeps the menu from closing on the click that opened it
    #[serde(skip)]
    pub just_opened: bool,
}

impl Default for ContextMenuState {
    fn default() -> Self {
        Self {
            show: false,
            screen_pos: (0.0, 0.0),
            world_pos: (0.0, 0.0),
            just_opened: false,
        }
    }
}

/// State related to file operations and persistence.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct FileState {
    #[serde(skip)]
    pub current_path: Option<String>,
    #[serde(skip)]
    pub has_unsaved_changes: bool,
    #[serde(skip)]
    pub pending_operation: Option<PendingFileOperation>,
    /// Channel for receiving results from background file tasks
    #[serde(skip)]
    pub file_operation_sender: Option<Sender<FileOperationResult>>,
    #[serde(skip)]
    pub file_operation_receiver: Option<Receiver<FileOperationResult>>,
    #[serde(skip)]
    pub show_unsaved_dialog: bool,
    #[serde(skip)]
    pub pending_confirm_action: Option<PendingConfirmAction>,
    /// One-shot pass for the next close request after confirmation
    #[serde(skip)]
    pub allow_close_on_next_request: bool,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            current_path: None,
            has_unsaved_changes: false,
            pending_operation: None,
            file_operation_sender: Some(sender),
            file_operation_receiver: Some(receiver),
            show_unsaved_dialog: false,
            pending_confirm_action: None,
            allow_close_on_next_request: false,
        }
    }
}

/// File work queued for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingFileOperation {
    /// Pick a path, then save
    SaveAs,
    /// Save to the current path
    Save,
    /// Pick a diagram file and load it
    Load,
    /// Pick an mxGraph XML file and import it
    ImportXml,
    /// Pick a path and write the flattened payload
    ExportPayload,
}

/// Messages sent from background file tasks back to the app.
#[derive(Debug)]
pub enum FileOperationResult {
    SaveCompleted(String),
    /// Path and file content
    LoadCompleted(String, String),
    /// Path and the parsed drawing
    ImportCompleted(String, Diagram),
    ExportCompleted(String),
    OperationFailed(String),
}

/// Actions that need confirmation while there are unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirmAction {
    New,
    Open,
    ImportXml,
    /// Replace the diagram with a built-in sample
    LoadSample(crate::examples::ExampleKind),
    Quit,
}

/// Outcome of one solver round trip, as sent back from the worker.
pub type SolverOutcome = Result<serde_json::Value, String>;

/// Solver settings and the request in flight.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct SolverState {
    pub config: SolverConfig,
    #[serde(skip)]
    pub in_flight: bool,
    #[serde(skip)]
    pub sender: Option<Sender<SolverOutcome>>,
    #[serde(skip)]
    pub receiver: Option<Receiver<SolverOutcome>>,
    /// Last successful response, shown in the results window
    #[serde(skip)]
    pub last_result: Option<serde_json::Value>,
    #[serde(skip)]
    pub show_settings: bool,
    /// Timeout text while the settings window is open
    #[serde(skip)]
    pub temp_timeout: String,
}

impl Default for SolverState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            config: SolverConfig::from_env(),
            in_flight: false,
            sender: Some(sender),
            receiver: Some(receiver),
            last_result: None,
            show_settings: false,
            temp_timeout: String::new(),
        }
    }
}

/// The editor: the diagram being drawn plus all UI state.
///
/// Implements `eframe::App`; everything not marked `skip` is persisted
/// between sessions.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct GridSketchApp {
    /// Drawing being edited
    pub diagram: Diagram,
    /// Pan and zoom
    pub canvas: CanvasState,
    /// Selection, drag and edge-drawing state
    pub interaction: InteractionState,
    /// Right-click menu
    pub context_menu: ContextMenuState,
    /// Current path and pending file operations
    pub file: FileState,
    /// Component parameter dialogs
    #[serde(skip)]
    pub dialogs: DialogManager,
    /// Solver settings and the in-flight request
    pub solver: SolverState,
    /// Undo and redo stacks
    pub undo_history: UndoHistory,
    /// Message shown in the blocking alert window
    #[serde(skip)]
    pub alert: Option<String>,
    /// Payload preview window contents
    #[serde(skip)]
    pub payload_preview: Option<String>,
    /// Dark or light visuals
    pub dark_mode: bool,
    /// Width of the right-hand properties panel
    pub properties_panel_width: f32,
    /// Last known window inner size in logical points
    pub window_inner_size: Option<(f32, f32)>,
    /// Set once the saved window size has been applied
    #[serde(skip)]
    pub applied_viewport_restore: bool,
}

impl Default for GridSketchApp {
    fn default() -> Self {
        Self {
            diagram: Diagram::new(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            context_menu: ContextMenuState::default(),
            file: FileState::default(),
            dialogs: DialogManager::new(),
            solver: SolverState::default(),
            undo_history: UndoHistory::new(),
            alert: None,
            payload_preview: None,
            dark_mode: true,
            properties_panel_width: 300.0,
            window_inner_size: None,
            applied_viewport_restore: false,
        }
    }
}

impl GridSketchApp {
    /// Serializes the application state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Shows `message` in the alert window and logs it.
    pub fn show_alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{message}");
        self.alert = Some(message);
    }

    /// Drops everything but UI preferences, so only settings persist.
    pub fn reset_non_ui_fields(&mut self) {
        let solver_config = self.solver.config.clone();
        *self = Self {
            properties_panel_width: self.properties_panel_width,
            window_inner_size: self.window_inner_size,
            applied_viewport_restore: self.applied_viewport_restore,
            dark_mode: self.dark_mode,
            ..Default::default()
        };
        self.solver.config = solver_config;
    }
}
