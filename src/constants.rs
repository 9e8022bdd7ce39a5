//! Shared application-wide constants.
//! Centralizes the style keys understood by the flattening pass and the
//! tweakable values used across UI rendering and interactions.

// Style conventions
/// Style key whose value names the electrical component type of a cell.
pub const STYLE_TAG_KEY: &str = "shapeELXXX";
/// Tag value marking plain connector edges; such cells never reach the solver.
pub const NOT_EDITABLE_LINE: &str = "NotEditableLine";

// Node dimensions
/// Default vertex width in world units.
pub const NODE_WIDTH: f32 = 90.0;
/// Default vertex height in world units.
pub const NODE_HEIGHT: f32 = 56.0;
/// Busbars are drawn as long thin bars.
pub const BUS_WIDTH: f32 = 160.0;
/// Busbar height in world units.
pub const BUS_HEIGHT: f32 = 10.0;

// Grid/drawing
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;

// Canvas interactions
/// Click threshold in world units used for distinguishing click vs drag.
pub const CLICK_THRESHOLD: f32 = 10.0;
/// Maximum distance in world units at which a click still hits an edge.
pub const EDGE_HIT_TOLERANCE: f32 = 6.0;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 100;

// Solver
/// Endpoint used when neither the persisted settings nor the environment name one.
pub const DEFAULT_SOLVER_URL: &str = "http://127.0.0.1:5000/";
/// Request timeout used when none is configured.
pub const DEFAULT_SOLVER_TIMEOUT_SECS: u64 = 60;
/// Environment variable overriding the solver endpoint.
pub const SOLVER_URL_ENV: &str = "GRIDSKETCH_SOLVER_URL";
/// Environment variable overriding the solver timeout in seconds.
pub const SOLVER_TIMEOUT_ENV: &str = "GRIDSKETCH_SOLVER_TIMEOUT";
