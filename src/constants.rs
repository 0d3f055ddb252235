//! Shared editor-wide constants.
//! Centralizes tweakable values used across geometry, history and drag interactions.

// Node dimensions
/// Default node width in world units, used until the render layer reports a measured size.
pub const NODE_WIDTH: f32 = 240.0;
/// Default node height in world units.
pub const NODE_HEIGHT: f32 = 120.0;

// Zoom
/// Smallest zoom factor accepted from the render layer.
pub const MIN_ZOOM: f32 = 0.25;
/// Largest zoom factor accepted from the render layer.
pub const MAX_ZOOM: f32 = 5.0;

// Grid
// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 50;

// Clipboard
/// Offset applied from the clipboard's bounding-box minimum when pasting without an anchor.
pub const PASTE_OFFSET: f32 = 16.0;

// Alignment guides
/// Minimum distance the dragged node's centre must travel before guides are recomputed.
pub const GUIDE_MOVE_THRESHOLD: f32 = 2.0;
/// Maximum distance between two edges (or centres) for them to be reported as aligned.
pub const GUIDE_SNAP_TOLERANCE: f32 = 6.0;

// Selection-size minimums
/// Minimum number of selected nodes for align operations.
pub const MIN_ALIGN_SELECTION: usize = 2;
/// Minimum number of selected nodes for grouping.
pub const MIN_GROUP_SELECTION: usize = 2;
/// Minimum number of selected nodes for distribute operations.
pub const MIN_DISTRIBUTE_SELECTION: usize = 3;
