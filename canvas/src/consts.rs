//! Shared numeric constants for the canvas crate.

// ── Connectors ──────────────────────────────────────────────────

/// Thickness of a connector box, measured away from the item edge.
pub const SIDE_BOX_WIDTH: f64 = 40.0;

/// Connector box length as a fraction of the edge it sits on.
pub const SIDE_BOX_HEIGHT_RATIO: f64 = 0.65;

/// Extra clearance added on top of the connector width when snapping.
pub const SIDE_BOX_PADDING: f64 = 40.0;

// ── Rotation ────────────────────────────────────────────────────

/// Degrees applied by one click on the rotate icon.
pub const ROTATE_STEP_DEG: i32 = 90;

// ── Selection icons ─────────────────────────────────────────────

/// Edge length of the close and rotate icons, in canvas pixels.
pub const ICON_SIZE: f64 = 25.0;

/// How far each icon overlaps inward past the item's side edge.
pub const ICON_INSET: f64 = 10.0;

// ── Cursors ─────────────────────────────────────────────────────

/// Cursor shown while the pointer is over an actionable icon.
pub const CURSOR_POINTER: &str = "pointer";

/// Cursor shown everywhere else on the canvas.
pub const CURSOR_MOVE: &str = "move";
