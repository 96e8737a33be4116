//! Canvas layout and snapping engine for the room planner.
//!
//! This crate is compiled to WebAssembly for the browser and as a plain
//! library for native hosts. It owns the interaction model of the layout
//! canvas: placing image items, hit-testing them under rotation, dragging
//! with canvas clamping, detecting collisions, and previewing and committing
//! side-to-side connections between modular pieces. Hosts feed it
//! canvas-local pointer events and read back [`engine::Action`]s and
//! [`engine::RenderItem`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`scene`] | Z-ordered item registry |
//! | [`item`] | Item model, capabilities, sides and connection tags |
//! | [`geometry`] | Points, bounds, rotation transforms, overlap tests |
//! | [`connect`] | Connection matching and snap placement |
//! | [`input`] | The select/drag state machine |
//! | [`hit`] | Hit-testing bodies and selection icons |
//! | [`render`] | Canvas2D drawing |
//! | [`settings`] | Tunable connector geometry and rotate step |
//! | [`consts`] | Shared numeric constants (icon sizes, defaults, cursors) |

pub mod connect;
pub mod consts;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod item;
pub mod render;
pub mod scene;
pub mod settings;
