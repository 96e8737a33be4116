//! Item model: one placeable image on the canvas, its connection capability,
//! and the per-item interaction flags the renderer reads.
//!
//! An item's `x`/`y` is the top-left corner of its *unrotated* rectangle; the
//! rotation pivots around the rectangle center. Everything rotation-aware
//! (hit-testing, bounds, connector boxes) goes through [`crate::geometry`].

#[cfg(test)]
#[path = "item_test.rs"]
mod item_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{ICON_INSET, ICON_SIZE};
use crate::geometry::{self, Bounds, Point};
use crate::settings::Settings;

/// Unique identifier for an item. Fresh v4 ids are never reused.
pub type ItemId = Uuid;

/// Opaque handle to an externally owned image resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

/// An image the host has finished loading, with its intrinsic size.
pub trait ImageSource {
    /// Handle the renderer uses to find the pixels again.
    fn image_ref(&self) -> ImageRef;
    fn width(&self) -> f64;
    fn height(&self) -> f64;
}

/// Plain image description, for hosts that track pixels elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub image: ImageRef,
    pub width: f64,
    pub height: f64,
}

impl ImageSource for ImageInfo {
    fn image_ref(&self) -> ImageRef {
        self.image.clone()
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

/// Which edges of the unrotated item accept a neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    #[default]
    None,
    Left,
    Right,
    Both,
}

/// A rectangle edge, in clockwise order starting from the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

    /// The edge this one lands on after `turns` clockwise quarter turns.
    #[must_use]
    pub fn rotated_cw(self, turns: u8) -> Self {
        let idx = match self {
            Self::Left => 0,
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 3,
        };
        Self::ALL[(idx + usize::from(turns)) % 4]
    }

    /// The edge facing this one across a gap.
    #[must_use]
    pub fn opposite(self) -> Self {
        self.rotated_cw(2)
    }
}

/// Capability resolved against the item's current rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// A single connector, currently facing this scene-space side.
    Single(Side),
    /// Connectors on both ends; compatible with any side.
    Both,
}

impl Facing {
    /// Whether a neighbour may attach on `side`.
    #[must_use]
    pub fn offers(self, side: Side) -> bool {
        match self {
            Self::Both => true,
            Self::Single(s) => s == side,
        }
    }
}

/// Resolved side of a connection preview, as seen from the stationary item.
///
/// The `Both*` variants mark a match where both items carry connectors on
/// both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionTag {
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "top")]
    Top,
    #[serde(rename = "bottom")]
    Bottom,
    #[serde(rename = "bLeft")]
    BothLeft,
    #[serde(rename = "bRight")]
    BothRight,
    #[serde(rename = "bTop")]
    BothTop,
    #[serde(rename = "bBottom")]
    BothBottom,
}

impl ConnectionTag {
    #[must_use]
    pub fn new(side: Side, both: bool) -> Self {
        match (side, both) {
            (Side::Left, false) => Self::Left,
            (Side::Right, false) => Self::Right,
            (Side::Top, false) => Self::Top,
            (Side::Bottom, false) => Self::Bottom,
            (Side::Left, true) => Self::BothLeft,
            (Side::Right, true) => Self::BothRight,
            (Side::Top, true) => Self::BothTop,
            (Side::Bottom, true) => Self::BothBottom,
        }
    }

    /// Scene-space edge of the stationary item the dragged item will attach to.
    #[must_use]
    pub fn side(self) -> Side {
        match self {
            Self::Left | Self::BothLeft => Side::Left,
            Self::Right | Self::BothRight => Side::Right,
            Self::Top | Self::BothTop => Side::Top,
            Self::Bottom | Self::BothBottom => Side::Bottom,
        }
    }

    #[must_use]
    pub fn is_both(self) -> bool {
        matches!(self, Self::BothLeft | Self::BothRight | Self::BothTop | Self::BothBottom)
    }
}

/// Live connection preview on a stationary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionMatch {
    /// Which of this item's edges the partner is approaching.
    pub side: ConnectionTag,
    /// The item being dragged toward this one. Resolve through the scene;
    /// it may have been removed since.
    pub partner: ItemId,
}

/// Connector geometry captured when the item is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideBox {
    pub width: f64,
    pub height_ratio: f64,
    pub padding: f64,
}

impl From<&Settings> for SideBox {
    fn from(s: &Settings) -> Self {
        Self { width: s.side_box_width, height_ratio: s.side_box_height_ratio, padding: s.side_box_padding }
    }
}

/// A placed image.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub image: ImageRef,
    pub width: f64,
    pub height: f64,
    /// Left edge of the unrotated rectangle.
    pub x: f64,
    /// Top edge of the unrotated rectangle.
    pub y: f64,
    /// Clockwise rotation in degrees, always in `0..360`.
    pub rotation: i32,
    pub capability: Capability,
    /// Items this one is loosely associated with. Not kept in sync with the
    /// scene; ids may be stale.
    pub peers: BTreeSet<ItemId>,
    pub side_box: SideBox,
    pub selected: bool,
    pub dragging: bool,
    pub collision: bool,
    pub connection: Option<ConnectionMatch>,
}

impl Item {
    /// Create an unrotated, unselected item with its top-left corner at `(x, y)`.
    #[must_use]
    pub fn new(
        image: &impl ImageSource,
        x: f64,
        y: f64,
        capability: Capability,
        peers: BTreeSet<ItemId>,
        settings: &Settings,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            image: image.image_ref(),
            width: image.width(),
            height: image.height(),
            x,
            y,
            rotation: 0,
            capability,
            peers,
            side_box: SideBox::from(settings),
            selected: false,
            dragging: false,
            collision: false,
            connection: None,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Envelope of the rotated rectangle.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        geometry::rotated_bounds(self)
    }

    /// Envelope of the connector box currently facing `side`.
    #[must_use]
    pub fn side_box_bounds(&self, side: Side) -> Bounds {
        geometry::side_box_bounds(self, side)
    }

    /// Whether `pt` lies on the rotated rectangle (border inclusive).
    #[must_use]
    pub fn contains_point(&self, pt: Point) -> bool {
        let local = geometry::to_local_space(self, pt);
        self.local_body().contains(local)
    }

    /// Whether `pt` lies on the close icon at the top-left corner.
    #[must_use]
    pub fn close_icon_hit(&self, pt: Point) -> bool {
        self.close_icon_rect().contains(geometry::to_local_space(self, pt))
    }

    /// Whether `pt` lies on the rotate icon at the top-right corner.
    #[must_use]
    pub fn rotate_icon_hit(&self, pt: Point) -> bool {
        self.rotate_icon_rect().contains(geometry::to_local_space(self, pt))
    }

    /// Which of the item's own connector boxes lies under `pt`, in local terms.
    #[must_use]
    pub fn side_box_hit(&self, pt: Point) -> Option<Side> {
        let local = geometry::to_local_space(self, pt);
        self.local_connector_sides()
            .into_iter()
            .find(|s| geometry::local_side_box(self, *s).contains(local))
    }

    /// Unrotated body rectangle relative to the center.
    #[must_use]
    pub fn local_body(&self) -> Bounds {
        Bounds::from_rect(-self.width / 2.0, -self.height / 2.0, self.width, self.height)
    }

    /// Close icon rectangle in the local frame.
    #[must_use]
    pub fn close_icon_rect(&self) -> Bounds {
        let x = -self.width / 2.0 - ICON_SIZE + ICON_INSET;
        let y = -self.height / 2.0 - ICON_SIZE;
        Bounds::from_rect(x, y, ICON_SIZE, ICON_SIZE)
    }

    /// Rotate icon rectangle in the local frame.
    #[must_use]
    pub fn rotate_icon_rect(&self) -> Bounds {
        let x = self.width / 2.0 - ICON_INSET;
        let y = -self.height / 2.0 - ICON_SIZE;
        Bounds::from_rect(x, y, ICON_SIZE, ICON_SIZE)
    }

    /// Local sides that carry a connector, regardless of rotation.
    #[must_use]
    pub fn local_connector_sides(&self) -> Vec<Side> {
        match self.capability {
            Capability::None => Vec::new(),
            Capability::Left => vec![Side::Left],
            Capability::Right => vec![Side::Right],
            Capability::Both => vec![Side::Left, Side::Right],
        }
    }

    /// Add `delta` degrees and wrap into `0..360`.
    pub fn rotate(&mut self, delta: i32) {
        self.rotation = (self.rotation + delta.rem_euclid(360)).rem_euclid(360);
    }

    /// The capability mapped through the current rotation.
    ///
    /// A single connector follows the edge it is physically on; `Both` stays
    /// `Both` at every angle; `None` yields `None`.
    #[must_use]
    pub fn adjusted_side(&self) -> Option<Facing> {
        let turns = geometry::quarter_turns(self.rotation);
        match self.capability {
            Capability::None => None,
            Capability::Both => Some(Facing::Both),
            Capability::Left => Some(Facing::Single(Side::Left.rotated_cw(turns))),
            Capability::Right => Some(Facing::Single(Side::Right.rotated_cw(turns))),
        }
    }

    /// Drop selection, drag, collision and preview state.
    pub fn clear_interaction(&mut self) {
        self.selected = false;
        self.dragging = false;
        self.collision = false;
        self.connection = None;
    }
}
