//! Rotation-aware geometry: points, axis-aligned bounds, and the transforms
//! between scene space and an item's unrotated local frame.
//!
//! Every overlap test in the engine runs on axis-aligned envelopes of rotated
//! corners. For the quarter-turn rotations items actually use the envelope is
//! exact; for anything else it over-approximates the rotated rectangle.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::item::{Item, Side};

/// A point in scene (canvas-local) or item-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box given by its extreme coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Box with top-left corner `(x, y)` and the given size.
    #[must_use]
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { min_x: x, max_x: x + width, min_y: y, max_y: y + height }
    }

    /// Smallest box containing every point. An empty slice yields a box
    /// collapsed at the origin.
    #[must_use]
    pub fn envelope(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::from_rect(0.0, 0.0, 0.0, 0.0);
        };
        points.iter().skip(1).fold(
            Self { min_x: first.x, max_x: first.x, min_y: first.y, max_y: first.y },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Inclusive containment; points on the border count as inside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.min_x && pt.x <= self.max_x && pt.y >= self.min_y && pt.y <= self.max_y
    }
}

/// Strict overlap: boxes that only share an edge do not overlap.
#[must_use]
pub fn overlaps(a: &Bounds, b: &Bounds) -> bool {
    !(a.max_x <= b.min_x || b.max_x <= a.min_x || a.max_y <= b.min_y || b.max_y <= a.min_y)
}

/// `(sin, cos)` of an integer angle in degrees. Quarter turns are exact so
/// that rotated edges land on whole coordinates.
#[must_use]
pub fn sin_cos_deg(degrees: i32) -> (f64, f64) {
    match degrees.rem_euclid(360) {
        0 => (0.0, 1.0),
        90 => (1.0, 0.0),
        180 => (0.0, -1.0),
        270 => (-1.0, 0.0),
        d => f64::from(d).to_radians().sin_cos(),
    }
}

/// Rotate `pt` about the origin by `degrees` (clockwise on a y-down canvas).
#[must_use]
pub fn rotate_point(pt: Point, degrees: i32) -> Point {
    let (sin, cos) = sin_cos_deg(degrees);
    Point::new(pt.x * cos - pt.y * sin, pt.x * sin + pt.y * cos)
}

/// Number of clockwise quarter turns nearest to `degrees`, in `0..4`.
#[must_use]
pub fn quarter_turns(degrees: i32) -> u8 {
    let steps = (degrees.rem_euclid(360) + 45) / 90 % 4;
    u8::try_from(steps).unwrap_or(0)
}

/// Express a scene point in the item's unrotated frame, centered on the item.
#[must_use]
pub fn to_local_space(item: &Item, pt: Point) -> Point {
    let c = item.center();
    rotate_point(Point::new(pt.x - c.x, pt.y - c.y), -item.rotation)
}

/// Map a local-frame rectangle (relative to the item center) into scene space
/// and return its envelope.
fn local_rect_to_scene(item: &Item, local: &Bounds) -> Bounds {
    let c = item.center();
    let corners = [
        Point::new(local.min_x, local.min_y),
        Point::new(local.max_x, local.min_y),
        Point::new(local.max_x, local.max_y),
        Point::new(local.min_x, local.max_y),
    ]
    .map(|p| {
        let r = rotate_point(p, item.rotation);
        Point::new(r.x + c.x, r.y + c.y)
    });
    Bounds::envelope(&corners)
}

/// Envelope of the item's four corners after rotation about its center.
#[must_use]
pub fn rotated_bounds(item: &Item) -> Bounds {
    let hw = item.width / 2.0;
    let hh = item.height / 2.0;
    local_rect_to_scene(item, &Bounds { min_x: -hw, max_x: hw, min_y: -hh, max_y: hh })
}

/// Connector box on the edge that currently faces `side` in scene space.
///
/// The box sits flush outside that edge, `side_box.width` thick, with its
/// length a fixed fraction of the edge length, centered along the edge.
#[must_use]
pub fn side_box_bounds(item: &Item, side: Side) -> Bounds {
    let local_side = side.rotated_cw(4 - quarter_turns(item.rotation));
    local_rect_to_scene(item, &local_side_box(item, local_side))
}

/// Connector box for a side of the unrotated item, relative to its center.
#[must_use]
pub fn local_side_box(item: &Item, local_side: Side) -> Bounds {
    let hw = item.width / 2.0;
    let hh = item.height / 2.0;
    let thick = item.side_box.width;
    let ratio = item.side_box.height_ratio;
    match local_side {
        Side::Left | Side::Right => {
            let half_len = item.height * ratio / 2.0;
            let (min_x, max_x) = if local_side == Side::Left { (-hw - thick, -hw) } else { (hw, hw + thick) };
            Bounds { min_x, max_x, min_y: -half_len, max_y: half_len }
        }
        Side::Top | Side::Bottom => {
            let half_len = item.width * ratio / 2.0;
            let (min_y, max_y) = if local_side == Side::Top { (-hh - thick, -hh) } else { (hh, hh + thick) };
            Bounds { min_x: -half_len, max_x: half_len, min_y, max_y }
        }
    }
}
