//! Connection matching: which stationary item the dragged item is about to
//! attach to, and where it lands when released.
//!
//! Two items match when their adjusted sides face each other (`left` with
//! `right`, `top` with `bottom`, `both` with anything) and the connector boxes
//! on those facing edges overlap. The preview is stored on the stationary item
//! as a [`ConnectionMatch`] naming the dragged item by id, so removing either
//! item never leaves a dangling reference.

#[cfg(test)]
#[path = "connect_test.rs"]
mod connect_test;

use tracing::trace;

use crate::geometry::{Point, overlaps};
use crate::item::{ConnectionMatch, ConnectionTag, Facing, Item, ItemId, Side};
use crate::scene::Scene;

/// `(dragged side, stationary side)` pairs, probed in this order.
const PROBES: [(Side, Side); 4] = [
    (Side::Right, Side::Left),
    (Side::Left, Side::Right),
    (Side::Top, Side::Bottom),
    (Side::Bottom, Side::Top),
];

/// Outcome of a committed snap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub partner: ItemId,
    pub side: ConnectionTag,
    /// New top-left of the dragged item.
    pub position: Point,
}

/// Tag for a connection between `dragged` and `stationary`, if their facing
/// connector boxes overlap.
#[must_use]
pub fn find_match(dragged: &Item, stationary: &Item) -> Option<ConnectionTag> {
    let d = dragged.adjusted_side()?;
    let s = stationary.adjusted_side()?;
    let both = d == Facing::Both && s == Facing::Both;

    PROBES
        .into_iter()
        .find(|&(ds, ss)| {
            d.offers(ds)
                && s.offers(ss)
                && overlaps(&dragged.side_box_bounds(ds), &stationary.side_box_bounds(ss))
        })
        .map(|(_, ss)| ConnectionTag::new(ss, both))
}

/// Recompute previews on every item other than `dragged_id`.
///
/// Each item keeps its own preview: the first probe pair that matches sets
/// it, no match clears it. Returns the first matching item in z-order
/// (bottom first), if any.
pub fn refresh_previews(scene: &mut Scene, dragged_id: ItemId) -> Option<(ItemId, ConnectionTag)> {
    let dragged = scene.get(&dragged_id)?.clone();
    let mut found = None;
    for item in scene.iter_mut().filter(|i| i.id != dragged_id) {
        let tag = find_match(&dragged, item);
        item.connection = tag.map(|side| ConnectionMatch { side, partner: dragged_id });
        if let Some(side) = tag {
            found = found.or(Some((item.id, side)));
        }
    }
    trace!(%dragged_id, ?found, "connection previews refreshed");
    found
}

/// Top-left position that puts `dragged` against `stationary`'s `tag` side.
///
/// Facing edges end up `side_box.width + side_box.padding` apart (taken from
/// the dragged item), and the perpendicular axis is centered on the
/// stationary item. The gap is measured between the facing envelope edges,
/// not from the stationary item's center. Works on rotated envelopes, so
/// quarter-turned items attach by their visible edges.
#[must_use]
pub fn snap_position(dragged: &Item, stationary: &Item, tag: ConnectionTag) -> Point {
    let gap = dragged.side_box.width + dragged.side_box.padding;
    let sb = stationary.bounds();
    let db = dragged.bounds();
    let sc = sb.center();

    let center = match tag.side() {
        Side::Left => Point::new(sb.min_x - gap - db.width() / 2.0, sc.y),
        Side::Right => Point::new(sb.max_x + gap + db.width() / 2.0, sc.y),
        Side::Top => Point::new(sc.x, sb.min_y - gap - db.height() / 2.0),
        Side::Bottom => Point::new(sc.x, sb.max_y + gap + db.height() / 2.0),
    };
    Point::new(center.x - dragged.width / 2.0, center.y - dragged.height / 2.0)
}

/// Move `dragged_id` flush against the item holding a live preview on it.
///
/// Returns `None` (and moves nothing) when no item is previewing a match.
pub fn snap_merge(scene: &mut Scene, dragged_id: ItemId) -> Option<Snap> {
    let (stationary, m) = scene.match_holder(&dragged_id)?;
    let dragged = scene.get(&dragged_id)?;
    let position = snap_position(dragged, stationary, m.side);
    let partner = stationary.id;

    let item = scene.get_mut(&dragged_id)?;
    item.x = position.x;
    item.y = position.y;
    Some(Snap { partner, side: m.side, position })
}
