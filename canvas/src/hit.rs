#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::Point;
use crate::item::ItemId;
use crate::scene::Scene;

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    CloseIcon,
    RotateIcon,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// Test which item (if any) is under `pt`.
///
/// The selected item's icons are checked first since they sit outside its
/// body and may overlap other items. The rotate icon wins over the close icon.
/// Bodies are then checked topmost first. Does not reorder the scene.
#[must_use]
pub fn hit_test(pt: Point, scene: &Scene, selected_id: Option<ItemId>) -> Option<Hit> {
    if let Some(item) = selected_id.and_then(|id| scene.get(&id)).filter(|i| i.selected) {
        if item.rotate_icon_hit(pt) {
            return Some(Hit { item_id: item.id, part: HitPart::RotateIcon });
        }
        if item.close_icon_hit(pt) {
            return Some(Hit { item_id: item.id, part: HitPart::CloseIcon });
        }
    }
    scene
        .topmost_at(pt)
        .map(|item_id| Hit { item_id, part: HitPart::Body })
}

/// Whether `pt` is over one of the selected item's icons.
#[must_use]
pub fn over_icon(pt: Point, scene: &Scene, selected_id: Option<ItemId>) -> bool {
    hit_test(pt, scene, selected_id).is_some_and(|h| h.part != HitPart::Body)
}
