use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::connect::{self, Snap};
use crate::consts::{CURSOR_MOVE, CURSOR_POINTER};
use crate::geometry::Point;
use crate::hit::{self, Hit, HitPart};
use crate::input::InputState;
use crate::item::{Capability, ConnectionMatch, ConnectionTag, ImageRef, ImageSource, Item, ItemId};
use crate::render;
use crate::scene::Scene;
use crate::settings::{Settings, SettingsError};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Selected { id: ItemId },
    Deselected,
    ItemRotated { id: ItemId, rotation: i32 },
    ItemRemoved { id: ItemId },
    ItemMoved { id: ItemId, x: f64, y: f64 },
    DragReverted { id: ItemId, x: f64, y: f64 },
    Snapped { id: ItemId, partner: ItemId, side: ConnectionTag, x: f64, y: f64 },
    SetCursor(String),
    RenderNeeded,
}

/// Result of one drag tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    /// Clamped top-left the item was moved to.
    pub position: Point,
    /// First item the dragged item now overlaps, if any.
    pub collision: Option<ItemId>,
    /// Stationary item previewing a connection, with its tag.
    pub matched: Option<(ItemId, ConnectionTag)>,
}

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEnd {
    /// Dropped where it was.
    Dropped { id: ItemId },
    /// The drop collided; the item went back to its pre-drag position.
    Reverted { id: ItemId, position: Point },
    /// The item was moved against a matched partner.
    Snapped { id: ItemId, snap: Snap },
}

/// Everything a renderer needs to draw one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub id: ItemId,
    pub image: ImageRef,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: i32,
    pub capability: Capability,
    pub selected: bool,
    pub dragging: bool,
    pub collision: bool,
    /// Connection preview, present only while the partner still exists.
    pub connection: Option<ConnectionMatch>,
}

impl From<&Item> for RenderItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            image: item.image.clone(),
            x: item.x,
            y: item.y,
            width: item.width,
            height: item.height,
            rotation: item.rotation,
            capability: item.capability,
            selected: item.selected,
            dragging: item.dragging,
            collision: item.collision,
            connection: item.connection,
        }
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub scene: Scene,
    pub input: InputState,
    pub settings: Settings,
    pub canvas_width: f64,
    pub canvas_height: f64,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            scene: Scene::new(),
            input: InputState::default(),
            settings: Settings::default(),
            canvas_width: 0.0,
            canvas_height: 0.0,
            cursor: CURSOR_MOVE,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom settings.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found in `settings`.
    pub fn with_settings(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { settings, ..Self::default() })
    }

    /// Record the canvas size used to clamp pointer-driven drags.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    // --- Registry operations ---

    /// Place a new item centered on `center`, on top of the z-order.
    pub fn add_item(
        &mut self,
        image: &impl ImageSource,
        center: Point,
        capability: Capability,
        peers: BTreeSet<ItemId>,
    ) -> ItemId {
        let x = center.x - image.width() / 2.0;
        let y = center.y - image.height() / 2.0;
        let item = Item::new(image, x, y, capability, peers, &self.settings);
        let id = self.scene.add(item);
        debug!(%id, x, y, ?capability, "item added");
        id
    }

    /// Remove an item. Clears the selection if it was the selected item.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        if self.scene.remove(id).is_none() {
            return false;
        }
        if self.input.involves(id) {
            self.input = InputState::Idle;
        }
        debug!(%id, "item removed");
        true
    }

    /// Topmost item under `pt`, promoted to the top of the z-order.
    pub fn pick(&mut self, pt: Point) -> Option<ItemId> {
        self.scene.hit_test(pt)
    }

    // --- Drag lifecycle ---

    /// Select `id` and start dragging it from pointer position `pt`.
    ///
    /// Every other item loses its selection, drag and preview state. Returns
    /// false if the item does not exist.
    pub fn begin_drag(&mut self, id: &ItemId, pt: Point) -> bool {
        if !self.scene.promote(id) {
            return false;
        }
        for item in self.scene.iter_mut() {
            item.clear_interaction();
        }
        let Some(item) = self.scene.get_mut(id) else {
            return false;
        };
        item.selected = true;
        item.dragging = true;
        let origin = item.position();
        let offset = Point::new(pt.x - origin.x, pt.y - origin.y);
        self.input = InputState::Dragging { id: *id, offset, origin };
        debug!(%id, ?origin, "drag started");
        true
    }

    /// Move the dragged item to follow the pointer, clamped to the canvas.
    ///
    /// Refreshes the collision flag and connection previews. A no-op
    /// returning `None` when nothing is being dragged.
    pub fn update_drag(&mut self, pt: Point, canvas_width: f64, canvas_height: f64) -> Option<DragUpdate> {
        let InputState::Dragging { id, offset, .. } = self.input else {
            return None;
        };
        let item = self.scene.get_mut(&id)?;

        let bounds = item.bounds();
        let shift_x = bounds.min_x - item.x;
        let shift_y = bounds.min_y - item.y;
        let position = Point::new(
            clamp_axis(pt.x - offset.x, shift_x, bounds.width(), canvas_width),
            clamp_axis(pt.y - offset.y, shift_y, bounds.height(), canvas_height),
        );
        item.x = position.x;
        item.y = position.y;

        let collision = self.scene.first_overlap(&id);
        if let Some(item) = self.scene.get_mut(&id) {
            item.collision = collision.is_some();
        }
        let matched = connect::refresh_previews(&mut self.scene, id);

        Some(DragUpdate { position, collision, matched })
    }

    /// Finish the drag: revert on collision, otherwise snap to a matched
    /// partner if there is one. The item stays selected.
    pub fn end_drag(&mut self) -> Option<DragEnd> {
        let InputState::Dragging { id, origin, .. } = self.input else {
            return None;
        };
        self.input = InputState::Selected { id };

        let item = self.scene.get_mut(&id)?;
        item.dragging = false;

        let end = if item.collision {
            item.x = origin.x;
            item.y = origin.y;
            item.collision = false;
            debug!(%id, ?origin, "drop collided, reverted");
            DragEnd::Reverted { id, position: origin }
        } else if let Some(snap) = connect::snap_merge(&mut self.scene, id) {
            debug!(%id, partner = %snap.partner, side = ?snap.side, "snapped to partner");
            DragEnd::Snapped { id, snap }
        } else {
            DragEnd::Dropped { id }
        };
        Some(end)
    }

    // --- Selection ---

    /// Rotate the selected item by `degrees`. Returns the new angle.
    ///
    /// Only quarter turns are accepted; any other delta leaves the item alone
    /// and returns `None`.
    pub fn rotate_selected(&mut self, degrees: i32) -> Option<i32> {
        if degrees % 90 != 0 {
            return None;
        }
        let id = self.input.selected_id()?;
        let item = self.scene.get_mut(&id)?;
        item.rotate(degrees);
        debug!(%id, rotation = item.rotation, "item rotated");
        Some(item.rotation)
    }

    /// Clear selection, drag and preview state everywhere.
    pub fn deselect_all(&mut self) {
        for item in self.scene.iter_mut() {
            item.clear_interaction();
        }
        self.input = InputState::Idle;
    }

    // --- Pointer gestures ---

    /// Handle a pointer-down at canvas-local `pt`.
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let had_selection = self.input.selected_id().is_some();
        match hit::hit_test(pt, &self.scene, self.input.selected_id()) {
            Some(Hit { item_id, part: HitPart::RotateIcon }) => {
                let step = self.settings.rotate_step;
                match self.rotate_selected(step) {
                    Some(rotation) => vec![Action::ItemRotated { id: item_id, rotation }, Action::RenderNeeded],
                    None => Vec::new(),
                }
            }
            Some(Hit { item_id, part: HitPart::CloseIcon }) => {
                self.remove_item(&item_id);
                self.deselect_all();
                vec![Action::ItemRemoved { id: item_id }, Action::Deselected, Action::RenderNeeded]
            }
            Some(Hit { item_id, part: HitPart::Body }) => {
                if self.begin_drag(&item_id, pt) {
                    vec![Action::Selected { id: item_id }, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            None => {
                self.deselect_all();
                if had_selection { vec![Action::Deselected, Action::RenderNeeded] } else { Vec::new() }
            }
        }
    }

    /// Handle a pointer-move at canvas-local `pt`.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();

        let cursor = if hit::over_icon(pt, &self.scene, self.input.selected_id()) {
            CURSOR_POINTER
        } else {
            CURSOR_MOVE
        };
        if cursor != self.cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor.to_owned()));
        }

        let (w, h) = (self.canvas_width, self.canvas_height);
        if let Some(update) = self.update_drag(pt, w, h) {
            if let Some(id) = self.input.dragging_id() {
                actions.push(Action::ItemMoved { id, x: update.position.x, y: update.position.y });
            }
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Handle a pointer-up. The position is unused; the last move wins.
    pub fn on_pointer_up(&mut self, _pt: Point) -> Vec<Action> {
        match self.end_drag() {
            Some(DragEnd::Reverted { id, position }) => {
                vec![Action::DragReverted { id, x: position.x, y: position.y }, Action::RenderNeeded]
            }
            Some(DragEnd::Snapped { id, snap }) => vec![
                Action::Snapped { id, partner: snap.partner, side: snap.side, x: snap.position.x, y: snap.position.y },
                Action::RenderNeeded,
            ],
            Some(DragEnd::Dropped { .. }) => vec![Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    // --- Queries ---

    /// The currently selected item, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.input.selected_id()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.scene.get(id)
    }

    /// Render state for every item, bottom first.
    #[must_use]
    pub fn items_for_render(&self) -> Vec<RenderItem> {
        self.scene
            .items()
            .iter()
            .map(|item| RenderItem { connection: self.scene.live_match(item), ..RenderItem::from(item) })
            .collect()
    }

    /// Peers of `id` that are still in the scene.
    #[must_use]
    pub fn live_peers(&self, id: &ItemId) -> Vec<ItemId> {
        self.scene
            .get(id)
            .map(|item| item.peers.iter().copied().filter(|p| self.scene.contains(p)).collect())
            .unwrap_or_default()
    }
}

/// Clamp one axis of a drag candidate so the item's envelope stays on the canvas.
///
/// `shift` is the offset from the item position to its envelope's near edge,
/// non-zero only for quarter-turned non-square items. An axis with no canvas
/// extent (viewport not set yet) is left unclamped.
fn clamp_axis(candidate: f64, shift: f64, extent: f64, canvas_extent: f64) -> f64 {
    if canvas_extent <= 0.0 {
        return candidate;
    }
    let near = candidate + shift;
    let clamped = if near < 0.0 {
        0.0
    } else if near + extent >= canvas_extent {
        canvas_extent - extent - 1.0
    } else {
        near
    };
    clamped - shift
}

/// An image element paired with the handle it was registered under.
struct LoadedImage<'a> {
    image: &'a ImageRef,
    element: &'a HtmlImageElement,
}

impl ImageSource for LoadedImage<'_> {
    fn image_ref(&self) -> ImageRef {
        self.image.clone()
    }

    fn width(&self) -> f64 {
        f64::from(self.element.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.element.height())
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    images: HashMap<ImageRef, HtmlImageElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let mut core = EngineCore::new();
        core.set_viewport(f64::from(canvas.width()), f64::from(canvas.height()));
        Self { canvas, images: HashMap::new(), core }
    }

    /// Register a loaded image under `image`, replacing any previous element.
    pub fn add_image(&mut self, image: ImageRef, element: HtmlImageElement) {
        self.images.insert(image, element);
    }

    /// Place a registered image at `center`. `None` if the image is unknown.
    pub fn add_item(
        &mut self,
        image: &ImageRef,
        center: Point,
        capability: Capability,
        peers: BTreeSet<ItemId>,
    ) -> Option<ItemId> {
        let element = self.images.get(image)?;
        let source = LoadedImage { image, element };
        Some(self.core.add_item(&source, center, capability, peers))
    }

    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        self.core.remove_item(id)
    }

    // --- Viewport ---

    /// Re-read the canvas element size into the drag clamp.
    pub fn sync_viewport(&mut self) {
        self.core.set_viewport(f64::from(self.canvas.width()), f64::from(self.canvas.height()));
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_pointer_down(pt)
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(pt)
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_pointer_up(pt)
    }

    pub fn rotate_selected(&mut self, degrees: i32) -> Option<i32> {
        self.core.rotate_selected(degrees)
    }

    pub fn deselect_all(&mut self) {
        self.core.deselect_all();
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let Some(ctx) = self.canvas.get_context("2d")? else {
            return Err(JsValue::from_str("2d context unavailable"));
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        render::draw(&ctx, &self.core.scene, &self.images, self.core.canvas_width, self.core.canvas_height)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.core.selection()
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.core.item(id)
    }

    #[must_use]
    pub fn items_for_render(&self) -> Vec<RenderItem> {
        self.core.items_for_render()
    }
}
