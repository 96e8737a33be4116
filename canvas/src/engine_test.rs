#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::item::{ImageInfo, SideBox};

// =============================================================
// Helpers
// =============================================================

fn image(w: f64, h: f64) -> ImageInfo {
    ImageInfo { image: ImageRef::new("piece.png"), width: w, height: h }
}

/// Place an item with its top-left corner at `(x, y)`.
fn place(core: &mut EngineCore, x: f64, y: f64, w: f64, h: f64, capability: Capability) -> ItemId {
    core.add_item(&image(w, h), Point::new(x + w / 2.0, y + h / 2.0), capability, BTreeSet::new())
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn has_action(actions: &[Action], pred: impl Fn(&Action) -> bool) -> bool {
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded))
}

fn core_with_viewport() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_viewport(800.0, 600.0);
    core
}

/// Stationary right-connector square at the origin and a left-connector
/// square to its right, both 100x100.
fn connectable_pair(core: &mut EngineCore) -> (ItemId, ItemId) {
    let stationary = place(core, 0.0, 0.0, 100.0, 100.0, Capability::Right);
    let dragged = place(core, 300.0, 0.0, 100.0, 100.0, Capability::Left);
    (stationary, dragged)
}

/// Select an item through a click (down + up) on `at`.
fn click(core: &mut EngineCore, at: Point) -> Vec<Action> {
    let mut actions = core.on_pointer_down(at);
    actions.extend(core.on_pointer_up(at));
    actions
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn new_core_is_empty_and_idle() {
    let core = EngineCore::new();
    assert!(core.scene.is_empty());
    assert_eq!(core.input, InputState::Idle);
    assert!(core.selection().is_none());
    assert_eq!(core.settings, Settings::default());
    assert_eq!(core.canvas_width, 0.0);
    assert_eq!(core.canvas_height, 0.0);
}

#[test]
fn with_settings_applies_to_new_items() {
    let settings = Settings { side_box_width: 20.0, side_box_padding: 5.0, ..Settings::default() };
    let mut core = EngineCore::with_settings(settings).unwrap();
    let id = place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::Left);
    assert_eq!(core.item(&id).unwrap().side_box, SideBox { width: 20.0, height_ratio: 0.65, padding: 5.0 });
}

#[test]
fn with_settings_rejects_invalid_ratio() {
    let settings = Settings { side_box_height_ratio: 0.0, ..Settings::default() };
    let err = EngineCore::with_settings(settings).err().unwrap();
    assert_eq!(err, SettingsError::SideBoxHeightRatio(0.0));
}

#[test]
fn with_settings_rejects_odd_rotate_step() {
    let settings = Settings { rotate_step: 45, ..Settings::default() };
    assert!(matches!(EngineCore::with_settings(settings), Err(SettingsError::RotateStep(45))));
}

#[test]
fn set_viewport_records_size() {
    let mut core = EngineCore::new();
    core.set_viewport(1024.0, 768.0);
    assert_eq!(core.canvas_width, 1024.0);
    assert_eq!(core.canvas_height, 768.0);
}

// =============================================================
// EngineCore: registry
// =============================================================

#[test]
fn add_item_centers_on_point() {
    let mut core = EngineCore::new();
    let id = core.add_item(&image(100.0, 50.0), pt(200.0, 200.0), Capability::None, BTreeSet::new());
    let item = core.item(&id).unwrap();
    assert_eq!(item.position(), pt(150.0, 175.0));
    assert_eq!(item.center(), pt(200.0, 200.0));
    assert_eq!(item.rotation, 0);
    assert!(!item.selected);
}

#[test]
fn add_item_goes_on_top() {
    let mut core = EngineCore::new();
    let a = place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::None);
    let b = place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::None);
    assert_eq!(core.scene.index_of(&a), Some(0));
    assert_eq!(core.scene.index_of(&b), Some(1));
}

#[test]
fn remove_unknown_item_returns_false() {
    let mut core = EngineCore::new();
    assert!(!core.remove_item(&Uuid::new_v4()));
}

#[test]
fn remove_selected_item_resets_input() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::None);
    assert!(core.begin_drag(&id, pt(10.0, 10.0)));
    assert!(core.remove_item(&id));
    assert_eq!(core.input, InputState::Idle);
    assert!(core.item(&id).is_none());
}

#[test]
fn remove_other_item_keeps_selection() {
    let mut core = core_with_viewport();
    let a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::None);
    let b = place(&mut core, 200.0, 0.0, 100.0, 100.0, Capability::None);
    core.begin_drag(&a, pt(10.0, 10.0));
    core.end_drag();
    assert!(core.remove_item(&b));
    assert_eq!(core.selection(), Some(a));
}

#[test]
fn live_peers_skips_removed_items() {
    let mut core = EngineCore::new();
    let a = place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::None);
    let b = place(&mut core, 20.0, 0.0, 10.0, 10.0, Capability::None);
    let c = core.add_item(&image(10.0, 10.0), pt(100.0, 100.0), Capability::None, BTreeSet::from([a, b]));

    core.remove_item(&a);
    assert_eq!(core.live_peers(&c), vec![b]);
    // The stored set is left alone.
    assert_eq!(core.item(&c).unwrap().peers.len(), 2);
    assert!(core.live_peers(&Uuid::new_v4()).is_empty());
}

#[test]
fn pick_promotes_to_top() {
    let mut core = EngineCore::new();
    let a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::None);
    let b = place(&mut core, 50.0, 50.0, 100.0, 100.0, Capability::None);
    assert_eq!(core.pick(pt(75.0, 75.0)), Some(b));
    assert_eq!(core.pick(pt(10.0, 10.0)), Some(a));
    assert_eq!(core.pick(pt(75.0, 75.0)), Some(a));
    assert_eq!(core.pick(pt(700.0, 700.0)), None);
}

// =============================================================
// EngineCore: drag lifecycle
// =============================================================

#[test]
fn begin_drag_unknown_item_fails() {
    let mut core = EngineCore::new();
    assert!(!core.begin_drag(&Uuid::new_v4(), pt(0.0, 0.0)));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn begin_drag_selects_and_clears_others() {
    let mut core = core_with_viewport();
    let a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::Right);
    let b = place(&mut core, 200.0, 0.0, 100.0, 100.0, Capability::None);
    {
        let item = core.scene.get_mut(&a).unwrap();
        item.selected = true;
        item.connection = Some(ConnectionMatch { side: ConnectionTag::Right, partner: b });
    }

    assert!(core.begin_drag(&b, pt(210.0, 20.0)));
    let a_item = core.item(&a).unwrap();
    assert!(!a_item.selected);
    assert!(a_item.connection.is_none());
    let b_item = core.item(&b).unwrap();
    assert!(b_item.selected && b_item.dragging);
    assert_eq!(core.input.dragging_id(), Some(b));
    assert_eq!(core.scene.index_of(&b), Some(1));
}

#[test]
fn drag_calls_without_drag_are_noops() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 0.0, 0.0, 50.0, 50.0, Capability::None);
    assert!(core.update_drag(pt(300.0, 300.0), 800.0, 600.0).is_none());
    assert!(core.end_drag().is_none());
    assert_eq!(core.item(&id).unwrap().position(), pt(0.0, 0.0));
}

#[test]
fn update_drag_keeps_grab_offset() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 100.0, 100.0, 50.0, 50.0, Capability::None);
    core.begin_drag(&id, pt(110.0, 120.0));
    let update = core.update_drag(pt(210.0, 220.0), 800.0, 600.0).unwrap();
    assert_eq!(update.position, pt(200.0, 200.0));
    assert_eq!(core.item(&id).unwrap().position(), pt(200.0, 200.0));
    assert!(update.collision.is_none());
    assert!(update.matched.is_none());
}

#[test]
fn drag_clamps_to_far_edge_minus_one() {
    let mut core = EngineCore::new();
    let id = place(&mut core, 0.0, 0.0, 50.0, 50.0, Capability::None);
    core.begin_drag(&id, pt(10.0, 10.0));
    let update = core.update_drag(pt(510.0, 10.0), 400.0, 400.0).unwrap();
    assert_eq!(update.position, pt(349.0, 0.0));
}

#[test]
fn drag_touching_far_edge_is_clamped() {
    let mut core = EngineCore::new();
    let id = place(&mut core, 0.0, 0.0, 50.0, 50.0, Capability::None);
    core.begin_drag(&id, pt(10.0, 10.0));
    // Candidate 350 puts the right edge exactly on the canvas edge.
    let update = core.update_drag(pt(360.0, 10.0), 400.0, 400.0).unwrap();
    assert_eq!(update.position.x, 349.0);
}

#[test]
fn drag_clamps_negative_to_zero() {
    let mut core = EngineCore::new();
    let id = place(&mut core, 100.0, 100.0, 50.0, 50.0, Capability::None);
    core.begin_drag(&id, pt(110.0, 110.0));
    let update = core.update_drag(pt(-100.0, -100.0), 400.0, 400.0).unwrap();
    assert_eq!(update.position, pt(0.0, 0.0));
}

#[test]
fn drag_clamps_rotated_envelope() {
    let mut core = EngineCore::new();
    // 100x20 bar turned upright: envelope is 20 wide, 100 tall.
    let id = place(&mut core, 0.0, 100.0, 100.0, 20.0, Capability::None);
    core.scene.get_mut(&id).unwrap().rotate(90);
    core.begin_drag(&id, pt(50.0, 110.0));

    core.update_drag(pt(-50.0, 110.0), 400.0, 400.0).unwrap();
    let item = core.item(&id).unwrap();
    assert_eq!(item.bounds().min_x, 0.0);
    assert_eq!(item.x, -40.0);
    assert_eq!(item.y, 100.0);
}

#[test]
fn drag_before_viewport_is_unclamped() {
    let mut core = EngineCore::new();
    let id = place(&mut core, 100.0, 100.0, 50.0, 50.0, Capability::None);
    core.on_pointer_down(pt(110.0, 110.0));
    core.on_pointer_move(pt(210.0, 160.0));
    assert_eq!(core.item(&id).unwrap().position(), pt(200.0, 150.0));
}

#[test]
fn collision_flag_follows_overlap() {
    let mut core = core_with_viewport();
    let a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::None);
    let b = place(&mut core, 300.0, 0.0, 100.0, 100.0, Capability::None);
    core.begin_drag(&b, pt(310.0, 10.0));

    let update = core.update_drag(pt(60.0, 10.0), 800.0, 600.0).unwrap();
    assert_eq!(update.collision, Some(a));
    // Movement is not blocked while colliding.
    assert_eq!(core.item(&b).unwrap().x, 50.0);
    assert!(core.item(&b).unwrap().collision);

    let update = core.update_drag(pt(410.0, 10.0), 800.0, 600.0).unwrap();
    assert!(update.collision.is_none());
    assert!(!core.item(&b).unwrap().collision);
}

#[test]
fn colliding_drop_reverts_to_origin() {
    let mut core = core_with_viewport();
    let _a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::None);
    let b = place(&mut core, 300.0, 0.0, 100.0, 100.0, Capability::None);
    core.begin_drag(&b, pt(310.0, 10.0));
    core.update_drag(pt(60.0, 10.0), 800.0, 600.0);

    let end = core.end_drag().unwrap();
    assert_eq!(end, DragEnd::Reverted { id: b, position: pt(300.0, 0.0) });
    let item = core.item(&b).unwrap();
    assert_eq!(item.position(), pt(300.0, 0.0));
    assert!(!item.collision);
    assert!(!item.dragging);
    assert!(item.selected);
    assert_eq!(core.input, InputState::Selected { id: b });
}

#[test]
fn clean_drop_stays_put() {
    let mut core = core_with_viewport();
    let _a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::None);
    let b = place(&mut core, 300.0, 0.0, 100.0, 100.0, Capability::None);
    core.begin_drag(&b, pt(310.0, 10.0));
    core.update_drag(pt(510.0, 110.0), 800.0, 600.0);

    assert_eq!(core.end_drag(), Some(DragEnd::Dropped { id: b }));
    assert_eq!(core.item(&b).unwrap().position(), pt(500.0, 100.0));
    assert_eq!(core.selection(), Some(b));
}

#[test]
fn approaching_partner_previews_on_stationary_item() {
    let mut core = core_with_viewport();
    let (a, b) = connectable_pair(&mut core);
    core.begin_drag(&b, pt(310.0, 10.0));

    let update = core.update_drag(pt(160.0, 10.0), 800.0, 600.0).unwrap();
    assert_eq!(update.matched, Some((a, ConnectionTag::Right)));
    let m = core.item(&a).unwrap().connection.unwrap();
    assert_eq!(m.partner, b);
    assert_eq!(m.side, ConnectionTag::Right);
}

#[test]
fn matched_drop_snaps_with_gap() {
    let mut core = core_with_viewport();
    let (a, b) = connectable_pair(&mut core);
    core.begin_drag(&b, pt(310.0, 10.0));
    core.update_drag(pt(160.0, 30.0), 800.0, 600.0);

    let Some(DragEnd::Snapped { id, snap }) = core.end_drag() else {
        panic!("expected a snap");
    };
    assert_eq!(id, b);
    assert_eq!(snap.partner, a);
    assert_eq!(snap.position, pt(180.0, 0.0));

    let gap = core.item(&b).unwrap().bounds().min_x - core.item(&a).unwrap().bounds().max_x;
    assert_eq!(gap, core.settings.snap_gap());
}

#[test]
fn collision_wins_over_snap() {
    let mut core = core_with_viewport();
    let (a, b) = connectable_pair(&mut core);
    // A small item sitting where the dragged one would connect.
    let _blocker = place(&mut core, 200.0, 60.0, 20.0, 20.0, Capability::None);
    core.begin_drag(&b, pt(310.0, 10.0));
    let update = core.update_drag(pt(160.0, 10.0), 800.0, 600.0).unwrap();
    assert!(update.matched.is_some());
    assert!(core.item(&b).unwrap().collision);

    let end = core.end_drag().unwrap();
    assert!(matches!(end, DragEnd::Reverted { .. }));
    assert_eq!(core.item(&b).unwrap().position(), pt(300.0, 0.0));
    assert!(core.item(&a).is_some());
}

// =============================================================
// EngineCore: selection
// =============================================================

#[test]
fn rotate_without_selection_is_none() {
    let mut core = EngineCore::new();
    place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::None);
    assert_eq!(core.rotate_selected(90), None);
}

#[test]
fn rotate_selected_wraps() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::None);
    core.begin_drag(&id, pt(5.0, 5.0));
    core.end_drag();
    assert_eq!(core.rotate_selected(90), Some(90));
    assert_eq!(core.rotate_selected(-180), Some(270));
    assert_eq!(core.item(&id).unwrap().rotation, 270);
}

#[test]
fn rotate_selected_rejects_non_quarter_turns() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::None);
    core.begin_drag(&id, pt(5.0, 5.0));
    core.end_drag();
    assert_eq!(core.rotate_selected(45), None);
    assert_eq!(core.rotate_selected(i32::MAX), None);
    assert_eq!(core.item(&id).unwrap().rotation, 0);
}

#[test]
fn rotate_selected_handles_huge_quarter_turns() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::None);
    core.begin_drag(&id, pt(5.0, 5.0));
    core.end_drag();
    assert_eq!(core.rotate_selected(270), Some(270));
    // 2147483610 is the largest i32 multiple of 90; it is 90 mod 360.
    assert_eq!(core.rotate_selected(2_147_483_610), Some(0));
    assert_eq!(core.rotate_selected(-2_147_483_610), Some(270));
}

#[test]
fn deselect_all_clears_everything() {
    let mut core = core_with_viewport();
    let (a, b) = connectable_pair(&mut core);
    core.begin_drag(&b, pt(310.0, 10.0));
    core.update_drag(pt(160.0, 10.0), 800.0, 600.0);

    core.deselect_all();
    assert_eq!(core.input, InputState::Idle);
    assert!(core.item(&a).unwrap().connection.is_none());
    let item = core.item(&b).unwrap();
    assert!(!item.selected && !item.dragging);
}

// =============================================================
// Pointer down
// =============================================================

#[test]
fn down_on_empty_without_selection_is_quiet() {
    let mut core = core_with_viewport();
    place(&mut core, 0.0, 0.0, 10.0, 10.0, Capability::None);
    assert!(core.on_pointer_down(pt(500.0, 500.0)).is_empty());
}

#[test]
fn down_on_body_selects_and_starts_drag() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    let actions = core.on_pointer_down(pt(150.0, 150.0));
    assert_eq!(actions, vec![Action::Selected { id }, Action::RenderNeeded]);
    assert_eq!(core.input.dragging_id(), Some(id));
    assert!(core.item(&id).unwrap().selected);
}

#[test]
fn down_on_empty_after_selection_deselects() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    click(&mut core, pt(150.0, 150.0));

    let actions = core.on_pointer_down(pt(600.0, 500.0));
    assert_eq!(actions, vec![Action::Deselected, Action::RenderNeeded]);
    assert!(core.selection().is_none());
    assert!(!core.item(&id).unwrap().selected);
}

#[test]
fn selecting_second_item_unselects_first() {
    let mut core = core_with_viewport();
    let a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::None);
    let b = place(&mut core, 200.0, 0.0, 100.0, 100.0, Capability::None);
    click(&mut core, pt(50.0, 50.0));
    core.on_pointer_down(pt(250.0, 50.0));

    assert!(!core.item(&a).unwrap().selected);
    assert!(!core.item(&a).unwrap().dragging);
    assert_eq!(core.selection(), Some(b));
    let dragging: Vec<_> = core.scene.items().iter().filter(|i| i.dragging).map(|i| i.id).collect();
    assert_eq!(dragging, vec![b]);
}

#[test]
fn down_clears_stale_previews() {
    let mut core = core_with_viewport();
    let (a, b) = connectable_pair(&mut core);
    core.on_pointer_down(pt(310.0, 10.0));
    core.on_pointer_move(pt(160.0, 10.0));
    core.on_pointer_up(pt(160.0, 10.0));

    core.on_pointer_down(pt(50.0, 50.0));
    assert!(core.item(&a).unwrap().connection.is_none());
    assert!(core.item(&b).unwrap().connection.is_none());
}

#[test]
fn rotate_icon_rotates_selected_item() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    click(&mut core, pt(150.0, 150.0));

    let actions = core.on_pointer_down(pt(200.0, 85.0));
    assert_eq!(actions, vec![Action::ItemRotated { id, rotation: 90 }, Action::RenderNeeded]);
    assert_eq!(core.item(&id).unwrap().rotation, 90);
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn rotate_icon_uses_configured_step() {
    let settings = Settings { rotate_step: -90, ..Settings::default() };
    let mut core = EngineCore::with_settings(settings).unwrap();
    core.set_viewport(800.0, 600.0);
    let id = place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    click(&mut core, pt(150.0, 150.0));

    core.on_pointer_down(pt(200.0, 85.0));
    assert_eq!(core.item(&id).unwrap().rotation, 270);
}

#[test]
fn close_icon_removes_selected_item() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    click(&mut core, pt(150.0, 150.0));

    let actions = core.on_pointer_down(pt(95.0, 85.0));
    assert_eq!(actions, vec![Action::ItemRemoved { id }, Action::Deselected, Action::RenderNeeded]);
    assert!(core.scene.is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn icons_need_a_selection() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    assert!(core.on_pointer_down(pt(95.0, 85.0)).is_empty());
    assert!(core.item(&id).is_some());
}

// =============================================================
// Pointer move and up
// =============================================================

#[test]
fn move_while_dragging_reports_position() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    core.on_pointer_down(pt(150.0, 150.0));

    let actions = core.on_pointer_move(pt(250.0, 160.0));
    assert!(has_action(&actions, |a| *a == Action::ItemMoved { id, x: 200.0, y: 110.0 }));
    assert!(has_render_needed(&actions));
}

#[test]
fn move_without_drag_does_not_render() {
    let mut core = core_with_viewport();
    place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    let actions = core.on_pointer_move(pt(150.0, 150.0));
    assert!(!has_render_needed(&actions));
    assert!(!has_action(&actions, |a| matches!(a, Action::ItemMoved { .. })));
}

#[test]
fn cursor_changes_only_on_transition() {
    let mut core = core_with_viewport();
    place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    click(&mut core, pt(150.0, 150.0));

    assert_eq!(core.on_pointer_move(pt(200.0, 85.0)), vec![Action::SetCursor("pointer".into())]);
    assert!(core.on_pointer_move(pt(201.0, 86.0)).is_empty());
    assert_eq!(core.on_pointer_move(pt(150.0, 150.0)), vec![Action::SetCursor("move".into())]);
}

#[test]
fn up_without_drag_is_quiet() {
    let mut core = core_with_viewport();
    assert!(core.on_pointer_up(pt(0.0, 0.0)).is_empty());
}

#[test]
fn gesture_drop_on_neighbour_reverts() {
    let mut core = core_with_viewport();
    let _a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::None);
    let b = place(&mut core, 300.0, 0.0, 100.0, 100.0, Capability::None);
    core.on_pointer_down(pt(310.0, 10.0));
    core.on_pointer_move(pt(60.0, 10.0));

    let actions = core.on_pointer_up(pt(60.0, 10.0));
    assert_eq!(actions, vec![Action::DragReverted { id: b, x: 300.0, y: 0.0 }, Action::RenderNeeded]);
}

#[test]
fn gesture_drop_near_partner_snaps() {
    let mut core = core_with_viewport();
    let (a, b) = connectable_pair(&mut core);
    core.on_pointer_down(pt(310.0, 10.0));
    core.on_pointer_move(pt(160.0, 10.0));

    let actions = core.on_pointer_up(pt(160.0, 10.0));
    assert_eq!(
        actions,
        vec![
            Action::Snapped { id: b, partner: a, side: ConnectionTag::Right, x: 180.0, y: 0.0 },
            Action::RenderNeeded,
        ]
    );
}

#[test]
fn gesture_clean_drop_only_renders() {
    let mut core = core_with_viewport();
    place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    core.on_pointer_down(pt(150.0, 150.0));
    core.on_pointer_move(pt(350.0, 350.0));
    assert_eq!(core.on_pointer_up(pt(350.0, 350.0)), vec![Action::RenderNeeded]);
}

#[test]
fn gesture_drag_is_clamped_to_viewport() {
    let mut core = core_with_viewport();
    let id = place(&mut core, 100.0, 100.0, 100.0, 100.0, Capability::None);
    core.on_pointer_down(pt(150.0, 150.0));
    core.on_pointer_move(pt(2000.0, 2000.0));
    assert_eq!(core.item(&id).unwrap().position(), pt(699.0, 499.0));
}

// =============================================================
// EngineCore: queries
// =============================================================

#[test]
fn items_for_render_in_draw_order() {
    let mut core = core_with_viewport();
    let a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::Right);
    let b = place(&mut core, 200.0, 0.0, 50.0, 40.0, Capability::Both);
    core.on_pointer_down(pt(210.0, 10.0));

    let items = core.items_for_render();
    assert_eq!(items.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a, b]);
    let rb = &items[1];
    assert_eq!((rb.x, rb.y, rb.width, rb.height), (200.0, 0.0, 50.0, 40.0));
    assert_eq!(rb.capability, Capability::Both);
    assert!(rb.selected && rb.dragging && !rb.collision);
    assert_eq!(rb.image, ImageRef::new("piece.png"));
}

#[test]
fn items_for_render_hides_dangling_preview() {
    let mut core = EngineCore::new();
    let a = place(&mut core, 0.0, 0.0, 100.0, 100.0, Capability::Right);
    let missing = Uuid::new_v4();
    core.scene.get_mut(&a).unwrap().connection = Some(ConnectionMatch { side: ConnectionTag::Right, partner: missing });

    let items = core.items_for_render();
    assert!(items[0].connection.is_none());
    assert!(core.item(&a).unwrap().connection.is_some());
}

#[test]
fn render_item_serializes_wire_tags() {
    let mut core = core_with_viewport();
    let (a, _b) = connectable_pair(&mut core);
    core.on_pointer_down(pt(310.0, 10.0));
    core.on_pointer_move(pt(160.0, 10.0));

    let items = core.items_for_render();
    let stationary = items.iter().find(|r| r.id == a).unwrap();
    let value = serde_json::to_value(stationary).unwrap();
    assert_eq!(value["connection"]["side"], "right");
    assert_eq!(value["capability"], "right");
}
