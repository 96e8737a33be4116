//! Rendering: draws the scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads the scene and the host's image table and produces pixels; it does
//! not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::connect;
use crate::geometry::{self, Bounds};
use crate::item::{ConnectionTag, ImageRef, Item};
use crate::scene::Scene;

/// Glow around a dragged item with a clean drop.
const DRAG_OK_COLOR: &str = "#00a814";
/// Glow around a dragged item that would be reverted.
const DRAG_COLLISION_COLOR: &str = "red";
const DRAG_GLOW_BLUR: f64 = 8.0;

const CONNECTOR_COLOR: &str = "blue";
const GHOST_FILL: &str = "rgb(0, 255, 0)";
const GHOST_ALPHA: f64 = 0.6;

/// Selection border dash segment length in canvas pixels.
const SELECTION_DASH_PX: f64 = 5.0;

/// Draw the full scene, bottom item first.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    images: &HashMap<ImageRef, HtmlImageElement>,
    viewport_w: f64,
    viewport_h: f64,
) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    for item in scene.items() {
        draw_item(ctx, item, images)?;
        draw_connectors(ctx, item)?;
        if let Some(m) = scene.live_match(item) {
            if let Some(partner) = scene.get(&m.partner) {
                draw_ghost(ctx, item, partner, m.side, images)?;
            }
        }
        if item.selected {
            draw_selection(ctx, item)?;
        }
    }
    Ok(())
}

// =============================================================
// Items
// =============================================================

fn draw_item(
    ctx: &CanvasRenderingContext2d,
    item: &Item,
    images: &HashMap<ImageRef, HtmlImageElement>,
) -> Result<(), JsValue> {
    ctx.save();
    if item.dragging {
        ctx.set_shadow_color(if item.collision { DRAG_COLLISION_COLOR } else { DRAG_OK_COLOR });
        ctx.set_shadow_blur(DRAG_GLOW_BLUR);
    }
    translate_and_rotate(ctx, item)?;
    draw_image_or_placeholder(ctx, item, images)?;
    ctx.restore();
    Ok(())
}

fn draw_connectors(ctx: &CanvasRenderingContext2d, item: &Item) -> Result<(), JsValue> {
    let sides = item.local_connector_sides();
    if sides.is_empty() {
        return Ok(());
    }
    ctx.save();
    translate_and_rotate(ctx, item)?;
    ctx.set_stroke_style_str(CONNECTOR_COLOR);
    ctx.set_line_width(2.0);
    for side in sides {
        let b = geometry::local_side_box(item, side);
        ctx.stroke_rect(b.min_x, b.min_y, b.width(), b.height());
    }
    ctx.restore();
    Ok(())
}

/// Translucent preview of `partner` where it would land if dropped now.
fn draw_ghost(
    ctx: &CanvasRenderingContext2d,
    stationary: &Item,
    partner: &Item,
    tag: ConnectionTag,
    images: &HashMap<ImageRef, HtmlImageElement>,
) -> Result<(), JsValue> {
    let landing = connect::snap_position(partner, stationary, tag);
    let mut ghost = partner.clone();
    ghost.x = landing.x;
    ghost.y = landing.y;

    ctx.save();
    ctx.set_global_alpha(GHOST_ALPHA);
    translate_and_rotate(ctx, &ghost)?;
    ctx.set_fill_style_str(GHOST_FILL);
    ctx.fill_rect(-ghost.width / 2.0, -ghost.height / 2.0, ghost.width, ghost.height);
    draw_image_or_placeholder(ctx, &ghost, images)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Selection
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, item: &Item) -> Result<(), JsValue> {
    ctx.save();
    translate_and_rotate(ctx, item)?;

    ctx.set_stroke_style_str("black");
    ctx.set_line_width(2.0);
    let dash_array = js_sys::Array::new();
    dash_array.push(&SELECTION_DASH_PX.into());
    dash_array.push(&SELECTION_DASH_PX.into());
    ctx.set_line_dash(&dash_array)?;
    let body = item.local_body();
    ctx.stroke_rect(body.min_x, body.min_y, body.width(), body.height());
    ctx.set_line_dash(&js_sys::Array::new())?;

    draw_close_icon(ctx, &item.close_icon_rect());
    draw_rotate_icon(ctx, &item.rotate_icon_rect())?;

    ctx.restore();
    Ok(())
}

fn draw_close_icon(ctx: &CanvasRenderingContext2d, r: &Bounds) {
    let inset = r.width() * 0.25;
    ctx.begin_path();
    ctx.move_to(r.min_x + inset, r.min_y + inset);
    ctx.line_to(r.max_x - inset, r.max_y - inset);
    ctx.move_to(r.max_x - inset, r.min_y + inset);
    ctx.line_to(r.min_x + inset, r.max_y - inset);
    ctx.stroke();
}

fn draw_rotate_icon(ctx: &CanvasRenderingContext2d, r: &Bounds) -> Result<(), JsValue> {
    let c = r.center();
    let radius = r.width() * 0.3;
    ctx.begin_path();
    ctx.arc(c.x, c.y, radius, PI * 0.25, PI * 1.75)?;
    ctx.stroke();

    // Arrowhead at the open end of the arc.
    let tip_x = c.x + radius * (PI * 1.75).cos();
    let tip_y = c.y + radius * (PI * 1.75).sin();
    ctx.begin_path();
    ctx.move_to(tip_x - radius * 0.5, tip_y);
    ctx.line_to(tip_x, tip_y);
    ctx.line_to(tip_x, tip_y + radius * 0.5);
    ctx.stroke();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Translate to the item's center and rotate by its rotation angle.
fn translate_and_rotate(ctx: &CanvasRenderingContext2d, item: &Item) -> Result<(), JsValue> {
    let c = item.center();
    ctx.translate(c.x, c.y)?;
    ctx.rotate(f64::from(item.rotation).to_radians())?;
    Ok(())
}

/// Draw the item's image centered on the current origin, or a grey box if
/// the host never registered the image.
fn draw_image_or_placeholder(
    ctx: &CanvasRenderingContext2d,
    item: &Item,
    images: &HashMap<ImageRef, HtmlImageElement>,
) -> Result<(), JsValue> {
    let (x, y) = (-item.width / 2.0, -item.height / 2.0);
    match images.get(&item.image) {
        Some(el) => ctx.draw_image_with_html_image_element_and_dw_and_dh(el, x, y, item.width, item.height),
        None => {
            ctx.set_fill_style_str("#cccccc");
            ctx.fill_rect(x, y, item.width, item.height);
            Ok(())
        }
    }
}
