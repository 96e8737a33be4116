//! Session replay: a JSON-lines script of user gestures driven through the
//! engine, one op per line.
//!
//! ```text
//! {"op":"add","product":2}
//! {"op":"down","x":410,"y":300}
//! {"op":"move","x":250,"y":300}
//! {"op":"up"}
//! ```

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use canvas::engine::{Action, EngineCore, RenderItem};
use canvas::geometry::Point;
use canvas::item::ItemId;
use canvas::settings::SettingsError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Catalog, ProductId};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read session {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: unknown product {product}")]
    UnknownProduct { line: usize, product: ProductId },
    #[error("invalid engine settings: {0}")]
    Settings(#[from] SettingsError),
}

/// One user gesture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Place a catalog product at the canvas center.
    Add { product: ProductId },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    /// Release at the last pointer position.
    Up,
    Rotate { degrees: i32 },
    Deselect,
    RemoveSelected,
}

/// An op with the script line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub line: usize,
    pub op: Op,
}

/// Parse a script. Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`SessionError::Parse`] with the 1-based line of the first
/// malformed op.
pub fn parse_script(text: &str) -> Result<Vec<Step>, SessionError> {
    let mut steps = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if let Some(step) = parse_line(raw, idx + 1)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

fn parse_line(raw: &str, line: usize) -> Result<Option<Step>, SessionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let op = serde_json::from_str(trimmed).map_err(|source| SessionError::Parse { line, source })?;
    Ok(Some(Step { line, op }))
}

/// Read a script from a file, or from stdin when `source` is `-`.
///
/// # Errors
///
/// Returns [`SessionError::Io`] if reading fails, otherwise the errors of
/// [`parse_script`].
pub fn read_script(source: &str) -> Result<Vec<Step>, SessionError> {
    let io_err = |err: io::Error| SessionError::Io { path: PathBuf::from(source), source: err };
    let mut reader: Box<dyn Read> = if source == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(source).map_err(io_err)?)
    };
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(io_err)?;
    parse_script(&text)
}

/// Final state printed after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub selection: Option<ItemId>,
    pub items: Vec<RenderItem>,
    /// Live peers per item, for items that have any.
    pub peers: BTreeMap<ItemId, Vec<ItemId>>,
}

/// An engine bound to a catalog, fed one step at a time.
pub struct Session<'a> {
    catalog: &'a Catalog,
    core: EngineCore,
    /// Placed items in placement order, with the product they came from.
    placed: Vec<(ProductId, ItemId)>,
    pointer: Point,
}

impl<'a> Session<'a> {
    /// Start an empty session on a canvas of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Settings`] if the catalog settings are invalid.
    pub fn new(catalog: &'a Catalog, canvas_width: f64, canvas_height: f64) -> Result<Self, SessionError> {
        let mut core = EngineCore::with_settings(catalog.settings)?;
        core.set_viewport(canvas_width, canvas_height);
        Ok(Self { catalog, core, placed: Vec::new(), pointer: Point::default() })
    }

    /// Apply one step and return the actions the engine reported.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownProduct`] if an `add` names a product
    /// missing from the catalog.
    pub fn apply(&mut self, step: &Step) -> Result<Vec<Action>, SessionError> {
        let actions = match step.op {
            Op::Add { product } => {
                let id = self.add_product(product, step.line)?;
                info!(line = step.line, product, %id, "product placed");
                vec![Action::RenderNeeded]
            }
            Op::Down { x, y } => {
                self.pointer = Point::new(x, y);
                self.core.on_pointer_down(self.pointer)
            }
            Op::Move { x, y } => {
                self.pointer = Point::new(x, y);
                self.core.on_pointer_move(self.pointer)
            }
            Op::Up => self.core.on_pointer_up(self.pointer),
            Op::Rotate { degrees } => match (self.core.selection(), self.core.rotate_selected(degrees)) {
                (Some(id), Some(rotation)) => vec![Action::ItemRotated { id, rotation }, Action::RenderNeeded],
                _ => Vec::new(),
            },
            Op::Deselect => {
                let had_selection = self.core.selection().is_some();
                self.core.deselect_all();
                if had_selection { vec![Action::Deselected, Action::RenderNeeded] } else { Vec::new() }
            }
            Op::RemoveSelected => match self.core.selection() {
                Some(id) => {
                    self.core.remove_item(&id);
                    self.core.deselect_all();
                    vec![Action::ItemRemoved { id }, Action::Deselected, Action::RenderNeeded]
                }
                None => Vec::new(),
            },
        };
        self.placed.retain(|(_, id)| self.core.item(id).is_some());
        Ok(actions)
    }

    /// Place `product` at the canvas center, linked to every already placed
    /// item of its peer products.
    fn add_product(&mut self, product: ProductId, line: usize) -> Result<ItemId, SessionError> {
        let catalog = self.catalog;
        let p = catalog.product(product).ok_or(SessionError::UnknownProduct { line, product })?;
        let peers: BTreeSet<ItemId> = self
            .placed
            .iter()
            .filter(|(pid, _)| p.peers.contains(pid))
            .map(|(_, id)| *id)
            .collect();
        let center = Point::new(self.core.canvas_width / 2.0, self.core.canvas_height / 2.0);
        let id = self.core.add_item(p, center, p.connection, peers);
        self.placed.push((product, id));
        Ok(id)
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    #[must_use]
    pub fn report(&self) -> Report {
        let items = self.core.items_for_render();
        let peers = items
            .iter()
            .map(|r| (r.id, self.core.live_peers(&r.id)))
            .filter(|(_, live)| !live.is_empty())
            .collect();
        Report { selection: self.core.selection(), items, peers }
    }
}
