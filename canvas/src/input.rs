//! Gesture state machine for the select → drag → release cycle.
//!
//! `InputState` is the only place the engine remembers which item the user
//! is working with. It holds an id, never a reference, so removing the item
//! just makes lookups come back empty.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;
use crate::item::ItemId;

/// Internal state for the input state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// Nothing selected; waiting for the next pointer-down.
    #[default]
    Idle,
    /// An item is selected but the pointer is up.
    Selected {
        /// Id of the selected item.
        id: ItemId,
    },
    /// The selected item follows the pointer.
    Dragging {
        /// Id of the item being dragged.
        id: ItemId,
        /// Pointer position minus item position at pointer-down.
        offset: Point,
        /// Item position at pointer-down, restored if the drop collides.
        origin: Point,
    },
}

impl InputState {
    /// The selected item, whether or not it is being dragged.
    #[must_use]
    pub fn selected_id(&self) -> Option<ItemId> {
        match self {
            Self::Idle => None,
            Self::Selected { id } | Self::Dragging { id, .. } => Some(*id),
        }
    }

    /// The item being dragged, if a drag is in progress.
    #[must_use]
    pub fn dragging_id(&self) -> Option<ItemId> {
        match self {
            Self::Dragging { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Whether this state refers to `id` in any way.
    #[must_use]
    pub fn involves(&self, id: &ItemId) -> bool {
        self.selected_id().as_ref() == Some(id)
    }
}
