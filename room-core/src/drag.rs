//! Drag gesture state machine.
//!
//! `Idle -> Dragging` on pointer-down over an item, `Dragging -> Dragging`
//! on every pointer-move, `Dragging -> Idle` on pointer-up (position kept)
//! or on cancel (position restored).

use tracing::debug;

use crate::controller::LayoutController;
use crate::error::{LayoutError, Result};
use crate::grid::CanvasRect;
use crate::item::{Item, ItemId};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        item: ItemId,
        /// Pointer position relative to the item's top-left corner.
        grab_offset: (f64, f64),
        /// Item position when the gesture started.
        origin: (f64, f64),
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn item(&self) -> Option<ItemId> {
        match self {
            DragState::Dragging { item, .. } => Some(*item),
            DragState::Idle => None,
        }
    }
}

impl LayoutController {
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Start dragging `id`. A pointer-down during an active gesture replaces it.
    pub fn pointer_down(&mut self, id: ItemId, client_x: f64, client_y: f64, rect: &CanvasRect) -> Result<()> {
        let item = self.get(id).ok_or(LayoutError::NotFound(id))?;
        let (ix, iy) = rect.to_client(item.x, item.y);
        let origin = (item.x, item.y);
        self.drag = DragState::Dragging {
            item: id,
            grab_offset: (client_x - ix, client_y - iy),
            origin,
        };
        debug!(%id, "drag started");
        Ok(())
    }

    /// Follow the pointer. Returns the updated item, or `None` when idle.
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, rect: &CanvasRect) -> Result<Option<Item>> {
        let DragState::Dragging { item, grab_offset, .. } = self.drag else {
            return Ok(None);
        };
        let (x, y) = rect.to_local(client_x - grab_offset.0, client_y - grab_offset.1);
        self.move_item(item, x, y, rect).map(Some)
    }

    /// Finish the gesture, keeping the last position.
    pub fn pointer_up(&mut self) -> Option<ItemId> {
        let id = self.drag.item();
        if let Some(id) = id {
            debug!(%id, "drag finished");
        }
        self.drag = DragState::Idle;
        id
    }

    /// Abort the gesture (e.g. the window lost focus) and put the item back
    /// where it was when the drag started.
    pub fn cancel_drag(&mut self) -> Result<Option<ItemId>> {
        let DragState::Dragging { item, origin, .. } = self.drag else {
            return Ok(None);
        };
        self.drag = DragState::Idle;
        debug!(id = %item, "drag cancelled");
        self.reposition(item, origin.0, origin.1)?;
        Ok(Some(item))
    }
}
