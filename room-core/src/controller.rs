use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::codec;
use crate::config::PlannerConfig;
use crate::drag::DragState;
use crate::error::{LayoutError, Result};
use crate::grid::{self, CanvasRect, GridSize};
use crate::item::{Item, ItemId, ItemKind, ItemRecord};
use crate::render::RenderCommand;
use crate::store::LayoutStore;

/// Owns the placed items and everything that mutates them: placement,
/// drag moves, save/restore and share links.
///
/// Visual changes are queued as [`RenderCommand`]s and drained by the
/// front-end with [`LayoutController::take_render_commands`].
#[derive(Debug)]
pub struct LayoutController {
    config: PlannerConfig,
    items: BTreeMap<ItemId, Item>,
    next_seq: u64,
    pub(crate) drag: DragState,
    commands: Vec<RenderCommand>,
}

impl Default for LayoutController {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl LayoutController {
    pub fn new(config: PlannerConfig) -> Self {
        LayoutController {
            config,
            items: BTreeMap::new(),
            next_seq: 1,
            drag: DragState::Idle,
            commands: Vec::new(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn grid(&self) -> GridSize {
        self.config.grid
    }

    pub fn snap_to_grid(&self) -> bool {
        self.config.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        debug!(enabled, "snap to grid toggled");
        self.config.snap_to_grid = enabled;
    }

    /// Snap with the controller's grid and current toggle.
    pub fn snap(&self, px: f64, py: f64, rect: &CanvasRect) -> (f64, f64) {
        grid::snap(px, py, rect, self.config.grid, self.config.snap_to_grid)
    }

    fn allocate_id(&mut self) -> Result<ItemId> {
        let next = self.next_seq.checked_add(1).ok_or(LayoutError::IdsExhausted)?;
        let id = ItemId::new(self.next_seq);
        self.next_seq = next;
        Ok(id)
    }

    /// Place a new item at canvas-relative `(raw_x, raw_y)`, snapped to the
    /// grid when snapping is on.
    pub fn place_item(&mut self, kind: ItemKind, raw_x: f64, raw_y: f64, rect: &CanvasRect) -> Result<&Item> {
        ensure_finite(raw_x, raw_y)?;
        let (x, y) = self.snap(raw_x, raw_y, rect);
        let id = self.allocate_id()?;
        debug!(%id, %kind, x, y, "item placed");
        Ok(self.insert(Item { id, kind, x, y }))
    }

    /// Like [`Self::place_item`] but takes the palette's type name. Unknown
    /// names are rejected before an id is allocated.
    pub fn place_item_named(
        &mut self,
        type_name: &str,
        raw_x: f64,
        raw_y: f64,
        rect: &CanvasRect,
    ) -> Result<&Item> {
        let kind: ItemKind = type_name.parse().inspect_err(|e| warn!(error = %e, "drop rejected"))?;
        self.place_item(kind, raw_x, raw_y, rect)
    }

    /// Handle a palette drop at client coordinates.
    pub fn drop_at(
        &mut self,
        type_name: &str,
        client_x: f64,
        client_y: f64,
        rect: &CanvasRect,
    ) -> Result<&Item> {
        let (x, y) = rect.to_local(client_x, client_y);
        self.place_item_named(type_name, x, y, rect)
    }

    fn insert(&mut self, item: Item) -> &Item {
        let id = item.id;
        self.commands.push(RenderCommand::Create(item.clone()));
        self.items.insert(id, item);
        &self.items[&id]
    }

    /// Move an item to canvas-relative `(raw_x, raw_y)`: snapped, then
    /// clamped so a whole cell stays inside the canvas.
    pub fn move_item(&mut self, id: ItemId, raw_x: f64, raw_y: f64, rect: &CanvasRect) -> Result<Item> {
        ensure_finite(raw_x, raw_y)?;
        let (sx, sy) = self.snap(raw_x, raw_y, rect);
        let (x, y) = grid::clamp_to_canvas(sx, sy, rect, self.config.grid);
        let item = self.items.get_mut(&id).ok_or(LayoutError::NotFound(id))?;
        item.x = x;
        item.y = y;
        let moved = item.clone();
        self.commands.push(RenderCommand::Move { id, x, y });
        Ok(moved)
    }

    /// Put an item back at an exact position, bypassing snap and clamp.
    pub(crate) fn reposition(&mut self, id: ItemId, x: f64, y: f64) -> Result<()> {
        let item = self.items.get_mut(&id).ok_or(LayoutError::NotFound(id))?;
        item.x = x;
        item.y = y;
        self.commands.push(RenderCommand::Move { id, x, y });
        Ok(())
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Items in id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ordered `(id, item)` pairs, as stored and shared.
    pub fn snapshot(&self) -> Vec<(ItemId, ItemRecord)> {
        self.items.values().map(|it| (it.id, it.record())).collect()
    }

    /// Write the layout under the configured key, replacing any earlier save.
    pub fn save(&self, store: &mut dyn LayoutStore) -> Result<()> {
        let text = codec::encode_layout(self.items.values())?;
        store.set(&self.config.storage_key, &text)?;
        info!(items = self.items.len(), key = %self.config.storage_key, "layout saved");
        Ok(())
    }

    /// Restore the saved layout. A missing key is not an error. Corrupt data
    /// is rejected before anything changes.
    pub fn load(&mut self, store: &dyn LayoutStore) -> Result<usize> {
        let Some(text) = store.get(&self.config.storage_key)? else {
            debug!(key = %self.config.storage_key, "no saved layout");
            return Ok(0);
        };
        let items = codec::decode_layout(&text).inspect_err(|e| warn!(error = %e, "saved layout rejected"))?;
        Ok(self.restore(items))
    }

    pub fn encode_shareable(&self) -> Result<String> {
        codec::encode_shareable(self.items.values())
    }

    pub fn decode_shareable(value: &str) -> Result<Vec<Item>> {
        Ok(codec::decode_shareable(value)?)
    }

    /// Restore from a share-link value with the same semantics as [`Self::load`].
    pub fn load_shared(&mut self, value: &str) -> Result<usize> {
        let items = Self::decode_shareable(value).inspect_err(|e| warn!(error = %e, "shared layout rejected"))?;
        Ok(self.restore(items))
    }

    /// Share link for the current layout.
    pub fn share_url(&self, origin: &str, path: &str) -> Result<String> {
        let value = self.encode_shareable()?;
        Ok(codec::share_url(origin, path, &self.config.share_param, &value))
    }

    // Replace the collection wholesale. Positions are taken as stored.
    fn restore(&mut self, items: Vec<Item>) -> usize {
        self.items.clear();
        self.drag = DragState::Idle;
        self.commands.push(RenderCommand::Clear);
        let count = items.len();
        for item in items {
            // Decoded ids never exceed MAX_SEQ, so a successor always exists.
            let after = item.id.seq().checked_add(1).unwrap_or(u64::MAX);
            self.next_seq = self.next_seq.max(after);
            self.insert(item);
        }
        info!(items = count, "layout restored");
        count
    }

    /// Drain queued visual updates.
    pub fn take_render_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }
}

fn ensure_finite(x: f64, y: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::NonFinitePosition { x, y })
    }
}
