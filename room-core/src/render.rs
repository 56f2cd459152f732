use crate::item::{Item, ItemId};

/// Instruction for the visual layer. Item state is authoritative in the
/// controller; the front-end only ever applies these commands.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    /// Create a positioned node for a newly placed or restored item.
    Create(Item),
    /// Move an existing node to a new left/top offset.
    Move { id: ItemId, x: f64, y: f64 },
    /// Remove every item node (a restore replaces the whole layout).
    Clear,
}
