//! Placement and persistence logic for the room planner.
//!
//! Everything here is independent of the browser: the wasm front-end feeds
//! pointer coordinates and canvas rectangles in, and applies the
//! [`RenderCommand`]s that come out.

pub mod assets;
pub mod codec;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod grid;
pub mod item;
pub mod render;
pub mod store;

pub use assets::{AssetKind, Palette};
pub use config::PlannerConfig;
pub use controller::LayoutController;
pub use drag::DragState;
pub use error::{AssetLoadError, DecodeError, LayoutError, StoreError};
pub use grid::{CanvasRect, GridSize};
pub use item::{Item, ItemId, ItemKind, ItemRecord};
pub use render::RenderCommand;
pub use store::{LayoutStore, MemoryStore};
