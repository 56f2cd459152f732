//! Planner configuration and application-wide constants.

use serde::{Deserialize, Serialize};

use crate::grid::GridSize;

/// Local storage key holding the saved layout.
pub const STORAGE_KEY: &str = "roomLayout";
/// Query parameter carrying a shared layout.
pub const SHARE_PARAM: &str = "layout";
/// Size of the `<object>` hosting a plaque SVG (px).
pub const PLAQUE_WIDTH_PX: u32 = 100;
pub const PLAQUE_HEIGHT_PX: u32 = 120;
/// Glyph used to render a plant.
pub const PLANT_GLYPH: &str = "\u{1F334}";

/// Runtime configuration. Every field falls back to its default when absent,
/// so a host page only needs to supply what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub grid: GridSize,
    pub storage_key: String,
    pub share_param: String,
    pub snap_to_grid: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            grid: GridSize::default(),
            storage_key: STORAGE_KEY.to_string(),
            share_param: SHARE_PARAM.to_string(),
            snap_to_grid: true,
        }
    }
}

impl PlannerConfig {
    /// Parse a JSON override such as `{"grid":{"x":10,"y":10}}`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut cfg: PlannerConfig = serde_json::from_str(text)?;
        cfg.grid.x = cfg.grid.x.max(1);
        cfg.grid.y = cfg.grid.y.max(1);
        Ok(cfg)
    }
}
