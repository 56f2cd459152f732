use std::collections::HashMap;

use crate::error::AssetLoadError;
use crate::item::ItemKind;

/// Vector assets fetched once at start-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    PlaqueGold,
    PlaquePlatinum,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::PlaqueGold, AssetKind::PlaquePlatinum];

    /// Path relative to the page base.
    pub fn path(self) -> &'static str {
        match self {
            AssetKind::PlaqueGold => "assets/plaque-gold.svg",
            AssetKind::PlaquePlatinum => "assets/plaque-platinum.svg",
        }
    }

    pub fn item_kind(self) -> ItemKind {
        match self {
            AssetKind::PlaqueGold => ItemKind::PlaqueGold,
            AssetKind::PlaquePlatinum => ItemKind::PlaquePlatinum,
        }
    }

    /// Asset backing a palette entry, if it has one. Plants are a glyph.
    pub fn for_item(kind: ItemKind) -> Option<AssetKind> {
        match kind {
            ItemKind::PlaqueGold => Some(AssetKind::PlaqueGold),
            ItemKind::PlaquePlatinum => Some(AssetKind::PlaquePlatinum),
            ItemKind::Plant => None,
        }
    }
}

/// Load state of the palette: cached SVG text and failed entries.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    svgs: HashMap<AssetKind, String>,
    failures: HashMap<ItemKind, AssetLoadError>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of fetching one asset.
    pub fn record(&mut self, asset: AssetKind, outcome: Result<String, AssetLoadError>) {
        match outcome {
            Ok(text) => {
                tracing::debug!(path = asset.path(), bytes = text.len(), "asset loaded");
                self.failures.remove(&asset.item_kind());
                self.svgs.insert(asset, text);
            }
            Err(e) => {
                tracing::warn!(error = %e, "asset load failed");
                self.mark_failed(asset.item_kind(), e);
            }
        }
    }

    pub fn mark_failed(&mut self, kind: ItemKind, error: AssetLoadError) {
        self.failures.insert(kind, error);
    }

    pub fn is_available(&self, kind: ItemKind) -> bool {
        !self.failures.contains_key(&kind)
    }

    pub fn failure(&self, kind: ItemKind) -> Option<&AssetLoadError> {
        self.failures.get(&kind)
    }

    /// Palette entries that should be shown dimmed.
    pub fn degraded(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.failures.keys().copied()
    }

    pub fn svg(&self, asset: AssetKind) -> Option<&str> {
        self.svgs.get(&asset).map(String::as_str)
    }
}
