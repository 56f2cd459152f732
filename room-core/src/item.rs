use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, LayoutError};

/// Decorative items offered by the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    PlaqueGold,
    PlaquePlatinum,
    Plant,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::PlaqueGold, ItemKind::PlaquePlatinum, ItemKind::Plant];

    /// Name used in drag data, `data-type` attributes and the stored layout.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::PlaqueGold => "plaque-gold",
            ItemKind::PlaquePlatinum => "plaque-platinum",
            ItemKind::Plant => "plant",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| LayoutError::UnknownItemKind(s.to_string()))
    }
}

/// Identifier of a placed item, rendered as `item-<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    const PREFIX: &'static str = "item-";
    /// Largest sequence number an id may carry. The sequence after it must
    /// still be representable.
    pub const MAX_SEQ: u64 = u64::MAX - 1;

    pub fn new(seq: u64) -> Self {
        ItemId(seq)
    }

    pub fn seq(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for ItemId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            // Canonical form only, so an id's text survives a round trip.
            .filter(|n| *n == "0" || !n.starts_with('0'))
            .and_then(|n| n.parse::<u64>().ok())
            .filter(|seq| *seq <= Self::MAX_SEQ)
            .map(ItemId)
            .ok_or_else(|| DecodeError::InvalidId(s.to_string()))
    }
}

impl Serialize for ItemId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A placed item. `x`/`y` are pixel offsets from the canvas top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub x: f64,
    pub y: f64,
}

impl Item {
    pub fn record(&self) -> ItemRecord {
        ItemRecord {
            kind: self.kind,
            x: self.x,
            y: self.y,
        }
    }
}

/// Value half of a stored `[id, item]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub x: f64,
    pub y: f64,
}
