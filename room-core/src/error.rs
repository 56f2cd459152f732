//! Error types shared by the layout controller and its collaborators.

use thiserror::Error;

use crate::item::ItemId;

/// Failures surfaced by [`crate::LayoutController`] operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The referenced item is not part of the collection.
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// A palette drop carried a type name that is not a known item kind.
    #[error("unknown item type '{0}'")]
    UnknownItemKind(String),

    /// A placement or move carried a NaN or infinite coordinate.
    #[error("non-finite position ({x}, {y})")]
    NonFinitePosition { x: f64, y: f64 },

    /// Every item id has been handed out.
    #[error("item id sequence exhausted")]
    IdsExhausted,

    /// The layout could not be serialized.
    #[error("failed to encode layout: {0}")]
    Encode(String),

    /// Stored or shared layout data could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The persistent store rejected a read or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Malformed persisted or shared layout data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("share string is not valid base64: {0}")]
    Base64(String),

    #[error("layout is not valid JSON: {0}")]
    Json(String),

    #[error("invalid item id '{0}'")]
    InvalidId(String),

    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),

    #[error("item {0} has a non-finite coordinate")]
    NonFiniteCoordinate(ItemId),
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e.to_string())
    }
}

impl From<base64::DecodeError> for DecodeError {
    fn from(e: base64::DecodeError) -> Self {
        DecodeError::Base64(e.to_string())
    }
}

/// Errors reported by a [`crate::LayoutStore`] backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read '{key}': {message}")]
    Read { key: String, message: String },

    #[error("failed to write '{key}': {message}")]
    Write { key: String, message: String },
}

/// A vector asset could not be fetched at start-up.
///
/// Never fatal: the affected palette entry is dimmed and start-up continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetLoadError {
    #[error("failed to load {path}: HTTP {status}")]
    Http { path: String, status: u16 },

    #[error("failed to load {path}: {message}")]
    Network { path: String, message: String },
}

impl AssetLoadError {
    pub fn path(&self) -> &str {
        match self {
            AssetLoadError::Http { path, .. } | AssetLoadError::Network { path, .. } => path,
        }
    }
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
