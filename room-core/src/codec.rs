//! Layout wire format.
//!
//! Both local storage and share links carry the same JSON document: an array
//! of `[id, {"type", "x", "y"}]` pairs. A share link wraps that document in
//! standard base64 and percent-encodes it into the `layout` query parameter.

use std::collections::HashSet;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{DecodeError, LayoutError};
use crate::item::{Item, ItemId, ItemRecord};

// Encodes padded like btoa, but also accepts links whose padding got trimmed.
const SHARE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Serialize items as the JSON pair array.
pub fn encode_layout<'a, I>(items: I) -> Result<String, LayoutError>
where
    I: IntoIterator<Item = &'a Item>,
{
    let pairs: Vec<(ItemId, ItemRecord)> = items.into_iter().map(|it| (it.id, it.record())).collect();
    serde_json::to_string(&pairs).map_err(|e| LayoutError::Encode(e.to_string()))
}

/// Parse the JSON pair array. The whole document is validated before
/// anything is returned, so callers never see a partially decoded layout.
pub fn decode_layout(text: &str) -> Result<Vec<Item>, DecodeError> {
    let pairs: Vec<(String, ItemRecord)> = serde_json::from_str(text)?;
    let mut seen = HashSet::with_capacity(pairs.len());
    let mut items = Vec::with_capacity(pairs.len());
    for (raw_id, rec) in pairs {
        let id: ItemId = raw_id.parse()?;
        if !seen.insert(id) {
            return Err(DecodeError::DuplicateId(id));
        }
        if !rec.x.is_finite() || !rec.y.is_finite() {
            return Err(DecodeError::NonFiniteCoordinate(id));
        }
        items.push(Item {
            id,
            kind: rec.kind,
            x: rec.x,
            y: rec.y,
        });
    }
    Ok(items)
}

/// JSON pair array wrapped in base64.
pub fn encode_shareable<'a, I>(items: I) -> Result<String, LayoutError>
where
    I: IntoIterator<Item = &'a Item>,
{
    Ok(SHARE_ENGINE.encode(encode_layout(items)?))
}

/// Inverse of [`encode_shareable`].
///
/// Query-string decoding turns an unescaped `+` into a space; those are
/// mapped back before decoding.
pub fn decode_shareable(value: &str) -> Result<Vec<Item>, DecodeError> {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = SHARE_ENGINE.decode(cleaned)?;
    let text = String::from_utf8(bytes).map_err(|e| DecodeError::Base64(e.to_string()))?;
    decode_layout(&text)
}

/// Build `<origin><path>?<param>=<value>` with the value percent-encoded.
pub fn share_url(origin: &str, path: &str, param: &str, value: &str) -> String {
    format!(
        "{}{}?{}={}",
        origin,
        path,
        param,
        utf8_percent_encode(value, NON_ALPHANUMERIC)
    )
}
