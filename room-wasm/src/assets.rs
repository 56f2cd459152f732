use room_core::{AssetKind, Palette};
use web_sys::Window;

use crate::utils::{request, response_text};

/// Fetch every palette asset. All requests are issued before the first one
/// is awaited. Failures are recorded in the returned palette, never raised.
pub async fn load_assets(window: &Window) -> Palette {
    let pending: Vec<_> = AssetKind::ALL
        .into_iter()
        .map(|asset| (asset, request(window, asset.path())))
        .collect();
    let mut palette = Palette::new();
    for (asset, fut) in pending {
        palette.record(asset, response_text(asset.path(), fut).await);
    }
    tracing::info!(
        degraded = palette.degraded().count(),
        "palette assets settled"
    );
    palette
}
