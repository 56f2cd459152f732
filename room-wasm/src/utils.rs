use room_core::{AssetLoadError, CanvasRect, PlannerConfig};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Window};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

/// Current bounding rectangle of the room element, in client pixels.
pub fn room_rect(room: &Element) -> CanvasRect {
    let r = room.get_bounding_client_rect();
    CanvasRect::new(r.left(), r.top(), r.width(), r.height())
}

/// Build an absolute URL for an asset, taking into account the optional
/// `window.__BASE_URL` which is set by the host page.
pub fn asset_url(path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") {
        return p.to_string();
    }
    let base = window_global("__BASE_URL")
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| "/".to_string());
    let base = if base.ends_with('/') {
        base
    } else {
        format!("{}/", base)
    };
    let p = p.trim_start_matches('/');
    format!("{}{}", base, p)
}

fn window_global(name: &str) -> Option<JsValue> {
    let w = web_sys::window()?;
    let v = js_sys::Reflect::get(&w, &JsValue::from_str(name)).ok()?;
    if v.is_undefined() || v.is_null() {
        None
    } else {
        Some(v)
    }
}

/// Planner configuration, optionally overridden by the host page through
/// `window.__ROOM_PLANNER_CONFIG` (a JSON string or a plain object).
pub fn read_config() -> PlannerConfig {
    let Some(v) = window_global("__ROOM_PLANNER_CONFIG") else {
        return PlannerConfig::default();
    };
    let text = match v.as_string() {
        Some(s) => s,
        None => match js_sys::JSON::stringify(&v) {
            Ok(s) => String::from(s),
            Err(_) => return PlannerConfig::default(),
        },
    };
    PlannerConfig::from_json(&text).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring invalid __ROOM_PLANNER_CONFIG");
        PlannerConfig::default()
    })
}

/// Start fetching `path`. The request is in flight once this returns.
pub fn request(window: &Window, path: &str) -> JsFuture {
    JsFuture::from(window.fetch_with_str(&asset_url(path)))
}

/// Finish a request started with [`request`]. Non-2xx responses and network
/// failures are reported with the requested path.
pub async fn response_text(path: &str, pending: JsFuture) -> Result<String, AssetLoadError> {
    let network = |e: JsValue| AssetLoadError::Network {
        path: path.to_string(),
        message: format!("{:?}", e),
    };
    let resp_value = pending.await.map_err(network)?;
    let resp: web_sys::Response = resp_value.dyn_into().map_err(network)?;
    if !resp.ok() {
        return Err(AssetLoadError::Http {
            path: path.to_string(),
            status: resp.status(),
        });
    }
    let text_js = JsFuture::from(resp.text().map_err(network)?)
        .await
        .map_err(network)?;
    Ok(text_js.as_string().unwrap_or_default())
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_is_percent_decoded() {
        let search = "?lang=en&layout=W1siaXRlbS0xIl0%2B%3D";
        assert_eq!(
            get_query_param(search, "layout").as_deref(),
            Some("W1siaXRlbS0xIl0+=")
        );
        assert_eq!(get_query_param(search, "lang").as_deref(), Some("en"));
        assert_eq!(get_query_param(search, "missing"), None);
    }

    #[test]
    fn unescaped_plus_is_kept_for_the_share_decoder() {
        assert_eq!(get_query_param("layout=ab+c", "layout").as_deref(), Some("ab+c"));
    }
}
