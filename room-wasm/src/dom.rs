use std::cell::RefCell;
use std::rc::Rc;

use room_core::config::{PLANT_GLYPH, PLAQUE_HEIGHT_PX, PLAQUE_WIDTH_PX};
use room_core::{AssetKind, AssetLoadError, Item, ItemKind, RenderCommand};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, MouseEvent};

use crate::state::{ItemNode, State};
use crate::utils::{asset_url, room_rect};

pub fn set_position(el: &HtmlElement, x: f64, y: f64) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("left", &format!("{}px", x))?;
    style.set_property("top", &format!("{}px", y))?;
    Ok(())
}

/// Apply the controller's queued visual updates to the room element.
pub fn apply_render_commands(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let mut s = state.borrow_mut();
    for cmd in s.controller.take_render_commands() {
        match cmd {
            RenderCommand::Create(item) => {
                let node = create_item_node(&s.document, &item, state.clone())?;
                s.room.append_child(&node.element)?;
                if let Some(old) = s.nodes.insert(item.id, node) {
                    old.element.remove();
                }
            }
            RenderCommand::Move { id, x, y } => match s.nodes.get(&id) {
                Some(node) => set_position(&node.element, x, y)?,
                None => tracing::debug!(%id, "move for item without a node"),
            },
            RenderCommand::Clear => {
                for (_, node) in s.nodes.drain() {
                    node.element.remove();
                }
            }
        }
    }
    Ok(())
}

fn create_item_node(
    document: &Document,
    item: &Item,
    state: Rc<RefCell<State>>,
) -> Result<ItemNode, JsValue> {
    let el = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    el.set_id(&item.id.to_string());
    el.set_class_name("draggable-item");
    set_position(&el, item.x, item.y)?;
    match AssetKind::for_item(item.kind) {
        Some(asset) => el.set_inner_html(&format!(
            r#"<object data="{}" type="image/svg+xml" width="{}" height="{}" style="pointer-events: none"></object>"#,
            asset_url(asset.path()),
            PLAQUE_WIDTH_PX,
            PLAQUE_HEIGHT_PX,
        )),
        None => el.set_inner_text(PLANT_GLYPH),
    }

    let id = item.id;
    let on_mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
        e.prevent_default();
        let mut s = state.borrow_mut();
        let rect = room_rect(&s.room);
        if let Err(err) = s
            .controller
            .pointer_down(id, e.client_x() as f64, e.client_y() as f64, &rect)
        {
            tracing::warn!(error = %err, "drag not started");
        }
    }));
    el.add_event_listener_with_callback("mousedown", on_mousedown.as_ref().unchecked_ref())?;
    Ok(ItemNode {
        element: el,
        _on_mousedown: on_mousedown,
    })
}

/// Dim a palette entry whose asset failed to load.
pub fn degrade_palette_entry(document: &Document, kind: ItemKind, error: &AssetLoadError) {
    tracing::error!(%kind, %error, "palette entry degraded");
    let selector = format!(r#".asset-item[data-type="{}"]"#, kind);
    let Ok(list) = document.query_selector_all(&selector) else {
        return;
    };
    for i in 0..list.length() {
        if let Some(node) = list.item(i)
            && let Ok(el) = node.dyn_into::<HtmlElement>()
        {
            let _ = el.style().set_property("opacity", "0.5");
            el.set_title("Failed to load asset");
        }
    }
}
