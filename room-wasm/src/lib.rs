use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use room_core::{ItemKind, LayoutController, LayoutError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DragEvent, Event, HtmlDocument, HtmlElement, HtmlInputElement, MouseEvent, Window,
};

mod assets;
mod dom;
mod logging;
mod state;
mod storage;
mod utils;

use crate::dom::{apply_render_commands, degrade_palette_entry};
use crate::state::State;
use crate::storage::LocalStore;
use crate::utils::{get_query_param, log, read_config, room_rect};

fn report(window: &Window, context: &str, err: &LayoutError) {
    tracing::error!(error = %err, "{context}");
    let _ = window.alert_with_message(&format!("{context}: {err}"));
}

// Alerts are modal and event handlers may run while one is open, so none of
// these hold a `State` borrow across `alert_with_message`.
fn save_layout(state: &Rc<RefCell<State>>) {
    let (window, result) = {
        let s = state.borrow();
        let result = LocalStore::open(&s.window)
            .map_err(LayoutError::from)
            .and_then(|mut store| s.controller.save(&mut store));
        (s.window.clone(), result)
    };
    match result {
        Ok(()) => {
            let _ = window.alert_with_message("Layout saved!");
        }
        Err(e) => report(&window, "Could not save layout", &e),
    }
}

fn share_layout(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let (window, url) = {
        let s = state.borrow();
        let location = s.window.location();
        let url = s
            .controller
            .share_url(&location.origin()?, &location.pathname()?)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        copy_to_clipboard(&s.document, &url)?;
        (s.window.clone(), url)
    };
    tracing::info!(len = url.len(), "share url copied");
    window.alert_with_message("Share URL copied to clipboard!")?;
    Ok(())
}

// Temporary input + copy command; works without clipboard permissions.
fn copy_to_clipboard(document: &Document, text: &str) -> Result<(), JsValue> {
    let body = document.body().ok_or("no body")?;
    let temp = document
        .create_element("input")?
        .dyn_into::<HtmlInputElement>()?;
    body.append_child(&temp)?;
    temp.set_value(text);
    temp.select();
    let copied = document
        .dyn_ref::<HtmlDocument>()
        .map(|d| d.exec_command("copy"))
        .transpose()?
        .unwrap_or(false);
    temp.remove();
    if !copied {
        log("Copy command was not executed");
    }
    Ok(())
}

fn on_click(document: &Document, id: &str, mut f: impl FnMut() + 'static) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id(id) {
        let btn: HtmlElement = btn.dyn_into()?;
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || f()));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    } else {
        tracing::debug!(id, "control not present");
    }
    Ok(())
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let (doc, window, room) = {
        let s = state.borrow();
        (s.document.clone(), s.window.clone(), s.room.clone())
    };

    // Palette drag start
    let palette = doc.query_selector_all(".asset-item")?;
    for i in 0..palette.length() {
        let Some(node) = palette.item(i) else { continue };
        let Ok(el) = node.dyn_into::<HtmlElement>() else {
            continue;
        };
        let type_name = el.get_attribute("data-type").unwrap_or_default();
        let ondragstart = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            if let Some(dt) = e.data_transfer() {
                let _ = dt.set_data("type", &type_name);
            }
        }));
        el.add_event_listener_with_callback("dragstart", ondragstart.as_ref().unchecked_ref())?;
        ondragstart.forget();
    }

    // Room drop zone
    {
        let ondragover = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            e.prevent_default();
            if let Some(dt) = e.data_transfer() {
                dt.set_drop_effect("move");
            }
        }));
        room.add_event_listener_with_callback("dragover", ondragover.as_ref().unchecked_ref())?;
        ondragover.forget();
    }
    {
        let st = state.clone();
        let ondrop = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            e.prevent_default();
            let type_name = e
                .data_transfer()
                .and_then(|dt| dt.get_data("type").ok())
                .unwrap_or_default();
            {
                let mut s = st.borrow_mut();
                let rect = room_rect(&s.room);
                if let Err(err) =
                    s.controller
                        .drop_at(&type_name, e.client_x() as f64, e.client_y() as f64, &rect)
                {
                    tracing::warn!(error = %err, "drop ignored");
                    return;
                }
            }
            if let Err(err) = apply_render_commands(&st) {
                log(&format!("Failed to render dropped item: {:?}", err));
            }
        }));
        room.add_event_listener_with_callback("drop", ondrop.as_ref().unchecked_ref())?;
        ondrop.forget();
    }

    // Drag gesture: move and release are tracked on the whole document
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let moved = {
                let mut s = st.borrow_mut();
                if !s.controller.drag_state().is_dragging() {
                    return;
                }
                let rect = room_rect(&s.room);
                s.controller
                    .pointer_move(e.client_x() as f64, e.client_y() as f64, &rect)
            };
            match moved {
                Ok(_) => {
                    let _ = apply_render_commands(&st);
                }
                Err(err) => tracing::warn!(error = %err, "drag move rejected"),
            }
        }));
        doc.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        let st = state.clone();
        let mouseup = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            st.borrow_mut().controller.pointer_up();
        }));
        doc.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }
    {
        let st = state.clone();
        let onblur = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
            let cancelled = st.borrow_mut().controller.cancel_drag();
            match cancelled {
                Ok(Some(_)) => {
                    let _ = apply_render_commands(&st);
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "drag cancel failed"),
            }
        }));
        window.add_event_listener_with_callback("blur", onblur.as_ref().unchecked_ref())?;
        onblur.forget();
    }

    // Save and share
    {
        let st = state.clone();
        on_click(&doc, "saveBtn", move || save_layout(&st))?;
    }
    {
        let st = state.clone();
        on_click(&doc, "shareBtn", move || {
            if let Err(e) = share_layout(&st) {
                log(&format!("Failed to share layout: {:?}", e));
            }
        })?;
    }

    // Grid snap toggle
    if let Some(el) = doc.get_element_by_id("gridSnap") {
        let input: HtmlInputElement = el.dyn_into()?;
        input.set_checked(state.borrow().controller.snap_to_grid());
        let st = state.clone();
        let input_read = input.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            st.borrow_mut()
                .controller
                .set_snap_to_grid(input_read.checked());
        }));
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }
    Ok(())
}

/// Restore the layout from `?layout=` when present, otherwise from local
/// storage. A rejected share link falls back to the saved layout.
fn restore_layout(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let mut failures: Vec<(&str, LayoutError)> = Vec::new();
    let window = {
        let mut s = state.borrow_mut();
        let param = s.controller.config().share_param.clone();
        let shared = s
            .window
            .location()
            .search()
            .ok()
            .and_then(|search| get_query_param(&search, &param));
        let mut restored = false;
        if let Some(value) = shared {
            match s.controller.load_shared(&value) {
                Ok(n) => {
                    tracing::info!(items = n, "restored shared layout");
                    restored = true;
                }
                Err(e) => failures.push(("Could not load shared layout", e)),
            }
        }
        if !restored {
            let result = LocalStore::open(&s.window)
                .map_err(LayoutError::from)
                .and_then(|store| s.controller.load(&store));
            if let Err(e) = result {
                failures.push(("Could not load saved layout", e));
            }
        }
        s.window.clone()
    };
    apply_render_commands(state)?;
    for (context, e) in &failures {
        report(&window, context, e);
    }
    Ok(())
}

/// Dim palette entries whose asset could not be fetched.
fn show_degraded_palette(state: &State) {
    let degraded: Vec<ItemKind> = state.palette.degraded().collect();
    for kind in degraded {
        if let Some(err) = state.palette.failure(kind) {
            degrade_palette_entry(&state.document, kind, err);
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    logging::init();
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let room = document
        .get_element_by_id("room")
        .ok_or_else(|| JsValue::from_str("room element #room not found"))?
        .dyn_into::<HtmlElement>()?;
    let config = read_config();
    tracing::debug!(?config, "planner config");

    let state = Rc::new(RefCell::new(State {
        window: window.clone(),
        document,
        room,
        controller: LayoutController::new(config),
        palette: room_core::Palette::new(),
        nodes: HashMap::new(),
    }));

    // Listeners and restore only run once the assets have settled.
    wasm_bindgen_futures::spawn_local(async move {
        let palette = assets::load_assets(&window).await;
        {
            let mut s = state.borrow_mut();
            s.palette = palette;
            show_degraded_palette(&s);
        }
        if let Err(e) = attach_ui(state.clone()) {
            log(&format!("Failed to attach UI: {:?}", e));
            return;
        }
        if let Err(e) = restore_layout(&state) {
            log(&format!("Failed to render restored layout: {:?}", e));
        }
    });
    Ok(())
}
