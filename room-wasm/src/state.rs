use std::collections::HashMap;

use room_core::{ItemId, LayoutController, Palette};
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement, MouseEvent, Window};

/// DOM projection of one placed item. The listener is owned here so it is
/// released together with the node.
pub struct ItemNode {
    pub element: HtmlElement,
    pub _on_mousedown: Closure<dyn FnMut(MouseEvent)>,
}

/// Application state. Each WASM callback holds its own `Rc<RefCell<State>>`
/// clone.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub room: HtmlElement,
    pub controller: LayoutController,
    pub palette: Palette,
    pub nodes: HashMap<ItemId, ItemNode>,
}
