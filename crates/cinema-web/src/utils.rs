use anyhow::anyhow;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Storage, Window};

thread_local! {
    static WINDOW: Window = web_sys::window().unwrap_throw();
    static DOCUMENT: Document = WINDOW.with(|w| w.document().unwrap_throw());
    static BODY: HtmlElement = DOCUMENT.with(|d| d.body().unwrap_throw());
    static ROOT: Element = DOCUMENT.with(|d| d.document_element().unwrap_throw());
    static LOCAL_STORAGE: Option<Storage> = WINDOW.with(|w| w.local_storage().ok().flatten());
}

pub fn window() -> Window {
    WINDOW.with(|s| s.clone())
}

pub fn document() -> Document {
    DOCUMENT.with(|d| d.clone())
}

pub fn body() -> HtmlElement {
    BODY.with(|d| d.clone())
}

/// The `<html>` element, where the theme marker lives.
pub fn root() -> Element {
    ROOT.with(|r| r.clone())
}

/// `None` when the browser refuses storage access, e.g. blocked cookies.
pub fn local_storage() -> Option<Storage> {
    LOCAL_STORAGE.with(|s| s.clone())
}

pub fn pathname() -> String {
    window().location().pathname().unwrap_or_default()
}

/// Wraps a `JsValue` error thrown by a DOM call.
pub fn js_error(context: &str, e: JsValue) -> anyhow::Error {
    anyhow!("{}: {:?}", context, e)
}

/// Removes every element matching `selector` from the document.
pub fn remove_all(selector: &str) -> Result<(), anyhow::Error> {
    let nodes = document()
        .query_selector_all(selector)
        .map_err(|e| js_error("error query selector", e))?;

    for i in 0..nodes.length() {
        if let Some(node) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            node.remove();
        }
    }

    Ok(())
}

pub fn count(selector: &str) -> Result<u32, anyhow::Error> {
    document()
        .query_selector_all(selector)
        .map(|nodes| nodes.length())
        .map_err(|e| js_error("error query selector", e))
}
