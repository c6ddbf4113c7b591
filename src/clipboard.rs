use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlTextAreaElement};

use ln_tip_jar_core::{ClipboardAccess, ClipboardError, LocalFuture};

use crate::dom::{self, js_err};

const OFFSCREEN_STYLE: &str = "position:fixed;top:-9999px;left:-9999px;opacity:0;";

/// `navigator.clipboard` when present, with a hidden-textarea fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClipboard;

impl ClipboardAccess for BrowserClipboard {
    fn write_text(&self, text: &str) -> Option<LocalFuture<'static, Result<(), ClipboardError>>> {
        let (clipboard, write_text) = navigator_clipboard()?;
        let write = match write_text.call1(&clipboard, &JsValue::from_str(text)) {
            Ok(value) => value.dyn_into::<Promise>().map_err(|_| {
                ClipboardError::Rejected("writeText did not return a promise".to_string())
            }),
            Err(err) => Err(ClipboardError::Rejected(js_err(err))),
        };
        Some(Box::pin(async move {
            JsFuture::from(write?)
                .await
                .map(|_| ())
                .map_err(|err| ClipboardError::Rejected(js_err(err)))
        }))
    }

    fn legacy_copy(&self, text: &str) -> Result<(), ClipboardError> {
        let document =
            dom::document().ok_or_else(|| ClipboardError::Command("missing document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| ClipboardError::Command("missing body".to_string()))?;
        let area = document
            .create_element("textarea")
            .map_err(|err| ClipboardError::Command(js_err(err)))?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| ClipboardError::Command("textarea cast failed".to_string()))?;
        area.set_value(text);
        let _ = area.set_attribute("readonly", "");
        let _ = area.set_attribute("style", OFFSCREEN_STYLE);
        body.append_child(&area)
            .map_err(|err| ClipboardError::Command(js_err(err)))?;
        area.select();
        let result = exec_copy(&document);
        area.remove();
        result
    }
}

/// `navigator.clipboard` and its `writeText`, looked up dynamically since
/// insecure contexts lack both.
fn navigator_clipboard() -> Option<(JsValue, Function)> {
    let navigator = web_sys::window()?.navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard")).ok()?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return None;
    }
    let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some((clipboard, write_text))
}

fn exec_copy(document: &Document) -> Result<(), ClipboardError> {
    let exec = Reflect::get(document, &JsValue::from_str("execCommand"))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
        .ok_or_else(|| ClipboardError::Command("execCommand unavailable".to_string()))?;
    match exec.call1(document, &JsValue::from_str("copy")) {
        Ok(value) if value.as_bool() == Some(true) => Ok(()),
        Ok(_) => Err(ClipboardError::Command("copy command returned false".to_string())),
        Err(err) => Err(ClipboardError::Command(js_err(err))),
    }
}
