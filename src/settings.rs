use std::cell::Cell;

use wasm_bindgen::JsValue;

pub(crate) const DEFAULT_QR_SCRIPT_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/qrcodejs/1.0.0/qrcode.min.js";

const DEBUG_KEY: &str = "ln-tip-jar.debug";

thread_local! {
    static DEBUG: Cell<Option<bool>> = const { Cell::new(None) };
}

pub(crate) fn qr_script_url() -> String {
    if let Some(raw) = option_env!("LN_TIP_JAR_QR_SCRIPT_URL") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    DEFAULT_QR_SCRIPT_URL.to_string()
}

fn read_storage_flag(key: &str) -> Option<bool> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    let raw = storage.get_item(key).ok()??;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Some(true),
        _ => Some(false),
    }
}

/// Read once per page from `localStorage["ln-tip-jar.debug"]`.
pub(crate) fn debug_enabled() -> bool {
    DEBUG.with(|slot| {
        if let Some(value) = slot.get() {
            return value;
        }
        let value = read_storage_flag(DEBUG_KEY).unwrap_or(false);
        slot.set(Some(value));
        value
    })
}

pub(crate) fn debug(message: &str, detail: impl Into<JsValue>) {
    if debug_enabled() {
        gloo::console::log!("ln-tip-jar:", message, detail.into());
    }
}
