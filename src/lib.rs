//! Lightning tip-jar widget for the browser.
//!
//! The page loads the module, then calls `autoMount()` so every
//! `<ln-tip-jar>` element becomes a floating trigger with a payment dialog.
//! Hosts can also be mounted one by one with `mount(element)`.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

mod attributes;
mod clipboard;
mod dom;
mod page_listeners;
mod qr_script;
mod registry;
mod settings;
mod timer;
mod view;
mod widget;

pub use clipboard::BrowserClipboard;
pub use page_listeners::installed_count as active_page_listeners;
pub use qr_script::ScriptQrProvider;
pub use registry::{find, mount_with, unmount, TAG_NAME};
pub use timer::BrowserTimer;
pub use widget::{TipWidget, WidgetServices};

#[wasm_bindgen(js_name = autoMount)]
pub fn auto_mount() -> Result<(), JsValue> {
    registry::install()
}

#[wasm_bindgen]
pub fn mount(host: &Element) -> Result<TipJar, JsValue> {
    let widget = registry::mount_with(host, WidgetServices::default())?;
    Ok(TipJar { widget })
}

/// Script-side handle to one mounted widget.
#[wasm_bindgen]
pub struct TipJar {
    widget: Rc<TipWidget>,
}

#[wasm_bindgen]
impl TipJar {
    pub fn open(&self) {
        self.widget.open();
    }

    pub fn close(&self) {
        self.widget.close();
    }

    pub fn toggle(&self) {
        self.widget.toggle();
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.widget.is_open()
    }

    pub fn refresh(&self) {
        self.widget.refresh();
    }

    pub fn detach(&self) {
        if !registry::unmount(self.widget.host()) {
            self.widget.detach();
        }
    }
}
