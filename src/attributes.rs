use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, MutationObserver, MutationObserverInit};

use ln_tip_jar_core::OBSERVED_ATTRIBUTES;

/// Watches the host's configuration attributes. Disconnects on drop.
pub(crate) struct AttributeObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl AttributeObserver {
    pub(crate) fn observe<F>(host: &Element, on_change: F) -> Result<Self, JsValue>
    where
        F: Fn() + 'static,
    {
        let callback = Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
            if records.length() > 0 {
                on_change();
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;

        let filter = Array::new();
        for name in OBSERVED_ATTRIBUTES {
            filter.push(&JsValue::from_str(name));
        }
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_filter(&filter);
        observer.observe_with_options(host, &init)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for AttributeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
