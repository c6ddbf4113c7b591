use std::cell::Cell;
use std::rc::Weak;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, KeyboardEvent};

use crate::widget::TipWidget;

thread_local! {
    static INSTALLED: Cell<usize> = const { Cell::new(0) };
}

/// Number of widgets currently listening to the document.
pub fn installed_count() -> usize {
    INSTALLED.with(Cell::get)
}

/// Document-level listeners that exist only while a widget is attached.
/// Dropping the guard unregisters both.
pub(crate) struct PageListeners {
    _keydown: EventListener,
    _click: EventListener,
}

impl PageListeners {
    pub(crate) fn install(document: &Document, widget: Weak<TipWidget>) -> Self {
        let keydown_widget = widget.clone();
        let keydown = EventListener::new_with_options(
            document,
            "keydown",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if let Some(widget) = keydown_widget.upgrade() {
                    widget.handle_key(event);
                }
            },
        );
        let click = EventListener::new_with_options(
            document,
            "click",
            EventListenerOptions {
                phase: EventListenerPhase::Capture,
                passive: true,
            },
            move |event: &Event| {
                if let Some(widget) = widget.upgrade() {
                    widget.handle_page_click(event);
                }
            },
        );
        INSTALLED.with(|count| count.set(count.get() + 1));
        Self {
            _keydown: keydown,
            _click: click,
        }
    }
}

impl Drop for PageListeners {
    fn drop(&mut self) {
        INSTALLED.with(|count| count.set(count.get().saturating_sub(1)));
    }
}
