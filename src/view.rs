use std::rc::Rc;

use gloo::events::EventListener;
use web_sys::{Element, Event, ShadowRoot};

use ln_tip_jar_core::markup::{
    self, CLOSE_ID, COPIED_CLASS, COPY_ID, DIALOG_ID, OPEN_CLASS, QR_ID, TRIGGER_ID,
};
use ln_tip_jar_core::{DialogEffect, FeedbackPhase, WidgetConfig};

use crate::dom;

#[derive(Clone)]
pub(crate) struct ViewHandlers {
    pub(crate) on_trigger: Rc<dyn Fn()>,
    pub(crate) on_close: Rc<dyn Fn()>,
    pub(crate) on_copy: Rc<dyn Fn()>,
}

/// Nodes of one build plus the listeners bound to them. Dropping the view
/// removes those listeners.
pub(crate) struct WidgetView {
    trigger: Element,
    dialog: Element,
    close: Element,
    qr: Element,
    copy: Element,
    _listeners: Vec<EventListener>,
}

impl WidgetView {
    pub(crate) fn build(
        root: &ShadowRoot,
        config: &WidgetConfig,
        handlers: ViewHandlers,
    ) -> Result<Self, String> {
        root.set_inner_html(&markup::render(config));
        let trigger = lookup(root, TRIGGER_ID)?;
        let dialog = lookup(root, DIALOG_ID)?;
        let close = lookup(root, CLOSE_ID)?;
        let qr = lookup(root, QR_ID)?;
        let copy = lookup(root, COPY_ID)?;

        let mut listeners = Vec::new();
        let on_trigger = handlers.on_trigger.clone();
        listeners.push(EventListener::new(&trigger, "click", move |_event: &Event| {
            on_trigger();
        }));
        let on_close = handlers.on_close.clone();
        listeners.push(EventListener::new(&close, "click", move |_event: &Event| {
            on_close();
        }));
        let on_copy = handlers.on_copy.clone();
        listeners.push(EventListener::new(&copy, "click", move |_event: &Event| {
            on_copy();
        }));

        Ok(Self {
            trigger,
            dialog,
            close,
            qr,
            copy,
            _listeners: listeners,
        })
    }

    pub(crate) fn apply(&self, effect: DialogEffect) {
        match effect {
            DialogEffect::ShowDialog => {
                let _ = self.dialog.class_list().add_1(OPEN_CLASS);
                let _ = self.dialog.set_attribute("aria-hidden", "false");
            }
            DialogEffect::HideDialog => {
                let _ = self.dialog.class_list().remove_1(OPEN_CLASS);
                let _ = self.dialog.set_attribute("aria-hidden", "true");
            }
            DialogEffect::SetExpanded(expanded) => {
                dom::set_bool_attr(&self.trigger, "aria-expanded", expanded);
            }
            DialogEffect::FocusClose => dom::focus(&self.close),
            DialogEffect::FocusTrigger => dom::focus(&self.trigger),
            DialogEffect::PreventDefault | DialogEffect::RenderQr { .. } => {}
        }
    }

    /// True when the event's composed path crosses the trigger or the dialog.
    /// Plain ancestry would not work: events leaving the shadow root are
    /// retargeted to the host.
    pub(crate) fn owns_event(&self, event: &Event) -> bool {
        let path = event.composed_path();
        path.includes(self.dialog.as_ref(), 0) || path.includes(self.trigger.as_ref(), 0)
    }

    pub(crate) fn qr_container(&self) -> &Element {
        &self.qr
    }

    pub(crate) fn clear_qr(&self) {
        self.qr.set_inner_html("");
    }

    pub(crate) fn show_qr_message(&self, text: &str) {
        self.qr.set_inner_html(&markup::status_message(text, false));
    }

    pub(crate) fn show_feedback(&self, phase: FeedbackPhase) {
        self.copy.set_text_content(Some(phase.text()));
        let _ = self.copy.set_attribute("aria-label", phase.aria_label());
        let classes = self.copy.class_list();
        let _ = match phase {
            FeedbackPhase::Copied => classes.add_1(COPIED_CLASS),
            FeedbackPhase::Idle => classes.remove_1(COPIED_CLASS),
        };
    }
}

fn lookup(root: &ShadowRoot, id: &str) -> Result<Element, String> {
    dom::by_id(root, id).ok_or_else(|| format!("missing #{id} after render"))
}
