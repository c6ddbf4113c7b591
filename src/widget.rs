use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, KeyboardEvent, ShadowRoot, ShadowRootInit, ShadowRootMode};

use ln_tip_jar_core::{
    copy_text, draw_qr, show_copied, ClipboardAccess, ClipboardError, CopyFeedback, CopyRoute,
    DialogEffect, DialogInput, DialogState, FeedbackPhase, FeedbackTimer, QrOutcome, QrProvider,
    QrRequest, TimerGuard, WidgetConfig,
};

use crate::attributes::AttributeObserver;
use crate::clipboard::BrowserClipboard;
use crate::dom;
use crate::page_listeners::PageListeners;
use crate::qr_script;
use crate::settings;
use crate::timer::BrowserTimer;
use crate::view::{ViewHandlers, WidgetView};

/// The platform pieces a widget talks to. Tests swap in fakes.
#[derive(Clone)]
pub struct WidgetServices {
    pub qr: Rc<dyn QrProvider<Element>>,
    pub clipboard: Rc<dyn ClipboardAccess>,
    pub timer: Rc<dyn FeedbackTimer>,
}

impl Default for WidgetServices {
    fn default() -> Self {
        Self {
            qr: qr_script::shared_provider(),
            clipboard: Rc::new(BrowserClipboard),
            timer: Rc::new(BrowserTimer),
        }
    }
}

pub(crate) fn read_config(host: &Element) -> WidgetConfig {
    WidgetConfig::from_attributes(|name| host.get_attribute(name))
}

/// One mounted tip jar: the host element, its shadow content and all state
/// behind it.
pub struct TipWidget {
    weak_self: Weak<TipWidget>,
    host: Element,
    root: ShadowRoot,
    services: WidgetServices,
    config: RefCell<WidgetConfig>,
    state: RefCell<DialogState>,
    feedback: Rc<RefCell<CopyFeedback>>,
    view: RefCell<Option<WidgetView>>,
    page_listeners: RefCell<Option<PageListeners>>,
    attributes: RefCell<Option<AttributeObserver>>,
    focus_frame: RefCell<Option<AnimationFrame>>,
    feedback_timer: RefCell<Option<TimerGuard>>,
    attached: Cell<bool>,
}

impl TipWidget {
    /// Renders into `host`'s open shadow root (created if needed), reads the
    /// configuration attributes and starts listening to the page.
    pub fn attach(host: &Element, services: WidgetServices) -> Result<Rc<Self>, JsValue> {
        let root = match host.shadow_root() {
            Some(root) => root,
            None => host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?,
        };
        let document = dom::document().ok_or_else(|| JsValue::from_str("missing document"))?;
        let widget = Rc::new_cyclic(|weak| Self {
            weak_self: weak.clone(),
            host: host.clone(),
            root,
            services,
            config: RefCell::new(read_config(host)),
            state: RefCell::new(DialogState::new()),
            feedback: Rc::new(RefCell::new(CopyFeedback::new())),
            view: RefCell::new(None),
            page_listeners: RefCell::new(None),
            attributes: RefCell::new(None),
            focus_frame: RefCell::new(None),
            feedback_timer: RefCell::new(None),
            attached: Cell::new(true),
        });

        widget.render_view()?;
        *widget.page_listeners.borrow_mut() =
            Some(PageListeners::install(&document, Rc::downgrade(&widget)));
        let weak = Rc::downgrade(&widget);
        let observer = AttributeObserver::observe(host, move || {
            if let Some(widget) = weak.upgrade() {
                widget.refresh();
            }
        })?;
        *widget.attributes.borrow_mut() = Some(observer);

        settings::debug("attached", widget.config.borrow().side.as_str());
        Ok(widget)
    }

    pub fn host(&self) -> &Element {
        &self.host
    }

    pub fn config(&self) -> WidgetConfig {
        self.config.borrow().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open()
    }

    pub fn qr_rendered(&self) -> bool {
        self.state.borrow().qr_rendered()
    }

    pub fn open(&self) {
        if !self.attached.get() {
            return;
        }
        let effects = self.state.borrow_mut().open();
        self.apply_effects(effects, None);
    }

    pub fn close(&self) {
        if !self.attached.get() {
            return;
        }
        let effects = self.state.borrow_mut().close();
        self.apply_effects(effects, None);
    }

    pub fn toggle(&self) {
        self.dispatch(DialogInput::TriggerActivated, None);
    }

    /// Re-reads the host attributes.
    pub fn refresh(&self) {
        self.set_config(read_config(&self.host));
    }

    /// Replaces the configuration and rebuilds the content when it changed.
    /// An open dialog is reopened on the new content. Returns whether a
    /// rebuild happened.
    pub fn set_config(&self, config: WidgetConfig) -> bool {
        if !self.attached.get() || *self.config.borrow() == config {
            return false;
        }
        *self.config.borrow_mut() = config;
        let rebuild = self.state.borrow_mut().begin_rebuild();
        self.feedback.borrow_mut().reset();
        self.feedback_timer.borrow_mut().take();
        self.focus_frame.borrow_mut().take();
        if let Err(err) = self.render_view() {
            gloo::console::warn!("ln-tip-jar: rebuild failed", err);
            return true;
        }
        settings::debug("rebuilt", JsValue::from_f64(rebuild.build as f64));
        if rebuild.was_open {
            self.open();
        }
        true
    }

    /// Stops listening to the page and clears the shadow content. The dialog
    /// state is reset and a detached widget ignores every further call.
    pub fn detach(&self) {
        if !self.attached.replace(false) {
            return;
        }
        self.state.borrow_mut().begin_rebuild();
        self.page_listeners.borrow_mut().take();
        self.attributes.borrow_mut().take();
        self.focus_frame.borrow_mut().take();
        self.feedback_timer.borrow_mut().take();
        self.view.borrow_mut().take();
        self.root.set_inner_html("");
        settings::debug("detached", JsValue::UNDEFINED);
    }

    pub(crate) fn handle_key(&self, event: &KeyboardEvent) {
        if event.key() == "Escape" {
            let event: &Event = event.as_ref();
            self.dispatch(DialogInput::EscapePressed, Some(event));
        }
    }

    pub(crate) fn handle_page_click(&self, event: &Event) {
        if !self.is_open() {
            return;
        }
        let inside = match self.view.borrow().as_ref() {
            Some(view) => view.owns_event(event),
            None => return,
        };
        if !inside {
            self.dispatch(DialogInput::PointerOutside, Some(event));
        }
    }

    fn render_view(&self) -> Result<(), JsValue> {
        self.view.borrow_mut().take();
        let handlers = self.handlers();
        let view = WidgetView::build(&self.root, &self.config.borrow(), handlers)
            .map_err(|err| JsValue::from_str(&err))?;
        *self.view.borrow_mut() = Some(view);
        Ok(())
    }

    fn handlers(&self) -> ViewHandlers {
        let trigger = self.weak_self.clone();
        let close = self.weak_self.clone();
        let copy = self.weak_self.clone();
        ViewHandlers {
            on_trigger: Rc::new(move || {
                if let Some(widget) = trigger.upgrade() {
                    widget.dispatch(DialogInput::TriggerActivated, None);
                }
            }),
            on_close: Rc::new(move || {
                if let Some(widget) = close.upgrade() {
                    widget.dispatch(DialogInput::CloseActivated, None);
                }
            }),
            on_copy: Rc::new(move || {
                if let Some(widget) = copy.upgrade() {
                    widget.copy_address();
                }
            }),
        }
    }

    fn dispatch(&self, input: DialogInput, event: Option<&Event>) {
        if !self.attached.get() {
            return;
        }
        let effects = self.state.borrow_mut().handle(input);
        self.apply_effects(effects, event);
    }

    fn apply_effects(&self, effects: Vec<DialogEffect>, event: Option<&Event>) {
        for effect in effects {
            match effect {
                DialogEffect::PreventDefault => {
                    if let Some(event) = event {
                        event.prevent_default();
                    }
                }
                DialogEffect::FocusClose => self.schedule_close_focus(),
                DialogEffect::FocusTrigger => {
                    self.focus_frame.borrow_mut().take();
                    self.with_view(|view| view.apply(effect));
                }
                DialogEffect::RenderQr { build } => self.start_qr(build),
                DialogEffect::ShowDialog => {
                    settings::debug("open", JsValue::from_f64(self.state.borrow().build() as f64));
                    self.with_view(|view| view.apply(effect));
                }
                DialogEffect::HideDialog => {
                    settings::debug("close", JsValue::from_f64(self.state.borrow().build() as f64));
                    self.with_view(|view| view.apply(effect));
                }
                other => self.with_view(|view| view.apply(other)),
            }
        }
    }

    fn with_view(&self, f: impl FnOnce(&WidgetView)) {
        if let Some(view) = self.view.borrow().as_ref() {
            f(view);
        }
    }

    /// Focus moves once the dialog is laid out, on the next frame.
    fn schedule_close_focus(&self) {
        let weak = self.weak_self.clone();
        let frame = request_animation_frame(move |_timestamp| {
            let Some(widget) = weak.upgrade() else {
                return;
            };
            if widget.is_open() {
                widget.with_view(|view| view.apply(DialogEffect::FocusClose));
            }
        });
        *self.focus_frame.borrow_mut() = Some(frame);
    }

    fn start_qr(&self, build: u64) {
        let request = QrRequest::for_config(&self.config.borrow());
        let provider = self.services.qr.clone();
        let weak = self.weak_self.clone();
        spawn_local(async move {
            let target = weak.clone();
            let outcome = draw_qr(&*provider, request.as_ref(), move || {
                target.upgrade()?.qr_target(build)
            })
            .await;
            if let Some(widget) = weak.upgrade() {
                widget.finish_qr(build, outcome);
            }
        });
    }

    /// The container to draw into, emptied, if `build` is still current.
    fn qr_target(&self, build: u64) -> Option<Element> {
        if !self.attached.get() || self.state.borrow().build() != build {
            return None;
        }
        let view = self.view.borrow();
        let view = view.as_ref()?;
        view.clear_qr();
        Some(view.qr_container().clone())
    }

    fn finish_qr(&self, build: u64, outcome: QrOutcome) {
        let Some(progress) = outcome.progress() else {
            settings::debug("qr result dropped", JsValue::from_f64(build as f64));
            return;
        };
        if !self.attached.get() || !self.state.borrow_mut().finish_qr(build, progress) {
            return;
        }
        match &outcome {
            QrOutcome::LoadFailed(err) | QrOutcome::DrawFailed(err) => {
                gloo::console::warn!("ln-tip-jar:", err.to_string());
            }
            _ => {}
        }
        if let Some(message) = outcome.message() {
            self.with_view(|view| view.show_qr_message(message));
        }
    }

    fn copy_address(&self) {
        let text = self.config.borrow().address.clone();
        let build = self.state.borrow().build();
        let clipboard = self.services.clipboard.clone();
        let weak = self.weak_self.clone();
        spawn_local(async move {
            let report = copy_text(&*clipboard, &text).await;
            if report.route == CopyRoute::Legacy {
                match &report.primary_error {
                    Some(ClipboardError::Unavailable) => {
                        settings::debug("clipboard api unavailable", JsValue::UNDEFINED);
                    }
                    Some(err) => {
                        gloo::console::warn!("ln-tip-jar: clipboard write failed", err.to_string());
                    }
                    None => {}
                }
                if let Some(err) = &report.legacy_error {
                    gloo::console::warn!("ln-tip-jar: copy failed", err.to_string());
                }
            }
            if let Some(widget) = weak.upgrade() {
                widget.show_copy_feedback(build);
            }
        });
    }

    fn show_copy_feedback(&self, build: u64) {
        if !self.attached.get() || self.state.borrow().build() != build {
            return;
        }
        let weak = self.weak_self.clone();
        let present: Rc<dyn Fn(FeedbackPhase)> = Rc::new(move |phase: FeedbackPhase| {
            if let Some(widget) = weak.upgrade() {
                widget.with_view(|view| view.show_feedback(phase));
            }
        });
        let guard = show_copied(&self.feedback, &*self.services.timer, present);
        *self.feedback_timer.borrow_mut() = Some(guard);
    }
}
