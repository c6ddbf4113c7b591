use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord, Node};

use crate::dom;
use crate::settings;
use crate::widget::{TipWidget, WidgetServices};

pub const TAG_NAME: &str = "ln-tip-jar";

struct PageObserver {
    _observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

thread_local! {
    static MOUNTED: RefCell<Vec<Rc<TipWidget>>> = const { RefCell::new(Vec::new()) };
    static PAGE_OBSERVER: RefCell<Option<PageObserver>> = const { RefCell::new(None) };
    static AUTO_MOUNT: Cell<bool> = const { Cell::new(false) };
}

/// Mounts a widget on `host`, or returns the one already mounted there. The
/// widget is detached once `host` is removed from the document.
pub fn mount_with(host: &Element, services: WidgetServices) -> Result<Rc<TipWidget>, JsValue> {
    if let Some(existing) = find(host) {
        return Ok(existing);
    }
    let widget = TipWidget::attach(host, services)?;
    MOUNTED.with(|mounted| mounted.borrow_mut().push(widget.clone()));
    if let Err(err) = watch_page() {
        gloo::console::warn!("ln-tip-jar: cannot watch for host removal", err);
    }
    Ok(widget)
}

/// Detaches and forgets the widget mounted on `host`. Returns whether one was.
pub fn unmount(host: &Element) -> bool {
    let removed = MOUNTED.with(|mounted| {
        let mut mounted = mounted.borrow_mut();
        let index = mounted.iter().position(|widget| widget.host() == host)?;
        Some(mounted.remove(index))
    });
    match removed {
        Some(widget) => {
            widget.detach();
            true
        }
        None => false,
    }
}

pub fn find(host: &Element) -> Option<Rc<TipWidget>> {
    MOUNTED.with(|mounted| {
        mounted
            .borrow()
            .iter()
            .find(|widget| widget.host() == host)
            .cloned()
    })
}

/// Mounts every `<ln-tip-jar>` in the document and keeps doing so as hosts
/// are added. Safe to call more than once.
pub(crate) fn install() -> Result<(), JsValue> {
    if AUTO_MOUNT.with(Cell::get) {
        return Ok(());
    }
    let document = dom::document().ok_or_else(|| JsValue::from_str("missing document"))?;
    let root = document
        .document_element()
        .ok_or_else(|| JsValue::from_str("missing document element"))?;
    watch_page()?;
    AUTO_MOUNT.with(|flag| flag.set(true));
    mount_within(&root);
    Ok(())
}

/// One `childList` observer on the document for all widgets. Removals are
/// always handled; additions only once auto-mounting is on.
fn watch_page() -> Result<(), JsValue> {
    if PAGE_OBSERVER.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }
    let document = dom::document().ok_or_else(|| JsValue::from_str("missing document"))?;
    let root = document
        .document_element()
        .ok_or_else(|| JsValue::from_str("missing document element"))?;

    let callback = Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
        handle_mutations(&records);
    }) as Box<dyn FnMut(Array, MutationObserver)>);
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(&root, &init)?;

    PAGE_OBSERVER.with(|slot| {
        *slot.borrow_mut() = Some(PageObserver {
            _observer: observer,
            _callback: callback,
        });
    });
    Ok(())
}

fn handle_mutations(records: &Array) {
    let auto_mount = AUTO_MOUNT.with(Cell::get);
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        let removed = record.removed_nodes();
        for index in 0..removed.length() {
            if let Some(node) = removed.get(index) {
                detach_removed(&node);
            }
        }
        if !auto_mount {
            continue;
        }
        let added = record.added_nodes();
        for index in 0..added.length() {
            if let Some(element) = added.get(index).and_then(|node| node.dyn_into::<Element>().ok()) {
                mount_within(&element);
            }
        }
    }
}

/// Detaches widgets whose host is `node` or inside it and has left the
/// document. A host that was only moved is still connected and stays.
fn detach_removed(node: &Node) {
    let gone: Vec<Element> = MOUNTED.with(|mounted| {
        mounted
            .borrow()
            .iter()
            .map(|widget| widget.host())
            .filter(|host| {
                let host_node: &Node = host;
                !host.is_connected() && node.contains(Some(host_node))
            })
            .cloned()
            .collect()
    });
    for host in gone {
        unmount(&host);
        settings::debug("host removed", host);
    }
}

/// Mounts `element` and any `<ln-tip-jar>` below it.
fn mount_within(element: &Element) {
    if !element.is_connected() {
        return;
    }
    if element.tag_name().eq_ignore_ascii_case(TAG_NAME) {
        mount_default(element);
    }
    if element.child_element_count() == 0 {
        return;
    }
    let Ok(hosts) = element.query_selector_all(TAG_NAME) else {
        return;
    };
    for index in 0..hosts.length() {
        if let Some(host) = hosts.get(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            mount_default(&host);
        }
    }
}

fn mount_default(host: &Element) {
    if find(host).is_some() {
        return;
    }
    match mount_with(host, WidgetServices::default()) {
        Ok(_) => settings::debug("mounted", host.clone()),
        Err(err) => gloo::console::warn!("ln-tip-jar: mount failed", err),
    }
}
