use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event, HtmlScriptElement};

use ln_tip_jar_core::{
    CachedQrProvider, ErrorCorrection, LocalFuture, QrCapability, QrError, QrProvider, QrRequest,
};

use crate::dom::{self, js_err};
use crate::settings;

const QR_GLOBAL: &str = "QRCode";

thread_local! {
    static SCRIPT_LOAD: RefCell<Option<Promise>> = const { RefCell::new(None) };
    static SHARED_PROVIDER: Rc<CachedQrProvider<Element, ScriptQrProvider>> =
        Rc::new(CachedQrProvider::new(ScriptQrProvider::new(settings::qr_script_url())));
}

/// Provider shared by every widget on the page. The library is fetched at
/// most once; a failed fetch is forgotten so a later build can try again.
pub(crate) fn shared_provider() -> Rc<dyn QrProvider<Element>> {
    SHARED_PROVIDER.with(|provider| provider.clone() as Rc<dyn QrProvider<Element>>)
}

/// Loads the qrcodejs library from a script URL unless the page already has
/// a `QRCode` global.
pub struct ScriptQrProvider {
    src: String,
}

impl ScriptQrProvider {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

impl QrProvider<Element> for ScriptQrProvider {
    fn acquire(&self) -> LocalFuture<'_, Result<Rc<dyn QrCapability<Element>>, QrError>> {
        Box::pin(async move {
            if let Some(ctor) = qr_constructor() {
                return Ok(Rc::new(QrCodeJs { ctor }) as Rc<dyn QrCapability<Element>>);
            }
            let load = shared_load(&self.src)?;
            if let Err(err) = JsFuture::from(load).await {
                SCRIPT_LOAD.with(|slot| slot.borrow_mut().take());
                return Err(QrError::Load(js_err(err)));
            }
            settings::debug("qr script loaded", self.src.as_str());
            qr_constructor()
                .map(|ctor| Rc::new(QrCodeJs { ctor }) as Rc<dyn QrCapability<Element>>)
                .ok_or_else(|| QrError::Load(format!("{QR_GLOBAL} missing after script load")))
        })
    }
}

fn qr_constructor() -> Option<Function> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(QR_GLOBAL))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn shared_load(src: &str) -> Result<Promise, QrError> {
    SCRIPT_LOAD.with(|slot| {
        if let Some(pending) = slot.borrow().clone() {
            return Ok(pending);
        }
        let promise = inject_script(src)?;
        *slot.borrow_mut() = Some(promise.clone());
        Ok(promise)
    })
}

fn inject_script(src: &str) -> Result<Promise, QrError> {
    let document = dom::document().ok_or_else(|| QrError::Load("missing document".to_string()))?;
    let script = document
        .create_element("script")
        .map_err(|err| QrError::Load(js_err(err)))?
        .dyn_into::<HtmlScriptElement>()
        .map_err(|_| QrError::Load("script element cast failed".to_string()))?;
    script.set_src(src);
    script.set_async(true);

    let promise = Promise::new(&mut |resolve, reject| {
        let on_load = Closure::once(move |_event: Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let failed = script.clone();
        let url = src.to_string();
        let on_error = Closure::once(move |_event: Event| {
            failed.remove();
            let _ = reject.call1(
                &JsValue::NULL,
                &JsValue::from_str(&format!("failed to load {url}")),
            );
        });
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_load.forget();
        on_error.forget();
    });

    let parent: Element = match document.head() {
        Some(head) => head.into(),
        None => document
            .document_element()
            .ok_or_else(|| QrError::Load("missing document element".to_string()))?,
    };
    parent
        .append_child(&script)
        .map_err(|err| QrError::Load(js_err(err)))?;
    Ok(promise)
}

/// Drawing through the page's `QRCode` constructor.
struct QrCodeJs {
    ctor: Function,
}

impl QrCapability<Element> for QrCodeJs {
    fn draw(&self, target: &Element, request: &QrRequest) -> Result<(), QrError> {
        let options = Object::new();
        set_option(&options, "text", &JsValue::from_str(&request.payload))?;
        set_option(&options, "width", &JsValue::from_f64(request.width as f64))?;
        set_option(&options, "height", &JsValue::from_f64(request.height as f64))?;
        set_option(&options, "colorDark", &JsValue::from_str(&request.foreground))?;
        set_option(&options, "colorLight", &JsValue::from_str(&request.background))?;
        set_option(
            &options,
            "correctLevel",
            &correct_level(&self.ctor, request.error_correction),
        )?;
        let args = Array::of2(target.as_ref(), options.as_ref());
        Reflect::construct(&self.ctor, &args)
            .map(|_| ())
            .map_err(|err| QrError::Draw(js_err(err)))
    }
}

fn set_option(options: &Object, key: &str, value: &JsValue) -> Result<(), QrError> {
    Reflect::set(options, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|err| QrError::Draw(js_err(err)))
}

/// `QRCode.CorrectLevel[level]`, or the library's numeric code if the table
/// is missing.
fn correct_level(ctor: &Function, level: ErrorCorrection) -> JsValue {
    Reflect::get(ctor, &JsValue::from_str("CorrectLevel"))
        .ok()
        .filter(|levels| levels.is_object())
        .and_then(|levels| Reflect::get(&levels, &JsValue::from_str(level.as_str())).ok())
        .filter(|value| !value.is_undefined())
        .unwrap_or_else(|| JsValue::from_f64(level.qrcodejs_level() as f64))
}
