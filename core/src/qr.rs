use std::cell::RefCell;
use std::rc::Rc;

use crate::config::WidgetConfig;
use crate::dialog::QrProgress;
use crate::LocalFuture;

pub const QR_SIZE_PX: u32 = 180;
pub const QR_FOREGROUND: &str = "#000000";
pub const QR_BACKGROUND: &str = "#ffffff";

pub const QR_UNCONFIGURED_TEXT: &str = "Set an address to show the QR code";
pub const QR_LOAD_FAILED_TEXT: &str = "Could not load the QR code";
pub const QR_DRAW_FAILED_TEXT: &str = "Error generating the QR code";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl ErrorCorrection {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCorrection::Low => "L",
            ErrorCorrection::Medium => "M",
            ErrorCorrection::Quartile => "Q",
            ErrorCorrection::High => "H",
        }
    }

    /// Numeric level as qrcodejs encodes it in `QRCode.CorrectLevel`.
    pub fn qrcodejs_level(self) -> u32 {
        match self {
            ErrorCorrection::Low => 1,
            ErrorCorrection::Medium => 0,
            ErrorCorrection::Quartile => 3,
            ErrorCorrection::High => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrRequest {
    pub payload: String,
    pub width: u32,
    pub height: u32,
    pub foreground: String,
    pub background: String,
    pub error_correction: ErrorCorrection,
}

impl QrRequest {
    pub fn for_config(config: &WidgetConfig) -> Option<Self> {
        let payload = config.payment_uri()?;
        Some(Self {
            payload,
            width: QR_SIZE_PX,
            height: QR_SIZE_PX,
            foreground: QR_FOREGROUND.to_string(),
            background: QR_BACKGROUND.to_string(),
            error_correction: ErrorCorrection::Medium,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QrError {
    #[error("qr library failed to load: {0}")]
    Load(String),
    #[error("qr draw failed: {0}")]
    Draw(String),
}

/// Something that can draw a QR code into a target of type `T`.
pub trait QrCapability<T> {
    fn draw(&self, target: &T, request: &QrRequest) -> Result<(), QrError>;
}

/// Hands out a drawing capability, loading it first if needed.
pub trait QrProvider<T: 'static> {
    fn acquire(&self) -> LocalFuture<'_, Result<Rc<dyn QrCapability<T>>, QrError>>;
}

/// Remembers the first capability the inner provider hands out. Failures are
/// not cached.
pub struct CachedQrProvider<T: 'static, P> {
    inner: P,
    cached: RefCell<Option<Rc<dyn QrCapability<T>>>>,
}

impl<T: 'static, P> CachedQrProvider<T, P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cached: RefCell::new(None),
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.borrow().is_some()
    }
}

impl<T: 'static, P: QrProvider<T>> QrProvider<T> for CachedQrProvider<T, P> {
    fn acquire(&self) -> LocalFuture<'_, Result<Rc<dyn QrCapability<T>>, QrError>> {
        Box::pin(async move {
            let cached = self.cached.borrow().clone();
            if let Some(capability) = cached {
                return Ok(capability);
            }
            let capability = self.inner.acquire().await?;
            *self.cached.borrow_mut() = Some(capability.clone());
            Ok(capability)
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QrOutcome {
    Drawn,
    Unconfigured,
    LoadFailed(QrError),
    DrawFailed(QrError),
    /// The target disappeared while the capability was loading.
    Stale,
}

impl QrOutcome {
    /// Inline text to show in place of the code, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            QrOutcome::Drawn | QrOutcome::Stale => None,
            QrOutcome::Unconfigured => Some(QR_UNCONFIGURED_TEXT),
            QrOutcome::LoadFailed(_) => Some(QR_LOAD_FAILED_TEXT),
            QrOutcome::DrawFailed(_) => Some(QR_DRAW_FAILED_TEXT),
        }
    }

    pub fn progress(&self) -> Option<QrProgress> {
        match self {
            QrOutcome::Drawn => Some(QrProgress::Rendered),
            QrOutcome::Unconfigured => Some(QrProgress::Unconfigured),
            QrOutcome::LoadFailed(_) | QrOutcome::DrawFailed(_) => Some(QrProgress::Failed),
            QrOutcome::Stale => None,
        }
    }
}

/// Acquires the capability and draws `request` into the target returned by
/// `resolve_target`. An absent request skips acquisition entirely.
/// `resolve_target` runs after the capability is ready so a rebuild during
/// the load yields [`QrOutcome::Stale`] instead of a write into a dead node.
pub async fn draw_qr<T, P, F>(provider: &P, request: Option<&QrRequest>, resolve_target: F) -> QrOutcome
where
    T: 'static,
    P: QrProvider<T> + ?Sized,
    F: FnOnce() -> Option<T>,
{
    let Some(request) = request else {
        return QrOutcome::Unconfigured;
    };
    let capability = match provider.acquire().await {
        Ok(capability) => capability,
        Err(err) => return QrOutcome::LoadFailed(err),
    };
    let Some(target) = resolve_target() else {
        return QrOutcome::Stale;
    };
    match capability.draw(&target, request) {
        Ok(()) => QrOutcome::Drawn,
        Err(err) => QrOutcome::DrawFailed(err),
    }
}
