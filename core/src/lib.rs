use std::future::Future;
use std::pin::Pin;

pub mod clipboard;
pub mod config;
pub mod dialog;
pub mod escape;
pub mod feedback;
pub mod markup;
pub mod qr;

pub use clipboard::{copy_text, ClipboardAccess, ClipboardError, CopyReport, CopyRoute};
pub use config::{Side, WidgetConfig, OBSERVED_ATTRIBUTES};
pub use dialog::{DialogEffect, DialogInput, DialogPhase, DialogState, QrProgress, Rebuild};
pub use escape::escape_html;
pub use feedback::{
    show_copied, CopyFeedback, FeedbackPhase, FeedbackTicket, FeedbackTimer, TimerGuard,
    COPY_FEEDBACK_MS,
};
pub use qr::{
    draw_qr, CachedQrProvider, ErrorCorrection, QrCapability, QrError, QrOutcome, QrProvider,
    QrRequest,
};

/// Boxed single-threaded future, the shape every async seam in the widget uses.
pub type LocalFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
