use crate::LocalFuture;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard api unavailable")]
    Unavailable,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
    #[error("copy command failed: {0}")]
    Command(String),
}

/// Platform clipboard as the copy helper sees it.
pub trait ClipboardAccess {
    /// Asynchronous write, or `None` when the platform has no such API.
    fn write_text(&self, text: &str) -> Option<LocalFuture<'static, Result<(), ClipboardError>>>;

    /// Synchronous selection-based copy.
    fn legacy_copy(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyRoute {
    Clipboard,
    Legacy,
}

/// How a copy went. Feedback is shown for every report, including a legacy
/// copy whose command failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyReport {
    pub route: CopyRoute,
    pub primary_error: Option<ClipboardError>,
    pub legacy_error: Option<ClipboardError>,
}

pub async fn copy_text<C>(clipboard: &C, text: &str) -> CopyReport
where
    C: ClipboardAccess + ?Sized,
{
    let primary_error = match clipboard.write_text(text) {
        Some(write) => match write.await {
            Ok(()) => {
                return CopyReport {
                    route: CopyRoute::Clipboard,
                    primary_error: None,
                    legacy_error: None,
                }
            }
            Err(err) => err,
        },
        None => ClipboardError::Unavailable,
    };
    CopyReport {
        route: CopyRoute::Legacy,
        primary_error: Some(primary_error),
        legacy_error: clipboard.legacy_copy(text).err(),
    }
}
