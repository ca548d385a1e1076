//! Error types for forecast panel generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using PanelError.
pub type PanelResult<T> = Result<T, PanelError>;

/// Primary error type for the panel pipeline.
///
/// A forecast step that a model does not publish is not an error; the
/// resolver returns `None` for it and the unit is skipped.
#[derive(Debug, Error)]
pub enum PanelError {
    // === Per-unit errors (logged, unit skipped) ===
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Invalid issuance time: {0:?}")]
    InvalidIssuance(String),

    #[error("Overlay image not found: {}", .0.display())]
    MissingOverlay(PathBuf),

    #[error("Composite failed: {0}")]
    CompositeFailed(String),

    // === Startup errors (fatal) ===
    #[error("Background image not found: {}", .0.display())]
    MissingBackground(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // === Conversions ===
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PanelError {
    pub fn fetch(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        PanelError::FetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error aborts the whole run rather than a single unit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PanelError::MissingBackground(_) | PanelError::Config(_))
    }

    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PanelError::FetchFailed { .. } => "fetch_failed",
            PanelError::InvalidIssuance(_) => "invalid_issuance",
            PanelError::MissingOverlay(_) => "missing_overlay",
            PanelError::CompositeFailed(_) => "composite_failed",
            PanelError::MissingBackground(_) => "missing_background",
            PanelError::Config(_) => "config",
            PanelError::Image(_) => "image",
            PanelError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(PanelError::MissingBackground(PathBuf::from("bg.png")).is_fatal());
        assert!(PanelError::Config("bad".into()).is_fatal());
        assert!(!PanelError::fetch("http://x", "timeout").is_fatal());
        assert!(!PanelError::CompositeFailed("zero size".into()).is_fatal());
    }

    #[test]
    fn test_fetch_failed_message_carries_url() {
        let err = PanelError::fetch("https://example.com/a.png", "HTTP 404");
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/a.png"));
        assert!(msg.contains("HTTP 404"));
        assert_eq!(err.kind(), "fetch_failed");
    }
}
