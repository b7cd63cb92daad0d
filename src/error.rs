//! Error taxonomy for overlay operations.
//!
//! Three families reach the controller: transport failures, failures the
//! server reported, and input the user got wrong. The controller converts all
//! of them into [`Notice`](crate::controller::Notice)s; nothing here is meant
//! to bubble out of an editing session.

use thiserror::Error;

/// Overlay errors
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Network or transport-level failure (connect, timeout, TLS, decode).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Overlay not found: {0}")]
    NotFound(String),

    /// User input that could not be accepted (malformed video URL, bad file).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OverlayError {
    /// Short category label used in diagnostic logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) | Self::Io(_) => "transport",
            Self::Server { .. } | Self::NotFound(_) | Self::Json(_) => "server",
            Self::InvalidInput(_) => "input",
        }
    }
}

pub type Result<T> = std::result::Result<T, OverlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_includes_status_and_message() {
        let err = OverlayError::Server {
            status: 503,
            message: "Database not available. Check server logs.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Server error (503): Database not available. Check server logs."
        );
        assert_eq!(err.kind(), "server");
    }

    #[test]
    fn input_errors_are_classified_as_input() {
        let err = OverlayError::InvalidInput("Invalid YouTube URL or ID".into());
        assert_eq!(err.kind(), "input");
    }
}
