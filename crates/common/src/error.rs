//! Error types shared across Cogniscript crates.
//!
//! The per-frame math never returns these: absence and degenerate input
//! degrade to neutral values. Errors are for I/O edges (replay files,
//! detector backends, exports, configuration).

use std::path::PathBuf;

/// Top-level error type for Cogniscript operations.
#[derive(Debug, thiserror::Error)]
pub enum CogniscriptError {
    #[error("Hand pose error: {message}")]
    HandPose { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CogniscriptError.
pub type CogniscriptResult<T> = Result<T, CogniscriptError>;

impl CogniscriptError {
    pub fn hand_pose(msg: impl Into<String>) -> Self {
        Self::HandPose {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = CogniscriptError::detection("model unavailable");
        assert_eq!(err.to_string(), "Detection error: model unavailable");

        let err = CogniscriptError::FileNotFound {
            path: PathBuf::from("/tmp/missing.jsonl"),
        };
        assert!(err.to_string().contains("missing.jsonl"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: CogniscriptError = parse.unwrap_err().into();
        assert!(matches!(err, CogniscriptError::Json(_)));
    }
}
