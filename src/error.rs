//! Error type for configuration and host integration
//!
//! The simulation itself never fails; only loading config and attaching to a
//! drawing surface can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForestError {
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("drawing surface not ready ({width}x{height})")]
    ViewportNotReady { width: f32, height: f32 },

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForestError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ForestError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
