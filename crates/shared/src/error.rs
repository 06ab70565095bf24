use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load the lineup, please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    LoadFailed,
    Internal,
}

/// Error state observed by the UI. Nothing else crosses the component boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct UserFacingError {
    pub code: ErrorCode,
    pub message: String,
}

impl UserFacingError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn load_failed() -> Self {
        Self::new(ErrorCode::LoadFailed, LOAD_FAILED_MESSAGE)
    }
}
