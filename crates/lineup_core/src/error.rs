use shared::{domain::EntryId, error::UserFacingError};
use thiserror::Error;

use crate::adapter::AdapterError;

#[derive(Debug, Error)]
pub enum LineupError {
    #[error("roster load failed: {0}")]
    Load(String),
    #[error("unknown entry: {0}")]
    UnknownEntry(EntryId),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("player bootstrap failed: {0}")]
    Bootstrap(String),
}

impl LineupError {
    /// What the UI is allowed to see. Only load failures carry a message of
    /// their own; everything else is internal.
    pub fn user_facing(&self) -> UserFacingError {
        match self {
            LineupError::Load(_) => UserFacingError::load_failed(),
            other => UserFacingError::new(shared::error::ErrorCode::Internal, other.to_string()),
        }
    }
}
