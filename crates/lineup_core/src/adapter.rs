//! Capability interface of the external playback backend.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    #[error("adapter does not support {0}")]
    Unsupported(&'static str),
    #[error("adapter command {command} failed: {message}")]
    Command {
        command: &'static str,
        message: String,
    },
}

impl AdapterError {
    pub fn command(command: &'static str, message: impl Into<String>) -> Self {
        Self::Command {
            command,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub media_id: String,
    pub start_seconds: f64,
    pub end_seconds: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

/// Notifications pushed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterEvent {
    /// Fired once, when the backend accepts commands.
    Ready,
    StateChanged(PlayerState),
}

/// The only surface the controller drives. Optional capabilities default to
/// `Unsupported` so callers can fall back.
pub trait PlayerAdapter: Send {
    fn load(&mut self, request: &LoadRequest) -> Result<(), AdapterError>;
    fn play(&mut self) -> Result<(), AdapterError>;
    fn pause(&mut self) -> Result<(), AdapterError>;

    fn stop(&mut self) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("stop"))
    }

    fn seek(&mut self, seconds: f64, allow_seek_ahead: bool) -> Result<(), AdapterError>;

    fn supports_current_time(&self) -> bool {
        true
    }

    fn current_time(&self) -> Result<f64, AdapterError>;
    fn set_volume(&mut self, volume: u8) -> Result<(), AdapterError>;
    fn unmute(&mut self) -> Result<(), AdapterError>;

    fn destroy(&mut self) -> Result<(), AdapterError> {
        Ok(())
    }
}
