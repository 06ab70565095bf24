//! Test doubles shared by the unit tests of this crate.

use std::sync::{Arc, Mutex};

use shared::domain::Entry;

use crate::adapter::{AdapterError, LoadRequest, PlayerAdapter};

#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCall {
    Load(LoadRequest),
    Play,
    Pause,
    Stop,
    Seek(f64, bool),
    SetVolume(u8),
    Unmute,
    Destroy,
}

#[derive(Debug, Default)]
struct Shared {
    calls: Vec<AdapterCall>,
    current_time: f64,
}

/// Records every command. Clones share the same log, so a test keeps one
/// clone as a probe after handing the other to the controller.
#[derive(Debug, Clone)]
pub struct RecordingAdapter {
    shared: Arc<Mutex<Shared>>,
    pub stop_supported: bool,
    pub fail_stop: bool,
    pub fail_volume: bool,
    pub time_query: bool,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            stop_supported: true,
            fail_stop: false,
            fail_volume: false,
            time_query: true,
        }
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.shared.lock().expect("calls").calls.clone()
    }

    pub fn clear_calls(&self) {
        self.shared.lock().expect("calls").calls.clear();
    }

    pub fn set_current_time(&self, seconds: f64) {
        self.shared.lock().expect("time").current_time = seconds;
    }

    pub fn loads(&self) -> Vec<LoadRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                AdapterCall::Load(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: AdapterCall) {
        self.shared.lock().expect("calls").calls.push(call);
    }
}

impl PlayerAdapter for RecordingAdapter {
    fn load(&mut self, request: &LoadRequest) -> Result<(), AdapterError> {
        self.record(AdapterCall::Load(request.clone()));
        Ok(())
    }

    fn play(&mut self) -> Result<(), AdapterError> {
        self.record(AdapterCall::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AdapterError> {
        self.record(AdapterCall::Pause);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AdapterError> {
        if !self.stop_supported {
            return Err(AdapterError::Unsupported("stop"));
        }
        self.record(AdapterCall::Stop);
        if self.fail_stop {
            return Err(AdapterError::command("stop", "player detached"));
        }
        Ok(())
    }

    fn seek(&mut self, seconds: f64, allow_seek_ahead: bool) -> Result<(), AdapterError> {
        self.record(AdapterCall::Seek(seconds, allow_seek_ahead));
        Ok(())
    }

    fn supports_current_time(&self) -> bool {
        self.time_query
    }

    fn current_time(&self) -> Result<f64, AdapterError> {
        Ok(self.shared.lock().expect("time").current_time)
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), AdapterError> {
        self.record(AdapterCall::SetVolume(volume));
        if self.fail_volume {
            return Err(AdapterError::command("set_volume", "blocked"));
        }
        Ok(())
    }

    fn unmute(&mut self) -> Result<(), AdapterError> {
        self.record(AdapterCall::Unmute);
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), AdapterError> {
        self.record(AdapterCall::Destroy);
        Ok(())
    }
}

pub fn entry(id: &str) -> Entry {
    Entry::new(id, format!("https://www.youtube.com/embed/VID{id}00?x=1"))
}

pub fn entries(ids: &[&str]) -> Vec<Entry> {
    ids.iter().map(|id| entry(id)).collect()
}
