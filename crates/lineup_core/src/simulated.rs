//! Wall-clock stand-ins for the hosted player, used by the CLI and tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::{sync::mpsc, time::Instant};
use tracing::debug;

use crate::{
    adapter::{AdapterError, AdapterEvent, LoadRequest, PlayerAdapter, PlayerState},
    bootstrap::{PlayerHost, ReadySignal},
};

#[derive(Debug, Clone, Default)]
struct Cursor {
    base: f64,
    since: Option<Instant>,
}

impl Cursor {
    fn position(&self) -> f64 {
        match self.since {
            Some(since) => self.base + since.elapsed().as_secs_f64(),
            None => self.base,
        }
    }

    fn run(&mut self) {
        if self.since.is_none() {
            self.since = Some(Instant::now());
        }
    }

    fn halt(&mut self) {
        self.base = self.position();
        self.since = None;
    }

    fn jump(&mut self, seconds: f64) {
        self.base = seconds;
        if self.since.is_some() {
            self.since = Some(Instant::now());
        }
    }
}

/// Plays nothing; tracks position against the clock and reports state
/// changes like the hosted player would.
#[derive(Debug)]
pub struct SimulatedPlayer {
    events: mpsc::UnboundedSender<AdapterEvent>,
    media_id: Option<String>,
    cursor: Cursor,
    volume: u8,
    muted: bool,
    destroyed: bool,
}

impl SimulatedPlayer {
    pub fn new(events: mpsc::UnboundedSender<AdapterEvent>) -> Self {
        Self {
            events,
            media_id: None,
            cursor: Cursor::default(),
            volume: 100,
            muted: true,
            destroyed: false,
        }
    }

    pub fn media_id(&self) -> Option<&str> {
        self.media_id.as_deref()
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        self.cursor.since.is_some()
    }

    fn ensure_alive(&self, command: &'static str) -> Result<(), AdapterError> {
        if self.destroyed {
            return Err(AdapterError::command(command, "player destroyed"));
        }
        Ok(())
    }

    fn emit(&self, state: PlayerState) {
        // A closed channel means nobody is listening anymore.
        let _ = self.events.send(AdapterEvent::StateChanged(state));
    }
}

impl PlayerAdapter for SimulatedPlayer {
    fn load(&mut self, request: &LoadRequest) -> Result<(), AdapterError> {
        self.ensure_alive("load")?;
        debug!(media_id = %request.media_id, start = request.start_seconds, "simulated: load");
        self.media_id = Some(request.media_id.clone());
        self.cursor = Cursor {
            base: request.start_seconds,
            since: None,
        };
        self.cursor.run();
        self.emit(PlayerState::Playing);
        Ok(())
    }

    fn play(&mut self) -> Result<(), AdapterError> {
        self.ensure_alive("play")?;
        self.cursor.run();
        self.emit(PlayerState::Playing);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AdapterError> {
        self.ensure_alive("pause")?;
        self.cursor.halt();
        self.emit(PlayerState::Paused);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AdapterError> {
        self.ensure_alive("stop")?;
        self.cursor = Cursor::default();
        self.emit(PlayerState::Unstarted);
        Ok(())
    }

    fn seek(&mut self, seconds: f64, _allow_seek_ahead: bool) -> Result<(), AdapterError> {
        self.ensure_alive("seek")?;
        self.cursor.jump(seconds);
        Ok(())
    }

    fn current_time(&self) -> Result<f64, AdapterError> {
        self.ensure_alive("current_time")?;
        Ok(self.cursor.position())
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), AdapterError> {
        self.ensure_alive("set_volume")?;
        self.volume = volume;
        Ok(())
    }

    fn unmute(&mut self) -> Result<(), AdapterError> {
        self.ensure_alive("unmute")?;
        self.muted = false;
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), AdapterError> {
        self.destroyed = true;
        self.cursor.halt();
        Ok(())
    }
}

/// Host with a controllable API signal and a set of mounted containers.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHost {
    api: ReadySignal,
    containers: Arc<Mutex<HashSet<String>>>,
}

impl SimulatedHost {
    /// API loaded and `container_id` mounted.
    pub fn ready(container_id: &str) -> Self {
        let host = Self {
            api: ReadySignal::resolved(),
            ..Self::default()
        };
        host.mount(container_id);
        host
    }

    pub fn api_signal(&self) -> &ReadySignal {
        &self.api
    }

    pub fn mount(&self, container_id: &str) {
        if let Ok(mut containers) = self.containers.lock() {
            containers.insert(container_id.to_string());
        }
    }
}

#[async_trait]
impl PlayerHost for SimulatedHost {
    type Adapter = SimulatedPlayer;

    async fn api_ready(&self) {
        self.api.wait().await;
    }

    fn container_available(&self, container_id: &str) -> bool {
        self.containers
            .lock()
            .map(|containers| containers.contains(container_id))
            .unwrap_or(false)
    }

    fn create_player(
        &self,
        container_id: &str,
        events: mpsc::UnboundedSender<AdapterEvent>,
    ) -> Result<SimulatedPlayer> {
        if !self.container_available(container_id) {
            return Err(anyhow!("container {container_id} is not mounted"));
        }
        let player = SimulatedPlayer::new(events.clone());
        events
            .send(AdapterEvent::Ready)
            .map_err(|_| anyhow!("player event channel closed"))?;
        Ok(player)
    }
}

#[cfg(test)]
#[path = "tests/simulated_tests.rs"]
mod tests;
