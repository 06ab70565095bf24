//! Segment-loop playback over a single external player.

use std::time::Duration;

use shared::domain::{Entry, EntryId};
use tracing::{debug, info, warn};

use crate::{
    adapter::{AdapterError, AdapterEvent, LoadRequest, PlayerAdapter, PlayerState},
    loop_guard::LoopGuard,
    media::resolve_media_id,
    platform::VolumeControl,
};

pub const LOOP_GUARD_INTERVAL: Duration = Duration::from_millis(200);
pub const LOOP_GUARD_LEAD_SECONDS: f64 = 0.3;
pub const HOST_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub guard_interval: Duration,
    /// How far ahead of the segment end the guard jumps back.
    pub guard_lead_seconds: f64,
    pub host_poll_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            guard_interval: LOOP_GUARD_INTERVAL,
            guard_lead_seconds: LOOP_GUARD_LEAD_SECONDS,
            host_poll_interval: HOST_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The adapter was not ready; the entry now sits in the pending slot.
    Queued,
    Started { media_id: String },
    /// No media id could be derived. Nothing changed.
    Unresolvable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Queued,
    Playing,
    Paused,
}

pub struct PlaybackController<A: PlayerAdapter> {
    config: PlaybackConfig,
    adapter: Option<A>,
    ready: bool,
    pending: Option<Entry>,
    active_id: Option<EntryId>,
    paused: bool,
    seg_start: f64,
    seg_end: Option<f64>,
    volume: u8,
    volume_control: VolumeControl,
    guard: LoopGuard,
}

fn log_failure(command: &'static str, result: Result<(), AdapterError>) {
    if let Err(err) = result {
        warn!(command, error = %err, "playback: adapter command failed");
    }
}

impl<A: PlayerAdapter> PlaybackController<A> {
    pub fn new(config: PlaybackConfig, volume_control: VolumeControl) -> Self {
        let guard = LoopGuard::new(config.guard_interval);
        Self {
            config,
            adapter: None,
            ready: false,
            pending: None,
            active_id: None,
            paused: false,
            seg_start: 0.0,
            seg_end: None,
            volume: 0,
            volume_control,
            guard,
        }
    }

    /// Hands over the constructed adapter. Commands still queue until the
    /// adapter reports ready; if the ready notification already arrived,
    /// the pending entry plays now.
    pub fn attach(&mut self, adapter: A) -> Option<PlayOutcome> {
        self.adapter = Some(adapter);
        if !self.ready {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.play(&pending))
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn adapter(&self) -> Option<&A> {
        self.adapter.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready && self.adapter.is_some()
    }

    pub fn pending(&self) -> Option<&Entry> {
        self.pending.as_ref()
    }

    pub fn active_id(&self) -> Option<&EntryId> {
        self.active_id.as_ref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_id.as_ref().is_some_and(|active| active.as_str() == id)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn volume_control(&self) -> VolumeControl {
        self.volume_control
    }

    pub fn segment(&self) -> (f64, Option<f64>) {
        (self.seg_start, self.seg_end)
    }

    pub fn guard(&self) -> &LoopGuard {
        &self.guard
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (&self.active_id, self.paused) {
            (Some(_), true) => PlaybackPhase::Paused,
            (Some(_), false) => PlaybackPhase::Playing,
            (None, _) if self.pending.is_some() => PlaybackPhase::Queued,
            (None, _) => PlaybackPhase::Idle,
        }
    }

    pub fn on_adapter_ready(&mut self) -> Option<PlayOutcome> {
        self.ready = true;
        info!("playback: player ready");
        let pending = self.pending.take()?;
        Some(self.play(&pending))
    }

    pub fn on_adapter_event(&mut self, event: AdapterEvent) -> Option<PlayOutcome> {
        match event {
            AdapterEvent::Ready => self.on_adapter_ready(),
            AdapterEvent::StateChanged(PlayerState::Ended) => {
                self.seek_to_start();
                None
            }
            AdapterEvent::StateChanged(state) => {
                debug!(?state, "playback: adapter state changed");
                None
            }
        }
    }

    pub fn play(&mut self, entry: &Entry) -> PlayOutcome {
        if !self.is_ready() {
            debug!(entry = %entry.id, "playback: adapter not ready, queueing");
            self.pending = Some(entry.clone());
            return PlayOutcome::Queued;
        }

        let Some(media_id) = resolve_media_id(&entry.media_ref) else {
            warn!(entry = %entry.id, media_ref = %entry.media_ref, "playback: no media id");
            return PlayOutcome::Unresolvable;
        };

        self.seg_start = entry.start_sec;
        self.seg_end = entry.end_sec;
        let request = LoadRequest {
            media_id: media_id.clone(),
            start_seconds: self.seg_start,
            end_seconds: self.seg_end,
        };
        if let Some(adapter) = self.adapter.as_mut() {
            log_failure("load", adapter.load(&request));
        }

        self.start_guard();
        self.active_id = Some(entry.id.clone());
        self.paused = false;
        self.apply_volume_for(entry);

        info!(
            entry = %entry.id,
            media_id = %media_id,
            start = self.seg_start,
            end = ?self.seg_end,
            "playback: started"
        );
        PlayOutcome::Started { media_id }
    }

    pub fn pause(&mut self) {
        if let Some(adapter) = self.adapter.as_mut() {
            log_failure("pause", adapter.pause());
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if let Some(adapter) = self.adapter.as_mut() {
            log_failure("play", adapter.play());
        }
        self.paused = false;
    }

    /// Single UI entry point: pause/resume the active entry, play any other.
    pub fn toggle(&mut self, entry: &Entry) -> Option<PlayOutcome> {
        if self.is_active(entry.id.as_str()) {
            if self.paused {
                self.resume();
            } else {
                self.pause();
            }
            None
        } else {
            Some(self.play(entry))
        }
    }

    /// Safe to call when idle.
    pub fn stop(&mut self) {
        if let Some(adapter) = self.adapter.as_mut() {
            let result = match adapter.stop() {
                Err(AdapterError::Unsupported(_)) => adapter.pause(),
                other => other,
            };
            log_failure("stop", result);
        }
        if let Some(id) = self.active_id.take() {
            info!(entry = %id, "playback: stopped");
        }
        self.paused = false;
        self.volume = 0;
        self.guard.clear();
    }

    /// Advances through `starters`, wrapping after the last entry.
    pub fn play_next(&mut self, starters: &[Entry]) -> Option<PlayOutcome> {
        if starters.is_empty() {
            return None;
        }
        let next = self
            .active_id
            .as_ref()
            .and_then(|active| starters.iter().position(|entry| &entry.id == active))
            .map_or(0, |idx| (idx + 1) % starters.len());
        Some(self.play(&starters[next]))
    }

    pub fn set_displayed_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    /// Best effort; errors are logged.
    pub fn forward_volume(&mut self, volume: u8) {
        if let Some(adapter) = self.adapter.as_mut() {
            log_failure("set_volume", adapter.set_volume(volume));
            log_failure("unmute", adapter.unmute());
        }
    }

    fn apply_volume_for(&mut self, entry: &Entry) {
        let volume = entry.effective_volume();
        self.volume = volume;
        if self.volume_control.commands_adapter() {
            self.forward_volume(volume);
        }
    }

    fn start_guard(&mut self) {
        self.guard.clear();
        let can_poll = self
            .adapter
            .as_ref()
            .is_some_and(|adapter| adapter.supports_current_time());
        if self.seg_end.is_some() && can_poll {
            self.guard.start();
        }
    }

    /// Resolves on the next guard tick; pending forever while no guard runs.
    pub async fn guard_tick(&mut self) {
        self.guard.tick().await;
    }

    /// Returns true when the segment end was reached and playback jumped back.
    pub fn on_guard_tick(&mut self) -> bool {
        let Some(end) = self.seg_end else {
            return false;
        };
        let Some(adapter) = self.adapter.as_ref() else {
            return false;
        };
        match adapter.current_time() {
            Ok(now) if now >= end - self.config.guard_lead_seconds => {
                self.seek_to_start();
                true
            }
            Ok(_) => false,
            Err(err) => {
                debug!(error = %err, "playback: current time unavailable");
                false
            }
        }
    }

    fn seek_to_start(&mut self) {
        let start = self.seg_start;
        if let Some(adapter) = self.adapter.as_mut() {
            if let Err(err) = adapter.seek(start, true) {
                warn!(error = %err, "playback: seek to segment start failed");
                return;
            }
            log_failure("play", adapter.play());
        }
    }

    /// Clears the guard and destroys the adapter. Idempotent.
    pub fn teardown(&mut self) {
        self.guard.clear();
        self.pending = None;
        self.ready = false;
        if let Some(mut adapter) = self.adapter.take() {
            log_failure("destroy", adapter.destroy());
        }
    }
}

impl<A: PlayerAdapter> Drop for PlaybackController<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/playback_tests.rs"]
mod tests;
