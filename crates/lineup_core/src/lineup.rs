//! The lineup component: one owner for roster state and the playback
//! session. Every roster mutation that can invalidate the active entry
//! stops playback here, before returning.

use std::sync::Arc;

use serde::Serialize;
use shared::{
    domain::{Entry, EntryId, Mode},
    error::UserFacingError,
    protocol::{normalize_rows, RawRow},
};
use tracing::{error, info};

use crate::{
    adapter::{AdapterEvent, PlayerAdapter},
    error::LineupError,
    platform::VolumeControl,
    playback::{PlayOutcome, PlaybackConfig, PlaybackController},
    roster::{DropEvent, PlaybackImpact, RosterStore},
    transport::{RosterSource, VolumeStore},
    volume::VolumeSync,
};

/// Everything a view renders, by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSnapshot {
    pub mode: Mode,
    pub loading: bool,
    pub error: Option<UserFacingError>,
    pub query: String,
    pub starters: Vec<EntryId>,
    pub bench: Vec<EntryId>,
    pub selected: Vec<EntryId>,
    pub filtered_all: Vec<EntryId>,
    pub filtered_selected: Vec<EntryId>,
    pub staging_left: Vec<EntryId>,
    pub staging_right: Vec<EntryId>,
    pub active_id: Option<EntryId>,
    pub paused: bool,
    pub volume: u8,
}

fn ids(list: &[Entry]) -> Vec<EntryId> {
    list.iter().map(|entry| entry.id.clone()).collect()
}

fn sorted<'a>(set: impl Iterator<Item = &'a EntryId>) -> Vec<EntryId> {
    let mut ids: Vec<EntryId> = set.cloned().collect();
    ids.sort();
    ids
}

pub struct Lineup<A: PlayerAdapter> {
    mode: Mode,
    roster: RosterStore,
    playback: PlaybackController<A>,
    volume: VolumeSync,
    loading: bool,
    error: Option<UserFacingError>,
}

impl<A: PlayerAdapter> Lineup<A> {
    pub fn new(
        config: PlaybackConfig,
        volume_control: VolumeControl,
        volume_store: Arc<dyn VolumeStore>,
    ) -> Self {
        Self {
            mode: Mode::default(),
            roster: RosterStore::new(),
            playback: PlaybackController::new(config, volume_control),
            volume: VolumeSync::new(volume_store),
            loading: true,
            error: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn playback(&self) -> &PlaybackController<A> {
        &self.playback
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&UserFacingError> {
        self.error.as_ref()
    }

    /// Fetches and installs a fresh catalog. A failure leaves the rosters as
    /// they were and surfaces the load error; there is no retry.
    pub async fn load(&mut self, source: &dyn RosterSource) -> Result<usize, LineupError> {
        self.begin_load();
        let fetched = source.fetch_rows().await;
        self.finish_load(fetched)
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_load(
        &mut self,
        fetched: anyhow::Result<Vec<RawRow>>,
    ) -> Result<usize, LineupError> {
        self.loading = false;
        match fetched {
            Ok(rows) => {
                let entries = normalize_rows(&rows);
                let count = entries.len();
                self.roster.load(entries);
                info!(count, "lineup: roster loaded");
                Ok(count)
            }
            Err(err) => {
                let message = format!("{err:#}");
                error!(error = %message, "lineup: roster load failed");
                let err = LineupError::Load(message);
                self.error = Some(err.user_facing());
                Err(err)
            }
        }
    }

    pub fn attach_adapter(&mut self, adapter: A) -> Option<PlayOutcome> {
        self.playback.attach(adapter)
    }

    pub fn on_adapter_event(&mut self, event: AdapterEvent) -> Option<PlayOutcome> {
        self.playback.on_adapter_event(event)
    }

    pub async fn guard_tick(&mut self) {
        self.playback.guard_tick().await;
    }

    pub fn on_guard_tick(&mut self) -> bool {
        self.playback.on_guard_tick()
    }

    /// Select→list commits the staged selection; list→select rebuilds it
    /// from the committed rosters.
    pub fn toggle_mode(&mut self) -> Mode {
        let next = self.mode.toggled();
        match next {
            Mode::List => {
                let impact = self.roster.apply_selection_to_lists(self.playback.active_id());
                self.apply(impact);
                self.mode = next;
            }
            Mode::Select => {
                self.mode = next;
                self.roster.rebuild_select_from_lists();
            }
        }
        info!(mode = ?self.mode, "lineup: mode changed");
        self.mode
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.roster.set_query(query);
    }

    pub fn clear_query(&mut self) {
        self.roster.clear_query();
    }

    pub fn toggle_left(&mut self, id: &EntryId) {
        self.roster.stager().toggle_left(id);
    }

    pub fn toggle_right(&mut self, id: &EntryId) {
        self.roster.stager().toggle_right(id);
    }

    pub fn select_all_left(&mut self) {
        self.roster.stager().select_all_left();
    }

    pub fn clear_left(&mut self) {
        self.roster.stager().clear_left();
    }

    pub fn clear_right(&mut self) {
        self.roster.stager().clear_right();
    }

    pub fn move_selected_to_right(&mut self) {
        self.roster.stager().move_selected_to_right();
    }

    pub fn move_selected_to_left(&mut self) {
        let active = self.playback.active_id().cloned();
        let impact = self.roster.stager().move_selected_to_left(active.as_ref());
        self.apply(impact);
    }

    pub fn move_all_to_right(&mut self) {
        self.roster.stager().move_all_to_right();
    }

    pub fn move_all_to_left(&mut self) {
        let active = self.playback.active_id().cloned();
        let impact = self.roster.stager().move_all_to_left(active.as_ref());
        self.apply(impact);
    }

    /// List-mode checkbox. Looks the entry up in the catalog.
    pub fn toggle_player(&mut self, id: &EntryId, checked: bool) -> Result<(), LineupError> {
        let entry = self
            .roster
            .find_in_catalog(id.as_str())
            .cloned()
            .ok_or_else(|| LineupError::UnknownEntry(id.clone()))?;
        let impact = self
            .roster
            .toggle_player(&entry, checked, self.playback.active_id());
        self.apply(impact);
        Ok(())
    }

    pub fn apply_drop(&mut self, event: DropEvent) {
        let impact = self.roster.apply_drop(event, self.playback.active_id());
        self.apply(impact);
    }

    /// Play/pause button of a row.
    /// In list mode only committed entries are playable.
    pub fn toggle(&mut self, id: &EntryId) -> Result<Option<PlayOutcome>, LineupError> {
        let found = match self.mode {
            Mode::List => self.roster.find_committed(id.as_str()),
            Mode::Select => self.roster.find(id.as_str()),
        };
        let entry = found
            .cloned()
            .ok_or_else(|| LineupError::UnknownEntry(id.clone()))?;
        Ok(self.playback.toggle(&entry))
    }

    pub fn play_next(&mut self) -> Option<PlayOutcome> {
        self.playback.play_next(self.roster.starters())
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn set_volume(&mut self, raw: f64) -> u8 {
        self.volume.set_volume(raw, &mut self.playback, &mut self.roster)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.playback.is_active(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.roster.is_selected(id)
    }

    pub fn display_of(&self, id: Option<&str>) -> String {
        self.roster.display_of(id)
    }

    pub fn active_display(&self) -> String {
        self.display_of(self.playback.active_id().map(EntryId::as_str))
    }

    pub fn snapshot(&self) -> LineupSnapshot {
        let roster = &self.roster;
        LineupSnapshot {
            mode: self.mode,
            loading: self.loading,
            error: self.error.clone(),
            query: roster.query().to_string(),
            starters: ids(roster.starters()),
            bench: ids(roster.bench()),
            selected: ids(roster.selected()),
            filtered_all: ids(roster.filtered_all()),
            filtered_selected: ids(roster.filtered_selected()),
            staging_left: sorted(roster.staging().left.iter()),
            staging_right: sorted(roster.staging().right.iter()),
            active_id: self.playback.active_id().cloned(),
            paused: self.playback.is_paused(),
            volume: self.playback.volume(),
        }
    }

    /// Idempotent.
    pub fn teardown(&mut self) {
        self.playback.teardown();
    }

    fn apply(&mut self, impact: PlaybackImpact) {
        if impact.requires_stop() {
            self.playback.stop();
        }
    }
}

#[cfg(test)]
#[path = "tests/lineup_tests.rs"]
mod tests;
