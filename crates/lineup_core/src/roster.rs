//! Roster state: catalog, staged selection, committed starters and bench.
//!
//! Everything here is plain state. Operations that can invalidate the active
//! playback entry take its id and report a [`PlaybackImpact`]; the caller
//! owns the player and performs the stop.

use std::collections::HashSet;

use shared::domain::{Entry, EntryId, ListKind};
use tracing::debug;

use crate::staging::{SelectionStager, StagingSets};

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackImpact {
    Keep,
    Stop,
}

impl PlaybackImpact {
    pub fn requires_stop(self) -> bool {
        self == PlaybackImpact::Stop
    }
}

/// Result of the external drag primitive: move `from_index` of `from` to
/// `to_index` of `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub from: ListKind,
    pub to: ListKind,
    pub from_index: usize,
    pub to_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    catalog: Vec<Entry>,
    starters: Vec<Entry>,
    bench: Vec<Entry>,
    pub(crate) selected: Vec<Entry>,
    query: String,
    filtered_all: Vec<Entry>,
    filtered_selected: Vec<Entry>,
    pub(crate) staging: StagingSets,
}

fn contains(list: &[Entry], id: &str) -> bool {
    list.iter().any(|entry| entry.id.as_str() == id)
}

fn ids_of(list: &[Entry]) -> HashSet<&str> {
    list.iter().map(|entry| entry.id.as_str()).collect()
}

/// Same-list reorder; indices are clamped to the list bounds.
fn move_item(list: &mut Vec<Entry>, from: usize, to: usize) -> Option<&Entry> {
    if list.is_empty() {
        return None;
    }
    let last = list.len() - 1;
    let from = from.min(last);
    let to = to.min(last);
    let item = list.remove(from);
    list.insert(to, item);
    list.get(to)
}

/// Cross-list transfer; `to` may point one past the end of the target.
fn transfer_item(
    source: &mut Vec<Entry>,
    target: &mut Vec<Entry>,
    from: usize,
    to: usize,
) -> Option<Entry> {
    if source.is_empty() {
        return None;
    }
    let from = from.min(source.len() - 1);
    let item = source.remove(from);
    target.insert(to.min(target.len()), item.clone());
    Some(item)
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &[Entry] {
        &self.catalog
    }

    pub fn starters(&self) -> &[Entry] {
        &self.starters
    }

    pub fn bench(&self) -> &[Entry] {
        &self.bench
    }

    pub fn selected(&self) -> &[Entry] {
        &self.selected
    }

    pub fn filtered_all(&self) -> &[Entry] {
        &self.filtered_all
    }

    pub fn filtered_selected(&self) -> &[Entry] {
        &self.filtered_selected
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn staging(&self) -> &StagingSets {
        &self.staging
    }

    pub fn stager(&mut self) -> SelectionStager<'_> {
        SelectionStager::new(self)
    }

    pub fn list(&self, kind: ListKind) -> &[Entry] {
        match kind {
            ListKind::Starters => &self.starters,
            ListKind::Bench => &self.bench,
        }
    }

    /// True when the id sits in starters or bench.
    pub fn is_selected(&self, id: &str) -> bool {
        contains(&self.starters, id) || contains(&self.bench, id)
    }

    pub fn find_in_catalog(&self, id: &str) -> Option<&Entry> {
        self.catalog.iter().find(|entry| entry.id.as_str() == id)
    }

    /// Starters first, then bench.
    pub fn find_committed(&self, id: &str) -> Option<&Entry> {
        self.starters
            .iter()
            .chain(self.bench.iter())
            .find(|entry| entry.id.as_str() == id)
    }

    /// Any entry the UI may reference by id: committed rosters, then catalog.
    pub fn find(&self, id: &str) -> Option<&Entry> {
        self.find_committed(id).or_else(|| self.find_in_catalog(id))
    }

    pub fn display_of(&self, id: Option<&str>) -> String {
        let Some(id) = id else {
            return String::new();
        };
        self.find(id)
            .map(|entry| entry.id.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Replaces the catalog wholesale and rebuilds the staged selection.
    pub fn load(&mut self, entries: Vec<Entry>) {
        debug!(count = entries.len(), "roster: catalog loaded");
        self.catalog = entries;
        self.rebuild_select_from_lists();
    }

    /// `selected := catalog ∩ (starters ∪ bench)` in catalog order.
    pub fn rebuild_select_from_lists(&mut self) {
        let committed: HashSet<&str> = self
            .starters
            .iter()
            .chain(self.bench.iter())
            .map(|entry| entry.id.as_str())
            .collect();
        let selected = self
            .catalog
            .iter()
            .filter(|entry| committed.contains(entry.id.as_str()))
            .cloned()
            .collect();
        self.selected = selected;
        self.staging.clear();
        self.refresh_filters();
    }

    /// Commits the staged selection. Kept entries retain their roster and
    /// position; newly staged ones are appended to bench.
    pub fn apply_selection_to_lists(&mut self, active: Option<&EntryId>) -> PlaybackImpact {
        let target: HashSet<EntryId> = self.selected.iter().map(|e| e.id.clone()).collect();
        self.starters.retain(|entry| target.contains(&entry.id));
        self.bench.retain(|entry| target.contains(&entry.id));

        let impact = match active {
            Some(id) if !target.contains(id) => PlaybackImpact::Stop,
            _ => PlaybackImpact::Keep,
        };

        let present: HashSet<EntryId> = self
            .starters
            .iter()
            .chain(self.bench.iter())
            .map(|entry| entry.id.clone())
            .collect();
        let additions: Vec<Entry> = self
            .selected
            .iter()
            .filter(|entry| !present.contains(&entry.id))
            .cloned()
            .collect();
        self.bench.extend(additions);
        impact
    }

    /// List-mode quick add/remove.
    pub fn toggle_player(
        &mut self,
        entry: &Entry,
        checked: bool,
        active: Option<&EntryId>,
    ) -> PlaybackImpact {
        let id = entry.id.as_str();
        if checked {
            if !self.is_selected(id) {
                self.bench.push(entry.clone());
            }
            return PlaybackImpact::Keep;
        }

        let impact = if active == Some(&entry.id) {
            PlaybackImpact::Stop
        } else {
            PlaybackImpact::Keep
        };
        self.starters.retain(|e| e.id != entry.id);
        self.bench.retain(|e| e.id != entry.id);
        impact
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refresh_filters();
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Recomputes both filtered views and prunes the staging sets to them.
    pub fn refresh_filters(&mut self) {
        let needle = self.query.trim().to_lowercase();
        let hit = |entry: &Entry| {
            needle.is_empty() || entry.id.as_str().to_lowercase().contains(&needle)
        };

        let in_selected = ids_of(&self.selected);
        self.filtered_all = self
            .catalog
            .iter()
            .filter(|entry| !in_selected.contains(entry.id.as_str()))
            .filter(|entry| hit(*entry))
            .cloned()
            .collect();
        self.filtered_selected = self
            .selected
            .iter()
            .filter(|entry| hit(*entry))
            .cloned()
            .collect();

        let visible_left = ids_of(&self.filtered_all);
        let visible_right = ids_of(&self.filtered_selected);
        self.staging.left.retain(|id| visible_left.contains(id.as_str()));
        self.staging.right.retain(|id| visible_right.contains(id.as_str()));
    }

    /// Applies a reorder or transfer from the drag primitive.
    pub fn apply_drop(&mut self, event: DropEvent, active: Option<&EntryId>) -> PlaybackImpact {
        let moved = if event.from == event.to {
            let list = match event.to {
                ListKind::Starters => &mut self.starters,
                ListKind::Bench => &mut self.bench,
            };
            move_item(list, event.from_index, event.to_index).map(|entry| entry.id.clone())
        } else {
            let (source, target) = match event.from {
                ListKind::Starters => (&mut self.starters, &mut self.bench),
                ListKind::Bench => (&mut self.bench, &mut self.starters),
            };
            transfer_item(source, target, event.from_index, event.to_index).map(|entry| entry.id)
        };

        match (moved, active) {
            (Some(moved), Some(active)) if &moved == active => {
                if event.to == ListKind::Bench || !contains(&self.starters, active.as_str()) {
                    PlaybackImpact::Stop
                } else {
                    PlaybackImpact::Keep
                }
            }
            _ => PlaybackImpact::Keep,
        }
    }

    /// Writes `volume` into every copy of `id` in catalog, starters and bench.
    pub fn patch_volume(&mut self, id: &EntryId, volume: u8) {
        for list in [&mut self.starters, &mut self.bench, &mut self.catalog] {
            for entry in list.iter_mut().filter(|entry| &entry.id == id) {
                entry.volume = Some(volume);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/roster_tests.rs"]
mod tests;
