//! Select-mode batch transfer between "not yet selected" and "selected".
//!
//! The left set marks entries of `filtered_all`, the right set entries of
//! `filtered_selected`. Only meaningful in select mode: the stop checks look
//! at `selected` membership, never at starters/bench.

use std::collections::HashSet;

use shared::domain::{Entry, EntryId};

use crate::roster::{PlaybackImpact, RosterStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingSets {
    pub left: HashSet<EntryId>,
    pub right: HashSet<EntryId>,
}

impl StagingSets {
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

fn flip(set: &mut HashSet<EntryId>, id: &EntryId) {
    if !set.remove(id) {
        set.insert(id.clone());
    }
}

fn contains_id(list: &[Entry], id: &EntryId) -> bool {
    list.iter().any(|entry| &entry.id == id)
}

/// Staging operations over a borrowed roster.
pub struct SelectionStager<'a> {
    roster: &'a mut RosterStore,
}

impl<'a> SelectionStager<'a> {
    pub fn new(roster: &'a mut RosterStore) -> Self {
        Self { roster }
    }

    pub fn toggle_left(&mut self, id: &EntryId) {
        flip(&mut self.roster.staging.left, id);
    }

    pub fn toggle_right(&mut self, id: &EntryId) {
        flip(&mut self.roster.staging.right, id);
    }

    pub fn select_all_left(&mut self) {
        self.roster.staging.left = self
            .roster
            .filtered_all()
            .iter()
            .map(|entry| entry.id.clone())
            .collect();
    }

    pub fn clear_left(&mut self) {
        self.roster.staging.left.clear();
    }

    pub fn clear_right(&mut self) {
        self.roster.staging.right.clear();
    }

    pub fn move_selected_to_right(&mut self) {
        if self.roster.staging.left.is_empty() {
            return;
        }
        let staged = &self.roster.staging.left;
        let additions: Vec<Entry> = self
            .roster
            .filtered_all()
            .iter()
            .filter(|entry| staged.contains(&entry.id))
            .cloned()
            .collect();
        self.append_selected(additions);
    }

    pub fn move_selected_to_left(&mut self, active: Option<&EntryId>) -> PlaybackImpact {
        if self.roster.staging.right.is_empty() {
            return PlaybackImpact::Keep;
        }
        let removed = std::mem::take(&mut self.roster.staging.right);
        self.remove_selected(&removed, active)
    }

    /// Mass transfer of everything the current filter shows on the left.
    pub fn move_all_to_right(&mut self) {
        let additions = self.roster.filtered_all().to_vec();
        if additions.is_empty() {
            return;
        }
        self.append_selected(additions);
    }

    pub fn move_all_to_left(&mut self, active: Option<&EntryId>) -> PlaybackImpact {
        let removed: HashSet<EntryId> = self
            .roster
            .filtered_selected()
            .iter()
            .map(|entry| entry.id.clone())
            .collect();
        self.roster.staging.right.clear();
        self.remove_selected(&removed, active)
    }

    fn append_selected(&mut self, additions: Vec<Entry>) {
        self.roster.selected.extend(additions);
        self.roster.staging.left.clear();
        self.roster.refresh_filters();
    }

    fn remove_selected(
        &mut self,
        removed: &HashSet<EntryId>,
        active: Option<&EntryId>,
    ) -> PlaybackImpact {
        let active_before = active.filter(|id| contains_id(self.roster.selected(), id));

        self.roster.selected.retain(|entry| !removed.contains(&entry.id));
        self.roster.refresh_filters();

        match active_before {
            Some(id) if !contains_id(self.roster.selected(), id) => PlaybackImpact::Stop,
            _ => PlaybackImpact::Keep,
        }
    }
}

#[cfg(test)]
#[path = "tests/staging_tests.rs"]
mod tests;
