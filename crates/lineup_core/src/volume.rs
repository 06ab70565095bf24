//! Volume changes fanned out to the player, every roster copy, and the
//! remote store.

use std::sync::Arc;

use shared::{domain::EntryId, protocol::clamp_volume};
use tracing::{debug, warn};

use crate::{
    adapter::PlayerAdapter, playback::PlaybackController, roster::RosterStore,
    transport::VolumeStore,
};

pub struct VolumeSync {
    store: Arc<dyn VolumeStore>,
}

impl VolumeSync {
    pub fn new(store: Arc<dyn VolumeStore>) -> Self {
        Self { store }
    }

    /// Clamps and floors `raw`, applies it, and returns the applied value.
    /// The local update is optimistic and never rolled back.
    pub fn set_volume<A: PlayerAdapter>(
        &self,
        raw: f64,
        playback: &mut PlaybackController<A>,
        roster: &mut RosterStore,
    ) -> u8 {
        let volume = clamp_volume(raw);
        playback.set_displayed_volume(volume);
        playback.forward_volume(volume);

        let Some(active) = playback.active_id() else {
            return volume;
        };
        let Some(id) = roster
            .find_committed(active.as_str())
            .map(|entry| entry.id.clone())
        else {
            return volume;
        };

        roster.patch_volume(&id, volume);
        self.persist(id, volume);
        volume
    }

    fn persist(&self, id: EntryId, volume: u8) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(entry = %id, "volume: no runtime, skipping persistence");
            return;
        };
        let store = Arc::clone(&self.store);
        runtime.spawn(async move {
            match store.save_volume(&id, volume).await {
                Ok(()) => debug!(entry = %id, volume, "volume: persisted"),
                Err(err) => warn!(entry = %id, volume, error = %err, "volume: persistence failed"),
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/volume_tests.rs"]
mod tests;
