pub mod adapter;
pub mod bootstrap;
pub mod error;
pub mod lineup;
mod loop_guard;
pub mod media;
pub mod platform;
pub mod playback;
pub mod roster;
pub mod runtime;
pub mod simulated;
pub mod staging;
pub mod transport;
pub mod volume;

pub use adapter::{AdapterError, AdapterEvent, LoadRequest, PlayerAdapter, PlayerState};
pub use bootstrap::{attach_player, PlayerHost, ReadySignal};
pub use error::LineupError;
pub use lineup::{Lineup, LineupSnapshot};
pub use loop_guard::LoopGuard;
pub use platform::{PlatformInfo, VolumeControl};
pub use playback::{PlayOutcome, PlaybackConfig, PlaybackController, PlaybackPhase};
pub use roster::{DropEvent, PlaybackImpact, RosterStore};
pub use runtime::{LineupCommand, LineupEvent, LineupHandle, LineupRuntime};
pub use simulated::{SimulatedHost, SimulatedPlayer};
pub use staging::{SelectionStager, StagingSets};
pub use transport::{
    DiscardVolumeStore, HttpRosterApi, RosterSource, StaticRosterSource, VolumeStore,
};
pub use volume::VolumeSync;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
