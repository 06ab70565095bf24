//! Single-task event loop around a [`Lineup`].
//!
//! Commands, adapter notifications, guard ticks, the roster fetch and the
//! player bootstrap are multiplexed on one task, so each reaction runs to
//! completion before the next one starts.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use shared::{domain::EntryId, protocol::RawRow};
use tokio::{
    sync::{broadcast, mpsc},
    task::{JoinError, JoinHandle},
};
use tracing::{debug, error, info, warn};

use crate::{
    adapter::AdapterEvent,
    bootstrap::{attach_player, PlayerHost},
    error::LineupError,
    lineup::{Lineup, LineupSnapshot},
    roster::DropEvent,
    transport::RosterSource,
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum LineupCommand {
    Load,
    ToggleMode,
    SetQuery(String),
    ClearQuery,
    ToggleLeft(EntryId),
    ToggleRight(EntryId),
    SelectAllLeft,
    ClearLeft,
    ClearRight,
    MoveSelectedToRight,
    MoveSelectedToLeft,
    MoveAllToRight,
    MoveAllToLeft,
    TogglePlayer { id: EntryId, checked: bool },
    Drop(DropEvent),
    Toggle(EntryId),
    Next,
    Stop,
    SetVolume(f64),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineupEvent {
    Snapshot(LineupSnapshot),
}

/// Cloneable front door to a running [`LineupRuntime`].
#[derive(Debug, Clone)]
pub struct LineupHandle {
    commands: mpsc::UnboundedSender<LineupCommand>,
    events: broadcast::Sender<LineupEvent>,
}

impl LineupHandle {
    pub fn send(&self, command: LineupCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("lineup runtime has stopped"))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<LineupEvent> {
        self.events.subscribe()
    }
}

type FetchResult = Result<Vec<RawRow>>;
type AttachResult<H> = Result<<H as PlayerHost>::Adapter, LineupError>;

enum Step<H: PlayerHost> {
    Command(Option<LineupCommand>),
    Adapter(AdapterEvent),
    GuardTick,
    Fetched(Result<FetchResult, JoinError>),
    Attached(Result<AttachResult<H>, JoinError>),
}

/// Awaits the task in `slot`, then empties it. Pending forever when empty.
async fn join_slot<T>(slot: &mut Option<JoinHandle<T>>) -> Result<T, JoinError> {
    let Some(handle) = slot.as_mut() else {
        return std::future::pending().await;
    };
    let joined = handle.await;
    *slot = None;
    joined
}

pub struct LineupRuntime<H: PlayerHost + 'static> {
    lineup: Lineup<H::Adapter>,
    source: Arc<dyn RosterSource>,
    host: Arc<H>,
    container_id: String,
    commands: mpsc::UnboundedReceiver<LineupCommand>,
    events: broadcast::Sender<LineupEvent>,
    fetch: Option<JoinHandle<FetchResult>>,
    attach: Option<JoinHandle<AttachResult<H>>>,
}

impl<H: PlayerHost + 'static> LineupRuntime<H> {
    pub fn new(
        lineup: Lineup<H::Adapter>,
        source: Arc<dyn RosterSource>,
        host: Arc<H>,
        container_id: impl Into<String>,
    ) -> (Self, LineupHandle) {
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let handle = LineupHandle {
            commands: command_tx,
            events: events.clone(),
        };
        let runtime = Self {
            lineup,
            source,
            host,
            container_id: container_id.into(),
            commands,
            events,
            fetch: None,
            attach: None,
        };
        (runtime, handle)
    }

    /// Bootstraps the player, loads the roster, then serves commands until
    /// `Shutdown` or until every handle is dropped.
    pub async fn run(mut self) {
        let (adapter_tx, mut adapter_events) = mpsc::unbounded_channel();
        self.spawn_attach(adapter_tx);
        self.spawn_fetch();
        self.publish();

        loop {
            let step: Step<H> = tokio::select! {
                command = self.commands.recv() => Step::Command(command),
                Some(event) = adapter_events.recv() => Step::Adapter(event),
                _ = self.lineup.guard_tick() => Step::GuardTick,
                fetched = join_slot(&mut self.fetch) => Step::Fetched(fetched),
                attached = join_slot(&mut self.attach) => Step::Attached(attached),
            };

            match step {
                Step::Command(None) | Step::Command(Some(LineupCommand::Shutdown)) => break,
                Step::Command(Some(command)) => {
                    self.handle(command);
                    self.publish();
                }
                Step::Adapter(event) => {
                    let outcome = self.lineup.on_adapter_event(event);
                    if outcome.is_some() || event == AdapterEvent::Ready {
                        self.publish();
                    }
                }
                Step::GuardTick => {
                    if self.lineup.on_guard_tick() {
                        debug!("runtime: segment looped");
                    }
                }
                Step::Fetched(joined) => {
                    let fetched =
                        joined.unwrap_or_else(|err| Err(anyhow!("fetch task failed: {err}")));
                    // Already logged and reflected in the error state.
                    let _ = self.lineup.finish_load(fetched);
                    self.publish();
                }
                Step::Attached(Ok(Ok(adapter))) => {
                    if self.lineup.attach_adapter(adapter).is_some() {
                        self.publish();
                    }
                }
                Step::Attached(Ok(Err(err))) => {
                    error!(error = %err, "runtime: player bootstrap failed");
                }
                Step::Attached(Err(err)) => {
                    error!(error = %err, "runtime: bootstrap task failed");
                }
            }
        }

        self.shutdown();
    }

    fn handle(&mut self, command: LineupCommand) {
        debug!(?command, "runtime: command");
        let result = match command {
            LineupCommand::Load => {
                self.spawn_fetch();
                Ok(())
            }
            LineupCommand::ToggleMode => {
                self.lineup.toggle_mode();
                Ok(())
            }
            LineupCommand::SetQuery(query) => {
                self.lineup.set_query(query);
                Ok(())
            }
            LineupCommand::ClearQuery => {
                self.lineup.clear_query();
                Ok(())
            }
            LineupCommand::ToggleLeft(id) => {
                self.lineup.toggle_left(&id);
                Ok(())
            }
            LineupCommand::ToggleRight(id) => {
                self.lineup.toggle_right(&id);
                Ok(())
            }
            LineupCommand::SelectAllLeft => {
                self.lineup.select_all_left();
                Ok(())
            }
            LineupCommand::ClearLeft => {
                self.lineup.clear_left();
                Ok(())
            }
            LineupCommand::ClearRight => {
                self.lineup.clear_right();
                Ok(())
            }
            LineupCommand::MoveSelectedToRight => {
                self.lineup.move_selected_to_right();
                Ok(())
            }
            LineupCommand::MoveSelectedToLeft => {
                self.lineup.move_selected_to_left();
                Ok(())
            }
            LineupCommand::MoveAllToRight => {
                self.lineup.move_all_to_right();
                Ok(())
            }
            LineupCommand::MoveAllToLeft => {
                self.lineup.move_all_to_left();
                Ok(())
            }
            LineupCommand::TogglePlayer { id, checked } => {
                self.lineup.toggle_player(&id, checked)
            }
            LineupCommand::Drop(event) => {
                self.lineup.apply_drop(event);
                Ok(())
            }
            LineupCommand::Toggle(id) => self.lineup.toggle(&id).map(|_| ()),
            LineupCommand::Next => {
                self.lineup.play_next();
                Ok(())
            }
            LineupCommand::Stop => {
                self.lineup.stop();
                Ok(())
            }
            LineupCommand::SetVolume(raw) => {
                self.lineup.set_volume(raw);
                Ok(())
            }
            LineupCommand::Shutdown => Ok(()),
        };
        if let Err(err) = result {
            warn!(error = %err, "runtime: command rejected");
        }
    }

    fn spawn_fetch(&mut self) {
        self.lineup.begin_load();
        let source = Arc::clone(&self.source);
        let task = tokio::spawn(async move { source.fetch_rows().await });
        if let Some(previous) = self.fetch.replace(task) {
            previous.abort();
        }
    }

    fn spawn_attach(&mut self, events: mpsc::UnboundedSender<AdapterEvent>) {
        let host = Arc::clone(&self.host);
        let container_id = self.container_id.clone();
        let poll_interval = self.lineup.playback().config().host_poll_interval;
        self.attach = Some(tokio::spawn(async move {
            attach_player(host.as_ref(), &container_id, poll_interval, events).await
        }));
    }

    fn publish(&self) {
        // No subscribers is fine.
        let _ = self.events.send(LineupEvent::Snapshot(self.lineup.snapshot()));
    }

    fn shutdown(&mut self) {
        if let Some(task) = self.fetch.take() {
            task.abort();
        }
        if let Some(task) = self.attach.take() {
            task.abort();
        }
        self.lineup.teardown();
        self.publish();
        info!("runtime: stopped");
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
