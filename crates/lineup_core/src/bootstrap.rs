//! One-time player construction: wait for the host API, wait for the
//! container element, then build the adapter.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::{
    adapter::{AdapterEvent, PlayerAdapter},
    error::LineupError,
    loop_guard::MIN_PERIOD,
};

/// Resolve-once signal. Later `resolve` calls are no-ops and every waiter,
/// early or late, observes the same resolution.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadySignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn resolved() -> Self {
        let signal = Self::new();
        signal.resolve();
        signal
    }

    pub fn resolve(&self) {
        self.tx.send_if_modified(|ready| {
            let changed = !*ready;
            *ready = true;
            changed
        });
    }

    pub fn is_resolved(&self) -> bool {
        *self.tx.borrow()
    }

    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

/// The environment that hosts the third-party player.
#[async_trait]
pub trait PlayerHost: Send + Sync {
    type Adapter: PlayerAdapter + 'static;

    /// Completes once the player API has loaded.
    async fn api_ready(&self);

    fn container_available(&self, container_id: &str) -> bool;

    /// Builds the adapter inside `container_id`. The adapter reports
    /// readiness and state changes through `events`.
    fn create_player(
        &self,
        container_id: &str,
        events: mpsc::UnboundedSender<AdapterEvent>,
    ) -> Result<Self::Adapter>;
}

pub async fn attach_player<H>(
    host: &H,
    container_id: &str,
    poll_interval: Duration,
    events: mpsc::UnboundedSender<AdapterEvent>,
) -> Result<H::Adapter, LineupError>
where
    H: PlayerHost + ?Sized,
{
    host.api_ready().await;
    debug!("bootstrap: player api ready");

    let mut poll = tokio::time::interval(poll_interval.max(MIN_PERIOD));
    loop {
        poll.tick().await;
        if host.container_available(container_id) {
            break;
        }
    }

    let adapter = host
        .create_player(container_id, events)
        .map_err(|err| LineupError::Bootstrap(format!("{err:#}")))?;
    info!(container = container_id, "bootstrap: player created");
    Ok(adapter)
}

#[cfg(test)]
#[path = "tests/bootstrap_tests.rs"]
mod tests;
