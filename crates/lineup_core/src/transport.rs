//! Roster fetch and volume persistence over HTTP.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use shared::{
    domain::EntryId,
    protocol::{RawRow, VolumeUpdate},
};
use tracing::debug;
use url::Url;

#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>>;
}

#[async_trait]
pub trait VolumeStore: Send + Sync {
    async fn save_volume(&self, id: &EntryId, volume: u8) -> Result<()>;
}

/// The roster endpoint: `GET` returns the rows, `GET ?action=setVolume`
/// stores a volume.
#[derive(Debug, Clone)]
pub struct HttpRosterApi {
    http: Client,
    endpoint: Url,
}

impl HttpRosterApi {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid roster endpoint: {endpoint}"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!("roster endpoint must use http or https"));
        }
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RosterSource for HttpRosterApi {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let rows: Vec<RawRow> = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("roster endpoint returned malformed rows")?;
        debug!(count = rows.len(), "transport: fetched roster rows");
        Ok(rows)
    }
}

#[async_trait]
impl VolumeStore for HttpRosterApi {
    async fn save_volume(&self, id: &EntryId, volume: u8) -> Result<()> {
        self.http
            .get(self.endpoint.clone())
            .query(&VolumeUpdate::new(id, volume))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(())
    }
}

/// Fixed rows, used when no endpoint is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticRosterSource {
    rows: Vec<RawRow>,
}

impl StaticRosterSource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    pub fn demo() -> Self {
        let embed = "https://www.youtube.com/embed/QImBolnTVH8?enablejsapi=1&playsinline=1&modestbranding=1&rel=0";
        let rows = [
            json!({
                "Player": "#1 Chang",
                "StartSec": 10,
                "EndSec": 30,
                "EmbedURL": embed,
                "Title": "Warmup Theme A",
                "Volume": 20
            }),
            json!({
                "Player": "#2 Lee",
                "StartSec": 0,
                "EndSec": "",
                "EmbedURL": embed,
                "Title": "Entrance Anthem",
                "Volume": 20
            }),
        ];
        Self::new(
            rows.into_iter()
                .filter_map(|value| serde_json::from_value(value).ok())
                .collect(),
        )
    }
}

#[async_trait]
impl RosterSource for StaticRosterSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}

/// Accepts and drops every volume update.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardVolumeStore;

#[async_trait]
impl VolumeStore for DiscardVolumeStore {
    async fn save_volume(&self, id: &EntryId, volume: u8) -> Result<()> {
        debug!(entry = %id, volume, "transport: volume not persisted (no endpoint)");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
