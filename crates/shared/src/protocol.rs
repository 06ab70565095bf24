//! Wire rows as returned by the roster endpoint, and their normalization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Entry, EntryId, MAX_VOLUME};

const ID_KEYS: &[&str] = &["Player", "player", "name", "id"];
const START_KEYS: &[&str] = &["StartSec", "startSec", "start_sec"];
const END_KEYS: &[&str] = &["EndSec", "endSec", "end_sec"];
const MEDIA_KEYS: &[&str] = &["EmbedURL", "mediaRef", "url"];
const TITLE_KEYS: &[&str] = &["Title", "title"];
const VOLUME_KEYS: &[&str] = &["Volume", "volume"];

/// A raw roster row. Field names and value types vary between sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(pub Map<String, Value>);

impl RawRow {
    fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    fn text(&self, keys: &[&str]) -> String {
        self.first(keys).and_then(value_as_text).unwrap_or_default()
    }

    fn number(&self, keys: &[&str]) -> Option<f64> {
        self.first(keys).and_then(value_as_number)
    }

    pub fn normalize(&self) -> Entry {
        Entry {
            id: EntryId::new(self.text(ID_KEYS)),
            start_sec: self.number(START_KEYS).unwrap_or(0.0),
            end_sec: self.number(END_KEYS),
            media_ref: self.text(MEDIA_KEYS),
            title: self.text(TITLE_KEYS),
            volume: self.number(VOLUME_KEYS).map(clamp_volume),
        }
    }
}

impl From<Map<String, Value>> for RawRow {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

pub fn normalize_rows(rows: &[RawRow]) -> Vec<Entry> {
    rows.iter().map(RawRow::normalize).collect()
}

/// Clamps to `0..=100` and floors. Non-finite input maps to 0.
pub fn clamp_volume(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.floor().clamp(0.0, f64::from(MAX_VOLUME)) as u8
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Empty strings count as absent so that `EndSec: ""` stays unset.
fn value_as_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Query parameters of the fire-and-forget volume persistence request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeUpdate {
    pub action: String,
    pub player: String,
    pub volume: u8,
}

impl VolumeUpdate {
    pub fn new(player: &EntryId, volume: u8) -> Self {
        Self {
            action: "setVolume".to_string(),
            player: player.to_string(),
            volume,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
