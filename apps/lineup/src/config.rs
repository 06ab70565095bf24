use std::{collections::HashMap, fs, path::Path, time::Duration};

use lineup_core::PlaybackConfig;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "lineup.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Roster endpoint. `None` runs against the built-in demo roster.
    pub endpoint: Option<String>,
    pub container_id: String,
    /// Used once to decide whether volume commands reach the player.
    pub user_agent: Option<String>,
    pub guard_interval_ms: u64,
    pub host_poll_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            container_id: "yt-hidden".into(),
            user_agent: None,
            guard_interval_ms: 200,
            host_poll_ms: 50,
        }
    }
}

impl Settings {
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            guard_interval: Duration::from_millis(self.guard_interval_ms.max(1)),
            host_poll_interval: Duration::from_millis(self.host_poll_ms.max(1)),
            ..PlaybackConfig::default()
        }
    }
}

/// Defaults, then `path` if it exists, then the process environment.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config: ignoring unreadable file");
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn file_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(v) => Some(v.clone()),
        toml::Value::Integer(v) => Some(v.to_string()),
        _ => None,
    }
}

/// Timer periods must be non-zero; anything else keeps the current value.
fn interval_ms(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|ms| *ms > 0)
}

pub(crate) fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    let get = |key: &str| file_cfg.get(key).and_then(file_string);

    if let Some(v) = get("endpoint") {
        settings.endpoint = Some(v);
    }
    if let Some(v) = get("container_id") {
        settings.container_id = v;
    }
    if let Some(v) = get("user_agent") {
        settings.user_agent = Some(v);
    }
    if let Some(parsed) = get("guard_interval_ms").as_deref().and_then(interval_ms) {
        settings.guard_interval_ms = parsed;
    }
    if let Some(parsed) = get("host_poll_ms").as_deref().and_then(interval_ms) {
        settings.host_poll_ms = parsed;
    }
}

/// `LINEUP_*` first, `APP__*` second, so `APP__*` wins.
pub(crate) fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("LINEUP_ENDPOINT") {
        settings.endpoint = Some(v);
    }
    if let Some(v) = var("APP__ENDPOINT") {
        settings.endpoint = Some(v);
    }

    if let Some(v) = var("LINEUP_CONTAINER_ID") {
        settings.container_id = v;
    }
    if let Some(v) = var("APP__CONTAINER_ID") {
        settings.container_id = v;
    }

    if let Some(v) = var("LINEUP_USER_AGENT") {
        settings.user_agent = Some(v);
    }
    if let Some(v) = var("APP__USER_AGENT") {
        settings.user_agent = Some(v);
    }

    if let Some(parsed) = var("APP__GUARD_INTERVAL_MS").as_deref().and_then(interval_ms) {
        settings.guard_interval_ms = parsed;
    }
    if let Some(parsed) = var("APP__HOST_POLL_MS").as_deref().and_then(interval_ms) {
        settings.host_poll_ms = parsed;
    }

    if settings.endpoint.as_deref().is_some_and(|v| v.trim().is_empty()) {
        settings.endpoint = None;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
