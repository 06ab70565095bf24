//! Detection of runtimes that silently block programmatic volume control.

use std::sync::LazyLock;

use regex::Regex;

static IOS_DEVICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"iPad|iPhone|iPod").expect("ios pattern"));
static NON_SAFARI_ENGINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)chrome|android|crios|fxios|edgios").expect("engine pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformInfo {
    pub user_agent: String,
    pub platform: String,
    pub max_touch_points: u32,
}

impl PlatformInfo {
    pub fn from_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }

    pub fn is_ios(&self) -> bool {
        IOS_DEVICE.is_match(&self.user_agent)
            || (self.platform == "MacIntel" && self.max_touch_points > 1)
    }

    /// Safari proper: a "safari" token with no other engine token before it.
    pub fn is_safari(&self) -> bool {
        let ua = &self.user_agent;
        let Some(safari_at) = ua.to_ascii_lowercase().find("safari") else {
            return false;
        };
        !NON_SAFARI_ENGINE.is_match(&ua[..safari_at])
    }
}

/// Whether the adapter may receive volume and unmute commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolumeControl {
    #[default]
    Full,
    /// Only the displayed volume changes. The adapter is never commanded.
    DisplayOnly,
}

impl VolumeControl {
    pub fn detect(info: &PlatformInfo) -> Self {
        if info.is_ios() && info.is_safari() {
            VolumeControl::DisplayOnly
        } else {
            VolumeControl::Full
        }
    }

    pub fn commands_adapter(self) -> bool {
        matches!(self, VolumeControl::Full)
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
