//! Media id extraction from the reference strings roster rows carry.

use std::sync::LazyLock;

use regex::Regex;

// Tried in order: embedded player, `v=` query parameter, short link.
static MEDIA_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"/embed/([A-Za-z0-9_-]{6,})").expect("embed pattern"),
        Regex::new(r"[?&]v=([A-Za-z0-9_-]{6,})").expect("query pattern"),
        Regex::new(r"youtu\.be/([A-Za-z0-9_-]{6,})").expect("short link pattern"),
    ]
});

pub fn resolve_media_id(media_ref: &str) -> Option<String> {
    if media_ref.is_empty() {
        return None;
    }
    MEDIA_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(media_ref)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

#[cfg(test)]
#[path = "tests/media_tests.rs"]
mod tests;
