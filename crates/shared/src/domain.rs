use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Volume applied when an entry carries none.
pub const DEFAULT_VOLUME: u8 = 20;
pub const MAX_VOLUME: u8 = 100;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(EntryId);

/// One roster row: a participant bound to a segment of a hosted clip.
///
/// `id` doubles as the display name and is the only key used for lookups
/// and equality across every list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub start_sec: f64,
    /// `None` plays to the clip's natural end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_sec: Option<f64>,
    pub media_ref: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,
}

impl Entry {
    pub fn new(id: impl Into<String>, media_ref: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(id),
            start_sec: 0.0,
            end_sec: None,
            media_ref: media_ref.into(),
            title: String::new(),
            volume: None,
        }
    }

    pub fn with_segment(mut self, start_sec: f64, end_sec: Option<f64>) -> Self {
        self.start_sec = start_sec;
        self.end_sec = end_sec;
        self
    }

    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = Some(volume.min(MAX_VOLUME));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn effective_volume(&self) -> u8 {
        self.volume.unwrap_or(DEFAULT_VOLUME)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Select,
    List,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Select => Mode::List,
            Mode::List => Mode::Select,
        }
    }
}

/// The two committed rosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Starters,
    Bench,
}
