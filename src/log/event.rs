use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde::Serialize;

/// Log timestamps are local wall-clock time with second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between the title and url halves of a TAB detail.
pub const TAB_LABEL_SEPARATOR: &str = " | ";

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Start,
    Active,
    Inactive,
    App,
    Tab,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Start => "START",
            EventKind::Active => "ACTIVE",
            EventKind::Inactive => "INACTIVE",
            EventKind::App => "APP",
            EventKind::Tab => "TAB",
        }
    }
}

/// One state transition as it appears in the log. `detail` carries the app
/// name for `App`, `"title | url"` for `Tab`, and free text otherwise.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct EventRecord {
    #[serde(with = "timestamp_ser")]
    pub timestamp: NaiveDateTime,
    pub kind: EventKind,
    pub detail: String,
}

impl EventRecord {
    pub fn new(timestamp: NaiveDateTime, kind: EventKind, detail: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind,
            detail: detail.into(),
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

mod timestamp_ser {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
