//! Quest log
//!
//! Append-only history of lifecycle events. Saves keep only the most recent
//! entries; older ones are dropped from the front.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entries persisted with a save unless configured otherwise
pub const DEFAULT_LOG_RETENTION: usize = 50;

const CHOICE_PREFIX: &str = "choice_";

/// What happened to a quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogEvent {
    Started,
    Completed,
    /// Became available to start; nothing is started automatically
    Unlocked,
    /// A branching choice was taken
    Choice(String),
    /// Anything else found in an older save
    Other(String),
}

impl From<String> for LogEvent {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "started" => LogEvent::Started,
            "completed" => LogEvent::Completed,
            "unlocked" => LogEvent::Unlocked,
            _ => match raw.strip_prefix(CHOICE_PREFIX) {
                Some(choice) => LogEvent::Choice(choice.to_string()),
                None => LogEvent::Other(raw),
            },
        }
    }
}

impl From<LogEvent> for String {
    fn from(event: LogEvent) -> Self {
        event.to_string()
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::Started => f.write_str("started"),
            LogEvent::Completed => f.write_str("completed"),
            LogEvent::Unlocked => f.write_str("unlocked"),
            LogEvent::Choice(choice) => write!(f, "{}{}", CHOICE_PREFIX, choice),
            LogEvent::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub quest_id: String,
    pub event: LogEvent,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// In-game day
    pub day: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestLog {
    entries: Vec<LogEntry>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, quest_id: &str, event: LogEvent, timestamp: i64, day: u32) {
        self.entries.push(LogEntry {
            quest_id: quest_id.to_string(),
            event,
            timestamp,
            day,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The last `limit` entries, oldest first
    pub fn recent(&self, limit: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    /// Entries concerning one quest
    pub fn for_quest<'a>(&'a self, quest_id: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries.iter().filter(move |e| e.quest_id == quest_id)
    }

    pub fn contains(&self, quest_id: &str, event: &LogEvent) -> bool {
        self.entries
            .iter()
            .any(|e| e.quest_id == quest_id && &e.event == event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
