//! Save data
//!
//! The quest section of a save blob. Loading is field-by-field: a key that is
//! missing or does not parse leaves the matching part of the state untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::log::LogEntry;
use super::state::QuestInstance;

pub const ACTIVE_QUESTS_KEY: &str = "activeQuests";
pub const COMPLETED_QUESTS_KEY: &str = "completedQuests";
pub const QUEST_LOG_KEY: &str = "questLog";

/// Serialized quest state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSaveData {
    pub active_quests: Vec<QuestInstance>,
    pub completed_quests: Vec<String>,
    pub quest_log: Vec<LogEntry>,
}

impl QuestSaveData {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The keys of a save document that were present and readable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSave {
    pub active_quests: Option<Vec<QuestInstance>>,
    pub completed_quests: Option<Vec<String>>,
    pub quest_log: Option<Vec<LogEntry>>,
}

impl PartialSave {
    pub fn from_value(value: &Value) -> Self {
        Self {
            active_quests: read_key(value, ACTIVE_QUESTS_KEY),
            completed_quests: read_key(value, COMPLETED_QUESTS_KEY),
            quest_log: read_key(value, QUEST_LOG_KEY),
        }
    }

    /// Parse a JSON document; anything that is not a JSON object yields an
    /// empty partial save.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!("Quest save is not valid JSON, keeping current state: {}", e);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active_quests.is_none() && self.completed_quests.is_none() && self.quest_log.is_none()
    }
}

impl From<QuestSaveData> for PartialSave {
    fn from(data: QuestSaveData) -> Self {
        Self {
            active_quests: Some(data.active_quests),
            completed_quests: Some(data.completed_quests),
            quest_log: Some(data.quest_log),
        }
    }
}

fn read_key<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Option<T> {
    let field = value.get(key)?;
    if field.is_null() {
        return None;
    }
    match serde_json::from_value(field.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Ignoring unreadable '{}' in quest save: {}", key, e);
            None
        }
    }
}
