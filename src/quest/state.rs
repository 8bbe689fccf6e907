//! Quest State Tracking
//!
//! Runtime quest instances and the progress of their objectives.

use serde::{Deserialize, Serialize};

use super::definition::{ObjectiveKind, ObjectiveTarget, QuestDefinition, TimeCondition};

/// Status of a quest instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestState {
    /// Quest is in progress
    Active,
    /// All objectives met; the instance is about to leave the active list
    Completed,
    /// Reserved, nothing fails a quest yet
    Failed,
}

impl QuestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestState::Active => "active",
            QuestState::Completed => "completed",
            QuestState::Failed => "failed",
        }
    }
}

/// Progress on a single objective, owned by one quest instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveState {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObjectiveKind,
    pub target: ObjectiveTarget,
    pub count: u32,
    #[serde(default)]
    pub current: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_condition: Option<TimeCondition>,
}

impl ObjectiveState {
    /// Add progress, clamped to `count`. Returns true if this call completed it.
    pub fn add_progress(&mut self, amount: u32) -> bool {
        let was_complete = self.is_complete();
        self.current = self.current.saturating_add(amount).min(self.count);
        !was_complete && self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.count
    }

    /// Whether an event of `kind` aimed at `target` would count toward this objective
    pub fn accepts(&self, kind: ObjectiveKind, target: &str) -> bool {
        self.kind == kind && self.target.matches(target)
    }

    /// Restore `0 <= current <= count` after loading foreign data.
    /// Returns true if anything changed.
    pub fn clamp(&mut self) -> bool {
        if self.current > self.count {
            self.current = self.count;
            true
        } else {
            false
        }
    }
}

/// A single in-progress run of a quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestInstance {
    pub id: String,
    pub state: QuestState,
    pub objectives: Vec<ObjectiveState>,
    #[serde(default = "default_day")]
    pub start_day: u32,
    /// Wall-clock start, milliseconds since the Unix epoch
    #[serde(default)]
    pub start_time: i64,
}

fn default_day() -> u32 {
    1
}

impl QuestInstance {
    pub fn new(definition: &QuestDefinition, start_day: u32, start_time: i64) -> Self {
        Self {
            id: definition.id.clone(),
            state: QuestState::Active,
            objectives: definition.instantiate_objectives(),
            start_day,
            start_time,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.objectives.iter().all(ObjectiveState::is_complete)
    }

    pub fn completed_objectives(&self) -> usize {
        self.objectives.iter().filter(|o| o.is_complete()).count()
    }

    pub fn get_objective(&self, id: &str) -> Option<&ObjectiveState> {
        self.objectives.iter().find(|o| o.id == id)
    }

    pub fn progress(&self) -> QuestProgress {
        let completed = self.completed_objectives();
        let total = self.objectives.len();
        let percentage = if total == 0 {
            100.0
        } else {
            completed as f32 / total as f32 * 100.0
        };

        QuestProgress {
            completed,
            total,
            percentage,
        }
    }
}

/// Objective-level summary of an active quest
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuestProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: f32,
}
