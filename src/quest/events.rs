//! Quest Event Types
//!
//! Gameplay events that can advance quest objectives, and the report of what
//! an event changed.

use serde::{Deserialize, Serialize};

use super::definition::ObjectiveKind;

/// A gameplay event submitted by a producer (inventory, crafting, dialogue...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestEvent {
    pub kind: ObjectiveKind,
    /// Item, NPC, prop, area... depending on `kind`
    pub target: String,
    #[serde(default = "default_amount")]
    pub amount: u32,
}

fn default_amount() -> u32 {
    1
}

impl QuestEvent {
    pub fn new(kind: ObjectiveKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            amount: 1,
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Item picked up or foraged
    pub fn collect(item_id: impl Into<String>, count: u32) -> Self {
        Self::new(ObjectiveKind::Collect, item_id).with_amount(count)
    }

    pub fn interact(prop_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Interact, prop_id)
    }

    pub fn craft(recipe_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Craft, recipe_id)
    }

    pub fn dialogue(npc_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Dialogue, npc_id)
    }

    pub fn location(area_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Location, area_id)
    }

    pub fn give(npc_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Give, npc_id)
    }

    pub fn serve(item_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Serve, item_id)
    }

    pub fn activity(activity_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Activity, activity_id)
    }

    pub fn quest(quest_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Quest, quest_id)
    }

    pub fn puzzle(puzzle_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Puzzle, puzzle_id)
    }

    /// Event type as string (for logging)
    pub fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// One objective moved forward by an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveAdvance {
    pub quest_id: String,
    pub objective_id: String,
    pub current: u32,
    pub count: u32,
    /// Whether this event took the objective to its count
    pub objective_completed: bool,
}

/// Everything a single `submit_event` call changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventReport {
    pub advances: Vec<ObjectiveAdvance>,
    /// Quests that completed during this call, in completion order
    pub completed: Vec<String>,
}

impl EventReport {
    pub fn is_empty(&self) -> bool {
        self.advances.is_empty() && self.completed.is_empty()
    }

    pub fn advanced(&self, quest_id: &str) -> bool {
        self.advances.iter().any(|a| a.quest_id == quest_id)
    }
}
