//! Quest Definition Structures
//!
//! Raw structures are deserialized from TOML quest tables and resolved into
//! the immutable definitions held by the catalog.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::state::ObjectiveState;

/// Giver used by quests that are triggered by the environment rather than an NPC
pub const ENVIRONMENT_GIVER: &str = "nature";

/// Prefix marking a wildcard objective target in authored content and saves
pub const WILDCARD_PREFIX: &str = "any_";

/// Language used when a localized string has no entry for the requested one
pub const FALLBACK_LANGUAGE: &str = "en";

// ============================================================================
// Raw Structures (as they appear in TOML)
// ============================================================================

/// Raw quest data as it appears in TOML. The quest ID is the table key.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    /// NPC that hands out the quest (`nature` for environment triggers)
    pub giver: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub objectives: Vec<RawObjective>,
    #[serde(default)]
    pub rewards: RewardBundle,
    #[serde(default)]
    pub unlocks: Vec<String>,
    #[serde(default)]
    pub repeatable: bool,
    /// Branching resolutions (choice ID -> alternate rewards)
    #[serde(default)]
    pub choices: BTreeMap<String, QuestChoice>,
}

/// Raw objective as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawObjective {
    pub id: String,
    #[serde(default)]
    pub desc: LocalizedText,
    #[serde(rename = "type")]
    pub objective_type: String,
    pub target: String,
    #[serde(default = "default_count")]
    pub count: u32,
    /// Item handed over (give objectives only)
    pub item: Option<String>,
    #[serde(default, alias = "timeCondition")]
    pub time_condition: Option<TimeCondition>,
}

fn default_count() -> u32 {
    1
}

// ============================================================================
// Resolved Structures
// ============================================================================

/// Quest category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    Main,
    Side,
    Daily,
}

impl QuestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestType::Main => "main",
            QuestType::Side => "side",
            QuestType::Daily => "daily",
        }
    }
}

/// Objective kinds, one per family of gameplay event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveKind {
    /// Item pickup or foraging
    Collect,
    /// Prop interaction, cleaning, reading
    Interact,
    /// Recipe completion
    Craft,
    /// NPC conversation resolution
    Dialogue,
    /// Area entry
    Location,
    /// Handing an item to an NPC
    Give,
    /// Serving a prepared item
    Serve,
    /// Timed minigame completion
    Activity,
    /// Another quest was satisfied
    Quest,
    /// Puzzle resolution
    Puzzle,
}

impl ObjectiveKind {
    pub const ALL: [ObjectiveKind; 10] = [
        ObjectiveKind::Collect,
        ObjectiveKind::Interact,
        ObjectiveKind::Craft,
        ObjectiveKind::Dialogue,
        ObjectiveKind::Location,
        ObjectiveKind::Give,
        ObjectiveKind::Serve,
        ObjectiveKind::Activity,
        ObjectiveKind::Quest,
        ObjectiveKind::Puzzle,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "collect" => Some(ObjectiveKind::Collect),
            "interact" => Some(ObjectiveKind::Interact),
            "craft" => Some(ObjectiveKind::Craft),
            "dialogue" => Some(ObjectiveKind::Dialogue),
            "location" => Some(ObjectiveKind::Location),
            "give" => Some(ObjectiveKind::Give),
            "serve" => Some(ObjectiveKind::Serve),
            "activity" => Some(ObjectiveKind::Activity),
            "quest" => Some(ObjectiveKind::Quest),
            "puzzle" => Some(ObjectiveKind::Puzzle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveKind::Collect => "collect",
            ObjectiveKind::Interact => "interact",
            ObjectiveKind::Craft => "craft",
            ObjectiveKind::Dialogue => "dialogue",
            ObjectiveKind::Location => "location",
            ObjectiveKind::Give => "give",
            ObjectiveKind::Serve => "serve",
            ObjectiveKind::Activity => "activity",
            ObjectiveKind::Quest => "quest",
            ObjectiveKind::Puzzle => "puzzle",
        }
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an objective is waiting for.
///
/// Authored content and save files spell wildcards as `any_<category>`; the
/// category is only a label, a wildcard accepts every target of its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectiveTarget {
    Specific(String),
    Any(String),
}

impl ObjectiveTarget {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(WILDCARD_PREFIX) {
            Some(category) => ObjectiveTarget::Any(category.to_string()),
            None => ObjectiveTarget::Specific(raw.to_string()),
        }
    }

    pub fn matches(&self, target: &str) -> bool {
        match self {
            ObjectiveTarget::Specific(key) => key == target,
            ObjectiveTarget::Any(_) => true,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, ObjectiveTarget::Any(_))
    }
}

impl From<String> for ObjectiveTarget {
    fn from(raw: String) -> Self {
        ObjectiveTarget::parse(&raw)
    }
}

impl From<ObjectiveTarget> for String {
    fn from(target: ObjectiveTarget) -> Self {
        target.to_string()
    }
}

impl fmt::Display for ObjectiveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveTarget::Specific(key) => f.write_str(key),
            ObjectiveTarget::Any(category) => write!(f, "{}{}", WILDCARD_PREFIX, category),
        }
    }
}

/// Day/night gate recorded on some objectives. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeCondition {
    Day,
    Night,
}

/// Text keyed by language code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    pub fn new(lang: &str, text: &str) -> Self {
        let mut map = BTreeMap::new();
        map.insert(lang.to_string(), text.to_string());
        Self(map)
    }

    /// Text in `lang`, falling back to English, then to any entry
    pub fn get(&self, lang: &str) -> &str {
        self.0
            .get(lang)
            .or_else(|| self.0.get(FALLBACK_LANGUAGE))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rewards handed out on completion or by a choice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardBundle {
    pub coins: i64,
    /// Item IDs, each granted at quantity 1
    pub items: Vec<String>,
    pub xp: i64,
    /// NPC ID -> friendship delta
    pub friendship: BTreeMap<String, i32>,
    /// Pet to adopt
    pub pet: Option<String>,
}

impl RewardBundle {
    pub fn is_empty(&self) -> bool {
        self.coins == 0
            && self.items.is_empty()
            && self.xp == 0
            && self.friendship.is_empty()
            && self.pet.is_none()
    }
}

/// A branching resolution of a quest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestChoice {
    pub rewards: RewardBundle,
    /// Stage the story moves on to (logged, not acted on)
    pub next_stage: Option<String>,
}

/// Immutable objective template owned by a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveTemplate {
    pub id: String,
    pub desc: LocalizedText,
    pub kind: ObjectiveKind,
    pub target: ObjectiveTarget,
    pub count: u32,
    pub item: Option<String>,
    pub time_condition: Option<TimeCondition>,
}

impl ObjectiveTemplate {
    fn from_raw(quest_id: &str, index: usize, raw: &RawObjective) -> Result<Self, CatalogError> {
        let kind = ObjectiveKind::from_str(&raw.objective_type).ok_or_else(|| {
            CatalogError::InvalidObjectiveKind {
                quest: quest_id.to_string(),
                index,
                kind: raw.objective_type.clone(),
            }
        })?;

        if raw.count == 0 {
            return Err(CatalogError::ZeroCount {
                quest: quest_id.to_string(),
                objective: raw.id.clone(),
            });
        }

        Ok(Self {
            id: raw.id.clone(),
            desc: raw.desc.clone(),
            kind,
            target: ObjectiveTarget::parse(&raw.target),
            count: raw.count,
            item: raw.item.clone(),
            time_condition: raw.time_condition,
        })
    }

    /// Fresh, independent progress tracker for a new quest instance
    pub fn instantiate(&self) -> ObjectiveState {
        ObjectiveState {
            id: self.id.clone(),
            kind: self.kind,
            target: self.target.clone(),
            count: self.count,
            current: 0,
            item: self.item.clone(),
            time_condition: self.time_condition,
        }
    }
}

/// A fully resolved quest definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestDefinition {
    pub id: String,
    pub quest_type: QuestType,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub giver: Option<String>,
    pub prerequisites: Vec<String>,
    pub objectives: Vec<ObjectiveTemplate>,
    pub rewards: RewardBundle,
    pub unlocks: Vec<String>,
    pub repeatable: bool,
    pub choices: BTreeMap<String, QuestChoice>,
}

impl QuestDefinition {
    /// Create a definition from its raw TOML table
    pub fn from_raw(id: &str, raw: &RawQuest) -> Result<Self, CatalogError> {
        let objectives = raw
            .objectives
            .iter()
            .enumerate()
            .map(|(i, o)| ObjectiveTemplate::from_raw(id, i, o))
            .collect::<Result<Vec<_>, _>>()?;

        if objectives.is_empty() {
            return Err(CatalogError::NoObjectives(id.to_string()));
        }

        // Prerequisites are a set, authored order kept for display
        let mut prerequisites: Vec<String> = Vec::with_capacity(raw.prerequisites.len());
        for prereq in &raw.prerequisites {
            if !prerequisites.contains(prereq) {
                prerequisites.push(prereq.clone());
            }
        }

        Ok(Self {
            id: id.to_string(),
            quest_type: raw.quest_type,
            title: raw.title.clone(),
            description: raw.description.clone(),
            giver: raw.giver.clone(),
            prerequisites,
            objectives,
            rewards: raw.rewards.clone(),
            unlocks: raw.unlocks.clone(),
            repeatable: raw.repeatable,
            choices: raw.choices.clone(),
        })
    }

    /// Whether this quest is started by the world rather than an NPC
    pub fn is_environmental(&self) -> bool {
        self.giver.as_deref() == Some(ENVIRONMENT_GIVER)
    }

    pub fn get_objective(&self, id: &str) -> Option<&ObjectiveTemplate> {
        self.objectives.iter().find(|o| o.id == id)
    }

    pub fn choice(&self, choice_id: &str) -> Option<&QuestChoice> {
        self.choices.get(choice_id)
    }

    /// Deep copy of every objective template, ready to attach to an instance
    pub fn instantiate_objectives(&self) -> Vec<ObjectiveState> {
        self.objectives.iter().map(ObjectiveTemplate::instantiate).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_quest(toml_src: &str) -> RawQuest {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn test_objective_kind_parsing() {
        assert_eq!(ObjectiveKind::from_str("collect"), Some(ObjectiveKind::Collect));
        assert_eq!(ObjectiveKind::from_str("Dialogue"), Some(ObjectiveKind::Dialogue));
        assert_eq!(ObjectiveKind::from_str("puzzle"), Some(ObjectiveKind::Puzzle));
        assert_eq!(ObjectiveKind::from_str("kill_monster"), None);

        for kind in ObjectiveKind::ALL {
            assert_eq!(ObjectiveKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_wildcard_target() {
        let any = ObjectiveTarget::parse("any_forage");
        assert_eq!(any, ObjectiveTarget::Any("forage".to_string()));
        assert!(any.matches("mushroom"));
        assert!(any.matches("berries"));
        assert_eq!(any.to_string(), "any_forage");

        let wood = ObjectiveTarget::parse("firewood");
        assert!(wood.matches("firewood"));
        assert!(!wood.matches("stone"));
        assert!(!wood.is_wildcard());
    }

    #[test]
    fn test_localized_text_fallback() {
        let mut text = LocalizedText::new("en", "Morning Brew");
        text.0.insert("hi".to_string(), "सुबह की चाय".to_string());

        assert_eq!(text.get("hi"), "सुबह की चाय");
        assert_eq!(text.get("fr"), "Morning Brew");
        assert_eq!(LocalizedText::default().get("en"), "");
    }

    #[test]
    fn test_definition_from_raw() {
        let raw = raw_quest(
            r#"
type = "side"
title = { en = "The Stray Companion" }
giver = "dadi_kamala"
prerequisites = ["a", "b", "a"]

[[objectives]]
id = "feed_dog"
type = "give"
target = "stray_dog"
item = "milk"

[[objectives]]
id = "visit"
type = "location"
target = "temple"
time_condition = "night"
count = 2

[rewards]
xp = 100
pet = "sheepdog"
friendship = { dadi_kamala = 10 }
"#,
        );

        let quest = QuestDefinition::from_raw("sq_adopt_pet", &raw).unwrap();
        assert_eq!(quest.quest_type, QuestType::Side);
        assert_eq!(quest.prerequisites, vec!["a", "b"]);
        assert_eq!(quest.objectives[0].count, 1);
        assert_eq!(quest.objectives[0].item.as_deref(), Some("milk"));
        assert_eq!(quest.objectives[1].time_condition, Some(TimeCondition::Night));
        assert_eq!(quest.rewards.pet.as_deref(), Some("sheepdog"));
        assert_eq!(quest.rewards.friendship.get("dadi_kamala"), Some(&10));
        assert!(!quest.repeatable);
    }

    #[test]
    fn test_definition_rejects_bad_objectives() {
        let unknown = raw_quest(
            r#"
type = "main"
[[objectives]]
id = "slay"
type = "kill_monster"
target = "slime"
"#,
        );
        assert!(matches!(
            QuestDefinition::from_raw("q", &unknown),
            Err(CatalogError::InvalidObjectiveKind { index: 0, .. })
        ));

        let zero = raw_quest(
            r#"
type = "main"
[[objectives]]
id = "nothing"
type = "collect"
target = "wood"
count = 0
"#,
        );
        assert!(matches!(
            QuestDefinition::from_raw("q", &zero),
            Err(CatalogError::ZeroCount { .. })
        ));

        let empty = raw_quest(r#"type = "daily""#);
        assert!(matches!(
            QuestDefinition::from_raw("q", &empty),
            Err(CatalogError::NoObjectives(_))
        ));
    }

    #[test]
    fn test_instantiate_is_independent() {
        let raw = raw_quest(
            r#"
type = "daily"
repeatable = true
[[objectives]]
id = "gather"
type = "collect"
target = "any_forage"
count = 5
"#,
        );
        let quest = QuestDefinition::from_raw("dq_foraging", &raw).unwrap();

        let mut first = quest.instantiate_objectives();
        let second = quest.instantiate_objectives();
        first[0].current = 4;

        assert_eq!(second[0].current, 0);
        assert_eq!(quest.objectives[0].count, 5);
    }
}
