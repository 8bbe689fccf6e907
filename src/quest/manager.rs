//! Quest Manager
//!
//! Facade over the quest engine: starts quests, routes gameplay events to the
//! matcher, retires completed instances, dispatches rewards, and saves/loads.
//!
//! Every call runs to completion before returning. `quest` objectives are
//! normally fed by producers; with completion events enabled the manager
//! feeds them itself, queueing a `quest` event for every quest it completes
//! and processing it within the same call.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::catalog::QuestCatalog;
use super::definition::{ObjectiveKind, QuestDefinition};
use super::error::{ChoiceError, StartError};
use super::events::{EventReport, QuestEvent};
use super::log::{DEFAULT_LOG_RETENTION, LogEvent, QuestLog};
use super::matcher::match_event;
use super::rewards::{RewardReceipt, grant_rewards};
use super::save::{PartialSave, QuestSaveData};
use super::sinks::RewardSinks;
use super::state::{QuestInstance, QuestProgress, QuestState};
use super::unlocks::UnlockLedger;

/// An active instance paired with its definition, for display
#[derive(Debug, Clone, Copy)]
pub struct ActiveQuest<'a> {
    pub instance: &'a QuestInstance,
    pub definition: &'a QuestDefinition,
}

pub struct QuestManager {
    catalog: Arc<QuestCatalog>,
    /// Active instances in start order
    active: Vec<QuestInstance>,
    /// Completed non-repeatable quest IDs in completion order
    completed: Vec<String>,
    log: QuestLog,
    unlocks: UnlockLedger,
    sinks: RewardSinks,
    day: u32,
    log_retention: usize,
    /// Submit a `quest` event for each completed quest
    completion_events: bool,
}

impl QuestManager {
    pub fn new(catalog: Arc<QuestCatalog>, sinks: RewardSinks) -> Self {
        Self {
            catalog,
            active: Vec::new(),
            completed: Vec::new(),
            log: QuestLog::new(),
            unlocks: UnlockLedger::new(),
            sinks,
            day: 1,
            log_retention: DEFAULT_LOG_RETENTION,
            completion_events: false,
        }
    }

    /// Number of log entries kept when saving
    pub fn with_log_retention(mut self, retention: usize) -> Self {
        self.log_retention = retention;
        self
    }

    /// Let completions advance `quest` objectives without a producer.
    /// Hosts that submit `quest` events themselves must leave this off, or
    /// each dependency is counted twice.
    pub fn with_completion_events(mut self, enabled: bool) -> Self {
        self.completion_events = enabled;
        self
    }

    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Set the in-game day stamped on new instances and log entries
    pub fn set_day(&mut self, day: u32) {
        self.day = day.max(1);
    }

    // ------------------------------------------------------------------
    // Starting
    // ------------------------------------------------------------------

    /// Check whether a quest could be started right now
    pub fn can_start(&self, quest_id: &str) -> Result<(), StartError> {
        let quest = self
            .catalog
            .get(quest_id)
            .ok_or_else(|| StartError::UnknownQuest(quest_id.to_string()))?;

        if self.is_active(quest_id) {
            return Err(StartError::AlreadyActive(quest_id.to_string()));
        }

        if self.is_completed(quest_id) && !quest.repeatable {
            return Err(StartError::AlreadyCompletedNonRepeatable(quest_id.to_string()));
        }

        let missing: Vec<String> = quest
            .prerequisites
            .iter()
            .filter(|prereq| !self.is_completed(prereq))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(StartError::PrerequisitesUnmet {
                quest: quest_id.to_string(),
                missing,
            });
        }

        Ok(())
    }

    /// Start a quest with a fresh copy of its objectives.
    /// A failed start changes nothing.
    pub fn start_quest(&mut self, quest_id: &str) -> Result<(), StartError> {
        if let Err(e) = self.can_start(quest_id) {
            debug!("Cannot start quest {}: {}", quest_id, e);
            return Err(e);
        }

        let Some(quest) = self.catalog.get(quest_id) else {
            return Err(StartError::UnknownQuest(quest_id.to_string()));
        };
        let instance = QuestInstance::new(quest, self.day, now_millis());
        info!("Quest started: {} ({})", quest.title.get("en"), quest_id);

        self.active.push(instance);
        self.log.push(quest_id, LogEvent::Started, now_millis(), self.day);
        Ok(())
    }

    /// New-game bootstrap; returns the quests that actually started
    pub fn start_initial_quests(&mut self, quest_ids: &[String]) -> Vec<String> {
        let mut started = Vec::new();
        for quest_id in quest_ids {
            match self.start_quest(quest_id) {
                Ok(()) => started.push(quest_id.clone()),
                Err(e) => warn!("Opening quest not started: {}", e),
            }
        }
        started
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    /// The single ingress for gameplay events
    pub fn submit_event(&mut self, event: QuestEvent) -> EventReport {
        let mut report = EventReport::default();
        self.process(VecDeque::from([event]), &mut report);
        report
    }

    /// Shorthand for `submit_event` with loose parts
    pub fn submit(&mut self, kind: ObjectiveKind, target: &str, amount: u32) -> EventReport {
        self.submit_event(QuestEvent::new(kind, target).with_amount(amount))
    }

    fn process(&mut self, mut queue: VecDeque<QuestEvent>, report: &mut EventReport) {
        while let Some(event) = queue.pop_front() {
            let advances = match_event(&mut self.active, &event);

            let ready: Vec<String> = advances
                .iter()
                .filter(|advance| {
                    self.instance(&advance.quest_id)
                        .is_some_and(QuestInstance::is_complete)
                })
                .map(|advance| advance.quest_id.clone())
                .collect();

            report.advances.extend(advances);

            for quest_id in ready {
                if self.retire(&quest_id).is_some() {
                    if self.completion_events {
                        queue.push_back(QuestEvent::quest(quest_id.as_str()));
                    }
                    report.completed.push(quest_id);
                }
            }
        }
    }

    /// Complete an active quest outright (scripted completion).
    /// Returns false if the quest is not active.
    pub fn complete_quest(&mut self, quest_id: &str) -> bool {
        if self.retire(quest_id).is_none() {
            return false;
        }
        if self.completion_events {
            let mut report = EventReport::default();
            self.process(VecDeque::from([QuestEvent::quest(quest_id)]), &mut report);
        }
        true
    }

    /// Remove the instance, record completion, pay out, log unlocks
    fn retire(&mut self, quest_id: &str) -> Option<RewardReceipt> {
        let index = self.active.iter().position(|q| q.id == quest_id)?;
        let mut instance = self.active.remove(index);
        instance.state = QuestState::Completed;

        let catalog = Arc::clone(&self.catalog);
        let Some(quest) = catalog.get(quest_id) else {
            warn!("Completed quest '{}' has no definition, no rewards granted", quest_id);
            return Some(RewardReceipt::default());
        };

        if !quest.repeatable && !self.is_completed(quest_id) {
            self.completed.push(quest_id.to_string());
        }

        let receipt = grant_rewards(&quest.rewards, &mut self.sinks);

        for unlock_id in &quest.unlocks {
            self.log.push(unlock_id, LogEvent::Unlocked, now_millis(), self.day);
            info!("Quest unlocked: {} (by {})", unlock_id, quest_id);
        }
        self.unlocks.record(quest_id, &quest.unlocks);

        self.log.push(quest_id, LogEvent::Completed, now_millis(), self.day);
        info!("Quest completed: {} ({})", quest.title.get("en"), quest_id);

        Some(receipt)
    }

    /// Take a branching choice on an active quest. Objectives do not have to
    /// be finished first.
    pub fn handle_choice(&mut self, quest_id: &str, choice_id: &str) -> Result<RewardReceipt, ChoiceError> {
        if !self.is_active(quest_id) {
            return Err(ChoiceError::NotActive(quest_id.to_string()));
        }

        let catalog = Arc::clone(&self.catalog);
        let choice = catalog
            .get(quest_id)
            .and_then(|quest| quest.choice(choice_id))
            .ok_or_else(|| ChoiceError::UnknownChoice {
                quest: quest_id.to_string(),
                choice: choice_id.to_string(),
            })?;

        self.log.push(
            quest_id,
            LogEvent::Choice(choice_id.to_string()),
            now_millis(),
            self.day,
        );
        if let Some(stage) = &choice.next_stage {
            info!("Quest {} advancing to stage: {}", quest_id, stage);
        }

        Ok(grant_rewards(&choice.rewards, &mut self.sinks))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn active_quests(&self) -> Vec<ActiveQuest<'_>> {
        self.active
            .iter()
            .filter_map(|instance| {
                self.catalog
                    .get(&instance.id)
                    .map(|definition| ActiveQuest { instance, definition })
            })
            .collect()
    }

    pub fn quest_progress(&self, quest_id: &str) -> Option<QuestProgress> {
        self.instance(quest_id).map(QuestInstance::progress)
    }

    pub fn instance(&self, quest_id: &str) -> Option<&QuestInstance> {
        self.active.iter().find(|q| q.id == quest_id)
    }

    pub fn is_active(&self, quest_id: &str) -> bool {
        self.active.iter().any(|q| q.id == quest_id)
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.completed.iter().any(|id| id == quest_id)
    }

    pub fn completed_quests(&self) -> &[String] {
        &self.completed
    }

    pub fn quest_log(&self) -> &QuestLog {
        &self.log
    }

    pub fn unlock_ledger(&self) -> &UnlockLedger {
        &self.unlocks
    }

    /// Unlocked quests that could be started right now
    pub fn available_quests(&self) -> Vec<&QuestDefinition> {
        self.unlocks
            .unlocked()
            .iter()
            .filter(|id| self.can_start(id).is_ok())
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn serialize(&self) -> QuestSaveData {
        QuestSaveData {
            active_quests: self.active.clone(),
            completed_quests: self.completed.clone(),
            quest_log: self.log.recent(self.log_retention).to_vec(),
        }
    }

    /// Restore whichever parts of the state the save provides
    pub fn deserialize(&mut self, data: PartialSave) {
        if let Some(active) = data.active_quests {
            self.active = self.normalize_active(active);
        }
        if let Some(completed) = data.completed_quests {
            let mut unique: Vec<String> = Vec::with_capacity(completed.len());
            for quest_id in completed {
                if unique.contains(&quest_id) {
                    warn!("Dropping duplicate completed quest '{}' from save", quest_id);
                } else {
                    unique.push(quest_id);
                }
            }
            self.completed = unique;
        }
        if let Some(entries) = data.quest_log {
            self.log = QuestLog::from_entries(entries);
        }

        self.unlocks = UnlockLedger::rebuild(&self.catalog, &self.completed, &self.log);
        info!(
            "Quest state loaded: {} active, {} completed, {} log entries",
            self.active.len(),
            self.completed.len(),
            self.log.len()
        );
    }

    /// Restore from a JSON document
    pub fn load_json(&mut self, json: &str) {
        self.deserialize(PartialSave::from_json(json));
    }

    /// Repair loaded instances. An instance whose objectives are all full
    /// stays active and completes on the next event that matches it.
    fn normalize_active(&self, instances: Vec<QuestInstance>) -> Vec<QuestInstance> {
        let mut active: Vec<QuestInstance> = Vec::with_capacity(instances.len());

        for mut instance in instances {
            let Some(quest) = self.catalog.get(&instance.id) else {
                warn!("Dropping saved quest '{}': not in catalog", instance.id);
                continue;
            };
            if active.iter().any(|q| q.id == instance.id) {
                warn!("Dropping duplicate saved instance of '{}'", instance.id);
                continue;
            }
            if instance.objectives.is_empty() {
                warn!(
                    "Saved quest '{}' has no objectives, restoring them from the catalog",
                    instance.id
                );
                instance.objectives = quest.instantiate_objectives();
            }
            for objective in &mut instance.objectives {
                if objective.clamp() {
                    warn!(
                        "Clamped saved progress of {}/{} to {}",
                        instance.id, objective.id, objective.count
                    );
                }
            }
            if instance.state != QuestState::Active {
                warn!(
                    "Saved quest '{}' was {}, restoring as active",
                    instance.id,
                    instance.state.as_str()
                );
                instance.state = QuestState::Active;
            }
            active.push(instance);
        }

        active
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::sinks::{InventorySink, NotificationSink, PetSink, PlayerSink, Severity, SocialSink};
    use std::cell::RefCell;
    use std::rc::Rc;

    const CATALOG: &str = r#"
[A]
type = "main"
unlocks = ["B"]
[[A.objectives]]
id = "wood"
type = "collect"
target = "wood"
count = 5
[A.rewards]
coins = 50
items = ["basic_stove"]
xp = 100

[B]
type = "main"
prerequisites = ["A"]
[[B.objectives]]
id = "brew"
type = "craft"
target = "masala_chai"

[plain]
type = "side"
[[plain.objectives]]
id = "wood"
type = "collect"
target = "wood"
count = 5
[plain.rewards]
coins = 50

[forage_twice]
type = "daily"
repeatable = true
[[forage_twice.objectives]]
id = "first"
type = "collect"
target = "any_forage"
count = 2
[[forage_twice.objectives]]
id = "second"
type = "collect"
target = "any_forage"
count = 2

[daily]
type = "daily"
repeatable = true
[[daily.objectives]]
id = "serve"
type = "serve"
target = "any_chai"
count = 3
[daily.rewards]
coins = 15
xp = 20

[helper]
type = "main"
[[helper.objectives]]
id = "help_plain"
type = "quest"
target = "plain"

[pine]
type = "side"
giver = "nature"
[[pine.objectives]]
id = "investigate"
type = "interact"
target = "ancient_pine"
[[pine.objectives]]
id = "chime"
type = "collect"
target = "wind_chime"
[pine.rewards]
coins = 20
[pine.choices.keep_chime.rewards]
items = ["wind_chime_charm"]
xp = 50
[pine.choices.leave_chime]
next_stage = "spirits"
[pine.choices.leave_chime.rewards]
xp = 100
friendship = { nature_spirits = 10 }

[mentor]
type = "side"
[[mentor.objectives]]
id = "twice"
type = "quest"
target = "plain"
count = 2

[pet]
type = "side"
[[pet.objectives]]
id = "adopt"
type = "dialogue"
target = "stray_dog"
[pet.rewards]
pet = "sheepdog"
friendship = { dadi_kamala = 10 }
"#;

    #[derive(Default)]
    struct World {
        coins: i64,
        items: Vec<String>,
        xp: i64,
        friendship: Vec<(String, i32)>,
        pets: Vec<String>,
        messages: Vec<(String, Severity)>,
    }

    impl InventorySink for World {
        fn add_coins(&mut self, amount: i64) {
            self.coins += amount;
        }
        fn add_item(&mut self, item_id: &str, _quantity: u32) -> bool {
            self.items.push(item_id.to_string());
            true
        }
    }

    impl PlayerSink for World {
        fn add_xp(&mut self, amount: i64) {
            self.xp += amount;
        }
    }

    impl SocialSink for World {
        fn add_friendship(&mut self, npc_id: &str, amount: i32) {
            self.friendship.push((npc_id.to_string(), amount));
        }
    }

    impl PetSink for World {
        fn adopt(&mut self, pet_id: &str) -> bool {
            if self.pets.iter().any(|p| p == pet_id) {
                return false;
            }
            self.pets.push(pet_id.to_string());
            true
        }
    }

    impl NotificationSink for World {
        fn show(&mut self, message: &str, severity: Severity) {
            self.messages.push((message.to_string(), severity));
        }
    }

    fn setup() -> (QuestManager, Rc<RefCell<World>>) {
        let catalog = Arc::new(QuestCatalog::from_toml_str(CATALOG).unwrap());
        let world = Rc::new(RefCell::new(World::default()));
        let sinks = RewardSinks::new()
            .with_inventory(world.clone())
            .with_player(world.clone())
            .with_social(world.clone())
            .with_pets(world.clone())
            .with_notifications(world.clone());
        (QuestManager::new(catalog, sinks), world)
    }

    fn assert_bounds(manager: &QuestManager) {
        for quest in manager.active_quests() {
            for objective in &quest.instance.objectives {
                assert!(objective.current <= objective.count);
            }
        }
    }

    #[test]
    fn test_chain_scenario() {
        let (mut manager, world) = setup();

        assert!(manager.start_quest("A").is_ok());
        for _ in 0..5 {
            manager.submit_event(QuestEvent::collect("wood", 1));
        }

        assert!(!manager.is_active("A"));
        assert!(manager.is_completed("A"));
        let log = manager.quest_log();
        assert!(log.contains("A", &LogEvent::Started));
        assert!(log.contains("B", &LogEvent::Unlocked));
        assert!(log.contains("A", &LogEvent::Completed));

        // Unlocks are advisory
        assert!(!manager.is_active("B"));
        assert_eq!(manager.available_quests()[0].id, "B");

        assert!(manager.start_quest("B").is_ok());
        assert!(manager.is_active("B"));
        assert!(manager.available_quests().is_empty());

        let world = world.borrow();
        assert_eq!(world.coins, 50);
        assert_eq!(world.items, vec!["basic_stove"]);
        assert_eq!(world.xp, 100);
    }

    #[test]
    fn test_start_failures_have_reasons() {
        let (mut manager, _) = setup();

        assert_eq!(
            manager.start_quest("nope"),
            Err(StartError::UnknownQuest("nope".to_string()))
        );
        assert_eq!(
            manager.start_quest("B"),
            Err(StartError::PrerequisitesUnmet {
                quest: "B".to_string(),
                missing: vec!["A".to_string()],
            })
        );

        manager.start_quest("plain").unwrap();
        assert_eq!(
            manager.start_quest("plain"),
            Err(StartError::AlreadyActive("plain".to_string()))
        );
        assert_eq!(manager.active_quests().len(), 1);

        manager.submit_event(QuestEvent::collect("wood", 5));
        assert_eq!(
            manager.start_quest("plain"),
            Err(StartError::AlreadyCompletedNonRepeatable("plain".to_string()))
        );
    }

    #[test]
    fn test_failed_starts_are_idempotent() {
        let (mut manager, _) = setup();
        for _ in 0..10 {
            assert!(manager.start_quest("B").is_err());
        }
        assert!(manager.active_quests().is_empty());
        assert!(manager.completed_quests().is_empty());
        assert!(manager.quest_log().is_empty());
    }

    #[test]
    fn test_single_match_per_event_with_wildcards() {
        let (mut manager, _) = setup();
        manager.start_quest("forage_twice").unwrap();

        let report = manager.submit_event(QuestEvent::collect("mushroom", 1));
        assert_eq!(report.advances.len(), 1);

        let instance = manager.instance("forage_twice").unwrap();
        assert_eq!(instance.objectives[0].current, 1);
        assert_eq!(instance.objectives[1].current, 0);
    }

    #[test]
    fn test_rewards_fire_once() {
        let (mut manager, world) = setup();
        manager.start_quest("plain").unwrap();

        let report = manager.submit_event(QuestEvent::collect("wood", 9));
        assert_eq!(report.completed, vec!["plain"]);
        assert_bounds(&manager);

        let report = manager.submit_event(QuestEvent::collect("wood", 5));
        assert!(report.is_empty());
        assert!(!manager.complete_quest("plain"));
        assert_eq!(world.borrow().coins, 50);
    }

    #[test]
    fn test_repeatable_daily_restarts() {
        let (mut manager, world) = setup();
        manager.start_quest("daily").unwrap();
        manager.submit_event(QuestEvent::serve("masala_chai").with_amount(3));

        assert!(!manager.is_active("daily"));
        assert!(!manager.is_completed("daily"));
        assert!(manager.start_quest("daily").is_ok());
        assert_eq!(manager.quest_progress("daily").unwrap().completed, 0);
        assert_eq!(world.borrow().coins, 15);
    }

    #[test]
    fn test_instances_do_not_share_objectives() {
        let (mut manager, _) = setup();
        manager.start_quest("daily").unwrap();
        manager.submit_event(QuestEvent::serve("ginger_tea"));
        manager.submit_event(QuestEvent::serve("ginger_tea").with_amount(2));
        manager.start_quest("daily").unwrap();

        assert_eq!(manager.instance("daily").unwrap().objectives[0].current, 0);
        let template = &manager.catalog().get("daily").unwrap().objectives[0];
        assert_eq!(template.count, 3);
        assert_eq!(template.instantiate().current, 0);
    }

    #[test]
    fn test_fan_out_completes_in_start_order() {
        let (mut manager, world) = setup();
        manager.start_quest("plain").unwrap();
        manager.start_quest("A").unwrap();

        let report = manager.submit_event(QuestEvent::collect("wood", 5));
        assert_eq!(report.completed, vec!["plain", "A"]);
        assert_eq!(world.borrow().coins, 100);
    }

    #[test]
    fn test_completion_events_when_enabled() {
        let (manager, _) = setup();
        let mut manager = manager.with_completion_events(true);
        manager.start_quest("helper").unwrap();
        manager.start_quest("plain").unwrap();

        let report = manager.submit_event(QuestEvent::collect("wood", 5));
        assert_eq!(report.completed, vec!["plain", "helper"]);
        assert!(manager.is_completed("helper"));
    }

    #[test]
    fn test_quest_objectives_wait_for_producers() {
        let (mut manager, world) = setup();
        manager.start_quest("helper").unwrap();
        manager.start_quest("plain").unwrap();

        let report = manager.submit_event(QuestEvent::collect("wood", 5));
        assert_eq!(report.completed, vec!["plain"]);
        assert!(manager.is_active("helper"));

        let report = manager.submit_event(QuestEvent::quest("plain"));
        assert_eq!(report.completed, vec!["helper"]);
        assert_eq!(world.borrow().coins, 50);
    }

    #[test]
    fn test_scripted_completion_counts_dependency_once() {
        let (mut manager, _) = setup();
        manager.start_quest("mentor").unwrap();
        manager.start_quest("plain").unwrap();

        assert!(manager.complete_quest("plain"));
        assert_eq!(manager.instance("mentor").unwrap().objectives[0].current, 0);

        manager.submit_event(QuestEvent::quest("plain"));
        assert!(manager.is_active("mentor"));
        assert_eq!(manager.instance("mentor").unwrap().objectives[0].current, 1);
    }

    #[test]
    fn test_scripted_completion() {
        let (mut manager, world) = setup();
        manager.start_quest("A").unwrap();
        assert!(manager.complete_quest("A"));
        assert!(manager.is_completed("A"));
        assert_eq!(world.borrow().coins, 50);
        assert!(!manager.complete_quest("A"));
    }

    #[test]
    fn test_progress_query() {
        let (mut manager, _) = setup();
        assert!(manager.quest_progress("pine").is_none());

        manager.start_quest("pine").unwrap();
        manager.submit_event(QuestEvent::interact("ancient_pine"));

        let progress = manager.quest_progress("pine").unwrap();
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 2);
        assert!((progress.percentage - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_choice_grants_alternate_rewards() {
        let (mut manager, world) = setup();
        assert_eq!(
            manager.handle_choice("pine", "keep_chime"),
            Err(ChoiceError::NotActive("pine".to_string()))
        );

        manager.start_quest("pine").unwrap();
        assert!(matches!(
            manager.handle_choice("pine", "smash_chime"),
            Err(ChoiceError::UnknownChoice { .. })
        ));

        // Allowed before the objectives are done
        let receipt = manager.handle_choice("pine", "leave_chime").unwrap();
        assert_eq!(receipt.xp, 100);
        assert!(manager.is_active("pine"));
        assert!(
            manager
                .quest_log()
                .contains("pine", &LogEvent::Choice("leave_chime".to_string()))
        );
        assert_eq!(world.borrow().friendship, vec![("nature_spirits".to_string(), 10)]);
    }

    #[test]
    fn test_pet_reward_notifies_on_adoption() {
        let (mut manager, world) = setup();
        manager.start_quest("pet").unwrap();
        manager.submit_event(QuestEvent::dialogue("stray_dog"));

        let world = world.borrow();
        assert_eq!(world.pets, vec!["sheepdog"]);
        assert_eq!(world.messages.len(), 1);
        assert_eq!(world.messages[0].1, Severity::Success);
    }

    #[test]
    fn test_missing_sinks_do_not_block_completion() {
        let catalog = Arc::new(QuestCatalog::from_toml_str(CATALOG).unwrap());
        let mut manager = QuestManager::new(catalog, RewardSinks::new());
        manager.start_quest("A").unwrap();
        let report = manager.submit_event(QuestEvent::collect("wood", 5));
        assert_eq!(report.completed, vec!["A"]);
        assert!(manager.is_completed("A"));
    }

    #[test]
    fn test_save_round_trip_keeps_recent_log() {
        let (manager, _) = setup();
        let mut manager = manager.with_completion_events(true);
        manager.set_day(7);

        for quest_id in ["A", "plain", "helper"] {
            manager.start_quest(quest_id).unwrap();
        }
        // Completes A and plain, which in turn completes helper
        manager.submit_event(QuestEvent::collect("wood", 5));
        manager.start_quest("B").unwrap();
        manager.start_quest("daily").unwrap();
        manager.submit_event(QuestEvent::serve("masala_chai"));

        // Pad the log with choices until it holds 60 entries
        manager.start_quest("pine").unwrap();
        while manager.quest_log().len() < 60 {
            manager.handle_choice("pine", "keep_chime").unwrap();
        }

        let saved = manager.serialize();
        assert_eq!(saved.active_quests.len(), 3);
        assert_eq!(saved.completed_quests.len(), 3);
        assert_eq!(saved.quest_log.len(), 50);
        assert_eq!(saved.quest_log, manager.quest_log().recent(50));

        let json = saved.to_json().unwrap();
        let (mut restored, _) = setup();
        restored.load_json(&json);

        assert_eq!(restored.completed_quests(), manager.completed_quests());
        assert_eq!(restored.serialize().active_quests, saved.active_quests);
        assert_eq!(restored.quest_log().len(), 50);
        assert_eq!(restored.quest_log().entries(), saved.quest_log.as_slice());
        assert_eq!(restored.instance("daily").unwrap().objectives[0].current, 1);
        assert_eq!(restored.instance("daily").unwrap().start_day, 7);
        assert!(restored.unlock_ledger().is_unlocked("B"));
    }

    #[test]
    fn test_partial_load_keeps_missing_fields() {
        let (mut manager, _) = setup();
        manager.start_quest("A").unwrap();

        manager.load_json(r#"{ "completedQuests": ["plain"], "activeQuests": 42 }"#);

        assert!(manager.is_active("A"));
        assert!(manager.is_completed("plain"));
        assert_eq!(manager.quest_log().len(), 1);
    }

    #[test]
    fn test_load_repairs_bad_instances() {
        let (mut manager, _) = setup();
        manager.load_json(
            r#"{
                "activeQuests": [
                    { "id": "ghost", "state": "active", "objectives": [], "startDay": 1, "startTime": 0 },
                    { "id": "plain", "state": "completed", "startDay": 2, "startTime": 0,
                      "objectives": [ { "id": "wood", "type": "collect", "target": "wood", "count": 5, "current": 3 } ] },
                    { "id": "daily", "state": "active", "startDay": 2, "startTime": 0,
                      "objectives": [ { "id": "serve", "type": "serve", "target": "any_chai", "count": 3, "current": 99 } ] },
                    { "id": "plain", "state": "active", "startDay": 3, "startTime": 0,
                      "objectives": [ { "id": "wood", "type": "collect", "target": "wood", "count": 5, "current": 0 } ] },
                    { "id": "pine", "state": "active", "startDay": 3, "startTime": 0, "objectives": [] }
                ],
                "completedQuests": ["A", "A"]
            }"#,
        );

        let ids: Vec<&str> = manager.active_quests().iter().map(|q| q.instance.id.as_str()).collect();
        assert_eq!(ids, vec!["plain", "daily", "pine"]);
        let pine = manager.instance("pine").unwrap();
        assert_eq!(pine.objectives.len(), 2);
        assert_eq!(pine.start_day, 3);
        assert!(!pine.is_complete());
        assert_eq!(manager.instance("plain").unwrap().objectives[0].current, 3);
        assert_eq!(manager.instance("plain").unwrap().state, QuestState::Active);
        assert_eq!(manager.instance("daily").unwrap().objectives[0].current, 3);
        assert_eq!(manager.completed_quests(), &["A".to_string()]);
        assert_bounds(&manager);
    }

    #[test]
    fn test_loaded_satisfied_instance_completes_on_next_match() {
        let (mut manager, world) = setup();
        manager.load_json(
            r#"{
                "activeQuests": [
                    { "id": "plain", "state": "active", "startDay": 1, "startTime": 0,
                      "objectives": [ { "id": "wood", "type": "collect", "target": "wood", "count": 5, "current": 5 } ] }
                ]
            }"#,
        );
        assert!(manager.is_active("plain"));
        assert_eq!(world.borrow().coins, 0);

        let report = manager.submit_event(QuestEvent::collect("wood", 1));
        assert_eq!(report.completed, vec!["plain"]);
        assert!(manager.start_quest("plain").is_err());
        assert_eq!(world.borrow().coins, 50);
    }

    #[test]
    fn test_initial_quests() {
        let (mut manager, _) = setup();
        let started = manager.start_initial_quests(&["A".to_string(), "B".to_string()]);
        assert_eq!(started, vec!["A"]);
    }
}
