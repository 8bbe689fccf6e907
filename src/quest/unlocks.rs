//! Unlock ledger
//!
//! Which quests have been made available by completing others. The ledger is
//! advisory: it never starts a quest and never bypasses prerequisites.

use std::collections::BTreeMap;

use super::catalog::QuestCatalog;
use super::log::{LogEvent, QuestLog};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockLedger {
    /// Unlocked quest IDs in the order they became available
    unlocked: Vec<String>,
    /// Completed quest -> quests it unlocked
    by_source: BTreeMap<String, Vec<String>>,
}

impl UnlockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source: &str, unlocks: &[String]) {
        let entry = self.by_source.entry(source.to_string()).or_default();
        for id in unlocks {
            if !entry.contains(id) {
                entry.push(id.clone());
            }
            if !self.unlocked.contains(id) {
                self.unlocked.push(id.clone());
            }
        }
    }

    pub fn is_unlocked(&self, quest_id: &str) -> bool {
        self.unlocked.iter().any(|id| id == quest_id)
    }

    pub fn unlocked(&self) -> &[String] {
        &self.unlocked
    }

    /// Quests unlocked by completing `source`
    pub fn unlocked_by(&self, source: &str) -> &[String] {
        self.by_source.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Recreate the ledger after a load: every completed quest's unlocks,
    /// plus anything the restored log says was unlocked (repeatable quests
    /// never reach the completed set).
    pub fn rebuild(catalog: &QuestCatalog, completed: &[String], log: &QuestLog) -> Self {
        let mut ledger = Self::new();
        for quest_id in completed {
            if let Some(quest) = catalog.get(quest_id) {
                ledger.record(quest_id, &quest.unlocks);
            }
        }
        for entry in log.entries() {
            if entry.event == LogEvent::Unlocked && !ledger.is_unlocked(&entry.quest_id) {
                ledger.unlocked.push(entry.quest_id.clone());
            }
        }
        ledger
    }
}
