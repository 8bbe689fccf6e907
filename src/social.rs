//! Relationship ledger
//!
//! Friendship xp per NPC and the status it buys. Quest rewards feed it
//! through the social sink.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::quest::SocialSink;

/// XP needed before dating is possible
pub const DATING_MIN_XP: i32 = 200;
/// XP bonus granted when dating starts
pub const DATING_BONUS_XP: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipStatus {
    Stranger,
    Acquaintance,
    Friend,
    #[serde(rename = "Good Friend")]
    GoodFriend,
    #[serde(rename = "Best Friend")]
    BestFriend,
    Partner,
    Spouse,
}

impl RelationshipStatus {
    pub const ALL: [RelationshipStatus; 7] = [
        RelationshipStatus::Stranger,
        RelationshipStatus::Acquaintance,
        RelationshipStatus::Friend,
        RelationshipStatus::GoodFriend,
        RelationshipStatus::BestFriend,
        RelationshipStatus::Partner,
        RelationshipStatus::Spouse,
    ];

    pub fn threshold(&self) -> i32 {
        match self {
            RelationshipStatus::Stranger => 0,
            RelationshipStatus::Acquaintance => 20,
            RelationshipStatus::Friend => 60,
            RelationshipStatus::GoodFriend => 120,
            RelationshipStatus::BestFriend => 200,
            RelationshipStatus::Partner => 350,
            RelationshipStatus::Spouse => 600,
        }
    }

    /// Statuses that need an explicit event rather than xp alone
    pub fn is_committed(&self) -> bool {
        matches!(self, RelationshipStatus::Partner | RelationshipStatus::Spouse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Stranger => "Stranger",
            RelationshipStatus::Acquaintance => "Acquaintance",
            RelationshipStatus::Friend => "Friend",
            RelationshipStatus::GoodFriend => "Good Friend",
            RelationshipStatus::BestFriend => "Best Friend",
            RelationshipStatus::Partner => "Partner",
            RelationshipStatus::Spouse => "Spouse",
        }
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub xp: i32,
    pub status: RelationshipStatus,
    #[serde(default)]
    pub gifts_today: u32,
    #[serde(default)]
    pub talked_today: bool,
}

impl Default for Relationship {
    fn default() -> Self {
        Self {
            xp: 0,
            status: RelationshipStatus::Stranger,
            gifts_today: 0,
            talked_today: false,
        }
    }
}

impl Relationship {
    /// Recompute status from xp. Committed statuses are never lost or
    /// gained here. Returns true when the status changed.
    fn update_status(&mut self) -> bool {
        if self.status.is_committed() {
            return false;
        }
        let new_status = RelationshipStatus::ALL
            .iter()
            .filter(|status| !status.is_committed() && self.xp >= status.threshold())
            .last()
            .copied()
            .unwrap_or(RelationshipStatus::Stranger);

        if new_status != self.status {
            self.status = new_status;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipLedger {
    relationships: BTreeMap<String, Relationship>,
}

impl RelationshipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relationship with an NPC, created as a stranger on first access
    pub fn relationship(&mut self, npc_id: &str) -> &mut Relationship {
        self.relationships.entry(npc_id.to_string()).or_default()
    }

    pub fn get(&self, npc_id: &str) -> Option<&Relationship> {
        self.relationships.get(npc_id)
    }

    pub fn status(&self, npc_id: &str) -> RelationshipStatus {
        self.get(npc_id)
            .map(|r| r.status)
            .unwrap_or(RelationshipStatus::Stranger)
    }

    pub fn add_xp(&mut self, npc_id: &str, amount: i32) -> RelationshipStatus {
        let rel = self.relationship(npc_id);
        rel.xp = rel.xp.saturating_add(amount);
        if rel.update_status() {
            info!("Relationship with {} is now {}", npc_id, rel.status);
        }
        rel.status
    }

    pub fn can_date(&self, npc_id: &str) -> bool {
        self.get(npc_id)
            .is_some_and(|r| r.xp >= DATING_MIN_XP && !r.status.is_committed())
    }

    pub fn start_dating(&mut self, npc_id: &str) -> bool {
        if !self.can_date(npc_id) {
            return false;
        }
        let rel = self.relationship(npc_id);
        rel.status = RelationshipStatus::Partner;
        rel.xp = rel.xp.saturating_add(DATING_BONUS_XP);
        info!("Started dating {}", npc_id);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Relationship)> {
        self.relationships.iter()
    }

    pub fn save_data(&self) -> BTreeMap<String, Relationship> {
        self.relationships.clone()
    }

    /// Replace every relationship when data is present
    pub fn load_save_data(&mut self, data: Option<BTreeMap<String, Relationship>>) {
        if let Some(data) = data {
            self.relationships = data;
        }
    }
}

impl SocialSink for RelationshipLedger {
    fn add_friendship(&mut self, npc_id: &str, amount: i32) {
        self.add_xp(npc_id, amount);
    }
}
