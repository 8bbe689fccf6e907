//! Collaborator interfaces the engine pushes rewards into.
//!
//! Each sink is injected into the quest manager; a sink that is not
//! provided simply means that part of a reward bundle is skipped.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Coins and items
pub trait InventorySink {
    fn add_coins(&mut self, amount: i64);

    /// Returns false when the item could not be stored (e.g. inventory full)
    fn add_item(&mut self, item_id: &str, quantity: u32) -> bool;
}

/// Player experience
pub trait PlayerSink {
    fn add_xp(&mut self, amount: i64);
}

/// Friendship with NPCs
pub trait SocialSink {
    fn add_friendship(&mut self, npc_id: &str, amount: i32);
}

/// Pet adoption
pub trait PetSink {
    /// Returns false if the pet could not be adopted
    fn adopt(&mut self, pet_id: &str) -> bool;
}

/// Notification importance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
        }
    }
}

/// User-visible feedback
pub trait NotificationSink {
    fn show(&mut self, message: &str, severity: Severity);
}

// Shared handles let a caller keep observing a sink after injecting it.

impl<T: InventorySink> InventorySink for Rc<RefCell<T>> {
    fn add_coins(&mut self, amount: i64) {
        self.borrow_mut().add_coins(amount);
    }

    fn add_item(&mut self, item_id: &str, quantity: u32) -> bool {
        self.borrow_mut().add_item(item_id, quantity)
    }
}

impl<T: PlayerSink> PlayerSink for Rc<RefCell<T>> {
    fn add_xp(&mut self, amount: i64) {
        self.borrow_mut().add_xp(amount);
    }
}

impl<T: SocialSink> SocialSink for Rc<RefCell<T>> {
    fn add_friendship(&mut self, npc_id: &str, amount: i32) {
        self.borrow_mut().add_friendship(npc_id, amount);
    }
}

impl<T: PetSink> PetSink for Rc<RefCell<T>> {
    fn adopt(&mut self, pet_id: &str) -> bool {
        self.borrow_mut().adopt(pet_id)
    }
}

impl<T: NotificationSink> NotificationSink for Rc<RefCell<T>> {
    fn show(&mut self, message: &str, severity: Severity) {
        self.borrow_mut().show(message, severity);
    }
}

/// The set of sinks a quest manager dispatches rewards to
#[derive(Default)]
pub struct RewardSinks {
    pub inventory: Option<Box<dyn InventorySink>>,
    pub player: Option<Box<dyn PlayerSink>>,
    pub social: Option<Box<dyn SocialSink>>,
    pub pets: Option<Box<dyn PetSink>>,
    pub notifications: Option<Box<dyn NotificationSink>>,
}

impl RewardSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory(mut self, sink: impl InventorySink + 'static) -> Self {
        self.inventory = Some(Box::new(sink));
        self
    }

    pub fn with_player(mut self, sink: impl PlayerSink + 'static) -> Self {
        self.player = Some(Box::new(sink));
        self
    }

    pub fn with_social(mut self, sink: impl SocialSink + 'static) -> Self {
        self.social = Some(Box::new(sink));
        self
    }

    pub fn with_pets(mut self, sink: impl PetSink + 'static) -> Self {
        self.pets = Some(Box::new(sink));
        self
    }

    pub fn with_notifications(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.notifications = Some(Box::new(sink));
        self
    }

    pub(crate) fn notify(&mut self, message: &str, severity: Severity) {
        if let Some(notifications) = self.notifications.as_mut() {
            notifications.show(message, severity);
        }
    }
}
