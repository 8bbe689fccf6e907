use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::quest::InventorySink;

pub const DEFAULT_INVENTORY_SLOTS: usize = 30;
pub const DEFAULT_STACK_LIMIT: u32 = 99;

/// Coins plus one stack per item kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub coins: i64,
    pub items: BTreeMap<String, u32>,
    pub max_slots: usize,
    /// Per-item stack caps; items not listed use DEFAULT_STACK_LIMIT
    #[serde(default)]
    pub stack_limits: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new(max_slots: usize) -> Self {
        Self {
            coins: 0,
            items: BTreeMap::new(),
            max_slots,
            stack_limits: BTreeMap::new(),
        }
    }

    pub fn with_stack_limit(mut self, item_id: &str, limit: u32) -> Self {
        self.stack_limits.insert(item_id.to_string(), limit);
        self
    }

    fn stack_limit(&self, item_id: &str) -> u32 {
        self.stack_limits
            .get(item_id)
            .copied()
            .unwrap_or(DEFAULT_STACK_LIMIT)
    }

    /// Add items. Fails only when a new stack is needed and every slot is
    /// taken; an existing stack silently caps at its limit.
    pub fn add_item(&mut self, item_id: &str, quantity: u32) -> bool {
        if !self.items.contains_key(item_id) && self.items.len() >= self.max_slots {
            return false;
        }
        let limit = self.stack_limit(item_id);
        let stack = self.items.entry(item_id.to_string()).or_insert(0);
        *stack = stack.saturating_add(quantity).min(limit);
        true
    }

    pub fn remove_item(&mut self, item_id: &str, quantity: u32) -> bool {
        let Some(stack) = self.items.get_mut(item_id) else {
            return false;
        };
        if *stack < quantity {
            return false;
        }
        *stack -= quantity;
        if *stack == 0 {
            self.items.remove(item_id);
        }
        true
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn has(&self, item_id: &str, quantity: u32) -> bool {
        self.count(item_id) >= quantity
    }

    pub fn remove_coins(&mut self, amount: i64) -> bool {
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_SLOTS)
    }
}

impl InventorySink for Inventory {
    fn add_coins(&mut self, amount: i64) {
        self.coins = self.coins.saturating_add(amount);
    }

    fn add_item(&mut self, item_id: &str, quantity: u32) -> bool {
        Inventory::add_item(self, item_id, quantity)
    }
}
