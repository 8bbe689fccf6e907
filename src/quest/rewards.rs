//! Reward dispatch
//!
//! A bundle is fanned out sink by sink with no rollback: a failure in one
//! portion never undoes or blocks the others, and never blocks completion.

use tracing::{debug, warn};

use super::definition::RewardBundle;
use super::sinks::{RewardSinks, Severity};

pub const PET_ADOPTED_MESSAGE: &str = "🐾 New Companion Adopted!";

/// What actually reached the collaborators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardReceipt {
    pub coins: i64,
    pub items_delivered: Vec<String>,
    /// Items the inventory refused, or that had no inventory to go to
    pub items_lost: Vec<String>,
    pub xp: i64,
    pub friendship: Vec<(String, i32)>,
    pub pet_adopted: Option<String>,
}

/// Push a reward bundle out to every available sink
pub fn grant_rewards(bundle: &RewardBundle, sinks: &mut RewardSinks) -> RewardReceipt {
    let mut receipt = RewardReceipt::default();

    if bundle.coins != 0 {
        if let Some(inventory) = sinks.inventory.as_mut() {
            inventory.add_coins(bundle.coins);
            receipt.coins = bundle.coins;
        }
    }

    for item_id in &bundle.items {
        let delivered = match sinks.inventory.as_mut() {
            Some(inventory) => inventory.add_item(item_id, 1),
            None => false,
        };
        if delivered {
            receipt.items_delivered.push(item_id.clone());
        } else {
            receipt.items_lost.push(item_id.clone());
        }
    }

    if bundle.xp != 0 {
        if let Some(player) = sinks.player.as_mut() {
            player.add_xp(bundle.xp);
            receipt.xp = bundle.xp;
        }
    }

    if let Some(social) = sinks.social.as_mut() {
        for (npc_id, amount) in &bundle.friendship {
            social.add_friendship(npc_id, *amount);
            receipt.friendship.push((npc_id.clone(), *amount));
        }
    }

    if let Some(pet_id) = &bundle.pet {
        let adopted = sinks
            .pets
            .as_mut()
            .map(|pets| pets.adopt(pet_id))
            .unwrap_or(false);
        if adopted {
            receipt.pet_adopted = Some(pet_id.clone());
            sinks.notify(PET_ADOPTED_MESSAGE, Severity::Success);
        } else {
            debug!("Pet reward '{}' was not adopted", pet_id);
        }
    }

    if !receipt.items_lost.is_empty() {
        warn!("Reward items not delivered: {:?}", receipt.items_lost);
        let message = format!("Could not receive: {}", receipt.items_lost.join(", "));
        sinks.notify(&message, Severity::Warning);
    }

    receipt
}
