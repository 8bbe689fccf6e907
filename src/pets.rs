//! Pet roster: adoptable species and the pets the player owns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::quest::PetSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub happiness: u32,
    pub hunger: u32,
    pub energy: u32,
}

/// An adoptable species
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetSpecies {
    pub id: String,
    pub base_stats: BaseStats,
}

impl PetSpecies {
    pub fn new(id: &str, happiness: u32, hunger: u32, energy: u32) -> Self {
        Self {
            id: id.to_string(),
            base_stats: BaseStats {
                happiness,
                hunger,
                energy,
            },
        }
    }
}

/// The village's companions
pub fn default_species() -> Vec<PetSpecies> {
    vec![
        PetSpecies::new("sheepdog", 80, 50, 100),
        PetSpecies::new("mountain_cat", 70, 60, 80),
        PetSpecies::new("snow_hare", 90, 70, 120),
        PetSpecies::new("baby_eagle", 60, 80, 90),
        PetSpecies::new("baby_goat", 85, 40, 110),
        PetSpecies::new("fireflies", 100, 0, 100),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedPet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub happiness: u32,
    pub hunger: u32,
    pub energy: u32,
    pub affection: u32,
    pub adopted_day: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PetRoster {
    #[serde(skip)]
    species: BTreeMap<String, PetSpecies>,
    owned_pets: Vec<OwnedPet>,
    #[serde(rename = "activePetId")]
    active_pet: Option<String>,
    /// Day stamped onto newly adopted pets
    #[serde(skip)]
    day: u32,
}

impl PetRoster {
    pub fn new(species: impl IntoIterator<Item = PetSpecies>) -> Self {
        Self {
            species: species.into_iter().map(|s| (s.id.clone(), s)).collect(),
            owned_pets: Vec::new(),
            active_pet: None,
            day: 1,
        }
    }

    pub fn set_day(&mut self, day: u32) {
        self.day = day.max(1);
    }

    pub fn is_known(&self, pet_id: &str) -> bool {
        self.species.contains_key(pet_id)
    }

    pub fn owns(&self, pet_id: &str) -> bool {
        self.owned_pets.iter().any(|p| p.id == pet_id)
    }

    pub fn adopt(&mut self, pet_id: &str, custom_name: Option<String>) -> bool {
        if self.owns(pet_id) {
            return false;
        }
        let Some(species) = self.species.get(pet_id) else {
            warn!("Cannot adopt unknown pet '{}'", pet_id);
            return false;
        };

        let stats = species.base_stats;
        self.owned_pets.push(OwnedPet {
            id: pet_id.to_string(),
            custom_name,
            happiness: stats.happiness,
            hunger: stats.hunger,
            energy: stats.energy,
            affection: 0,
            adopted_day: self.day,
        });
        if self.active_pet.is_none() {
            self.active_pet = Some(pet_id.to_string());
        }
        info!("Adopted pet {} on day {}", pet_id, self.day);
        true
    }

    pub fn set_active(&mut self, pet_id: &str) -> bool {
        if !self.owns(pet_id) {
            return false;
        }
        self.active_pet = Some(pet_id.to_string());
        true
    }

    pub fn active(&self) -> Option<&OwnedPet> {
        let id = self.active_pet.as_deref()?;
        self.owned_pets.iter().find(|p| p.id == id)
    }

    pub fn owned(&self) -> &[OwnedPet] {
        &self.owned_pets
    }

    /// Restore owned pets from a save, keeping the species table
    pub fn load_save_data(&mut self, saved: PetRoster) {
        self.owned_pets = saved.owned_pets;
        self.active_pet = saved.active_pet.filter(|id| self.owned_pets.iter().any(|p| &p.id == id));
    }
}

impl PetSink for PetRoster {
    fn adopt(&mut self, pet_id: &str) -> bool {
        PetRoster::adopt(self, pet_id, None)
    }
}
