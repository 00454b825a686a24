//! Player state: roster, bag, currency, position and progress counters.
//!
//! This is the single owned application state the rule modules mutate.
//! It is plain data and serializes directly into save records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::constants::{PARTY_SIZE, POTION_HEAL, STARTING_CURRENCY};
use crate::enums::ItemKind;
use crate::error::GameError;
use crate::inventory::{Inventory, Storage};
use crate::types::{CombatantId, Position, SpeciesId};

/// Where a newly obtained combatant ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Party,
    Storage,
}

/// Player-owned state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Position,
    pub currency: u32,
    pub party: Vec<Combatant>,
    pub storage: Storage,
    pub inventory: Inventory,
    pub seen: BTreeSet<SpeciesId>,
    pub caught: BTreeSet<SpeciesId>,
    /// Total world-movement steps taken.
    pub steps: u64,
    pub next_combatant_id: u64,
    pub home: Position,
    #[serde(default)]
    pub arena_stage: u32,
    /// Steps until the rival can be challenged again.
    #[serde(default)]
    pub rival_cooldown: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        let mut inventory = Inventory::new();
        inventory.add(ItemKind::PokeBall, 10);
        inventory.add(ItemKind::Potion, 3);
        Self {
            position: Position::default(),
            currency: STARTING_CURRENCY,
            party: Vec::new(),
            storage: Storage::default(),
            inventory,
            seen: BTreeSet::new(),
            caught: BTreeSet::new(),
            steps: 0,
            next_combatant_id: 1,
            home: Position::default(),
            arena_stage: 0,
            rival_cooldown: 0,
        }
    }
}

impl PlayerState {
    /// Allocate a fresh combatant id.
    pub fn allocate_id(&mut self) -> CombatantId {
        let id = CombatantId(self.next_combatant_id);
        self.next_combatant_id += 1;
        id
    }

    /// Add a combatant to the party, or to storage when the party is full.
    /// Rejected (and handed back) only when both are full.
    pub fn receive(&mut self, combatant: Combatant) -> Result<Placement, (GameError, Combatant)> {
        if self.party.len() < PARTY_SIZE {
            self.party.push(combatant);
            return Ok(Placement::Party);
        }
        match self.storage.deposit(combatant) {
            Ok(_) => Ok(Placement::Storage),
            Err(combatant) => Err((GameError::StorageFull, combatant)),
        }
    }

    /// Whether one more combatant can be received.
    pub fn has_room(&self) -> bool {
        self.party.len() < PARTY_SIZE || !self.storage.is_full()
    }

    /// Remove a combatant from party or storage.
    pub fn remove(&mut self, id: CombatantId) -> Option<Combatant> {
        if let Some(idx) = self.party.iter().position(|c| c.id == id) {
            return Some(self.party.remove(idx));
        }
        self.storage.withdraw(id)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.party
            .iter()
            .find(|c| c.id == id)
            .or_else(|| self.storage.get(id))
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        if let Some(idx) = self.party.iter().position(|c| c.id == id) {
            return self.party.get_mut(idx);
        }
        self.storage.get_mut(id)
    }

    pub fn party_member_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.party.iter_mut().find(|c| c.id == id)
    }

    pub fn in_party(&self, id: CombatantId) -> bool {
        self.party.iter().any(|c| c.id == id)
    }

    /// Party members able to fight.
    pub fn living_party(&self) -> impl Iterator<Item = &Combatant> {
        self.party.iter().filter(|c| c.can_act())
    }

    pub fn has_living_party(&self) -> bool {
        self.living_party().next().is_some()
    }

    /// Average level of hatched party members (1.0 for an empty party).
    pub fn average_party_level(&self) -> f64 {
        let levels: Vec<u32> = self
            .party
            .iter()
            .filter(|c| !c.is_egg)
            .map(|c| c.level)
            .collect();
        if levels.is_empty() {
            1.0
        } else {
            levels.iter().sum::<u32>() as f64 / levels.len() as f64
        }
    }

    /// Deduct currency or fail without change.
    pub fn spend(&mut self, amount: u32) -> Result<(), GameError> {
        if self.currency < amount {
            return Err(GameError::InsufficientCurrency {
                have: self.currency,
                need: amount,
            });
        }
        self.currency -= amount;
        Ok(())
    }

    /// Spend a potion on an owned, hatched combatant. Returns whether it was
    /// fainted before the heal. Nothing changes on error.
    pub fn use_potion(&mut self, target: CombatantId) -> Result<bool, GameError> {
        let c = self
            .combatant(target)
            .ok_or(GameError::UnknownCombatant(target))?;
        if c.is_egg {
            return Err(GameError::IsEgg);
        }
        let was_fainted = c.is_fainted();
        self.inventory.take(ItemKind::Potion, 1)?;
        if let Some(c) = self.combatant_mut(target) {
            c.heal(POTION_HEAL);
        }
        Ok(was_fainted)
    }

    /// Full restore for the party and storage.
    pub fn heal_all(&mut self) {
        for c in self.party.iter_mut().chain(self.storage.iter_mut()) {
            c.heal_full();
        }
    }

    /// All owned combatants: party first, then storage.
    pub fn all_combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.party.iter().chain(self.storage.iter())
    }
}
