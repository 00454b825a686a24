//! Bag and storage containers.
//!
//! The bag is an ordered map so iteration (display, saves, tests) follows
//! `ItemKind` declaration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::constants::{ITEM_STACK_MAX, STORAGE_BOXES, STORAGE_BOX_SLOTS};
use crate::enums::ItemKind;
use crate::error::GameError;
use crate::types::CombatantId;

/// Item bag. Each kind stacks up to `ITEM_STACK_MAX`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<ItemKind, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.items.get(&kind).copied().unwrap_or(0)
    }

    /// Add up to `amount`. Returns how many did not fit.
    pub fn add(&mut self, kind: ItemKind, amount: u32) -> u32 {
        let current = self.count(kind);
        let fits = amount.min(ITEM_STACK_MAX.saturating_sub(current));
        if fits > 0 {
            self.items.insert(kind, current + fits);
        }
        amount - fits
    }

    /// Remove `amount`, or nothing if the bag holds fewer.
    pub fn take(&mut self, kind: ItemKind, amount: u32) -> Result<(), GameError> {
        let current = self.count(kind);
        if current < amount {
            return Err(GameError::ItemMissing(kind));
        }
        if current == amount {
            self.items.remove(&kind);
        } else {
            self.items.insert(kind, current - amount);
        }
        Ok(())
    }

    /// Items in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.items.iter().map(|(k, v)| (*k, *v))
    }
}

/// PC storage: a grid of boxes, each with a fixed number of slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    boxes: Vec<Vec<Option<Combatant>>>,
}

impl Default for Storage {
    fn default() -> Self {
        Self::with_capacity(STORAGE_BOXES, STORAGE_BOX_SLOTS)
    }
}

impl Storage {
    pub fn with_capacity(boxes: usize, slots: usize) -> Self {
        Self {
            boxes: vec![vec![None; slots]; boxes],
        }
    }

    pub fn capacity(&self) -> usize {
        self.boxes.iter().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Deposit into the first free slot. Hands the combatant back when full.
    pub fn deposit(&mut self, combatant: Combatant) -> Result<(usize, usize), Combatant> {
        for (b, slots) in self.boxes.iter_mut().enumerate() {
            if let Some(s) = slots.iter().position(Option::is_none) {
                slots[s] = Some(combatant);
                return Ok((b, s));
            }
        }
        Err(combatant)
    }

    /// Remove a combatant by id.
    pub fn withdraw(&mut self, id: CombatantId) -> Option<Combatant> {
        self.boxes
            .iter_mut()
            .flat_map(|slots| slots.iter_mut())
            .find(|slot| slot.as_ref().is_some_and(|c| c.id == id))
            .and_then(Option::take)
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.iter_mut().find(|c| c.id == id)
    }

    /// Stored combatants in box/slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.boxes.iter().flatten().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.boxes.iter_mut().flatten().flatten()
    }
}
