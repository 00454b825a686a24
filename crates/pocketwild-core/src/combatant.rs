//! Combatant: a player creature or an enemy.
//!
//! Invariant: `hp` stays in `[0, max_hp]` through every mutation below.
//! `hp == 0` means fainted; a fainted combatant is never deleted, only
//! excluded from turn order and targeting until healed.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_MOVES, STAT_MAX, XP_PER_LEVEL};
use crate::dex::SpeciesInfo;
use crate::enums::{ElementType, StatusCondition};
use crate::moves::{moveset_for, MoveKey};
use crate::types::{CombatantId, SpeciesId};

/// Stat block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u32,
    pub defense: u32,
    pub speed: u32,
    pub special: u32,
}

impl Stats {
    pub fn new(strength: u32, defense: u32, speed: u32, special: u32) -> Self {
        Self {
            strength,
            defense,
            speed,
            special,
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Stats) -> Stats {
        Stats {
            strength: self.strength.max(other.strength),
            defense: self.defense.max(other.defense),
            speed: self.speed.max(other.speed),
            special: self.special.max(other.special),
        }
    }

    /// Multiply every stat, rounding to nearest.
    pub fn scaled(&self, factor: f64) -> Stats {
        let s = |v: u32| (v as f64 * factor).round() as u32;
        Stats {
            strength: s(self.strength),
            defense: s(self.defense),
            speed: s(self.speed),
            special: s(self.special),
        }
    }

    /// Add per-stat increments, capping at `STAT_MAX` unless the stat already exceeds it.
    pub fn grow(&mut self, inc: [u32; 4]) {
        let g = |v: &mut u32, d: u32| {
            if *v < STAT_MAX {
                *v = (*v + d).min(STAT_MAX);
            }
        };
        g(&mut self.strength, inc[0]);
        g(&mut self.defense, inc[1]);
        g(&mut self.speed, inc[2]);
        g(&mut self.special, inc[3]);
    }
}

/// A creature, owned by the player or fought as an enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub species: SpeciesId,
    pub name: String,
    pub types: Vec<ElementType>,
    pub sprite: String,
    pub level: u32,
    pub xp: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub stats: Stats,
    pub status: StatusCondition,
    pub moves: Vec<MoveKey>,
    #[serde(default)]
    pub merge_tier: u8,
    #[serde(default)]
    pub is_egg: bool,
    /// Steps left before an egg hatches.
    #[serde(default)]
    pub hatch_steps: u32,
    /// Steps left before this combatant can breed again.
    #[serde(default)]
    pub breed_cooldown: u32,
    #[serde(default)]
    pub shiny: bool,
}

/// Max HP for a level and defense stat.
pub fn max_hp_for(level: u32, defense: u32) -> u32 {
    10 + level * 3 + defense / 5
}

impl Combatant {
    /// Build a combatant from species data, a level and a stat block. Starts at full HP.
    pub fn from_species(id: CombatantId, info: &SpeciesInfo, level: u32, stats: Stats) -> Self {
        let max_hp = max_hp_for(level, stats.defense);
        Self {
            id,
            species: info.id,
            name: info.name.clone(),
            types: info.types.clone(),
            sprite: info.sprites.normal.clone(),
            level,
            xp: 0,
            hp: max_hp,
            max_hp,
            stats,
            status: StatusCondition::None,
            moves: moveset_for(&info.types, level),
            merge_tier: 0,
            is_egg: false,
            hatch_steps: 0,
            breed_cooldown: 0,
            shiny: false,
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Alive and hatched.
    pub fn can_act(&self) -> bool {
        !self.is_fainted() && !self.is_egg
    }

    pub fn primary_type(&self) -> ElementType {
        self.types.first().copied().unwrap_or_default()
    }

    /// Apply damage, clamped at 0. Returns the HP actually removed.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.hp);
        self.hp -= applied;
        applied
    }

    /// Restore HP, clamped at `max_hp`. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += restored;
        restored
    }

    /// Full restore: HP to max and status cleared.
    pub fn heal_full(&mut self) {
        self.hp = self.max_hp;
        self.status = StatusCondition::None;
    }

    /// Change max HP, keeping `hp` within bounds.
    pub fn set_max_hp(&mut self, max_hp: u32) {
        self.max_hp = max_hp.max(1);
        self.hp = self.hp.min(self.max_hp);
    }

    /// XP needed to reach the next level.
    pub fn xp_to_next(&self) -> u32 {
        self.level * XP_PER_LEVEL
    }

    /// Fraction of HP remaining (0.0 - 1.0).
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }

    /// Move in a slot, if any.
    pub fn move_in_slot(&self, slot: usize) -> Option<MoveKey> {
        if slot < MAX_MOVES {
            self.moves.get(slot).copied()
        } else {
            None
        }
    }
}
