//! Static move table keyed by (elemental type, tier).
//!
//! Tier 0 is the basic physical move of a type, tier 1 the stronger
//! physical move, tier 2 the status move. Combatants store `MoveKey`s;
//! the data is looked up here and never mutated.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_MOVES;
use crate::enums::{ElementType, MoveCategory, StatusCondition};

/// Number of tiers per type.
pub const MOVE_TIERS: u8 = 3;

/// Key into the move table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveKey {
    pub element: ElementType,
    pub tier: u8,
}

/// A status a move may inflict and its chance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffect {
    pub status: StatusCondition,
    pub chance: f64,
}

/// Immutable move data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveData {
    pub name: &'static str,
    pub element: ElementType,
    /// 0 for status moves.
    pub power: u32,
    pub category: MoveCategory,
    /// Base accuracy (0.0 - 1.0).
    pub accuracy: f64,
    pub inflicts: Option<StatusEffect>,
}

impl MoveKey {
    pub const fn new(element: ElementType, tier: u8) -> Self {
        Self { element, tier }
    }

    /// Look up the move this key refers to.
    pub fn data(self) -> MoveData {
        move_data(self)
    }
}

const NAMES: [[&str; 3]; 18] = [
    ["Tackle", "Body Slam", "Sing"],
    ["Ember", "Flamethrower", "Will-O-Wisp"],
    ["Water Gun", "Surf", "Chilling Mist"],
    ["Thunder Shock", "Thunderbolt", "Thunder Wave"],
    ["Vine Whip", "Razor Leaf", "Sleep Powder"],
    ["Powder Snow", "Ice Beam", "Freezing Gaze"],
    ["Karate Chop", "Cross Chop", "Nerve Strike"],
    ["Poison Sting", "Sludge Bomb", "Toxic"],
    ["Mud Slap", "Earthquake", "Sand Trap"],
    ["Peck", "Drill Peck", "Feather Dance"],
    ["Confusion", "Psychic", "Hypnosis"],
    ["Bug Bite", "X-Scissor", "Stun Spore"],
    ["Rock Throw", "Rock Slide", "Petrify"],
    ["Lick", "Shadow Ball", "Nightmare"],
    ["Dragon Rage", "Dragon Claw", "Dragon Glare"],
    ["Bite", "Crunch", "Dark Void"],
    ["Metal Claw", "Iron Tail", "Metal Sound"],
    ["Fairy Wind", "Moonblast", "Sweet Kiss"],
];

/// Status inflicted by each type's status move and its chance.
fn status_move_effect(element: ElementType) -> StatusEffect {
    use StatusCondition as S;
    let (status, chance) = match element {
        ElementType::Normal => (S::Asleep, 0.55),
        ElementType::Fire => (S::Burned, 0.85),
        ElementType::Water => (S::Frozen, 0.3),
        ElementType::Electric => (S::Paralyzed, 0.9),
        ElementType::Grass => (S::Asleep, 0.75),
        ElementType::Ice => (S::Frozen, 0.4),
        ElementType::Fighting => (S::Paralyzed, 0.6),
        ElementType::Poison => (S::Poisoned, 0.9),
        ElementType::Ground => (S::Paralyzed, 0.5),
        ElementType::Flying => (S::Paralyzed, 0.4),
        ElementType::Psychic => (S::Asleep, 0.6),
        ElementType::Bug => (S::Paralyzed, 0.75),
        ElementType::Rock => (S::Paralyzed, 0.5),
        ElementType::Ghost => (S::Asleep, 0.5),
        ElementType::Dragon => (S::Paralyzed, 0.7),
        ElementType::Dark => (S::Asleep, 0.5),
        ElementType::Steel => (S::Paralyzed, 0.4),
        ElementType::Fairy => (S::Asleep, 0.5),
    };
    StatusEffect { status, chance }
}

/// Secondary effect on a type's basic physical move, if any.
fn basic_move_effect(element: ElementType) -> Option<StatusEffect> {
    use StatusCondition as S;
    match element {
        ElementType::Fire => Some(StatusEffect { status: S::Burned, chance: 0.1 }),
        ElementType::Electric => Some(StatusEffect { status: S::Paralyzed, chance: 0.1 }),
        ElementType::Poison => Some(StatusEffect { status: S::Poisoned, chance: 0.3 }),
        ElementType::Ice => Some(StatusEffect { status: S::Frozen, chance: 0.1 }),
        ElementType::Ghost => Some(StatusEffect { status: S::Paralyzed, chance: 0.3 }),
        _ => None,
    }
}

/// Look up a move. Tiers past the last one clamp to the status move.
pub fn move_data(key: MoveKey) -> MoveData {
    let names = NAMES[key.element.index()];
    match key.tier {
        0 => MoveData {
            name: names[0],
            element: key.element,
            power: 40,
            category: MoveCategory::Physical,
            accuracy: 1.0,
            inflicts: basic_move_effect(key.element),
        },
        1 => MoveData {
            name: names[1],
            element: key.element,
            power: 80,
            category: MoveCategory::Physical,
            accuracy: 0.9,
            inflicts: None,
        },
        _ => MoveData {
            name: names[2],
            element: key.element,
            power: 0,
            category: MoveCategory::Status,
            accuracy: 0.85,
            inflicts: Some(status_move_effect(key.element)),
        },
    }
}

/// Moves learned by a combatant of the given types at the given level.
pub fn moveset_for(types: &[ElementType], level: u32) -> Vec<MoveKey> {
    let primary = types.first().copied().unwrap_or_default();
    let mut moves = vec![MoveKey::new(primary, 0)];

    fn push(key: MoveKey, moves: &mut Vec<MoveKey>) {
        if moves.len() < MAX_MOVES && !moves.contains(&key) {
            moves.push(key);
        }
    }

    push(MoveKey::new(ElementType::Normal, 0), &mut moves);
    if let Some(&secondary) = types.get(1) {
        push(MoveKey::new(secondary, 0), &mut moves);
    }
    if level >= 10 {
        push(MoveKey::new(primary, 2), &mut moves);
    }
    if level >= 20 {
        // Stronger move replaces the generic tackle.
        moves.retain(|k| *k != MoveKey::new(ElementType::Normal, 0) || primary == ElementType::Normal);
        push(MoveKey::new(primary, 1), &mut moves);
    }
    moves
}
