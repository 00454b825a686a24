//! Enumeration types used throughout the game rules.

use serde::{Deserialize, Serialize};

/// Elemental type of a species or move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    #[default]
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl ElementType {
    pub const ALL: [ElementType; 18] = [
        ElementType::Normal,
        ElementType::Fire,
        ElementType::Water,
        ElementType::Electric,
        ElementType::Grass,
        ElementType::Ice,
        ElementType::Fighting,
        ElementType::Poison,
        ElementType::Ground,
        ElementType::Flying,
        ElementType::Psychic,
        ElementType::Bug,
        ElementType::Rock,
        ElementType::Ghost,
        ElementType::Dragon,
        ElementType::Dark,
        ElementType::Steel,
        ElementType::Fairy,
    ];

    /// Row/column index into the type chart.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Major status condition. Only one can be active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCondition {
    #[default]
    None,
    Poisoned,
    Paralyzed,
    Burned,
    Asleep,
    Frozen,
}

impl StatusCondition {
    pub fn is_none(self) -> bool {
        self == StatusCondition::None
    }

    /// Conditions that fully block the afflicted combatant's action.
    pub fn blocks_action(self) -> bool {
        matches!(self, StatusCondition::Asleep | StatusCondition::Frozen)
    }
}

/// Move category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    #[default]
    Physical,
    /// Deals no damage; may inflict a status condition.
    Status,
}

/// What triggered an encounter. Affects enemy scaling, capture and fleeing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterKind {
    #[default]
    Wild,
    Boss,
    Arena,
    Trainer,
}

impl EncounterKind {
    /// Only wild encounters can be captured or fled from.
    pub fn is_wild(self) -> bool {
        self == EncounterKind::Wild
    }
}

/// Which side of a battle a turn-queue entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleSide {
    Player,
    Enemy,
}

/// Battle state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Idle,
    /// Waiting for the player to pick an action for the current combatant.
    PlayerTurn,
    /// The enemy acts once the current sequence has finished.
    EnemyTurn,
    Won,
    Lost,
    Fled,
    Captured,
}

impl BattlePhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BattlePhase::Won | BattlePhase::Lost | BattlePhase::Fled | BattlePhase::Captured
        )
    }
}

/// Final result of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Won,
    Lost,
    Fled,
    Captured,
    /// Ended defensively because no valid target remained.
    Aborted,
}

/// Final result of a raid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaidOutcome {
    Won,
    Lost,
}

/// Capture ball variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallKind {
    #[default]
    Poke,
    Great,
    Ultra,
    Master,
}

impl BallKind {
    /// Catch-rate constant. A rate of 255 or more always succeeds.
    pub fn catch_rate(self) -> f64 {
        match self {
            BallKind::Poke => 1.0,
            BallKind::Great => 1.5,
            BallKind::Ultra => 2.0,
            BallKind::Master => 255.0,
        }
    }

    pub fn item(self) -> ItemKind {
        match self {
            BallKind::Poke => ItemKind::PokeBall,
            BallKind::Great => ItemKind::GreatBall,
            BallKind::Ultra => ItemKind::UltraBall,
            BallKind::Master => ItemKind::MasterBall,
        }
    }
}

/// Bag item kinds. Declaration order is the bag's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    PokeBall,
    GreatBall,
    UltraBall,
    MasterBall,
    Potion,
    SuperPotion,
    Berry,
    Wood,
    Stone,
    IronOre,
    GoldOre,
    Crystal,
}

/// World tile classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Water,
    Sand,
    #[default]
    Grass,
    TallGrass,
    Forest,
    Mountain,
    Snow,
    /// Rare fixed structure (ruins, shrines).
    Structure,
}

impl TileKind {
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Water | TileKind::Mountain)
    }
}

/// Harvestable resource node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Tree,
    Rock,
    IronVein,
    GoldVein,
    CrystalVein,
}

impl NodeKind {
    pub fn max_hp(self) -> u32 {
        match self {
            NodeKind::Tree => 3,
            NodeKind::Rock => 4,
            NodeKind::IronVein => 6,
            NodeKind::GoldVein => 8,
            NodeKind::CrystalVein => 10,
        }
    }

    pub fn loot(self) -> ItemKind {
        match self {
            NodeKind::Tree => ItemKind::Wood,
            NodeKind::Rock => ItemKind::Stone,
            NodeKind::IronVein => ItemKind::IronOre,
            NodeKind::GoldVein => ItemKind::GoldOre,
            NodeKind::CrystalVein => ItemKind::Crystal,
        }
    }
}
