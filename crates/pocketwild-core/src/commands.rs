//! Player commands sent from the presentation layer to the engine.
//!
//! Commands are queued and processed at the start of the next update.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{CombatantId, SpeciesId};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Pick the first combatant of a new game.
    ChooseStarter { species: SpeciesId },

    // --- Overworld ---
    /// Walk one tile.
    Move { dx: i32, dy: i32 },
    /// Hit the resource node on a tile.
    Harvest { x: i32, y: i32 },
    /// Restore HP of a roster member with a potion.
    UsePotion { target: CombatantId },

    // --- Battle ---
    /// Start an encounter against a species.
    StartEncounter { species: SpeciesId, kind: EncounterKind },
    /// Use the move in a slot with the combatant whose turn it is.
    UseMove { slot: usize },
    /// Throw a ball at the wild enemy.
    ThrowBall { ball: BallKind },
    /// Flee a wild encounter.
    RunAway,

    // --- Raid ---
    StartRaid,

    // --- Roster ---
    /// Merge three same-species combatants into one of a higher tier.
    Merge { ids: Vec<CombatantId> },
    /// Breed two party members.
    Breed { a: CombatantId, b: CombatantId },
}
