//! Events emitted by the rules for the presentation layer.
//!
//! Rule modules push typed events into an output queue; the engine hands
//! the queue over with each snapshot. Nothing reads a return value back.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{CombatantId, Position, SpeciesId, TileCoord};

/// Reference to a battle participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "side")]
pub enum Participant {
    Player { id: CombatantId },
    Enemy,
}

/// Typed game event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    // --- Battle ---
    EncounterStarted { species: SpeciesId, level: u32, kind: EncounterKind },
    TurnStarted { actor: Participant },
    MoveUsed { actor: Participant, name: String },
    MoveMissed { actor: Participant },
    DamageApplied {
        target: Participant,
        amount: u32,
        remaining_hp: u32,
        effectiveness: f64,
    },
    CriticalHit { target: Participant },
    StatusInflicted { target: Participant, status: StatusCondition },
    StatusDamage { target: Participant, status: StatusCondition, amount: u32 },
    ActionBlocked { actor: Participant, status: StatusCondition },
    StatusCured { target: Participant, status: StatusCondition },
    Fainted { target: Participant },
    CaptureShake { shake: u32 },
    CaptureSucceeded { species: SpeciesId, placement_storage: bool },
    CaptureFailed { shakes: u32 },
    BattleEnded { outcome: BattleOutcome },
    XpGained { id: CombatantId, amount: u32 },
    LevelUp { id: CombatantId, level: u32 },
    Evolved { id: CombatantId, from: SpeciesId, into: SpeciesId },

    // --- Raid ---
    RaidStarted { defenders: u32 },
    EnemySpawned { position: Position },
    TurretFired { slot: usize },
    EnemyDefeated { position: Position },
    BaseDamaged { health: f64 },
    DefenderAssigned { slot: usize, id: CombatantId },
    DefenderFainted { slot: usize, id: CombatantId },
    RaidEnded { outcome: RaidOutcome },

    // --- World & roster ---
    NodeHarvested { tile: TileCoord, node: NodeKind, depleted: bool },
    NodeRespawned { tile: TileCoord, node: NodeKind },
    ItemReceived { item: ItemKind, amount: u32 },
    /// Items that did not fit in the bag and were left behind.
    ItemDropped { item: ItemKind, amount: u32 },
    Merged { id: CombatantId, tier: u8 },
    EggLaid { id: CombatantId },
    EggHatched { id: CombatantId, species: SpeciesId },

    // --- Presentation sinks ---
    /// Transient message.
    Message { text: String, duration_ms: u32 },
    /// Audio/visual effect cue.
    PlayEffect { id: String },
    /// Something visible changed.
    Redraw,
}

impl GameEvent {
    /// Transient message with the default duration.
    pub fn message(text: impl Into<String>) -> Self {
        GameEvent::Message {
            text: text.into(),
            duration_ms: crate::constants::MESSAGE_DURATION_MS,
        }
    }
}
