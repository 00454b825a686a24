//! Game state snapshot: the visible state handed to the presentation layer after each update.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{CombatantId, Position, SimTime, SpeciesId};

/// Which subsystem currently owns player input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Overworld,
    Battle,
    Raid,
}

/// Complete visible state after an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub mode: GameMode,
    pub player: PlayerView,
    pub battle: Option<BattleView>,
    pub raid: Option<RaidView>,
    pub events: Vec<GameEvent>,
}

/// Summary of a combatant for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatantView {
    pub id: CombatantId,
    pub species: SpeciesId,
    pub name: String,
    pub sprite: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub status: StatusCondition,
    pub merge_tier: u8,
    pub is_egg: bool,
}

/// Player overview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub currency: u32,
    pub party: Vec<CombatantView>,
    pub stored: u32,
    pub steps: u64,
}

/// Battle overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleView {
    pub kind: EncounterKind,
    pub phase: BattlePhase,
    pub enemy: CombatantView,
    /// Party member whose turn it is, when waiting for input.
    pub active: Option<CombatantId>,
    /// An action sequence is still playing.
    pub busy: bool,
    /// Name of the sequencer step being shown.
    pub step: Option<String>,
}

/// Raid overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaidView {
    pub remaining_secs: f64,
    pub base_health: f64,
    pub base_health_max: f64,
    pub turrets: Vec<Option<CombatantId>>,
    pub enemies: Vec<Position>,
    pub projectiles: Vec<Position>,
}
