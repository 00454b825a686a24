//! Snapshot building: a read-only view of engine state for the presentation layer.

use pocketwild_core::combatant::Combatant;
use pocketwild_core::events::GameEvent;
use pocketwild_core::player::PlayerState;
use pocketwild_core::state::*;
use pocketwild_core::types::SimTime;

use crate::battle::BattleSession;
use crate::raid::RaidSession;
use crate::sequencer::StepSequencer;

pub fn combatant_view(c: &Combatant) -> CombatantView {
    CombatantView {
        id: c.id,
        species: c.species,
        name: c.name.clone(),
        sprite: c.sprite.clone(),
        level: c.level,
        hp: c.hp,
        max_hp: c.max_hp,
        status: c.status,
        merge_tier: c.merge_tier,
        is_egg: c.is_egg,
    }
}

fn player_view(player: &PlayerState) -> PlayerView {
    PlayerView {
        position: player.position,
        currency: player.currency,
        party: player.party.iter().map(combatant_view).collect(),
        stored: player.storage.len() as u32,
        steps: player.steps,
    }
}

fn battle_view(battle: &BattleSession, sequencer: &StepSequencer) -> BattleView {
    BattleView {
        kind: battle.kind,
        phase: battle.phase,
        enemy: combatant_view(&battle.enemy),
        active: battle.active_member(),
        busy: sequencer.is_busy(),
        step: sequencer.current().map(|s| s.name().to_string()),
    }
}

/// Build a complete snapshot. Takes ownership of the events drained for this update.
pub fn build_snapshot(
    time: &SimTime,
    player: &PlayerState,
    battle: Option<&BattleSession>,
    raid: Option<&RaidSession>,
    sequencer: &StepSequencer,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    let mode = if battle.is_some() {
        GameMode::Battle
    } else if raid.is_some() {
        GameMode::Raid
    } else {
        GameMode::Overworld
    };

    GameStateSnapshot {
        time: *time,
        mode,
        player: player_view(player),
        battle: battle.map(|b| battle_view(b, sequencer)),
        raid: raid.map(RaidSession::view),
        events,
    }
}
