//! Breeding party members into eggs, and hatching eggs by walking.

use log::{info, warn};

use pocketwild_core::combatant::{max_hp_for, Combatant};
use pocketwild_core::constants::{BREED_COOLDOWN_STEPS, EGG_HATCH_STEPS};
use pocketwild_core::dex::SpeciesProvider;
use pocketwild_core::enums::StatusCondition;
use pocketwild_core::error::GameError;
use pocketwild_core::events::GameEvent;
use pocketwild_core::moves::moveset_for;
use pocketwild_core::player::PlayerState;
use pocketwild_core::types::CombatantId;

const EGG_NAME: &str = "Egg";
const EGG_SPRITE: &str = "sprites/egg.png";

fn parent(player: &PlayerState, id: CombatantId) -> Result<&Combatant, GameError> {
    let c = player.party.iter().find(|c| c.id == id).ok_or_else(|| {
        if player.combatant(id).is_some() {
            GameError::NotInParty(id)
        } else {
            GameError::UnknownCombatant(id)
        }
    })?;
    if c.is_egg {
        return Err(GameError::IsEgg);
    }
    if c.breed_cooldown > 0 {
        return Err(GameError::BreedingCooldown);
    }
    Ok(c)
}

/// Breed two distinct party members of the same primary type.
/// The offspring is an egg of the first parent's species carrying the
/// component-wise maximum of both parents' stats.
pub fn breed(
    player: &mut PlayerState,
    a: CombatantId,
    b: CombatantId,
    events: &mut Vec<GameEvent>,
) -> Result<CombatantId, GameError> {
    if a == b {
        return Err(GameError::NotEnoughInputs { needed: 2, got: 1 });
    }
    let pa = parent(player, a)?;
    let pb = parent(player, b)?;
    if pa.primary_type() != pb.primary_type() {
        return Err(GameError::TypeMismatch);
    }
    if !player.has_room() {
        return Err(GameError::StorageFull);
    }

    let stats = pa.stats.max(&pb.stats);
    let max_hp = max_hp_for(1, stats.defense);
    let egg_id = CombatantId(player.next_combatant_id);
    let egg = Combatant {
        id: egg_id,
        species: pa.species,
        name: EGG_NAME.to_string(),
        types: pa.types.clone(),
        sprite: EGG_SPRITE.to_string(),
        level: 1,
        xp: 0,
        hp: max_hp,
        max_hp,
        stats,
        status: StatusCondition::None,
        moves: Vec::new(),
        merge_tier: 0,
        is_egg: true,
        hatch_steps: EGG_HATCH_STEPS,
        breed_cooldown: 0,
        shiny: false,
    };

    player.allocate_id();
    for id in [a, b] {
        if let Some(p) = player.party_member_mut(id) {
            p.breed_cooldown = BREED_COOLDOWN_STEPS;
        }
    }
    player.receive(egg).map_err(|(e, _)| e)?;

    info!("Bred {a:?} and {b:?} into egg {egg_id:?}");
    events.push(GameEvent::EggLaid { id: egg_id });
    Ok(egg_id)
}

/// Count down breeding cooldowns, egg timers and the rival cooldown by `steps`.
/// Eggs reaching zero hatch; if species data is unavailable the egg waits
/// for a later step.
pub fn advance_steps(
    player: &mut PlayerState,
    steps: u32,
    provider: &dyn SpeciesProvider,
    events: &mut Vec<GameEvent>,
) {
    player.steps += steps as u64;
    player.rival_cooldown = player.rival_cooldown.saturating_sub(steps);

    for c in player.party.iter_mut().chain(player.storage.iter_mut()) {
        c.breed_cooldown = c.breed_cooldown.saturating_sub(steps);
        if !c.is_egg {
            continue;
        }
        c.hatch_steps = c.hatch_steps.saturating_sub(steps);
        if c.hatch_steps > 0 {
            continue;
        }
        match provider.lookup(c.species) {
            Ok(info) => {
                c.is_egg = false;
                c.name = info.name.clone();
                c.sprite = info.sprites.normal.clone();
                c.moves = moveset_for(&c.types, c.level);
                c.heal_full();
                info!("Egg {:?} hatched into {}", c.id, info.name);
                events.push(GameEvent::EggHatched {
                    id: c.id,
                    species: c.species,
                });
            }
            Err(e) => warn!("Egg {:?} could not hatch yet: {e}", c.id),
        }
    }
}
