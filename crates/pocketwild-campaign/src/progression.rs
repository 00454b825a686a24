//! Experience, level-up stat growth and level-gated evolution.

use log::{info, warn};
use rand::Rng;

use pocketwild_core::combatant::Combatant;
use pocketwild_core::constants::MAX_LEVEL;
use pocketwild_core::dex::SpeciesProvider;
use pocketwild_core::error::ProviderError;
use pocketwild_core::events::GameEvent;
use pocketwild_core::moves::moveset_for;

/// Split `total` XP evenly across `recipients`, at least 1 each.
pub fn split_xp(total: u32, recipients: usize) -> u32 {
    if recipients == 0 {
        return 0;
    }
    (total / recipients as u32).max(1)
}

/// Apply one level: small random increments per stat, more max HP, healed by the same amount.
pub fn level_up(combatant: &mut Combatant, rng: &mut impl Rng) {
    combatant.level += 1;
    let inc = [
        rng.gen_range(1..=3),
        rng.gen_range(1..=3),
        rng.gen_range(1..=3),
        rng.gen_range(1..=3),
    ];
    combatant.stats.grow(inc);

    let hp_gain = rng.gen_range(3..=5);
    combatant.set_max_hp(combatant.max_hp + hp_gain);
    if !combatant.is_fainted() {
        combatant.heal(hp_gain);
    }
    combatant.moves = moveset_for(&combatant.types, combatant.level);
}

/// Award XP, levelling up for every `level * 100` threshold crossed.
/// Returns the number of levels gained.
pub fn award_xp(
    combatant: &mut Combatant,
    xp: u32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> u32 {
    if combatant.is_egg || xp == 0 {
        return 0;
    }
    combatant.xp = combatant.xp.saturating_add(xp);
    events.push(GameEvent::XpGained {
        id: combatant.id,
        amount: xp,
    });

    let mut gained = 0;
    while combatant.level < MAX_LEVEL && combatant.xp >= combatant.xp_to_next() {
        combatant.xp -= combatant.xp_to_next();
        level_up(combatant, rng);
        gained += 1;
        events.push(GameEvent::LevelUp {
            id: combatant.id,
            level: combatant.level,
        });
    }
    gained
}

/// Evolve the combatant if its species has an evolution entry and the level gate is met.
/// Provider failures abort the attempt and leave the combatant unchanged.
pub fn check_evolution(
    combatant: &mut Combatant,
    provider: &dyn SpeciesProvider,
    events: &mut Vec<GameEvent>,
) -> Result<bool, ProviderError> {
    if combatant.is_egg {
        return Ok(false);
    }
    let current = provider.lookup(combatant.species)?;
    let evolution = match current.evolution {
        Some(evo) if combatant.level >= evo.level => evo,
        _ => return Ok(false),
    };
    let next = provider.lookup(evolution.into)?;

    let from = combatant.species;
    combatant.species = next.id;
    combatant.name = next.name.clone();
    combatant.types = next.types.clone();
    combatant.sprite = if combatant.shiny {
        next.sprites.shiny.clone()
    } else {
        next.sprites.normal.clone()
    };
    combatant.moves = moveset_for(&combatant.types, combatant.level);

    info!("{} evolved into {}", current.name, next.name);
    events.push(GameEvent::Evolved {
        id: combatant.id,
        from,
        into: next.id,
    });
    Ok(true)
}

/// Award XP and then try evolving. Evolution failures are logged, never fatal.
pub fn award_xp_and_evolve(
    combatant: &mut Combatant,
    xp: u32,
    rng: &mut impl Rng,
    provider: &dyn SpeciesProvider,
    events: &mut Vec<GameEvent>,
) {
    if award_xp(combatant, xp, rng, events) == 0 {
        return;
    }
    if let Err(e) = check_evolution(combatant, provider, events) {
        warn!("Evolution check skipped for {:?}: {e}", combatant.id);
    }
}
