//! Merging three same-species combatants into one of a higher tier.

use log::info;

use pocketwild_core::combatant::Combatant;
use pocketwild_core::constants::{MAX_MERGE_TIER, MERGE_COST, MERGE_INPUTS};
use pocketwild_core::error::GameError;
use pocketwild_core::events::GameEvent;
use pocketwild_core::player::PlayerState;
use pocketwild_core::types::CombatantId;

/// Validate a merge without changing anything. Returns the inputs in the given order.
fn validate<'a>(player: &'a PlayerState, ids: &[CombatantId]) -> Result<Vec<&'a Combatant>, GameError> {
    let mut distinct = ids.to_vec();
    distinct.sort();
    distinct.dedup();
    if ids.len() != MERGE_INPUTS || distinct.len() != MERGE_INPUTS {
        return Err(GameError::NotEnoughInputs {
            needed: MERGE_INPUTS,
            got: distinct.len(),
        });
    }

    let inputs = ids
        .iter()
        .map(|&id| player.combatant(id).ok_or(GameError::UnknownCombatant(id)))
        .collect::<Result<Vec<_>, _>>()?;

    if inputs.iter().any(|c| c.is_egg) {
        return Err(GameError::IsEgg);
    }
    let species = inputs[0].species;
    if inputs.iter().any(|c| c.species != species) {
        return Err(GameError::SpeciesMismatch);
    }
    if inputs.iter().any(|c| c.merge_tier >= MAX_MERGE_TIER) {
        return Err(GameError::MaxTier);
    }
    if player.currency < MERGE_COST {
        return Err(GameError::InsufficientCurrency {
            have: player.currency,
            need: MERGE_COST,
        });
    }
    Ok(inputs)
}

/// Build the merged result from validated inputs.
fn combine(inputs: &[&Combatant], id: CombatantId) -> Combatant {
    let strongest = inputs
        .iter()
        .max_by_key(|c| (c.level, c.merge_tier))
        .copied()
        .unwrap_or(inputs[0]);

    let mut result = strongest.clone();
    result.id = id;
    result.stats = inputs.iter().skip(1).fold(inputs[0].stats, |acc, c| acc.max(&c.stats));
    result.level = inputs.iter().map(|c| c.level).max().unwrap_or(1);
    result.merge_tier = inputs.iter().map(|c| c.merge_tier).max().unwrap_or(0) + 1;
    result.max_hp = inputs.iter().map(|c| c.max_hp).max().unwrap_or(1);
    result.breed_cooldown = 0;
    result.heal_full();
    result
}

/// Merge exactly three same-species, non-max-tier combatants for `MERGE_COST`.
/// The inputs are deleted and the result joins the party (or storage).
/// On any rejection the player state is unchanged.
pub fn merge(
    player: &mut PlayerState,
    ids: &[CombatantId],
    events: &mut Vec<GameEvent>,
) -> Result<CombatantId, GameError> {
    let inputs = validate(player, ids)?;
    let new_id = CombatantId(player.next_combatant_id);
    let result = combine(&inputs, new_id);

    player.allocate_id();
    player.spend(MERGE_COST)?;
    for id in ids {
        player.remove(*id);
    }
    let tier = result.merge_tier;
    let name = result.name.clone();
    // Three slots were just freed, so this always fits.
    player.receive(result).map_err(|(e, _)| e)?;

    info!("Merged three {name} into tier {tier}");
    events.push(GameEvent::Merged { id: new_id, tier });
    Ok(new_id)
}
