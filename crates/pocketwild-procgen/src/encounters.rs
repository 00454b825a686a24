//! Wild encounter rolls while walking.

use rand::seq::SliceRandom;
use rand::Rng;

use pocketwild_core::constants::TALL_GRASS_ENCOUNTER_CHANCE;
use pocketwild_core::dex::wild_pool;
use pocketwild_core::enums::TileKind;
use pocketwild_core::types::SpeciesId;

/// Roll for a wild encounter after stepping onto a tile.
///
/// Only tall grass triggers encounters. The species comes from the grass
/// pool plus the pool of the surrounding terrain, so grass by the shore
/// turns up different creatures than grass at the foot of a mountain.
pub fn roll_wild_encounter(tile: TileKind, surroundings: TileKind, rng: &mut impl Rng) -> Option<SpeciesId> {
    if tile != TileKind::TallGrass || !rng.gen_bool(TALL_GRASS_ENCOUNTER_CHANCE) {
        return None;
    }
    encounter_pool(surroundings).choose(rng).copied()
}

/// Species that can appear in tall grass bordered by `surroundings`.
pub fn encounter_pool(surroundings: TileKind) -> Vec<SpeciesId> {
    let mut pool = wild_pool(TileKind::TallGrass).to_vec();
    if !matches!(surroundings, TileKind::Grass | TileKind::TallGrass) {
        for species in wild_pool(surroundings) {
            if !pool.contains(species) {
                pool.push(*species);
            }
        }
    }
    pool
}
