//! Species data and the provider seam.
//!
//! The game asks a `SpeciesProvider` for display names, types, sprite
//! references and evolution entries. `StaticDex` is the built-in table;
//! hosts may plug in a remote-backed provider instead. A failing provider
//! aborts the operation that needed it and never ends the session.

use serde::{Deserialize, Serialize};

use crate::enums::{ElementType, TileKind};
use crate::error::ProviderError;
use crate::types::SpeciesId;

/// Sprite references for a species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub normal: String,
    pub shiny: String,
    pub animated: String,
}

/// Level-gated evolution entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    pub level: u32,
    pub into: SpeciesId,
}

/// Everything the rules need to know about a species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<ElementType>,
    pub sprites: Sprites,
    pub evolution: Option<Evolution>,
}

/// Source of species data.
pub trait SpeciesProvider {
    fn lookup(&self, id: SpeciesId) -> Result<SpeciesInfo, ProviderError>;
}

struct DexEntry {
    id: u16,
    name: &'static str,
    types: &'static [ElementType],
    evolves: Option<(u32, u16)>,
}

const DEX: &[DexEntry] = {
    use ElementType::*;
    &[
        DexEntry { id: 1, name: "Bulbasaur", types: &[Grass, Poison], evolves: Some((16, 2)) },
        DexEntry { id: 2, name: "Ivysaur", types: &[Grass, Poison], evolves: Some((32, 3)) },
        DexEntry { id: 3, name: "Venusaur", types: &[Grass, Poison], evolves: None },
        DexEntry { id: 4, name: "Charmander", types: &[Fire], evolves: Some((16, 5)) },
        DexEntry { id: 5, name: "Charmeleon", types: &[Fire], evolves: Some((36, 6)) },
        DexEntry { id: 6, name: "Charizard", types: &[Fire, Flying], evolves: None },
        DexEntry { id: 7, name: "Squirtle", types: &[Water], evolves: Some((16, 8)) },
        DexEntry { id: 8, name: "Wartortle", types: &[Water], evolves: Some((36, 9)) },
        DexEntry { id: 9, name: "Blastoise", types: &[Water], evolves: None },
        DexEntry { id: 10, name: "Caterpie", types: &[Bug], evolves: Some((7, 11)) },
        DexEntry { id: 11, name: "Metapod", types: &[Bug], evolves: Some((10, 12)) },
        DexEntry { id: 12, name: "Butterfree", types: &[Bug, Flying], evolves: None },
        DexEntry { id: 16, name: "Pidgey", types: &[Normal, Flying], evolves: Some((18, 17)) },
        DexEntry { id: 17, name: "Pidgeotto", types: &[Normal, Flying], evolves: Some((36, 18)) },
        DexEntry { id: 18, name: "Pidgeot", types: &[Normal, Flying], evolves: None },
        DexEntry { id: 19, name: "Rattata", types: &[Normal], evolves: Some((20, 20)) },
        DexEntry { id: 20, name: "Raticate", types: &[Normal], evolves: None },
        DexEntry { id: 25, name: "Pikachu", types: &[Electric], evolves: Some((30, 26)) },
        DexEntry { id: 26, name: "Raichu", types: &[Electric], evolves: None },
        DexEntry { id: 27, name: "Sandshrew", types: &[Ground], evolves: Some((22, 28)) },
        DexEntry { id: 28, name: "Sandslash", types: &[Ground], evolves: None },
        DexEntry { id: 41, name: "Zubat", types: &[Poison, Flying], evolves: Some((22, 42)) },
        DexEntry { id: 42, name: "Golbat", types: &[Poison, Flying], evolves: None },
        DexEntry { id: 43, name: "Oddish", types: &[Grass, Poison], evolves: Some((21, 44)) },
        DexEntry { id: 44, name: "Gloom", types: &[Grass, Poison], evolves: None },
        DexEntry { id: 74, name: "Geodude", types: &[Rock, Ground], evolves: Some((25, 75)) },
        DexEntry { id: 75, name: "Graveler", types: &[Rock, Ground], evolves: None },
        DexEntry { id: 92, name: "Gastly", types: &[Ghost, Poison], evolves: Some((25, 93)) },
        DexEntry { id: 93, name: "Haunter", types: &[Ghost, Poison], evolves: None },
        DexEntry { id: 124, name: "Jynx", types: &[Ice, Psychic], evolves: None },
        DexEntry { id: 129, name: "Magikarp", types: &[Water], evolves: Some((20, 130)) },
        DexEntry { id: 130, name: "Gyarados", types: &[Water, Flying], evolves: None },
        DexEntry { id: 147, name: "Dratini", types: &[Dragon], evolves: Some((30, 148)) },
        DexEntry { id: 148, name: "Dragonair", types: &[Dragon], evolves: None },
        DexEntry { id: 150, name: "Mewtwo", types: &[Psychic], evolves: None },
        DexEntry { id: 215, name: "Sneasel", types: &[Dark, Ice], evolves: None },
    ]
};

/// Built-in species table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDex;

impl SpeciesProvider for StaticDex {
    fn lookup(&self, id: SpeciesId) -> Result<SpeciesInfo, ProviderError> {
        let entry = DEX
            .iter()
            .find(|e| e.id == id.0)
            .ok_or(ProviderError::UnknownSpecies(id))?;
        Ok(SpeciesInfo {
            id,
            name: entry.name.to_string(),
            types: entry.types.to_vec(),
            sprites: sprites_for(id),
            evolution: entry.evolves.map(|(level, into)| Evolution {
                level,
                into: SpeciesId(into),
            }),
        })
    }
}

/// Sprite paths for a species.
pub fn sprites_for(id: SpeciesId) -> Sprites {
    Sprites {
        normal: format!("sprites/{}.png", id.0),
        shiny: format!("sprites/shiny/{}.png", id.0),
        animated: format!("sprites/animated/{}.gif", id.0),
    }
}

/// Species that appear in the wild on a given tile kind.
pub fn wild_pool(tile: TileKind) -> &'static [SpeciesId] {
    match tile {
        TileKind::Grass | TileKind::TallGrass => {
            &[SpeciesId(16), SpeciesId(19), SpeciesId(10), SpeciesId(25), SpeciesId(1)]
        }
        TileKind::Forest => &[SpeciesId(10), SpeciesId(43), SpeciesId(1), SpeciesId(25)],
        TileKind::Sand => &[SpeciesId(27), SpeciesId(74)],
        TileKind::Water => &[SpeciesId(129), SpeciesId(7)],
        TileKind::Mountain => &[SpeciesId(74), SpeciesId(41), SpeciesId(4)],
        TileKind::Snow => &[SpeciesId(124), SpeciesId(215)],
        TileKind::Structure => &[SpeciesId(92), SpeciesId(147)],
    }
}
