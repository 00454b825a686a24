//! Tile classification.
//!
//! Two independent noise fields drive the terrain: a low-frequency biome
//! field (water / sand / land / mountain / snow) and a higher-frequency
//! vegetation field (grass / tall grass / forest). Rare structures sit on
//! a fixed lattice wherever it lands on walkable ground.

use pocketwild_core::enums::TileKind;
use pocketwild_core::types::TileCoord;

use crate::noise::ValueNoise;

const BIOME_SCALE: f64 = 1.0 / 48.0;
const VEGETATION_SCALE: f64 = 1.0 / 12.0;
const VEGETATION_SALT: u64 = 0x5EED_0F_7EE5;

const WATER_BELOW: f64 = 0.28;
const SAND_BELOW: f64 = 0.34;
const MOUNTAIN_ABOVE: f64 = 0.78;
const SNOW_ABOVE: f64 = 0.86;
const FOREST_ABOVE: f64 = 0.62;
const TALL_GRASS_ABOVE: f64 = 0.45;

const STRUCTURE_MOD_X: i32 = 97;
const STRUCTURE_MOD_Y: i32 = 89;
const STRUCTURE_AT: (i32, i32) = (13, 41);

/// Tile classifier bound to one world seed.
#[derive(Debug, Clone, Copy)]
pub struct TileClassifier {
    biome: ValueNoise,
    vegetation: ValueNoise,
}

impl TileClassifier {
    pub fn new(seed: u64) -> Self {
        Self {
            biome: ValueNoise::new(seed),
            vegetation: ValueNoise::new(seed ^ VEGETATION_SALT),
        }
    }

    pub fn classify(&self, tile: TileCoord) -> TileKind {
        let (x, y) = (tile.x as f64, tile.y as f64);
        let biome = self.biome.sample(x * BIOME_SCALE, y * BIOME_SCALE);

        let base = if biome < WATER_BELOW {
            TileKind::Water
        } else if biome < SAND_BELOW {
            TileKind::Sand
        } else if biome > SNOW_ABOVE {
            TileKind::Snow
        } else if biome > MOUNTAIN_ABOVE {
            TileKind::Mountain
        } else {
            let veg = self.vegetation.sample(x * VEGETATION_SCALE, y * VEGETATION_SCALE);
            if veg > FOREST_ABOVE {
                TileKind::Forest
            } else if veg > TALL_GRASS_ABOVE {
                TileKind::TallGrass
            } else {
                TileKind::Grass
            }
        };

        if base.is_walkable() && is_structure_site(tile) {
            TileKind::Structure
        } else {
            base
        }
    }

    /// Walkable, with at least one walkable tile among its eight neighbours.
    pub fn can_stand(&self, tile: TileCoord) -> bool {
        self.classify(tile).is_walkable()
            && ring(tile, 1).any(|n| self.classify(n).is_walkable())
    }

    /// Most common terrain other than grass within `radius` of `tile`.
    /// Ties go to the kind listed first; plain grassland reports `Grass`.
    pub fn surroundings(&self, tile: TileCoord, radius: i32) -> TileKind {
        const KINDS: [TileKind; 6] = [
            TileKind::Water,
            TileKind::Sand,
            TileKind::Forest,
            TileKind::Mountain,
            TileKind::Snow,
            TileKind::Structure,
        ];
        let mut counts = [0usize; KINDS.len()];
        for r in 1..=radius {
            for t in ring(tile, r) {
                let kind = self.classify(t);
                if let Some(i) = KINDS.iter().position(|&k| k == kind) {
                    counts[i] += 1;
                }
            }
        }
        let mut best = (TileKind::Grass, 0);
        for (kind, count) in KINDS.iter().zip(counts) {
            if count > best.1 {
                best = (*kind, count);
            }
        }
        best.0
    }

    /// Nearest standable tile to `origin`, searched ring by ring out to `max_radius`.
    pub fn find_spawn(&self, origin: TileCoord, max_radius: i32) -> Option<TileCoord> {
        (0..=max_radius).find_map(|r| ring(origin, r).find(|&t| self.can_stand(t)))
    }
}

/// Tiles at Chebyshev distance exactly `r` from `center`, row-major.
fn ring(center: TileCoord, r: i32) -> impl Iterator<Item = TileCoord> {
    (-r..=r).flat_map(move |dy| {
        (-r..=r)
            .filter(move |&dx| dx.abs().max(dy.abs()) == r)
            .map(move |dx| TileCoord::new(center.x + dx, center.y + dy))
    })
}

fn is_structure_site(tile: TileCoord) -> bool {
    tile.x.rem_euclid(STRUCTURE_MOD_X) == STRUCTURE_AT.0 && tile.y.rem_euclid(STRUCTURE_MOD_Y) == STRUCTURE_AT.1
}

/// Classify a single tile.
pub fn classify_tile(x: i32, y: i32, seed: u64) -> TileKind {
    TileClassifier::new(seed).classify(TileCoord::new(x, y))
}
