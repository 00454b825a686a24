//! Harvestable resource nodes.
//!
//! The plane is split into `CHUNK_SIZE`² chunks. A chunk is populated the
//! first time it is requested and recorded in `visited`; later requests are
//! no-ops, so nodes are never duplicated or overwritten. Harvested nodes
//! wait in a respawn queue and come back on the same tile.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use pocketwild_core::constants::{CHUNK_SIZE, NODE_RESPAWN_SECS};
use pocketwild_core::enums::{ItemKind, NodeKind, TileKind};
use pocketwild_core::error::GameError;
use pocketwild_core::types::{Position, TileCoord};

use crate::tiles::TileClassifier;

/// Chunk coordinate.
pub type ChunkCoord = (i32, i32);

/// A harvestable node on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub kind: NodeKind,
    pub hp: u32,
}

/// A depleted node waiting to grow back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingRespawn {
    pub tile: TileCoord,
    pub kind: NodeKind,
    pub remaining_secs: f64,
}

/// Result of one harvest hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestOutcome {
    pub kind: NodeKind,
    /// Node reached 0 HP and was removed.
    pub depleted: bool,
    /// Loot granted when depleted.
    pub loot: Option<(ItemKind, u32)>,
}

/// All resource nodes of a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceField {
    seed: u64,
    #[serde(with = "node_list")]
    nodes: BTreeMap<TileCoord, ResourceNode>,
    visited: BTreeSet<ChunkCoord>,
    respawns: Vec<PendingRespawn>,
}

/// JSON object keys must be strings, so nodes are stored as a list of pairs.
mod node_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::ResourceNode;
    use pocketwild_core::types::TileCoord;

    pub fn serialize<S: Serializer>(
        nodes: &BTreeMap<TileCoord, ResourceNode>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(nodes.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<TileCoord, ResourceNode>, D::Error> {
        let pairs: Vec<(TileCoord, ResourceNode)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

/// Chunk containing a tile.
pub fn chunk_of(tile: TileCoord) -> ChunkCoord {
    (tile.x.div_euclid(CHUNK_SIZE), tile.y.div_euclid(CHUNK_SIZE))
}

fn chunk_seed(seed: u64, chunk: ChunkCoord) -> u64 {
    seed.wrapping_mul(0x2545_F491_4F6C_DD1D)
        ^ (((chunk.0 as u32 as u64) << 32) | chunk.1 as u32 as u64)
}

/// Node spawned by a per-tile roll in [0, 1), conditioned on the tile kind.
fn roll_node(tile: TileKind, roll: f64) -> Option<NodeKind> {
    let table: &[(f64, NodeKind)] = match tile {
        TileKind::Forest => &[(0.18, NodeKind::Tree), (0.20, NodeKind::Rock)],
        TileKind::Grass => &[(0.03, NodeKind::Tree), (0.05, NodeKind::Rock)],
        TileKind::TallGrass => &[(0.02, NodeKind::Tree)],
        TileKind::Sand => &[(0.02, NodeKind::Rock)],
        TileKind::Mountain => &[
            (0.10, NodeKind::Rock),
            (0.15, NodeKind::IronVein),
            (0.17, NodeKind::GoldVein),
            (0.175, NodeKind::CrystalVein),
        ],
        TileKind::Snow => &[(0.03, NodeKind::Rock), (0.04, NodeKind::CrystalVein)],
        TileKind::Water | TileKind::Structure => &[],
    };
    table
        .iter()
        .find(|(cumulative, _)| roll < *cumulative)
        .map(|(_, kind)| *kind)
}

fn loot_amount(kind: NodeKind) -> u32 {
    match kind {
        NodeKind::Tree | NodeKind::Rock => 2,
        NodeKind::IronVein | NodeKind::GoldVein | NodeKind::CrystalVein => 1,
    }
}

impl ResourceField {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            nodes: BTreeMap::new(),
            visited: BTreeSet::new(),
            respawns: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn node(&self, tile: TileCoord) -> Option<&ResourceNode> {
        self.nodes.get(&tile)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_visited(&self, chunk: ChunkCoord) -> bool {
        self.visited.contains(&chunk)
    }

    pub fn visited_chunks(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.visited.iter()
    }

    pub fn pending_respawns(&self) -> &[PendingRespawn] {
        &self.respawns
    }

    /// Nodes inside one chunk.
    pub fn nodes_in_chunk(&self, chunk: ChunkCoord) -> impl Iterator<Item = (&TileCoord, &ResourceNode)> {
        self.nodes.iter().filter(move |(tile, _)| chunk_of(**tile) == chunk)
    }

    /// Populate a chunk once. Returns the number of nodes created.
    pub fn generate_chunk(&mut self, chunk: ChunkCoord) -> usize {
        if !self.visited.insert(chunk) {
            return 0;
        }

        let classifier = TileClassifier::new(self.seed);
        let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed(self.seed, chunk));
        let mut created = 0;
        for dy in 0..CHUNK_SIZE {
            for dx in 0..CHUNK_SIZE {
                let tile = TileCoord::new(chunk.0 * CHUNK_SIZE + dx, chunk.1 * CHUNK_SIZE + dy);
                // One roll per tile keeps the stream aligned regardless of terrain.
                let roll: f64 = rng.gen();
                if let Some(kind) = roll_node(classifier.classify(tile), roll) {
                    if !self.nodes.contains_key(&tile) {
                        self.nodes.insert(tile, ResourceNode { kind, hp: kind.max_hp() });
                        created += 1;
                    }
                }
            }
        }
        debug!("Generated chunk {chunk:?} with {created} nodes");
        created
    }

    /// Generate every chunk within `radius` chunks of a position.
    pub fn ensure_around(&mut self, position: Position, radius: i32) -> usize {
        let (cx, cy) = chunk_of(position.tile());
        let mut created = 0;
        for y in (cy - radius)..=(cy + radius) {
            for x in (cx - radius)..=(cx + radius) {
                created += self.generate_chunk((x, y));
            }
        }
        created
    }

    /// Hit the node on a tile with the given tool power.
    pub fn harvest(&mut self, tile: TileCoord, power: u32) -> Result<HarvestOutcome, GameError> {
        let node = self.nodes.get_mut(&tile).ok_or(GameError::NoResourceNode)?;
        node.hp = node.hp.saturating_sub(power.max(1));
        let kind = node.kind;

        if node.hp > 0 {
            return Ok(HarvestOutcome {
                kind,
                depleted: false,
                loot: None,
            });
        }

        self.nodes.remove(&tile);
        self.respawns.push(PendingRespawn {
            tile,
            kind,
            remaining_secs: NODE_RESPAWN_SECS,
        });
        Ok(HarvestOutcome {
            kind,
            depleted: true,
            loot: Some((kind.loot(), loot_amount(kind))),
        })
    }

    /// Advance respawn timers. Returns the nodes that came back.
    pub fn tick_respawns(&mut self, dt: f64) -> Vec<(TileCoord, NodeKind)> {
        let mut restored = Vec::new();
        let nodes = &mut self.nodes;
        self.respawns.retain_mut(|pending| {
            pending.remaining_secs -= dt;
            if pending.remaining_secs > 0.0 {
                return true;
            }
            if let std::collections::btree_map::Entry::Vacant(slot) = nodes.entry(pending.tile) {
                slot.insert(ResourceNode {
                    kind: pending.kind,
                    hp: pending.kind.max_hp(),
                });
                restored.push((pending.tile, pending.kind));
            }
            false
        });
        restored
    }
}
