//! Procedural world generation for POCKETWILD.
//!
//! Tile classification is a pure function of tile coordinates and the world
//! seed. Resource nodes are generated per chunk, exactly once per chunk,
//! from a chunk-local RNG so contents never depend on visit order.

pub mod encounters;
pub mod noise;
pub mod resources;
pub mod tiles;

pub use resources::ResourceField;
pub use tiles::classify_tile;
