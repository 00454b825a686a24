//! Simulation engine for POCKETWILD.
//!
//! Owns the player, the world and the active battle or raid, advances
//! them on `update(dt)`, and produces GameStateSnapshots for the frontend.

pub mod battle;
pub mod components;
pub mod engine;
pub mod formulas;
pub mod raid;
pub mod sequencer;
pub mod snapshot;
pub mod systems;

pub use engine::{GameEngine, LoadOutcome, SimConfig};
pub use pocketwild_core as core;

#[cfg(test)]
mod tests;
