//! Core types and definitions for POCKETWILD.
//!
//! This crate defines the vocabulary shared across all other crates:
//! combatants, moves, the type chart, species data, inventory, player state,
//! commands, events, errors, tuning and constants.
//! It has no dependency on any rendering or runtime framework.

pub mod combatant;
pub mod commands;
pub mod config;
pub mod constants;
pub mod dex;
pub mod enums;
pub mod error;
pub mod events;
pub mod inventory;
pub mod moves;
pub mod player;
pub mod state;
pub mod type_chart;
pub mod types;
