//! ECS systems that operate on the raid world each tick.
//!
//! Systems are free functions over `&mut World` plus whatever session state
//! they touch. They hold no state of their own.

pub mod cleanup;
pub mod contact;
pub mod movement;
pub mod projectiles;
pub mod turret_fire;
pub mod wave_spawner;
