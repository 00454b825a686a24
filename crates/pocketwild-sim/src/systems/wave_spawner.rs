//! Wave spawning system: one enemy each time the spawn timer crosses a
//! shrinking threshold.

use std::f64::consts::TAU;

use hecs::World;
use rand::Rng;

use pocketwild_core::config::RaidTuning;
use pocketwild_core::constants::{
    RAID_ENEMY_BASE_HP, RAID_ENEMY_BASE_SPEED, RAID_ENEMY_HP_PER_SEC, RAID_ENEMY_SPEED_PER_SEC,
};
use pocketwild_core::events::GameEvent;
use pocketwild_core::types::Position;

use crate::components::RaidEnemy;

/// Spawn pacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTimer {
    pub timer: f64,
    pub threshold: f64,
}

impl WaveTimer {
    pub fn new(tuning: &RaidTuning) -> Self {
        Self {
            timer: 0.0,
            threshold: tuning.spawn_interval_start,
        }
    }
}

/// Spawn one enemy on the outer circle at a random angle.
/// HP and speed grow with the time already survived.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut impl Rng,
    elapsed_secs: f64,
    tuning: &RaidTuning,
) -> Position {
    let angle = rng.gen_range(0.0..TAU);
    let position = Position::new(
        angle.cos() * tuning.spawn_radius,
        angle.sin() * tuning.spawn_radius,
    );
    world.spawn((
        position,
        RaidEnemy {
            hp: RAID_ENEMY_BASE_HP + elapsed_secs * RAID_ENEMY_HP_PER_SEC,
            speed: RAID_ENEMY_BASE_SPEED + elapsed_secs * RAID_ENEMY_SPEED_PER_SEC,
        },
    ));
    position
}

/// Advance the timer and spawn when due. The threshold shrinks after each spawn, bounded below.
pub fn run(
    world: &mut World,
    rng: &mut impl Rng,
    wave: &mut WaveTimer,
    elapsed_secs: f64,
    dt: f64,
    tuning: &RaidTuning,
    events: &mut Vec<GameEvent>,
) {
    wave.timer += dt;
    if wave.timer < wave.threshold {
        return;
    }
    wave.timer = 0.0;
    wave.threshold = (wave.threshold * tuning.spawn_ramp).max(tuning.spawn_interval_min);

    let position = spawn_enemy(world, rng, elapsed_secs, tuning);
    events.push(GameEvent::EnemySpawned { position });
}
