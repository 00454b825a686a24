//! Cleanup system: removes defeated enemies and spent projectiles.

use hecs::{Entity, World};

use pocketwild_core::events::GameEvent;
use pocketwild_core::types::Position;

use crate::components::{Projectile, RaidEnemy};

/// Despawn dead enemies and spent projectiles. Returns the number of enemies defeated.
/// Uses a caller-owned buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, events: &mut Vec<GameEvent>) -> usize {
    despawn_buffer.clear();

    let mut defeated = 0;
    for (entity, (pos, enemy)) in world.query_mut::<(&Position, &RaidEnemy)>() {
        if !enemy.is_alive() {
            events.push(GameEvent::EnemyDefeated { position: *pos });
            despawn_buffer.push(entity);
            defeated += 1;
        }
    }

    for (entity, shot) in world.query_mut::<&Projectile>() {
        if shot.spent {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    defeated
}
