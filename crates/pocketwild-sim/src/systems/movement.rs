//! Movement system: enemies walk straight at the base and stop at contact range.

use glam::DVec2;
use hecs::World;

use pocketwild_core::types::Position;

use crate::components::RaidEnemy;

/// Move every living enemy toward the origin by `speed * dt`, never closer than `contact_radius`.
pub fn run(world: &mut World, dt: f64, contact_radius: f64) {
    for (_entity, (pos, enemy)) in world.query_mut::<(&mut Position, &RaidEnemy)>() {
        if !enemy.is_alive() {
            continue;
        }
        let offset = DVec2::ZERO - pos.to_vec();
        let distance = offset.length();
        if distance <= contact_radius {
            continue;
        }
        let step = (enemy.speed * dt).min(distance - contact_radius);
        *pos = Position::from_vec(pos.to_vec() + offset / distance * step);
    }
}
