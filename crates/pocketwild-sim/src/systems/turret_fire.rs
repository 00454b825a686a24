//! Turret fire system: ready turrets shoot at the nearest living enemy in range.

use hecs::World;

use pocketwild_core::config::RaidTuning;
use pocketwild_core::events::GameEvent;
use pocketwild_core::player::PlayerState;
use pocketwild_core::types::Position;

use crate::components::{Projectile, RaidEnemy};
use crate::raid::{turret_cooldown, turret_damage, TurretSlot};

/// Nearest living enemy within `range` of a point.
pub fn nearest_enemy(world: &World, from: &Position, range: f64) -> Option<Position> {
    world
        .query::<(&Position, &RaidEnemy)>()
        .iter()
        .filter(|(_, (_, e))| e.is_alive())
        .map(|(_, (pos, _))| (*pos, from.range_to(pos)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(pos, _)| pos)
}

pub fn run(
    world: &mut World,
    turrets: &mut [TurretSlot],
    player: &PlayerState,
    dt: f64,
    tuning: &RaidTuning,
    events: &mut Vec<GameEvent>,
) {
    for (slot, turret) in turrets.iter_mut().enumerate() {
        let defender = match turret.occupant.and_then(|id| player.combatant(id)) {
            Some(c) if c.can_act() => c,
            _ => continue,
        };
        turret.cooldown_secs = (turret.cooldown_secs - dt).max(0.0);
        if turret.cooldown_secs > 0.0 {
            continue;
        }
        let target_pos = match nearest_enemy(world, &turret.position, tuning.turret_range) {
            Some(found) => found,
            None => continue,
        };

        let heading = (target_pos.to_vec() - turret.position.to_vec()).normalize_or_zero();
        world.spawn((
            turret.position,
            Projectile {
                damage: turret_damage(defender),
                speed: tuning.projectile_speed,
                heading,
                age_secs: 0.0,
                spent: false,
            },
        ));
        turret.cooldown_secs = turret_cooldown(defender);
        events.push(GameEvent::TurretFired { slot });
    }
}
