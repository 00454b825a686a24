//! Projectile system: fly along the heading set when fired, hit anything
//! within the hit radius, fizzle after the lifetime.

use hecs::{Entity, World};

use pocketwild_core::constants::{PROJECTILE_HIT_RADIUS, PROJECTILE_LIFETIME_SECS};
use pocketwild_core::types::Position;

use crate::components::{Projectile, RaidEnemy};

/// Advance every projectile by `dt` and apply hits. Spent projectiles are left for cleanup.
pub fn run(world: &mut World, dt: f64) {
    let enemies: Vec<(Entity, Position)> = world
        .query::<(&Position, &RaidEnemy)>()
        .iter()
        .filter(|(_, (_, e))| e.is_alive())
        .map(|(entity, (pos, _))| (entity, *pos))
        .collect();

    let mut hits: Vec<(Entity, f64)> = Vec::new();
    for (_entity, (pos, shot)) in world.query_mut::<(&mut Position, &mut Projectile)>() {
        if shot.spent {
            continue;
        }
        shot.age_secs += dt;
        *pos = Position::from_vec(pos.to_vec() + shot.heading * shot.speed * dt);

        if let Some((enemy, _)) = enemies
            .iter()
            .find(|(_, p)| p.range_to(pos) <= PROJECTILE_HIT_RADIUS)
        {
            hits.push((*enemy, shot.damage));
            shot.spent = true;
        } else if shot.age_secs >= PROJECTILE_LIFETIME_SECS {
            shot.spent = true;
        }
    }

    for (enemy, damage) in hits {
        if let Ok(mut target) = world.get::<&mut RaidEnemy>(enemy) {
            target.hp -= damage;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn shot(heading: DVec2) -> Projectile {
        Projectile {
            damage: 5.0,
            speed: 10.0,
            heading,
            age_secs: 0.0,
            spent: false,
        }
    }

    #[test]
    fn keeps_heading_and_misses_enemies_off_its_line() {
        let mut world = World::new();
        let enemy = world.spawn((Position::new(0.0, 3.0), RaidEnemy { hp: 10.0, speed: 0.0 }));
        let bullet = world.spawn((Position::new(0.0, 0.0), shot(DVec2::X)));

        for _ in 0..5 {
            run(&mut world, 0.1);
        }
        let pos = *world.get::<&Position>(bullet).unwrap();
        assert!((pos.x - 5.0).abs() < 1e-9);
        assert_eq!(pos.y, 0.0);
        assert_eq!(world.get::<&RaidEnemy>(enemy).unwrap().hp, 10.0);
    }

    #[test]
    fn hits_enemy_on_its_line() {
        let mut world = World::new();
        let enemy = world.spawn((Position::new(2.0, 0.0), RaidEnemy { hp: 10.0, speed: 0.0 }));
        let bullet = world.spawn((Position::new(0.0, 0.0), shot(DVec2::X)));

        for _ in 0..3 {
            run(&mut world, 0.1);
        }
        assert_eq!(world.get::<&RaidEnemy>(enemy).unwrap().hp, 5.0);
        assert!(world.get::<&Projectile>(bullet).unwrap().spent);
    }
}
