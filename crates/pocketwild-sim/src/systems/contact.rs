//! Contact system: enemies touching the base drain its health, enemies
//! touching a turret wear down the defender inside.

use hecs::World;
use log::info;

use pocketwild_core::config::RaidTuning;
use pocketwild_core::events::GameEvent;
use pocketwild_core::player::PlayerState;
use pocketwild_core::types::Position;

use crate::components::RaidEnemy;
use crate::raid::TurretSlot;

/// Slack for enemies parked exactly on the contact circle.
const CONTACT_EPSILON: f64 = 1e-6;

/// Apply one tick of contact damage. Returns the number of enemies touching the base.
pub fn run(
    world: &World,
    turrets: &mut [TurretSlot],
    player: &mut PlayerState,
    base_health: &mut f64,
    dt: f64,
    tuning: &RaidTuning,
    events: &mut Vec<GameEvent>,
) -> usize {
    let reach = tuning.contact_radius + CONTACT_EPSILON;
    let enemies: Vec<Position> = world
        .query::<(&Position, &RaidEnemy)>()
        .iter()
        .filter(|(_, (_, e))| e.is_alive())
        .map(|(_, (pos, _))| *pos)
        .collect();

    let origin = Position::default();
    let at_base = enemies.iter().filter(|p| p.range_to(&origin) <= reach).count();
    if at_base > 0 {
        *base_health = (*base_health - tuning.base_damage_per_sec * dt * at_base as f64).max(0.0);
        events.push(GameEvent::BaseDamaged {
            health: *base_health,
        });
    }

    for (slot, turret) in turrets.iter_mut().enumerate() {
        let id = match turret.occupant {
            Some(id) => id,
            None => continue,
        };
        let touching = enemies
            .iter()
            .filter(|p| p.range_to(&turret.position) <= reach)
            .count();
        if touching == 0 {
            continue;
        }
        turret.pending_damage += tuning.defender_damage_per_sec * dt * touching as f64;
        let whole = turret.pending_damage.floor();
        turret.pending_damage -= whole;

        let fainted = match player.combatant_mut(id) {
            Some(defender) => {
                defender.apply_damage(whole as u32);
                defender.is_fainted()
            }
            None => true,
        };
        if fainted {
            info!("Defender {id:?} in slot {slot} fainted");
            turret.vacate();
            events.push(GameEvent::DefenderFainted { slot, id });
        }
    }
    at_base
}
