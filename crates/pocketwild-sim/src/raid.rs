//! Wave defense: a timed base-defense session.
//!
//! The base sits at the origin of raid space with turret slots on a ring
//! around it. Owned combatants man the turrets; enemies and projectiles are
//! hecs entities. The session ends when the countdown runs out (won) or the
//! base health reaches zero (lost). A loss in the same tick wins over the
//! countdown.

use std::f64::consts::TAU;

use hecs::{Entity, World};
use log::info;
use rand::Rng;

use pocketwild_campaign::rewards::{grant, RewardSet};
use pocketwild_core::combatant::Combatant;
use pocketwild_core::config::RaidTuning;
use pocketwild_core::constants::{TURRET_COOLDOWN_BASE, TURRET_COOLDOWN_MIN, TURRET_RING_RADIUS, TURRET_SLOTS};
use pocketwild_core::dex::SpeciesProvider;
use pocketwild_core::enums::RaidOutcome;
use pocketwild_core::error::GameError;
use pocketwild_core::events::GameEvent;
use pocketwild_core::player::PlayerState;
use pocketwild_core::state::RaidView;
use pocketwild_core::types::{CombatantId, Position};

use crate::components::{Projectile, RaidEnemy};
use crate::systems;
use crate::systems::wave_spawner::WaveTimer;

/// Seconds between shots for a defender.
pub fn turret_cooldown(defender: &Combatant) -> f64 {
    (TURRET_COOLDOWN_BASE - defender.stats.speed as f64 / 100.0).max(TURRET_COOLDOWN_MIN)
}

/// Projectile damage for a defender.
pub fn turret_damage(defender: &Combatant) -> f64 {
    (4 + defender.stats.strength / 5 + defender.level / 2) as f64
}

/// One turret position and its defender.
#[derive(Debug, Clone, PartialEq)]
pub struct TurretSlot {
    pub position: Position,
    pub occupant: Option<CombatantId>,
    pub cooldown_secs: f64,
    /// Fractional contact damage not yet applied to the occupant.
    pub pending_damage: f64,
}

impl TurretSlot {
    fn new(position: Position) -> Self {
        Self {
            position,
            occupant: None,
            cooldown_secs: 0.0,
            pending_damage: 0.0,
        }
    }

    pub fn vacate(&mut self) {
        self.occupant = None;
        self.cooldown_secs = 0.0;
        self.pending_damage = 0.0;
    }
}

/// Slots evenly spaced on the ring.
fn turret_ring() -> Vec<TurretSlot> {
    (0..TURRET_SLOTS)
        .map(|i| {
            let angle = i as f64 * TAU / TURRET_SLOTS as f64;
            TurretSlot::new(Position::new(
                angle.cos() * TURRET_RING_RADIUS,
                angle.sin() * TURRET_RING_RADIUS,
            ))
        })
        .collect()
}

/// Fill empty slots with living, unassigned combatants: party first, then
/// storage, highest level first. Returns how many were placed.
pub fn assign_defenders(
    turrets: &mut [TurretSlot],
    player: &PlayerState,
    events: &mut Vec<GameEvent>,
) -> usize {
    let assigned: Vec<CombatantId> = turrets.iter().filter_map(|t| t.occupant).collect();
    let mut candidates: Vec<(bool, u32, CombatantId)> = player
        .party
        .iter()
        .map(|c| (true, c))
        .chain(player.storage.iter().map(|c| (false, c)))
        .filter(|(_, c)| c.can_act() && !assigned.contains(&c.id))
        .map(|(in_party, c)| (in_party, c.level, c.id))
        .collect();
    // Party before storage, then level descending.
    candidates.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let mut placed = 0;
    let mut next = candidates.into_iter();
    for (slot, turret) in turrets.iter_mut().enumerate() {
        if turret.occupant.is_some() {
            continue;
        }
        let Some((_, _, id)) = next.next() else {
            break;
        };
        turret.occupant = Some(id);
        turret.cooldown_secs = 0.0;
        turret.pending_damage = 0.0;
        events.push(GameEvent::DefenderAssigned { slot, id });
        placed += 1;
    }
    placed
}

/// An active raid.
pub struct RaidSession {
    world: World,
    pub turrets: Vec<TurretSlot>,
    pub remaining_secs: f64,
    pub elapsed_secs: f64,
    pub base_health: f64,
    pub base_health_max: f64,
    wave: WaveTimer,
    despawn_buffer: Vec<Entity>,
    outcome: Option<RaidOutcome>,
    pub enemies_defeated: u32,
}

impl RaidSession {
    /// Start a raid. Needs at least one combatant able to defend.
    pub fn start(
        player: &PlayerState,
        tuning: &RaidTuning,
        events: &mut Vec<GameEvent>,
    ) -> Result<Self, GameError> {
        let mut turrets = turret_ring();
        let mut assigned = Vec::new();
        let defenders = assign_defenders(&mut turrets, player, &mut assigned);
        if defenders == 0 {
            return Err(GameError::NoLivingCombatants);
        }
        info!("Raid started with {defenders} defenders");
        events.push(GameEvent::RaidStarted {
            defenders: defenders as u32,
        });
        events.extend(assigned);

        Ok(Self {
            world: World::new(),
            turrets,
            remaining_secs: tuning.duration_secs,
            elapsed_secs: 0.0,
            base_health: tuning.base_health,
            base_health_max: tuning.base_health,
            wave: WaveTimer::new(tuning),
            despawn_buffer: Vec::new(),
            outcome: None,
            enemies_defeated: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn outcome(&self) -> Option<RaidOutcome> {
        self.outcome
    }

    pub fn enemy_count(&self) -> usize {
        self.world.query::<&RaidEnemy>().iter().count()
    }

    pub fn projectile_count(&self) -> usize {
        self.world.query::<&Projectile>().iter().count()
    }

    /// Place an enemy directly, outside the spawn schedule.
    pub fn spawn_enemy_at(&mut self, position: Position, hp: f64, speed: f64) -> Entity {
        self.world.spawn((position, RaidEnemy { hp, speed }))
    }

    /// Run one tick. Returns the outcome on the tick the raid ends.
    pub fn step(
        &mut self,
        dt: f64,
        player: &mut PlayerState,
        rng: &mut impl Rng,
        tuning: &RaidTuning,
        events: &mut Vec<GameEvent>,
    ) -> Option<RaidOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        // 1. Spawning
        systems::wave_spawner::run(
            &mut self.world,
            rng,
            &mut self.wave,
            self.elapsed_secs,
            dt,
            tuning,
            events,
        );
        // 2. Movement
        systems::movement::run(&mut self.world, dt, tuning.contact_radius);
        // 3. Contact against the base and the turrets
        systems::contact::run(
            &self.world,
            &mut self.turrets,
            player,
            &mut self.base_health,
            dt,
            tuning,
            events,
        );
        assign_defenders(&mut self.turrets, player, events);
        // 4. Loss check
        if self.base_health <= 0.0 {
            return self.finish(RaidOutcome::Lost, events);
        }
        // 5. Turrets
        systems::turret_fire::run(&mut self.world, &mut self.turrets, player, dt, tuning, events);
        // 6. Projectiles
        systems::projectiles::run(&mut self.world, dt);
        // 7. Cleanup
        let defeated = systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, events);
        self.enemies_defeated += defeated as u32;
        // 8. Countdown
        self.elapsed_secs += dt;
        self.remaining_secs = (self.remaining_secs - dt).max(0.0);
        // 9. Win check
        if self.remaining_secs <= 0.0 {
            return self.finish(RaidOutcome::Won, events);
        }
        None
    }

    fn finish(&mut self, outcome: RaidOutcome, events: &mut Vec<GameEvent>) -> Option<RaidOutcome> {
        info!(
            "Raid ended: {outcome:?} after {:.1}s, {} enemies defeated",
            self.elapsed_secs, self.enemies_defeated
        );
        self.outcome = Some(outcome);
        events.push(GameEvent::RaidEnded { outcome });
        self.outcome
    }

    pub fn view(&self) -> RaidView {
        let mut enemies: Vec<Position> = self
            .world
            .query::<(&Position, &RaidEnemy)>()
            .iter()
            .map(|(_, (pos, _))| *pos)
            .collect();
        let mut projectiles: Vec<Position> = self
            .world
            .query::<(&Position, &Projectile)>()
            .iter()
            .map(|(_, (pos, _))| *pos)
            .collect();
        // Entity iteration order is an archetype detail; sort for stable snapshots.
        enemies.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        projectiles.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

        RaidView {
            remaining_secs: self.remaining_secs,
            base_health: self.base_health,
            base_health_max: self.base_health_max,
            turrets: self.turrets.iter().map(|t| t.occupant).collect(),
            enemies,
            projectiles,
        }
    }
}

/// Apply the end-of-raid consequences: everyone is healed, rewards only on a win.
pub fn conclude(
    outcome: RaidOutcome,
    player: &mut PlayerState,
    rng: &mut impl Rng,
    provider: &dyn SpeciesProvider,
    tuning: &RaidTuning,
    events: &mut Vec<GameEvent>,
) {
    if outcome == RaidOutcome::Won {
        let recipients: Vec<CombatantId> = player.living_party().map(|c| c.id).collect();
        grant(player, &RewardSet::raid_win(tuning), &recipients, rng, provider, events);
    }
    player.heal_all();
}
