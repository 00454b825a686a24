//! Turn resolution: encounters, the speed-ordered turn queue, move execution,
//! status effects, capture and fleeing.
//!
//! Party combatants stay in `PlayerState` and are referenced by id; the
//! session owns only the enemy. Every action is resolved immediately and
//! returns the presentation steps the sequencer must play before the turn
//! moves on.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use pocketwild_campaign::rewards::{grant, RewardSet};
use pocketwild_core::combatant::{Combatant, Stats};
use pocketwild_core::config::BattleTuning;
use pocketwild_core::constants::{
    ARENA_STAT_MULTIPLIER, ENEMY_LEVEL_VARIANCE, MAX_LEVEL, RIVAL_COOLDOWN_STEPS, STAT_MAX,
    STAT_MIN,
};
use pocketwild_core::dex::SpeciesProvider;
use pocketwild_core::enums::*;
use pocketwild_core::error::GameError;
use pocketwild_core::events::{GameEvent, Participant};
use pocketwild_core::moves::MoveKey;
use pocketwild_core::player::{Placement, PlayerState};
use pocketwild_core::type_chart::effectiveness_against;
use pocketwild_core::types::{CombatantId, SpeciesId};

use crate::formulas::{
    catch_probability, roll_damage, shake_probability, status_prevention, status_tick_damage,
    DamageInput, Prevention,
};
use crate::sequencer::StepKind;

/// Odds of a shiny enemy.
const SHINY_CHANCE: f64 = 1.0 / 512.0;

/// One entry of the turn queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnEntry {
    pub actor: Participant,
    pub speed: u32,
}

/// Living party members plus the enemy, fastest first. Ties keep party order, enemy last.
pub fn build_turn_queue(player: &PlayerState, enemy: &Combatant) -> Vec<TurnEntry> {
    let mut queue: Vec<TurnEntry> = player
        .living_party()
        .map(|c| TurnEntry {
            actor: Participant::Player { id: c.id },
            speed: c.stats.speed,
        })
        .collect();
    if enemy.can_act() {
        queue.push(TurnEntry {
            actor: Participant::Enemy,
            speed: enemy.stats.speed,
        });
    }
    queue.sort_by(|a, b| b.speed.cmp(&a.speed));
    queue
}

/// Roll the enemy for an encounter.
pub fn roll_enemy(
    player: &PlayerState,
    species: SpeciesId,
    kind: EncounterKind,
    provider: &dyn SpeciesProvider,
    rng: &mut impl Rng,
    tuning: &BattleTuning,
) -> Result<Combatant, GameError> {
    let info = provider.lookup(species)?;

    let base = player.average_party_level().round() as i32;
    let mut level = (base + rng.gen_range(-ENEMY_LEVEL_VARIANCE..=ENEMY_LEVEL_VARIANCE)).max(1) as u32;
    if kind == EncounterKind::Arena {
        level += player.arena_stage;
    }
    let level = level.min(MAX_LEVEL);

    let mut stats = Stats::new(
        rng.gen_range(STAT_MIN..=STAT_MAX),
        rng.gen_range(STAT_MIN..=STAT_MAX),
        rng.gen_range(STAT_MIN..=STAT_MAX),
        rng.gen_range(STAT_MIN..=STAT_MAX),
    );
    match kind {
        EncounterKind::Boss => stats = stats.scaled(tuning.boss_stat_multiplier),
        EncounterKind::Arena => stats = stats.scaled(ARENA_STAT_MULTIPLIER),
        EncounterKind::Wild | EncounterKind::Trainer => {}
    }

    let mut enemy = Combatant::from_species(CombatantId(0), &info, level, stats);
    if kind == EncounterKind::Boss {
        enemy.set_max_hp((enemy.max_hp as f64 * tuning.boss_hp_multiplier).round() as u32);
        enemy.heal_full();
    }
    if rng.gen_bool(SHINY_CHANCE) {
        enemy.shiny = true;
        enemy.sprite = info.sprites.shiny.clone();
    }
    Ok(enemy)
}

/// What one action did, for the caller to sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReport {
    pub steps: Vec<StepKind>,
    /// Someone fainted, so the queue must be rebuilt.
    pub fainted: bool,
}

/// Resolve one move from `attacker` against `defender`, then the attacker's
/// end-of-turn status tick.
#[allow(clippy::too_many_arguments)]
pub fn execute_move(
    attacker: &mut Combatant,
    attacker_ref: Participant,
    defender: &mut Combatant,
    defender_ref: Participant,
    key: MoveKey,
    rng: &mut impl Rng,
    tuning: &BattleTuning,
    events: &mut Vec<GameEvent>,
) -> ActionReport {
    let mut report = ActionReport::default();
    if defender.is_fainted() || attacker.is_fainted() {
        return report;
    }
    report.steps.push(StepKind::Announce);
    events.push(GameEvent::TurnStarted {
        actor: attacker_ref,
    });

    let status = attacker.status;
    let acts = match status_prevention(status, rng, tuning) {
        Prevention::Blocked => {
            events.push(GameEvent::ActionBlocked {
                actor: attacker_ref,
                status,
            });
            false
        }
        Prevention::Cured => {
            attacker.status = StatusCondition::None;
            events.push(GameEvent::StatusCured {
                target: attacker_ref,
                status,
            });
            true
        }
        Prevention::Acts => true,
    };

    if acts {
        resolve_move(attacker, attacker_ref, defender, defender_ref, key, rng, tuning, events, &mut report);
    }

    // End-of-turn status tick for the actor.
    if !attacker.is_fainted() {
        let amount = status_tick_damage(attacker.status, attacker.max_hp);
        if amount > 0 {
            let applied = attacker.apply_damage(amount);
            events.push(GameEvent::StatusDamage {
                target: attacker_ref,
                status: attacker.status,
                amount: applied,
            });
            report.steps.push(StepKind::Status);
            if attacker.is_fainted() {
                events.push(GameEvent::Fainted {
                    target: attacker_ref,
                });
                report.fainted = true;
            }
        }
    }
    report
}

#[allow(clippy::too_many_arguments)]
fn resolve_move(
    attacker: &mut Combatant,
    attacker_ref: Participant,
    defender: &mut Combatant,
    defender_ref: Participant,
    key: MoveKey,
    rng: &mut impl Rng,
    tuning: &BattleTuning,
    events: &mut Vec<GameEvent>,
    report: &mut ActionReport,
) {
    let data = key.data();
    events.push(GameEvent::MoveUsed {
        actor: attacker_ref,
        name: data.name.to_string(),
    });
    report.steps.push(StepKind::Animate);

    if rng.gen::<f64>() >= data.accuracy {
        events.push(GameEvent::MoveMissed {
            actor: attacker_ref,
        });
        return;
    }

    if data.category == MoveCategory::Physical {
        let effectiveness = effectiveness_against(data.element, &defender.types);
        let input = DamageInput {
            power: data.power,
            attacker_level: attacker.level,
            defender_level: defender.level,
            strength: attacker.stats.strength,
            defense: defender.stats.defense,
            effectiveness,
        };
        let (damage, crit) = roll_damage(&input, attacker.stats.special, rng, tuning);
        if crit && damage > 0 {
            events.push(GameEvent::CriticalHit {
                target: defender_ref,
            });
        }
        let applied = defender.apply_damage(damage);
        events.push(GameEvent::DamageApplied {
            target: defender_ref,
            amount: applied,
            remaining_hp: defender.hp,
            effectiveness,
        });
        report.steps.push(StepKind::Damage);
    }

    if let Some(effect) = data.inflicts {
        if !defender.is_fainted() && defender.status.is_none() && rng.gen_bool(effect.chance) {
            defender.status = effect.status;
            events.push(GameEvent::StatusInflicted {
                target: defender_ref,
                status: effect.status,
            });
            report.steps.push(StepKind::Status);
        }
    }

    if defender.is_fainted() {
        events.push(GameEvent::Fainted {
            target: defender_ref,
        });
        report.fainted = true;
    }
}

/// An active encounter.
#[derive(Debug, Clone)]
pub struct BattleSession {
    /// Identifies this session to the sequencer.
    pub serial: u64,
    pub kind: EncounterKind,
    pub phase: BattlePhase,
    pub enemy: Combatant,
    queue: Vec<TurnEntry>,
    cursor: usize,
    rebuild: bool,
    aborted: bool,
}

impl BattleSession {
    /// Start an encounter: roll the enemy and build the turn queue.
    /// Fails without side effects when nobody can fight or species data is unavailable.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        serial: u64,
        player: &mut PlayerState,
        species: SpeciesId,
        kind: EncounterKind,
        provider: &dyn SpeciesProvider,
        rng: &mut impl Rng,
        tuning: &BattleTuning,
        events: &mut Vec<GameEvent>,
    ) -> Result<Self, GameError> {
        if !player.has_living_party() {
            return Err(GameError::NoLivingCombatants);
        }
        if kind == EncounterKind::Trainer && player.rival_cooldown > 0 {
            return Err(GameError::NotAllowedInEncounter);
        }
        let enemy = roll_enemy(player, species, kind, provider, rng, tuning)?;
        player.seen.insert(enemy.species);

        info!("{kind:?} encounter with level {} {}", enemy.level, enemy.name);
        events.push(GameEvent::EncounterStarted {
            species: enemy.species,
            level: enemy.level,
            kind,
        });

        let queue = build_turn_queue(player, &enemy);
        let mut session = Self {
            serial,
            kind,
            phase: BattlePhase::Idle,
            enemy,
            queue,
            cursor: 0,
            rebuild: false,
            aborted: false,
        };
        session.set_phase_for_cursor();
        Ok(session)
    }

    pub fn turn_queue(&self) -> &[TurnEntry] {
        &self.queue
    }

    pub fn current_actor(&self) -> Option<Participant> {
        self.queue.get(self.cursor).map(|e| e.actor)
    }

    /// Party member waiting for input.
    pub fn active_member(&self) -> Option<CombatantId> {
        match (self.phase, self.current_actor()) {
            (BattlePhase::PlayerTurn, Some(Participant::Player { id })) => Some(id),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.aborted || self.phase.is_terminal()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        if self.aborted {
            return Some(BattleOutcome::Aborted);
        }
        match self.phase {
            BattlePhase::Won => Some(BattleOutcome::Won),
            BattlePhase::Lost => Some(BattleOutcome::Lost),
            BattlePhase::Fled => Some(BattleOutcome::Fled),
            BattlePhase::Captured => Some(BattleOutcome::Captured),
            _ => None,
        }
    }

    fn set_phase_for_cursor(&mut self) {
        self.phase = match self.current_actor() {
            Some(Participant::Player { .. }) => BattlePhase::PlayerTurn,
            Some(Participant::Enemy) => BattlePhase::EnemyTurn,
            None => {
                self.aborted = true;
                BattlePhase::Idle
            }
        };
    }

    /// Mark the battle won or lost if either side is out.
    fn check_end(&mut self, player: &PlayerState) {
        if self.enemy.is_fainted() {
            self.phase = BattlePhase::Won;
        } else if !player.has_living_party() {
            self.phase = BattlePhase::Lost;
        }
    }

    fn after_action(&mut self, report: &ActionReport, player: &PlayerState) {
        if report.fainted {
            self.rebuild = true;
        }
        self.check_end(player);
    }

    /// Move the cursor to the next living actor, rebuilding the queue when it
    /// is exhausted or somebody fainted.
    pub fn advance_turn(&mut self, player: &PlayerState) {
        if self.is_over() {
            return;
        }
        let previous = self.current_actor();
        if self.rebuild {
            self.queue = build_turn_queue(player, &self.enemy);
            self.rebuild = false;
            self.cursor = previous
                .and_then(|p| self.queue.iter().position(|e| e.actor == p))
                .map(|i| i + 1)
                .unwrap_or(self.cursor);
        } else {
            self.cursor += 1;
        }
        if self.cursor >= self.queue.len() {
            self.queue = build_turn_queue(player, &self.enemy);
            self.cursor = 0;
        }
        debug!("Turn passes to {:?}", self.current_actor());
        self.set_phase_for_cursor();
    }

    /// The party member whose turn it is uses a move on the enemy.
    pub fn player_move(
        &mut self,
        slot: usize,
        player: &mut PlayerState,
        rng: &mut impl Rng,
        tuning: &BattleTuning,
        events: &mut Vec<GameEvent>,
    ) -> Result<ActionReport, GameError> {
        let id = self.active_member().ok_or(GameError::NotPlayerTurn)?;
        let actor = player
            .party_member_mut(id)
            .ok_or(GameError::UnknownCombatant(id))?;
        let key = actor.move_in_slot(slot).ok_or(GameError::InvalidMoveSlot(slot))?;

        let report = execute_move(
            actor,
            Participant::Player { id },
            &mut self.enemy,
            Participant::Enemy,
            key,
            rng,
            tuning,
            events,
        );
        self.after_action(&report, player);
        Ok(report)
    }

    /// The enemy picks a random move and a random living party member.
    pub fn enemy_move(
        &mut self,
        player: &mut PlayerState,
        rng: &mut impl Rng,
        tuning: &BattleTuning,
        events: &mut Vec<GameEvent>,
    ) -> ActionReport {
        let targets: Vec<CombatantId> = player.living_party().map(|c| c.id).collect();
        let target = match targets.choose(rng) {
            Some(id) => *id,
            None => {
                self.aborted = true;
                return ActionReport::default();
            }
        };
        let key = self
            .enemy
            .moves
            .choose(rng)
            .copied()
            .unwrap_or(MoveKey::new(ElementType::Normal, 0));

        let report = match player.party_member_mut(target) {
            Some(defender) => execute_move(
                &mut self.enemy,
                Participant::Enemy,
                defender,
                Participant::Player { id: target },
                key,
                rng,
                tuning,
                events,
            ),
            None => ActionReport::default(),
        };
        self.after_action(&report, player);
        report
    }

    /// Throw a ball at a wild enemy. The ball is spent before the roll.
    pub fn throw_ball(
        &mut self,
        ball: BallKind,
        player: &mut PlayerState,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> Result<ActionReport, GameError> {
        if !self.kind.is_wild() {
            return Err(GameError::NotAllowedInEncounter);
        }
        if self.phase != BattlePhase::PlayerTurn {
            return Err(GameError::NotPlayerTurn);
        }
        if !player.has_room() {
            return Err(GameError::StorageFull);
        }
        player.inventory.take(ball.item(), 1)?;

        let mut report = ActionReport {
            steps: vec![StepKind::Announce, StepKind::Animate],
            fainted: false,
        };
        let shake = shake_probability(catch_probability(ball.catch_rate(), self.enemy.hp_fraction()));
        for n in 1..=pocketwild_core::constants::CAPTURE_SHAKES {
            if !rng.gen_bool(shake) {
                events.push(GameEvent::CaptureFailed { shakes: n - 1 });
                return Ok(report);
            }
            events.push(GameEvent::CaptureShake { shake: n });
            report.steps.push(StepKind::Status);
        }

        let mut caught = self.enemy.clone();
        caught.id = player.allocate_id();
        caught.status = StatusCondition::None;
        let species = caught.species;
        let placement = player.receive(caught).map_err(|(e, _)| e)?;
        player.caught.insert(species);
        info!("Captured {}", self.enemy.name);
        events.push(GameEvent::CaptureSucceeded {
            species,
            placement_storage: placement == Placement::Storage,
        });
        self.phase = BattlePhase::Captured;
        Ok(report)
    }

    /// Heal a party member with a potion. Uses up the current member's turn;
    /// reviving a fainted member puts it back into the turn order.
    pub fn use_potion(
        &mut self,
        target: CombatantId,
        player: &mut PlayerState,
        events: &mut Vec<GameEvent>,
    ) -> Result<ActionReport, GameError> {
        if self.phase != BattlePhase::PlayerTurn {
            return Err(GameError::NotPlayerTurn);
        }
        if !player.in_party(target) {
            return Err(GameError::UnknownCombatant(target));
        }
        if player.use_potion(target)? {
            self.rebuild = true;
        }
        events.push(GameEvent::PlayEffect { id: "heal".into() });
        Ok(ActionReport {
            steps: vec![StepKind::Announce, StepKind::Animate],
            fainted: false,
        })
    }

    /// Flee a wild encounter.
    pub fn run_away(&mut self) -> Result<(), GameError> {
        if !self.kind.is_wild() {
            return Err(GameError::NotAllowedInEncounter);
        }
        if self.phase != BattlePhase::PlayerTurn {
            return Err(GameError::NotPlayerTurn);
        }
        self.phase = BattlePhase::Fled;
        Ok(())
    }
}

/// Apply the consequences of a finished battle.
pub fn conclude(
    session: &BattleSession,
    player: &mut PlayerState,
    rng: &mut impl Rng,
    provider: &dyn SpeciesProvider,
    tuning: &BattleTuning,
    events: &mut Vec<GameEvent>,
) -> BattleOutcome {
    let outcome = session.outcome().unwrap_or(BattleOutcome::Aborted);
    match outcome {
        BattleOutcome::Won => {
            let recipients: Vec<CombatantId> = player.living_party().map(|c| c.id).collect();
            let reward = RewardSet::battle_win(session.enemy.level, session.kind, recipients.len(), tuning);
            grant(player, &reward, &recipients, rng, provider, events);
            match session.kind {
                EncounterKind::Arena => player.arena_stage += 1,
                EncounterKind::Trainer => player.rival_cooldown = RIVAL_COOLDOWN_STEPS,
                EncounterKind::Wild | EncounterKind::Boss => {}
            }
        }
        BattleOutcome::Lost => {
            player.heal_all();
            player.position = player.home;
            events.push(GameEvent::message("Your party fainted. You hurry home."));
        }
        BattleOutcome::Fled | BattleOutcome::Captured | BattleOutcome::Aborted => {}
    }
    info!("Battle ended: {outcome:?}");
    events.push(GameEvent::BattleEnded { outcome });
    outcome
}
