//! Game engine: the single owner of all mutable game state.
//!
//! `GameEngine` queues player commands, processes them at the start of each
//! update, advances the battle sequencer, the raid and resource respawns,
//! and produces `GameStateSnapshot`s. Completely headless; time only moves
//! through `update(dt)`, so runs are deterministic for a given seed and
//! command stream.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use pocketwild_campaign::breeding::{advance_steps, breed};
use pocketwild_campaign::merge::merge;
use pocketwild_campaign::persistence::{parse_save, SaveError, SaveProgress, SaveRecord, WorldSave};
use pocketwild_core::combatant::{Combatant, Stats};
use pocketwild_core::commands::PlayerCommand;
use pocketwild_core::config::Tuning;
use pocketwild_core::constants::*;
use pocketwild_core::dex::{SpeciesProvider, StaticDex};
use pocketwild_core::enums::*;
use pocketwild_core::error::GameError;
use pocketwild_core::events::GameEvent;
use pocketwild_core::player::PlayerState;
use pocketwild_core::state::{GameMode, GameStateSnapshot};
use pocketwild_core::types::{CombatantId, Position, SimTime, SpeciesId, TileCoord};
use pocketwild_procgen::encounters::roll_wild_encounter;
use pocketwild_procgen::tiles::TileClassifier;
use pocketwild_procgen::ResourceField;

use crate::battle::{self, ActionReport, BattleSession};
use crate::raid::{self, RaidSession};
use crate::sequencer::{Continuation, StepSequencer};
use crate::snapshot;

/// Configuration for starting a new game.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same game.
    pub seed: u64,
    /// Seed for terrain and resource nodes.
    pub world_seed: u64,
    pub tuning: Tuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world_seed: 42,
            tuning: Tuning::default(),
        }
    }
}

/// Result of `GameEngine::load_save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    NoSaveLoaded,
}

/// The game engine. Owns the player, the world and any active session.
pub struct GameEngine {
    time: SimTime,
    seed: u64,
    world_seed: u64,
    tuning: Tuning,
    rng: ChaCha8Rng,
    player: PlayerState,
    resources: ResourceField,
    classifier: TileClassifier,
    battle: Option<BattleSession>,
    next_battle_serial: u64,
    raid: Option<RaidSession>,
    sequencer: StepSequencer,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    provider: Box<dyn SpeciesProvider>,
}

impl GameEngine {
    /// New game backed by the built-in species table.
    pub fn new(config: SimConfig) -> Self {
        Self::with_provider(config, Box::new(StaticDex))
    }

    /// New game with a custom species provider.
    pub fn with_provider(config: SimConfig, provider: Box<dyn SpeciesProvider>) -> Self {
        let classifier = TileClassifier::new(config.world_seed);
        let mut player = PlayerState::default();
        match classifier.find_spawn(TileCoord::new(0, 0), SPAWN_SEARCH_RADIUS) {
            Some(spawn) => {
                player.position = Position::new(spawn.x as f64, spawn.y as f64);
                player.home = player.position;
            }
            None => warn!("No walkable spawn within {SPAWN_SEARCH_RADIUS} tiles of the origin"),
        }
        let mut resources = ResourceField::new(config.world_seed);
        resources.ensure_around(player.position, CHUNK_VIEW_RADIUS);
        Self {
            time: SimTime::default(),
            seed: config.seed,
            world_seed: config.world_seed,
            tuning: config.tuning,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            player,
            resources,
            classifier,
            battle: None,
            next_battle_serial: 1,
            raid: None,
            sequencer: StepSequencer::new(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            provider,
        }
    }

    /// Queue a player command for processing at the next update.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the game by `dt` seconds and return the resulting snapshot.
    pub fn update(&mut self, dt: f64) -> GameStateSnapshot {
        let dt = dt.max(0.0);
        self.process_commands();

        if let Some(done) = self.sequencer.advance(dt * 1000.0) {
            let live = self.battle.as_ref().is_some_and(|b| b.serial == done.session);
            if live {
                self.run_continuation(done.continuation);
            }
        }

        self.run_raid(dt);

        for (tile, node) in self.resources.tick_respawns(dt) {
            self.events.push(GameEvent::NodeRespawned { tile, node });
        }

        self.time.advance(dt);
        self.snapshot()
    }

    /// Advance by one fixed step.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.update(DT)
    }

    /// Current visible state without advancing time. Drains pending events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        snapshot::build_snapshot(
            &self.time,
            &self.player,
            self.battle.as_ref(),
            self.raid.as_ref(),
            &self.sequencer,
            events,
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn mode(&self) -> GameMode {
        if self.battle.is_some() {
            GameMode::Battle
        } else if self.raid.is_some() {
            GameMode::Raid
        } else {
            GameMode::Overworld
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn resources(&self) -> &ResourceField {
        &self.resources
    }

    pub fn battle(&self) -> Option<&BattleSession> {
        self.battle.as_ref()
    }

    pub fn raid(&self) -> Option<&RaidSession> {
        self.raid.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.sequencer.is_busy()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Mutable player state (for tests).
    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    // ---- Persistence ----

    /// Capture the current state as a save record.
    pub fn save_record(&self, slot: &str) -> SaveRecord {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        SaveRecord {
            version: SAVE_VERSION,
            slot: slot.to_string(),
            timestamp,
            seed: self.seed,
            world_seed: self.world_seed,
            player: self.player.clone(),
            world: WorldSave {
                resources: self.resources.clone(),
            },
            progress: SaveProgress {
                ticks: self.time.tick,
                elapsed_secs: self.time.elapsed_secs,
            },
        }
    }

    /// Serialize the current state to save JSON.
    pub fn save(&self, slot: &str) -> Result<String, SaveError> {
        self.save_record(slot).to_json()
    }

    /// Replace the game state from save JSON. On any failure live state is untouched.
    pub fn load_save(&mut self, json: &str) -> LoadOutcome {
        match parse_save(json) {
            Ok(record) => {
                self.apply_record(record);
                LoadOutcome::Loaded
            }
            Err(e) => {
                warn!("Save not loaded: {e}");
                self.events.push(GameEvent::message(format!("Save not loaded: {e}")));
                LoadOutcome::NoSaveLoaded
            }
        }
    }

    fn apply_record(&mut self, record: SaveRecord) {
        info!("Loaded save '{}'", record.slot);
        self.seed = record.seed;
        self.world_seed = record.world_seed;
        self.rng = ChaCha8Rng::seed_from_u64(record.seed ^ record.progress.ticks);
        self.player = record.player;
        self.resources = record.world.resources;
        self.classifier = TileClassifier::new(record.world_seed);
        self.time = SimTime {
            tick: record.progress.ticks,
            elapsed_secs: record.progress.elapsed_secs,
        };
        self.battle = None;
        self.raid = None;
        self.sequencer.clear();
        self.command_queue.clear();
        self.resources.ensure_around(self.player.position, CHUNK_VIEW_RADIUS);
        self.events.push(GameEvent::Redraw);
    }

    // ---- Commands ----

    /// Process all queued commands. Rejections become transient messages.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(e) = self.handle_command(command.clone()) {
                warn!("Rejected {command:?}: {e}");
                self.events.push(GameEvent::message(e.to_string()));
            }
        }
    }

    fn session_active(&self) -> bool {
        self.battle.is_some() || self.raid.is_some()
    }

    fn require_no_session(&self) -> Result<(), GameError> {
        if self.session_active() {
            Err(GameError::SessionActive)
        } else {
            Ok(())
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), GameError> {
        match command {
            PlayerCommand::ChooseStarter { species } => self.choose_starter(species),
            PlayerCommand::Move { dx, dy } => self.walk(dx, dy),
            PlayerCommand::Harvest { x, y } => self.harvest(TileCoord::new(x, y)),
            PlayerCommand::UsePotion { target } => self.use_potion(target),
            PlayerCommand::StartEncounter { species, kind } => self.start_encounter(species, kind),
            PlayerCommand::UseMove { slot } => {
                let report = self.with_idle_battle(|battle, player, rng, tuning, events| {
                    battle.player_move(slot, player, rng, &tuning.battle, events)
                })?;
                self.schedule(report)
            }
            PlayerCommand::ThrowBall { ball } => {
                let report = self.with_idle_battle(|battle, player, rng, _, events| {
                    battle.throw_ball(ball, player, rng, events)
                })?;
                self.schedule(report)
            }
            PlayerCommand::RunAway => {
                self.with_idle_battle(|battle, _, _, _, _| battle.run_away())?;
                self.finish_battle();
                Ok(())
            }
            PlayerCommand::StartRaid => {
                self.require_no_session()?;
                self.raid = Some(RaidSession::start(&self.player, &self.tuning.raid, &mut self.events)?);
                Ok(())
            }
            PlayerCommand::Merge { ids } => {
                self.require_no_session()?;
                merge(&mut self.player, &ids, &mut self.events).map(|_| ())
            }
            PlayerCommand::Breed { a, b } => {
                self.require_no_session()?;
                breed(&mut self.player, a, b, &mut self.events).map(|_| ())
            }
        }
    }

    fn choose_starter(&mut self, species: SpeciesId) -> Result<(), GameError> {
        if !self.player.party.is_empty() || !self.player.storage.is_empty() {
            return Err(GameError::StarterAlreadyChosen);
        }
        let info = self.provider.lookup(species)?;
        let stats = Stats::new(
            self.rng.gen_range(STAT_MIN..=STAT_MAX),
            self.rng.gen_range(STAT_MIN..=STAT_MAX),
            self.rng.gen_range(STAT_MIN..=STAT_MAX),
            self.rng.gen_range(STAT_MIN..=STAT_MAX),
        );
        let id = self.player.allocate_id();
        let starter = Combatant::from_species(id, &info, STARTER_LEVEL, stats);
        self.player.seen.insert(species);
        self.player.caught.insert(species);
        self.player.receive(starter).map_err(|(e, _)| e)?;
        self.events.push(GameEvent::message(format!("{} joined your party!", info.name)));
        Ok(())
    }

    fn walk(&mut self, dx: i32, dy: i32) -> Result<(), GameError> {
        self.require_no_session()?;
        let from = self.player.position.tile();
        let to = TileCoord::new(from.x + dx.clamp(-1, 1), from.y + dy.clamp(-1, 1));
        if to == from {
            return Ok(());
        }
        let kind = self.classifier.classify(to);
        if !kind.is_walkable() {
            return Err(GameError::Blocked);
        }

        self.player.position = Position::new(to.x as f64, to.y as f64);
        advance_steps(&mut self.player, 1, self.provider.as_ref(), &mut self.events);
        self.resources.ensure_around(self.player.position, CHUNK_VIEW_RADIUS);
        self.events.push(GameEvent::Redraw);

        if self.player.has_living_party() {
            let surroundings = if kind == TileKind::TallGrass {
                self.classifier.surroundings(to, ENCOUNTER_BIOME_RADIUS)
            } else {
                kind
            };
            if let Some(species) = roll_wild_encounter(kind, surroundings, &mut self.rng) {
                self.start_encounter(species, EncounterKind::Wild)?;
            }
        }
        Ok(())
    }

    fn harvest(&mut self, tile: TileCoord) -> Result<(), GameError> {
        self.require_no_session()?;
        let here = self.player.position.tile();
        if (tile.x - here.x).abs() > 1 || (tile.y - here.y).abs() > 1 {
            return Err(GameError::Blocked);
        }
        let outcome = self.resources.harvest(tile, 1)?;
        self.events.push(GameEvent::NodeHarvested {
            tile,
            node: outcome.kind,
            depleted: outcome.depleted,
        });
        if let Some((item, amount)) = outcome.loot {
            let leftover = self.player.inventory.add(item, amount);
            if amount > leftover {
                self.events.push(GameEvent::ItemReceived {
                    item,
                    amount: amount - leftover,
                });
            }
            if leftover > 0 {
                self.events.push(GameEvent::ItemDropped { item, amount: leftover });
            }
        }
        Ok(())
    }

    /// Outside battle a potion is free to use. In battle it is the active
    /// member's action and waits for the lock like any other.
    fn use_potion(&mut self, target: CombatantId) -> Result<(), GameError> {
        if self.battle.is_some() {
            let report = self.with_idle_battle(|battle, player, _, _, events| {
                battle.use_potion(target, player, events)
            })?;
            return self.schedule(report);
        }
        self.player.use_potion(target)?;
        self.events.push(GameEvent::PlayEffect { id: "heal".into() });
        Ok(())
    }

    fn start_encounter(&mut self, species: SpeciesId, kind: EncounterKind) -> Result<(), GameError> {
        self.require_no_session()?;
        let serial = self.next_battle_serial;
        let session = BattleSession::start(
            serial,
            &mut self.player,
            species,
            kind,
            self.provider.as_ref(),
            &mut self.rng,
            &self.tuning.battle,
            &mut self.events,
        )?;
        self.next_battle_serial += 1;
        self.battle = Some(session);
        if self.battle.as_ref().is_some_and(|b| b.phase == BattlePhase::EnemyTurn) {
            self.enemy_acts();
        } else if self.battle.as_ref().is_some_and(BattleSession::is_over) {
            self.finish_battle();
        }
        Ok(())
    }

    /// Run a player battle action, rejecting it while a sequence is playing.
    fn with_idle_battle<T>(
        &mut self,
        action: impl FnOnce(
            &mut BattleSession,
            &mut PlayerState,
            &mut ChaCha8Rng,
            &Tuning,
            &mut Vec<GameEvent>,
        ) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let battle = self.battle.as_mut().ok_or(GameError::NoBattle)?;
        if self.sequencer.is_busy() {
            return Err(GameError::ActionInProgress);
        }
        action(battle, &mut self.player, &mut self.rng, &self.tuning, &mut self.events)
    }

    // ---- Battle flow ----

    /// Play the steps of a resolved action, then continue the battle.
    fn schedule(&mut self, report: ActionReport) -> Result<(), GameError> {
        let (serial, over) = match &self.battle {
            Some(b) => (b.serial, b.is_over()),
            None => return Ok(()),
        };
        let continuation = if over {
            Continuation::Finish
        } else {
            Continuation::AdvanceTurn
        };
        if report.steps.is_empty() {
            self.run_continuation(continuation);
            return Ok(());
        }
        self.sequencer.start(report.steps, serial, continuation)
    }

    fn run_continuation(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::Finish => self.finish_battle(),
            Continuation::AdvanceTurn => {
                let Some(battle) = self.battle.as_mut() else {
                    return;
                };
                battle.advance_turn(&self.player);
                let (phase, over) = (battle.phase, battle.is_over());
                if over {
                    self.finish_battle();
                } else if phase == BattlePhase::EnemyTurn {
                    self.enemy_acts();
                }
            }
        }
    }

    fn enemy_acts(&mut self) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        let report = battle.enemy_move(&mut self.player, &mut self.rng, &self.tuning.battle, &mut self.events);
        if let Err(e) = self.schedule(report) {
            warn!("Enemy action not sequenced: {e}");
        }
    }

    fn finish_battle(&mut self) {
        self.sequencer.clear();
        if let Some(battle) = self.battle.take() {
            battle::conclude(
                &battle,
                &mut self.player,
                &mut self.rng,
                self.provider.as_ref(),
                &self.tuning.battle,
                &mut self.events,
            );
        }
    }

    // ---- Raid flow ----

    fn run_raid(&mut self, dt: f64) {
        let Some(raid) = self.raid.as_mut() else {
            return;
        };
        if dt <= 0.0 {
            return;
        }
        if let Some(outcome) = raid.step(dt, &mut self.player, &mut self.rng, &self.tuning.raid, &mut self.events) {
            self.raid = None;
            raid::conclude(
                outcome,
                &mut self.player,
                &mut self.rng,
                self.provider.as_ref(),
                &self.tuning.raid,
                &mut self.events,
            );
        }
    }
}
