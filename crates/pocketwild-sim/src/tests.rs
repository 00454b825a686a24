//! Tests for the game engine, battle flow, raids and persistence.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pocketwild_core::combatant::{Combatant, Stats};
use pocketwild_core::commands::PlayerCommand;
use pocketwild_core::config::{BattleTuning, RaidTuning};
use pocketwild_core::constants::*;
use pocketwild_core::dex::{SpeciesInfo, SpeciesProvider, StaticDex};
use pocketwild_core::enums::*;
use pocketwild_core::error::{GameError, ProviderError};
use pocketwild_core::events::{GameEvent, Participant};
use pocketwild_core::moves::MoveKey;
use pocketwild_core::player::PlayerState;
use pocketwild_core::state::GameMode;
use pocketwild_core::types::{CombatantId, Position, SpeciesId, TileCoord};
use pocketwild_procgen::tiles::TileClassifier;

use crate::battle::{build_turn_queue, execute_move, ActionReport, BattleSession};
use crate::engine::{GameEngine, LoadOutcome, SimConfig};
use crate::raid::RaidSession;

fn make(id: u64, species: u16, level: u32, stats: Stats) -> Combatant {
    let info = StaticDex.lookup(SpeciesId(species)).unwrap();
    Combatant::from_species(CombatantId(id), &info, level, stats)
}

fn player_with(members: Vec<Combatant>) -> PlayerState {
    let mut player = PlayerState::default();
    player.next_combatant_id = members.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
    for c in members {
        player.receive(c).unwrap();
    }
    player
}

/// Engine with a Charmander starter that always moves first.
fn engine_with_starter(seed: u64) -> GameEngine {
    let mut engine = GameEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::ChooseStarter {
        species: SpeciesId(4),
    });
    engine.tick();
    engine.player_mut().party[0].stats.speed = STAT_MAX + 50;
    engine
}

fn run_ticks(engine: &mut GameEngine, ticks: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(engine.tick().events);
    }
    events
}

/// Provider that is always down.
struct OfflineDex;

impl SpeciesProvider for OfflineDex {
    fn lookup(&self, _id: SpeciesId) -> Result<SpeciesInfo, ProviderError> {
        Err(ProviderError::Unavailable("offline".into()))
    }
}

/// One move from a player combatant against an enemy.
fn strike(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    key: MoveKey,
    seed: u64,
    tuning: &BattleTuning,
) -> (ActionReport, Vec<GameEvent>) {
    let id = attacker.id;
    let mut events = Vec::new();
    let report = execute_move(
        attacker,
        Participant::Player { id },
        defender,
        Participant::Enemy,
        key,
        &mut ChaCha8Rng::seed_from_u64(seed),
        tuning,
        &mut events,
    );
    (report, events)
}

fn start_wild(engine: &mut GameEngine, species: u16) {
    engine.queue_command(PlayerCommand::StartEncounter {
        species: SpeciesId(species),
        kind: EncounterKind::Wild,
    });
    engine.tick();
}

fn has_message(events: &[GameEvent], text: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, GameEvent::Message { text: t, .. } if t == text))
}

fn quiet_raid() -> RaidTuning {
    RaidTuning {
        spawn_interval_start: 1.0e9,
        ..Default::default()
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine_with_starter(12345);
    let mut engine_b = engine_with_starter(12345);

    for i in 0..300 {
        if i % 30 == 0 {
            let commands = [
                PlayerCommand::Move { dx: 1, dy: 0 },
                PlayerCommand::StartEncounter {
                    species: SpeciesId(19),
                    kind: EncounterKind::Wild,
                },
                PlayerCommand::UseMove { slot: 0 },
            ];
            engine_a.queue_commands(commands.clone());
            engine_b.queue_commands(commands);
        }
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine_with_starter(111);
    let mut engine_b = engine_with_starter(222);
    engine_a.queue_command(PlayerCommand::StartRaid);
    engine_b.queue_command(PlayerCommand::StartRaid);

    let mut diverged = false;
    for _ in 0..500 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Starter and overworld ----

#[test]
fn test_choose_starter_once() {
    let mut engine = GameEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::ChooseStarter {
        species: SpeciesId(7),
    });
    engine.tick();
    let player = engine.player();
    assert_eq!(player.party.len(), 1);
    assert_eq!(player.party[0].level, STARTER_LEVEL);
    assert_eq!(player.party[0].species, SpeciesId(7));
    assert!(player.caught.contains(&SpeciesId(7)));

    engine.queue_command(PlayerCommand::ChooseStarter {
        species: SpeciesId(1),
    });
    let snap = engine.tick();
    assert_eq!(engine.player().party.len(), 1);
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::Message { .. })));
}

#[test]
fn test_move_follows_terrain() {
    let config = SimConfig::default();
    let classifier = TileClassifier::new(config.world_seed);
    let mut engine = GameEngine::new(config);
    let start = engine.player().position.tile();
    let east = TileCoord::new(start.x + 1, start.y);
    let walkable = classifier.classify(east).is_walkable();

    // Larger deltas are clamped to one tile.
    engine.queue_command(PlayerCommand::Move { dx: 5, dy: 0 });
    engine.tick();

    let player = engine.player();
    if walkable {
        assert_eq!(player.position.tile(), east);
        assert_eq!(player.steps, 1);
    } else {
        assert_eq!(player.position.tile(), start);
        assert_eq!(player.steps, 0);
    }
}

#[test]
fn test_new_game_can_always_walk_away() {
    for world_seed in 0..100 {
        let engine = GameEngine::new(SimConfig {
            world_seed,
            ..Default::default()
        });
        let classifier = TileClassifier::new(world_seed);
        let start = engine.player().position.tile();
        assert!(classifier.can_stand(start), "world seed {world_seed}: stuck at {start:?}");
        assert_eq!(engine.player().home, engine.player().position);
    }
}

#[test]
fn test_move_rejected_during_raid() {
    let mut engine = engine_with_starter(5);
    engine.queue_command(PlayerCommand::StartRaid);
    engine.tick();
    assert_eq!(engine.mode(), GameMode::Raid);

    let before = engine.player().position;
    engine.queue_command(PlayerCommand::Move { dx: 1, dy: 0 });
    engine.tick();
    assert_eq!(engine.player().position, before);
}

#[test]
fn test_harvest_depletes_and_respawns() {
    let mut engine = GameEngine::new(SimConfig::default());
    let mut found = None;
    for chunk in engine.resources().visited_chunks() {
        if let Some((tile, node)) = engine.resources().nodes_in_chunk(*chunk).next() {
            found = Some((*tile, *node));
            break;
        }
    }
    let (tile, node) = found.expect("some node near the origin");
    engine.player_mut().position = tile.center();

    for _ in 0..node.hp {
        engine.queue_command(PlayerCommand::Harvest { x: tile.x, y: tile.y });
    }
    let snap = engine.tick();
    assert!(engine.resources().node(tile).is_none());
    assert!(engine.player().inventory.count(node.kind.loot()) > 0);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::NodeHarvested { depleted: true, .. }
    )));

    let snap = engine.update(NODE_RESPAWN_SECS + 1.0);
    assert!(engine.resources().node(tile).is_some());
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::NodeRespawned { .. })));
}

#[test]
fn test_harvest_out_of_reach_is_rejected() {
    let mut engine = GameEngine::new(SimConfig::default());
    let here = engine.player().position.tile();
    engine.queue_command(PlayerCommand::Harvest {
        x: here.x + 10,
        y: here.y + 10,
    });
    let snap = engine.tick();
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::Message { .. })));
}

// ---- Damage ----

#[test]
fn test_basic_move_damage_range() {
    let tuning = BattleTuning::default();
    for seed in 0..50 {
        let mut attacker = make(1, 19, 10, Stats::new(50, 0, 10, 0));
        let mut defender = make(2, 19, 10, Stats::new(50, 0, 10, 0));
        defender.set_max_hp(100);
        defender.heal_full();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut events = Vec::new();
        let report = execute_move(
            &mut attacker,
            Participant::Player { id: CombatantId(1) },
            &mut defender,
            Participant::Enemy,
            MoveKey::new(ElementType::Normal, 0),
            &mut rng,
            &tuning,
            &mut events,
        );

        let dealt = events
            .iter()
            .find_map(|e| match e {
                GameEvent::DamageApplied { amount, .. } => Some(*amount),
                _ => None,
            })
            .expect("the move always hits");
        assert!((34..=46).contains(&dealt), "damage {dealt} out of range");
        assert_eq!(defender.hp, 100 - dealt);
        assert!(!report.fainted);
    }
}

#[test]
fn test_fainted_attacker_does_nothing() {
    let tuning = BattleTuning::default();
    let mut attacker = make(1, 19, 10, Stats::new(50, 50, 50, 50));
    let mut defender = make(2, 19, 10, Stats::new(50, 50, 50, 50));
    attacker.hp = 0;
    let mut events = Vec::new();
    let report = execute_move(
        &mut attacker,
        Participant::Player { id: CombatantId(1) },
        &mut defender,
        Participant::Enemy,
        MoveKey::new(ElementType::Normal, 0),
        &mut ChaCha8Rng::seed_from_u64(1),
        &tuning,
        &mut events,
    );
    assert!(report.steps.is_empty());
    assert!(events.is_empty());
    assert_eq!(defender.hp, defender.max_hp);
}

// ---- Status effects ----

#[test]
fn test_paralysis_can_block_the_action() {
    let tuning = BattleTuning {
        paralysis_block_chance: 1.0,
        ..Default::default()
    };
    let mut attacker = make(1, 19, 10, Stats::new(50, 50, 50, 50));
    let mut defender = make(2, 19, 10, Stats::new(50, 50, 50, 50));
    attacker.status = StatusCondition::Paralyzed;

    let (report, events) = strike(&mut attacker, &mut defender, MoveKey::new(ElementType::Normal, 0), 1, &tuning);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::ActionBlocked {
            status: StatusCondition::Paralyzed,
            ..
        }
    )));
    assert!(!events.iter().any(|e| matches!(e, GameEvent::MoveUsed { .. })));
    assert_eq!(defender.hp, defender.max_hp);
    assert_eq!(attacker.status, StatusCondition::Paralyzed);
    assert!(!report.fainted);
}

#[test]
fn test_sleep_and_freeze_block_then_cure() {
    for status in [StatusCondition::Asleep, StatusCondition::Frozen] {
        let mut attacker = make(1, 19, 10, Stats::new(50, 50, 50, 50));
        let mut defender = make(2, 19, 10, Stats::new(50, 50, 50, 50));
        attacker.status = status;

        let stays = BattleTuning {
            sleep_freeze_cure_chance: 0.0,
            ..Default::default()
        };
        let (_, events) = strike(&mut attacker, &mut defender, MoveKey::new(ElementType::Normal, 0), 2, &stays);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ActionBlocked { .. })));
        assert_eq!(attacker.status, status);
        assert_eq!(defender.hp, defender.max_hp);

        let wakes = BattleTuning {
            sleep_freeze_cure_chance: 1.0,
            ..Default::default()
        };
        let (_, events) = strike(&mut attacker, &mut defender, MoveKey::new(ElementType::Normal, 0), 3, &wakes);
        assert!(events.iter().any(|e| matches!(e, GameEvent::StatusCured { status: s, .. } if *s == status)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::MoveUsed { .. })));
        assert_eq!(attacker.status, StatusCondition::None);
        assert!(defender.hp < defender.max_hp);
    }
}

#[test]
fn test_status_move_never_overwrites_existing_status() {
    let tuning = BattleTuning::default();
    let paralyze = MoveKey::new(ElementType::Electric, 2);
    for seed in 0..40 {
        let mut attacker = make(1, 25, 10, Stats::new(50, 50, 50, 50));
        let mut defender = make(2, 19, 10, Stats::new(50, 50, 50, 50));
        defender.status = StatusCondition::Burned;
        let (_, events) = strike(&mut attacker, &mut defender, paralyze, seed, &tuning);
        assert_eq!(defender.status, StatusCondition::Burned);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::StatusInflicted { .. })));
    }

    let inflicted = (0..40).any(|seed| {
        let mut attacker = make(1, 25, 10, Stats::new(50, 50, 50, 50));
        let mut defender = make(2, 19, 10, Stats::new(50, 50, 50, 50));
        strike(&mut attacker, &mut defender, paralyze, seed, &tuning);
        defender.status == StatusCondition::Paralyzed
    });
    assert!(inflicted);
}

#[test]
fn test_status_tick_can_faint_the_actor() {
    let tuning = BattleTuning::default();
    for status in [StatusCondition::Poisoned, StatusCondition::Burned] {
        let mut attacker = make(1, 19, 10, Stats::new(50, 50, 50, 50));
        let mut defender = make(2, 19, 10, Stats::new(50, 50, 50, 50));
        attacker.status = status;
        attacker.hp = 1;

        let (report, events) = strike(&mut attacker, &mut defender, MoveKey::new(ElementType::Normal, 0), 4, &tuning);
        assert!(events.iter().any(|e| matches!(e, GameEvent::MoveUsed { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::StatusDamage { amount: 1, status: s, .. } if *s == status
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Fainted {
                target: Participant::Player { id: CombatantId(1) }
            }
        )));
        assert!(attacker.is_fainted());
        assert!(report.fainted);
    }
}

#[test]
fn test_member_fainted_by_poison_loses_later_turns() {
    let mut engine = engine_with_starter(16);
    let starter = engine.player().party[0].id;
    {
        let player = engine.player_mut();
        let id = player.allocate_id();
        player
            .receive(make(id.0, 19, 30, Stats::new(90, 150, 40, 40)))
            .unwrap();
        let lead = &mut player.party[0];
        lead.status = StatusCondition::Poisoned;
        lead.hp = 1;
    }
    start_wild(&mut engine, 19);
    assert_eq!(engine.battle().and_then(|b| b.active_member()), Some(starter));

    engine.queue_command(PlayerCommand::UseMove { slot: 0 });
    let mut events = engine.tick().events;
    let mut fainted_seen = false;
    for _ in 0..2_000 {
        fainted_seen |= events.iter().any(|e| matches!(
            e,
            GameEvent::Fainted { target: Participant::Player { id } } if *id == starter
        ));
        if fainted_seen {
            assert!(!events.iter().any(|e| matches!(
                e,
                GameEvent::TurnStarted { actor: Participant::Player { id } } if *id == starter
            )));
        }
        let Some(battle) = engine.battle() else {
            break;
        };
        if fainted_seen && !engine.is_busy() {
            assert_ne!(battle.active_member(), Some(starter));
        }
        if battle.phase == BattlePhase::PlayerTurn && !engine.is_busy() {
            engine.queue_command(PlayerCommand::UseMove { slot: 0 });
        }
        events = engine.tick().events;
    }
    assert!(fainted_seen);
    assert!(engine.player().party[0].is_fainted() || engine.battle().is_none());
}

// ---- Turn queue ----

#[test]
fn test_turn_queue_skips_fainted_and_orders_by_speed() {
    let slow = make(1, 19, 5, Stats::new(40, 40, 30, 40));
    let mut fainted = make(2, 19, 5, Stats::new(40, 40, 90, 40));
    fainted.hp = 0;
    let quick = make(3, 19, 5, Stats::new(40, 40, 60, 40));
    let player = player_with(vec![slow, fainted, quick]);
    let enemy = make(0, 16, 5, Stats::new(40, 40, 45, 40));

    let order: Vec<Participant> = build_turn_queue(&player, &enemy)
        .into_iter()
        .map(|e| e.actor)
        .collect();
    assert_eq!(
        order,
        vec![
            Participant::Player { id: CombatantId(3) },
            Participant::Enemy,
            Participant::Player { id: CombatantId(1) },
        ]
    );
}

// ---- Battle flow ----

#[test]
fn test_encounter_starts_on_player_turn() {
    let mut engine = engine_with_starter(9);
    engine.queue_command(PlayerCommand::StartEncounter {
        species: SpeciesId(19),
        kind: EncounterKind::Wild,
    });
    let snap = engine.tick();
    assert_eq!(snap.mode, GameMode::Battle);
    let battle = snap.battle.expect("battle view");
    assert_eq!(battle.phase, BattlePhase::PlayerTurn);
    assert!(!battle.busy);
    assert!(engine.player().seen.contains(&SpeciesId(19)));
}

#[test]
fn test_input_rejected_while_sequence_plays() {
    let mut engine = engine_with_starter(10);
    engine.queue_command(PlayerCommand::StartEncounter {
        species: SpeciesId(19),
        kind: EncounterKind::Wild,
    });
    engine.tick();

    engine.queue_commands([
        PlayerCommand::UseMove { slot: 0 },
        PlayerCommand::UseMove { slot: 0 },
    ]);
    let snap = engine.tick();
    assert!(engine.is_busy());

    let player_turns = snap
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::TurnStarted { actor: Participant::Player { .. } }))
        .count();
    assert_eq!(player_turns, 1);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::Message { text, .. } if text == "An action is already in progress"
    )));
}

#[test]
fn test_use_move_without_battle_is_rejected() {
    let mut engine = engine_with_starter(11);
    engine.queue_command(PlayerCommand::UseMove { slot: 0 });
    let snap = engine.tick();
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::Message { text, .. } if text == "No battle is active"
    )));
}

#[test]
fn test_master_ball_always_catches() {
    for seed in 0..5 {
        let mut engine = engine_with_starter(seed);
        engine.player_mut().inventory.add(ItemKind::MasterBall, 1);
        engine.queue_command(PlayerCommand::StartEncounter {
            species: SpeciesId(19),
            kind: EncounterKind::Wild,
        });
        engine.tick();
        engine.queue_command(PlayerCommand::ThrowBall {
            ball: BallKind::Master,
        });
        let events = run_ticks(&mut engine, 120);

        assert!(events.iter().any(|e| matches!(e, GameEvent::CaptureSucceeded { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::BattleEnded {
                outcome: BattleOutcome::Captured
            }
        )));
        assert!(engine.battle().is_none());
        assert_eq!(engine.player().party.len(), 2);
        assert!(engine.player().caught.contains(&SpeciesId(19)));
        assert_eq!(engine.player().inventory.count(ItemKind::MasterBall), 0);
    }
}

#[test]
fn test_capture_rejected_outside_wild() {
    let mut engine = engine_with_starter(12);
    engine.queue_command(PlayerCommand::StartEncounter {
        species: SpeciesId(19),
        kind: EncounterKind::Trainer,
    });
    engine.tick();
    let balls = engine.player().inventory.count(ItemKind::PokeBall);

    engine.queue_command(PlayerCommand::ThrowBall {
        ball: BallKind::Poke,
    });
    engine.tick();
    assert_eq!(engine.player().inventory.count(ItemKind::PokeBall), balls);
    let battle = engine.battle().expect("battle continues");
    assert_eq!(battle.phase, BattlePhase::PlayerTurn);
}

#[test]
fn test_run_away_ends_wild_encounter() {
    let mut engine = engine_with_starter(13);
    engine.queue_command(PlayerCommand::StartEncounter {
        species: SpeciesId(19),
        kind: EncounterKind::Wild,
    });
    engine.tick();
    engine.queue_command(PlayerCommand::RunAway);
    let snap = engine.tick();
    assert_eq!(snap.mode, GameMode::Overworld);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::BattleEnded {
            outcome: BattleOutcome::Fled
        }
    )));
}

#[test]
fn test_battle_runs_to_completion() {
    let mut engine = engine_with_starter(14);
    engine.queue_command(PlayerCommand::StartEncounter {
        species: SpeciesId(10),
        kind: EncounterKind::Wild,
    });
    engine.tick();

    let mut ended = false;
    for _ in 0..3_000 {
        if engine.battle().is_some_and(|b| b.phase == BattlePhase::PlayerTurn) && !engine.is_busy() {
            engine.queue_command(PlayerCommand::UseMove { slot: 0 });
        }
        let snap = engine.tick();
        if snap
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BattleEnded { .. }))
        {
            ended = true;
            break;
        }
    }
    assert!(ended, "battle should end");
    assert_eq!(engine.mode(), GameMode::Overworld);
}

#[test]
fn test_pending_sequence_dropped_when_session_cleared() {
    let mut engine = engine_with_starter(15);
    let save = engine.save("before").unwrap();

    engine.queue_command(PlayerCommand::StartEncounter {
        species: SpeciesId(19),
        kind: EncounterKind::Wild,
    });
    engine.tick();
    engine.queue_command(PlayerCommand::UseMove { slot: 0 });
    engine.tick();
    assert!(engine.is_busy());

    assert_eq!(engine.load_save(&save), LoadOutcome::Loaded);
    assert!(!engine.is_busy());
    assert_eq!(engine.mode(), GameMode::Overworld);

    let events = run_ticks(&mut engine, 120);
    assert!(!events.iter().any(|e| matches!(
        e,
        GameEvent::BattleEnded { .. } | GameEvent::TurnStarted { .. }
    )));
}

#[test]
fn test_provider_failure_keeps_overworld() {
    let mut engine = GameEngine::with_provider(SimConfig::default(), Box::new(OfflineDex));
    engine
        .player_mut()
        .receive(make(1, 4, 5, Stats::new(40, 40, 40, 40)))
        .unwrap();
    engine.player_mut().next_combatant_id = 2;

    engine.queue_command(PlayerCommand::StartEncounter {
        species: SpeciesId(19),
        kind: EncounterKind::Wild,
    });
    let snap = engine.tick();
    assert_eq!(snap.mode, GameMode::Overworld);
    assert!(snap.battle.is_none());
    assert!(engine.battle().is_none());
    assert!(!engine.is_busy());
    assert!(!engine.player().seen.contains(&SpeciesId(19)));
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::Message { .. })));
    assert!(!snap.events.iter().any(|e| matches!(e, GameEvent::EncounterStarted { .. })));

    // Starters need species data too.
    let mut fresh = GameEngine::with_provider(SimConfig::default(), Box::new(OfflineDex));
    fresh.queue_command(PlayerCommand::ChooseStarter {
        species: SpeciesId(4),
    });
    let snap = fresh.tick();
    assert!(fresh.player().party.is_empty());
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::Message { .. })));
}

// ---- Potions in battle ----

#[test]
fn test_potion_waits_for_the_action_lock() {
    let mut engine = engine_with_starter(17);
    let id = engine.player().party[0].id;
    start_wild(&mut engine, 19);
    engine.queue_command(PlayerCommand::UseMove { slot: 0 });
    engine.tick();
    assert!(engine.is_busy());

    engine.player_mut().party[0].hp = 1;
    let potions = engine.player().inventory.count(ItemKind::Potion);
    engine.queue_command(PlayerCommand::UsePotion { target: id });
    let snap = engine.tick();

    assert!(has_message(&snap.events, "An action is already in progress"));
    assert_eq!(engine.player().party[0].hp, 1);
    assert_eq!(engine.player().inventory.count(ItemKind::Potion), potions);
}

#[test]
fn test_potion_in_battle_spends_the_turn() {
    let mut engine = engine_with_starter(18);
    let id = engine.player().party[0].id;
    start_wild(&mut engine, 19);
    engine.player_mut().party[0].hp = 1;

    engine.queue_command(PlayerCommand::UsePotion { target: id });
    let snap = engine.tick();
    assert!(engine.is_busy());
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::PlayEffect { .. })));
    let healed = &engine.player().party[0];
    assert_eq!(healed.hp, (1 + POTION_HEAL).min(healed.max_hp));

    let events = run_ticks(&mut engine, 120);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::TurnStarted {
            actor: Participant::Enemy
        }
    )));
}

#[test]
fn test_potion_rejected_on_enemy_turn() {
    let mut player = player_with(vec![make(1, 4, 5, Stats::new(40, 40, 0, 40))]);
    player.inventory.add(ItemKind::Potion, 1);
    let mut events = Vec::new();
    let mut session = BattleSession::start(
        1,
        &mut player,
        SpeciesId(19),
        EncounterKind::Wild,
        &StaticDex,
        &mut ChaCha8Rng::seed_from_u64(5),
        &BattleTuning::default(),
        &mut events,
    )
    .unwrap();
    assert_eq!(session.phase, BattlePhase::EnemyTurn);

    let potions = player.inventory.count(ItemKind::Potion);
    assert_eq!(
        session.use_potion(CombatantId(1), &mut player, &mut events),
        Err(GameError::NotPlayerTurn)
    );
    assert_eq!(player.inventory.count(ItemKind::Potion), potions);
}

#[test]
fn test_potion_revives_into_turn_order() {
    let mut engine = engine_with_starter(19);
    let partner = {
        let player = engine.player_mut();
        let id = player.allocate_id();
        player
            .receive(make(id.0, 19, 5, Stats::new(40, 40, 40, 40)))
            .unwrap();
        player.party[1].hp = 0;
        id
    };
    start_wild(&mut engine, 19);
    let in_queue = |engine: &GameEngine| {
        engine.battle().is_some_and(|b| {
            b.turn_queue()
                .iter()
                .any(|e| e.actor == Participant::Player { id: partner })
        })
    };
    assert!(!in_queue(&engine));

    engine.queue_command(PlayerCommand::UsePotion { target: partner });
    engine.tick();
    assert!(!engine.player().party[1].is_fainted());

    // The queue is rebuilt once the potion's sequence finishes, before anyone else acts.
    let mut requeued = false;
    for _ in 0..120 {
        let snap = engine.tick();
        let enemy_acted = snap.events.iter().any(|e| matches!(
            e,
            GameEvent::TurnStarted {
                actor: Participant::Enemy
            }
        ));
        if enemy_acted || !engine.is_busy() {
            requeued = in_queue(&engine);
            break;
        }
    }
    assert!(requeued);
}

// ---- Raid ----

#[test]
fn test_raid_terminates_and_heals() {
    let mut engine = engine_with_starter(21);
    engine.queue_command(PlayerCommand::StartRaid);
    let snap = engine.tick();
    assert_eq!(snap.mode, GameMode::Raid);
    assert!(snap.raid.is_some());

    let limit = ((RAID_DURATION_SECS + 5.0) * TICK_RATE as f64) as usize;
    let events = run_ticks(&mut engine, limit);
    assert!(engine.raid().is_none());
    assert!(events.iter().any(|e| matches!(e, GameEvent::RaidEnded { .. })));
    assert!(engine.player().party.iter().all(|c| c.hp == c.max_hp));
}

#[test]
fn test_raid_needs_a_defender() {
    let mut engine = GameEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::StartRaid);
    engine.tick();
    assert_eq!(engine.mode(), GameMode::Overworld);
}

#[test]
fn test_raid_loss_beats_timer_in_same_tick() {
    let mut player = player_with(vec![make(1, 4, 5, Stats::new(40, 40, 40, 40))]);
    let tuning = RaidTuning {
        duration_secs: 0.05,
        base_health: 0.1,
        ..quiet_raid()
    };
    let mut events = Vec::new();
    let mut raid = RaidSession::start(&player, &tuning, &mut events).unwrap();
    raid.spawn_enemy_at(Position::new(0.0, 0.0), 100.0, 0.0);

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let outcome = raid.step(0.1, &mut player, &mut rng, &tuning, &mut events);
    assert_eq!(outcome, Some(RaidOutcome::Lost));
}

#[test]
fn test_base_damage_only_on_contact() {
    let mut player = player_with(vec![make(1, 4, 5, Stats::new(40, 40, 40, 40))]);
    let tuning = quiet_raid();
    let mut events = Vec::new();
    let mut raid = RaidSession::start(&player, &tuning, &mut events).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    raid.spawn_enemy_at(Position::new(0.0, 10.0), 1_000.0, 0.0);
    raid.step(0.1, &mut player, &mut rng, &tuning, &mut events);
    assert_eq!(raid.base_health, raid.base_health_max);

    raid.spawn_enemy_at(Position::new(0.0, 0.5), 1_000.0, 0.0);
    raid.step(0.1, &mut player, &mut rng, &tuning, &mut events);
    let expected = raid.base_health_max - tuning.base_damage_per_sec * 0.1;
    assert!((raid.base_health - expected).abs() < 1e-9);
}

#[test]
fn test_turret_shoots_down_enemy() {
    let mut player = player_with(vec![make(1, 4, 5, Stats::new(40, 40, 40, 40))]);
    let tuning = quiet_raid();
    let mut events = Vec::new();
    let mut raid = RaidSession::start(&player, &tuning, &mut events).unwrap();
    let slot = raid.turrets[0].position;
    raid.spawn_enemy_at(Position::new(slot.x + 1.0, slot.y), 1.0, 0.0);

    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..10 {
        raid.step(0.1, &mut player, &mut rng, &tuning, &mut events);
        if raid.enemy_count() == 0 {
            break;
        }
    }
    assert_eq!(raid.enemy_count(), 0);
    assert_eq!(raid.enemies_defeated, 1);
    assert!(events.iter().any(|e| matches!(e, GameEvent::TurretFired { slot: 0 })));
    assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyDefeated { .. })));
}

#[test]
fn test_fainted_defender_is_replaced() {
    let members: Vec<Combatant> = (1..=9)
        .map(|i| make(i, 19, 5 + i as u32, Stats::new(40, 40, 40, 40)))
        .collect();
    let mut player = player_with(members);
    let tuning = quiet_raid();
    let mut events = Vec::new();
    let mut raid = RaidSession::start(&player, &tuning, &mut events).unwrap();

    let assigned: Vec<CombatantId> = raid.turrets.iter().filter_map(|t| t.occupant).collect();
    assert_eq!(assigned.len(), TURRET_SLOTS);
    let spare = (1..=9)
        .map(CombatantId)
        .find(|id| !assigned.contains(id))
        .unwrap();
    let first = raid.turrets[0].occupant.unwrap();
    player.combatant_mut(first).unwrap().hp = 1;

    let slot = raid.turrets[0].position;
    raid.spawn_enemy_at(slot, 1.0e6, 0.0);
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    raid.step(0.5, &mut player, &mut rng, &tuning, &mut events);

    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::DefenderFainted { slot: 0, id } if *id == first
    )));
    assert_eq!(raid.turrets[0].occupant, Some(spare));
}

// ---- Roster ----

#[test]
fn test_breed_through_engine() {
    let mut engine = engine_with_starter(30);
    let partner = {
        let player = engine.player_mut();
        let id = player.allocate_id();
        player
            .receive(make(id.0, 4, 8, Stats::new(40, 40, 40, 40)))
            .unwrap();
        id
    };
    let starter = engine.player().party[0].id;

    engine.queue_command(PlayerCommand::Breed {
        a: starter,
        b: partner,
    });
    let snap = engine.tick();
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::EggLaid { .. })));
    assert!(engine.player().all_combatants().any(|c| c.is_egg));
}

#[test]
fn test_roster_changes_rejected_during_raid() {
    let mut engine = engine_with_starter(31);
    engine.queue_command(PlayerCommand::StartRaid);
    engine.tick();
    let ids: Vec<CombatantId> = engine.player().party.iter().map(|c| c.id).collect();

    engine.queue_command(PlayerCommand::Merge { ids });
    let snap = engine.tick();
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::Message { text, .. } if text == "A battle or raid is already active"
    )));
}

#[test]
fn test_potion_heals_party_member() {
    let mut engine = engine_with_starter(32);
    let id = engine.player().party[0].id;
    engine.player_mut().party[0].hp = 1;
    let potions = engine.player().inventory.count(ItemKind::Potion);

    engine.queue_command(PlayerCommand::UsePotion { target: id });
    engine.tick();
    let c = &engine.player().party[0];
    assert_eq!(c.hp, (1 + POTION_HEAL).min(c.max_hp));
    assert_eq!(engine.player().inventory.count(ItemKind::Potion), potions - 1);
}

// ---- Persistence ----

#[test]
fn test_save_and_load_restore_player() {
    let mut engine = engine_with_starter(40);
    let save = engine.save("slot1").unwrap();
    let saved = engine.player().clone();

    engine.player_mut().currency = 5;
    engine.player_mut().party.clear();
    assert_eq!(engine.load_save(&save), LoadOutcome::Loaded);
    assert_eq!(engine.player(), &saved);
}

#[test]
fn test_load_version_mismatch_leaves_state_untouched() {
    let mut engine = engine_with_starter(41);
    let mut doc: serde_json::Value = serde_json::from_str(&engine.save("slot1").unwrap()).unwrap();
    doc["version"] = serde_json::json!(99);
    let before = engine.player().clone();

    assert_eq!(engine.load_save(&doc.to_string()), LoadOutcome::NoSaveLoaded);
    assert_eq!(engine.player(), &before);
    assert_eq!(engine.load_save("not json"), LoadOutcome::NoSaveLoaded);
    assert_eq!(engine.player(), &before);
}
