//! Game constants and default tuning parameters.

/// Fixed update rate used by `GameEngine::tick` (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per fixed tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Combatants ---

/// Lower bound of a rolled stat.
pub const STAT_MIN: u32 = 12;

/// Upper bound of a rolled stat (bosses may exceed it).
pub const STAT_MAX: u32 = 100;

/// Moves a combatant can know.
pub const MAX_MOVES: usize = 4;

/// XP needed per level: threshold is `level * XP_PER_LEVEL`.
pub const XP_PER_LEVEL: u32 = 100;

/// Level cap.
pub const MAX_LEVEL: u32 = 100;

// --- Battle ---

/// Strength at which the strength ratio in the damage formula is 1.0.
pub const BASELINE_STRENGTH: f64 = 50.0;

/// Random damage variance band.
pub const DAMAGE_VARIANCE_MIN: f64 = 0.85;
pub const DAMAGE_VARIANCE_MAX: f64 = 1.15;

/// Critical hit damage multiplier.
pub const CRIT_MULTIPLIER: f64 = 1.5;

/// Crit chance per point of the special stat.
pub const CRIT_CHANCE_PER_SPECIAL: f64 = 1.0 / 400.0;

/// Crit chance cap.
pub const CRIT_CHANCE_CAP: f64 = 0.15;

/// Chance paralysis blocks an action.
pub const PARALYSIS_BLOCK_CHANCE: f64 = 0.25;

/// Chance a sleeping or frozen combatant recovers at the start of its turn.
pub const SLEEP_FREEZE_CURE_CHANCE: f64 = 0.33;

/// Poison ticks for `max_hp / POISON_DIVISOR`.
pub const POISON_DIVISOR: u32 = 8;

/// Burn ticks for `max_hp / BURN_DIVISOR`.
pub const BURN_DIVISOR: u32 = 16;

/// Enemy level variance around the party's average level.
pub const ENEMY_LEVEL_VARIANCE: i32 = 2;

/// Boss stat and HP multipliers.
pub const BOSS_STAT_MULTIPLIER: f64 = 1.5;
pub const BOSS_HP_MULTIPLIER: f64 = 3.0;

/// Arena stat multiplier (plus one level per cleared stage).
pub const ARENA_STAT_MULTIPLIER: f64 = 1.2;

/// XP awarded per enemy level on a win (split across the living party).
pub const XP_PER_ENEMY_LEVEL: u32 = 50;

/// Currency awarded per enemy level on a win.
pub const CURRENCY_PER_ENEMY_LEVEL: u32 = 10;

/// Number of shake checks during a capture.
pub const CAPTURE_SHAKES: u32 = 3;

/// Catch rates at or above this always succeed.
pub const GUARANTEED_CATCH_RATE: f64 = 255.0;

/// Steps a trainer rival waits before it can be challenged again.
pub const RIVAL_COOLDOWN_STEPS: u32 = 1_000;

/// HP restored by a potion.
pub const POTION_HEAL: u32 = 20;

// --- Sequencer step durations (milliseconds) ---

pub const STEP_ANNOUNCE_MS: u32 = 600;
pub const STEP_ANIMATE_MS: u32 = 400;
pub const STEP_DAMAGE_MS: u32 = 300;
pub const STEP_STATUS_MS: u32 = 300;

/// Default duration of a transient message (milliseconds).
pub const MESSAGE_DURATION_MS: u32 = 2_000;

// --- Raid ---

/// Raid length in seconds.
pub const RAID_DURATION_SECS: f64 = 120.0;

/// Base health pool.
pub const RAID_BASE_HEALTH: f64 = 100.0;

/// Number of turret slots.
pub const TURRET_SLOTS: usize = 8;

/// Radius of the turret ring around the base.
pub const TURRET_RING_RADIUS: f64 = 3.0;

/// Radius of the circle enemies spawn on.
pub const RAID_SPAWN_RADIUS: f64 = 14.0;

/// Initial spawn threshold (seconds between spawns).
pub const RAID_SPAWN_INTERVAL_START: f64 = 2.5;

/// Spawn threshold floor.
pub const RAID_SPAWN_INTERVAL_MIN: f64 = 0.4;

/// Multiplier applied to the spawn threshold after each spawn.
pub const RAID_SPAWN_RAMP: f64 = 0.95;

/// Enemy base HP and growth per elapsed second.
pub const RAID_ENEMY_BASE_HP: f64 = 20.0;
pub const RAID_ENEMY_HP_PER_SEC: f64 = 0.25;

/// Enemy base speed (units/s) and growth per elapsed second.
pub const RAID_ENEMY_BASE_SPEED: f64 = 1.2;
pub const RAID_ENEMY_SPEED_PER_SEC: f64 = 0.01;

/// Contact radius for enemies against the base or a turret.
pub const RAID_CONTACT_RADIUS: f64 = 0.8;

/// Base health lost per second per enemy in contact.
pub const RAID_BASE_DAMAGE_PER_SEC: f64 = 6.0;

/// Defender HP lost per second per enemy in contact with its turret.
pub const RAID_DEFENDER_DAMAGE_PER_SEC: f64 = 4.0;

/// Turret targeting range.
pub const TURRET_RANGE: f64 = 6.0;

/// Turret cooldown: `max(TURRET_COOLDOWN_BASE - speed / 100, TURRET_COOLDOWN_MIN)`.
pub const TURRET_COOLDOWN_BASE: f64 = 2.0;
pub const TURRET_COOLDOWN_MIN: f64 = 0.3;

/// Projectile travel speed (units/s).
pub const PROJECTILE_SPEED: f64 = 12.0;

/// Projectile hit radius.
pub const PROJECTILE_HIT_RADIUS: f64 = 0.5;

/// Projectile lifetime before it fizzles (seconds).
pub const PROJECTILE_LIFETIME_SECS: f64 = 2.5;

/// Win rewards.
pub const RAID_REWARD_CURRENCY: u32 = 500;
pub const RAID_REWARD_XP: u32 = 150;

// --- Progression & economy ---

/// Merge cost in currency.
pub const MERGE_COST: u32 = 1_000;

/// Inputs consumed by a merge.
pub const MERGE_INPUTS: usize = 3;

/// Highest merge tier.
pub const MAX_MERGE_TIER: u8 = 5;

/// Steps before an egg hatches.
pub const EGG_HATCH_STEPS: u32 = 300;

/// Steps before a parent can breed again.
pub const BREED_COOLDOWN_STEPS: u32 = 500;

// --- Roster & bag ---

/// Party size.
pub const PARTY_SIZE: usize = 6;

/// Storage boxes and slots per box.
pub const STORAGE_BOXES: usize = 8;
pub const STORAGE_BOX_SLOTS: usize = 30;

/// Maximum stack size per bag item.
pub const ITEM_STACK_MAX: u32 = 99;

/// Starting currency for a new game.
pub const STARTING_CURRENCY: u32 = 300;

/// Level of the starter combatant.
pub const STARTER_LEVEL: u32 = 5;

// --- World ---

/// Resource chunk edge length in tiles.
pub const CHUNK_SIZE: i32 = 16;

/// Seconds before a harvested node respawns.
pub const NODE_RESPAWN_SECS: f64 = 60.0;

/// Chunk radius generated around the player.
pub const CHUNK_VIEW_RADIUS: i32 = 1;
/// How far from the origin a new game looks for a tile the player can walk off.
pub const SPAWN_SEARCH_RADIUS: i32 = 256;

/// Chance of a wild encounter per step on tall grass.
pub const TALL_GRASS_ENCOUNTER_CHANCE: f64 = 0.08;
/// Tile radius sampled to decide which terrain borders a patch of tall grass.
pub const ENCOUNTER_BIOME_RADIUS: i32 = 3;

// --- Persistence ---

/// Current save payload version.
pub const SAVE_VERSION: u32 = 2;

/// Name of the single save slot used by the engine.
pub const SAVE_SLOT: &str = "pocketwild_save";
