//! Tunable rule parameters.
//!
//! Defaults mirror `constants`. Every field is `#[serde(default)]`, so a
//! partial JSON document overrides only the values it names.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Battle tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleTuning {
    pub baseline_strength: f64,
    pub variance_min: f64,
    pub variance_max: f64,
    pub crit_multiplier: f64,
    pub crit_chance_cap: f64,
    pub paralysis_block_chance: f64,
    pub sleep_freeze_cure_chance: f64,
    pub boss_stat_multiplier: f64,
    pub boss_hp_multiplier: f64,
    pub xp_per_enemy_level: u32,
    pub currency_per_enemy_level: u32,
}

impl Default for BattleTuning {
    fn default() -> Self {
        Self {
            baseline_strength: BASELINE_STRENGTH,
            variance_min: DAMAGE_VARIANCE_MIN,
            variance_max: DAMAGE_VARIANCE_MAX,
            crit_multiplier: CRIT_MULTIPLIER,
            crit_chance_cap: CRIT_CHANCE_CAP,
            paralysis_block_chance: PARALYSIS_BLOCK_CHANCE,
            sleep_freeze_cure_chance: SLEEP_FREEZE_CURE_CHANCE,
            boss_stat_multiplier: BOSS_STAT_MULTIPLIER,
            boss_hp_multiplier: BOSS_HP_MULTIPLIER,
            xp_per_enemy_level: XP_PER_ENEMY_LEVEL,
            currency_per_enemy_level: CURRENCY_PER_ENEMY_LEVEL,
        }
    }
}

/// Raid tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidTuning {
    pub duration_secs: f64,
    pub base_health: f64,
    pub spawn_radius: f64,
    pub spawn_interval_start: f64,
    pub spawn_interval_min: f64,
    pub spawn_ramp: f64,
    pub contact_radius: f64,
    pub base_damage_per_sec: f64,
    pub defender_damage_per_sec: f64,
    pub turret_range: f64,
    pub projectile_speed: f64,
    pub reward_currency: u32,
    pub reward_xp: u32,
}

impl Default for RaidTuning {
    fn default() -> Self {
        Self {
            duration_secs: RAID_DURATION_SECS,
            base_health: RAID_BASE_HEALTH,
            spawn_radius: RAID_SPAWN_RADIUS,
            spawn_interval_start: RAID_SPAWN_INTERVAL_START,
            spawn_interval_min: RAID_SPAWN_INTERVAL_MIN,
            spawn_ramp: RAID_SPAWN_RAMP,
            contact_radius: RAID_CONTACT_RADIUS,
            base_damage_per_sec: RAID_BASE_DAMAGE_PER_SEC,
            defender_damage_per_sec: RAID_DEFENDER_DAMAGE_PER_SEC,
            turret_range: TURRET_RANGE,
            projectile_speed: PROJECTILE_SPEED,
            reward_currency: RAID_REWARD_CURRENCY,
            reward_xp: RAID_REWARD_XP,
        }
    }
}

/// All tunables, grouped by subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub battle: BattleTuning,
    pub raid: RaidTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
