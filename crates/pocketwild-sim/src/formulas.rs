//! Battle formulas: damage, critical hits, status prevention and capture odds.
//!
//! The deterministic parts take their random inputs as arguments so they can
//! be checked exactly; the `roll_*` helpers draw those inputs from an RNG.

use rand::Rng;

use pocketwild_core::config::BattleTuning;
use pocketwild_core::constants::{
    BURN_DIVISOR, CAPTURE_SHAKES, CRIT_CHANCE_PER_SPECIAL, GUARANTEED_CATCH_RATE, POISON_DIVISOR,
};
use pocketwild_core::enums::StatusCondition;

/// Inputs to the damage formula that do not involve randomness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInput {
    pub power: u32,
    pub attacker_level: u32,
    pub defender_level: u32,
    pub strength: u32,
    pub defense: u32,
    pub effectiveness: f64,
}

/// `floor(power * level ratio * strength ratio * effectiveness * crit * variance * 100 / (100 + defense))`.
/// At least 1 unless the defender is immune.
pub fn compute_damage(input: &DamageInput, crit: bool, variance: f64, tuning: &BattleTuning) -> u32 {
    if input.effectiveness <= 0.0 {
        return 0;
    }
    let level_ratio = input.attacker_level as f64 / input.defender_level.max(1) as f64;
    let strength_ratio = input.strength as f64 / tuning.baseline_strength;
    let crit_multiplier = if crit { tuning.crit_multiplier } else { 1.0 };
    let defense_factor = 100.0 / (100.0 + input.defense as f64);

    let raw = input.power as f64
        * level_ratio
        * strength_ratio
        * input.effectiveness
        * crit_multiplier
        * variance
        * defense_factor;
    (raw.floor() as u32).max(1)
}

/// Crit chance from the special stat, capped.
pub fn crit_chance(special: u32, tuning: &BattleTuning) -> f64 {
    (special as f64 * CRIT_CHANCE_PER_SPECIAL).min(tuning.crit_chance_cap)
}

/// Roll crit and variance, then compute damage. Returns the damage and whether it crit.
pub fn roll_damage(
    input: &DamageInput,
    special: u32,
    rng: &mut impl Rng,
    tuning: &BattleTuning,
) -> (u32, bool) {
    let crit = rng.gen_bool(crit_chance(special, tuning));
    let variance = rng.gen_range(tuning.variance_min..=tuning.variance_max);
    (compute_damage(input, crit, variance, tuning), crit)
}

/// Result of the start-of-action status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prevention {
    Acts,
    Blocked,
    /// Woke up or thawed, and acts this turn.
    Cured,
}

pub fn status_prevention(status: StatusCondition, rng: &mut impl Rng, tuning: &BattleTuning) -> Prevention {
    match status {
        StatusCondition::Asleep | StatusCondition::Frozen => {
            if rng.gen_bool(tuning.sleep_freeze_cure_chance) {
                Prevention::Cured
            } else {
                Prevention::Blocked
            }
        }
        StatusCondition::Paralyzed => {
            if rng.gen_bool(tuning.paralysis_block_chance) {
                Prevention::Blocked
            } else {
                Prevention::Acts
            }
        }
        _ => Prevention::Acts,
    }
}

/// End-of-turn damage for a status, at least 1 for damaging statuses.
pub fn status_tick_damage(status: StatusCondition, max_hp: u32) -> u32 {
    match status {
        StatusCondition::Poisoned => (max_hp / POISON_DIVISOR).max(1),
        StatusCondition::Burned => (max_hp / BURN_DIVISOR).max(1),
        _ => 0,
    }
}

/// Overall catch probability for a ball rate and the target's HP fraction.
pub fn catch_probability(rate: f64, hp_fraction: f64) -> f64 {
    if rate >= GUARANTEED_CATCH_RATE {
        return 1.0;
    }
    (rate * (1.0 - 2.0 / 3.0 * hp_fraction.clamp(0.0, 1.0))).clamp(0.0, 1.0)
}

/// Chance each shake holds, such that all shakes together succeed with `p`.
pub fn shake_probability(p: f64) -> f64 {
    p.clamp(0.0, 1.0).powf(1.0 / CAPTURE_SHAKES as f64)
}
