//! Reward bundles granted after battles and raids.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use pocketwild_core::config::{BattleTuning, RaidTuning};
use pocketwild_core::dex::SpeciesProvider;
use pocketwild_core::enums::{EncounterKind, ItemKind};
use pocketwild_core::events::GameEvent;
use pocketwild_core::player::PlayerState;
use pocketwild_core::types::CombatantId;

use crate::progression::{award_xp_and_evolve, split_xp};

/// Currency, items and per-recipient XP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSet {
    pub currency: u32,
    pub items: Vec<(ItemKind, u32)>,
    /// XP each recipient receives.
    pub xp: u32,
}

impl RewardSet {
    /// Fixed bundle for surviving a raid.
    pub fn raid_win(tuning: &RaidTuning) -> Self {
        Self {
            currency: tuning.reward_currency,
            items: vec![
                (ItemKind::PokeBall, 5),
                (ItemKind::GreatBall, 2),
                (ItemKind::Potion, 3),
            ],
            xp: tuning.reward_xp,
        }
    }

    /// Reward for defeating an enemy. Total XP is split across `recipients`.
    pub fn battle_win(
        enemy_level: u32,
        kind: EncounterKind,
        recipients: usize,
        tuning: &BattleTuning,
    ) -> Self {
        let mut total_xp = enemy_level * tuning.xp_per_enemy_level;
        if kind == EncounterKind::Boss {
            total_xp *= 2;
        }
        Self {
            currency: enemy_level * tuning.currency_per_enemy_level,
            items: Vec::new(),
            xp: split_xp(total_xp, recipients),
        }
    }
}

/// Add a reward to the player. Items that do not fit in the bag are dropped
/// and reported; XP goes to each of `recipients` still owned by the player.
pub fn grant(
    player: &mut PlayerState,
    reward: &RewardSet,
    recipients: &[CombatantId],
    rng: &mut impl Rng,
    provider: &dyn SpeciesProvider,
    events: &mut Vec<GameEvent>,
) {
    player.currency = player.currency.saturating_add(reward.currency);

    for &(item, amount) in &reward.items {
        let leftover = player.inventory.add(item, amount);
        let stored = amount - leftover;
        if stored > 0 {
            events.push(GameEvent::ItemReceived { item, amount: stored });
        }
        if leftover > 0 {
            debug!("Bag full, dropped {leftover} {item:?}");
            events.push(GameEvent::ItemDropped { item, amount: leftover });
        }
    }

    for &id in recipients {
        if let Some(c) = player.combatant_mut(id) {
            award_xp_and_evolve(c, reward.xp, rng, provider, events);
        }
    }
}
