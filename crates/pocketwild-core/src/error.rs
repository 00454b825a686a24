//! Error types for rejected player actions and collaborator failures.

use crate::enums::ItemKind;
use crate::types::{CombatantId, SpeciesId};

/// Failure reported by a species data provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Species {0:?} is unknown")]
    UnknownSpecies(SpeciesId),
    #[error("Species data unavailable: {0}")]
    Unavailable(String),
}

/// A rejected action. State is unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("No combatant is able to fight")]
    NoLivingCombatants,
    #[error("An action is already in progress")]
    ActionInProgress,
    #[error("No battle is active")]
    NoBattle,
    #[error("A battle or raid is already active")]
    SessionActive,
    #[error("It is not your turn")]
    NotPlayerTurn,
    #[error("Move slot {0} is empty")]
    InvalidMoveSlot(usize),
    #[error("Cannot do that in this kind of encounter")]
    NotAllowedInEncounter,
    #[error("Combatant {0:?} not found")]
    UnknownCombatant(CombatantId),
    #[error("Combatant {0:?} is not in the party")]
    NotInParty(CombatantId),
    #[error("Eggs cannot do that")]
    IsEgg,
    #[error("Merging needs exactly {needed} distinct combatants, got {got}")]
    NotEnoughInputs { needed: usize, got: usize },
    #[error("All merged combatants must be the same species")]
    SpeciesMismatch,
    #[error("Already at the maximum merge tier")]
    MaxTier,
    #[error("Insufficient currency: have {have}, need {need}")]
    InsufficientCurrency { have: u32, need: u32 },
    #[error("No {0:?} left in the bag")]
    ItemMissing(ItemKind),
    #[error("The bag has no room for {0:?}")]
    BagFull(ItemKind),
    #[error("Storage is full")]
    StorageFull,
    #[error("Breeding partners must share a type")]
    TypeMismatch,
    #[error("Still recovering from the last breeding")]
    BreedingCooldown,
    #[error("Nothing to harvest there")]
    NoResourceNode,
    #[error("Cannot walk there")]
    Blocked,
    #[error("A starter has already been chosen")]
    StarterAlreadyChosen,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
