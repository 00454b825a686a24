//! Progression, economy and persistence rules for POCKETWILD.
//!
//! Everything here operates on `PlayerState` directly and reports what
//! happened through the `GameEvent` output queue. Rejected actions return
//! a `GameError` and leave the state untouched.

pub mod breeding;
pub mod merge;
pub mod persistence;
pub mod progression;
pub mod rewards;
