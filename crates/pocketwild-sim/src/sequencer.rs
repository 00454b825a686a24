//! Step sequencer for battle actions.
//!
//! An action is resolved in one go, then presented as a list of named steps
//! with durations. While steps remain the sequencer is busy and the engine
//! refuses further battle input. Time only advances through `advance`, so
//! tests drive it with fixed deltas.

use std::collections::VecDeque;

use pocketwild_core::constants::{STEP_ANIMATE_MS, STEP_ANNOUNCE_MS, STEP_DAMAGE_MS, STEP_STATUS_MS};
use pocketwild_core::error::GameError;

/// Named presentation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Announce,
    Animate,
    Damage,
    Status,
}

impl StepKind {
    pub fn duration_ms(self) -> f64 {
        let ms = match self {
            StepKind::Announce => STEP_ANNOUNCE_MS,
            StepKind::Animate => STEP_ANIMATE_MS,
            StepKind::Damage => STEP_DAMAGE_MS,
            StepKind::Status => STEP_STATUS_MS,
        };
        ms as f64
    }

    pub fn name(self) -> &'static str {
        match self {
            StepKind::Announce => "announce",
            StepKind::Animate => "animate",
            StepKind::Damage => "damage",
            StepKind::Status => "status",
        }
    }
}

/// What happens once every step has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Move the turn cursor on.
    AdvanceTurn,
    /// Close the battle with its recorded outcome.
    Finish,
}

/// A finished sequence: the session it belongs to and what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completed {
    pub session: u64,
    pub continuation: Continuation,
}

#[derive(Debug, Default)]
pub struct StepSequencer {
    steps: VecDeque<StepKind>,
    elapsed_ms: f64,
    pending: Option<Completed>,
}

impl StepSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Step currently being shown.
    pub fn current(&self) -> Option<StepKind> {
        self.steps.front().copied()
    }

    /// Total time left in the running sequence.
    pub fn remaining_ms(&self) -> f64 {
        let total: f64 = self.steps.iter().map(|s| s.duration_ms()).sum();
        (total - self.elapsed_ms).max(0.0)
    }

    /// Begin a sequence. Rejected while another is running.
    pub fn start(
        &mut self,
        steps: Vec<StepKind>,
        session: u64,
        continuation: Continuation,
    ) -> Result<(), GameError> {
        if self.is_busy() {
            return Err(GameError::ActionInProgress);
        }
        self.steps = steps.into();
        self.elapsed_ms = 0.0;
        self.pending = Some(Completed {
            session,
            continuation,
        });
        Ok(())
    }

    /// Advance by `dt_ms`. Returns the continuation once the last step has elapsed.
    pub fn advance(&mut self, dt_ms: f64) -> Option<Completed> {
        self.pending?;
        self.elapsed_ms += dt_ms;
        while let Some(step) = self.steps.front() {
            let duration = step.duration_ms();
            if self.elapsed_ms < duration {
                return None;
            }
            self.elapsed_ms -= duration;
            self.steps.pop_front();
        }
        self.elapsed_ms = 0.0;
        self.pending.take()
    }

    /// Drop whatever is running without firing its continuation.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.elapsed_ms = 0.0;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_until_all_steps_elapse() {
        let mut seq = StepSequencer::new();
        seq.start(
            vec![StepKind::Announce, StepKind::Damage],
            7,
            Continuation::AdvanceTurn,
        )
        .unwrap();
        assert!(seq.is_busy());
        assert_eq!(seq.remaining_ms(), 900.0);

        assert_eq!(seq.advance(599.0), None);
        assert_eq!(seq.current(), Some(StepKind::Announce));
        assert_eq!(seq.advance(1.0), None);
        assert_eq!(seq.current(), Some(StepKind::Damage));

        let done = seq.advance(300.0).unwrap();
        assert_eq!(done.session, 7);
        assert_eq!(done.continuation, Continuation::AdvanceTurn);
        assert!(!seq.is_busy());
        assert_eq!(seq.advance(1_000.0), None);
    }

    #[test]
    fn second_start_is_rejected() {
        let mut seq = StepSequencer::new();
        seq.start(vec![StepKind::Announce], 1, Continuation::Finish).unwrap();
        assert_eq!(
            seq.start(vec![StepKind::Announce], 1, Continuation::Finish),
            Err(GameError::ActionInProgress)
        );
    }

    #[test]
    fn one_large_delta_finishes_everything() {
        let mut seq = StepSequencer::new();
        seq.start(
            vec![StepKind::Announce, StepKind::Animate, StepKind::Status],
            3,
            Continuation::Finish,
        )
        .unwrap();
        assert!(seq.advance(10_000.0).is_some());
    }

    #[test]
    fn cleared_sequence_never_completes() {
        let mut seq = StepSequencer::new();
        seq.start(vec![StepKind::Announce], 1, Continuation::AdvanceTurn).unwrap();
        seq.clear();
        assert!(!seq.is_busy());
        assert_eq!(seq.advance(10_000.0), None);
    }
}
