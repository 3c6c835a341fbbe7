//! Win condition evaluation.
//!
//! A pure predicate over a tier. Triggering the end game is the caller's
//! job.

use crate::core::{ParticipantId, Tier};

/// Decides whether a tier wins the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinConditionEvaluator {
    threshold: Tier,
}

impl WinConditionEvaluator {
    /// Create an evaluator for the given threshold.
    #[must_use]
    pub const fn new(threshold: Tier) -> Self {
        Self { threshold }
    }

    /// Tier required to win.
    #[must_use]
    pub const fn threshold(&self) -> Tier {
        self.threshold
    }

    /// True iff `tier` has reached the threshold.
    ///
    /// The participant is passed for symmetry with the call site; the
    /// outcome depends only on the tier.
    #[must_use]
    pub fn check(&self, _participant: ParticipantId, tier: Tier) -> bool {
        tier >= self.threshold
    }
}
