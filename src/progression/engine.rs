//! Progression engine.
//!
//! The only component that mutates the registry. One advance is:
//!
//! 1. read the participant's tier
//! 2. compute the next tier
//! 3. evaluate the win condition, activating the end game on a win
//! 4. store the next tier
//! 5. grant the reward for the next tier, if one exists
//!
//! Steps 1-5 run while holding the participant's registry entry, so two
//! advances for the same participant never interleave. Advances for
//! different participants only meet at the winner list.

use std::sync::{Arc, Mutex, PoisonError};

use crate::core::{ParticipantId, SessionConfig, Tier, WinPolicy};
use crate::error::ProgressionError;
use crate::rewards::RewardDispenserTable;
use crate::session::EndGameTrigger;

use super::registry::PlayerRegistry;
use super::win::WinConditionEvaluator;

/// Result of a single advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Tier went up by one. `granted` is false only if no dispenser exists
    /// for the new tier.
    Advanced { tier: Tier, granted: bool },
    /// Tier reached the threshold and the end game was activated.
    Won { tier: Tier },
    /// Participant had already reached the threshold. Nothing changed.
    AlreadyTerminal { tier: Tier },
    /// The session already has a winner under [`WinPolicy::SingleWinner`].
    /// Nothing changed.
    Halted { winner: ParticipantId },
}

impl AdvanceOutcome {
    /// Did this advance change the participant's tier?
    #[must_use]
    pub fn changed_tier(&self) -> bool {
        matches!(self, AdvanceOutcome::Advanced { .. } | AdvanceOutcome::Won { .. })
    }
}

/// Orchestrates tier advancement, reward grants and win detection.
pub struct ProgressionEngine {
    registry: PlayerRegistry,
    rewards: RewardDispenserTable,
    win: WinConditionEvaluator,
    end_game: Arc<dyn EndGameTrigger>,
    policy: WinPolicy,
    grant_initial_reward: bool,
    winners: Mutex<Vec<ParticipantId>>,
}

impl ProgressionEngine {
    /// Create an engine with an empty registry.
    ///
    /// The threshold is the number of tiers in `rewards`.
    pub fn new(
        config: &SessionConfig,
        rewards: RewardDispenserTable,
        end_game: Arc<dyn EndGameTrigger>,
    ) -> Self {
        let win = WinConditionEvaluator::new(rewards.threshold());
        Self {
            registry: PlayerRegistry::new(),
            rewards,
            win,
            end_game,
            policy: config.win_policy,
            grant_initial_reward: config.grant_initial_reward,
            winners: Mutex::new(Vec::new()),
        }
    }

    /// Tier required to win.
    #[must_use]
    pub fn threshold(&self) -> Tier {
        self.win.threshold()
    }

    /// Track `participant`, granting the first-tier reward on first sight.
    ///
    /// Returns true if the participant was new. Registering twice neither
    /// resets the tier nor grants again.
    pub fn register(&self, participant: ParticipantId) -> bool {
        if !self.registry.register(participant) {
            tracing::debug!(participant = %participant, "participant already registered");
            return false;
        }

        tracing::debug!(participant = %participant, "participant registered");
        if self.grant_initial_reward {
            if let Err(err) = self.grant_initial(participant) {
                tracing::warn!(error = %err, "initial grant failed");
            }
        }
        true
    }

    /// Grant the tier-0 reward without advancing.
    ///
    /// Returns whether a reward was granted.
    pub fn grant_initial(&self, participant: ParticipantId) -> Result<bool, ProgressionError> {
        self.registry.lock(participant, |_| {
            let granted = self.rewards.grant(Tier::ZERO, participant);
            tracing::debug!(participant = %participant, tier = %Tier::ZERO, granted, "initial reward");
            granted
        })
    }

    /// Advance `participant` by one tier.
    ///
    /// Fails only if the participant is not registered.
    pub fn advance(&self, participant: ParticipantId) -> Result<AdvanceOutcome, ProgressionError> {
        if let Some(winner) = self.halted_by() {
            tracing::debug!(participant = %participant, winner = %winner, "session already won; advance ignored");
            return Ok(AdvanceOutcome::Halted { winner });
        }

        self.registry.lock(participant, |entry| {
            let current = entry.get();
            if current >= self.threshold() {
                return AdvanceOutcome::AlreadyTerminal { tier: current };
            }

            let next = current.next();
            let won = self.win.check(participant, next);
            if won {
                if let Err(winner) = self.claim_win(participant) {
                    return AdvanceOutcome::Halted { winner };
                }
                tracing::info!(participant = %participant, tier = %next, "participant reached final tier");
                self.end_game.activate(participant);
            }

            entry.set(next);

            // No dispenser exists at the threshold, so a win never grants.
            let granted = self.rewards.grant(next, participant);
            tracing::debug!(participant = %participant, tier = %next, granted, "advanced");

            if won {
                AdvanceOutcome::Won { tier: next }
            } else {
                AdvanceOutcome::Advanced { tier: next, granted }
            }
        })
    }

    /// Current tier of `participant`.
    pub fn tier_of(&self, participant: ParticipantId) -> Result<Tier, ProgressionError> {
        self.registry.get_tier(participant)
    }

    /// Is `participant` tracked by this session?
    #[must_use]
    pub fn is_tracked(&self, participant: ParticipantId) -> bool {
        self.registry.contains(participant)
    }

    /// Number of tracked participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.registry.len()
    }

    /// First participant to win, if any.
    #[must_use]
    pub fn winner(&self) -> Option<ParticipantId> {
        self.winners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .first()
            .copied()
    }

    /// Every winner so far, in the order they won.
    #[must_use]
    pub fn winners(&self) -> Vec<ParticipantId> {
        self.winners.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// All participants, highest tier first. Ties are ordered by id.
    #[must_use]
    pub fn standings(&self) -> Vec<(ParticipantId, Tier)> {
        let mut standings = self.registry.snapshot();
        standings.sort_by(|(pa, ta), (pb, tb)| tb.cmp(ta).then(pa.cmp(pb)));
        standings
    }

    fn halted_by(&self) -> Option<ParticipantId> {
        match self.policy {
            WinPolicy::SingleWinner => self.winner(),
            WinPolicy::MultipleWinners => None,
        }
    }

    /// Record `participant` as a winner. Fails with the existing winner if
    /// the policy allows only one.
    fn claim_win(&self, participant: ParticipantId) -> Result<(), ParticipantId> {
        let mut winners = self.winners.lock().unwrap_or_else(PoisonError::into_inner);
        if self.policy == WinPolicy::SingleWinner {
            if let Some(&winner) = winners.first() {
                return Err(winner);
            }
        }
        winners.push(participant);
        Ok(())
    }
}

impl std::fmt::Debug for ProgressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionEngine")
            .field("threshold", &self.threshold())
            .field("policy", &self.policy)
            .field("participants", &self.registry.len())
            .field("winners", &self.winners())
            .finish()
    }
}
