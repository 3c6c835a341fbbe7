//! Host-side collaborators.
//!
//! The progression core does not know how players are discovered, how a
//! weapon is handed out or how a match is ended. Hosts implement these
//! traits and pass them to [`Session::start`](super::Session::start).
//!
//! All collaborators are called from event-processing worker threads, so
//! they must be `Send + Sync`. Reward and end-game hooks run while the
//! participant's tier is locked and must not advance that participant
//! synchronously.

use crate::core::{ActorId, ParticipantId, ProxySourceId};

/// Callback fired when something is eliminated.
///
/// Receives the actor credited with the elimination, if any.
pub type EliminationCallback = Box<dyn Fn(Option<ActorId>) + Send + Sync>;

/// Provides the session roster and per-participant elimination events.
pub trait ParticipantSource: Send + Sync {
    /// Participants present when the session starts.
    fn participants(&self) -> Vec<ParticipantId>;

    /// Call `callback` whenever `participant` is eliminated.
    fn subscribe_eliminated(&self, participant: ParticipantId, callback: EliminationCallback);
}

/// A stand-in hostile whose elimination counts toward progression.
pub trait ProxyEliminationSource: Send + Sync {
    /// Identity of this source, for logging.
    fn id(&self) -> ProxySourceId;

    /// Call `callback` whenever this source is eliminated.
    fn subscribe_eliminated(&self, callback: EliminationCallback);
}

/// Grants the reward for one tier.
///
/// Called at most once per participant per tier.
pub trait RewardDispenser: Send + Sync {
    fn grant(&self, participant: ParticipantId);
}

/// Concludes the session for a winner.
pub trait EndGameTrigger: Send + Sync {
    fn activate(&self, winner: ParticipantId);
}
