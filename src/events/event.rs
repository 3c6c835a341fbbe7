//! Elimination events and actor resolution results.

use serde::{Deserialize, Serialize};

use crate::core::{ActorId, ParticipantId, ProxySourceId};

/// What was eliminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EliminationSource {
    /// A tracked participant was eliminated.
    Participant(ParticipantId),
    /// A proxy hostile was eliminated.
    Proxy(ProxySourceId),
}

/// One elimination, as reported by a subscribed source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationEvent {
    /// What was eliminated.
    pub source: EliminationSource,

    /// Who is credited with the elimination, if anyone.
    pub eliminator: Option<ActorId>,
}

impl EliminationEvent {
    /// A tracked participant was eliminated.
    #[must_use]
    pub fn participant(victim: ParticipantId, eliminator: Option<ActorId>) -> Self {
        Self {
            source: EliminationSource::Participant(victim),
            eliminator,
        }
    }

    /// A proxy hostile was eliminated.
    #[must_use]
    pub fn proxy(source: ProxySourceId, eliminator: Option<ActorId>) -> Self {
        Self {
            source: EliminationSource::Proxy(source),
            eliminator,
        }
    }
}

/// Why an event could not be credited to a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    /// Nobody was credited (environment, fall damage, ...).
    NoAttribution,
    /// The credited actor is not a session participant.
    Untracked(ActorId),
    /// A participant eliminated themselves.
    SelfElimination(ParticipantId),
}

/// Result of mapping an event's eliminator onto a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Resolved(ParticipantId),
    Unresolved(UnresolvedReason),
}

/// What the router did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteOutcome {
    /// Queued for an advance of this participant.
    Dispatched(ParticipantId),
    /// No participant to credit. Discarded.
    Unresolved(UnresolvedReason),
    /// Direct participant elimination while those do not advance tiers.
    Ignored(ParticipantId),
    /// The router has shut down.
    Closed,
}
