//! Actor identification.
//!
//! Every entity that can be credited with an elimination has an `ActorId`.
//! Participants are actors too, and share the same id namespace:
//! the actor for participant `N` is `ActorId(N)`.
//!
//! Whether an actor is a participant depends on the session roster, so the
//! conversion back is a lookup, not a cast:
//!
//! ```
//! use gun_game::core::{ActorId, ParticipantId};
//!
//! let p = ParticipantId::new(3);
//! let actor = ActorId::participant(p);
//!
//! assert_eq!(actor.raw(), 3);
//! assert_eq!(actor.as_participant(), ParticipantId::new(3));
//! ```

use serde::{Deserialize, Serialize};

use super::ParticipantId;

/// Identifier for any entity that can eliminate something.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl ActorId {
    /// Create a new actor ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The actor handle for a participant.
    #[must_use]
    pub const fn participant(id: ParticipantId) -> Self {
        Self(id.0)
    }

    /// The participant this actor would be, if it is tracked.
    ///
    /// Callers still have to check the registry; an actor that maps to an
    /// unregistered participant is untracked.
    #[must_use]
    pub const fn as_participant(self) -> ParticipantId {
        ParticipantId(self.0)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<ParticipantId> for ActorId {
    fn from(id: ParticipantId) -> Self {
        Self::participant(id)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

/// Identifier for a proxy elimination source (a stand-in hostile).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxySourceId(pub u32);

impl ProxySourceId {
    /// Create a new proxy source ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ProxySourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Proxy({})", self.0)
    }
}
