//! Session wiring.
//!
//! A [`Session`] is the session-scoped state object: it owns the
//! progression engine and the event router, and lives exactly as long as
//! the host's match. There is no global registry.
//!
//! ## Startup
//!
//! 1. validate the configuration and build the reward table
//! 2. start the router's worker shards
//! 3. register every participant from the [`ParticipantSource`]
//!    (granting the tier-0 reward) and subscribe to their eliminations
//! 4. subscribe to every [`ProxyEliminationSource`]
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use gun_game::core::{ActorId, ParticipantId, SessionConfig, Tier};
//! use gun_game::session::{Session, SessionParts};
//! use gun_game::test_harness::{
//!     ManualParticipantSource, ManualProxySource, RecordingDispenser, RecordingEndGame,
//! };
//!
//! let roster = Arc::new(ManualParticipantSource::new(ParticipantId::range(2)));
//! let proxy = Arc::new(ManualProxySource::new(0));
//! let end_game = Arc::new(RecordingEndGame::new());
//!
//! let parts = SessionParts::new(roster.clone(), end_game.clone())
//!     .with_proxy(proxy.clone())
//!     .with_tier(Arc::new(RecordingDispenser::new()))
//!     .with_tier(Arc::new(RecordingDispenser::new()))
//!     .with_tier(Arc::new(RecordingDispenser::new()));
//! let session = Session::start(SessionConfig::new(), parts).unwrap();
//!
//! proxy.eliminate(Some(ActorId::new(1)));
//! session.drain();
//! assert_eq!(session.tier_of(ParticipantId::new(1)), Ok(Tier::new(1)));
//! ```

mod collaborators;

pub use collaborators::{
    EliminationCallback, EndGameTrigger, ParticipantSource, ProxyEliminationSource,
    RewardDispenser,
};

use std::sync::Arc;

use crate::core::{ParticipantId, SessionConfig, Tier};
use crate::error::{ProgressionError, SessionError};
use crate::events::{EliminationEventRouter, EventSink, RouterStatsSnapshot};
use crate::progression::ProgressionEngine;
use crate::rewards::RewardDispenserTable;

/// Host collaborators a session is built from.
#[derive(Clone)]
pub struct SessionParts {
    /// Roster and per-participant elimination events.
    pub participants: Arc<dyn ParticipantSource>,

    /// Proxy hostiles whose eliminations count toward progression.
    pub proxies: Vec<Arc<dyn ProxyEliminationSource>>,

    /// One dispenser per tier, in tier order.
    pub dispensers: Vec<Arc<dyn RewardDispenser>>,

    /// Invoked for the winner.
    pub end_game: Arc<dyn EndGameTrigger>,
}

impl SessionParts {
    /// Start with a roster and end-game trigger; add proxies and tiers with
    /// the builder methods.
    pub fn new(
        participants: Arc<dyn ParticipantSource>,
        end_game: Arc<dyn EndGameTrigger>,
    ) -> Self {
        Self {
            participants,
            proxies: Vec::new(),
            dispensers: Vec::new(),
            end_game,
        }
    }

    /// Add a proxy elimination source (builder pattern).
    #[must_use]
    pub fn with_proxy(mut self, proxy: Arc<dyn ProxyEliminationSource>) -> Self {
        self.proxies.push(proxy);
        self
    }

    /// Add the dispenser for the next tier (builder pattern).
    #[must_use]
    pub fn with_tier(mut self, dispenser: Arc<dyn RewardDispenser>) -> Self {
        self.dispensers.push(dispenser);
        self
    }
}

/// A running progression session.
///
/// Dropping the session shuts it down.
#[derive(Debug)]
pub struct Session {
    engine: Arc<ProgressionEngine>,
    router: Arc<EliminationEventRouter>,
}

impl Session {
    /// Build the engine, start workers, register the roster and subscribe
    /// to every elimination source.
    pub fn start(config: SessionConfig, parts: SessionParts) -> Result<Self, SessionError> {
        config.validate()?;
        let rewards = RewardDispenserTable::new(parts.dispensers)?;
        let engine = Arc::new(ProgressionEngine::new(&config, rewards, parts.end_game));
        let router = EliminationEventRouter::start(Arc::clone(&engine), &config)?;

        for participant in parts.participants.participants() {
            if engine.register(participant) {
                router.subscribe_participant(parts.participants.as_ref(), participant);
            }
        }
        for proxy in &parts.proxies {
            router.subscribe_proxy(proxy.as_ref());
        }

        tracing::info!(
            participants = engine.participant_count(),
            proxies = parts.proxies.len(),
            threshold = %engine.threshold(),
            "session started"
        );
        Ok(Self { engine, router })
    }

    /// The progression engine, for queries and direct advances.
    #[must_use]
    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    /// Publishing handle for additional event sources.
    #[must_use]
    pub fn sink(&self) -> EventSink {
        self.router.sink()
    }

    /// Current tier of `participant`.
    pub fn tier_of(&self, participant: ParticipantId) -> Result<Tier, ProgressionError> {
        self.engine.tier_of(participant)
    }

    /// Tier required to win.
    #[must_use]
    pub fn threshold(&self) -> Tier {
        self.engine.threshold()
    }

    /// First winner, if any.
    #[must_use]
    pub fn winner(&self) -> Option<ParticipantId> {
        self.engine.winner()
    }

    /// Routing counters.
    #[must_use]
    pub fn stats(&self) -> RouterStatsSnapshot {
        self.router.stats()
    }

    /// Block until every event published so far has been applied.
    pub fn drain(&self) {
        self.router.drain();
    }

    /// Stop processing events. Later events are dropped.
    pub fn shutdown(&self) {
        if self.router.is_closed() {
            return;
        }
        self.router.shutdown();
        tracing::info!(winner = ?self.engine.winner(), "session stopped");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
