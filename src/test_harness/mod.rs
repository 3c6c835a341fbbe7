//! In-memory collaborators.
//!
//! Stand-ins for the host side of a session: a roster that can eliminate
//! its participants on demand, proxy hostiles that can be eliminated on
//! demand, and reward / end-game hooks that record every call. Used by the
//! crate's tests and by [`crate::sim`].

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;

use crate::core::{ActorId, ParticipantId, ProxySourceId};
use crate::session::{
    EliminationCallback, EndGameTrigger, ParticipantSource, ProxyEliminationSource,
    RewardDispenser,
};

/// Fixed roster whose participants can be eliminated by hand.
#[derive(Default)]
pub struct ManualParticipantSource {
    roster: Vec<ParticipantId>,
    callbacks: Mutex<FxHashMap<ParticipantId, Vec<EliminationCallback>>>,
}

impl ManualParticipantSource {
    pub fn new(roster: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            roster: roster.into_iter().collect(),
            callbacks: Mutex::new(FxHashMap::default()),
        }
    }

    /// Fire `victim`'s elimination callbacks. Returns how many fired.
    pub fn eliminate(&self, victim: ParticipantId, eliminator: Option<ActorId>) -> usize {
        let callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(subscribers) = callbacks.get(&victim) else {
            return 0;
        };
        for callback in subscribers {
            callback(eliminator);
        }
        subscribers.len()
    }

    /// Number of callbacks subscribed for `participant`.
    #[must_use]
    pub fn subscriber_count(&self, participant: ParticipantId) -> usize {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&participant)
            .map_or(0, Vec::len)
    }
}

impl ParticipantSource for ManualParticipantSource {
    fn participants(&self) -> Vec<ParticipantId> {
        self.roster.clone()
    }

    fn subscribe_eliminated(&self, participant: ParticipantId, callback: EliminationCallback) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(participant)
            .or_default()
            .push(callback);
    }
}

/// A proxy hostile that can be eliminated by hand.
pub struct ManualProxySource {
    id: ProxySourceId,
    callbacks: Mutex<Vec<EliminationCallback>>,
}

impl ManualProxySource {
    pub fn new(id: u32) -> Self {
        Self {
            id: ProxySourceId::new(id),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Fire this proxy's elimination callbacks. Returns how many fired.
    pub fn eliminate(&self, eliminator: Option<ActorId>) -> usize {
        let callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        for callback in callbacks.iter() {
            callback(eliminator);
        }
        callbacks.len()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl ProxyEliminationSource for ManualProxySource {
    fn id(&self) -> ProxySourceId {
        self.id
    }

    fn subscribe_eliminated(&self, callback: EliminationCallback) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(callback);
    }
}

/// Reward dispenser that records who it granted to.
#[derive(Debug, Default)]
pub struct RecordingDispenser {
    grants: Mutex<Vec<ParticipantId>>,
}

impl RecordingDispenser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every grant, in call order.
    #[must_use]
    pub fn grants(&self) -> Vec<ParticipantId> {
        self.grants.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of grants to `participant`.
    #[must_use]
    pub fn grant_count(&self, participant: ParticipantId) -> usize {
        self.grants
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|&&p| p == participant)
            .count()
    }
}

impl RewardDispenser for RecordingDispenser {
    fn grant(&self, participant: ParticipantId) {
        self.grants
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(participant);
    }
}

/// End-game trigger that records every activation.
#[derive(Debug, Default)]
pub struct RecordingEndGame {
    activations: Mutex<Vec<ParticipantId>>,
}

impl RecordingEndGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every activation, in call order.
    #[must_use]
    pub fn activations(&self) -> Vec<ParticipantId> {
        self.activations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EndGameTrigger for RecordingEndGame {
    fn activate(&self, winner: ParticipantId) {
        self.activations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(winner);
    }
}
