//! Player registry.
//!
//! Authoritative mapping from participant to current tier. Each entry has
//! its own lock so advances for different participants never contend,
//! while the read-compute-write of a single participant can be held
//! atomically through [`PlayerRegistry::lock`].
//!
//! The registry is owned by the [`ProgressionEngine`](super::ProgressionEngine);
//! nothing else gets a handle to it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::core::{ParticipantId, Tier};
use crate::error::ProgressionError;

/// Registry of participant tiers.
///
/// ## Example
///
/// ```
/// use gun_game::core::{ParticipantId, Tier};
/// use gun_game::progression::PlayerRegistry;
///
/// let registry = PlayerRegistry::new();
/// let p = ParticipantId::new(1);
///
/// assert!(registry.register(p));
/// registry.set_tier(p, Tier::new(2)).unwrap();
///
/// // Re-registering does not reset progress
/// assert!(!registry.register(p));
/// assert_eq!(registry.get_tier(p), Ok(Tier::new(2)));
/// ```
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    tiers: RwLock<FxHashMap<ParticipantId, Arc<Mutex<Tier>>>>,
}

/// Exclusive access to one participant's tier.
///
/// Other operations on the same participant block until this is dropped.
pub struct TierGuard<'a> {
    participant: ParticipantId,
    tier: MutexGuard<'a, Tier>,
}

impl TierGuard<'_> {
    /// Participant this guard locks.
    #[must_use]
    pub fn participant(&self) -> ParticipantId {
        self.participant
    }

    /// Current tier.
    #[must_use]
    pub fn get(&self) -> Tier {
        *self.tier
    }

    /// Overwrite the tier.
    pub fn set(&mut self, tier: Tier) {
        *self.tier = tier;
    }
}

impl PlayerRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `participant` at tier 0 if absent.
    ///
    /// Returns true if the participant was newly inserted. Re-registering
    /// leaves the existing tier alone.
    pub fn register(&self, participant: ParticipantId) -> bool {
        let mut tiers = self.tiers.write().unwrap_or_else(PoisonError::into_inner);
        if tiers.contains_key(&participant) {
            return false;
        }
        tiers.insert(participant, Arc::new(Mutex::new(Tier::ZERO)));
        true
    }

    /// Is `participant` tracked by this session?
    #[must_use]
    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.tiers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&participant)
    }

    /// Number of registered participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True if nobody is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current tier of `participant`.
    pub fn get_tier(&self, participant: ParticipantId) -> Result<Tier, ProgressionError> {
        let entry = self.entry(participant)?;
        let tier = *entry.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tier)
    }

    /// Overwrite the tier of `participant`.
    pub fn set_tier(&self, participant: ParticipantId, tier: Tier) -> Result<(), ProgressionError> {
        let entry = self.entry(participant)?;
        *entry.lock().unwrap_or_else(PoisonError::into_inner) = tier;
        Ok(())
    }

    /// Run `f` with exclusive access to the participant's tier.
    ///
    /// Calls for the same participant are serialized; calls for different
    /// participants run in parallel.
    pub fn lock<R>(
        &self,
        participant: ParticipantId,
        f: impl FnOnce(&mut TierGuard<'_>) -> R,
    ) -> Result<R, ProgressionError> {
        let entry = self.entry(participant)?;
        let tier = entry.lock().unwrap_or_else(PoisonError::into_inner);
        let mut guard = TierGuard { participant, tier };
        Ok(f(&mut guard))
    }

    /// Point-in-time copy of every participant's tier, in no particular order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ParticipantId, Tier)> {
        let tiers = self.tiers.read().unwrap_or_else(PoisonError::into_inner);
        tiers
            .iter()
            .map(|(p, tier)| (*p, *tier.lock().unwrap_or_else(PoisonError::into_inner)))
            .collect()
    }

    fn entry(&self, participant: ParticipantId) -> Result<Arc<Mutex<Tier>>, ProgressionError> {
        self.tiers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&participant)
            .cloned()
            .ok_or(ProgressionError::NotFound(participant))
    }
}
