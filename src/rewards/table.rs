//! Reward dispenser table.
//!
//! An ordered list of dispensers, one per tier. The table length is the
//! session threshold. Lookups are bounds-checked: asking for the reward of
//! the terminal tier (or anything past it) yields `None`, never a panic.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::core::{ParticipantId, Tier};
use crate::error::SessionError;
use crate::session::RewardDispenser;

/// Ordered, bounds-checked lookup from tier to dispenser.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use gun_game::core::{ParticipantId, Tier};
/// use gun_game::rewards::RewardDispenserTable;
/// use gun_game::session::RewardDispenser;
/// use gun_game::test_harness::RecordingDispenser;
///
/// let pistol = Arc::new(RecordingDispenser::new());
/// let rifle = Arc::new(RecordingDispenser::new());
/// let ladder: Vec<Arc<dyn RewardDispenser>> = vec![pistol.clone(), rifle.clone()];
/// let table = RewardDispenserTable::new(ladder).unwrap();
///
/// assert_eq!(table.threshold(), Tier::new(2));
/// assert!(table.grant(Tier::new(1), ParticipantId::new(0)));
/// assert!(!table.grant(Tier::new(2), ParticipantId::new(0)));
/// assert_eq!(rifle.grants(), vec![ParticipantId::new(0)]);
/// ```
#[derive(Clone)]
pub struct RewardDispenserTable {
    dispensers: SmallVec<[Arc<dyn RewardDispenser>; 8]>,
}

impl RewardDispenserTable {
    /// Build a table. Fails if `dispensers` is empty.
    pub fn new(
        dispensers: impl IntoIterator<Item = Arc<dyn RewardDispenser>>,
    ) -> Result<Self, SessionError> {
        let dispensers: SmallVec<[Arc<dyn RewardDispenser>; 8]> =
            dispensers.into_iter().collect();
        if dispensers.is_empty() {
            return Err(SessionError::NoRewardTiers);
        }
        Ok(Self { dispensers })
    }

    /// Number of tiers needed to win.
    #[must_use]
    pub fn threshold(&self) -> Tier {
        Tier::new(u32::try_from(self.dispensers.len()).unwrap_or(u32::MAX))
    }

    /// Number of configured dispensers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dispensers.len()
    }

    /// Always false; an empty table cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dispensers.is_empty()
    }

    /// Dispenser for `tier`, or `None` at and beyond the threshold.
    #[must_use]
    pub fn get(&self, tier: Tier) -> Option<&dyn RewardDispenser> {
        self.dispensers.get(tier.index()).map(|d| d.as_ref())
    }

    /// Grant the reward for `tier` to `participant`.
    ///
    /// Returns false (and grants nothing) when no dispenser exists for `tier`.
    pub fn grant(&self, tier: Tier, participant: ParticipantId) -> bool {
        match self.get(tier) {
            Some(dispenser) => {
                dispenser.grant(participant);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for RewardDispenserTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardDispenserTable")
            .field("tiers", &self.dispensers.len())
            .finish()
    }
}
