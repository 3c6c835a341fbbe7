//! Participant identification and progression tiers.
//!
//! ## ParticipantId
//!
//! Opaque handle for a tracked player, unique for the lifetime of a session.
//!
//! ## Tier
//!
//! A participant's 0-based progression level. Every participant starts at
//! [`Tier::ZERO`] and advances one step per credited elimination.

use serde::{Deserialize, Serialize};

/// Participant identifier.
///
/// Handed out by the host's participant source. The engine never
/// allocates these, it only tracks the ones it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl ParticipantId {
    /// Create a new participant ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Iterate over `count` consecutive participant IDs starting at 0.
    ///
    /// ```
    /// use gun_game::core::ParticipantId;
    ///
    /// let roster: Vec<_> = ParticipantId::range(3).collect();
    /// assert_eq!(roster.len(), 3);
    /// assert_eq!(roster[2], ParticipantId::new(2));
    /// ```
    pub fn range(count: u64) -> impl Iterator<Item = ParticipantId> {
        (0..count).map(ParticipantId)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Participant {}", self.0)
    }
}

/// Progression level of a participant.
///
/// Tiers double as indices into the reward dispenser table: a participant
/// at tier `k` holds the reward of dispenser `k`, as long as `k` is below
/// the session threshold.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Tier(pub u32);

impl Tier {
    /// The tier every participant starts at.
    pub const ZERO: Tier = Tier(0);

    /// Create a new tier.
    #[must_use]
    pub const fn new(tier: u32) -> Self {
        Self(tier)
    }

    /// Get the raw tier value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Tier value as a table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The tier one step above this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tier {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_basics() {
        let p = ParticipantId::new(7);
        assert_eq!(p.raw(), 7);
        assert_eq!(format!("{}", p), "Participant 7");
    }

    #[test]
    fn test_participant_range() {
        let ids: Vec<_> = ParticipantId::range(4).collect();
        assert_eq!(
            ids,
            vec![
                ParticipantId::new(0),
                ParticipantId::new(1),
                ParticipantId::new(2),
                ParticipantId::new(3),
            ]
        );
    }

    #[test]
    fn test_tier_next() {
        assert_eq!(Tier::ZERO.next(), Tier::new(1));
        assert_eq!(Tier::new(4).next().index(), 5);
        assert_eq!(Tier::new(u32::MAX).next(), Tier::new(u32::MAX));
    }

    #[test]
    fn test_tier_ordering_and_display() {
        assert!(Tier::new(2) > Tier::new(1));
        assert_eq!(Tier::default(), Tier::ZERO);
        assert_eq!(format!("{}", Tier::new(3)), "Tier 3");
    }

    #[test]
    fn test_serialization() {
        let tier = Tier::new(2);
        let json = serde_json::to_string(&tier).unwrap();
        assert_eq!(json, "2");
        let back: Tier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tier);
    }
}
