//! Deterministic match simulation.
//!
//! Drives a full [`Session`] with in-memory collaborators: every step a
//! seeded RNG picks an attacker and a proxy (or occasionally a direct
//! participant-vs-participant elimination) until someone wins or the step
//! budget runs out.
//!
//! Each elimination is drained before the next one is drawn, so the same
//! seed always produces the same match.
//!
//! ```
//! use gun_game::core::SessionConfig;
//! use gun_game::sim::{simulate_match, MatchSpec};
//!
//! let spec = MatchSpec::new(4, 3).with_seed(11);
//! let report = simulate_match(SessionConfig::new(), &spec).unwrap();
//!
//! let winner = report.winner.unwrap();
//! assert_eq!(report.standings[0].0, winner);
//! assert_eq!(report.standings[0].1.index(), 3);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{ActorId, MatchRng, ParticipantId, SessionConfig, Tier};
use crate::error::SessionError;
use crate::events::RouterStatsSnapshot;
use crate::session::{ProxyEliminationSource, RewardDispenser, Session, SessionParts};
use crate::test_harness::{
    ManualParticipantSource, ManualProxySource, RecordingDispenser, RecordingEndGame,
};

/// Shape of a simulated match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSpec {
    /// Roster size.
    pub participants: u64,

    /// Reward tiers (the win threshold).
    pub tiers: usize,

    /// Number of proxy hostiles.
    pub proxies: u32,

    /// RNG seed.
    pub seed: u64,

    /// Chance that an elimination is credited to nobody.
    pub unattributed_rate: f64,

    /// Chance that an elimination is participant-vs-participant.
    pub direct_rate: f64,

    /// Stop after this many eliminations even without a winner.
    pub max_eliminations: usize,
}

impl MatchSpec {
    /// A match with `participants` players racing through `tiers` tiers.
    pub fn new(participants: u64, tiers: usize) -> Self {
        assert!(participants > 0, "Must have at least 1 participant");

        Self {
            participants,
            tiers,
            proxies: 4,
            seed: 0,
            unattributed_rate: 0.0,
            direct_rate: 0.0,
            max_eliminations: 10_000,
        }
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of proxy hostiles.
    #[must_use]
    pub fn with_proxies(mut self, proxies: u32) -> Self {
        assert!(proxies > 0, "Must have at least 1 proxy");
        self.proxies = proxies;
        self
    }

    /// Credit some eliminations to nobody.
    #[must_use]
    pub fn with_unattributed_rate(mut self, rate: f64) -> Self {
        self.unattributed_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Mix in participant-vs-participant eliminations.
    #[must_use]
    pub fn with_direct_rate(mut self, rate: f64) -> Self {
        self.direct_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Cap the number of eliminations.
    #[must_use]
    pub fn with_max_eliminations(mut self, max: usize) -> Self {
        self.max_eliminations = max;
        self
    }

    /// Check a spec that may not have come through the builders, e.g. one
    /// deserialized from JSON.
    pub fn validate(&self) -> Result<(), SessionError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), SessionError> {
            Err(SessionError::InvalidMatchSpec { field, reason })
        };

        if self.participants == 0 {
            return invalid("participants", "must be at least 1");
        }
        if self.proxies == 0 {
            return invalid("proxies", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.unattributed_rate) {
            return invalid("unattributed_rate", "must be within 0.0..=1.0");
        }
        if !(0.0..=1.0).contains(&self.direct_rate) {
            return invalid("direct_rate", "must be within 0.0..=1.0");
        }
        Ok(())
    }
}

/// Result of a simulated match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchReport {
    /// First winner, if the match finished.
    pub winner: Option<ParticipantId>,

    /// Every end-game activation, in order.
    pub activations: Vec<ParticipantId>,

    /// Eliminations performed.
    pub eliminations: usize,

    /// Grants per tier: `grants[k]` lists who received reward `k`, in order.
    pub grants: Vec<Vec<ParticipantId>>,

    /// Final standings, highest tier first.
    pub standings: Vec<(ParticipantId, Tier)>,

    /// Router counters at the end of the match.
    pub stats: RouterStatsSnapshot,
}

/// Run a match to completion.
///
/// Fails without starting a session if `spec` is invalid.
pub fn simulate_match(config: SessionConfig, spec: &MatchSpec) -> Result<MatchReport, SessionError> {
    spec.validate()?;

    let roster = Arc::new(ManualParticipantSource::new(ParticipantId::range(spec.participants)));
    let proxies: Vec<Arc<ManualProxySource>> = (0..spec.proxies)
        .map(|id| Arc::new(ManualProxySource::new(id)))
        .collect();
    let dispensers: Vec<Arc<RecordingDispenser>> = (0..spec.tiers)
        .map(|_| Arc::new(RecordingDispenser::new()))
        .collect();
    let end_game = Arc::new(RecordingEndGame::new());

    let mut parts = SessionParts::new(roster.clone(), end_game.clone());
    for proxy in &proxies {
        parts = parts.with_proxy(proxy.clone() as Arc<dyn ProxyEliminationSource>);
    }
    for dispenser in &dispensers {
        parts = parts.with_tier(dispenser.clone() as Arc<dyn RewardDispenser>);
    }

    let session = Session::start(config, parts)?;
    let players: Vec<ParticipantId> = ParticipantId::range(spec.participants).collect();

    let base = MatchRng::new(spec.seed);
    let mut attackers = base.for_context("attackers");
    let mut targets = base.for_context("targets");
    let mut credit = base.for_context("credit");

    let mut eliminations = 0;
    while session.winner().is_none() && eliminations < spec.max_eliminations {
        let Some(&attacker) = attackers.choose(&players) else {
            break;
        };
        let eliminator = if credit.gen_bool(spec.unattributed_rate) {
            None
        } else {
            Some(ActorId::participant(attacker))
        };

        if players.len() > 1 && credit.gen_bool(spec.direct_rate) {
            if let Some(&victim) = targets.choose(&players) {
                roster.eliminate(victim, eliminator);
            }
        } else {
            proxies[targets.pick(proxies.len())].eliminate(eliminator);
        }

        session.drain();
        eliminations += 1;
    }

    let report = MatchReport {
        winner: session.winner(),
        activations: end_game.activations(),
        eliminations,
        grants: dispensers.iter().map(|d| d.grants()).collect(),
        standings: session.engine().standings(),
        stats: session.stats(),
    };
    session.shutdown();

    tracing::info!(
        seed = spec.seed,
        winner = ?report.winner,
        eliminations = report.eliminations,
        "simulated match finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WinPolicy;

    #[test]
    fn test_match_produces_single_winner() {
        let spec = MatchSpec::new(6, 4).with_seed(3);
        let report = simulate_match(SessionConfig::new(), &spec).unwrap();

        let winner = report.winner.unwrap();
        assert_eq!(report.activations, vec![winner]);
        assert_eq!(report.standings[0], (winner, Tier::new(4)));
        assert!(report.standings[1..].iter().all(|(_, t)| *t < Tier::new(4)));
    }

    #[test]
    fn test_same_seed_same_match() {
        let spec = MatchSpec::new(5, 3)
            .with_seed(99)
            .with_unattributed_rate(0.2)
            .with_direct_rate(0.2);

        let a = simulate_match(SessionConfig::new().with_workers(3), &spec).unwrap();
        let b = simulate_match(SessionConfig::new().with_workers(1), &spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_grants_match_standings() {
        let spec = MatchSpec::new(4, 5).with_seed(17);
        let report = simulate_match(SessionConfig::new(), &spec).unwrap();

        // Everyone got tier 0 at registration.
        assert_eq!(report.grants[0].len(), 4);

        for (participant, tier) in &report.standings {
            for (k, granted) in report.grants.iter().enumerate() {
                let count = granted.iter().filter(|p| *p == participant).count();
                let expected = usize::from(k <= tier.index() && k < 5);
                assert_eq!(count, expected, "{participant} tier {k}");
            }
        }
    }

    #[test]
    fn test_direct_eliminations_do_not_count_by_default() {
        let spec = MatchSpec::new(3, 2)
            .with_seed(5)
            .with_direct_rate(1.0)
            .with_max_eliminations(50);
        let report = simulate_match(SessionConfig::new(), &spec).unwrap();

        assert_eq!(report.winner, None);
        assert_eq!(report.eliminations, 50);
        assert!(report.standings.iter().all(|(_, t)| *t == Tier::ZERO));
        assert_eq!(report.stats.dispatched, 0);
    }

    #[test]
    fn test_deserialized_spec_without_participants_rejected() {
        let json = r#"{"participants":0,"tiers":3,"proxies":2,"seed":1,
            "unattributed_rate":0.0,"direct_rate":0.0,"max_eliminations":10}"#;
        let spec: MatchSpec = serde_json::from_str(json).unwrap();

        let err = simulate_match(SessionConfig::new(), &spec).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidMatchSpec { field: "participants", .. }
        ));
    }

    #[test]
    fn test_deserialized_spec_with_bad_rate_rejected() {
        let json = r#"{"participants":3,"tiers":3,"proxies":2,"seed":1,
            "unattributed_rate":1.5,"direct_rate":0.0,"max_eliminations":10}"#;
        let spec: MatchSpec = serde_json::from_str(json).unwrap();

        let err = simulate_match(SessionConfig::new(), &spec).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidMatchSpec { field: "unattributed_rate", .. }
        ));

        let mut spec = MatchSpec::new(3, 3);
        spec.direct_rate = f64::NAN;
        assert!(spec.validate().is_err());
        spec.direct_rate = 0.5;
        spec.proxies = 0;
        assert!(matches!(
            spec.validate(),
            Err(SessionError::InvalidMatchSpec { field: "proxies", .. })
        ));
    }

    #[test]
    fn test_multiple_winners_policy_stops_at_first() {
        let spec = MatchSpec::new(3, 2).with_seed(8);
        let config = SessionConfig::new().with_win_policy(WinPolicy::MultipleWinners);
        let report = simulate_match(config, &spec).unwrap();

        // The driver stops at the first win even when more are allowed.
        assert_eq!(report.activations.len(), 1);
    }
}
