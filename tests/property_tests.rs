//! Property tests for the progression engine.

use std::sync::Arc;

use proptest::prelude::*;

use gun_game::core::{ParticipantId, SessionConfig, Tier, WinPolicy};
use gun_game::progression::{AdvanceOutcome, ProgressionEngine};
use gun_game::rewards::RewardDispenserTable;
use gun_game::session::RewardDispenser;
use gun_game::test_harness::{RecordingDispenser, RecordingEndGame};

fn engine(
    policy: WinPolicy,
    tiers: usize,
    players: u64,
) -> (ProgressionEngine, Vec<Arc<RecordingDispenser>>, Arc<RecordingEndGame>) {
    let dispensers: Vec<_> = (0..tiers).map(|_| Arc::new(RecordingDispenser::new())).collect();
    let table = RewardDispenserTable::new(
        dispensers
            .iter()
            .map(|d| d.clone() as Arc<dyn RewardDispenser>),
    )
    .unwrap();
    let end_game = Arc::new(RecordingEndGame::new());
    let config = SessionConfig::new().with_win_policy(policy);
    let engine = ProgressionEngine::new(&config, table, end_game.clone());
    for p in ParticipantId::range(players) {
        engine.register(p);
    }
    (engine, dispensers, end_game)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    /// Each advance below the threshold moves exactly one step.
    #[test]
    fn advance_steps_by_one(tiers in 1usize..12, players in 1u64..6, script in prop::collection::vec(0u64..6, 0..80)) {
        let (engine, _, _) = engine(WinPolicy::MultipleWinners, tiers, players);
        let threshold = engine.threshold();

        for raw in script {
            let p = ParticipantId::new(raw % players);
            let before = engine.tier_of(p).unwrap();
            let outcome = engine.advance(p).unwrap();
            let after = engine.tier_of(p).unwrap();

            if before < threshold {
                prop_assert_eq!(after, before.next());
                prop_assert!(outcome.changed_tier());
            } else {
                prop_assert_eq!(after, before);
                prop_assert_eq!(outcome, AdvanceOutcome::AlreadyTerminal { tier: before });
            }
            prop_assert!(after <= threshold);
        }
    }

    /// Reward k is granted once per participant for every tier reached,
    /// never at or past the threshold, and the end game fires once per
    /// finisher.
    #[test]
    fn grants_exactly_once_per_tier(tiers in 1usize..8, players in 1u64..5, script in prop::collection::vec(0u64..5, 0..60)) {
        let (engine, dispensers, end_game) = engine(WinPolicy::MultipleWinners, tiers, players);

        for raw in script {
            engine.advance(ParticipantId::new(raw % players)).unwrap();
        }

        let threshold = engine.threshold();
        for p in ParticipantId::range(players) {
            let tier = engine.tier_of(p).unwrap();
            for (k, dispenser) in dispensers.iter().enumerate() {
                let expected = usize::from(k <= tier.index() && k < tiers);
                prop_assert_eq!(dispenser.grant_count(p), expected);
            }
            let activations = end_game.activations().iter().filter(|&&w| w == p).count();
            prop_assert_eq!(activations, usize::from(tier == threshold));
        }
    }

    /// Under the single-winner policy at most one participant ever
    /// reaches the threshold.
    #[test]
    fn single_winner_is_unique(tiers in 1usize..6, players in 2u64..5, script in prop::collection::vec(0u64..5, 0..60)) {
        let (engine, _, end_game) = engine(WinPolicy::SingleWinner, tiers, players);

        for raw in script {
            engine.advance(ParticipantId::new(raw % players)).unwrap();
        }

        let finishers = engine
            .standings()
            .into_iter()
            .filter(|(_, tier)| *tier == engine.threshold())
            .count();
        prop_assert!(finishers <= 1);
        prop_assert_eq!(end_game.activations().len(), finishers);
        prop_assert_eq!(engine.winner().is_some(), finishers == 1);
    }

    /// Re-registering never resets progress.
    #[test]
    fn reregister_keeps_tier(steps in 0usize..10) {
        let (engine, dispensers, _) = engine(WinPolicy::SingleWinner, 10, 1);
        let p = ParticipantId::new(0);

        for _ in 0..steps {
            engine.advance(p).unwrap();
        }
        prop_assert!(!engine.register(p));
        prop_assert_eq!(engine.tier_of(p).unwrap(), Tier::new(steps as u32));
        prop_assert_eq!(dispensers[0].grant_count(p), 1);
    }
}
