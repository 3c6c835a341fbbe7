//! Elimination event router.
//!
//! Sources publish [`EliminationEvent`]s through an [`EventSink`]. The
//! router resolves the credited actor on the publishing thread, then hands
//! the participant to the worker shard that owns it. Each shard applies
//! its queue in order, so one participant's advances are never reordered
//! or interleaved, while different shards run in parallel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use serde::Serialize;

use crate::core::{ActorId, ParticipantId, SessionConfig};
use crate::error::SessionError;
use crate::progression::ProgressionEngine;
use crate::session::{EliminationCallback, ParticipantSource, ProxyEliminationSource};

use super::event::{
    EliminationEvent, EliminationSource, Resolution, RouteOutcome, UnresolvedReason,
};

enum ShardCommand {
    Advance(ParticipantId),
    Drain(Sender<()>),
    Shutdown,
}

/// Counters for routed events.
#[derive(Debug, Default)]
pub struct RouterStats {
    received: AtomicU64,
    dispatched: AtomicU64,
    unresolved: AtomicU64,
    ignored: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`RouterStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RouterStatsSnapshot {
    pub received: u64,
    pub dispatched: u64,
    pub unresolved: u64,
    pub ignored: u64,
    pub dropped: u64,
}

impl RouterStats {
    #[must_use]
    pub fn snapshot(&self) -> RouterStatsSnapshot {
        RouterStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Resolves elimination events and feeds them to the progression engine.
pub struct EliminationEventRouter {
    engine: Arc<ProgressionEngine>,
    shards: Vec<Sender<ShardCommand>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stats: RouterStats,
    player_eliminations_advance: bool,
    /// Held for reading across the closed check and the send in `route`,
    /// for writing while `shutdown` queues the stop command. No advance can
    /// land behind a worker's `Shutdown`.
    closed: RwLock<bool>,
}

impl EliminationEventRouter {
    /// Spawn one worker per configured shard.
    pub fn start(
        engine: Arc<ProgressionEngine>,
        config: &SessionConfig,
    ) -> Result<Arc<Self>, SessionError> {
        config.validate()?;

        let mut shards = Vec::with_capacity(config.worker_count);
        let mut workers = Vec::with_capacity(config.worker_count);
        for index in 0..config.worker_count {
            let (tx, rx) = channel::unbounded();
            let engine = Arc::clone(&engine);
            let handle = thread::Builder::new()
                .name(format!("gun-game-shard-{index}"))
                .spawn(move || run_shard(engine, rx))?;
            shards.push(tx);
            workers.push(handle);
        }

        tracing::debug!(workers = config.worker_count, "event router started");
        Ok(Arc::new(Self {
            engine,
            shards,
            workers: Mutex::new(workers),
            stats: RouterStats::default(),
            player_eliminations_advance: config.player_eliminations_advance,
            closed: RwLock::new(false),
        }))
    }

    /// Publishing handle for event sources.
    #[must_use]
    pub fn sink(self: &Arc<Self>) -> EventSink {
        EventSink {
            router: Arc::downgrade(self),
        }
    }

    /// Subscribe to eliminations of `participant`.
    pub fn subscribe_participant(
        self: &Arc<Self>,
        source: &dyn ParticipantSource,
        participant: ParticipantId,
    ) {
        source.subscribe_eliminated(participant, self.sink().participant_callback(participant));
    }

    /// Subscribe to eliminations of a proxy source.
    pub fn subscribe_proxy(self: &Arc<Self>, proxy: &dyn ProxyEliminationSource) {
        proxy.subscribe_eliminated(self.sink().proxy_callback(proxy));
    }

    /// Map an eliminator onto a tracked participant.
    #[must_use]
    pub fn resolve(&self, eliminator: Option<ActorId>) -> Resolution {
        let Some(actor) = eliminator else {
            return Resolution::Unresolved(UnresolvedReason::NoAttribution);
        };
        let participant = actor.as_participant();
        if self.engine.is_tracked(participant) {
            Resolution::Resolved(participant)
        } else {
            Resolution::Unresolved(UnresolvedReason::Untracked(actor))
        }
    }

    /// Resolve `event` and queue an advance for the credited participant.
    ///
    /// At most one advance is queued per event. Nothing here fails:
    /// unusable events are counted and dropped.
    pub fn route(&self, event: EliminationEvent) -> RouteOutcome {
        RouterStats::bump(&self.stats.received);

        let closed = self.closed.read().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            return self.drop_closed(&event);
        }

        let participant = match self.resolve(event.eliminator) {
            Resolution::Resolved(participant) => participant,
            Resolution::Unresolved(reason) => return self.discard(&event, reason),
        };

        if let EliminationSource::Participant(victim) = event.source {
            if victim == participant {
                return self.discard(&event, UnresolvedReason::SelfElimination(participant));
            }
            if !self.player_eliminations_advance {
                RouterStats::bump(&self.stats.ignored);
                tracing::debug!(
                    attacker = %participant,
                    victim = %victim,
                    "direct elimination does not advance"
                );
                return RouteOutcome::Ignored(participant);
            }
        }

        let shard = &self.shards[self.shard_for(participant)];
        if shard.send(ShardCommand::Advance(participant)).is_err() {
            return self.drop_closed(&event);
        }
        RouterStats::bump(&self.stats.dispatched);
        RouteOutcome::Dispatched(participant)
    }

    /// Block until every event routed so far has been applied.
    pub fn drain(&self) {
        let mut acks = Vec::with_capacity(self.shards.len());
        for shard in &self.shards {
            let (tx, rx) = channel::bounded(1);
            if shard.send(ShardCommand::Drain(tx)).is_ok() {
                acks.push(rx);
            }
        }
        for ack in acks {
            // A closed ack channel means the worker already exited.
            let _ = ack.recv();
        }
    }

    /// Stop accepting events and join the workers.
    ///
    /// Events already queued are applied first, so every event reported
    /// as [`RouteOutcome::Dispatched`] is applied before this returns.
    /// Calling this twice is a no-op.
    pub fn shutdown(&self) {
        {
            let mut closed = self.closed.write().unwrap_or_else(PoisonError::into_inner);
            if *closed {
                return;
            }
            *closed = true;
            for shard in &self.shards {
                let _ = shard.send(ShardCommand::Shutdown);
            }
        }
        let workers = std::mem::take(
            &mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for worker in workers {
            if worker.join().is_err() {
                tracing::warn!("event worker panicked");
            }
        }
        tracing::debug!("event router stopped");
    }

    /// Has [`shutdown`](Self::shutdown) been called?
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Routing counters.
    #[must_use]
    pub fn stats(&self) -> RouterStatsSnapshot {
        self.stats.snapshot()
    }

    fn shard_for(&self, participant: ParticipantId) -> usize {
        (participant.raw() % self.shards.len() as u64) as usize
    }

    fn discard(&self, event: &EliminationEvent, reason: UnresolvedReason) -> RouteOutcome {
        RouterStats::bump(&self.stats.unresolved);
        tracing::trace!(source = ?event.source, reason = ?reason, "elimination not credited");
        RouteOutcome::Unresolved(reason)
    }

    fn drop_closed(&self, event: &EliminationEvent) -> RouteOutcome {
        RouterStats::bump(&self.stats.dropped);
        tracing::warn!(source = ?event.source, "elimination after session shutdown dropped");
        RouteOutcome::Closed
    }
}

impl std::fmt::Debug for EliminationEventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EliminationEventRouter")
            .field("shards", &self.shards.len())
            .field("closed", &self.is_closed())
            .field("stats", &self.stats())
            .finish()
    }
}

fn run_shard(engine: Arc<ProgressionEngine>, rx: Receiver<ShardCommand>) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            ShardCommand::Advance(participant) => match engine.advance(participant) {
                Ok(outcome) => {
                    tracing::trace!(participant = %participant, outcome = ?outcome, "advance applied");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "discarding elimination");
                }
            },
            ShardCommand::Drain(ack) => {
                let _ = ack.send(());
            }
            ShardCommand::Shutdown => break,
        }
    }
}

/// Cloneable publishing handle.
///
/// Holds the router weakly: once the session is gone, publishing is a
/// silent [`RouteOutcome::Closed`].
#[derive(Clone, Debug)]
pub struct EventSink {
    router: Weak<EliminationEventRouter>,
}

impl EventSink {
    /// Route one event.
    pub fn publish(&self, event: EliminationEvent) -> RouteOutcome {
        match self.router.upgrade() {
            Some(router) => router.route(event),
            None => RouteOutcome::Closed,
        }
    }

    /// Callback for eliminations of a tracked participant.
    #[must_use]
    pub fn participant_callback(&self, victim: ParticipantId) -> EliminationCallback {
        let sink = self.clone();
        Box::new(move |eliminator| {
            sink.publish(EliminationEvent::participant(victim, eliminator));
        })
    }

    /// Callback for eliminations of a proxy source.
    #[must_use]
    pub fn proxy_callback(&self, proxy: &dyn ProxyEliminationSource) -> EliminationCallback {
        let sink = self.clone();
        let source = proxy.id();
        Box::new(move |eliminator| {
            sink.publish(EliminationEvent::proxy(source, eliminator));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProxySourceId, Tier};
    use crate::rewards::RewardDispenserTable;
    use crate::session::RewardDispenser;
    use crate::test_harness::{RecordingDispenser, RecordingEndGame};

    fn router(config: SessionConfig, tiers: usize) -> (Arc<EliminationEventRouter>, Arc<ProgressionEngine>) {
        let dispensers: Vec<Arc<dyn RewardDispenser>> = (0..tiers)
            .map(|_| Arc::new(RecordingDispenser::new()) as Arc<dyn RewardDispenser>)
            .collect();
        let table = RewardDispenserTable::new(dispensers).unwrap();
        let engine = Arc::new(ProgressionEngine::new(
            &config,
            table,
            Arc::new(RecordingEndGame::new()),
        ));
        for p in ParticipantId::range(3) {
            engine.register(p);
        }
        let router = EliminationEventRouter::start(Arc::clone(&engine), &config).unwrap();
        (router, engine)
    }

    const PROXY: ProxySourceId = ProxySourceId::new(0);

    #[test]
    fn test_resolve() {
        let (router, _) = router(SessionConfig::new(), 3);

        assert_eq!(
            router.resolve(None),
            Resolution::Unresolved(UnresolvedReason::NoAttribution)
        );
        assert_eq!(
            router.resolve(Some(ActorId(1))),
            Resolution::Resolved(ParticipantId::new(1))
        );
        assert_eq!(
            router.resolve(Some(ActorId(50))),
            Resolution::Unresolved(UnresolvedReason::Untracked(ActorId(50)))
        );
        router.shutdown();
    }

    #[test]
    fn test_proxy_elimination_dispatches() {
        let (router, engine) = router(SessionConfig::new(), 3);
        let p = ParticipantId::new(2);

        let outcome = router.route(EliminationEvent::proxy(PROXY, Some(ActorId::participant(p))));
        assert_eq!(outcome, RouteOutcome::Dispatched(p));

        router.drain();
        assert_eq!(engine.tier_of(p), Ok(Tier::new(1)));
        router.shutdown();
    }

    #[test]
    fn test_unresolved_has_no_side_effects() {
        let (router, engine) = router(SessionConfig::new(), 3);

        router.route(EliminationEvent::proxy(PROXY, None));
        router.route(EliminationEvent::proxy(PROXY, Some(ActorId(99))));
        router.drain();

        assert!(engine.standings().iter().all(|(_, tier)| *tier == Tier::ZERO));
        let stats = router.stats();
        assert_eq!(stats.received, 2);
        assert_eq!(stats.unresolved, 2);
        assert_eq!(stats.dispatched, 0);
        router.shutdown();
    }

    #[test]
    fn test_direct_elimination_ignored_by_default() {
        let (router, engine) = router(SessionConfig::new(), 3);
        let attacker = ParticipantId::new(0);

        let outcome = router.route(EliminationEvent::participant(
            ParticipantId::new(1),
            Some(attacker.into()),
        ));
        assert_eq!(outcome, RouteOutcome::Ignored(attacker));

        router.drain();
        assert_eq!(engine.tier_of(attacker), Ok(Tier::ZERO));
        assert_eq!(router.stats().ignored, 1);
        router.shutdown();
    }

    #[test]
    fn test_direct_elimination_when_enabled() {
        let (router, engine) = router(SessionConfig::new().with_player_eliminations(), 3);
        let attacker = ParticipantId::new(0);

        let outcome = router.route(EliminationEvent::participant(
            ParticipantId::new(1),
            Some(attacker.into()),
        ));
        assert_eq!(outcome, RouteOutcome::Dispatched(attacker));

        router.drain();
        assert_eq!(engine.tier_of(attacker), Ok(Tier::new(1)));
        router.shutdown();
    }

    #[test]
    fn test_self_elimination_never_advances() {
        let (router, engine) = router(SessionConfig::new().with_player_eliminations(), 3);
        let p = ParticipantId::new(1);

        let outcome = router.route(EliminationEvent::participant(p, Some(p.into())));
        assert_eq!(
            outcome,
            RouteOutcome::Unresolved(UnresolvedReason::SelfElimination(p))
        );
        router.drain();
        assert_eq!(engine.tier_of(p), Ok(Tier::ZERO));
        router.shutdown();
    }

    #[test]
    fn test_closed_router_drops_events() {
        let (router, engine) = router(SessionConfig::new(), 3);
        let p = ParticipantId::new(0);

        router.shutdown();
        router.shutdown();
        assert!(router.is_closed());

        let outcome = router.route(EliminationEvent::proxy(PROXY, Some(p.into())));
        assert_eq!(outcome, RouteOutcome::Closed);
        assert_eq!(router.stats().dropped, 1);
        assert_eq!(engine.tier_of(p), Ok(Tier::ZERO));

        // Drain on a stopped router returns immediately.
        router.drain();
    }

    #[test]
    fn test_shutdown_during_publishing_applies_every_dispatch() {
        for _ in 0..25 {
            let (router, engine) = router(SessionConfig::new().with_workers(1), 10_000);
            let publisher = {
                let sink = router.sink();
                std::thread::spawn(move || {
                    let mut dispatched = 0u64;
                    for i in 0..2_000u64 {
                        let actor = ActorId(i % 3);
                        if let RouteOutcome::Dispatched(_) =
                            sink.publish(EliminationEvent::proxy(PROXY, Some(actor)))
                        {
                            dispatched += 1;
                        }
                    }
                    dispatched
                })
            };

            std::thread::yield_now();
            router.shutdown();
            let dispatched = publisher.join().unwrap();

            let applied: u64 = engine
                .standings()
                .iter()
                .map(|(_, tier)| u64::from(tier.raw()))
                .sum();
            assert_eq!(applied, dispatched);
            assert_eq!(router.stats().dispatched, dispatched);

            let stats = router.stats();
            assert_eq!(stats.dispatched + stats.dropped, stats.received);
        }
    }

    #[test]
    fn test_sink_outlives_router() {
        let (router, _) = router(SessionConfig::new(), 3);
        let sink = router.sink();
        router.shutdown();
        drop(router);

        let outcome = sink.publish(EliminationEvent::proxy(PROXY, Some(ActorId(0))));
        assert_eq!(outcome, RouteOutcome::Closed);
    }

    #[test]
    fn test_events_for_one_participant_apply_in_order() {
        let (router, engine) = router(SessionConfig::new().with_workers(4), 100);
        let p = ParticipantId::new(1);

        for _ in 0..50 {
            router.route(EliminationEvent::proxy(PROXY, Some(p.into())));
        }
        router.drain();

        assert_eq!(engine.tier_of(p), Ok(Tier::new(50)));
        router.shutdown();
    }
}
