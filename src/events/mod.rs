//! Elimination event routing.
//!
//! Event sources never touch progression state. They publish
//! [`EliminationEvent`]s, the [`EliminationEventRouter`] resolves who to
//! credit, and a per-participant worker shard applies the advance.
//!
//! ## Resolution
//!
//! | Eliminator                      | Result                          |
//! |---------------------------------|---------------------------------|
//! | none                            | `Unresolved(NoAttribution)`     |
//! | actor not in the roster         | `Unresolved(Untracked)`         |
//! | the eliminated participant      | `Unresolved(SelfElimination)`   |
//! | tracked participant             | `Resolved(participant)`         |
//!
//! Unresolved events are expected and dropped without side effects.
//!
//! ## Direct eliminations
//!
//! Only proxy eliminations advance tiers unless the session enables
//! `player_eliminations_advance`. A participant eliminating another
//! participant is otherwise reported as [`RouteOutcome::Ignored`].

mod event;
mod router;

pub use event::{EliminationEvent, EliminationSource, Resolution, RouteOutcome, UnresolvedReason};
pub use router::{EliminationEventRouter, EventSink, RouterStats, RouterStatsSnapshot};
