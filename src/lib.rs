//! # gun-game
//!
//! Weapon-progression state machine for elimination-driven match sessions.
//!
//! Every participant climbs a ladder of reward tiers, one tier per credited
//! elimination. Reaching the last tier wins the session.
//!
//! ## Design Principles
//!
//! 1. **Session-scoped state**: All mutable state lives in a [`Session`]
//!    created at match start. There are no globals.
//!
//! 2. **Host-agnostic**: Rosters, rewards and the end game are host
//!    collaborators behind traits. The core never knows what a "weapon" is.
//!
//! 3. **Per-participant serialization**: Advances for one participant are
//!    applied in order and never interleave; different participants
//!    progress in parallel.
//!
//! ## Flow
//!
//! ```text
//! source ──callback──▶ EventSink ──▶ EliminationEventRouter (resolve actor)
//!                                        │
//!                                  shard queue (per participant)
//!                                        ▼
//!                    ProgressionEngine::advance ──▶ WinConditionEvaluator
//!                          │                            │ win
//!                          ▼                            ▼
//!                RewardDispenserTable::grant      EndGameTrigger::activate
//! ```
//!
//! ## Modules
//!
//! - `core`: Participant/actor ids, tiers, configuration, RNG
//! - `progression`: Registry, win condition, progression engine
//! - `rewards`: Tier → reward dispenser lookup
//! - `events`: Elimination events and the routing bus
//! - `session`: Host collaborator traits and session wiring
//! - `sim`: Deterministic match simulation
//! - `test_harness`: In-memory collaborators

pub mod core;
pub mod error;
pub mod progression;
pub mod rewards;
pub mod events;
pub mod session;
pub mod sim;
pub mod test_harness;

// Re-export commonly used types
pub use crate::core::{
    ActorId, ProxySourceId, ParticipantId, Tier,
    SessionConfig, WinPolicy, MatchRng,
};

pub use crate::error::{ProgressionError, SessionError};

pub use crate::progression::{
    AdvanceOutcome, PlayerRegistry, ProgressionEngine, WinConditionEvaluator,
};

pub use crate::rewards::RewardDispenserTable;

pub use crate::events::{
    EliminationEvent, EliminationSource, EliminationEventRouter, EventSink,
    Resolution, RouteOutcome, UnresolvedReason, RouterStatsSnapshot,
};

pub use crate::session::{
    Session, SessionParts,
    EliminationCallback, EndGameTrigger, ParticipantSource, ProxyEliminationSource, RewardDispenser,
};

pub use crate::sim::{simulate_match, MatchReport, MatchSpec};
