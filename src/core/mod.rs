//! Core types: participant and actor ids, tiers, configuration, RNG.
//!
//! These are shared by every other module and carry no session state.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;

pub use entity::{ActorId, ProxySourceId};
pub use player::{ParticipantId, Tier};
pub use rng::MatchRng;
pub use config::{SessionConfig, WinPolicy, MAX_WORKERS};
