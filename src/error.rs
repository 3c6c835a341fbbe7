//! Error types.
//!
//! Per-event failures never reach event sources: the router's workers log
//! them and move on. These types exist for the synchronous API (registry,
//! engine, session setup).

use thiserror::Error;

use crate::core::ParticipantId;

/// Failures while reading or updating progression state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("{0} is not registered in this session")]
    NotFound(ParticipantId),
}

/// Failures while building or starting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a session needs at least one reward tier")]
    NoRewardTiers,
    #[error("worker count {count} out of range (1..={max})")]
    InvalidWorkerCount { count: usize, max: usize },
    #[error("invalid session config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid match spec: {field} {reason}")]
    InvalidMatchSpec {
        field: &'static str,
        reason: &'static str,
    },
    #[error("failed to spawn event worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
