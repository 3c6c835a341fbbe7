//! Session configuration.
//!
//! Hosts configure a session at startup with a `SessionConfig`. The win
//! threshold is not part of it: a session has exactly as many tiers as
//! reward dispensers it was given.
//!
//! ```
//! use gun_game::core::{SessionConfig, WinPolicy};
//!
//! let config = SessionConfig::from_json(r#"{ "worker_count": 2 }"#).unwrap();
//! assert_eq!(config.worker_count, 2);
//! assert_eq!(config.win_policy, WinPolicy::SingleWinner);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Upper bound on event-processing shards.
pub const MAX_WORKERS: usize = 64;

/// What happens once a participant reaches the threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinPolicy {
    /// First participant to reach the threshold ends the session.
    /// All later advances are halted.
    #[default]
    SingleWinner,
    /// Every participant reaching the threshold wins and activates the
    /// end game once. Other participants keep progressing.
    MultipleWinners,
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of event-processing shards.
    ///
    /// Each participant is pinned to one shard, so advances for one
    /// participant are applied in arrival order.
    pub worker_count: usize,

    /// Single or multiple winners.
    pub win_policy: WinPolicy,

    /// Do eliminations of one tracked participant by another advance the
    /// attacker?
    ///
    /// Off by default: only proxy eliminations drive progression.
    pub player_eliminations_advance: bool,

    /// Grant the tier-0 reward when a participant registers.
    pub grant_initial_reward: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            win_policy: WinPolicy::default(),
            player_eliminations_advance: false,
            grant_initial_reward: true,
        }
    }
}

impl SessionConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of event-processing shards.
    #[must_use]
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the win policy.
    #[must_use]
    pub fn with_win_policy(mut self, policy: WinPolicy) -> Self {
        self.win_policy = policy;
        self
    }

    /// Let participant-vs-participant eliminations advance the attacker.
    #[must_use]
    pub fn with_player_eliminations(mut self) -> Self {
        self.player_eliminations_advance = true;
        self
    }

    /// Skip the tier-0 grant at registration.
    #[must_use]
    pub fn without_initial_reward(mut self) -> Self {
        self.grant_initial_reward = false;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(SessionError::InvalidWorkerCount {
                count: self.worker_count,
                max: MAX_WORKERS,
            });
        }
        Ok(())
    }
}
