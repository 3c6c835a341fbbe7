//! Tier progression.
//!
//! - [`PlayerRegistry`]: participant → tier, one lock per participant
//! - [`WinConditionEvaluator`]: pure threshold check
//! - [`ProgressionEngine`]: the advance / grant / win state machine
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use gun_game::core::{ParticipantId, SessionConfig, Tier};
//! use gun_game::progression::{AdvanceOutcome, ProgressionEngine};
//! use gun_game::rewards::RewardDispenserTable;
//! use gun_game::session::RewardDispenser;
//! use gun_game::test_harness::{RecordingDispenser, RecordingEndGame};
//!
//! let dispensers: Vec<Arc<dyn RewardDispenser>> = vec![
//!     Arc::new(RecordingDispenser::new()),
//!     Arc::new(RecordingDispenser::new()),
//! ];
//! let table = RewardDispenserTable::new(dispensers).unwrap();
//! let end_game = Arc::new(RecordingEndGame::new());
//! let engine = ProgressionEngine::new(&SessionConfig::new(), table, end_game.clone());
//!
//! let p = ParticipantId::new(0);
//! engine.register(p);
//! engine.advance(p).unwrap();
//! assert_eq!(engine.advance(p), Ok(AdvanceOutcome::Won { tier: Tier::new(2) }));
//! assert_eq!(end_game.activations(), vec![p]);
//! ```

mod engine;
mod registry;
mod win;

pub use engine::{AdvanceOutcome, ProgressionEngine};
pub use registry::{PlayerRegistry, TierGuard};
pub use win::WinConditionEvaluator;
