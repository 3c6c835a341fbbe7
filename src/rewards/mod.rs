//! Reward lookup by tier.
//!
//! Rewards themselves are host collaborators ([`RewardDispenser`](crate::session::RewardDispenser));
//! this module only maps tiers onto them.

mod table;

pub use table::RewardDispenserTable;
