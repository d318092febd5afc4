//! Rating system: pairwise ELO, team aggregation, team settlement and tiers
//!
//! Dependency order is elo -> team -> settlement. Tier classification only
//! reads ratings and sits beside the rest.

pub mod elo;
pub mod settlement;
pub mod team;
pub mod tier;

// Re-export commonly used types
pub use elo::{expected_score, settle_pairwise, update_rating, DEFAULT_K_FACTOR};
pub use settlement::{
    calculator_for, settle_uniform_team_elo, settle_weighted_team_elo, SettlementAlgorithm,
    SettlementReport, TeamRatingCalculator, UniformTeamCalculator, WeightedTeamCalculator,
};
pub use team::{average_rating, total_rating, Rated};
pub use tier::{icon_tier_of, ranked_tier_of, Tier, TierTable};
