//! Arena ELO - rating core for an FPS community site
//!
//! This crate provides pairwise ELO updates, team aggregation, the two team
//! settlement algorithms, tier classification, and the team balancer used by
//! matchmaking queues. Storage, HTTP and notifications live elsewhere.

pub mod config;
pub mod error;
pub mod matchmaking;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use matchmaking::{balance_teams, can_play_together, BalancedTeams};
pub use rating::{
    average_rating, settle_uniform_team_elo, settle_weighted_team_elo, update_rating,
    TeamRatingCalculator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
