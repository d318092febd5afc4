//! Matchmaking helpers: rating compatibility and team balancing

pub mod balance;
pub mod compatibility;

pub use balance::{balance_teams, BalancedTeams, TeamBalancer, DEFAULT_EXHAUSTIVE_LIMIT};
pub use compatibility::{
    all_compatible, can_play_together, match_quality, DEFAULT_MAX_RATING_DIFFERENCE,
};
