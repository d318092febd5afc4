//! Team balancer for custom lobbies and queue pops
//!
//! Splits a pool of players into two equal teams with team averages as close
//! as possible. Small pools are searched exhaustively; big ones fall back to
//! a greedy draft.

use crate::error::{RatingError, Result};
use crate::rating::elo::win_probability;
use crate::types::{Rating, RosterEntry, DEFAULT_RATING};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Pools up to this size are searched exhaustively
pub const DEFAULT_EXHAUSTIVE_LIMIT: usize = 10;

/// Hard ceiling on exhaustive search; 2^20 candidate splits
pub const MAX_EXHAUSTIVE_LIMIT: usize = 20;

/// Two teams produced by the balancer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedTeams {
    pub team_a: Vec<RosterEntry>,
    pub team_b: Vec<RosterEntry>,
    pub average_a: f64,
    pub average_b: f64,
    /// Absolute difference between the team averages
    pub rating_gap: f64,
    /// Probability that team A wins, from the team averages
    pub win_probability_a: f64,
}

/// Balancer configured with a search limit and a fallback rating
#[derive(Debug, Clone)]
pub struct TeamBalancer {
    exhaustive_limit: usize,
    default_rating: Rating,
}

impl Default for TeamBalancer {
    fn default() -> Self {
        Self {
            exhaustive_limit: DEFAULT_EXHAUSTIVE_LIMIT,
            default_rating: DEFAULT_RATING,
        }
    }
}

impl TeamBalancer {
    pub fn new(exhaustive_limit: usize, default_rating: Rating) -> Self {
        Self {
            exhaustive_limit: exhaustive_limit.min(MAX_EXHAUSTIVE_LIMIT),
            default_rating,
        }
    }

    /// Split `pool` into two teams of equal size
    pub fn balance(&self, pool: &[RosterEntry]) -> Result<BalancedTeams> {
        validate_pool(pool)?;

        let ratings: Vec<i64> = pool
            .iter()
            .map(|entry| entry.rating.unwrap_or(self.default_rating) as i64)
            .collect();

        let in_team_a = if pool.len() <= self.exhaustive_limit {
            exhaustive_split(&ratings)
        } else {
            greedy_split(&ratings)
        };

        let half = pool.len() / 2;
        let mut team_a = Vec::with_capacity(half);
        let mut team_b = Vec::with_capacity(half);
        let (mut sum_a, mut sum_b) = (0i64, 0i64);

        for ((entry, &rating), &is_a) in pool.iter().zip(&ratings).zip(&in_team_a) {
            if is_a {
                team_a.push(entry.clone());
                sum_a += rating;
            } else {
                team_b.push(entry.clone());
                sum_b += rating;
            }
        }

        let average_a = sum_a as f64 / half as f64;
        let average_b = sum_b as f64 / half as f64;

        debug!(
            pool_size = pool.len(),
            average_a, average_b, "Balanced teams"
        );

        Ok(BalancedTeams {
            team_a,
            team_b,
            average_a,
            average_b,
            rating_gap: (average_a - average_b).abs(),
            win_probability_a: win_probability(average_a, average_b),
        })
    }
}

/// Balance with the default rating for missing entries
pub fn balance_teams(pool: &[RosterEntry], exhaustive_limit: usize) -> Result<BalancedTeams> {
    TeamBalancer::new(exhaustive_limit, DEFAULT_RATING).balance(pool)
}

fn validate_pool(pool: &[RosterEntry]) -> Result<()> {
    if pool.len() < 2 || pool.len() % 2 != 0 {
        return Err(RatingError::InvalidRoster {
            reason: format!(
                "Need an even number of players (at least 2), got {}",
                pool.len()
            ),
        }
        .into());
    }

    let mut seen = HashSet::new();
    for entry in pool {
        if !seen.insert(entry.player_id.as_str()) {
            return Err(RatingError::InvalidRoster {
                reason: format!("Player {} appears more than once", entry.player_id),
            }
            .into());
        }
    }

    Ok(())
}

/// Try every split with player 0 pinned to team A; first best split wins
fn exhaustive_split(ratings: &[i64]) -> Vec<bool> {
    let n = ratings.len();
    let half = (n / 2) as u32;
    let total: i64 = ratings.iter().sum();

    let mut best_mask = 0u32;
    let mut best_diff = i64::MAX;

    for mask in (1u32..(1u32 << n)).step_by(2) {
        if mask.count_ones() != half {
            continue;
        }
        let sum_a: i64 = (0..n).filter(|&i| mask & (1 << i) != 0).map(|i| ratings[i]).sum();
        let diff = (2 * sum_a - total).abs();
        if diff < best_diff {
            best_diff = diff;
            best_mask = mask;
            if diff == 0 {
                break;
            }
        }
    }

    (0..n).map(|i| best_mask & (1 << i) != 0).collect()
}

/// Highest rating first onto the team with the lower total that has room
fn greedy_split(ratings: &[i64]) -> Vec<bool> {
    let half = ratings.len() / 2;
    let mut order: Vec<usize> = (0..ratings.len()).collect();
    order.sort_by(|&a, &b| ratings[b].cmp(&ratings[a]));

    let mut in_team_a = vec![false; ratings.len()];
    let (mut size_a, mut size_b) = (0usize, 0usize);
    let (mut sum_a, mut sum_b) = (0i64, 0i64);

    for i in order {
        let to_a = size_b == half || (size_a < half && sum_a <= sum_b);
        if to_a {
            in_team_a[i] = true;
            size_a += 1;
            sum_a += ratings[i];
        } else {
            size_b += 1;
            sum_b += ratings[i];
        }
    }

    in_team_a
}
