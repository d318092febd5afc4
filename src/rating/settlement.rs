//! Team match settlement
//!
//! Two algorithms turn a team result into per-player rating changes, and
//! they are not interchangeable:
//!
//! - **Weighted** ([`settle_weighted_team_elo`]): per-player K-factor keyed
//!   on each player's own rating, scaled by the performance margin. This is
//!   the ranked settlement path.
//! - **Uniform** ([`settle_uniform_team_elo`]): one delta for the whole
//!   side, computed from team averages. Older team-vs-team views still use
//!   it.
//!
//! Both sit behind [`TeamRatingCalculator`] so callers can pick one through
//! configuration. Whether the uniform path should be retired is an open
//! product decision.

use crate::config::rating::{KFactorSchedule, PerformanceScaling, RatingConfig};
use crate::error::RatingError;
use crate::rating::elo::{win_probability, DEFAULT_K_FACTOR};
use crate::rating::team::{average_rating, resolve_ratings};
use crate::types::{Rating, RatingChange, RosterEntry, TeamMatchOutcome, DEFAULT_RATING};
use crate::utils::{current_timestamp, round_rating};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::debug;

/// Reward multiplier for a performance margin, using the default scaling
pub fn performance_factor(performance_margin: f64) -> f64 {
    PerformanceScaling::default().factor(performance_margin)
}

/// K-factor for a player's own rating, using the default schedule
pub fn k_factor_for(rating: Rating) -> f64 {
    KFactorSchedule::default().k_for(rating)
}

/// Result of the uniform settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformSettlement {
    /// Winning roster with new ratings, same order as the input
    pub winning_roster: Vec<RosterEntry>,
    /// Losing roster with new ratings, same order as the input
    pub losing_roster: Vec<RosterEntry>,
    /// Points every winner gained and every loser lost
    pub delta: i32,
    pub win_probability: f64,
}

/// Uniform-delta settlement with the default K of 32 and default rating
pub fn settle_uniform_team_elo(
    winning_roster: &[RosterEntry],
    losing_roster: &[RosterEntry],
    score_multiplier: f64,
) -> UniformSettlement {
    settle_uniform_with(
        winning_roster,
        losing_roster,
        score_multiplier,
        DEFAULT_K_FACTOR,
        DEFAULT_RATING,
    )
}

/// Uniform-delta settlement with explicit K-factor and fallback rating
pub fn settle_uniform_with(
    winning_roster: &[RosterEntry],
    losing_roster: &[RosterEntry],
    score_multiplier: f64,
    k_factor: f64,
    fallback_rating: Rating,
) -> UniformSettlement {
    let winning_avg = average_rating(&resolve_ratings(winning_roster, fallback_rating));
    let losing_avg = average_rating(&resolve_ratings(losing_roster, fallback_rating));

    let p = win_probability(winning_avg, losing_avg);
    let delta = round_rating(k_factor * score_multiplier * (1.0 - p));

    let shift = |roster: &[RosterEntry], signed_delta: i32| -> Vec<RosterEntry> {
        roster
            .iter()
            .map(|entry| RosterEntry {
                player_id: entry.player_id.clone(),
                rating: Some(
                    entry
                        .rating
                        .unwrap_or(fallback_rating)
                        .saturating_add(signed_delta),
                ),
            })
            .collect()
    };

    UniformSettlement {
        winning_roster: shift(winning_roster, delta),
        losing_roster: shift(losing_roster, -delta),
        delta,
        win_probability: p,
    }
}

/// Result of the weighted settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSettlement {
    /// One change per winner, same order as the input roster
    pub winning: Vec<RatingChange>,
    /// One change per loser, same order as the input roster
    pub losing: Vec<RatingChange>,
    pub winning_expected: f64,
    pub losing_expected: f64,
    pub performance_factor: f64,
}

impl WeightedSettlement {
    pub fn winning_deltas(&self) -> Vec<i32> {
        self.winning.iter().map(|change| change.delta).collect()
    }

    pub fn losing_deltas(&self) -> Vec<i32> {
        self.losing.iter().map(|change| change.delta).collect()
    }
}

/// Margin-weighted settlement using the default configuration
pub fn settle_weighted_team_elo(
    winning_roster: &[RosterEntry],
    losing_roster: &[RosterEntry],
    performance_margin: f64,
) -> WeightedSettlement {
    settle_weighted_with(
        winning_roster,
        losing_roster,
        performance_margin,
        &RatingConfig::default(),
    )
}

/// Margin-weighted settlement with an explicit configuration
pub fn settle_weighted_with(
    winning_roster: &[RosterEntry],
    losing_roster: &[RosterEntry],
    performance_margin: f64,
    config: &RatingConfig,
) -> WeightedSettlement {
    let winning_ratings = resolve_ratings(winning_roster, config.default_rating);
    let losing_ratings = resolve_ratings(losing_roster, config.default_rating);

    let winning_expected = win_probability(
        average_rating(&winning_ratings),
        average_rating(&losing_ratings),
    );
    let losing_expected = 1.0 - winning_expected;
    let factor = config.performance.factor(performance_margin);

    let settle_side = |roster: &[RosterEntry], ratings: &[Rating], gap: f64| {
        roster
            .iter()
            .zip(ratings)
            .map(|(entry, &rating)| {
                let k = config.k_factor_schedule.k_for(rating);
                let delta = round_rating(k * gap * factor);
                RatingChange::new(entry.player_id.clone(), rating, delta)
            })
            .collect::<Vec<_>>()
    };

    WeightedSettlement {
        winning: settle_side(winning_roster, &winning_ratings, 1.0 - winning_expected),
        losing: settle_side(losing_roster, &losing_ratings, 0.0 - losing_expected),
        winning_expected,
        losing_expected,
        performance_factor: factor,
    }
}

/// Which settlement a calculator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementAlgorithm {
    Weighted,
    Uniform,
}

impl std::fmt::Display for SettlementAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementAlgorithm::Weighted => write!(f, "weighted"),
            SettlementAlgorithm::Uniform => write!(f, "uniform"),
        }
    }
}

impl FromStr for SettlementAlgorithm {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weighted" => Ok(SettlementAlgorithm::Weighted),
            "uniform" => Ok(SettlementAlgorithm::Uniform),
            _ => Err(RatingError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// Settlement output handed to the persistence and notification layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub algorithm: SettlementAlgorithm,
    /// Pre-match probability that the winning side would win
    pub win_probability: f64,
    pub winning_changes: Vec<RatingChange>,
    pub losing_changes: Vec<RatingChange>,
    pub settled_at: DateTime<Utc>,
}

impl SettlementReport {
    /// All changes, winners first
    pub fn changes(&self) -> impl Iterator<Item = &RatingChange> {
        self.winning_changes.iter().chain(self.losing_changes.iter())
    }
}

/// Trait for settling team matches
pub trait TeamRatingCalculator: Send + Sync {
    /// Calculate rating changes for every player in a finished match
    fn calculate_rating_changes(
        &self,
        outcome: &TeamMatchOutcome,
    ) -> crate::error::Result<SettlementReport>;

    /// Algorithm this calculator runs
    fn algorithm(&self) -> SettlementAlgorithm;

    /// Rating assumed for players with nothing on record
    fn initial_rating(&self) -> Rating;
}

/// Reject outcomes no settlement should see
pub fn validate_outcome(outcome: &TeamMatchOutcome) -> crate::error::Result<()> {
    if outcome.winning_roster.is_empty() || outcome.losing_roster.is_empty() {
        return Err(RatingError::InvalidRoster {
            reason: "Both rosters need at least one player".to_string(),
        }
        .into());
    }

    if !outcome.performance_margin.is_finite() {
        return Err(RatingError::InvalidOutcome {
            reason: format!(
                "Performance margin must be finite, got {}",
                outcome.performance_margin
            ),
        }
        .into());
    }

    if !outcome.score_multiplier.is_finite() || outcome.score_multiplier < 0.0 {
        return Err(RatingError::InvalidOutcome {
            reason: format!(
                "Score multiplier must be finite and non-negative, got {}",
                outcome.score_multiplier
            ),
        }
        .into());
    }

    let mut seen = HashSet::new();
    for entry in outcome.winning_roster.iter().chain(&outcome.losing_roster) {
        if !seen.insert(entry.player_id.as_str()) {
            return Err(RatingError::InvalidRoster {
                reason: format!("Player {} appears more than once", entry.player_id),
            }
            .into());
        }
    }

    Ok(())
}

/// Primary calculator: per-player, margin-weighted settlement
#[derive(Debug, Clone, Default)]
pub struct WeightedTeamCalculator {
    config: RatingConfig,
}

impl WeightedTeamCalculator {
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl TeamRatingCalculator for WeightedTeamCalculator {
    fn calculate_rating_changes(
        &self,
        outcome: &TeamMatchOutcome,
    ) -> crate::error::Result<SettlementReport> {
        validate_outcome(outcome)?;

        let settlement = settle_weighted_with(
            &outcome.winning_roster,
            &outcome.losing_roster,
            outcome.performance_margin,
            &self.config,
        );

        debug!(
            winners = settlement.winning.len(),
            losers = settlement.losing.len(),
            winning_expected = settlement.winning_expected,
            performance_factor = settlement.performance_factor,
            "Settled weighted team match"
        );

        Ok(SettlementReport {
            algorithm: SettlementAlgorithm::Weighted,
            win_probability: settlement.winning_expected,
            winning_changes: settlement.winning,
            losing_changes: settlement.losing,
            settled_at: current_timestamp(),
        })
    }

    fn algorithm(&self) -> SettlementAlgorithm {
        SettlementAlgorithm::Weighted
    }

    fn initial_rating(&self) -> Rating {
        self.config.default_rating
    }
}

/// Legacy calculator: one delta for the whole side
#[derive(Debug, Clone, Default)]
pub struct UniformTeamCalculator {
    config: RatingConfig,
}

impl UniformTeamCalculator {
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl TeamRatingCalculator for UniformTeamCalculator {
    fn calculate_rating_changes(
        &self,
        outcome: &TeamMatchOutcome,
    ) -> crate::error::Result<SettlementReport> {
        validate_outcome(outcome)?;

        let settlement = settle_uniform_with(
            &outcome.winning_roster,
            &outcome.losing_roster,
            outcome.score_multiplier,
            self.config.base_k_factor,
            self.config.default_rating,
        );

        debug!(
            delta = settlement.delta,
            win_probability = settlement.win_probability,
            "Settled uniform team match"
        );

        let to_changes = |before: &[RosterEntry], after: &[RosterEntry], delta: i32| {
            before
                .iter()
                .zip(after)
                .map(|(old, new)| RatingChange {
                    player_id: old.player_id.clone(),
                    old_rating: old.rating.unwrap_or(self.config.default_rating),
                    new_rating: new.rating.unwrap_or(self.config.default_rating),
                    delta,
                })
                .collect::<Vec<_>>()
        };

        Ok(SettlementReport {
            algorithm: SettlementAlgorithm::Uniform,
            win_probability: settlement.win_probability,
            winning_changes: to_changes(
                &outcome.winning_roster,
                &settlement.winning_roster,
                settlement.delta,
            ),
            losing_changes: to_changes(
                &outcome.losing_roster,
                &settlement.losing_roster,
                -settlement.delta,
            ),
            settled_at: current_timestamp(),
        })
    }

    fn algorithm(&self) -> SettlementAlgorithm {
        SettlementAlgorithm::Uniform
    }

    fn initial_rating(&self) -> Rating {
        self.config.default_rating
    }
}

/// Build the calculator for `algorithm`
pub fn calculator_for(
    algorithm: SettlementAlgorithm,
    config: &RatingConfig,
) -> crate::error::Result<Box<dyn TeamRatingCalculator>> {
    Ok(match algorithm {
        SettlementAlgorithm::Weighted => Box::new(WeightedTeamCalculator::new(config.clone())?),
        SettlementAlgorithm::Uniform => Box::new(UniformTeamCalculator::new(config.clone())?),
    })
}
