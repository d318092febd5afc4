//! Test fixtures and mock collaborators for integration testing

use arena_elo::error::Result;
use arena_elo::rating::settlement::{SettlementAlgorithm, SettlementReport, TeamRatingCalculator};
use arena_elo::types::{
    PlayerId, PlayerRatings, Rating, RosterEntry, TeamMatchOutcome, TeamSize, DEFAULT_RATING,
};
use arena_elo::utils::current_timestamp;
use std::collections::HashMap;
use std::sync::Mutex;

/// Stand-in for the document store holding per-context player ratings
#[derive(Debug, Default)]
pub struct InMemoryRatingBook {
    players: Mutex<HashMap<PlayerId, PlayerRatings>>,
}

impl InMemoryRatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a player with one rating in one context
    pub fn seed(&self, player_id: &str, team_size: TeamSize, rating: Rating) {
        if let Ok(mut players) = self.players.lock() {
            players
                .entry(player_id.to_string())
                .or_insert_with(|| PlayerRatings::new(player_id))
                .ratings
                .insert(team_size, rating);
        }
    }

    /// Build a roster for a match; unknown players come back unrated
    pub fn roster(&self, player_ids: &[&str], team_size: TeamSize) -> Vec<RosterEntry> {
        let players = self.players.lock().map(|p| p.clone()).unwrap_or_default();
        player_ids
            .iter()
            .map(|id| match players.get(*id) {
                Some(ratings) => ratings.roster_entry(team_size),
                None => RosterEntry::unrated(*id),
            })
            .collect()
    }

    /// Persist every change in the report to the given context
    pub fn apply(&self, report: &SettlementReport, team_size: TeamSize) {
        if let Ok(mut players) = self.players.lock() {
            for change in report.changes() {
                players
                    .entry(change.player_id.clone())
                    .or_insert_with(|| PlayerRatings::new(change.player_id.clone()))
                    .apply(team_size, change);
            }
        }
    }

    pub fn rating(&self, player_id: &str, team_size: TeamSize) -> Rating {
        self.players
            .lock()
            .ok()
            .and_then(|players| players.get(player_id).map(|p| p.rating_for(team_size)))
            .unwrap_or(DEFAULT_RATING)
    }

    pub fn get(&self, player_id: &str) -> Option<PlayerRatings> {
        self.players
            .lock()
            .ok()
            .and_then(|players| players.get(player_id).cloned())
    }
}

/// Calculator that records every outcome it sees and changes nothing
#[derive(Debug, Default)]
pub struct RecordingCalculator {
    calls: Mutex<Vec<TeamMatchOutcome>>,
}

impl RecordingCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all outcomes passed in so far
    pub fn calls(&self) -> Vec<TeamMatchOutcome> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl TeamRatingCalculator for RecordingCalculator {
    fn calculate_rating_changes(&self, outcome: &TeamMatchOutcome) -> Result<SettlementReport> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(outcome.clone());
        }

        let unchanged = |roster: &[RosterEntry]| {
            roster
                .iter()
                .map(|e| arena_elo::RatingChange::new(e.player_id.clone(), e.rating_or_default(), 0))
                .collect::<Vec<_>>()
        };

        Ok(SettlementReport {
            algorithm: SettlementAlgorithm::Weighted,
            win_probability: 0.5,
            winning_changes: unchanged(&outcome.winning_roster),
            losing_changes: unchanged(&outcome.losing_roster),
            settled_at: current_timestamp(),
        })
    }

    fn algorithm(&self) -> SettlementAlgorithm {
        SettlementAlgorithm::Weighted
    }

    fn initial_rating(&self) -> Rating {
        DEFAULT_RATING
    }
}

/// What a route handler does: read ratings, settle, write back
pub fn settle_and_store(
    book: &InMemoryRatingBook,
    calculator: &dyn TeamRatingCalculator,
    winners: &[&str],
    losers: &[&str],
    team_size: TeamSize,
    performance_margin: f64,
) -> Result<SettlementReport> {
    let outcome = TeamMatchOutcome::new(
        book.roster(winners, team_size),
        book.roster(losers, team_size),
    )
    .with_margin(performance_margin);

    let report = calculator.calculate_rating_changes(&outcome)?;
    book.apply(&report, team_size);
    Ok(report)
}
