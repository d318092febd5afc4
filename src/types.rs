//! Common types used throughout the rating core

use crate::error::RatingError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Unique identifier for players
pub type PlayerId = String;

/// A skill rating. Always an integer; updates round to the nearest one.
pub type Rating = i32;

/// Rating assumed for any player without one on record
pub const DEFAULT_RATING: Rating = 1500;

/// The rating a player starts from when nothing is stored for them
pub const fn default_rating() -> Rating {
    DEFAULT_RATING
}

/// Result of a pairwise game from one participant's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Actual score used by the ELO update
    pub fn score(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
            Outcome::Draw => 0.5,
        }
    }

    /// The same result seen from the other side
    pub fn opposite(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

impl FromStr for Outcome {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win" => Ok(Outcome::Win),
            "loss" => Ok(Outcome::Loss),
            "draw" => Ok(Outcome::Draw),
            other => Err(RatingError::InvalidOutcome {
                reason: format!("expected win, loss or draw, got '{}'", other),
            }),
        }
    }
}

/// Queue/team-size context a rating belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamSize {
    #[serde(rename = "1v1")]
    OneVsOne,
    #[serde(rename = "2v2")]
    TwoVsTwo,
    #[serde(rename = "3v3")]
    ThreeVsThree,
    #[serde(rename = "4v4")]
    FourVsFour,
    #[serde(rename = "5v5")]
    FiveVsFive,
}

impl TeamSize {
    /// Players per side
    pub fn players_per_team(self) -> usize {
        match self {
            TeamSize::OneVsOne => 1,
            TeamSize::TwoVsTwo => 2,
            TeamSize::ThreeVsThree => 3,
            TeamSize::FourVsFour => 4,
            TeamSize::FiveVsFive => 5,
        }
    }
}

impl std::fmt::Display for TeamSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.players_per_team();
        write!(f, "{}v{}", n, n)
    }
}

/// One player on a roster, as handed over by the storage layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    /// `None` when the player has no stored rating yet
    #[serde(default)]
    pub rating: Option<Rating>,
}

impl RosterEntry {
    pub fn new(player_id: impl Into<PlayerId>, rating: Rating) -> Self {
        Self {
            player_id: player_id.into(),
            rating: Some(rating),
        }
    }

    /// Entry for a player with no rating on record
    pub fn unrated(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            rating: None,
        }
    }

    /// Stored rating, or the default when missing
    pub fn rating_or_default(&self) -> Rating {
        self.rating.unwrap_or(DEFAULT_RATING)
    }
}

/// All ratings a player holds, one per team-size context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRatings {
    pub player_id: PlayerId,
    #[serde(default)]
    pub ratings: HashMap<TeamSize, Rating>,
}

impl PlayerRatings {
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            ratings: HashMap::new(),
        }
    }

    /// Rating in the given context, if one is stored
    pub fn get(&self, team_size: TeamSize) -> Option<Rating> {
        self.ratings.get(&team_size).copied()
    }

    /// Rating in the given context, falling back to the default
    pub fn rating_for(&self, team_size: TeamSize) -> Rating {
        self.get(team_size).unwrap_or(DEFAULT_RATING)
    }

    /// Roster entry carrying this player's rating for one context
    pub fn roster_entry(&self, team_size: TeamSize) -> RosterEntry {
        RosterEntry {
            player_id: self.player_id.clone(),
            rating: self.get(team_size),
        }
    }

    /// Store the outcome of a settlement in the given context only
    pub fn apply(&mut self, team_size: TeamSize, change: &RatingChange) {
        self.ratings.insert(team_size, change.new_rating);
    }
}

/// Rating change information for a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub old_rating: Rating,
    pub new_rating: Rating,
    /// Always `new_rating - old_rating`
    pub delta: i32,
}

impl RatingChange {
    /// Ratings saturate at the `i32` limits; `delta` is the change actually applied
    pub fn new(player_id: PlayerId, old_rating: Rating, delta: i32) -> Self {
        let new_rating = old_rating.saturating_add(delta);
        Self {
            player_id,
            old_rating,
            new_rating,
            delta: new_rating - old_rating,
        }
    }
}

fn default_score_multiplier() -> f64 {
    1.0
}

/// A finished team match, consumed once by a settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchOutcome {
    pub winning_roster: Vec<RosterEntry>,
    pub losing_roster: Vec<RosterEntry>,
    /// Round difference (or similar) used by the weighted settlement
    #[serde(default)]
    pub performance_margin: f64,
    /// Flat multiplier used by the uniform settlement
    #[serde(default = "default_score_multiplier")]
    pub score_multiplier: f64,
}

impl TeamMatchOutcome {
    pub fn new(winning_roster: Vec<RosterEntry>, losing_roster: Vec<RosterEntry>) -> Self {
        Self {
            winning_roster,
            losing_roster,
            performance_margin: 0.0,
            score_multiplier: default_score_multiplier(),
        }
    }

    pub fn with_margin(mut self, performance_margin: f64) -> Self {
        self.performance_margin = performance_margin;
        self
    }

    pub fn with_score_multiplier(mut self, score_multiplier: f64) -> Self {
        self.score_multiplier = score_multiplier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_scores() {
        assert_eq!(Outcome::Win.score(), 1.0);
        assert_eq!(Outcome::Loss.score(), 0.0);
        assert_eq!(Outcome::Draw.score(), 0.5);
        assert_eq!(Outcome::Win.opposite(), Outcome::Loss);
        assert_eq!(Outcome::Draw.opposite(), Outcome::Draw);
    }

    #[test]
    fn test_outcome_parsing() {
        assert_eq!("WIN".parse::<Outcome>().unwrap(), Outcome::Win);
        assert_eq!("draw".parse::<Outcome>().unwrap(), Outcome::Draw);
        assert!("forfeit".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_roster_entry_default() {
        assert_eq!(RosterEntry::unrated("p1").rating_or_default(), 1500);
        assert_eq!(RosterEntry::new("p1", 1800).rating_or_default(), 1800);
    }

    #[test]
    fn test_player_ratings_per_context() {
        let mut ratings = PlayerRatings::new("p1");
        assert_eq!(ratings.rating_for(TeamSize::FourVsFour), DEFAULT_RATING);

        let change = RatingChange::new("p1".to_string(), 1500, 16);
        ratings.apply(TeamSize::FourVsFour, &change);

        assert_eq!(ratings.rating_for(TeamSize::FourVsFour), 1516);
        assert_eq!(ratings.get(TeamSize::OneVsOne), None);
        assert_eq!(ratings.roster_entry(TeamSize::FourVsFour).rating, Some(1516));
    }

    #[test]
    fn test_rating_change_saturates_at_limits() {
        let change = RatingChange::new("p1".to_string(), Rating::MAX - 3, 16);
        assert_eq!(change.new_rating, Rating::MAX);
        assert_eq!(change.delta, 3);

        let change = RatingChange::new("p1".to_string(), Rating::MIN + 2, -12);
        assert_eq!(change.new_rating, Rating::MIN);
        assert_eq!(change.delta, -2);
    }

    #[test]
    fn test_match_outcome_defaults_from_json() {
        let json = r#"{
            "winning_roster": [{"player_id": "a", "rating": 1500}],
            "losing_roster": [{"player_id": "b"}]
        }"#;
        let outcome: TeamMatchOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.performance_margin, 0.0);
        assert_eq!(outcome.score_multiplier, 1.0);
        assert_eq!(outcome.losing_roster[0].rating, None);
    }

    #[test]
    fn test_team_size_serde() {
        let json = serde_json::to_string(&TeamSize::FourVsFour).unwrap();
        assert_eq!(json, "\"4v4\"");
        assert_eq!(TeamSize::TwoVsTwo.to_string(), "2v2");
    }
}
