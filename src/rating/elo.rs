//! Pairwise ELO rating engine
//!
//! Expected scores come from the skillratings ELO implementation; this
//! module adds the integer rounding and K-factor handling the site uses.

use crate::types::{Outcome, Rating};
use crate::utils::round_rating;
use skillratings::elo::EloRating;

/// K-factor used when a caller does not pick one
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Probability that `player` beats `opponent` under the logistic ELO curve
pub fn expected_score(player: Rating, opponent: Rating) -> f64 {
    win_probability(player as f64, opponent as f64)
}

/// Same as [`expected_score`] for fractional ratings such as team averages
pub fn win_probability(player: f64, opponent: f64) -> f64 {
    let (expected, _) = skillratings::elo::expected_score(
        &EloRating { rating: player },
        &EloRating { rating: opponent },
    );
    expected
}

/// Rating after a single game against one opponent
pub fn update_rating(
    player_rating: Rating,
    opponent_rating: Rating,
    outcome: Outcome,
    k_factor: f64,
) -> Rating {
    let expected = expected_score(player_rating, opponent_rating);
    round_rating(player_rating as f64 + k_factor * (outcome.score() - expected))
}

/// [`update_rating`] with the default K-factor of 32
pub fn update_rating_default(
    player_rating: Rating,
    opponent_rating: Rating,
    outcome: Outcome,
) -> Rating {
    update_rating(player_rating, opponent_rating, outcome, DEFAULT_K_FACTOR)
}

/// Settle a 1v1 game; returns the new ratings of `(a, b)`
pub fn settle_pairwise(
    rating_a: Rating,
    rating_b: Rating,
    outcome_for_a: Outcome,
    k_factor: f64,
) -> (Rating, Rating) {
    (
        update_rating(rating_a, rating_b, outcome_for_a, k_factor),
        update_rating(rating_b, rating_a, outcome_for_a.opposite(), k_factor),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_equal_ratings() {
        assert!((expected_score(1500, 1500) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_expected_scores_sum_to_one() {
        for (a, b) in [(1500, 1900), (0, 3000), (1234, 1233), (2400, 800)] {
            let sum = expected_score(a, b) + expected_score(b, a);
            assert!((sum - 1.0).abs() < 1e-12, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_win_against_equal() {
        assert_eq!(update_rating(1500, 1500, Outcome::Win, 32.0), 1516);
        assert_eq!(update_rating(1500, 1500, Outcome::Loss, 32.0), 1484);
        assert_eq!(update_rating(1500, 1500, Outcome::Draw, 32.0), 1500);
    }

    #[test]
    fn test_underdog_win() {
        // expected ~0.0909, delta = round(32 * 0.909) = 29
        let new = update_rating_default(1500, 1900, Outcome::Win);
        assert_eq!(new, 1529);
        assert!(new > 1500 + 16);
    }

    #[test]
    fn test_favourite_win_is_small() {
        let new = update_rating(1900, 1500, Outcome::Win, 32.0);
        assert_eq!(new, 1903);
    }

    #[test]
    fn test_extreme_gap_is_bounded_by_k() {
        let gain = update_rating(1000, 2000, Outcome::Win, 32.0) - 1000;
        assert!(gain <= 32);
        assert!(gain >= 31);

        let loss = update_rating(2000, 1000, Outcome::Win, 32.0) - 2000;
        assert_eq!(loss, 0);
    }

    #[test]
    fn test_custom_k_factor() {
        assert_eq!(update_rating(1500, 1500, Outcome::Win, 16.0), 1508);
        assert_eq!(update_rating(1500, 1500, Outcome::Win, 0.0), 1500);
    }

    #[test]
    fn test_settle_pairwise_is_zero_sum_for_equal_k() {
        let (a, b) = settle_pairwise(1500, 1900, Outcome::Win, 32.0);
        assert_eq!(a, 1529);
        assert_eq!(b, 1871);
        assert_eq!((a - 1500) + (b - 1900), 0);

        let (a, b) = settle_pairwise(1600, 1600, Outcome::Draw, 32.0);
        assert_eq!((a, b), (1600, 1600));
    }
}
