//! Rating compatibility checks for queueing players together

use crate::rating::team::average_rating;
use crate::types::Rating;
use crate::utils::ratings_within_tolerance;

/// Largest rating gap two players may have and still share a match
pub const DEFAULT_MAX_RATING_DIFFERENCE: i64 = 400;

/// Spread of ratings at which match quality reaches zero
const QUALITY_SPREAD: f64 = 400.0;

/// True when the two ratings are at most `max_diff` apart
pub fn can_play_together(rating_a: Rating, rating_b: Rating, max_diff: i64) -> bool {
    ratings_within_tolerance(rating_a, rating_b, max_diff)
}

/// True when every pair of ratings is within `max_diff`
pub fn all_compatible(ratings: &[Rating], max_diff: i64) -> bool {
    match (ratings.iter().min(), ratings.iter().max()) {
        (Some(&lowest), Some(&highest)) => can_play_together(lowest, highest, max_diff),
        _ => true,
    }
}

/// Quality score for a match (0.0 to 1.0, higher is better)
///
/// Falls off linearly with the standard deviation of the ratings and hits
/// zero at a spread of 400 points.
pub fn match_quality(ratings: &[Rating]) -> f64 {
    if ratings.len() < 2 {
        return 0.0;
    }

    let mean = average_rating(ratings);
    let variance = ratings
        .iter()
        .map(|&r| (r as f64 - mean).powi(2))
        .sum::<f64>()
        / ratings.len() as f64;

    let quality = 1.0 - (variance.sqrt() / QUALITY_SPREAD).min(1.0);
    quality.max(0.0)
}
