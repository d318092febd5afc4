//! Utility functions for the rating core

use crate::types::Rating;
use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two ratings
pub fn rating_difference(rating1: Rating, rating2: Rating) -> i64 {
    (rating1 as i64 - rating2 as i64).abs()
}

/// Check if two ratings are within the given tolerance
pub fn ratings_within_tolerance(rating1: Rating, rating2: Rating, tolerance: i64) -> bool {
    rating_difference(rating1, rating2) <= tolerance
}

/// Round a computed rating or delta back to an integer, halves away from zero
pub fn round_rating(value: f64) -> Rating {
    value.round() as Rating
}
