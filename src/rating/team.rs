//! Team aggregation: reduce a roster to one comparable rating

use crate::types::{Rating, RosterEntry};

/// Anything that may carry a rating
pub trait Rated {
    fn rating(&self) -> Option<Rating>;
}

impl Rated for RosterEntry {
    fn rating(&self) -> Option<Rating> {
        self.rating
    }
}

impl Rated for Rating {
    fn rating(&self) -> Option<Rating> {
        Some(*self)
    }
}

impl Rated for Option<Rating> {
    fn rating(&self) -> Option<Rating> {
        *self
    }
}

/// Sum of all ratings on the roster; missing ratings count as 0
pub fn total_rating<R: Rated>(roster: &[R]) -> i64 {
    roster
        .iter()
        .map(|member| member.rating().unwrap_or(0) as i64)
        .sum()
}

/// Arithmetic mean of the roster, 0 for an empty roster
pub fn average_rating<R: Rated>(roster: &[R]) -> f64 {
    if roster.is_empty() {
        return 0.0;
    }
    total_rating(roster) as f64 / roster.len() as f64
}

/// Replace missing ratings with `fallback`
pub fn resolve_ratings(roster: &[RosterEntry], fallback: Rating) -> Vec<Rating> {
    roster
        .iter()
        .map(|entry| entry.rating.unwrap_or(fallback))
        .collect()
}
