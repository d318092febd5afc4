//! Error types for the rating core
//!
//! The rating math itself is total and never fails. Errors come from the
//! edges: validating outcomes handed to a calculator, malformed rosters for
//! the team balancer, and configuration loading.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid roster: {reason}")]
    InvalidRoster { reason: String },

    #[error("Invalid match outcome: {reason}")]
    InvalidOutcome { reason: String },

    #[error("Unknown settlement algorithm: {name}")]
    UnknownAlgorithm { name: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
