//! Configuration management for arena-elo
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for the rating core.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, MatchmakingSettings, ServiceSettings};
pub use rating::{KFactorSchedule, KFactorStep, PerformanceScaling, RatingConfig};
