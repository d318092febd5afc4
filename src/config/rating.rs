//! Rating system configuration

use crate::error::RatingError;
use crate::rating::settlement::SettlementAlgorithm;
use crate::rating::tier::TierTable;
use crate::types::{Rating, DEFAULT_RATING};
use serde::{Deserialize, Serialize};

/// K-factor applies to players rated strictly below `below`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KFactorStep {
    pub below: Rating,
    pub k: f64,
}

/// Per-player K-factor keyed on the player's own rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KFactorSchedule {
    /// Ascending by `below`; first match wins
    pub steps: Vec<KFactorStep>,
    /// K for everyone above the last step
    pub otherwise: f64,
}

impl Default for KFactorSchedule {
    fn default() -> Self {
        Self {
            steps: vec![
                KFactorStep { below: 1500, k: 32.0 },
                KFactorStep { below: 2000, k: 24.0 },
            ],
            otherwise: 16.0,
        }
    }
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl KFactorSchedule {
    pub fn k_for(&self, rating: Rating) -> f64 {
        self.steps
            .iter()
            .find(|step| rating < step.below)
            .map(|step| step.k)
            .unwrap_or(self.otherwise)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.steps.iter().all(|step| is_positive_finite(step.k))
            || !is_positive_finite(self.otherwise)
        {
            return Err(RatingError::ConfigurationError {
                message: "K-factors must be positive and finite".to_string(),
            }
            .into());
        }
        if self.steps.windows(2).any(|w| w[0].below >= w[1].below) {
            return Err(RatingError::ConfigurationError {
                message: "K-factor steps must be strictly ascending".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Maps a performance margin (e.g. round difference) to a reward multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScaling {
    /// Factor for a zero margin
    pub floor: f64,
    /// Highest factor any margin can reach
    pub cap: f64,
    /// Margin that adds 1.0 to the factor
    pub margin_divisor: f64,
}

impl Default for PerformanceScaling {
    fn default() -> Self {
        Self {
            floor: 0.5,
            cap: 1.5,
            margin_divisor: 12.0,
        }
    }
}

impl PerformanceScaling {
    /// Negative margins are treated as zero
    pub fn factor(&self, performance_margin: f64) -> f64 {
        (self.floor + performance_margin.max(0.0) / self.margin_divisor).min(self.cap)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if !is_positive_finite(self.margin_divisor) {
            return Err(RatingError::ConfigurationError {
                message: "Performance margin divisor must be positive and finite".to_string(),
            }
            .into());
        }
        let ordered = self.floor.is_finite()
            && self.cap.is_finite()
            && self.floor >= 0.0
            && self.cap >= self.floor;
        if !ordered {
            return Err(RatingError::ConfigurationError {
                message: "Performance factor needs 0 <= floor <= cap".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Rating system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating assumed for players with nothing on record
    pub default_rating: Rating,
    /// K-factor for pairwise updates and the uniform team settlement
    pub base_k_factor: f64,
    /// Per-player K-factor for the weighted team settlement
    pub k_factor_schedule: KFactorSchedule,
    pub performance: PerformanceScaling,
    /// Algorithm used when a caller does not pick one
    pub settlement_algorithm: SettlementAlgorithm,
    pub ranked_tiers: TierTable,
    pub icon_tiers: TierTable,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_rating: DEFAULT_RATING,
            base_k_factor: 32.0,
            k_factor_schedule: KFactorSchedule::default(),
            performance: PerformanceScaling::default(),
            settlement_algorithm: SettlementAlgorithm::Weighted,
            ranked_tiers: TierTable::ranked(),
            icon_tiers: TierTable::icon(),
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if !is_positive_finite(self.base_k_factor) {
            return Err(RatingError::ConfigurationError {
                message: "Base K-factor must be positive and finite".to_string(),
            }
            .into());
        }
        if self.default_rating < 0 {
            return Err(RatingError::ConfigurationError {
                message: "Default rating cannot be negative".to_string(),
            }
            .into());
        }
        self.k_factor_schedule.validate()?;
        self.performance.validate()?;
        self.ranked_tiers.validate()?;
        self.icon_tiers.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = KFactorSchedule::default();
        assert_eq!(schedule.k_for(0), 32.0);
        assert_eq!(schedule.k_for(1499), 32.0);
        assert_eq!(schedule.k_for(1500), 24.0);
        assert_eq!(schedule.k_for(1999), 24.0);
        assert_eq!(schedule.k_for(2000), 16.0);
        assert_eq!(schedule.k_for(3200), 16.0);
    }

    #[test]
    fn test_performance_factor() {
        let scaling = PerformanceScaling::default();
        assert_eq!(scaling.factor(0.0), 0.5);
        assert_eq!(scaling.factor(6.0), 1.0);
        assert_eq!(scaling.factor(12.0), 1.5);
        assert_eq!(scaling.factor(24.0), 1.5);
        assert_eq!(scaling.factor(-5.0), 0.5);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(RatingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = RatingConfig::default();
        config.base_k_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.k_factor_schedule.steps.reverse();
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.performance.margin_divisor = 0.0;
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.performance.cap = 0.1;
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.default_rating = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut config = RatingConfig::default();
        config.k_factor_schedule.steps[0].k = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.k_factor_schedule.otherwise = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.base_k_factor = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.performance.margin_divisor = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.performance.cap = f64::NAN;
        assert!(config.validate().is_err());
    }
}
