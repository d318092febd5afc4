//! Tier classification
//!
//! Two threshold tables exist side by side and are kept apart on purpose:
//! the ranked table (six bands, shown on profiles and leaderboards) and the
//! icon table (five bands, used to pick rank icons). Their cut points
//! disagree, so merging them would change what players see.

use crate::error::RatingError;
use crate::types::Rating;
use serde::{Deserialize, Serialize};

/// Named rating band, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Unranked,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Unranked => "UNRANKED",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top edge of a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpperBound {
    /// Highest rating still inside the band
    Inclusive(Rating),
    /// The band catches everything above its lower bound
    Unbounded,
}

impl UpperBound {
    fn admits(self, rating: Rating) -> bool {
        match self {
            UpperBound::Inclusive(max) => rating <= max,
            UpperBound::Unbounded => true,
        }
    }
}

/// One band of a threshold table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    pub tier: Tier,
    pub min: Rating,
    pub max: UpperBound,
}

impl TierBand {
    pub const fn new(tier: Tier, min: Rating, max: UpperBound) -> Self {
        Self { tier, min, max }
    }

    pub fn contains(&self, rating: Rating) -> bool {
        rating >= self.min && self.max.admits(rating)
    }
}

/// Ordered list of bands mapping ratings to tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub bands: Vec<TierBand>,
}

const RANKED_BANDS: [TierBand; 6] = [
    TierBand::new(Tier::Bronze, 0, UpperBound::Inclusive(1199)),
    TierBand::new(Tier::Silver, 1200, UpperBound::Inclusive(1499)),
    TierBand::new(Tier::Gold, 1500, UpperBound::Inclusive(1799)),
    TierBand::new(Tier::Platinum, 1800, UpperBound::Inclusive(2099)),
    TierBand::new(Tier::Diamond, 2100, UpperBound::Inclusive(2399)),
    TierBand::new(Tier::Master, 2400, UpperBound::Unbounded),
];

const ICON_BANDS: [TierBand; 5] = [
    TierBand::new(Tier::Bronze, 0, UpperBound::Inclusive(1099)),
    TierBand::new(Tier::Silver, 1100, UpperBound::Inclusive(1299)),
    TierBand::new(Tier::Gold, 1300, UpperBound::Inclusive(1499)),
    TierBand::new(Tier::Platinum, 1500, UpperBound::Inclusive(1799)),
    TierBand::new(Tier::Diamond, 1800, UpperBound::Unbounded),
];

impl TierTable {
    pub fn new(bands: Vec<TierBand>) -> Self {
        Self { bands }
    }

    /// Six-band table used for ranked display
    pub fn ranked() -> Self {
        Self::new(RANKED_BANDS.to_vec())
    }

    /// Five-band table used for rank icons
    pub fn icon() -> Self {
        Self::new(ICON_BANDS.to_vec())
    }

    /// Tier for `rating`, or [`Tier::Unranked`] when no band matches
    pub fn classify(&self, rating: Rating) -> Tier {
        self.bands
            .iter()
            .find(|band| band.contains(rating))
            .map(|band| band.tier)
            .unwrap_or(Tier::Unranked)
    }

    /// Bands must be non-empty, ascending, and must not overlap.
    /// Only the last band may be unbounded.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.bands.is_empty() {
            return Err(RatingError::ConfigurationError {
                message: "Tier table must have at least one band".to_string(),
            }
            .into());
        }

        for (i, band) in self.bands.iter().enumerate() {
            if band.tier == Tier::Unranked {
                return Err(RatingError::ConfigurationError {
                    message: "UNRANKED cannot be assigned to a band".to_string(),
                }
                .into());
            }

            match band.max {
                UpperBound::Inclusive(max) if max < band.min => {
                    return Err(RatingError::ConfigurationError {
                        message: format!("{} band ends below its start", band.tier),
                    }
                    .into());
                }
                UpperBound::Unbounded if i + 1 != self.bands.len() => {
                    return Err(RatingError::ConfigurationError {
                        message: format!("Only the last band may be unbounded, not {}", band.tier),
                    }
                    .into());
                }
                _ => {}
            }

            if let Some(next) = self.bands.get(i + 1) {
                if let UpperBound::Inclusive(max) = band.max {
                    if next.min <= max {
                        return Err(RatingError::ConfigurationError {
                            message: format!("{} overlaps {}", band.tier, next.tier),
                        }
                        .into());
                    }
                }
            }
        }

        Ok(())
    }
}

/// Ranked tier using the built-in six-band table
pub fn ranked_tier_of(rating: Rating) -> Tier {
    TierTable::ranked().classify(rating)
}

/// Icon tier using the built-in five-band table
pub fn icon_tier_of(rating: Rating) -> Tier {
    TierTable::icon().classify(rating)
}
