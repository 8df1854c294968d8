//! Strict filters and fallback scoring for the recommender

use serde::{Deserialize, Serialize};

use crate::domain::item::{EnrichedItem, Temperature};

use super::types::PreferenceQuery;

/// Weights for the fallback pass. Penalties are stored as negative numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Item temperature equals the requested one (default: 10)
    pub temperature_match: i32,
    /// Requested temperature is not `both` and differs (default: -5)
    pub temperature_mismatch: i32,
    /// Requested day part is in the item's set (default: 8)
    pub time_of_day_match: i32,
    /// Requested flavor is in the item's set (default: 8)
    pub flavor_match: i32,
    /// Caffeine flag agrees with the request (default: 6)
    pub caffeine_match: i32,
    /// Caffeine flag contradicts the request (default: -3)
    pub caffeine_mismatch: i32,
    /// Requested health goal is in the item's set (default: 7)
    pub health_goal_match: i32,
    /// Every requested dietary restriction holds (default: 6)
    pub dietary_match: i32,
    /// At least one requested restriction fails (default: -10)
    pub dietary_mismatch: i32,
    /// Added for popular items (default: 3)
    pub popularity_bonus: i32,
    /// Popularity at which the bonus applies (default: 8)
    pub popularity_threshold: u8,
    /// Added when enough criteria matched (default: 5)
    pub multi_match_bonus: i32,
    /// Matched criteria needed for the multi-match bonus (default: 2)
    pub multi_match_threshold: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Fallback score for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackScore {
    pub score: i32,
    pub matches: u32,
}

impl FallbackScore {
    /// Positive score backed by at least one matched criterion
    pub fn is_eligible(&self) -> bool {
        self.score > 0 && self.matches >= 1
    }
}

/// Evaluates items against a query, strictly or by weighted score
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreCalculator {
    /// Create a calculator with the default weights
    pub fn new() -> Self {
        Self { weights: ScoringWeights::default() }
    }

    /// Create with custom weights
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Apply every present field as an exact filter, in the fixed order
    /// temperature, time of day, flavor, caffeine, health goal, diet.
    pub fn strict_matches<'a>(
        &self,
        catalog: &'a [EnrichedItem],
        query: &PreferenceQuery,
    ) -> Vec<&'a EnrichedItem> {
        let mut candidates: Vec<&EnrichedItem> = catalog.iter().collect();

        if let Some(temperature) = query.temperature {
            if temperature != Temperature::Both {
                candidates.retain(|item| item.temperature == temperature);
            }
        }
        if let Some(day_part) = query.time_of_day {
            candidates.retain(|item| item.suits(day_part));
        }
        if let Some(flavor) = &query.flavor {
            candidates.retain(|item| item.has_flavor(flavor));
        }
        if let Some(caffeine) = query.caffeine {
            candidates.retain(|item| item.caffeine == caffeine);
        }
        if let Some(goal) = &query.health_goal {
            candidates.retain(|item| item.has_health_benefit(goal));
        }
        if !query.dietary_restrictions.is_empty() {
            candidates.retain(|item| item.satisfies_all(&query.dietary_restrictions));
        }

        candidates
    }

    /// Score one item for the fallback pass
    pub fn score(&self, item: &EnrichedItem, query: &PreferenceQuery) -> FallbackScore {
        let weights = &self.weights;
        let mut score = 0;
        let mut matches = 0;

        if let Some(temperature) = query.temperature {
            if item.temperature == temperature {
                score += weights.temperature_match;
                matches += 1;
            } else if temperature != Temperature::Both {
                score += weights.temperature_mismatch;
            }
        }

        if let Some(day_part) = query.time_of_day {
            if item.suits(day_part) {
                score += weights.time_of_day_match;
                matches += 1;
            }
        }

        if let Some(flavor) = &query.flavor {
            if item.has_flavor(flavor) {
                score += weights.flavor_match;
                matches += 1;
            }
        }

        if let Some(caffeine) = query.caffeine {
            if item.caffeine == caffeine {
                score += weights.caffeine_match;
                matches += 1;
            } else {
                score += weights.caffeine_mismatch;
            }
        }

        if let Some(goal) = &query.health_goal {
            if item.has_health_benefit(goal) {
                score += weights.health_goal_match;
                matches += 1;
            }
        }

        if !query.dietary_restrictions.is_empty() {
            if item.satisfies_all(&query.dietary_restrictions) {
                score += weights.dietary_match;
                matches += 1;
            } else {
                score += weights.dietary_mismatch;
            }
        }

        if item.popularity >= weights.popularity_threshold {
            score += weights.popularity_bonus;
        }

        if matches >= weights.multi_match_threshold {
            score += weights.multi_match_bonus;
        }

        FallbackScore { score, matches }
    }
}
