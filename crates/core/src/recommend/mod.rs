//! Constrained recommender and decision-tree result resolver
//!
//! Maps a declarative [`PreferenceQuery`] onto an enriched catalog with a
//! strict filter pass, a weighted fallback pass and an unconditional
//! popularity pass, and resolves curated result lists from terminal
//! decision-tree options back onto catalog items.

mod engine;
mod resolver;
mod scoring;
mod types;

pub use engine::Recommender;
pub use resolver::ResultResolver;
pub use scoring::{FallbackScore, ScoreCalculator, ScoringWeights};
pub use types::*;

/// Fallback weights applied when no catalog item satisfies every constraint.
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    temperature_match: 10,
    temperature_mismatch: -5,
    time_of_day_match: 8,
    flavor_match: 8,
    caffeine_match: 6,
    caffeine_mismatch: -3,
    health_goal_match: 7,
    dietary_match: 6,
    dietary_mismatch: -10,
    popularity_bonus: 3,
    popularity_threshold: 8,
    multi_match_bonus: 5,
    multi_match_threshold: 2,
};

/// Hard upper bound on items in a single recommendation
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Number of taste descriptors reported in a summary
pub const MAX_TASTE_DESCRIPTORS: usize = 2;

/// Dimension average at which a taste counts as dominant
pub const DOMINANT_TASTE_THRESHOLD: f64 = 6.0;

/// Number of health-benefit tags reported in a summary
pub const MAX_SUMMARY_BENEFITS: usize = 3;
