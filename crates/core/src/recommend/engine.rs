//! Strict, fallback and popularity passes

use std::cmp::Reverse;

use crate::domain::item::EnrichedItem;

use super::scoring::{FallbackScore, ScoreCalculator, ScoringWeights};
use super::types::{PreferenceQuery, Recommendation, RecommendationSource};
use super::MAX_RECOMMENDATIONS;

/// Constrained recommender over an enriched catalog.
///
/// Never fails: an empty catalog is the only input that yields an empty
/// recommendation.
#[derive(Debug, Clone)]
pub struct Recommender {
    calculator: ScoreCalculator,
    max_results: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new()
    }
}

impl Recommender {
    pub fn new() -> Self {
        Self { calculator: ScoreCalculator::new(), max_results: MAX_RECOMMENDATIONS }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.calculator = ScoreCalculator::with_weights(weights);
        self
    }

    /// Clamped to `1..=MAX_RECOMMENDATIONS`
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.clamp(1, MAX_RECOMMENDATIONS);
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn weights(&self) -> &ScoringWeights {
        self.calculator.weights()
    }

    pub fn recommend(&self, catalog: &[EnrichedItem], query: &PreferenceQuery) -> Recommendation {
        if catalog.is_empty() {
            tracing::warn!(event_name = "recommend.empty_catalog", "no catalog items to recommend");
            return Recommendation::empty();
        }

        let strict = self.calculator.strict_matches(catalog, query);
        if !strict.is_empty() {
            let items = self.top_by_popularity(strict);
            tracing::debug!(
                event_name = "recommend.strict_pass",
                returned = items.len(),
                "strict pass satisfied the query"
            );
            return Recommendation::new(items, RecommendationSource::Strict);
        }

        let mut scored: Vec<(&EnrichedItem, FallbackScore)> = catalog
            .iter()
            .map(|item| (item, self.calculator.score(item, query)))
            .filter(|(_, score)| score.is_eligible())
            .collect();
        if !scored.is_empty() {
            scored.sort_by_key(|(item, score)| (Reverse(score.score), Reverse(item.popularity)));
            let items: Vec<EnrichedItem> =
                scored.into_iter().take(self.max_results).map(|(item, _)| item.clone()).collect();
            tracing::debug!(
                event_name = "recommend.fallback_pass",
                returned = items.len(),
                "strict pass empty; using weighted fallback"
            );
            return Recommendation::new(items, RecommendationSource::Fallback);
        }

        let items = self.top_by_popularity(catalog.iter().collect());
        tracing::debug!(
            event_name = "recommend.popularity_pass",
            returned = items.len(),
            "no item scored; using most popular"
        );
        Recommendation::new(items, RecommendationSource::Popularity)
    }

    /// Most popular items overall, ignoring any query.
    pub fn most_popular(&self, catalog: &[EnrichedItem]) -> Recommendation {
        if catalog.is_empty() {
            return Recommendation::empty();
        }
        Recommendation::new(
            self.top_by_popularity(catalog.iter().collect()),
            RecommendationSource::Popularity,
        )
    }

    // Stable sort: equal popularity keeps catalog order.
    fn top_by_popularity(&self, mut items: Vec<&EnrichedItem>) -> Vec<EnrichedItem> {
        items.sort_by_key(|item| Reverse(item.popularity));
        items.into_iter().take(self.max_results).cloned().collect()
    }
}
