//! Types for the recommender

use serde::{Deserialize, Serialize};

use crate::domain::item::{DayPart, EnrichedItem, TasteDimension, Temperature};

use super::{
    DOMINANT_TASTE_THRESHOLD, MAX_RECOMMENDATIONS, MAX_SUMMARY_BENEFITS, MAX_TASTE_DESCRIPTORS,
};

/// Preference request as received from a caller, before normalisation.
///
/// Every field is optional; unknown values are dropped rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPreferenceQuery {
    pub temperature: Option<String>,
    pub time_of_day: Option<String>,
    pub flavor: Option<String>,
    /// "yes" / "no"
    pub caffeine: Option<String>,
    pub health_goal: Option<String>,
    pub dietary_restrictions: Vec<String>,
}

/// Normalised multi-criteria request. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceQuery {
    pub temperature: Option<Temperature>,
    pub time_of_day: Option<DayPart>,
    pub flavor: Option<String>,
    pub caffeine: Option<bool>,
    pub health_goal: Option<String>,
    pub dietary_restrictions: Vec<String>,
}

impl PreferenceQuery {
    /// Create an unconstrained query
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: DayPart) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }

    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = normalize_tag(&flavor.into());
        self
    }

    pub fn with_caffeine(mut self, caffeine: bool) -> Self {
        self.caffeine = Some(caffeine);
        self
    }

    pub fn with_health_goal(mut self, health_goal: impl Into<String>) -> Self {
        self.health_goal = normalize_tag(&health_goal.into());
        self
    }

    pub fn with_dietary_restriction(mut self, restriction: impl Into<String>) -> Self {
        if let Some(tag) = normalize_tag(&restriction.into()) {
            if !self.dietary_restrictions.contains(&tag) {
                self.dietary_restrictions.push(tag);
            }
        }
        self
    }

    /// True when no field constrains the catalog
    pub fn is_unconstrained(&self) -> bool {
        self.temperature.is_none()
            && self.time_of_day.is_none()
            && self.flavor.is_none()
            && self.caffeine.is_none()
            && self.health_goal.is_none()
            && self.dietary_restrictions.is_empty()
    }
}

impl From<RawPreferenceQuery> for PreferenceQuery {
    fn from(raw: RawPreferenceQuery) -> Self {
        let mut query = Self {
            temperature: raw.temperature.as_deref().and_then(Temperature::parse_lenient),
            time_of_day: raw.time_of_day.as_deref().and_then(DayPart::parse_lenient),
            flavor: raw.flavor.as_deref().and_then(normalize_tag),
            caffeine: raw.caffeine.as_deref().and_then(parse_caffeine),
            health_goal: raw.health_goal.as_deref().and_then(normalize_tag),
            dietary_restrictions: Vec::new(),
        };
        for restriction in raw.dietary_restrictions {
            query = query.with_dietary_restriction(restriction);
        }
        query
    }
}

fn normalize_tag(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn parse_caffeine(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Which pass produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Every item satisfied all constraints
    Strict,
    /// Weighted relaxation of the constraints
    Fallback,
    /// Most popular items, unconditionally
    Popularity,
    /// Curated names from a terminal decision-tree option
    Curated,
    /// Catalog was empty
    Empty,
}

impl RecommendationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Fallback => "fallback",
            Self::Popularity => "popularity",
            Self::Curated => "curated",
            Self::Empty => "empty",
        }
    }
}

/// Aggregates over exactly the returned items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    /// Mean calories, rounded to the nearest kcal
    pub average_calories: u32,
    pub total_protein_g: f64,
    pub total_sugar_g: f64,
    /// Descriptors of the dominant taste dimensions, strongest first
    pub taste_descriptors: Vec<String>,
    /// Most frequent health-benefit tags
    pub top_benefits: Vec<String>,
}

impl RecommendationSummary {
    pub fn empty() -> Self {
        Self {
            average_calories: 0,
            total_protein_g: 0.0,
            total_sugar_g: 0.0,
            taste_descriptors: Vec::new(),
            top_benefits: Vec::new(),
        }
    }

    pub fn from_items(items: &[EnrichedItem]) -> Self {
        if items.is_empty() {
            return Self::empty();
        }

        let count = items.len() as f64;
        let calories: u64 = items.iter().map(|item| u64::from(item.nutrition.calories)).sum();
        let protein: f64 = items.iter().map(|item| item.nutrition.protein_g).sum();
        let sugar: f64 = items.iter().map(|item| item.nutrition.sugar_g).sum();

        Self {
            average_calories: (calories as f64 / count).round() as u32,
            total_protein_g: round_tenth(protein),
            total_sugar_g: round_tenth(sugar),
            taste_descriptors: dominant_tastes(items),
            top_benefits: top_benefits(items),
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn dominant_tastes(items: &[EnrichedItem]) -> Vec<String> {
    let count = items.len() as f64;
    let mut averages: Vec<(TasteDimension, f64)> = TasteDimension::ALL
        .iter()
        .map(|dimension| {
            let total: u32 =
                items.iter().map(|item| u32::from(item.taste_profile.get(*dimension))).sum();
            (*dimension, f64::from(total) / count)
        })
        .collect();
    // Stable: equal averages keep dimension order.
    averages.sort_by(|left, right| right.1.total_cmp(&left.1));

    let dominant: Vec<String> = averages
        .iter()
        .filter(|(_, average)| *average >= DOMINANT_TASTE_THRESHOLD)
        .take(MAX_TASTE_DESCRIPTORS)
        .map(|(dimension, _)| dimension.descriptor().to_owned())
        .collect();

    if dominant.is_empty() {
        averages
            .first()
            .map(|(dimension, _)| vec![dimension.descriptor().to_owned()])
            .unwrap_or_default()
    } else {
        dominant
    }
}

fn top_benefits(items: &[EnrichedItem]) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for benefit in items.iter().flat_map(|item| item.health_benefits.iter()) {
        match counts.iter_mut().find(|(tag, _)| *tag == benefit.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((benefit.as_str(), 1)),
        }
    }
    counts.sort_by(|left, right| right.1.cmp(&left.1));
    counts.into_iter().take(MAX_SUMMARY_BENEFITS).map(|(tag, _)| tag.to_owned()).collect()
}

/// Ordered list of at most [`MAX_RECOMMENDATIONS`] items plus summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub items: Vec<EnrichedItem>,
    pub summary: RecommendationSummary,
    pub source: RecommendationSource,
}

impl Recommendation {
    pub fn new(mut items: Vec<EnrichedItem>, source: RecommendationSource) -> Self {
        items.truncate(MAX_RECOMMENDATIONS);
        let summary = RecommendationSummary::from_items(&items);
        Self { items, summary, source }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            summary: RecommendationSummary::empty(),
            source: RecommendationSource::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(EnrichedItem::title).collect()
    }
}
