//! Maps curated result names from the decision tree onto catalog items

use crate::domain::item::{EnrichedItem, Temperature};

use super::engine::Recommender;
use super::types::{PreferenceQuery, Recommendation, RecommendationSource};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultResolver;

impl ResultResolver {
    /// Resolve names in input order: exact case-insensitive title first, then
    /// substring containment in either direction. Unmatched names are skipped
    /// and each catalog title is emitted at most once.
    pub fn resolve(&self, names: &[String], catalog: &[EnrichedItem]) -> Vec<EnrichedItem> {
        let titles: Vec<String> =
            catalog.iter().map(|item| item.title().trim().to_lowercase()).collect();
        let mut emitted: Vec<&str> = Vec::new();
        let mut resolved = Vec::new();

        for name in names {
            let target = name.trim().to_lowercase();
            if target.is_empty() {
                continue;
            }

            let position = titles.iter().position(|title| *title == target).or_else(|| {
                titles.iter().position(|title| {
                    !title.is_empty() && (title.contains(&target) || target.contains(title.as_str()))
                })
            });

            let Some(position) = position else {
                continue;
            };
            let title = titles[position].as_str();
            if emitted.contains(&title) {
                continue;
            }
            emitted.push(title);
            resolved.push(catalog[position].clone());
        }

        resolved
    }

    /// Temperature implied by the most recent hot or cold branch in a path.
    pub fn infer_hint(&self, visited_path: &[String]) -> Option<Temperature> {
        visited_path.iter().rev().find_map(|key| branch_temperature(key))
    }

    /// Resolve a terminal result; when nothing matches, fall back to the
    /// recommender with whatever the path implies.
    pub fn resolve_or_recommend(
        &self,
        names: &[String],
        visited_path: &[String],
        catalog: &[EnrichedItem],
        recommender: &Recommender,
    ) -> Recommendation {
        let mut resolved = self.resolve(names, catalog);
        if !resolved.is_empty() {
            resolved.truncate(recommender.max_results());
            return Recommendation::new(resolved, RecommendationSource::Curated);
        }

        let hint = self.infer_hint(visited_path);
        tracing::info!(
            event_name = "resolve.fallback",
            requested = names.len(),
            hint = hint.map(|temperature| temperature.as_str()).unwrap_or("none"),
            "curated result matched nothing in the catalog"
        );
        let query = match hint {
            Some(temperature) => PreferenceQuery::new().with_temperature(temperature),
            None => PreferenceQuery::new(),
        };
        recommender.recommend(catalog, &query)
    }
}

fn branch_temperature(key: &str) -> Option<Temperature> {
    let key = key.to_ascii_lowercase();
    let branch = |prefix: &str| key == prefix || key.starts_with(&format!("{prefix}_"));
    if branch("hot") {
        Some(Temperature::Hot)
    } else if branch("cold") || branch("iced") {
        Some(Temperature::Cold)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::item::{EnrichedItem, RawCatalogItem, Temperature};
    use crate::enrichment::Enricher;
    use crate::recommend::engine::Recommender;
    use crate::recommend::resolver::ResultResolver;
    use crate::recommend::types::RecommendationSource;

    fn menu(names: &[(&str, &str)]) -> Vec<EnrichedItem> {
        names
            .iter()
            .enumerate()
            .map(|(index, (name, category))| {
                Enricher.enrich(&RawCatalogItem::new(index.to_string(), *name, *category))
            })
            .collect()
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn resolution_preserves_curated_order_not_catalog_order() {
        let catalog = menu(&[("Americano", "Hot Coffee"), ("Latte", "Hot Coffee"), ("Espresso", "Hot Coffee")]);

        let resolved = ResultResolver.resolve(&names(&["Espresso", "Americano"]), &catalog);
        let titles: Vec<&str> = resolved.iter().map(EnrichedItem::title).collect();
        assert_eq!(titles, vec!["Espresso", "Americano"]);
    }

    #[test]
    fn exact_match_wins_over_substring_and_duplicates_are_dropped() {
        let catalog = menu(&[("Iced Mocha", "Iced Coffee"), ("Mocha", "Hot Coffee")]);

        let resolved = ResultResolver.resolve(&names(&["mocha", "Mocha", "Ghost Drink"]), &catalog);
        let titles: Vec<&str> = resolved.iter().map(EnrichedItem::title).collect();
        assert_eq!(titles, vec!["Mocha"]);
    }

    #[test]
    fn substring_match_works_in_both_directions() {
        let catalog = menu(&[("Fresh Orange Juice", "Fresh Juice"), ("Latte", "Hot Coffee")]);

        let resolved =
            ResultResolver.resolve(&names(&["Orange Juice", "Cafe Latte"]), &catalog);
        let titles: Vec<&str> = resolved.iter().map(EnrichedItem::title).collect();
        assert_eq!(titles, vec!["Fresh Orange Juice", "Latte"]);
    }

    #[test]
    fn hint_uses_most_recent_temperature_branch() {
        let path = names(&["start", "hot", "hot_tea"]);
        assert_eq!(ResultResolver.infer_hint(&path), Some(Temperature::Hot));
        assert_eq!(
            ResultResolver.infer_hint(&names(&["start", "cold", "iced_coffee"])),
            Some(Temperature::Cold)
        );
        assert_eq!(ResultResolver.infer_hint(&names(&["start"])), None);
    }

    #[test]
    fn unresolvable_result_falls_back_to_hinted_recommendation() {
        let catalog = menu(&[("Orange Juice", "Fresh Juice"), ("Espresso", "Hot Coffee")]);

        let recommendation = ResultResolver.resolve_or_recommend(
            &names(&["Unicorn Latte Supreme"]),
            &names(&["start", "hot", "hot_coffee"]),
            &catalog,
            &Recommender::new(),
        );

        assert_eq!(recommendation.source, RecommendationSource::Strict);
        assert_eq!(recommendation.titles(), vec!["Espresso"]);
    }

    #[test]
    fn fallback_without_hint_returns_most_popular() {
        let catalog = menu(&[("Orange Juice", "Fresh Juice"), ("Americano", "Hot Coffee")]);

        let recommendation = ResultResolver.resolve_or_recommend(
            &names(&["Nothing Here"]),
            &names(&["start"]),
            &catalog,
            &Recommender::new(),
        );

        assert_eq!(recommendation.titles().first().copied(), Some("Americano"));
    }
}
