use serde::Serialize;

use crate::commands::{build_runtime, load_catalog, load_config, CommandResult};
use mashti_core::config::LoadOptions;
use mashti_core::recommend::{PreferenceQuery, RawPreferenceQuery, Recommendation, Recommender};

#[derive(Debug, Serialize)]
struct RecommendOutput {
    query: PreferenceQuery,
    recommendation: Recommendation,
}

pub fn run(options: LoadOptions, raw_query: RawPreferenceQuery) -> CommandResult {
    let config = match load_config("recommend", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("recommend") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let catalog = match runtime.block_on(load_catalog(&config)) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::from_application_error("recommend", error),
    };

    let recommender = Recommender::new()
        .with_weights(config.recommender.weights)
        .with_max_results(config.recommender.max_results);
    let query = PreferenceQuery::from(raw_query);
    let recommendation = recommender.recommend(catalog.items(), &query);

    let message = if recommendation.is_empty() {
        "no recommendations available".to_string()
    } else {
        format!(
            "{} ({} pass)",
            recommendation.titles().join(", "),
            recommendation.source.as_str()
        )
    };
    CommandResult::success_with("recommend", message, RecommendOutput { query, recommendation })
}
