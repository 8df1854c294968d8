use std::collections::HashSet;

use mashti_core::catalog::{CatalogCache, CatalogCacheSettings};
use mashti_core::flows::FlowGraph;
use mashti_core::recommend::{RecommendationSource, Recommender, ResultResolver};
use mashti_db::migrations::run_pending;
use mashti_db::{connect_with_settings, MenuSeedDataset, SqlMenuItemRepository};

type SeedContractTestResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
    ($left:expr, $right:expr, $($arg:tt)*) => {
        if $left != $right {
            return Err(format!($($arg)*));
        }
    };
}

/// Every result list of every terminal option in the default decision tree.
fn terminal_results(graph: &FlowGraph) -> Vec<(String, Vec<String>)> {
    graph
        .node_keys()
        .filter_map(|key| graph.node(key).map(|node| (key, node)))
        .flat_map(|(key, node)| {
            node.options.iter().filter_map(move |option| {
                option.result.clone().map(|names| (format!("{key} / {}", option.label), names))
            })
        })
        .collect()
}

#[test]
fn seed_sql_names_every_decision_tree_result() -> SeedContractTestResult {
    let graph = FlowGraph::mashti_default().map_err(|error| error.to_string())?;
    let seeded: HashSet<&str> = MenuSeedDataset::listed_names().collect();
    let results = terminal_results(&graph);

    require!(!results.is_empty(), "default tree should have terminal options");
    for (origin, names) in &results {
        require!(!names.is_empty(), "{origin} has an empty result list");
        for name in names {
            require!(seeded.contains(name.as_str()), "{origin} names `{name}`, which is not seeded");
            require!(
                MenuSeedDataset::SQL.contains(&format!("'{name}'")),
                "seed SQL fixture should include `{name}`"
            );
        }
    }
    Ok(())
}

#[test]
fn seed_names_are_unique() -> SeedContractTestResult {
    let mut seen = HashSet::new();
    for name in MenuSeedDataset::listed_names() {
        require!(seen.insert(name.to_ascii_lowercase()), "duplicate seeded name: {name}");
    }
    require_eq!(seen.len(), 37);
    Ok(())
}

#[tokio::test]
async fn every_terminal_result_resolves_fully_against_the_seeded_catalog() -> SeedContractTestResult
{
    let dir = tempfile::tempdir().map_err(|error| error.to_string())?;
    let url = format!("sqlite://{}", dir.path().join("menu.db").display());
    let pool = connect_with_settings(&url, 1, 5).await.map_err(|error| error.to_string())?;
    run_pending(&pool).await.map_err(|error| error.to_string())?;
    MenuSeedDataset::load(&pool).await.map_err(|error| error.to_string())?;

    let cache =
        CatalogCache::new(SqlMenuItemRepository::new(pool), CatalogCacheSettings::default());
    let catalog = cache.get().await.map_err(|error| error.to_string())?;
    require_eq!(catalog.len(), 37);

    let graph = FlowGraph::mashti_default().map_err(|error| error.to_string())?;
    let recommender = Recommender::new();
    for (origin, names) in terminal_results(&graph) {
        let recommendation =
            ResultResolver.resolve_or_recommend(&names, &[], catalog.items(), &recommender);
        require_eq!(
            recommendation.source,
            RecommendationSource::Curated,
            "{origin} should resolve from the catalog"
        );
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        require_eq!(recommendation.titles(), expected, "{origin} resolved out of order");
    }
    Ok(())
}
