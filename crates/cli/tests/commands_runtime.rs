use std::env;
use std::sync::{Mutex, OnceLock};

use mashti_cli::commands::{config, doctor, migrate, recommend, seed, smoke, walk};
use mashti_core::config::LoadOptions;
use mashti_core::recommend::RawPreferenceQuery;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_file_database() {
    with_database(&[], |_| {
        let result = migrate::run(LoadOptions::default());
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_for_invalid_recommender_limit() {
    with_database(&[("MASHTI_RECOMMENDER_MAX_RESULTS", "9")], |_| {
        let result = migrate::run(LoadOptions::default());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    with_database(&[], |_| {
        let first = seed::run(LoadOptions::default());
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let second = seed::run(LoadOptions::default());
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");

        let first_payload = parse_payload(&first.output);
        let second_payload = parse_payload(&second.output);
        assert_eq!(first_payload["command"], "seed");
        assert_eq!(
            first_payload["message"],
            "demo menu loaded: 37 listed items, 2 unlisted items"
        );
        assert_eq!(first_payload["message"], second_payload["message"]);
    });
}

#[test]
fn smoke_passes_against_seeded_menu() {
    with_database(&[], |_| {
        assert_eq!(seed::run(LoadOptions::default()).exit_code, 0);

        let result = smoke::run(LoadOptions::default());
        assert_eq!(result.exit_code, 0, "expected successful smoke report: {}", result.output);

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "pass");
        assert_eq!(payload["checks"].as_array().map(Vec::len), Some(6));
    });
}

#[test]
fn smoke_fails_on_empty_catalog() {
    with_database(&[], |_| {
        let result = smoke::run(LoadOptions::default());
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["status"], "fail");
        assert_eq!(payload["checks"][4]["name"], "catalog_load");
        assert_eq!(payload["checks"][4]["status"], "fail");
        assert_eq!(payload["checks"][5]["status"], "skipped");
    });
}

#[test]
fn smoke_returns_failure_when_config_invalid() {
    with_database(&[("MASHTI_RECOMMENDER_DIETARY_MISMATCH", "10")], |_| {
        let result = smoke::run(LoadOptions::default());
        assert_eq!(result.exit_code, 6, "expected smoke failure code");

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["checks"][0]["status"], "fail");
    });
}

#[test]
fn recommend_uses_strict_pass_when_preferences_match() {
    with_database(&[], |_| {
        assert_eq!(seed::run(LoadOptions::default()).exit_code, 0);

        let result = recommend::run(
            LoadOptions::default(),
            RawPreferenceQuery {
                temperature: Some("hot".to_string()),
                caffeine: Some("yes".to_string()),
                ..RawPreferenceQuery::default()
            },
        );
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let recommendation = &payload["data"]["recommendation"];
        assert_eq!(recommendation["source"], "strict");
        let items = recommendation["items"].as_array().expect("items array");
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item["temperature"] == "hot" && item["caffeine"] == true));
    });
}

#[test]
fn recommend_on_empty_catalog_reports_no_recommendations() {
    with_database(&[], |_| {
        let result = recommend::run(LoadOptions::default(), RawPreferenceQuery::default());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["message"], "no recommendations available");
        assert_eq!(payload["data"]["recommendation"]["source"], "empty");
    });
}

#[test]
fn walk_resolves_citrus_branch_in_curated_order() {
    with_database(&[], |_| {
        assert_eq!(seed::run(LoadOptions::default()).exit_code, 0);

        let result = walk::run(LoadOptions::default(), &steps(&["1", "0", "0", "0"]));
        assert_eq!(result.exit_code, 0, "walk failed: {}", result.output);

        let payload = parse_payload(&result.output);
        let data = &payload["data"];
        assert_eq!(data["completed"], true);
        assert_eq!(data["recommendation"]["source"], "curated");
        let titles: Vec<&str> = data["recommendation"]["items"]
            .as_array()
            .expect("items array")
            .iter()
            .filter_map(|item| item["item"]["name"].as_str())
            .collect();
        assert_eq!(titles, vec!["Orange Juice", "Barberry Juice", "Sour Cherry Juice"]);
        assert_eq!(data["audit_events"].as_array().map(Vec::len), Some(5));
        assert_eq!(data["audit_events"][4], "recommend.resolved");
    });
}

#[test]
fn completed_walk_reports_service_unavailable_when_migrations_fail() {
    with_database(&[], |dir| {
        // A pre-existing table without the listing columns breaks the index migration.
        let url = format!("sqlite://{}", dir.path().join("mashti.db").display());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(async {
            let pool = mashti_db::connect(&url).await.expect("connect");
            sqlx::query("CREATE TABLE menu_item (id TEXT PRIMARY KEY NOT NULL)")
                .execute(&pool)
                .await
                .expect("conflicting table");
            pool.close().await;
        });

        let result = walk::run(LoadOptions::default(), &steps(&["1", "0", "0", "0"]));
        assert_eq!(result.exit_code, 4, "unexpected walk result: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "service_unavailable");
        assert!(payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("migration failed")));
    });
}

#[test]
fn unfinished_walk_reports_next_question_without_touching_catalog() {
    with_database(&[], |_| {
        let result = walk::run(LoadOptions::default(), &steps(&["0", "back", "1"]));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["current"], "cold");
        assert_eq!(payload["data"]["completed"], false);
        assert!(payload["data"].get("recommendation").is_none());
        assert!(payload["message"].as_str().unwrap_or_default().starts_with("next question:"));
    });
}

#[test]
fn walk_rejects_unknown_option_and_back_at_root() {
    with_database(&[], |_| {
        let unknown = walk::run(LoadOptions::default(), &steps(&["7"]));
        assert_eq!(unknown.exit_code, 7);
        assert_eq!(parse_payload(&unknown.output)["error_class"], "bad_request");

        let at_root = walk::run(LoadOptions::default(), &steps(&["back"]));
        assert_eq!(at_root.exit_code, 7);

        let garbage = walk::run(LoadOptions::default(), &steps(&["sideways"]));
        assert_eq!(garbage.exit_code, 2);
        assert_eq!(parse_payload(&garbage.output)["error_class"], "invalid_step");
    });
}

#[test]
fn doctor_reports_pass_for_seeded_database() {
    with_database(&[], |_| {
        assert_eq!(seed::run(LoadOptions::default()).exit_code, 0);

        let report = parse_payload(&doctor::run(LoadOptions::default(), true));
        assert_eq!(report["overall_status"], "pass");
        assert_eq!(report["checks"].as_array().map(Vec::len), Some(4));
    });
}

#[test]
fn config_attributes_env_and_file_sources() {
    with_database(&[("MASHTI_RECOMMENDER_FLAVOR_MATCH", "9")], |dir| {
        let path = dir.path().join("mashti.toml");
        std::fs::write(&path, "[catalog]\ncache_ttl_secs = 60\n").expect("write config");

        let output = config::run(LoadOptions { config_path: Some(path), ..LoadOptions::default() });
        assert!(
            output.contains(
                "- recommender.flavor_match = 9 (source: env (MASHTI_RECOMMENDER_FLAVOR_MATCH))"
            ),
            "{output}"
        );
        assert!(output.contains("- catalog.cache_ttl_secs = 60 (source: file ("), "{output}");
        assert!(output.contains("- recommender.dietary_mismatch = -10 (source: default)"));
        assert!(output.contains("- flow.definition_path = <embedded> (source: default)"));
    });
}

fn steps(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|step| step.to_string()).collect()
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

/// Runs `test_fn` against a fresh SQLite file with the given env overrides.
fn with_database(vars: &[(&str, &str)], test_fn: impl FnOnce(&TempDir)) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("mashti.db").display());
    let mut all_vars = vec![("MASHTI_DATABASE_URL", url.as_str())];
    all_vars.extend_from_slice(vars);
    with_env(&all_vars, || test_fn(&dir));
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "MASHTI_DATABASE_URL",
        "MASHTI_DATABASE_MAX_CONNECTIONS",
        "MASHTI_DATABASE_TIMEOUT_SECS",
        "MASHTI_CATALOG_CACHE_TTL_SECS",
        "MASHTI_CATALOG_FETCH_RETRIES",
        "MASHTI_CATALOG_RETRY_BACKOFF_MS",
        "MASHTI_FLOW_DEFINITION_PATH",
        "MASHTI_FLOW_PROGRESS_STEP_PCT",
        "MASHTI_RECOMMENDER_MAX_RESULTS",
        "MASHTI_RECOMMENDER_FLAVOR_MATCH",
        "MASHTI_RECOMMENDER_DIETARY_MISMATCH",
        "MASHTI_LOGGING_LEVEL",
        "MASHTI_LOGGING_FORMAT",
        "MASHTI_LOG_LEVEL",
        "MASHTI_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
