use std::time::Instant;

use crate::commands::{load_catalog, CommandResult};
use mashti_core::advisor::Advisor;
use mashti_core::config::{AppConfig, LoadOptions};
use mashti_core::recommend::PreferenceQuery;
use mashti_db::{connect_with_settings, migrations};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

const CHECK_ORDER: &[&str] = &[
    "config_validation",
    "flow_graph",
    "db_connectivity",
    "migration_visibility",
    "catalog_load",
    "sample_recommendation",
];

pub fn run(options: LoadOptions) -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(options)) {
        Ok((elapsed_ms, config)) => {
            checks.push(pass("config_validation", elapsed_ms, "configuration loaded and validated"));
            config
        }
        Err((elapsed_ms, error)) => {
            checks.push(fail("config_validation", elapsed_ms, error.to_string()));
            return finalize_report(checks, started);
        }
    };

    let advisor = match timed_check(|| Advisor::from_config(&config)) {
        Ok((elapsed_ms, advisor)) => {
            checks.push(pass(
                "flow_graph",
                elapsed_ms,
                format!("{} decision nodes loaded", advisor.navigator().graph().len()),
            ));
            advisor
        }
        Err((elapsed_ms, error)) => {
            checks.push(fail("flow_graph", elapsed_ms, format!("flow graph is invalid: {error}")));
            return finalize_report(checks, started);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(fail(
                "db_connectivity",
                0,
                format!("failed to initialize async runtime: {error}"),
            ));
            return finalize_report(checks, started);
        }
    };

    let db_started = Instant::now();
    let db_result = runtime.block_on(async {
        connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
    });
    let pool = match db_result {
        Ok(pool) => {
            checks.push(pass(
                "db_connectivity",
                elapsed_since(db_started),
                format!("connected using `{}`", config.database.url),
            ));
            pool
        }
        Err(error) => {
            checks.push(fail(
                "db_connectivity",
                elapsed_since(db_started),
                format!("failed to connect: {error}"),
            ));
            return finalize_report(checks, started);
        }
    };

    let migration_started = Instant::now();
    let migration_result = runtime.block_on(async {
        let result = migrations::run_pending(&pool).await;
        pool.close().await;
        result
    });
    match migration_result {
        Ok(()) => checks.push(pass(
            "migration_visibility",
            elapsed_since(migration_started),
            "migrations are visible and executable",
        )),
        Err(error) => {
            checks.push(fail(
                "migration_visibility",
                elapsed_since(migration_started),
                format!("migration execution failed: {error}"),
            ));
            return finalize_report(checks, started);
        }
    }

    let catalog_started = Instant::now();
    let catalog = match runtime.block_on(load_catalog(&config)) {
        Ok(catalog) if catalog.is_empty() => {
            checks.push(fail(
                "catalog_load",
                elapsed_since(catalog_started),
                "catalog has no active menu items; run `mashti seed`",
            ));
            return finalize_report(checks, started);
        }
        Ok(catalog) => {
            checks.push(pass(
                "catalog_load",
                elapsed_since(catalog_started),
                format!("{} menu items enriched", catalog.len()),
            ));
            catalog
        }
        Err(error) => {
            checks.push(fail("catalog_load", elapsed_since(catalog_started), error.to_string()));
            return finalize_report(checks, started);
        }
    };

    let recommendation_started = Instant::now();
    let recommendation = advisor.recommend(catalog.items(), &PreferenceQuery::new());
    if recommendation.is_empty() {
        checks.push(fail(
            "sample_recommendation",
            elapsed_since(recommendation_started),
            "unconstrained recommendation came back empty",
        ));
    } else {
        checks.push(pass(
            "sample_recommendation",
            elapsed_since(recommendation_started),
            format!(
                "{} via {} pass: {}",
                recommendation.items.len(),
                recommendation.source.as_str(),
                recommendation.titles().join(", ")
            ),
        ));
    }

    finalize_report(checks, started)
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((elapsed_since(started), value)),
        Err(error) => Err((elapsed_since(started), error)),
    }
}

fn elapsed_since(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn pass(name: &'static str, elapsed_ms: u64, message: impl Into<String>) -> SmokeCheck {
    SmokeCheck { name, status: SmokeStatus::Pass, elapsed_ms, message: message.into() }
}

fn fail(name: &'static str, elapsed_ms: u64, message: impl Into<String>) -> SmokeCheck {
    SmokeCheck { name, status: SmokeStatus::Fail, elapsed_ms, message: message.into() }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due previous failure".to_string(),
    }
}

/// Pads the report with skipped entries for checks that never ran.
fn finalize_report(mut checks: Vec<SmokeCheck>, started: Instant) -> CommandResult {
    for name in CHECK_ORDER.iter().copied().skip(checks.len()) {
        checks.push(skipped(name));
    }

    let total_elapsed_ms = elapsed_since(started);
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::{fail, finalize_report, pass, CHECK_ORDER};

    #[test]
    fn report_pads_unrun_checks_as_skipped() {
        let result = finalize_report(
            vec![pass("config_validation", 1, "ok"), fail("flow_graph", 2, "dangling reference")],
            Instant::now(),
        );

        assert_eq!(result.exit_code, 6);
        let machine = result.output.lines().last().expect("json line");
        let report: serde_json::Value = serde_json::from_str(machine).expect("valid json");
        let checks = report["checks"].as_array().expect("checks array");
        assert_eq!(checks.len(), CHECK_ORDER.len());
        assert_eq!(checks[1]["status"], "fail");
        assert!(checks[2..].iter().all(|check| check["status"] == "skipped"));
    }
}
