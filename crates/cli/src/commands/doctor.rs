use mashti_core::config::{AppConfig, LoadOptions};
use mashti_core::flows::GraphStatus;
use mashti_db::{connect_with_settings, MenuItemRepository, SqlMenuItemRepository};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: LoadOptions, json_output: bool) -> String {
    let report = build_report(options);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_flow_graph(&config));
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["flow_graph", "database_connectivity", "catalog_listing"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_flow_graph(config: &AppConfig) -> DoctorCheck {
    let origin = config
        .flow
        .definition_path
        .as_ref()
        .map(|path| format!("`{}`", path.display()))
        .unwrap_or_else(|| "embedded definition".to_string());

    match GraphStatus::load(config.flow.definition_path.as_deref()) {
        GraphStatus::Ready(graph) => DoctorCheck {
            name: "flow_graph",
            status: CheckStatus::Pass,
            details: format!("{} nodes loaded from {origin}", graph.len()),
        },
        GraphStatus::Invalid(error) => DoctorCheck {
            name: "flow_graph",
            status: CheckStatus::Fail,
            details: format!("{origin} is invalid: {error}"),
        },
    }
}

fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![
                DoctorCheck {
                    name: "database_connectivity",
                    status: CheckStatus::Fail,
                    details: format!("failed to initialize async runtime: {error}"),
                },
                skipped_listing("database is unreachable"),
            ];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck {
                        name: "database_connectivity",
                        status: CheckStatus::Fail,
                        details: format!("failed to connect to database: {error}"),
                    },
                    skipped_listing("database is unreachable"),
                ];
            }
        };

        let connectivity = DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        };
        let listing = match SqlMenuItemRepository::new(pool.clone()).list_active().await {
            Ok(items) if items.is_empty() => DoctorCheck {
                name: "catalog_listing",
                status: CheckStatus::Fail,
                details: "no active menu items; run `mashti seed` or load the menu".to_string(),
            },
            Ok(items) => DoctorCheck {
                name: "catalog_listing",
                status: CheckStatus::Pass,
                details: format!("{} active menu items", items.len()),
            },
            Err(error) => DoctorCheck {
                name: "catalog_listing",
                status: CheckStatus::Fail,
                details: format!("menu listing failed (run `mashti migrate`?): {error}"),
            },
        };
        pool.close().await;

        vec![connectivity, listing]
    })
}

fn skipped_listing(reason: &str) -> DoctorCheck {
    DoctorCheck {
        name: "catalog_listing",
        status: CheckStatus::Skipped,
        details: format!("skipped because {reason}"),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
