use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mashti_core::config::{
    env_key, weight_value, AppConfig, LoadOptions, BONUS_WEIGHTS, DEFAULT_CONFIG_FILE,
    ENV_PREFIX, PENALTY_WEIGHTS,
};
use toml::Value;

pub fn run(options: LoadOptions) -> String {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let sources = SourceLookup { doc: config_file_doc.as_ref(), path: config_file_path.as_deref() };

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(sources.line("database.url", &config.database.url));
    lines.push(
        sources.line("database.max_connections", &config.database.max_connections.to_string()),
    );
    lines.push(sources.line("database.timeout_secs", &config.database.timeout_secs.to_string()));

    lines.push(sources.line("catalog.cache_ttl_secs", &config.catalog.cache_ttl_secs.to_string()));
    lines.push(sources.line("catalog.fetch_retries", &config.catalog.fetch_retries.to_string()));
    lines.push(
        sources.line("catalog.retry_backoff_ms", &config.catalog.retry_backoff_ms.to_string()),
    );

    let definition = config
        .flow
        .definition_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<embedded>".to_string());
    lines.push(sources.line("flow.definition_path", &definition));
    lines.push(
        sources.line("flow.progress_step_pct", &config.flow.progress_step_pct.to_string()),
    );

    lines.push(
        sources.line("recommender.max_results", &config.recommender.max_results.to_string()),
    );
    for name in BONUS_WEIGHTS.iter().chain(PENALTY_WEIGHTS) {
        if let Some(value) = weight_value(&config.recommender.weights, name) {
            lines.push(sources.line(&format!("recommender.{name}"), &value.to_string()));
        }
    }
    lines.push(sources.line(
        "recommender.popularity_threshold",
        &config.recommender.weights.popularity_threshold.to_string(),
    ));
    lines.push(sources.line(
        "recommender.multi_match_threshold",
        &config.recommender.weights.multi_match_threshold.to_string(),
    ));

    lines.push(sources.line_with_alias("logging.level", &config.logging.level, "MASHTI_LOG_LEVEL"));
    lines.push(sources.line_with_alias(
        "logging.format",
        config.logging.format.as_str(),
        "MASHTI_LOG_FORMAT",
    ));

    lines.join("\n")
}

struct SourceLookup<'a> {
    doc: Option<&'a Value>,
    path: Option<&'a Path>,
}

impl SourceLookup<'_> {
    fn line(&self, key_path: &str, value: &str) -> String {
        render_line(key_path, value, field_source(key_path, &[dotted_env_key(key_path)], self))
    }

    fn line_with_alias(&self, key_path: &str, value: &str, alias: &str) -> String {
        let env_keys = [dotted_env_key(key_path), alias.to_string()];
        render_line(key_path, value, field_source(key_path, &env_keys, self))
    }
}

fn dotted_env_key(key_path: &str) -> String {
    match key_path.split_once('.') {
        Some((section, key)) => env_key(section, key),
        None => format!("{ENV_PREFIX}{}", key_path.to_ascii_uppercase()),
    }
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from(DEFAULT_CONFIG_FILE);
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config").join(DEFAULT_CONFIG_FILE);
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(key_path: &str, env_keys: &[String], sources: &SourceLookup<'_>) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key.as_str()).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = sources.doc {
        if contains_path(doc, key_path) {
            let file_path = sources
                .path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
