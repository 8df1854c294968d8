use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogCacheSettings;
use crate::flows::DEFAULT_PROGRESS_STEP_PCT;
use crate::recommend::{ScoringWeights, DEFAULT_WEIGHTS, MAX_RECOMMENDATIONS};

pub const DEFAULT_CONFIG_FILE: &str = "mashti.toml";
pub const ENV_PREFIX: &str = "MASHTI_";

/// Recommender weights that reward a match; must not be negative.
pub const BONUS_WEIGHTS: &[&str] = &[
    "temperature_match",
    "time_of_day_match",
    "flavor_match",
    "caffeine_match",
    "health_goal_match",
    "dietary_match",
    "popularity_bonus",
    "multi_match_bonus",
];

/// Recommender weights that punish a contradiction; must not be positive.
pub const PENALTY_WEIGHTS: &[&str] = &["temperature_mismatch", "caffeine_mismatch", "dietary_mismatch"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub flow: FlowConfig,
    pub recommender: RecommenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub cache_ttl_secs: u64,
    pub fetch_retries: u32,
    pub retry_backoff_ms: u64,
}

impl CatalogConfig {
    pub fn cache_settings(&self) -> CatalogCacheSettings {
        CatalogCacheSettings {
            ttl: Duration::from_secs(self.cache_ttl_secs),
            fetch_retries: self.fetch_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// External decision tree; the embedded one is used when unset.
    pub definition_path: Option<PathBuf>,
    pub progress_step_pct: u8,
}

#[derive(Clone, Debug)]
pub struct RecommenderConfig {
    pub max_results: usize,
    pub weights: ScoringWeights,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub flow_definition_path: Option<PathBuf>,
    pub recommender_max_results: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://mashti.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            catalog: CatalogConfig { cache_ttl_secs: 300, fetch_retries: 2, retry_backoff_ms: 100 },
            flow: FlowConfig { definition_path: None, progress_step_pct: DEFAULT_PROGRESS_STEP_PCT },
            recommender: RecommenderConfig {
                max_results: MAX_RECOMMENDATIONS,
                weights: DEFAULT_WEIGHTS,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

/// Current value of a named signed recommender weight.
pub fn weight_value(weights: &ScoringWeights, name: &str) -> Option<i32> {
    let value = match name {
        "temperature_match" => weights.temperature_match,
        "temperature_mismatch" => weights.temperature_mismatch,
        "time_of_day_match" => weights.time_of_day_match,
        "flavor_match" => weights.flavor_match,
        "caffeine_match" => weights.caffeine_match,
        "caffeine_mismatch" => weights.caffeine_mismatch,
        "health_goal_match" => weights.health_goal_match,
        "dietary_match" => weights.dietary_match,
        "dietary_mismatch" => weights.dietary_mismatch,
        "popularity_bonus" => weights.popularity_bonus,
        "multi_match_bonus" => weights.multi_match_bonus,
        _ => return None,
    };
    Some(value)
}

fn weight_slot<'a>(weights: &'a mut ScoringWeights, name: &str) -> Option<&'a mut i32> {
    let slot = match name {
        "temperature_match" => &mut weights.temperature_match,
        "temperature_mismatch" => &mut weights.temperature_mismatch,
        "time_of_day_match" => &mut weights.time_of_day_match,
        "flavor_match" => &mut weights.flavor_match,
        "caffeine_match" => &mut weights.caffeine_match,
        "caffeine_mismatch" => &mut weights.caffeine_mismatch,
        "health_goal_match" => &mut weights.health_goal_match,
        "dietary_match" => &mut weights.dietary_match,
        "dietary_mismatch" => &mut weights.dietary_mismatch,
        "popularity_bonus" => &mut weights.popularity_bonus,
        "multi_match_bonus" => &mut weights.multi_match_bonus,
        _ => return None,
    };
    Some(slot)
}

/// `MASHTI_SECTION_KEY` for a dotted `section.key`.
pub fn env_key(section: &str, key: &str) -> String {
    format!("{ENV_PREFIX}{}_{}", section.to_ascii_uppercase(), key.to_ascii_uppercase())
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(cache_ttl_secs) = catalog.cache_ttl_secs {
                self.catalog.cache_ttl_secs = cache_ttl_secs;
            }
            if let Some(fetch_retries) = catalog.fetch_retries {
                self.catalog.fetch_retries = fetch_retries;
            }
            if let Some(retry_backoff_ms) = catalog.retry_backoff_ms {
                self.catalog.retry_backoff_ms = retry_backoff_ms;
            }
        }

        if let Some(flow) = patch.flow {
            if let Some(definition_path) = flow.definition_path {
                self.flow.definition_path = Some(definition_path);
            }
            if let Some(progress_step_pct) = flow.progress_step_pct {
                self.flow.progress_step_pct = progress_step_pct;
            }
        }

        if let Some(recommender) = patch.recommender {
            recommender.apply(&mut self.recommender);
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MASHTI_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("MASHTI_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("MASHTI_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("MASHTI_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("MASHTI_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("MASHTI_CATALOG_CACHE_TTL_SECS") {
            self.catalog.cache_ttl_secs = parse_u64("MASHTI_CATALOG_CACHE_TTL_SECS", &value)?;
        }
        if let Some(value) = read_env("MASHTI_CATALOG_FETCH_RETRIES") {
            self.catalog.fetch_retries = parse_u32("MASHTI_CATALOG_FETCH_RETRIES", &value)?;
        }
        if let Some(value) = read_env("MASHTI_CATALOG_RETRY_BACKOFF_MS") {
            self.catalog.retry_backoff_ms = parse_u64("MASHTI_CATALOG_RETRY_BACKOFF_MS", &value)?;
        }

        if let Some(value) = read_env("MASHTI_FLOW_DEFINITION_PATH") {
            self.flow.definition_path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("MASHTI_FLOW_PROGRESS_STEP_PCT") {
            self.flow.progress_step_pct = parse_u8("MASHTI_FLOW_PROGRESS_STEP_PCT", &value)?;
        }

        if let Some(value) = read_env("MASHTI_RECOMMENDER_MAX_RESULTS") {
            self.recommender.max_results = parse_usize("MASHTI_RECOMMENDER_MAX_RESULTS", &value)?;
        }
        for name in BONUS_WEIGHTS.iter().chain(PENALTY_WEIGHTS) {
            let key = env_key("recommender", name);
            if let Some(value) = read_env(&key) {
                let parsed = parse_i32(&key, &value)?;
                if let Some(slot) = weight_slot(&mut self.recommender.weights, name) {
                    *slot = parsed;
                }
            }
        }
        if let Some(value) = read_env("MASHTI_RECOMMENDER_POPULARITY_THRESHOLD") {
            self.recommender.weights.popularity_threshold =
                parse_u8("MASHTI_RECOMMENDER_POPULARITY_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("MASHTI_RECOMMENDER_MULTI_MATCH_THRESHOLD") {
            self.recommender.weights.multi_match_threshold =
                parse_u32("MASHTI_RECOMMENDER_MULTI_MATCH_THRESHOLD", &value)?;
        }

        let log_level = read_env("MASHTI_LOGGING_LEVEL").or_else(|| read_env("MASHTI_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MASHTI_LOGGING_FORMAT").or_else(|| read_env("MASHTI_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(definition_path) = overrides.flow_definition_path {
            self.flow.definition_path = Some(definition_path);
        }
        if let Some(max_results) = overrides.recommender_max_results {
            self.recommender.max_results = max_results;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_catalog(&self.catalog)?;
        validate_flow(&self.flow)?;
        validate_recommender(&self.recommender)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.cache_ttl_secs > 86_400 {
        return Err(ConfigError::Validation(
            "catalog.cache_ttl_secs must be at most 86400 (one day)".to_string(),
        ));
    }
    if catalog.fetch_retries > 10 {
        return Err(ConfigError::Validation(
            "catalog.fetch_retries must be in range 0..=10".to_string(),
        ));
    }
    if catalog.retry_backoff_ms > 60_000 {
        return Err(ConfigError::Validation(
            "catalog.retry_backoff_ms must be at most 60000".to_string(),
        ));
    }
    Ok(())
}

fn validate_flow(flow: &FlowConfig) -> Result<(), ConfigError> {
    if flow.progress_step_pct == 0 || flow.progress_step_pct > 100 {
        return Err(ConfigError::Validation(
            "flow.progress_step_pct must be in range 1..=100".to_string(),
        ));
    }
    if let Some(path) = &flow.definition_path {
        if !path.exists() {
            return Err(ConfigError::Validation(format!(
                "flow.definition_path `{}` does not exist; remove it to use the built-in decision tree",
                path.display()
            )));
        }
    }
    Ok(())
}

fn validate_recommender(recommender: &RecommenderConfig) -> Result<(), ConfigError> {
    if recommender.max_results == 0 || recommender.max_results > MAX_RECOMMENDATIONS {
        return Err(ConfigError::Validation(format!(
            "recommender.max_results must be in range 1..={MAX_RECOMMENDATIONS}"
        )));
    }

    let weights = &recommender.weights;
    for name in BONUS_WEIGHTS {
        if weight_value(weights, name).is_some_and(|value| value < 0) {
            return Err(ConfigError::Validation(format!(
                "recommender.{name} is a bonus and must not be negative"
            )));
        }
    }
    for name in PENALTY_WEIGHTS {
        if weight_value(weights, name).is_some_and(|value| value > 0) {
            return Err(ConfigError::Validation(format!(
                "recommender.{name} is a penalty and must be zero or negative"
            )));
        }
    }

    if weights.popularity_threshold == 0 || weights.popularity_threshold > 10 {
        return Err(ConfigError::Validation(
            "recommender.popularity_threshold must be in range 1..=10".to_string(),
        ));
    }
    if weights.multi_match_threshold == 0 {
        return Err(ConfigError::Validation(
            "recommender.multi_match_threshold must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value.trim().parse::<u8>().map_err(|_| invalid_override(key, value))
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| invalid_override(key, value))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| invalid_override(key, value))
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| invalid_override(key, value))
}

fn parse_i32(key: &str, value: &str) -> Result<i32, ConfigError> {
    value.trim().parse::<i32>().map_err(|_| invalid_override(key, value))
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    catalog: Option<CatalogPatch>,
    flow: Option<FlowPatch>,
    recommender: Option<RecommenderPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    cache_ttl_secs: Option<u64>,
    fetch_retries: Option<u32>,
    retry_backoff_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FlowPatch {
    definition_path: Option<PathBuf>,
    progress_step_pct: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecommenderPatch {
    max_results: Option<usize>,
    temperature_match: Option<i32>,
    temperature_mismatch: Option<i32>,
    time_of_day_match: Option<i32>,
    flavor_match: Option<i32>,
    caffeine_match: Option<i32>,
    caffeine_mismatch: Option<i32>,
    health_goal_match: Option<i32>,
    dietary_match: Option<i32>,
    dietary_mismatch: Option<i32>,
    popularity_bonus: Option<i32>,
    popularity_threshold: Option<u8>,
    multi_match_bonus: Option<i32>,
    multi_match_threshold: Option<u32>,
}

impl RecommenderPatch {
    fn apply(self, config: &mut RecommenderConfig) {
        if let Some(max_results) = self.max_results {
            config.max_results = max_results;
        }

        let weights = &mut config.weights;
        let signed = [
            (self.temperature_match, &mut weights.temperature_match),
            (self.temperature_mismatch, &mut weights.temperature_mismatch),
            (self.time_of_day_match, &mut weights.time_of_day_match),
            (self.flavor_match, &mut weights.flavor_match),
            (self.caffeine_match, &mut weights.caffeine_match),
            (self.caffeine_mismatch, &mut weights.caffeine_mismatch),
            (self.health_goal_match, &mut weights.health_goal_match),
            (self.dietary_match, &mut weights.dietary_match),
            (self.dietary_mismatch, &mut weights.dietary_mismatch),
            (self.popularity_bonus, &mut weights.popularity_bonus),
            (self.multi_match_bonus, &mut weights.multi_match_bonus),
        ];
        for (value, slot) in signed {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if let Some(popularity_threshold) = self.popularity_threshold {
            weights.popularity_threshold = popularity_threshold;
        }
        if let Some(multi_match_threshold) = self.multi_match_threshold {
            weights.multi_match_threshold = multi_match_threshold;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{env_key, AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::recommend::DEFAULT_WEIGHTS;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    fn write_config(dir: &TempDir, body: &str) -> Result<std::path::PathBuf, String> {
        let path = dir.path().join("mashti.toml");
        fs::write(&path, body).map_err(|err| err.to_string())?;
        Ok(path)
    }

    #[test]
    fn defaults_preserve_fallback_weights() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.recommender.weights == DEFAULT_WEIGHTS, "default weights should be kept")?;
        ensure(config.recommender.max_results == 3, "default max results should be three")?;
        ensure(config.catalog.cache_ttl_secs == 300, "default cache ttl should be 300s")?;
        ensure(config.flow.progress_step_pct == 20, "default progress step should be 20")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_MASHTI_DB_PATH", "/tmp/interpolated.db");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = write_config(
                &dir,
                r#"
[database]
url = "sqlite://${TEST_MASHTI_DB_PATH}"
"#,
            )?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite:///tmp/interpolated.db",
                "database url should be interpolated from environment",
            )
        })();

        clear_vars(&["TEST_MASHTI_DB_PATH"]);
        result
    }

    #[test]
    fn recommender_weights_load_from_file_and_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let caffeine_key = env_key("recommender", "caffeine_match");
        env::set_var(&caffeine_key, "9");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = write_config(
                &dir,
                r#"
[recommender]
max_results = 2
temperature_match = 12
caffeine_match = 1
dietary_mismatch = -20
popularity_threshold = 9
"#,
            )?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;
            let weights = config.recommender.weights;

            ensure(config.recommender.max_results == 2, "max results should come from file")?;
            ensure(weights.temperature_match == 12, "temperature weight should come from file")?;
            ensure(weights.caffeine_match == 9, "env weight should win over file")?;
            ensure(weights.dietary_mismatch == -20, "penalty should come from file")?;
            ensure(weights.popularity_threshold == 9, "threshold should come from file")?;
            ensure(weights.flavor_match == 8, "untouched weights keep defaults")
        })();

        clear_vars(&[&caffeine_key]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MASHTI_LOG_LEVEL", "warn");
        env::set_var("MASHTI_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env var",
            )
        })();

        clear_vars(&["MASHTI_LOG_LEVEL", "MASHTI_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MASHTI_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("MASHTI_CATALOG_FETCH_RETRIES", "4");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = write_config(
                &dir,
                r#"
[database]
url = "sqlite://from-file.db"

[catalog]
fetch_retries = 1
cache_ttl_secs = 60

[logging]
level = "warn"
"#,
            )?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.catalog.fetch_retries == 4, "env retries should win over file")?;
            ensure(config.catalog.cache_ttl_secs == 60, "file ttl should win over default")
        })();

        clear_vars(&["MASHTI_DATABASE_URL", "MASHTI_CATALOG_FETCH_RETRIES"]);
        result
    }

    #[test]
    fn positive_penalty_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MASHTI_RECOMMENDER_CAFFEINE_MISMATCH", "3");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("recommender.caffeine_mismatch")
            );
            ensure(has_message, "validation failure should name the offending weight")
        })();

        clear_vars(&["MASHTI_RECOMMENDER_CAFFEINE_MISMATCH"]);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MASHTI_FLOW_PROGRESS_STEP_PCT", "lots");

        let result = (|| -> Result<(), String> {
            let error = AppConfig::load(LoadOptions::default())
                .err()
                .ok_or_else(|| "expected invalid override".to_string())?;
            ensure(
                matches!(error, ConfigError::InvalidEnvOverride { ref key, .. } if key == "MASHTI_FLOW_PROGRESS_STEP_PCT"),
                "error should name the env var",
            )
        })();

        clear_vars(&["MASHTI_FLOW_PROGRESS_STEP_PCT"]);
        result
    }

    #[test]
    fn missing_flow_definition_and_unknown_keys_are_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let missing_flow = dir.path().join("absent-flow.json");
        let error = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                flow_definition_path: Some(missing_flow),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .err()
        .ok_or_else(|| "expected missing flow definition to fail".to_string())?;
        ensure(
            matches!(error, ConfigError::Validation(ref message) if message.contains("flow.definition_path")),
            "validation should mention flow.definition_path",
        )?;

        let path = write_config(&dir, "[recommender]\ntemprature_match = 4\n")?;
        let error =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .err()
                .ok_or_else(|| "expected unknown key to fail".to_string())?;
        ensure(matches!(error, ConfigError::ParseFile { .. }), "typo should be a parse error")
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let error = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("nope.toml")),
            require_file: true,
            ..LoadOptions::default()
        })
        .err()
        .ok_or_else(|| "expected missing file error".to_string())?;

        ensure(matches!(error, ConfigError::MissingConfigFile(_)), "missing file should be reported")
    }
}
