pub mod config;
pub mod doctor;
pub mod enrich;
pub mod migrate;
pub mod recommend;
pub mod seed;
pub mod smoke;
pub mod walk;

use std::sync::Arc;

use mashti_core::catalog::{CatalogCache, EnrichedCatalog};
use mashti_core::config::{AppConfig, LoadOptions};
use mashti_core::errors::{ApplicationError, InterfaceError};
use mashti_db::{connect_with_settings, migrations, SqlMenuItemRepository};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    /// Success payload carrying a structured `data` field.
    pub fn success_with(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => {
                let payload = CommandOutcome {
                    command: command.to_string(),
                    status: "ok".to_string(),
                    error_class: None,
                    message: message.into(),
                    data: Some(data),
                };
                Self { exit_code: 0, output: serialize_payload(payload) }
            }
            Err(error) => Self::failure(command, "serialization", error.to_string(), 8),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure payload for an engine error, mapped through the interface layer.
    pub fn from_application_error(command: &str, error: ApplicationError) -> Self {
        let detail = error.to_string();
        let interface = error.into_interface(command);
        let (error_class, exit_code) = match interface {
            InterfaceError::BadRequest { .. } => ("bad_request", 7),
            InterfaceError::ServiceUnavailable { .. } => ("service_unavailable", 4),
            InterfaceError::Internal { .. } => ("internal", 8),
        };
        Self::failure(
            command,
            error_class,
            format!("{} ({detail})", interface.user_message()),
            exit_code,
        )
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(command: &str, options: LoadOptions) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn build_runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

/// Connects, applies pending migrations and loads the enriched catalog
/// through the cache the engine reads from.
pub(crate) async fn load_catalog(
    config: &AppConfig,
) -> Result<Arc<EnrichedCatalog>, ApplicationError> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ApplicationError::Persistence(format!("failed to connect: {error}")))?;
    if let Err(error) = migrations::run_pending(&pool).await {
        pool.close().await;
        return Err(ApplicationError::Persistence(format!("migration failed: {error}")));
    }

    let cache = CatalogCache::new(
        SqlMenuItemRepository::new(pool.clone()),
        config.catalog.cache_settings(),
    );
    let catalog = cache.get().await;
    pool.close().await;
    Ok(catalog?)
}
