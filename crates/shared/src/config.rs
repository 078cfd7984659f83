//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Artifact storage configuration.
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    /// Report engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// Artifact storage configuration.
///
/// Generated documents are written below `root`, under the `etats/pdfs/`
/// and `etats/excels/` prefixes.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Storage backend: "fs" (default) or "s3".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root directory (fs) or bucket name (s3).
    #[serde(default = "default_root")]
    pub root: String,
    /// S3 endpoint, when provider is "s3".
    #[serde(default)]
    pub endpoint: Option<String>,
    /// S3 region, when provider is "s3".
    #[serde(default)]
    pub region: Option<String>,
}

fn default_provider() -> String {
    "fs".to_string()
}

fn default_root() -> String {
    "./var/artifacts".to_string()
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            root: default_root(),
            endpoint: None,
            region: None,
        }
    }
}

/// Report engine tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of rows returned by the preview endpoint.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_preview_rows() -> usize {
    50
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TRESOR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
