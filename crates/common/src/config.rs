//! Application configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Uploaded file storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Catalog import configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Recommendation query configuration.
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Local storage for uploaded profile pictures.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory files are written to.
    #[serde(default = "default_storage_path")]
    pub base_path: PathBuf,
    /// URL prefix the directory is served under.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
    /// Largest accepted upload.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Catalog import configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog bundle imported at startup, if set.
    #[serde(default)]
    pub import_path: Option<PathBuf>,
    /// Prefix for relative poster paths in imported records.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

/// Recommendation query configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    /// Maximum items returned per content type.
    #[serde(default = "default_recommendation_limit")]
    pub limit: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_storage_url() -> String {
    "/uploads".to_string()
}

const fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

const fn default_recommendation_limit() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            import_path: None,
            image_base_url: default_image_base_url(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            limit: default_recommendation_limit(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `RATEIT_ENV`)
    /// 3. Environment variables with `RATEIT__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("RATEIT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("RATEIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration with defaults everywhere except the database URL.
    #[must_use]
    pub fn with_database_url(url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: url.into(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
            },
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            recommendations: RecommendationConfig::default(),
        }
    }
}
