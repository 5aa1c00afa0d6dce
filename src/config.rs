use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Connection string for the record store. SQLite and Postgres URLs
    /// are accepted; `DATABASE_URL` in the environment takes precedence.
    pub database_url: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/zooda.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Mounts the unauthenticated `/test/*` seed/inspect/clear routes.
    /// Leave off in any deployment that untrusted clients can reach.
    pub development_mode: bool,

    /// Record one `api_usage` row per request.
    pub track_usage: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_allowed_origins: vec!["*".to_string()],
            development_mode: false,
            track_usage: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                let config = Self::load_from_path(path)?;
                return Ok(config.resolve_environment());
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default().resolve_environment())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply `DATABASE_URL` (when set) and the scheme compatibility rewrite.
    #[must_use]
    fn resolve_environment(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.general.database_url = url;
        }
        self.general.database_url = normalize_database_url(&self.general.database_url);
        self
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("zooda").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".zooda").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.general.database_url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.general.max_db_connections == 0 {
            anyhow::bail!("Database pool must allow at least one connection");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("Minimum database connections cannot exceed the maximum");
        }

        Ok(())
    }
}

/// Rewrites the obsolete `postgresql://` scheme prefix to the `postgres://`
/// form the driver accepts. Hosted databases still hand out both spellings.
fn normalize_database_url(url: &str) -> String {
    url.strip_prefix("postgresql://")
        .map_or_else(|| url.to_string(), |rest| format!("postgres://{rest}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.database_url, "sqlite:data/zooda.db");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.cors_allowed_origins, vec!["*".to_string()]);
        assert!(!config.server.development_mode);
        assert!(!config.server.track_usage);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [server]
            port = 9000
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.port, 9000);

        assert_eq!(config.general.database_url, "sqlite:data/zooda.db");
    }

    #[test]
    fn test_postgres_scheme_rewrite() {
        assert_eq!(
            normalize_database_url("postgresql://user:pw@host/db"),
            "postgres://user:pw@host/db"
        );
        assert_eq!(
            normalize_database_url("postgres://user:pw@host/db"),
            "postgres://user:pw@host/db"
        );
        assert_eq!(
            normalize_database_url("sqlite:data/zooda.db"),
            "sqlite:data/zooda.db"
        );
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let mut config = Config::default();
        config.general.max_db_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_min_above_max() {
        let mut config = Config::default();
        config.general.min_db_connections = 10;
        config.general.max_db_connections = 5;
        assert!(config.validate().is_err());
    }
}
