//! Configuration for isp-portal-service.

use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::str::FromStr;

/// Where the portal keeps its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown storage backend '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<Secret<String>>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Send the session cookie only over HTTPS.
    pub secure_cookie: bool,
    pub inactivity_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub common: CoreConfig,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

impl PortalConfig {
    /// Load core settings (`APP__*`) and portal settings (`PORTAL_*`).
    pub fn from_env() -> Result<Self, AppError> {
        let common = CoreConfig::load()?;
        Self::from_vars(common, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_vars(
        common: CoreConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match var("PORTAL_STORAGE") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::Postgres,
        };

        let database_url = var("PORTAL_DATABASE_URL").map(Secret::new);
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORTAL_DATABASE_URL must be set for the postgres storage backend"
            )));
        }

        let secure_default = common.is_production();

        Ok(Self {
            service_name: var("PORTAL_SERVICE_NAME")
                .unwrap_or_else(|| "isp-portal-service".to_string()),
            service_version: var("PORTAL_SERVICE_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            log_level: var("PORTAL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: var("PORTAL_OTLP_ENDPOINT"),
            storage,
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_var(&var, "PORTAL_DB_MAX_CONNECTIONS", 10)?,
                min_connections: parse_var(&var, "PORTAL_DB_MIN_CONNECTIONS", 1)?,
            },
            session: SessionConfig {
                secure_cookie: parse_var(&var, "PORTAL_SESSION_SECURE", secure_default)?,
                inactivity_minutes: parse_var(&var, "PORTAL_SESSION_INACTIVITY_MINUTES", 60)?,
            },
            common,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<PortalConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PortalConfig::from_vars(CoreConfig::default(), move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        let config = load(&[("PORTAL_STORAGE", "memory")]).unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.service_name, "isp-portal-service");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.session.inactivity_minutes, 60);
        assert!(!config.session.secure_cookie);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = load(&[]).unwrap_err();
        assert_eq!(err.kind(), "config");

        let config = load(&[
            ("PORTAL_DATABASE_URL", "postgres://portal@localhost/portal"),
            ("PORTAL_DB_MAX_CONNECTIONS", "20"),
        ])
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(
            config.database.url.unwrap().expose_secret(),
            "postgres://portal@localhost/portal"
        );
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(load(&[("PORTAL_STORAGE", "redis")]).is_err());
        assert!(load(&[
            ("PORTAL_STORAGE", "memory"),
            ("PORTAL_SESSION_INACTIVITY_MINUTES", "soon"),
        ])
        .is_err());
    }

    #[test]
    fn test_database_url_is_not_printed() {
        let config = load(&[("PORTAL_DATABASE_URL", "postgres://user:hunter2@db/portal")]).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
