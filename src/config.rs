use std::{env, fmt, net::IpAddr, str::FromStr};

use dotenvy::dotenv;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::errors::ConfigError;

// Server-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
}

// Application-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
}

// Environment enum for different deployment environments
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

/// Which mapping store implementation backs the service
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" | "mem" => Ok(StoreBackend::Memory),
            _ => Err(format!(
                "Invalid store backend: {}. Must be one of: postgres, memory",
                s
            )),
        }
    }
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Mapping store configuration.
///
/// `database` and `container` mirror the document-store vocabulary the service
/// grew up with: on Postgres they name the database and the table.
#[derive(Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub endpoint: String,
    pub key: Option<String>,
    pub database: String,
    pub container: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub create_container_if_missing: bool,
}

// Keep the credential out of debug logs
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("endpoint", &self.endpoint)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("container", &self.container)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("create_container_if_missing", &self.create_container_if_missing)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub store: StoreConfig,
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> ConfigResult<Self> {
        match dotenv() {
            Ok(_) => debug!(".env file loaded successfully"),
            Err(e) => warn!("Could not load .env file: {}", e),
        }

        let server = ServerConfig {
            host: get_env_or_default("SERVER_HOST", "127.0.0.1")?,
            port: get_env_or_default("SERVER_PORT", "8000")?,
            workers: get_env_or_default("SERVER_WORKERS", "4")?,
        };

        let version = env!("CARGO_PKG_VERSION").to_string();

        let app = AppConfig {
            name: get_env_or_default("APP_NAME", "urlshorten")?,
            version: env::var("APP_VERSION").unwrap_or(version),
            environment: get_env_or_default("APP_ENVIRONMENT", "development")?,
            log_level: get_env_or_default("RUST_LOG", "info")?,
        };

        let store = StoreConfig {
            backend: get_env_or_default("STORE_BACKEND", "postgres")?,
            endpoint: get_env_or_default("STORE_ENDPOINT", "postgres://localhost:5432")?,
            key: get_env_optional("STORE_KEY")?,
            database: get_env_or_default("STORE_DATABASE", "UrlShortenDB")?,
            container: validate_container_name(get_env_or_default(
                "STORE_CONTAINER",
                "UrlShortenContainer",
            )?)?,
            max_connections: get_env_or_default("STORE_MAX_CONNECTIONS", "10")?,
            min_connections: get_env_or_default("STORE_MIN_CONNECTIONS", "1")?,
            connect_timeout_seconds: get_env_or_default("STORE_CONNECT_TIMEOUT_SECONDS", "5")?,
            create_container_if_missing: get_env_or_default(
                "STORE_CREATE_CONTAINER_IF_MISSING",
                "true",
            )?,
        };

        let config = Config { server, app, store };
        info!("Configuration loaded successfully");
        debug!("Loaded config: {:?}", config);

        Ok(config)
    }
}

/// Helper function to get an env variable with a default value
fn get_env_or_default<T: FromStr>(key: &str, default: &str) -> ConfigResult<T>
where
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(format!("Could not parse {}: {}", key, e))),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set, using default: {}", key, default);
            default.parse::<T>().map_err(|e| {
                ConfigError::ParseError(format!("Could not parse default for {}: {}", key, e))
            })
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}

/// Like [`get_env_or_default`] but for variables with no sensible default
fn get_env_optional(key: &str) -> ConfigResult<Option<String>> {
    match env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}

/// The container name is spliced into SQL as an identifier, so only plain
/// identifier characters are accepted (Postgres caps identifiers at 63 bytes).
pub fn validate_container_name(name: String) -> ConfigResult<String> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(name)
    } else {
        Err(ConfigError::ParseError(format!(
            "Invalid STORE_CONTAINER '{}': use 1-63 ASCII letters, digits or underscores",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_config(key: Option<&str>) -> StoreConfig {
        StoreConfig {
            backend: StoreBackend::Postgres,
            endpoint: "postgres://localhost:5432".to_string(),
            key: key.map(str::to_string),
            database: "UrlShortenDB".to_string(),
            container: "UrlShortenContainer".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 5,
            create_container_if_missing: true,
        }
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("Production".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("test".parse::<Environment>(), Ok(Environment::Testing));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("postgres".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!("PG".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("cosmos".parse::<StoreBackend>().is_err());
        assert_eq!(StoreBackend::Memory.as_str(), "memory");
    }

    #[test]
    fn test_validate_container_name() {
        assert!(validate_container_name("UrlShortenContainer".to_string()).is_ok());
        assert!(validate_container_name("url_mappings_2".to_string()).is_ok());

        assert!(validate_container_name(String::new()).is_err());
        assert!(validate_container_name("urls; DROP TABLE x".to_string()).is_err());
        assert!(validate_container_name("a\"b".to_string()).is_err());
        assert!(validate_container_name("a".repeat(64)).is_err());
    }

    #[test]
    fn test_store_config_debug_redacts_key() {
        let rendered = format!("{:?}", store_config(Some("hunter2")));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));

        let rendered = format!("{:?}", store_config(None));
        assert!(rendered.contains("key: None"));
    }

    #[test]
    fn test_get_env_or_default_uses_default_when_unset() {
        let port: u16 = get_env_or_default("URLSHORTEN_TEST_UNSET_PORT", "8123").unwrap();
        assert_eq!(port, 8123);

        let bad: ConfigResult<u16> = get_env_or_default("URLSHORTEN_TEST_UNSET_BAD", "nope");
        assert!(matches!(bad, Err(ConfigError::ParseError(_))));
    }
}
