use std::{str::FromStr, time::Duration};

use log::{debug, info, warn};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use thiserror::Error;

use crate::config::StoreConfig;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Failed to create container: {0}")]
    ContainerCreationFailed(String),
}

pub type DbResult<T> = Result<T, DatabaseError>;

/// Represents an established database connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new connection pool from the store configuration
    pub async fn connect(config: &StoreConfig) -> DbResult<Self> {
        info!("Initializing database connection");
        debug!(
            "Database configuration: database={}, max_conn={}, min_conn={}, timeout={}s",
            config.database,
            config.max_connections,
            config.min_connections,
            config.connect_timeout_seconds
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_with(connect_options(config)?)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                DatabaseError::ConnectionError(e)
            })?;

        info!("Successfully connected to database '{}'", config.database);

        if config.create_container_if_missing {
            Self::ensure_container_exists(&pool, &config.container).await?;
        }

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the mapping table if it is not there yet
    async fn ensure_container_exists(pool: &PgPool, container: &str) -> DbResult<()> {
        debug!("Ensuring container '{}' exists", container);

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                short_url TEXT PRIMARY KEY,
                original_url TEXT NOT NULL
            )",
            quote_identifier(container)
        );

        sqlx::query(&ddl).execute(pool).await.map_err(|e| {
            DatabaseError::ContainerCreationFailed(format!(
                "Failed to create container '{}': {}",
                container, e
            ))
        })?;

        info!("Container '{}' is ready", container);
        Ok(())
    }

    /// Gracefully close the database connection pool
    pub async fn shutdown(&self) {
        info!("Shutting down database connection pool...");

        let used_connections = self.pool.size();
        let idle_connections = self.pool.num_idle();

        self.pool.close().await;

        info!(
            "Database connection pool successfully closed. Stats: {} active, {} idle connections released",
            used_connections, idle_connections
        );
    }
}

/// Build connect options from the endpoint, overriding credential and database
fn connect_options(config: &StoreConfig) -> DbResult<PgConnectOptions> {
    let mut options = PgConnectOptions::from_str(&config.endpoint)?.database(&config.database);

    if let Some(key) = &config.key {
        options = options.password(key);
    }

    Ok(options)
}

/// Quote a table name for use in SQL text.
///
/// Names are restricted at config load; doubling embedded quotes keeps this
/// safe for any input regardless.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
