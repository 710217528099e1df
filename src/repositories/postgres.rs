// src/repositories/postgres.rs - Data access
use async_trait::async_trait;
use log::debug;
use sqlx::PgPool;

use super::{MappingRepository, Result};
use crate::db::{quote_identifier, Database};
use crate::errors::RepositoryError;
use crate::models::UrlMapping;

/// Postgres-backed store. The container is a table keyed by `short_url`.
pub struct PgMappingRepository {
    pool: PgPool,
    insert_sql: String,
    select_sql: String,
}

impl PgMappingRepository {
    pub fn new(db: &Database, container: &str) -> Self {
        let table = quote_identifier(container);

        Self {
            pool: db.get_pool().clone(),
            insert_sql: format!(
                "INSERT INTO {} (short_url, original_url) VALUES ($1, $2)",
                table
            ),
            select_sql: format!(
                "SELECT original_url FROM {} WHERE short_url = $1 LIMIT 1",
                table
            ),
        }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn put(&self, mapping: &UrlMapping) -> Result<()> {
        sqlx::query(&self.insert_sql)
            .bind(&mapping.short_url)
            .bind(&mapping.original_url)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                debug!("Insert failed for mapping '{}': {}", mapping.short_url, e);
                RepositoryError::from(e)
            })?;

        debug!("Stored mapping '{}'", mapping.short_url);
        Ok(())
    }

    async fn find_by_short_id(&self, short_url: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(&self.select_sql)
            .bind(short_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                debug!("Lookup failed for mapping '{}': {}", short_url, e);
                RepositoryError::Database(e)
            })
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
