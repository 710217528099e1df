// src/services/short_url.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use validator::Validate;

use crate::errors::AppError;
use crate::models::{ShortenRequest, UrlMapping};
use crate::repositories::MappingRepository;
use crate::types::Result;
use crate::utils::id_generator::{generate_short_id, DEFAULT_SHORT_ID_LENGTH};

pub const URL_NOT_FOUND: &str = "URL not found";

#[async_trait]
pub trait ShortUrlServiceTrait {
    /// Stores `request.url` under a freshly generated short id and returns the id
    async fn create(&self, request: ShortenRequest) -> Result<String>;

    /// Returns the original URL stored under `short_url`
    async fn resolve(&self, short_url: &str) -> Result<String>;
}

pub struct ShortUrlService {
    repository: Arc<dyn MappingRepository>,
}

impl ShortUrlService {
    pub fn new(repository: Arc<dyn MappingRepository>) -> Self {
        Self { repository }
    }

    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }
}

#[async_trait]
impl ShortUrlServiceTrait for ShortUrlService {
    async fn create(&self, request: ShortenRequest) -> Result<String> {
        request.validate()?;

        // One attempt only: a colliding id surfaces as a store error
        let short_url = generate_short_id(DEFAULT_SHORT_ID_LENGTH);
        let mapping = UrlMapping::new(short_url, request.url);

        self.repository.put(&mapping).await?;

        info!("Created short URL '{}'", mapping.short_url);
        Ok(mapping.short_url)
    }

    async fn resolve(&self, short_url: &str) -> Result<String> {
        debug!("Resolving short URL '{}'", short_url);

        self.repository
            .find_by_short_id(short_url)
            .await?
            .ok_or_else(|| AppError::NotFound(URL_NOT_FOUND.to_string()))
    }
}
