use std::io::Error as IoError;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::models::ErrorResponse;

pub mod config;
pub mod repository;

pub use config::ConfigError;
pub use repository::RepositoryError;

/// Message shown to clients for any store failure; the detail only goes to the log.
pub const STORE_ERROR_MESSAGE: &str = "Database error";

/// Message shown when a stored URL cannot be sent as a `Location` header
pub const INVALID_REDIRECT_MESSAGE: &str = "Stored URL cannot be used as a redirect target";

#[derive(Debug, Error)]
pub enum AppError {
    // Request-level errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),
    #[error("Stored URL is not a valid redirect target: {0}")]
    InvalidRedirect(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
    #[error("Database setup error: {0}")]
    Database(String),
}

impl AppError {
    /// The message placed in the JSON error body
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Store(_) | AppError::Database(_) => STORE_ERROR_MESSAGE.to_string(),
            AppError::InvalidRedirect(_) => INVALID_REDIRECT_MESSAGE.to_string(),
            AppError::Server(_) | AppError::Config(_) | AppError::Logger(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Flatten field errors into a single client-facing string
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::InvalidInput(message)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_)
            | AppError::InvalidRedirect(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_)
            | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("{}", self);
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.client_message()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use serde_json::Value;
    use validator::Validate;

    use super::*;
    use crate::models::ShortenRequest;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_invalid_input_is_bad_request() {
        let (status, body) = body_json(AppError::InvalidInput("Invalid JSON".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Invalid JSON");
    }

    #[actix_web::test]
    async fn test_not_found() {
        let (status, body) = body_json(AppError::NotFound("URL not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "URL not found");
    }

    #[actix_web::test]
    async fn test_store_error_does_not_leak_detail() {
        let err = AppError::from(RepositoryError::Conflict(
            "duplicate key value violates unique constraint".into(),
        ));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], STORE_ERROR_MESSAGE);
        assert!(!body.to_string().contains("duplicate"));
    }

    #[actix_web::test]
    async fn test_invalid_redirect_is_json_500() {
        let (status, body) =
            body_json(AppError::InvalidRedirect("https://example.com/a\nb".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], INVALID_REDIRECT_MESSAGE);
    }

    #[test]
    fn test_validation_errors_keep_message() {
        let request = ShortenRequest { url: String::new() };
        let err = AppError::from(request.validate().unwrap_err());
        match err {
            AppError::InvalidInput(msg) => assert_eq!(msg, "Missing url parameter"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err = AppError::from(ConfigError::ParseError("bad port".into()));
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("bad port")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
