// src/models/url_mapping.rs - Pure data structures
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A persisted (short_url, original_url) pair.
///
/// Mappings are write-once: there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UrlMapping {
    /// The generated short id, also the store's primary key
    pub short_url: String,

    /// The target URL exactly as the client sent it
    pub original_url: String,
}

impl UrlMapping {
    pub fn new(short_url: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            short_url: short_url.into(),
            original_url: original_url.into(),
        }
    }
}

// Body of POST /api/shorten once the raw JSON has been picked apart
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, message = "Missing url parameter"))]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub status: String,
    pub short_url: String,
}

impl ShortenResponse {
    pub fn success(short_url: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            short_url: short_url.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub status: String,
    pub url: String,
}

impl RedirectResponse {
    pub fn redirecting(url: impl Into<String>) -> Self {
        Self {
            status: "redirecting".to_string(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_shorten_request_validation() {
        let ok = ShortenRequest { url: "https://example.com".into() };
        assert!(ok.validate().is_ok());

        // No URL validation beyond presence
        let odd = ShortenRequest { url: "not a url".into() };
        assert!(odd.validate().is_ok());

        assert!(ShortenRequest::default().validate().is_err());
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(
            serde_json::to_value(ShortenResponse::success("aB3dE5gH")).unwrap(),
            json!({"status": "success", "short_url": "aB3dE5gH"})
        );
        assert_eq!(
            serde_json::to_value(RedirectResponse::redirecting("https://example.com")).unwrap(),
            json!({"status": "redirecting", "url": "https://example.com"})
        );
        assert_eq!(
            serde_json::to_value(ErrorResponse::new("URL not found")).unwrap(),
            json!({"status": "error", "message": "URL not found"})
        );
    }
}
