use actix_web::{
    http::header::{
        HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
        ACCESS_CONTROL_ALLOW_ORIGIN, LOCATION,
    },
    web, HttpRequest, HttpResponse, Responder,
};
use log::{debug, info};
use serde_json::Value;

use crate::{
    errors::AppError,
    models::{RedirectResponse, ShortenRequest, ShortenResponse},
    services::{ShortUrlService, ShortUrlServiceTrait},
    types::Result,
};

pub const INVALID_JSON: &str = "Invalid JSON";
pub const MISSING_SHORT_URL: &str = "Missing short_url parameter";

pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Create short URL route handler
///
/// The body is taken raw so that an unparseable payload and a missing `url`
/// are reported differently.
pub async fn create_handler(
    body: web::Bytes,
    service: web::Data<ShortUrlService>,
) -> Result<impl Responder> {
    let request = parse_shorten_request(&body)?;
    let short_url = service.create(request).await?;

    Ok(HttpResponse::Ok().json(ShortenResponse::success(short_url)))
}

/// Redirect route handler
pub async fn redirect_handler(
    req: HttpRequest,
    service: web::Data<ShortUrlService>,
) -> Result<impl Responder> {
    let short_url = req
        .match_info()
        .get("short_url")
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::InvalidInput(MISSING_SHORT_URL.to_string()))?;
    debug!("Redirect requested for code: {}", short_url);

    let original_url = service.resolve(short_url).await?;

    // URLs are stored verbatim, so one may hold bytes a header cannot carry
    let location = HeaderValue::try_from(original_url.as_str()).map_err(|e| {
        AppError::InvalidRedirect(format!("{:?} for code '{}': {}", original_url, short_url, e))
    })?;

    info!("Redirecting '{}' to '{}'", short_url, original_url);

    Ok(HttpResponse::PermanentRedirect()
        .insert_header((LOCATION, location))
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS))
        .insert_header((ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS))
        .json(RedirectResponse::redirecting(original_url)))
}

/// Pull `url` out of a raw create body.
///
/// An empty body, a non-object document, or a `url` that is absent or not a
/// string all yield an empty request, which fails validation downstream.
fn parse_shorten_request(body: &[u8]) -> Result<ShortenRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ShortenRequest::default());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!("Rejecting unparseable body: {}", e);
        AppError::InvalidInput(INVALID_JSON.to_string())
    })?;

    let url = value
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ShortenRequest { url })
}
