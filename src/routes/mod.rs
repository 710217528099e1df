use actix_web::{web, HttpResponse, Responder};

use crate::{
    services::ShortUrlService,
    types::{AppState, HealthStatus},
};

mod short_url;

// Handler function for the health check endpoint
async fn health_check(
    data: web::Data<AppState>,
    service: web::Data<ShortUrlService>,
) -> impl Responder {
    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        store: service.backend_name().to_string(),
        uptime_seconds: data.start_time.elapsed().as_secs(),
    };

    HttpResponse::Ok().json(status)
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
    short_url::configure_routes(cfg);
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Instant};

    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    use super::*;
    use crate::{repositories::InMemoryMappingRepository, services};

    #[actix_web::test]
    async fn test_health_check() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState {
                    start_time: Instant::now(),
                    version: "9.9.9".to_string(),
                }))
                .configure(|cfg| services::register(repo, cfg))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["version"], "9.9.9");
        assert_eq!(body["store"], "memory");
        assert!(body["uptime_seconds"].is_u64());
    }
}
