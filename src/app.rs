use std::{sync::Arc, time::Instant};

use actix_cors::Cors;
use actix_web::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware::Logger,
    web, App, HttpServer,
};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, Environment, StoreBackend},
    db::Database,
    errors::AppError,
    middleware::RequestLogger,
    repositories::{InMemoryMappingRepository, MappingRepository, PgMappingRepository},
    routes, services,
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> AppResult<()> {
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

// Preflight policy matching the headers redirect responses carry
fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![CONTENT_TYPE, AUTHORIZATION])
}

/// Open the configured mapping store. The Postgres handle is returned too so
/// the pool can be closed on shutdown.
async fn open_store(
    config: &Config,
) -> AppResult<(Arc<dyn MappingRepository>, Option<Database>)> {
    debug!("Opening {} store", config.store.backend.as_str());

    match config.store.backend {
        StoreBackend::Postgres => {
            let db = Database::connect(&config.store)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            let repository = PgMappingRepository::new(&db, &config.store.container);
            Ok((Arc::new(repository), Some(db)))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; mappings will not survive a restart");
            Ok((Arc::new(InMemoryMappingRepository::new()), None))
        }
    }
}

pub async fn server() -> AppResult<()> {
    let config = Config::load()?;

    setup_logging(&config)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Full configuration: {:?}", config);
    }

    let (repository, database) = open_store(&config).await?;
    info!(
        "Mapping store: {} (database '{}', container '{}')",
        repository.backend_name(),
        config.store.database,
        config.store.container
    );

    let enable_debug_logging = config.app.environment != Environment::Production;

    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T"
    } else {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\""
    };

    let version = config.app.version.clone();

    HttpServer::new(move || {
        let repository = Arc::clone(&repository);

        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                version: version.clone(),
            }))
            .configure(|cfg| services::register(repository, cfg))
            .wrap(cors())
            .wrap(Logger::new(log_format))
            .wrap(RequestLogger::new(enable_debug_logging))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    if let Some(db) = database {
        db.shutdown().await;
    }

    Ok(())
}
