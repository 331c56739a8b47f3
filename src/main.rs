mod config;
mod core;
mod error;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::error::{JsonPayloadError, QueryPayloadError, ResponseError};
use actix_web::{http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Settings;
use crate::core::{NearbyQueryService, ProximityIndex, ReportLifecycle, ScanIndex, UserIndexRefresher};
use crate::routes::AppState;
use crate::services::{PostgresClient, ReportStore};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt().with_target(false).with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting PetConnect geo engine...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize PostgreSQL-backed collaborators
    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!("PostgreSQL client initialized");

    // Seed the proximity indexes from the committed population
    let user_index = Arc::new(ScanIndex::new());
    let report_index = Arc::new(ScanIndex::new());

    let refresher = Arc::new(UserIndexRefresher::new(
        postgres.clone(),
        user_index.clone(),
        Duration::from_secs(settings.engine.user_refresh_secs),
    ));
    let user_count = refresher.refresh_once().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load users: {}", e);
        panic!("Index seeding error: {}", e);
    });

    let reports = postgres.list_active().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load reports: {}", e);
        panic!("Index seeding error: {}", e);
    });
    for report in &reports {
        report_index.upsert(report.summary());
    }

    info!(
        "Proximity indexes seeded ({} users, {} active reports)",
        user_count,
        reports.len()
    );

    // User location changes and deletions arrive only through the
    // directory; keep the index in step with it.
    tokio::spawn(refresher.clone().run());

    // Wire the engine
    let nearby = Arc::new(NearbyQueryService::new(
        user_index.clone(),
        report_index.clone(),
        settings.engine.circuity_factor,
    ));

    let lifecycle = Arc::new(ReportLifecycle::new(
        postgres.clone(),
        postgres.clone(),
        postgres.clone(),
        postgres.clone(),
        user_index,
        report_index,
        settings.engine.correlation_radius_km,
        settings.engine.fanout_radius_km,
    ));

    info!(
        "Engine initialized (correlation {} km, fan-out {} km, circuity {}x)",
        settings.engine.correlation_radius_km,
        settings.engine.fanout_radius_km,
        settings.engine.circuity_factor
    );

    // Build application state
    let app_state = AppState {
        directory: postgres.clone(),
        lifecycle,
        nearby,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
