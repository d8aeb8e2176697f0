//! Route configuration and setup

use crate::api_doc::get_openapi_spec;
use crate::error::error_details_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use crxup_core::ServerConfig;
use crxup_infra::{
    get_request_id, request_id_middleware, security_headers_middleware, SecurityHeaders,
};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the archive itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const DOCS_PATH: &str = "/docs";

/// Setup all application routes
pub fn setup_routes(config: &ServerConfig, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let route_prefix = state.catalog.route_prefix.clone();

    let catalog_routes = catalog_routes(config.uploads_enabled());
    let app_routes = if route_prefix.is_empty() {
        Router::new().merge(catalog_routes)
    } else {
        Router::new().nest(&route_prefix, catalog_routes)
    };

    let openapi = get_openapi_spec(&route_prefix, config.uploads_enabled());
    let body_limit = config
        .max_upload_size_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        max_upload_size_bytes = config.max_upload_size_bytes,
        request_timeout_secs = config.request_timeout_secs,
        "HTTP limits configured"
    );

    let app = app_routes
        .merge(health_routes())
        .merge(utoipa_rapidoc::RapiDoc::with_openapi(OPENAPI_JSON_PATH, openapi).path(DOCS_PATH))
        .layer(axum::middleware::from_fn_with_state(
            !config.is_production(),
            error_details_middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = get_request_id(request).unwrap_or_default();
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            SecurityHeaders::for_environment(config.is_production()),
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

/// Routes under the route prefix. Static paths take precedence over `/{filename}`.
fn catalog_routes(uploads_enabled: bool) -> Router<Arc<AppState>> {
    let router = Router::new()
        .route("/versions", get(handlers::versions::get_versions))
        .route("/update.xml", get(handlers::update_xml::get_update_xml))
        .route(
            "/update-manifest.json",
            get(handlers::update_manifest::get_update_manifest),
        )
        .route("/{filename}", get(handlers::artifact::download_artifact));

    if uploads_enabled {
        router.route("/upload", post(handlers::upload::upload_extension))
    } else {
        router
    }
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
}

/// Setup CORS configuration
fn setup_cors(config: &ServerConfig) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
