pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;

use axum::{
    extract::DefaultBodyLimit,
    http::{Method, Request},
    middleware::from_fn,
    routing::get,
    Router,
};
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use tower_http::{
    cors::{AllowHeaders, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::services::{MongoDb, RecordRepository};

pub use startup::Application;

/// Largest JSON body accepted on any route.
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: MongoDb,
    pub repository: RecordRepository,
}

impl AppState {
    pub fn new(db: MongoDb) -> Self {
        let repository = RecordRepository::new(&db);
        Self { db, repository }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(handlers::records::router())
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outside the trace layer so the span sees a generated id too
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer())
        .with_state(state)
}

/// Any origin, the usual CRUD verbs, and whatever headers the preflight asks for.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}
