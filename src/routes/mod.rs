//! Router assembly: per-resource CRUD routes, common routes, the OpenAPI document and the
//! HTTP layers (body limit, CORS, tracing).

pub mod common;
pub mod resource;

pub use common::common_routes;
pub use resource::resource_routes;

use crate::error::ConfigError;
use crate::model::{Animals, Consultations, Secretaries, Veterinarians};
use crate::openapi::api_doc;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// CORS for a single browser origin, credentials allowed.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = origin.parse::<HeaderValue>().map_err(|e| ConfigError::InvalidValue {
        key: "CORS_ORIGIN",
        message: e.to_string(),
    })?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

/// The full application: every resource plus health routes and docs.
pub fn app_router(state: AppState, cors_origin: &str) -> Result<Router, ConfigError> {
    let doc = Arc::new(api_doc());
    let docs = Router::new().route(
        OPENAPI_PATH,
        get(move || {
            let doc = doc.clone();
            async move { Json(doc.as_ref().clone()) }
        }),
    );

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin)?);

    Ok(Router::new()
        .merge(resource_routes::<Consultations>())
        .merge(resource_routes::<Veterinarians>())
        .merge(resource_routes::<Animals>())
        .merge(resource_routes::<Secretaries>())
        .merge(common_routes())
        .with_state(state)
        .merge(docs)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(layers))
}
