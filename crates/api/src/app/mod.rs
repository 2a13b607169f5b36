//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: opens the ledger document and builds the `LedgerService`
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: response DTOs and naming helpers
//! - `errors.rs`: consistent `{ "error": ... }` responses

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use shopledger_infra::StoreError;

use crate::config::ServerConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ServerConfig) -> Result<Router, StoreError> {
    let services = Arc::new(services::build_services(config)?);
    Ok(router_with_services(services, config.body_limit))
}

/// Router over an already-opened ledger.
pub fn router_with_services(services: Arc<services::AppServices>, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(Extension(services))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
