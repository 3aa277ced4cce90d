//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (stores, bus, recorder, vault service)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use aurum_infra::store::StoreError;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Result<Router, StoreError> {
    let services = Arc::new(services::build_services(config));

    if config.seed_on_start {
        services.vault.seed()?;
    }

    // Account routes require a caller identity.
    let protected =
        routes::account_router().route_layer(axum::middleware::from_fn(middleware::user_middleware));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .nest("/vault", routes::vault::router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services))))
}
