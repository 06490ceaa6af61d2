//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: the item service (handler operations, transport-free)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and extractors
//! - `errors.rs`: consistent error responses
//! - `flash.rs` / `views.rs`: one-time messages and rendered view documents

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;

use stockroom_infra::{db, DatabaseConfig, StoreError};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod flash;
pub mod routes;
pub mod services;
pub mod views;

/// Open the database and build the full HTTP router (used by `main.rs`).
pub async fn build_app(database: &DatabaseConfig) -> Result<Router, StoreError> {
    let pool = db::connect(database).await?;
    Ok(build_router(services::build_services(pool)))
}

/// Build the router around already-wired services.
pub fn build_router(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(Arc::new(services))))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_context))
                .layer(CookieManagerLayer::new()),
        )
}
