//! HTTP API for the pharmacy catalog and stock ledger.
//!
//! Layout:
//! - `routes/`: handlers, one file per resource
//! - `dto.rs`: query strings and response envelopes
//! - `errors.rs`: `{error, message}` responses and status mapping
//! - `middleware.rs`: request logging
//! - `telemetry.rs`: tracing subscriber setup for the binary

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use pharmacy_core::PharmacyCore;

pub mod dto;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod telemetry;

/// Build the full HTTP router around a shared core.
pub fn build_app(core: Arc<PharmacyCore>) -> Router {
    Router::new()
        .merge(routes::public_router())
        .nest("/api", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(core)),
        )
}
