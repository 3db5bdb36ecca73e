use std::sync::Arc;

use axum::{routing::get, Router};

use pharmacy_core::{PharmacyCore, PharmacyError, PharmacyResult};

pub mod categories;
pub mod inventory;
pub mod medicines;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/medicines", medicines::router())
        .nest("/inventory", inventory::router())
}

/// Public routes outside `/api`.
pub fn public_router() -> Router {
    Router::new().route("/health", get(system::health))
}

/// Run a core call on the blocking pool; SQLite access must not stall the runtime.
pub(crate) async fn run_blocking<T, F>(core: Arc<PharmacyCore>, f: F) -> PharmacyResult<T>
where
    F: FnOnce(&PharmacyCore) -> PharmacyResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&core))
        .await
        .map_err(|e| PharmacyError::Storage(format!("blocking task failed: {}", e)))?
}
