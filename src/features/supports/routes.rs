use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::supports::handlers;
use crate::features::supports::services::SupportService;

/// Create routes for the supports feature
///
/// Note: This feature requires authentication (middleware applied by caller)
pub fn routes(service: Arc<SupportService>) -> Router {
    Router::new()
        .route(
            "/api/supports",
            get(handlers::list_my_supports).post(handlers::add_support),
        )
        .route("/api/supports/{id}", delete(handlers::retract_support))
        .with_state(service)
}
