use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::complaints::handlers::{self, ComplaintState};
use crate::features::complaints::services::{ComplaintService, DeletionService, GroupingService};

/// Create the citizen-facing complaint routes
///
/// Callers must apply the optional-auth middleware: a bearer token is
/// honored when present, guests identify by display name instead.
pub fn routes(
    complaint_service: Arc<ComplaintService>,
    grouping_service: Arc<GroupingService>,
    deletion_service: Arc<DeletionService>,
) -> Router {
    let state = ComplaintState {
        complaint_service,
        grouping_service,
        deletion_service,
    };

    Router::new()
        .route(
            "/api/complaints",
            get(handlers::list_complaints).post(handlers::submit_complaint),
        )
        .route(
            "/api/complaints/{id}",
            get(handlers::get_complaint).delete(handlers::delete_complaint),
        )
        .with_state(state)
}

/// Routes that require authentication (auth middleware applied by caller)
pub fn protected_routes(complaint_service: Arc<ComplaintService>) -> Router {
    Router::new()
        .route(
            "/api/complaints/{id}/resolve",
            post(handlers::resolve_complaint),
        )
        .route(
            "/api/complaints/{id}/status",
            patch(handlers::update_complaint_status),
        )
        .with_state(complaint_service)
}
