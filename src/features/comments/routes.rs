use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

/// Create routes for the comments feature
///
/// Callers must apply the optional-auth middleware: commenting works with
/// a bearer token or a guest display name.
pub fn routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/api/comments/{id}", delete(handlers::delete_comment))
        .with_state(service)
}
