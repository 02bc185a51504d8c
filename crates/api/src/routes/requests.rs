use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/requests", get(handlers::requests::list_requests))
        .route("/api/requests/stats", get(handlers::requests::request_stats))
        .route(
            "/api/requests/cleanup",
            post(handlers::requests::cleanup_requests),
        )
        .route(
            "/api/requests/:id/approve",
            post(handlers::requests::approve_request),
        )
        .route(
            "/api/requests/:id/reject",
            post(handlers::requests::reject_request),
        )
        .route(
            "/api/requests/:id",
            delete(handlers::requests::delete_request),
        )
}
