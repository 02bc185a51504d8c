use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::ApiState;

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
