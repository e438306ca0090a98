//! Audit Log API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/audit-log", audit_log_routes())
}

fn audit_log_routes() -> Router<ServerState> {
    Router::new()
        .route("/query", post(handler::query))
        .route("/verify", post(handler::verify_chain))
}
