use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::db::{check_connection, DbPool};

#[derive(Debug, Serialize)]
struct Readiness {
    status: &'static str,
    database: &'static str,
    version: &'static str,
}

/// GET /health - Liveness, never touches dependencies
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /health/ready - Readiness, requires a working database
pub async fn health_ready(State(pool): State<Arc<DbPool>>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    if let Err(e) = check_connection(&pool).await {
        tracing::error!(error = %e, "Readiness check failed");
        let body = Readiness {
            status: "not_ready",
            database: "disconnected",
            version,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body));
    }

    let body = Readiness {
        status: "ready",
        database: "connected",
        version,
    };
    (StatusCode::OK, Json(body))
}
