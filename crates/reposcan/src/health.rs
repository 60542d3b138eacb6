// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health endpoint built on axum.
//!
//! Serves `GET /healthz`; axum's method routing answers other methods with
//! 405. The server shuts down gracefully when the root token is cancelled.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use reposcan_config::model::HealthConfig;
use reposcan_core::ScanError;

/// Identity reported by the health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Service name.
    pub service: String,
    /// This process's consumer name in the jobs group.
    pub consumer: String,
}

/// Response body for GET /healthz.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    consumer: String,
}

fn router(state: HealthState) -> Router {
    Router::new()
        .route("/healthz", get(get_healthz))
        .with_state(state)
}

async fn get_healthz(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.service,
        consumer: state.consumer,
    })
}

/// Binds the health listener and serves until the token is cancelled.
pub async fn serve_health(
    config: HealthConfig,
    state: HealthState,
    cancel: CancellationToken,
) -> Result<(), ScanError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ScanError::Config(format!("binding health endpoint to {addr}: {e}")))?;

    info!(addr = addr.as_str(), "health endpoint listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| ScanError::Config(format!("health server error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthz_reports_service_and_consumer() {
        let state = HealthState {
            service: "reposcan".into(),
            consumer: "reposcan-4242".into(),
        };
        let Json(body) = get_healthz(State(state)).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.service, "reposcan");
        assert_eq!(body.consumer, "reposcan-4242");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["consumer"], "reposcan-4242");
    }

    #[test]
    fn router_builds_with_state() {
        let _router = router(HealthState {
            service: "reposcan".into(),
            consumer: "reposcan-1".into(),
        });
    }
}
