//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

use crate::serve::ServeState;

/// Liveness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    ok: bool,
    ts: i64,
}

#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ts: Utc::now().timestamp(),
    })
}

/// The published snapshot, or 503 if nothing was published yet.
pub async fn live_json(State(state): State<ServeState>) -> Response {
    match state.store.read_latest().await {
        Ok(Some(bytes)) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Ok(None) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "no data yet",
            }),
        )
            .into_response(),
        Err(e) => {
            log::error!("Reading snapshot failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "snapshot unreadable",
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use tempfile::TempDir;

    use super::*;
    use crate::models::Payload;
    use crate::storage::{LocalStorage, SnapshotStore};

    fn state(tmp: &TempDir) -> (ServeState, LocalStorage) {
        let store = LocalStorage::new(tmp.path().join("live.json"), tmp.path().join(".live.tmp"));
        (ServeState::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_unavailable_before_first_publish() {
        let tmp = TempDir::new().unwrap();
        let (state, _) = state(&tmp);

        let response = live_json(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "no data yet");
    }

    #[tokio::test]
    async fn test_serves_published_bytes_verbatim() {
        let tmp = TempDir::new().unwrap();
        let (state, store) = state(&tmp);
        store.publish(&Payload::empty(Utc::now())).await.unwrap();
        let published = store.read_latest().await.unwrap().unwrap();

        let response = live_json(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), published.as_slice());
    }

    #[tokio::test]
    async fn test_health() {
        let Json(health) = health().await;
        assert!(health.ok);
        assert!(health.ts > 0);
    }
}
