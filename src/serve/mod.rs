//! Read-only HTTP endpoint over the published snapshot.
//!
//! - `GET /live.json` - the snapshot bytes, verbatim
//! - `GET /` - liveness probe

mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::error::Result;
use crate::storage::SnapshotStore;

/// Shared handler state.
#[derive(Clone)]
pub struct ServeState {
    store: Arc<dyn SnapshotStore>,
}

impl ServeState {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }
}

/// Build the router.
pub fn router(state: ServeState) -> Router {
    Router::new()
        .route("/", get(routes::health))
        .route("/live.json", get(routes::live_json))
        .with_state(state)
}

/// Serve until the process is stopped.
pub async fn serve(bind: &str, store: Arc<dyn SnapshotStore>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("Serving snapshot on http://{}", bind);
    axum::serve(listener, router(ServeState::new(store))).await?;
    Ok(())
}
