//! Discovery source: the JSON document event ids are mined from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::storage::ArtifactWriter;
use crate::utils::http::{create_async_client, fetch_text};

/// Something that can hand back the current discovery document.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch(&self) -> Result<Value>;
}

/// Discovery document fetched over HTTP.
pub struct HttpEventSource {
    client: Client,
    url: String,
    timeout: Duration,
    artifacts: ArtifactWriter,
}

impl HttpEventSource {
    pub fn new(config: &Config, artifacts: ArtifactWriter) -> Result<Self> {
        let timeout = config.http.timeout();
        Ok(Self {
            client: create_async_client(&config.http, timeout)?,
            url: config.site.discovery_url.clone(),
            timeout,
            artifacts,
        })
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch(&self) -> Result<Value> {
        let body = fetch_text(&self.client, &self.url, self.timeout).await?;
        let document: Value = serde_json::from_str(&body)
            .map_err(|e| AppError::discovery(format!("{} returned invalid JSON: {}", self.url, e)))?;

        self.artifacts.save_last_api(&document).await;
        Ok(document)
    }
}

/// A fixed document, or a fixed failure.
///
/// Stands in for the live endpoint when replaying a captured response.
pub struct StaticEventSource {
    document: Option<Value>,
}

impl StaticEventSource {
    pub fn new(document: Value) -> Self {
        Self {
            document: Some(document),
        }
    }

    /// A source whose every fetch fails.
    pub fn unavailable() -> Self {
        Self { document: None }
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn fetch(&self) -> Result<Value> {
        self.document
            .clone()
            .ok_or_else(|| AppError::discovery("discovery source unavailable"))
    }
}
