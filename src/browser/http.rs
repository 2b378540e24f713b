// src/browser/http.rs

//! Static-markup renderer over reqwest.
//!
//! Fetches the server-rendered HTML of a page. Waiting re-fetches the page
//! until the selector appears or the timeout runs out, which covers sources
//! that fill their tables in on a short delay. No image capture.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Instant;

use crate::browser::{Browser, Page, matches_any};
use crate::error::{AppError, Result};
use crate::models::Config;
use crate::utils::http::{create_async_client, fetch_text};

/// Delay between re-fetches while waiting for a selector.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Renderer backed by plain HTTP fetches.
#[derive(Clone)]
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    /// Build the renderer from the HTTP settings and navigation timeout.
    pub fn launch(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.http, config.scrape.navigation_timeout())?;
        if !config.scrape.headless {
            log::info!("headless=false requested; the http renderer has no window to show");
        }
        Ok(Self { client })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            url: None,
            html: String::new(),
        }))
    }
}

/// A page surface holding the last fetched markup.
pub struct HttpPage {
    client: Client,
    url: Option<String>,
    html: String,
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let html = fetch_text(&self.client, url, timeout)
            .await
            .map_err(|e| AppError::browser(format!("goto {url}"), e))?;
        self.url = Some(url.to_string());
        self.html = html;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        let deadline = started + timeout;
        loop {
            if matches_any(&self.html, selector)? {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(AppError::timeout(
                    selector,
                    started.elapsed().as_millis() as u64,
                ));
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;

            let Some(url) = self.url.clone() else {
                continue;
            };
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                continue;
            }
            match fetch_text(&self.client, &url, remaining).await {
                Ok(html) => self.html = html,
                Err(e) => log::debug!("Re-fetch of {} while waiting failed: {}", url, e),
            }
        }
    }

    async fn content(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Err(AppError::browser(
            "screenshot",
            "image capture is not supported by the http renderer",
        ))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
