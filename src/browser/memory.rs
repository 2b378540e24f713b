// src/browser/memory.rs

//! In-memory renderer serving canned markup by URL.
//!
//! Tracks how many surfaces are open at once so callers can check isolation
//! and cleanup. Useful for replaying captured pages and for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{Browser, Page, matches_any};
use crate::error::{AppError, Result};

#[derive(Default)]
struct State {
    pages: RwLock<HashMap<String, String>>,
    latency: Duration,
    slow: RwLock<HashMap<String, Duration>>,
    open: AtomicUsize,
    peak: AtomicUsize,
    opened: AtomicUsize,
}

/// Renderer over a URL → markup table.
#[derive(Clone, Default)]
pub struct MemoryBrowser {
    state: Arc<State>,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer whose navigations each take `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            state: Arc::new(State {
                latency,
                ..State::default()
            }),
        }
    }

    /// Serve `html` at `url`, replacing any previous markup.
    pub fn set_page(&self, url: impl Into<String>, html: impl Into<String>) {
        if let Ok(mut pages) = self.state.pages.write() {
            pages.insert(url.into(), html.into());
        }
    }

    /// Make navigations to `url` take `latency` instead of the default.
    pub fn set_latency_for(&self, url: impl Into<String>, latency: Duration) {
        if let Ok(mut slow) = self.state.slow.write() {
            slow.insert(url.into(), latency);
        }
    }

    /// Stop serving `url`; later navigations to it fail.
    pub fn remove_page(&self, url: &str) {
        if let Ok(mut pages) = self.state.pages.write() {
            pages.remove(url);
        }
    }

    /// Surfaces currently open.
    pub fn open_pages(&self) -> usize {
        self.state.open.load(Ordering::SeqCst)
    }

    /// Most surfaces ever open at the same time.
    pub fn peak_open_pages(&self) -> usize {
        self.state.peak.load(Ordering::SeqCst)
    }

    /// Surfaces opened in total.
    pub fn pages_opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    fn lookup(&self, url: &str) -> Option<String> {
        self.state.pages.read().ok()?.get(url).cloned()
    }

    fn latency(&self, url: &str) -> Duration {
        self.state
            .slow
            .read()
            .ok()
            .and_then(|slow| slow.get(url).copied())
            .unwrap_or(self.state.latency)
    }
}

#[async_trait]
impl Browser for MemoryBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>> {
        let open = self.state.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.peak.fetch_max(open, Ordering::SeqCst);
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryPage {
            browser: self.clone(),
            html: String::new(),
        }))
    }
}

/// A surface of [`MemoryBrowser`].
pub struct MemoryPage {
    browser: MemoryBrowser,
    html: String,
}

#[async_trait]
impl Page for MemoryPage {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        let latency = self.browser.latency(url);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.html = self
            .browser
            .lookup(url)
            .ok_or_else(|| AppError::browser(format!("goto {url}"), "no such page"))?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        if matches_any(&self.html, selector)? {
            Ok(())
        } else {
            Err(AppError::timeout(selector, timeout.as_millis() as u64))
        }
    }

    async fn content(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Err(AppError::browser("screenshot", "no image for in-memory pages"))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.browser.state.open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_close_accounting() {
        let browser = MemoryBrowser::new();
        browser.set_page("https://x/a", "<p class='ready'>a</p>");

        let mut first = browser.new_page().await.unwrap();
        let second = browser.new_page().await.unwrap();
        assert_eq!(browser.open_pages(), 2);

        first.goto("https://x/a", Duration::from_secs(1)).await.unwrap();
        first.wait_for("p.ready", Duration::from_secs(1)).await.unwrap();
        assert!(first.content().await.unwrap().contains("ready"));

        first.close().await.unwrap();
        second.close().await.unwrap();
        assert_eq!(browser.open_pages(), 0);
        assert_eq!(browser.peak_open_pages(), 2);
        assert_eq!(browser.pages_opened(), 2);
    }

    #[tokio::test]
    async fn test_unknown_url_fails() {
        let browser = MemoryBrowser::new();
        let mut page = browser.new_page().await.unwrap();
        let err = page.goto("https://x/missing", Duration::from_secs(1)).await;
        assert!(matches!(err, Err(AppError::Browser { .. })));
        page.close().await.unwrap();
    }
}
