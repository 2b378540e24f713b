//! Rendering capability.
//!
//! The pipeline only needs four things from a renderer: load a URL into an
//! isolated surface, wait until some selector matches, hand back the current
//! markup, and (best effort) capture an image. Extraction itself always runs
//! on markup with `scraper`, so any renderer that can produce HTML fits.

pub mod http;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;

use crate::error::Result;
use crate::utils::parse_selector;

pub use http::HttpBrowser;
pub use memory::MemoryBrowser;

/// A renderer able to open isolated page surfaces.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Open a new surface. The caller owns it and must `close` it.
    async fn new_page(&self) -> Result<Box<dyn Page>>;
}

/// One isolated document surface.
#[async_trait]
pub trait Page: Send {
    /// Load `url`, replacing the current document.
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait until any selector of the comma-separated group matches.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Current document markup.
    async fn content(&self) -> Result<String>;

    /// Image of the rendered page.
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Release the surface.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// True if any element of `html` matches the selector group.
pub(crate) fn matches_any(html: &str, selector: &str) -> Result<bool> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_any_selector_group() {
        let html = r#"<html><body><table class="fancytable"><tr><td>x</td></tr></table></body></html>"#;
        assert!(matches_any(html, "div.col-centersdetails.markets, table.fancytable").unwrap());
        assert!(!matches_any(html, "div.live-match").unwrap());
        assert!(matches_any(html, "[[bad").is_err());
    }
}
