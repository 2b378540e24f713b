// src/services/orchestrator.rs

//! Concurrent event page scraping.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::browser::{Browser, Page};
use crate::error::Result;
use crate::models::{Config, EventId, EventSnapshot, SiteConfig};
use crate::services::event_page::EventPageExtractor;

/// Scrapes event pages with a bounded number of open surfaces.
pub struct EventScraper {
    browser: Arc<dyn Browser>,
    extractor: EventPageExtractor,
    site: SiteConfig,
    concurrency: usize,
    navigation_timeout: Duration,
    selector_timeout: Duration,
}

impl EventScraper {
    pub fn new(browser: Arc<dyn Browser>, config: &Config) -> Result<Self> {
        Ok(Self {
            browser,
            extractor: EventPageExtractor::new(&config.selectors)?,
            site: config.site.clone(),
            concurrency: config.scrape.event_concurrency.max(1),
            navigation_timeout: config.scrape.navigation_timeout(),
            selector_timeout: config.scrape.selector_timeout(),
        })
    }

    /// Scrape every id, at most `event_concurrency` at a time.
    ///
    /// A slot frees as soon as its id finishes, whatever the order. Returns
    /// one snapshot per id in input order. Ids that fail yield a
    /// placeholder carrying only the source URL.
    pub async fn scrape_all(&self, ids: &[EventId]) -> Vec<(EventId, EventSnapshot)> {
        log::info!(
            "Scraping {} event pages (concurrency: {})",
            ids.len(),
            self.concurrency
        );

        let mut results: Vec<(usize, EventId, EventSnapshot)> =
            stream::iter(ids.iter().cloned().enumerate())
                .map(|(index, id)| async move {
                    let snap = self.scrape_one(&id).await;
                    (index, id, snap)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        results.sort_by_key(|(index, _, _)| *index);
        results
            .into_iter()
            .map(|(_, id, snap)| (id, snap))
            .collect()
    }

    /// Scrape one event page, never failing.
    pub async fn scrape_one(&self, id: &EventId) -> EventSnapshot {
        let url = self.site.event_url(id.as_str());
        match self.render(&url).await {
            Ok(html) => self.extractor.extract(&html, &url),
            Err(e) => {
                log::warn!("EVENT {}: {}", id, e);
                EventSnapshot::placeholder(url)
            }
        }
    }

    /// Render `url` on a fresh surface and return its markup. The surface is
    /// closed whatever the outcome.
    async fn render(&self, url: &str) -> Result<String> {
        let mut page = self.browser.new_page().await?;
        let rendered = self.load(page.as_mut(), url).await;
        if let Err(e) = page.close().await {
            log::debug!("Closing page for {} failed: {}", url, e);
        }
        rendered
    }

    async fn load(&self, page: &mut dyn Page, url: &str) -> Result<String> {
        page.goto(url, self.navigation_timeout).await?;
        page.wait_for(self.extractor.content_ready(), self.selector_timeout)
            .await?;
        page.content().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::MemoryBrowser;

    fn config(concurrency: usize) -> Config {
        let mut config = Config::default();
        config.site.event_base = "https://odds.test/event/".into();
        config.scrape.event_concurrency = concurrency;
        config
    }

    fn ids(raw: &[&str]) -> Vec<EventId> {
        raw.iter().filter_map(|r| EventId::parse(r)).collect()
    }

    const READY: &str = r#"<html><body><div class="col-centersdetails markets"><div class="sub_path center-box crname"><p><span>A v B</span><span>14:00</span></p></div></div></body></html>"#;

    #[tokio::test]
    async fn test_failure_isolated_to_one_id() {
        let browser = MemoryBrowser::new();
        browser.set_page("https://odds.test/event/10001", READY);
        browser.set_page("https://odds.test/event/10002", "<html><body>loading</body></html>");
        let scraper = EventScraper::new(Arc::new(browser.clone()), &config(2)).unwrap();

        let results = scraper.scrape_all(&ids(&["10001", "10002", "10003"])).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].1.title.as_deref(), Some("A v B"));
        // Not ready in time, and unknown URL: both degrade to placeholders.
        assert_eq!(
            results[1].1,
            EventSnapshot::placeholder("https://odds.test/event/10002")
        );
        assert_eq!(
            results[2].1,
            EventSnapshot::placeholder("https://odds.test/event/10003")
        );
        assert_eq!(browser.open_pages(), 0);
        assert_eq!(browser.pages_opened(), 3);
    }

    #[tokio::test]
    async fn test_concurrency_ceiling() {
        let browser = MemoryBrowser::with_latency(Duration::from_millis(20));
        let raw: Vec<String> = (0..9).map(|i| format!("2000{i}")).collect();
        for id in &raw {
            browser.set_page(format!("https://odds.test/event/{id}"), READY);
        }
        let scraper = EventScraper::new(Arc::new(browser.clone()), &config(3)).unwrap();

        let raw: Vec<&str> = raw.iter().map(String::as_str).collect();
        let results = scraper.scrape_all(&ids(&raw)).await;

        assert_eq!(results.len(), 9);
        assert!(browser.peak_open_pages() <= 3);
        assert_eq!(browser.open_pages(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_id_does_not_hold_free_slots() {
        let browser = MemoryBrowser::with_latency(Duration::from_millis(50));
        browser.set_latency_for("https://odds.test/event/30000", Duration::from_millis(400));
        let raw: Vec<String> = (0..7).map(|i| format!("3000{i}")).collect();
        for id in &raw {
            browser.set_page(format!("https://odds.test/event/{id}"), READY);
        }
        let scraper = EventScraper::new(Arc::new(browser.clone()), &config(2)).unwrap();

        let raw: Vec<&str> = raw.iter().map(String::as_str).collect();
        let started = tokio::time::Instant::now();
        let results = scraper.scrape_all(&ids(&raw)).await;
        let elapsed = started.elapsed();

        // Six fast ids share the second slot while the slow one holds the first.
        assert!(elapsed < Duration::from_millis(450), "took {elapsed:?}");
        assert!(browser.peak_open_pages() <= 2);
        let order: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, raw);
        assert!(results.iter().all(|(_, snap)| snap.title.as_deref() == Some("A v B")));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let browser = MemoryBrowser::new();
        let scraper = EventScraper::new(Arc::new(browser.clone()), &config(4)).unwrap();
        assert!(scraper.scrape_all(&[]).await.is_empty());
        assert_eq!(browser.pages_opened(), 0);
    }
}
