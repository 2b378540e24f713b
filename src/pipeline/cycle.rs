// src/pipeline/cycle.rs

//! One ingestion cycle: lobby and events side by side, then assembly.

use std::sync::Arc;

use chrono::Utc;

use crate::browser::Page;
use crate::error::Result;
use crate::models::{Config, EventId, EventSnapshot, LobbyRow, Payload, ScrapeConfig, SiteConfig};
use crate::pipeline::assemble::assemble;
use crate::pipeline::session::Session;
use crate::services::{EventScraper, EventSource, LobbyExtractor, collect_event_ids};
use crate::storage::ArtifactWriter;
use crate::utils::retry::{RetryPolicy, retry};

/// Runs cycles against an established session.
pub struct CycleRunner {
    site: SiteConfig,
    scrape: ScrapeConfig,
    discovery_policy: RetryPolicy,
    lobby: LobbyExtractor,
    scraper: EventScraper,
    source: Arc<dyn EventSource>,
    artifacts: ArtifactWriter,
}

impl CycleRunner {
    pub fn new(
        config: &Config,
        session: &Session,
        source: Arc<dyn EventSource>,
        artifacts: ArtifactWriter,
    ) -> Result<Self> {
        Ok(Self {
            site: config.site.clone(),
            scrape: config.scrape.clone(),
            discovery_policy: config.retry.discovery_policy(),
            lobby: LobbyExtractor::new(&config.selectors)?,
            scraper: EventScraper::new(session.browser(), config)?,
            source,
            artifacts,
        })
    }

    /// Run one cycle. Never fails: each stage degrades to an empty result.
    pub async fn run(&self, session: &mut Session) -> Payload {
        let (lobby, events) = tokio::join!(
            self.scrape_lobby(session.lobby_page()),
            self.scrape_events()
        );
        assemble(Utc::now(), lobby, events)
    }

    async fn scrape_lobby(&self, page: &mut dyn Page) -> Vec<LobbyRow> {
        if let Err(e) = page
            .goto(&self.site.lobby_url, self.scrape.navigation_timeout())
            .await
        {
            log::warn!("Lobby scrape failed: {}", e);
            return Vec::new();
        }

        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Lobby markup unavailable: {}", e);
                return Vec::new();
            }
        };

        self.artifacts.save_lobby(page, &html).await;
        self.lobby.extract(&html, self.scrape.max_lobby)
    }

    async fn scrape_events(&self) -> Vec<(EventId, EventSnapshot)> {
        let document = match retry(&self.discovery_policy, "Discovery fetch", || {
            self.source.fetch()
        })
        .await
        {
            Ok(document) => document,
            Err(e) => {
                log::warn!("Discovery failed, publishing lobby only: {}", e);
                return Vec::new();
            }
        };

        let mut ids = collect_event_ids(&document);
        if ids.is_empty() {
            log::info!("Discovery returned 0 event ids; see the last_api capture for its shape");
            return Vec::new();
        }
        log::info!(
            "Discovery returned {} event ids (scraping up to {})",
            ids.len(),
            self.scrape.max_events
        );

        ids.truncate(self.scrape.max_events);
        self.scraper.scrape_all(&ids).await
    }
}
