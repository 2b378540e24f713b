//! Long-lived rendering session.

use std::sync::Arc;

use crate::browser::{Browser, Page};
use crate::error::Result;
use crate::models::Config;
use crate::utils::retry::retry;

/// A launched renderer plus the page the lobby is read from every cycle.
pub struct Session {
    browser: Arc<dyn Browser>,
    lobby_page: Box<dyn Page>,
}

impl Session {
    /// Launch the renderer and load the lobby once, retrying with backoff.
    ///
    /// An error here means every attempt failed and nothing can be scraped.
    pub async fn establish<F>(config: &Config, launch: F) -> Result<Self>
    where
        F: Fn() -> Result<Arc<dyn Browser>>,
    {
        let policy = config.retry.session_policy();
        let launch = &launch;
        let lobby_url = config.site.lobby_url.as_str();
        let timeout = config.scrape.navigation_timeout();

        retry(&policy, "Session setup", || async move {
            let browser = launch()?;
            let mut lobby_page = browser.new_page().await?;
            if let Err(e) = lobby_page.goto(lobby_url, timeout).await {
                let _ = lobby_page.close().await;
                return Err(e);
            }
            log::info!("Session established on {}", lobby_url);
            Ok(Self {
                browser,
                lobby_page,
            })
        })
        .await
    }

    pub fn browser(&self) -> Arc<dyn Browser> {
        Arc::clone(&self.browser)
    }

    pub fn lobby_page(&mut self) -> &mut dyn Page {
        self.lobby_page.as_mut()
    }

    pub async fn close(self) -> Result<()> {
        self.lobby_page.close().await
    }
}
