//! Best-effort debug captures.
//!
//! Nothing written here is load-bearing: every failure is logged at debug
//! level and dropped.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::browser::Page;
use crate::models::{IoConfig, ScrapeConfig};

/// Writes operator-facing captures next to the published snapshot.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    capture_lobby: bool,
    last_api: PathBuf,
    lobby_html: PathBuf,
    lobby_png: PathBuf,
}

impl ArtifactWriter {
    pub fn new(io: &IoConfig, scrape: &ScrapeConfig) -> Self {
        Self {
            capture_lobby: scrape.debug_artifacts,
            last_api: io.last_api.clone().into(),
            lobby_html: io.lobby_html.clone().into(),
            lobby_png: io.lobby_png.clone().into(),
        }
    }

    /// Save the last discovery response. Written on every fetch regardless
    /// of the capture toggle.
    pub async fn save_last_api(&self, document: &Value) {
        match serde_json::to_vec_pretty(document) {
            Ok(bytes) => write_quietly(&self.last_api, &bytes).await,
            Err(e) => log::debug!("Skipping last_api capture: {}", e),
        }
    }

    /// Save the lobby markup and image when captures are enabled.
    pub async fn save_lobby(&self, page: &dyn Page, html: &str) {
        if !self.capture_lobby {
            return;
        }
        write_quietly(&self.lobby_html, html.as_bytes()).await;
        match page.screenshot().await {
            Ok(png) => write_quietly(&self.lobby_png, &png).await,
            Err(e) => log::debug!("Skipping lobby image: {}", e),
        }
    }
}

async fn write_quietly(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = tokio::fs::create_dir_all(parent).await;
        }
    }
    if let Err(e) = tokio::fs::write(path, bytes).await {
        log::debug!("Could not write {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{Browser, MemoryBrowser};
    use serde_json::json;
    use tempfile::TempDir;

    fn writer(tmp: &TempDir, capture_lobby: bool) -> ArtifactWriter {
        let io = IoConfig {
            last_api: tmp.path().join("last_api.json").display().to_string(),
            lobby_html: tmp.path().join("lobby.html").display().to_string(),
            lobby_png: tmp.path().join("lobby.png").display().to_string(),
            ..IoConfig::default()
        };
        let scrape = ScrapeConfig {
            debug_artifacts: capture_lobby,
            ..ScrapeConfig::default()
        };
        ArtifactWriter::new(&io, &scrape)
    }

    #[tokio::test]
    async fn test_last_api_written_even_when_captures_disabled() {
        let tmp = TempDir::new().unwrap();
        writer(&tmp, false).save_last_api(&json!({"id": 12345})).await;

        let saved = std::fs::read_to_string(tmp.path().join("last_api.json")).unwrap();
        assert!(saved.contains("12345"));
    }

    #[tokio::test]
    async fn test_lobby_capture_swallows_missing_image() {
        let tmp = TempDir::new().unwrap();
        let browser = MemoryBrowser::new();
        let page = browser.new_page().await.unwrap();

        writer(&tmp, true).save_lobby(page.as_ref(), "<html></html>").await;
        assert!(tmp.path().join("lobby.html").exists());
        assert!(!tmp.path().join("lobby.png").exists());

        page.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_unwritable_path_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let mut w = writer(&tmp, true);
        w.last_api = tmp.path().to_path_buf();
        w.save_last_api(&json!([])).await;
    }
}
