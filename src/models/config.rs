//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SiteSelectors;
use crate::utils::{parse_selector, retry::RetryPolicy};

/// Polling intervals below this many seconds are raised to it.
pub const MIN_INTERVAL_SECS: u64 = 3;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source locations
    #[serde(default)]
    pub site: SiteConfig,

    /// Cycle pacing and scraping limits
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Bounded retry for session setup and discovery
    #[serde(default)]
    pub retry: RetryConfig,

    /// Output and debug artifact paths
    #[serde(default)]
    pub io: IoConfig,

    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Markup selectors
    #[serde(default)]
    pub selectors: SiteSelectors,

    /// Snapshot endpoint
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("site.lobby_url", &self.site.lobby_url),
            ("site.event_base", &self.site.event_base),
            ("site.discovery_url", &self.site.discovery_url),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{name} is empty")));
            }
            url::Url::parse(value)?;
        }
        if self.scrape.max_lobby == 0 {
            return Err(AppError::validation("scrape.max_lobby must be > 0"));
        }
        if self.scrape.max_events == 0 {
            return Err(AppError::validation("scrape.max_events must be > 0"));
        }
        if self.scrape.event_concurrency == 0 {
            return Err(AppError::validation(
                "scrape.event_concurrency must be > 0",
            ));
        }
        if self.scrape.navigation_timeout_ms == 0 || self.scrape.selector_timeout_ms == 0 {
            return Err(AppError::validation("scrape timeouts must be > 0"));
        }
        if self.retry.session_attempts == 0 || self.retry.discovery_attempts == 0 {
            return Err(AppError::validation("retry attempts must be > 0"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.user_agent().is_none_or(|ua| ua.trim().is_empty()) {
            return Err(AppError::validation("http.headers.User-Agent is empty"));
        }
        for (name, selector) in self.selectors.all() {
            parse_selector(selector)
                .map_err(|e| AppError::validation(format!("selectors.{name}: {e}")))?;
        }
        Ok(())
    }
}

/// Where the lobby, event pages and discovery document live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Listing page enumerating current matches
    #[serde(default = "defaults::lobby_url")]
    pub lobby_url: String,

    /// Event page URL prefix; the event id is appended
    #[serde(default = "defaults::event_base")]
    pub event_base: String,

    /// JSON document mined for event ids
    #[serde(default = "defaults::discovery_url")]
    pub discovery_url: String,
}

impl SiteConfig {
    /// Event page URL for an id.
    pub fn event_url(&self, event_id: &str) -> String {
        format!("{}{}", self.event_base, event_id)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            lobby_url: defaults::lobby_url(),
            event_base: defaults::event_base(),
            discovery_url: defaults::discovery_url(),
        }
    }
}

/// Cycle pacing and scraping limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Sleep between cycles, measured from cycle end
    #[serde(default = "defaults::interval")]
    pub interval_seconds: u64,

    /// Run the renderer without a visible window
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    /// Maximum lobby rows kept, in document order
    #[serde(default = "defaults::max_lobby")]
    pub max_lobby: usize,

    /// Maximum event pages scraped per cycle
    #[serde(default = "defaults::max_events")]
    pub max_events: usize,

    /// Maximum event pages open at once
    #[serde(default = "defaults::event_concurrency")]
    pub event_concurrency: usize,

    /// Page navigation timeout in milliseconds
    #[serde(default = "defaults::navigation_timeout")]
    pub navigation_timeout_ms: u64,

    /// Content-ready wait timeout in milliseconds
    #[serde(default = "defaults::selector_timeout")]
    pub selector_timeout_ms: u64,

    /// Capture lobby markup/image and the last discovery response
    #[serde(default = "defaults::debug_artifacts")]
    pub debug_artifacts: bool,
}

impl ScrapeConfig {
    /// Sleep between cycles with the floor applied.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(MIN_INTERVAL_SECS))
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            interval_seconds: defaults::interval(),
            headless: defaults::headless(),
            max_lobby: defaults::max_lobby(),
            max_events: defaults::max_events(),
            event_concurrency: defaults::event_concurrency(),
            navigation_timeout_ms: defaults::navigation_timeout(),
            selector_timeout_ms: defaults::selector_timeout(),
            debug_artifacts: defaults::debug_artifacts(),
        }
    }
}

/// Bounded exponential backoff for the two narrow external calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "defaults::session_attempts")]
    pub session_attempts: u32,
    #[serde(default = "defaults::session_max_delay")]
    pub session_max_delay_secs: u64,
    #[serde(default = "defaults::discovery_attempts")]
    pub discovery_attempts: u32,
    #[serde(default = "defaults::discovery_max_delay")]
    pub discovery_max_delay_secs: u64,
}

impl RetryConfig {
    pub fn session_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.session_attempts,
            Duration::from_secs(1),
            Duration::from_secs(self.session_max_delay_secs),
        )
    }

    pub fn discovery_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.discovery_attempts,
            Duration::from_secs(1),
            Duration::from_secs(self.discovery_max_delay_secs),
        )
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            session_attempts: defaults::session_attempts(),
            session_max_delay_secs: defaults::session_max_delay(),
            discovery_attempts: defaults::discovery_attempts(),
            discovery_max_delay_secs: defaults::discovery_max_delay(),
        }
    }
}

/// Output and debug artifact paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    /// Published snapshot
    #[serde(default = "defaults::outfile")]
    pub outfile: String,

    /// Staging file renamed over `outfile`
    #[serde(default = "defaults::tempfile")]
    pub tempfile: String,

    /// Last discovery response
    #[serde(default = "defaults::last_api")]
    pub last_api: String,

    /// Lobby markup capture
    #[serde(default = "defaults::lobby_html")]
    pub lobby_html: String,

    /// Lobby image capture
    #[serde(default = "defaults::lobby_png")]
    pub lobby_png: String,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            outfile: defaults::outfile(),
            tempfile: defaults::tempfile(),
            last_api: defaults::last_api(),
            lobby_html: defaults::lobby_html(),
            lobby_png: defaults::lobby_png(),
        }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "defaults::http_timeout")]
    pub timeout_secs: u64,

    /// Headers sent with every request
    #[serde(default = "defaults::headers")]
    pub headers: BTreeMap<String, String>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured User-Agent, matched case-insensitively.
    pub fn user_agent(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
            .map(|(_, value)| value.as_str())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::http_timeout(),
            headers: defaults::headers(),
        }
    }
}

/// Snapshot endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    #[serde(default = "defaults::bind")]
    pub bind: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;

    // Site defaults
    pub fn lobby_url() -> String {
        "https://www.radheexch.xyz/game/4".into()
    }
    pub fn event_base() -> String {
        "https://www.radheexch.xyz/event/4/".into()
    }
    pub fn discovery_url() -> String {
        "https://api.radheexch.xyz/delaymarkets/markets/eventtype/4".into()
    }

    // Scrape defaults
    pub fn interval() -> u64 {
        20
    }
    pub fn headless() -> bool {
        true
    }
    pub fn max_lobby() -> usize {
        25
    }
    pub fn max_events() -> usize {
        20
    }
    pub fn event_concurrency() -> usize {
        4
    }
    pub fn navigation_timeout() -> u64 {
        45_000
    }
    pub fn selector_timeout() -> u64 {
        7_000
    }
    pub fn debug_artifacts() -> bool {
        true
    }

    // Retry defaults
    pub fn session_attempts() -> u32 {
        3
    }
    pub fn session_max_delay() -> u64 {
        8
    }
    pub fn discovery_attempts() -> u32 {
        4
    }
    pub fn discovery_max_delay() -> u64 {
        10
    }

    // IO defaults
    pub fn outfile() -> String {
        "data/live.json".into()
    }
    pub fn tempfile() -> String {
        "data/.live.tmp".into()
    }
    pub fn last_api() -> String {
        "data/last_api.json".into()
    }
    pub fn lobby_html() -> String {
        "data/lobby.html".into()
    }
    pub fn lobby_png() -> String {
        "data/lobby.png".into()
    }

    // HTTP defaults
    pub fn http_timeout() -> u64 {
        12
    }
    pub fn headers() -> BTreeMap<String, String> {
        [
            ("Accept", "application/json, text/plain, */*"),
            ("Referer", "https://www.radheexch.xyz/"),
            ("Origin", "https://www.radheexch.xyz"),
            (
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/126 Safari/537.36",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    // Serve defaults
    pub fn bind() -> String {
        "0.0.0.0:8000".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_config_parses_and_validates() {
        let config: Config = toml::from_str(include_str!("../../config.example.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.scrape.event_concurrency, 4);
        assert_eq!(config.http.headers.len(), 4);
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.scrape.event_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.selectors.panel = "[[invalid".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("selectors.panel"));
    }

    #[test]
    fn validate_rejects_missing_user_agent() {
        let mut config = Config::default();
        config.http.headers.remove("User-Agent");
        assert!(config.validate().is_err());
    }

    #[test]
    fn interval_has_floor() {
        let mut scrape = ScrapeConfig::default();
        scrape.interval_seconds = 1;
        assert_eq!(scrape.interval(), Duration::from_secs(MIN_INTERVAL_SECS));
        scrape.interval_seconds = 30;
        assert_eq!(scrape.interval(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_overlays_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scrape]
            max_events = 5

            [selectors]
            panel = "div.market-box"
            "#,
        )
        .unwrap();

        assert_eq!(config.scrape.max_events, 5);
        assert_eq!(config.scrape.max_lobby, 25);
        assert_eq!(config.selectors.panel, "div.market-box");
        assert_eq!(config.selectors.runner_name, ".in-play-title");
        assert_eq!(config.io.outfile, "data/live.json");
    }

    #[test]
    fn event_url_appends_id() {
        let site = SiteConfig::default();
        assert_eq!(
            site.event_url("34848333"),
            "https://www.radheexch.xyz/event/4/34848333"
        );
    }
}
