// src/models/mod.rs

//! Domain models for the odds feed.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod event;
mod lobby;
mod payload;
mod selectors;

// Re-export all public types
pub use config::{
    Config, HttpConfig, IoConfig, MIN_INTERVAL_SECS, RetryConfig, ScrapeConfig, ServeConfig,
    SiteConfig,
};
pub use event::{
    EventId, EventSnapshot, FancyMarket, LadderStep, MIN_EVENT_ID_DIGITS, TeamOdds,
};
pub use lobby::{LobbyRow, MatchStatus, PricePair};
pub use payload::{LiveDetail, Payload, RunnerPrice};
pub use selectors::SiteSelectors;
