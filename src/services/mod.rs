//! Service layer for the odds feed.
//!
//! This module contains the business logic for:
//! - Event id discovery (`collect_event_ids`)
//! - Lobby extraction (`LobbyExtractor`)
//! - Event page extraction (`EventPageExtractor`, `PanelLocator`)
//! - Concurrent event scraping (`EventScraper`)
//! - The discovery document source (`EventSource`)

pub mod discovery;
pub mod event_page;
pub mod lobby;
pub mod orchestrator;
pub mod panels;
pub mod source;

pub use discovery::collect_event_ids;
pub use event_page::EventPageExtractor;
pub use lobby::LobbyExtractor;
pub use orchestrator::EventScraper;
pub use panels::{NamedStrategy, PanelLocator, PanelStrategy};
pub use source::{EventSource, HttpEventSource, StaticEventSource};
