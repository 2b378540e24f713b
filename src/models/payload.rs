//! The published snapshot document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{EventSnapshot, FancyMarket, LobbyRow};

/// Best back/lay for one runner in the consumer view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerPrice {
    pub back: Option<f64>,
    pub lay: Option<f64>,
}

/// Consumer-facing subset of an event snapshot, keyed by match slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveDetail {
    pub event_id: String,
    pub title: Option<String>,
    pub match_time: Option<String>,
    pub bookmaker: BTreeMap<String, RunnerPrice>,
    pub fancy: Vec<FancyMarket>,
    pub sessions: Vec<serde_json::Value>,
    pub result: Option<String>,
}

impl LiveDetail {
    pub fn from_snapshot(event_id: &str, snap: &EventSnapshot) -> Self {
        Self {
            event_id: event_id.to_string(),
            title: snap.title.clone(),
            match_time: snap.match_time.clone(),
            bookmaker: snap
                .bookmaker_odds
                .iter()
                .map(|(name, odds)| {
                    let price = RunnerPrice {
                        back: odds.best_back,
                        lay: odds.best_lay,
                    };
                    (name.clone(), price)
                })
                .collect(),
            fancy: snap.fancy.clone(),
            sessions: snap.sessions.clone(),
            result: snap.result.clone(),
        }
    }
}

/// One cycle's complete result; the unit of publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub fetched_at: DateTime<Utc>,
    pub lobby: Vec<LobbyRow>,
    /// Raw snapshots by event id
    pub events: BTreeMap<String, EventSnapshot>,
    /// Joined consumer view by match slug
    pub live_details: BTreeMap<String, LiveDetail>,
}

impl Payload {
    /// Payload with no lobby and no events.
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            lobby: Vec::new(),
            events: BTreeMap::new(),
            live_details: BTreeMap::new(),
        }
    }
}
