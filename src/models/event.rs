//! Event page snapshot structures.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::slugify;

/// Minimum digit count of a plausible event id.
pub const MIN_EVENT_ID_DIGITS: usize = 5;

/// Event identifier: ASCII digits only, at least five of them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Accept `raw` if it is purely digits and long enough.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() >= MIN_EVENT_ID_DIGITS && raw.bytes().all(|b| b.is_ascii_digit());
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One depth level of a priced market.
///
/// Back and lay sides are paired by position, not by price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LadderStep {
    pub back: Option<f64>,
    pub back_size: String,
    pub lay: Option<f64>,
    pub lay_size: String,
}

/// Prices for one runner of a panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamOdds {
    /// Maximum observed back price
    pub best_back: Option<f64>,
    /// Minimum observed lay price
    pub best_lay: Option<f64>,
    pub ladder: Vec<LadderStep>,
}

/// A yes/no proposition market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FancyMarket {
    pub name: String,
    pub no: Option<f64>,
    pub no_size: String,
    pub yes: Option<f64>,
    pub yes_size: String,
    /// Free-text stake limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<String>,
}

/// Everything scraped from one event page in one cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub title: Option<String>,
    pub match_time: Option<String>,

    /// Primary (winner / match odds) panel, by runner name
    #[serde(rename = "runners")]
    pub bookmaker_odds: BTreeMap<String, TeamOdds>,

    /// Secondary zero-commission panel, by runner name
    pub bookmaker_zero_commission: BTreeMap<String, TeamOdds>,
    pub bookmaker_zero_commission_suspended: bool,

    pub fancy: Vec<FancyMarket>,
    /// Reserved; no extraction rule populates these yet
    pub sessions: Vec<serde_json::Value>,
    pub result: Option<String>,
    pub source_url: Option<String>,
}

impl EventSnapshot {
    /// Snapshot carrying only the source URL, used when a page fails.
    pub fn placeholder(source_url: impl Into<String>) -> Self {
        Self {
            source_url: Some(source_url.into()),
            ..Self::default()
        }
    }

    /// Slug joining this event back to a lobby row.
    ///
    /// Computed from the title text before the first `" - "`.
    pub fn join_slug(&self) -> Option<String> {
        let title = self.title.as_deref()?;
        let base = title.split(" - ").next().unwrap_or("").trim();
        let slug = slugify(base);
        (!slug.is_empty()).then_some(slug)
    }
}
