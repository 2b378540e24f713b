//! Market panel detection.
//!
//! An event page carries several panels of the same markup shape. Which one
//! is which is decided by an ordered list of named strategies: header text
//! first, page structure second.

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::utils::{parse_selector, text_of};

/// One way of recognizing a panel.
pub enum PanelStrategy {
    /// Header text contains any keyword (case-insensitive).
    HeaderKeywords(Vec<String>),
    /// Panel contains an element matching the selector.
    Structure(Selector),
}

/// A strategy with a name for logging.
pub struct NamedStrategy {
    pub name: &'static str,
    pub strategy: PanelStrategy,
}

impl NamedStrategy {
    pub fn keywords(name: &'static str, keywords: &[String]) -> Self {
        Self {
            name,
            strategy: PanelStrategy::HeaderKeywords(
                keywords.iter().map(|k| k.to_lowercase()).collect(),
            ),
        }
    }

    pub fn structure(name: &'static str, selector: &str) -> Result<Self> {
        Ok(Self {
            name,
            strategy: PanelStrategy::Structure(parse_selector(selector)?),
        })
    }
}

/// Finds one kind of panel on an event page.
pub struct PanelLocator {
    panel: Selector,
    header: Selector,
    strategies: Vec<NamedStrategy>,
}

impl PanelLocator {
    pub fn new(panel: &str, header: &str, strategies: Vec<NamedStrategy>) -> Result<Self> {
        Ok(Self {
            panel: parse_selector(panel)?,
            header: parse_selector(header)?,
            strategies,
        })
    }

    /// Try each strategy in priority order; the first one matching any panel
    /// wins, and within a strategy the first panel in document order wins.
    pub fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.strategies.iter().find_map(|named| {
            let found = document
                .select(&self.panel)
                .find(|panel| self.matches(&named.strategy, *panel));
            if found.is_some() {
                log::debug!("Panel located by '{}'", named.name);
            }
            found
        })
    }

    fn matches(&self, strategy: &PanelStrategy, panel: ElementRef<'_>) -> bool {
        match strategy {
            PanelStrategy::HeaderKeywords(keywords) => {
                let header = panel
                    .select(&self.header)
                    .next()
                    .map(|h| text_of(h).to_lowercase())
                    .unwrap_or_default();
                keywords.iter().any(|k| header.contains(k.as_str()))
            }
            PanelStrategy::Structure(selector) => panel.select(selector).next().is_some(),
        }
    }
}
