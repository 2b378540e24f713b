// src/services/event_page.rs

//! Event page extractor.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{EventSnapshot, FancyMarket, LadderStep, SiteSelectors, TeamOdds};
use crate::services::panels::{NamedStrategy, PanelLocator};
use crate::utils::{first_float, normalize_whitespace, parse_selector, text_of};

/// Extracts an [`EventSnapshot`] from an event page.
///
/// Every missing element degrades its field to empty instead of failing the
/// page.
pub struct EventPageExtractor {
    content_ready: String,
    header: Selector,
    title: Selector,
    time: Selector,
    primary: PanelLocator,
    secondary: PanelLocator,
    panel_row: Selector,
    runner_name: Selector,
    back_button: Selector,
    lay_button: Selector,
    price_text: Selector,
    back_size: Selector,
    lay_size: Selector,
    suspended: Selector,
    fancy_table: Selector,
    fancy_row: Selector,
    fancy_name: Selector,
    fancy_limits: Selector,
    fancy_back_price: Selector,
    fancy_back_size: Selector,
    fancy_lay_price: Selector,
    fancy_lay_size: Selector,
}

impl EventPageExtractor {
    pub fn new(selectors: &SiteSelectors) -> Result<Self> {
        let primary = PanelLocator::new(
            &selectors.panel,
            &selectors.panel_header,
            vec![
                NamedStrategy::keywords("primary header", &selectors.primary_keywords),
                NamedStrategy::structure("primary structure", &selectors.primary_structural)?,
            ],
        )?;
        let secondary = PanelLocator::new(
            &selectors.panel,
            &selectors.panel_header,
            vec![NamedStrategy::keywords(
                "secondary header",
                &selectors.secondary_keywords,
            )],
        )?;

        let descendant = |outer: &str, inner: &str| parse_selector(&format!("{outer} {inner}"));

        Ok(Self {
            content_ready: selectors.content_ready.clone(),
            header: parse_selector(&selectors.event_header)?,
            title: parse_selector(&selectors.event_title)?,
            time: parse_selector(&selectors.event_time)?,
            primary,
            secondary,
            panel_row: parse_selector(&selectors.panel_row)?,
            runner_name: parse_selector(&selectors.runner_name)?,
            back_button: parse_selector(&selectors.back_button)?,
            lay_button: parse_selector(&selectors.lay_button)?,
            price_text: parse_selector(&selectors.price_text)?,
            back_size: parse_selector(&selectors.back_size)?,
            lay_size: parse_selector(&selectors.lay_size)?,
            suspended: parse_selector(&selectors.suspended)?,
            fancy_table: parse_selector(&selectors.fancy_table)?,
            fancy_row: parse_selector(&selectors.fancy_row)?,
            fancy_name: parse_selector(&selectors.fancy_name)?,
            fancy_limits: parse_selector(&selectors.fancy_limits)?,
            fancy_back_price: descendant(&selectors.back_button, &selectors.price_text)?,
            fancy_back_size: descendant(&selectors.back_button, &selectors.back_size)?,
            fancy_lay_price: descendant(&selectors.lay_button, &selectors.price_text)?,
            fancy_lay_size: descendant(&selectors.lay_button, &selectors.lay_size)?,
        })
    }

    /// Selector group signalling that the page has rendered its markets.
    pub fn content_ready(&self) -> &str {
        &self.content_ready
    }

    pub fn extract(&self, html: &str, source_url: &str) -> EventSnapshot {
        let document = Html::parse_document(html);
        let mut snap = EventSnapshot::placeholder(source_url);

        if let Some(header) = document.select(&self.header).next() {
            snap.title = non_empty(first_text(header, &self.title));
            snap.match_time = non_empty(first_text(header, &self.time));
        }

        if let Some(panel) = self.primary.locate(&document) {
            snap.bookmaker_odds = self.runners(panel);
        }

        if let Some(panel) = self.secondary.locate(&document) {
            snap.bookmaker_zero_commission_suspended = panel.select(&self.suspended).next().is_some();
            snap.bookmaker_zero_commission = self.runners(panel);
        }

        if let Some(table) = document.select(&self.fancy_table).next() {
            snap.fancy = table
                .select(&self.fancy_row)
                .filter_map(|row| self.fancy_market(row))
                .collect();
        }

        // No extraction rule exists yet for sessions or the result line.
        snap.sessions = Vec::new();
        snap.result = None;

        snap
    }

    fn runners(&self, panel: ElementRef<'_>) -> BTreeMap<String, TeamOdds> {
        let mut runners = BTreeMap::new();
        for row in panel.select(&self.panel_row) {
            let Some(name) = row.select(&self.runner_name).next() else {
                continue;
            };
            let name = normalize_whitespace(&text_of(name));
            if name.is_empty() {
                continue;
            }
            runners.insert(name, self.team_odds(row));
        }
        runners
    }

    /// Ladder for one runner row. Steps pair back and lay entries by
    /// position; a side with fewer entries leaves the tail steps empty.
    fn team_odds(&self, row: ElementRef<'_>) -> TeamOdds {
        let backs = self.entries(row, &self.back_button, &self.back_size);
        let lays = self.entries(row, &self.lay_button, &self.lay_size);

        let depth = backs.len().max(lays.len());
        let ladder = (0..depth)
            .map(|i| {
                let (back, back_size) = backs.get(i).cloned().unwrap_or_default();
                let (lay, lay_size) = lays.get(i).cloned().unwrap_or_default();
                LadderStep {
                    back,
                    back_size,
                    lay,
                    lay_size,
                }
            })
            .collect();

        TeamOdds {
            best_back: backs.iter().filter_map(|(p, _)| *p).reduce(f64::max),
            best_lay: lays.iter().filter_map(|(p, _)| *p).reduce(f64::min),
            ladder,
        }
    }

    fn entries(
        &self,
        row: ElementRef<'_>,
        button: &Selector,
        size: &Selector,
    ) -> Vec<(Option<f64>, String)> {
        row.select(button)
            .map(|entry| {
                let price = first_text(entry, &self.price_text).and_then(|t| first_float(&t));
                let size = first_text(entry, size).unwrap_or_default();
                (price, size)
            })
            .collect()
    }

    fn fancy_market(&self, row: ElementRef<'_>) -> Option<FancyMarket> {
        let name = normalize_whitespace(&first_text(row, &self.fancy_name)?);
        if name.is_empty() {
            return None;
        }

        Some(FancyMarket {
            name,
            no: first_text(row, &self.fancy_lay_price).and_then(|t| first_float(&t)),
            no_size: first_text(row, &self.fancy_lay_size).unwrap_or_default(),
            yes: first_text(row, &self.fancy_back_price).and_then(|t| first_float(&t)),
            yes_size: first_text(row, &self.fancy_back_size).unwrap_or_default(),
            limits: first_text(row, &self.fancy_limits).map(|t| normalize_whitespace(&t)),
        })
    }
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(text_of)
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}
