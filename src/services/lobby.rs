// src/services/lobby.rs

//! Lobby listing extractor.
//!
//! Turns the listing page markup into [`LobbyRow`]s, in document order.

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{LobbyRow, MatchStatus, PricePair, SiteSelectors};
use crate::utils::{first_float, normalize_whitespace, parse_selector, slugify, text_of};

/// Separator between the two team names of a match title.
const VERSUS: &str = " v ";

/// Extracts match rows from the lobby page.
pub struct LobbyExtractor {
    row: Selector,
    title: Selector,
    time: Selector,
    live: Selector,
    cell_one: Selector,
    cell_draw: Selector,
    cell_two: Selector,
    back_button: Selector,
    lay_button: Selector,
    price_text: Selector,
}

impl LobbyExtractor {
    pub fn new(selectors: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            row: parse_selector(&selectors.lobby_row)?,
            title: parse_selector(&selectors.lobby_title)?,
            time: parse_selector(&selectors.lobby_time)?,
            live: parse_selector(&selectors.lobby_live)?,
            cell_one: parse_selector(&selectors.lobby_cell_one)?,
            cell_draw: parse_selector(&selectors.lobby_cell_draw)?,
            cell_two: parse_selector(&selectors.lobby_cell_two)?,
            back_button: parse_selector(&selectors.back_button)?,
            lay_button: parse_selector(&selectors.lay_button)?,
            price_text: parse_selector(&selectors.price_text)?,
        })
    }

    /// Extract up to `max_rows` match rows, keeping the first ones in
    /// document order.
    pub fn extract(&self, html: &str, max_rows: usize) -> Vec<LobbyRow> {
        let document = Html::parse_document(html);
        let mut rows = Vec::new();

        for element in document.select(&self.row) {
            if rows.len() >= max_rows {
                break;
            }
            if let Some(row) = self.parse_row(element) {
                rows.push(row);
            }
        }

        rows
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Option<LobbyRow> {
        let title_elem = row.select(&self.title).next()?;

        let starts_at = title_elem
            .select(&self.time)
            .next()
            .map(|el| normalize_whitespace(&text_of(el)))
            .unwrap_or_default();
        let starts_at = starts_at.trim_end_matches('|').trim().to_string();

        let full = normalize_whitespace(&text_of(title_elem));
        let mut matchup = full.as_str();
        if !starts_at.is_empty() {
            if let Some(rest) = matchup.strip_prefix(starts_at.as_str()) {
                matchup = rest.trim().trim_start_matches('|').trim();
            }
        }

        // Section headers and other non-match rows have no versus separator.
        let (team_a, team_b) = matchup.split_once(VERSUS)?;
        let (team_a, team_b) = (team_a.trim(), team_b.trim());

        let status = if row.select(&self.live).next().is_some() {
            MatchStatus::Live
        } else {
            MatchStatus::Scheduled
        };

        Some(LobbyRow {
            match_id: slugify(&format!("{team_a}{VERSUS}{team_b}")),
            title: format!("{starts_at} | {team_a}{VERSUS}{team_b}"),
            teams: vec![team_a.to_string(), team_b.to_string()],
            starts_at: (!starts_at.is_empty()).then_some(starts_at),
            status,
            one: self.cell_prices(row, &self.cell_one),
            draw: self.cell_prices(row, &self.cell_draw),
            two: self.cell_prices(row, &self.cell_two),
        })
    }

    fn cell_prices(&self, row: ElementRef<'_>, cell: &Selector) -> PricePair {
        row.select(cell)
            .next()
            .map(|cell| self.best_from_cell(cell))
            .unwrap_or((None, None))
    }

    /// Best back is the last readable back price in the cell, best lay the
    /// first readable lay price. This matches the order the source renders
    /// its depth in and must stay asymmetric.
    fn best_from_cell(&self, cell: ElementRef<'_>) -> PricePair {
        let back = self.prices(cell, &self.back_button).last();
        let lay = self.prices(cell, &self.lay_button).next();
        (back, lay)
    }

    fn prices<'a>(
        &'a self,
        cell: ElementRef<'a>,
        button: &'a Selector,
    ) -> impl Iterator<Item = f64> + 'a {
        cell.select(button)
            .flat_map(|entry| entry.select(&self.price_text))
            .filter_map(|el| first_float(&text_of(el)))
    }
}
