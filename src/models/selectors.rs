// src/models/selectors.rs

//! CSS selectors and panel keywords for the exchange markup.

use serde::{Deserialize, Serialize};

/// Selectors used by the lobby and event-page extractors.
///
/// Defaults follow the markup observed on the source site. Each field can be
/// overridden from the `[selectors]` table of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Each listing row on the lobby page
    pub lobby_row: String,
    /// Title cell inside a listing row
    pub lobby_title: String,
    /// Leading timestamp inside the title cell
    pub lobby_time: String,
    /// Live-indicator marker inside a listing row
    pub lobby_live: String,
    /// Outcome cells: team one, draw, team two
    pub lobby_cell_one: String,
    pub lobby_cell_draw: String,
    pub lobby_cell_two: String,

    /// Priced entries
    pub back_button: String,
    pub lay_button: String,
    /// Price text inside a priced entry
    pub price_text: String,
    /// Display size inside a back / lay entry
    pub back_size: String,
    pub lay_size: String,

    /// Any of these means the event page has rendered
    pub content_ready: String,
    /// Event header paragraph holding title and time spans
    pub event_header: String,
    pub event_title: String,
    pub event_time: String,

    /// Market panel container
    pub panel: String,
    /// Header text of a panel
    pub panel_header: String,
    /// Runner rows inside a panel
    pub panel_row: String,
    /// Runner name cell inside a row
    pub runner_name: String,
    /// Structural signal for the primary panel when no header matches
    pub primary_structural: String,
    /// Header keywords for the primary (winner) panel
    pub primary_keywords: Vec<String>,
    /// Header keywords for the secondary (zero commission) panel
    pub secondary_keywords: Vec<String>,
    /// Suspension marker inside a panel
    pub suspended: String,

    /// Fancy market table and its parts
    pub fancy_table: String,
    pub fancy_row: String,
    pub fancy_name: String,
    pub fancy_limits: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            lobby_row: "div.cricket table.game-list-col tbody tr".into(),
            lobby_title: ".event-title".into(),
            lobby_time: ".dtime".into(),
            lobby_live: ".livenownew, .lvnow".into(),
            lobby_cell_one: ".col-visit".into(),
            lobby_cell_draw: ".col-draw".into(),
            lobby_cell_two: ".col-home".into(),

            back_button: "a.btn-back".into(),
            lay_button: "a.btn-lay".into(),
            price_text: "div".into(),
            back_size: ".bid-price-small".into(),
            lay_size: ".ask-price-small".into(),

            content_ready:
                "div.col-centersdetails.markets, table.eventdetails.bets, table.fancytable".into(),
            event_header: "div.col-centersdetails.markets .sub_path.center-box.crname p".into(),
            event_title: "span:nth-of-type(1)".into(),
            event_time: "span:nth-of-type(2)".into(),

            panel: "div.live-match".into(),
            panel_header: ".sub_path.center-box.crname".into(),
            panel_row: "table.eventdetails.bets tbody tr".into(),
            runner_name: ".in-play-title".into(),
            primary_structural: "table.eventdetails.bets tbody tr .in-play-title".into(),
            primary_keywords: vec!["winner".into(), "match odds".into(), "matchodds".into()],
            secondary_keywords: vec!["bookmaker 0 commission".into(), "bookmaker".into()],
            suspended: ".suspended-event".into(),

            fancy_table: "table.fancytable".into(),
            fancy_row: "tbody > tr".into(),
            fancy_name: ".marketnamemobile".into(),
            fancy_limits: ".min-max-price".into(),
        }
    }
}

impl SiteSelectors {
    /// Every selector string with its field name, for validation.
    pub fn all(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("lobby_row", &self.lobby_row),
            ("lobby_title", &self.lobby_title),
            ("lobby_time", &self.lobby_time),
            ("lobby_live", &self.lobby_live),
            ("lobby_cell_one", &self.lobby_cell_one),
            ("lobby_cell_draw", &self.lobby_cell_draw),
            ("lobby_cell_two", &self.lobby_cell_two),
            ("back_button", &self.back_button),
            ("lay_button", &self.lay_button),
            ("price_text", &self.price_text),
            ("back_size", &self.back_size),
            ("lay_size", &self.lay_size),
            ("content_ready", &self.content_ready),
            ("event_header", &self.event_header),
            ("event_title", &self.event_title),
            ("event_time", &self.event_time),
            ("panel", &self.panel),
            ("panel_header", &self.panel_header),
            ("panel_row", &self.panel_row),
            ("runner_name", &self.runner_name),
            ("primary_structural", &self.primary_structural),
            ("suspended", &self.suspended),
            ("fancy_table", &self.fancy_table),
            ("fancy_row", &self.fancy_row),
            ("fancy_name", &self.fancy_name),
            ("fancy_limits", &self.fancy_limits),
        ]
    }
}
