//! Utility functions and helpers.

pub mod http;
pub mod retry;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::error::{AppError, Result};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\-]+").expect("valid regex"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("valid regex"));

/// Normalize free text into a join key.
///
/// Whitespace runs become single dashes, anything other than ASCII
/// alphanumerics and dashes is dropped, dash runs collapse, and edge dashes
/// are trimmed. Case is preserved.
pub fn slugify(text: &str) -> String {
    let dashed = WHITESPACE.replace_all(text.trim(), "-");
    let stripped = NON_SLUG.replace_all(&dashed, "");
    let collapsed = DASHES.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// First decimal number in `text`, reading `,` as a decimal point.
pub fn first_float(text: &str) -> Option<f64> {
    let text = text.replace(',', ".");
    NUMBER.find(&text).and_then(|m| m.as_str().parse().ok())
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed text content of an element.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
