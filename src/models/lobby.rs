//! Lobby listing rows.

use serde::{Deserialize, Serialize};

/// Best `(back, lay)` pair shown for one outcome.
pub type PricePair = (Option<f64>, Option<f64>);

/// Match status as shown on the lobby.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
}

/// One match row of the lobby listing, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LobbyRow {
    /// Slug of `"<team a> v <team b>"`
    pub match_id: String,

    /// `"<time> | <team a> v <team b>"`
    pub title: String,

    /// The two team names
    pub teams: Vec<String>,

    /// Leading timestamp text, if any
    pub starts_at: Option<String>,

    pub status: MatchStatus,

    /// Outcome prices: team one, draw, team two
    pub one: PricePair,
    pub draw: PricePair,
    pub two: PricePair,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_serializes_pairs_as_arrays() {
        let row = LobbyRow {
            match_id: "India-v-Australia".into(),
            title: "Today 14:00 | India v Australia".into(),
            teams: vec!["India".into(), "Australia".into()],
            starts_at: Some("Today 14:00".into()),
            status: MatchStatus::Live,
            one: (Some(1.95), Some(2.1)),
            draw: (None, None),
            two: (Some(2.0), None),
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["status"], "live");
        assert_eq!(value["one"], serde_json::json!([1.95, 2.1]));
        assert_eq!(value["draw"], serde_json::json!([null, null]));
    }
}
