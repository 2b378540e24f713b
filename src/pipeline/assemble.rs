// src/pipeline/assemble.rs

//! Snapshot assembly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{EventId, EventSnapshot, LiveDetail, LobbyRow, Payload};

/// Build the cycle's payload from its parts.
///
/// `live_details` is keyed by the slug recomputed from each event title. No
/// lookup against the lobby happens here; the join is purely by equal slugs.
/// When two events produce the same slug the one with the greater id wins.
pub fn assemble(
    fetched_at: DateTime<Utc>,
    lobby: Vec<LobbyRow>,
    events: Vec<(EventId, EventSnapshot)>,
) -> Payload {
    let events: BTreeMap<String, EventSnapshot> = events
        .into_iter()
        .map(|(id, snap)| (id.to_string(), snap))
        .collect();

    let mut live_details = BTreeMap::new();
    for (id, snap) in &events {
        if let Some(slug) = snap.join_slug() {
            live_details.insert(slug, LiveDetail::from_snapshot(id, snap));
        }
    }

    Payload {
        fetched_at,
        lobby,
        events,
        live_details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(title: Option<&str>) -> EventSnapshot {
        EventSnapshot {
            title: title.map(String::from),
            ..EventSnapshot::placeholder("https://x/e")
        }
    }

    fn id(raw: &str) -> EventId {
        EventId::parse(raw).unwrap()
    }

    #[test]
    fn test_events_and_details() {
        let payload = assemble(
            Utc::now(),
            Vec::new(),
            vec![
                (id("10001"), snap(Some("India v Australia - 1st ODI"))),
                (id("10002"), snap(None)),
            ],
        );

        assert_eq!(payload.events.len(), 2);
        assert_eq!(payload.live_details.len(), 1);
        assert_eq!(payload.live_details["India-v-Australia"].event_id, "10001");
    }

    #[test]
    fn test_slug_collision_keeps_greater_id() {
        let payload = assemble(
            Utc::now(),
            Vec::new(),
            vec![
                (id("20002"), snap(Some("A v B - Women"))),
                (id("20001"), snap(Some("A v B"))),
            ],
        );

        assert_eq!(payload.events.len(), 2);
        assert_eq!(payload.live_details["A-v-B"].event_id, "20002");
    }

    #[test]
    fn test_empty_cycle() {
        let payload = assemble(Utc::now(), Vec::new(), Vec::new());
        assert!(payload.events.is_empty());
        assert!(payload.live_details.is_empty());
    }
}
