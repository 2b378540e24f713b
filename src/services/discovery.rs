//! Event id discovery.
//!
//! Mines a JSON document of unknown shape for plausible event ids. The
//! upstream document has no published schema and has shipped at least two
//! incompatible layouts, so several independent paths lead to a candidate
//! and every node is type-checked before use. Malformed input just yields
//! fewer ids.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::models::EventId;

/// Field names (lowercased) whose scalar value may be an event id.
const ID_FIELDS: [&str; 6] = [
    "eventid",
    "event_id",
    "event_id_pk",
    "eventpk",
    "eventpkid",
    "id",
];

/// Spellings tried, in order, for the id inside an `"event"` object.
const NESTED_ID_FIELDS: [&str; 3] = ["id", "eventId", "event_id"];

/// Collect every plausible event id in `document`.
///
/// The result is deduplicated and sorted, so truncating it to a fixed count
/// picks the same ids on every call for the same document.
pub fn collect_event_ids(document: &Value) -> Vec<EventId> {
    let mut bucket = BTreeSet::new();
    visit(document, &mut bucket);

    // Older layout: {"events": {"<id>": {...}}}
    if let Some(Value::Object(events)) = document.get("events") {
        for key in events.keys() {
            bucket.extend(EventId::parse(key));
        }
    }

    bucket.into_iter().collect()
}

fn visit(node: &Value, bucket: &mut BTreeSet<EventId>) {
    match node {
        Value::Object(map) => visit_object(map, bucket),
        Value::Array(items) => {
            for item in items {
                visit(item, bucket);
            }
        }
        _ => {}
    }
}

fn visit_object(map: &Map<String, Value>, bucket: &mut BTreeSet<EventId>) {
    // {"34848333": {...}}
    for key in map.keys() {
        bucket.extend(EventId::parse(key));
    }

    for (key, value) in map {
        let key = key.to_lowercase();

        if ID_FIELDS.contains(&key.as_str()) {
            bucket.extend(scalar_id(value));
        }

        // {"event": {"id": 34848333}}
        if key == "event" {
            if let Value::Object(inner) = value {
                bucket.extend(nested_id(inner).and_then(scalar_id));
            }
        }

        visit(value, bucket);
    }
}

/// The id-like field of an `"event"` object: `id` if present, otherwise the
/// first non-null alternate spelling.
fn nested_id(inner: &Map<String, Value>) -> Option<&Value> {
    if let Some(id) = inner.get(NESTED_ID_FIELDS[0]) {
        return Some(id);
    }
    NESTED_ID_FIELDS[1..]
        .iter()
        .filter_map(|field| inner.get(*field))
        .find(|value| !value.is_null())
}

/// Strings and integers may carry an id; nothing else does.
fn scalar_id(value: &Value) -> Option<EventId> {
    match value {
        Value::String(s) => EventId::parse(s),
        Value::Number(n) if n.is_u64() || n.is_i64() => EventId::parse(&n.to_string()),
        _ => None,
    }
}
