//! Serialization-boundary hygiene for the durable store.
//!
//! The document store cannot represent "absent" values inside a document,
//! so `null` map entries are stripped recursively before a write instead of
//! failing the whole entry. On the way back out, stored timestamps are
//! parsed defensively: reads repair a malformed value by substituting the
//! current instant (with a warning) rather than discarding the row.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

/// Recursively sanitize a value for storage.
///
/// Returns `None` for `null` (the entry is dropped from its parent map);
/// arrays and objects are sanitized element-wise. `null` elements inside
/// arrays are kept as `null`, since positions matter there.
#[must_use]
pub fn sanitize_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => Some(Value::Object(sanitize_map(map))),
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .map(|v| sanitize_value(v).unwrap_or(Value::Null))
                .collect(),
        )),
        other => Some(other.clone()),
    }
}

/// Sanitize every entry of a map, dropping `null` values.
#[must_use]
pub fn sanitize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter_map(|(k, v)| sanitize_value(v).map(|v| (k.clone(), v)))
        .collect()
}

/// Parse a stored timestamp, accepting RFC 3339 text, integer epoch
/// seconds, or fractional epoch seconds. Anything unparseable falls back to
/// the current instant with a warning; reads never fail on a timestamp.
#[must_use]
pub fn parse_timestamp_lossy(raw: &Value) -> DateTime<Utc> {
    let parsed = match raw {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                DateTime::from_timestamp(secs, 0)
            } else {
                n.as_f64().and_then(|secs| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let (whole, nanos) = (secs.trunc() as i64, (secs.fract() * 1e9) as u32);
                    DateTime::from_timestamp(whole, nanos)
                })
            }
        }
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        warn!(?raw, "unparseable stored timestamp, substituting now");
        Utc::now()
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_map_entries_are_dropped() {
        let map = json!({"keep": 1, "drop": null})
            .as_object()
            .unwrap()
            .clone();
        let clean = sanitize_map(&map);
        assert_eq!(clean.len(), 1);
        assert_eq!(clean["keep"], 1);
    }

    #[test]
    fn nested_objects_are_sanitized_recursively() {
        let map = json!({"outer": {"inner": null, "ok": true}})
            .as_object()
            .unwrap()
            .clone();
        let clean = sanitize_map(&map);
        assert_eq!(clean["outer"], json!({"ok": true}));
    }

    #[test]
    fn array_positions_are_preserved() {
        let value = json!([1, null, {"x": null, "y": 2}]);
        let clean = sanitize_value(&value).unwrap();
        assert_eq!(clean, json!([1, null, {"y": 2}]));
    }

    #[test]
    fn scalars_pass_through() {
        for v in [json!(42), json!("text"), json!(true), json!(1.5)] {
            assert_eq!(sanitize_value(&v), Some(v.clone()));
        }
        assert_eq!(sanitize_value(&Value::Null), None);
    }

    #[test]
    fn rfc3339_timestamp_parses() {
        let ts = parse_timestamp_lossy(&json!("2026-03-01T12:30:00Z"));
        assert_eq!(ts.to_rfc3339(), "2026-03-01T12:30:00+00:00");
    }

    #[test]
    fn integer_seconds_parse() {
        let ts = parse_timestamp_lossy(&json!(1_700_000_000));
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn fractional_seconds_parse() {
        let ts = parse_timestamp_lossy(&json!(1_700_000_000.5));
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert!(ts.timestamp_subsec_millis() >= 499);
    }

    #[test]
    fn garbage_falls_back_to_now() {
        let before = Utc::now();
        let ts = parse_timestamp_lossy(&json!("not a date"));
        assert!(ts >= before - chrono::Duration::seconds(1));

        let ts = parse_timestamp_lossy(&json!({"weird": true}));
        assert!(ts >= before - chrono::Duration::seconds(1));
    }
}
