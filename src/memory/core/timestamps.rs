//! Timestamp normalization for stored records.
//!
//! Archives carry creation times as epoch seconds, usually JSON floats with a
//! fractional part, occasionally numeric strings. The store wants second
//! precision ISO-8601 UTC strings with a literal `Z`.

use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;

/// Format used for `created_at` / `last_accessed_at`.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a UTC instant the way the store expects it.
#[must_use]
pub fn format_iso(instant: DateTime<Utc>) -> String {
    instant.format(ISO_FORMAT).to_string()
}

/// The current time in store format.
#[must_use]
pub fn now_iso() -> String {
    format_iso(Utc::now())
}

/// Normalize an epoch-seconds value to an ISO-8601 UTC string.
///
/// Missing, non-numeric, non-finite or out-of-range values fall back to the
/// current time. This never fails.
#[must_use]
pub fn to_iso(value: Option<&Value>) -> String {
    value
        .and_then(epoch_seconds)
        .and_then(from_epoch_seconds)
        .map_or_else(now_iso, format_iso)
}

/// Whether a raw timestamp should be used at all.
///
/// `null`, `false`, `0` and empty strings count as unset, so a zeroed message
/// time falls through to the conversation time.
#[must_use]
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn epoch_seconds(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let instant = DateTime::from_timestamp(whole as i64, 0)?;
    (1..=9999).contains(&instant.year()).then_some(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_well_formed(iso: &str) {
        assert_eq!(iso.len(), 20, "unexpected shape: {iso}");
        assert!(iso.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(iso).is_ok(), "not rfc3339: {iso}");
    }

    #[test]
    fn test_to_iso_formats_epoch_seconds() {
        assert_eq!(to_iso(Some(&json!(0))), "1970-01-01T00:00:00Z");
        assert_eq!(to_iso(Some(&json!(1_700_000_000))), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_to_iso_truncates_fraction() {
        assert_eq!(
            to_iso(Some(&json!(1_700_000_000.987_654))),
            "2023-11-14T22:13:20Z"
        );
    }

    #[test]
    fn test_to_iso_accepts_numeric_strings() {
        assert_eq!(to_iso(Some(&json!(" 1700000000 "))), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_to_iso_handles_pre_epoch() {
        assert_eq!(to_iso(Some(&json!(-1.5))), "1969-12-31T23:59:58Z");
    }

    #[test]
    fn test_to_iso_falls_back_to_now() {
        let before = Utc::now().timestamp();
        for value in [
            None,
            Some(json!("not-a-number")),
            Some(json!(null)),
            Some(json!(true)),
            Some(json!({"seconds": 1})),
            Some(json!(1e300)),
            Some(json!("NaN")),
        ] {
            let iso = to_iso(value.as_ref());
            assert_well_formed(&iso);
            let parsed = DateTime::parse_from_rfc3339(&iso).unwrap().timestamp();
            assert!(parsed >= before - 1, "expected now-ish, got {iso}");
        }
    }

    #[test]
    fn test_is_set_treats_zero_and_empty_as_unset() {
        assert!(!is_set(&json!(null)));
        assert!(!is_set(&json!(0)));
        assert!(!is_set(&json!(0.0)));
        assert!(!is_set(&json!("")));
        assert!(is_set(&json!(1_700_000_000.5)));
        assert!(is_set(&json!("garbage")));
    }
}
