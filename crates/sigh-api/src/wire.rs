//! Helpers for the permissive wire formats the endpoints accept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Deserialiser for patch fields where absent and `null` mean different
/// things. Plain `Option<Option<T>>` folds `null` into the outer `None`;
/// wrapping the inner value keeps `null` as `Some(None)` so it can clear the
/// column. Use with `#[serde(default, deserialize_with = ...)]`.
pub(crate) fn double_option<'de, D, T>(
  de: D,
) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Deserialize::deserialize(de).map(Some)
}

/// Parse an RFC 3339 timestamp if one was actually sent; anything absent,
/// blank, or unparseable comes back as `None` and the caller picks the
/// fallback.
pub(crate) fn parse_ts(value: Option<&str>) -> Option<DateTime<Utc>> {
  let raw = value?.trim();
  if raw.is_empty() {
    return None;
  }
  DateTime::parse_from_rfc3339(raw)
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

/// Normalise an optional string field: whitespace-only collapses to `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
  value.and_then(|s| {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
  })
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  #[test]
  fn parses_rfc3339() {
    let parsed = parse_ts(Some("2024-05-01T12:00:00Z")).unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
  }

  #[test]
  fn garbage_and_blank_become_none() {
    assert!(parse_ts(Some("yesterday")).is_none());
    assert!(parse_ts(Some("  ")).is_none());
    assert!(parse_ts(None).is_none());
  }

  #[test]
  fn double_option_keeps_null_distinct_from_absent() {
    #[derive(serde::Deserialize)]
    struct Patch {
      #[serde(default, deserialize_with = "double_option")]
      notes: Option<Option<String>>,
    }

    let absent: Patch = serde_json::from_str("{}").unwrap();
    assert_eq!(absent.notes, None);
    let cleared: Patch = serde_json::from_str(r#"{"notes":null}"#).unwrap();
    assert_eq!(cleared.notes, Some(None));
    let set: Patch = serde_json::from_str(r#"{"notes":"hi"}"#).unwrap();
    assert_eq!(set.notes, Some(Some("hi".to_string())));
  }

  #[test]
  fn non_empty_trims() {
    assert_eq!(non_empty(Some("  x  ".to_string())), Some("x".to_string()));
    assert_eq!(non_empty(Some("   ".to_string())), None);
    assert_eq!(non_empty(None), None);
  }
}
