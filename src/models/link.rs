use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A saved bookmark as returned by the API.
///
/// `tags` is not a column of `links`; the store fills it from `link_tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub url: String,
    pub title: String,
    pub notes: Option<String>,
    #[sqlx(skip)]
    #[serde(default)]
    pub tags: Vec<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: String,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: String,
}

/// Input for creating a link. Also the record shape of an import file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Partial update of a link. `None` leaves a field untouched.
///
/// `notes: Some(None)` clears the notes; `tags: Some(vec![])` removes every tag.
#[derive(Debug, Clone, Default)]
pub struct LinkUpdate {
    pub title: Option<String>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl LinkUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.notes.is_none() && self.tags.is_none()
    }
}

/// Current time in the stored timestamp format (`2024-01-31T12:00:00.000Z`).
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

/// Timestamp for a modification of a row last touched at `previous`. Always
/// later than `previous`, even within the same millisecond.
pub fn next_timestamp(previous: &str) -> String {
    let now = Utc::now();
    match DateTime::parse_from_rfc3339(previous) {
        Ok(prev) if prev.with_timezone(&Utc) >= now => {
            format_timestamp(prev.with_timezone(&Utc) + TimeDelta::milliseconds(1))
        }
        _ => format_timestamp(now),
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a client-supplied RFC 3339 timestamp and normalises it to UTC so that
/// string ordering in SQL matches chronological ordering.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| format_timestamp(at.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_serializes_with_camel_case_keys() {
        let link = Link {
            id: "1".to_string(),
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            notes: None,
            tags: vec!["rust".to_string()],
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-02T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["updatedAt"], "2024-01-02T00:00:00.000Z");
        assert_eq!(json["tags"][0], "rust");
        assert!(json["notes"].is_null());
    }

    #[test]
    fn normalize_timestamp_converts_offsets_to_utc() {
        assert_eq!(
            normalize_timestamp("2024-03-01T10:00:00+02:00").as_deref(),
            Some("2024-03-01T08:00:00.000Z")
        );
        assert_eq!(normalize_timestamp("yesterday"), None);
    }

    #[test]
    fn next_timestamp_moves_past_a_previous_value_in_the_future() {
        let previous = format_timestamp(Utc::now() + TimeDelta::seconds(60));
        let next = next_timestamp(&previous);
        assert!(next > previous);
    }

    #[test]
    fn next_timestamp_uses_now_for_older_values() {
        let before = timestamp_now();
        let next = next_timestamp("2024-01-01T00:00:00.000Z");
        assert!(next >= before);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(LinkUpdate::default().is_empty());
        let update = LinkUpdate {
            notes: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
