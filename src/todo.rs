//! The todo record and the rules every stored record obeys.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A single task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// A fresh, incomplete todo. `text` must already be cleaned with [`clean_text`].
    pub fn new(id: u64, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            // Stored precision matches the wire format, so a record reads
            // back exactly as it was returned.
            created_at: now.trunc_subsecs(3),
        }
    }
}

/// Trims `raw`; `None` when absent or blank.
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Next id: the current time in milliseconds, bumped past both the largest
/// stored id and `last_issued` when the clock has not moved on. Passing the
/// last id handed out keeps a deleted newest todo's id from coming back.
///
/// `None` once `u64::MAX` is taken; no unused id above it remains.
pub fn next_id(todos: &[Todo], last_issued: u64, now: DateTime<Utc>) -> Option<u64> {
    let clock = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let floor = todos.iter().map(|t| t.id).max().unwrap_or(0).max(last_issued);
    floor.checked_add(1).map(|after| clock.max(after))
}

/// `createdAt` as RFC 3339 UTC with milliseconds, e.g. `2024-05-01T12:00:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn clean_text_trims_and_rejects_blank() {
        assert_eq!(clean_text(Some("  Spaced  ")), Some("Spaced".to_owned()));
        assert_eq!(clean_text(Some("   ")), None);
        assert_eq!(clean_text(Some("")), None);
        assert_eq!(clean_text(None), None);
    }

    #[test]
    fn serializes_with_camel_case_and_millis() {
        let todo = Todo::new(7, "Buy milk".into(), at(1_714_564_800_000));
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "text": "Buy milk",
                "completed": false,
                "createdAt": "2024-05-01T12:00:00.000Z",
            })
        );
        let back: Todo = serde_json::from_value(json).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn next_id_follows_clock_and_never_goes_backwards() {
        assert_eq!(next_id(&[], 0, at(5_000)), Some(5_000));
        assert_eq!(next_id(&[], 0, at(0)), Some(1));

        let todos = vec![Todo::new(9_000, "a".into(), at(0))];
        assert_eq!(next_id(&todos, 0, at(5_000)), Some(9_001));
        assert_eq!(next_id(&todos, 0, at(10_000)), Some(10_000));
    }

    #[test]
    fn next_id_skips_past_last_issued() {
        assert_eq!(next_id(&[], 5_000, at(5_000)), Some(5_001));
    }

    #[test]
    fn next_id_is_none_when_max_id_is_taken() {
        let todos = vec![Todo::new(u64::MAX, "last".into(), at(0))];
        assert_eq!(next_id(&todos, 0, at(5_000)), None);
        assert_eq!(next_id(&[], u64::MAX, at(5_000)), None);
    }
}
