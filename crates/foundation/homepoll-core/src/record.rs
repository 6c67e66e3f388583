//! The persisted survey record and its wire shapes.
//!
//! One row per survey session in the shared `responses` table. Created
//! once (landing redirect or step 1), mutated at most once (step 3),
//! never deleted by the application.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A stored survey response row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Assigned by the store on insert.
    pub id: Uuid,
    /// Assigned by the store on insert; `None` when the wire value is
    /// absent or unparseable.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// One of the three fixed band strings; set at creation, never rewritten.
    pub initial_range: String,
    /// $20k sub-band, set only in step 3.
    #[serde(default)]
    pub specific_price: Option<String>,
    /// One of the five feature options, set only in step 3.
    #[serde(default)]
    pub best_feature: Option<String>,
    /// Free-text note, set only in step 3.
    #[serde(default)]
    pub improvement_note: Option<String>,
    /// Correlates a visitor's records across steps.
    #[serde(default)]
    pub agent_email: Option<String>,
    /// Opaque per-visit token, preferred correlation key when present.
    #[serde(default)]
    pub session_token: Option<String>,
}

/// Insert payload. `id` and `created_at` are store-assigned and never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecord {
    pub initial_range: String,
    pub agent_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_feature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_note: Option<String>,
}

impl NewRecord {
    /// The record written at landing or step 1: a band choice plus
    /// whatever identity the URL carried.
    pub fn initial(
        range: impl Into<String>,
        agent_email: Option<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            initial_range: range.into(),
            agent_email,
            session_token,
            specific_price: None,
            best_feature: None,
            improvement_note: None,
        }
    }

    /// The step-3 fallback insert: used only when no prior record can be
    /// located, combining the resolved range with the follow-up answers.
    pub fn with_followup(mut self, patch: RecordPatch) -> Self {
        self.specific_price = Some(patch.specific_price);
        self.best_feature = Some(patch.best_feature);
        self.improvement_note = patch.improvement_note;
        self
    }
}

/// The single atomic step-3 update. `initial_range` is not part of the
/// patch, so a committed band choice cannot be rewritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPatch {
    pub specific_price: String,
    pub best_feature: String,
    /// Serialized even when `None` so a blank note clears to null.
    pub improvement_note: Option<String>,
}

/// Accept RFC 3339 or a bare `YYYY-MM-DDTHH:MM:SS[.f]` (treated as UTC);
/// anything else, including non-string JSON values, becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = raw else {
        return Ok(None);
    };
    Ok(parse_timestamp(&text))
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_full_wire_row() {
        let row: SurveyRecord = serde_json::from_str(
            r#"{
                "id": "7f2c1a90-0c64-4e0f-9d3a-6f6f3a6a2b11",
                "created_at": "2025-01-05T22:04:00+00:00",
                "initial_range": "$501k–$600k",
                "specific_price": "$521k–$540k",
                "best_feature": "Layout",
                "improvement_note": "needs paint",
                "agent_email": "a@x.com",
                "session_token": "tok-1"
            }"#,
        )
        .unwrap();
        assert_eq!(row.initial_range, "$501k–$600k");
        assert_eq!(row.best_feature.as_deref(), Some("Layout"));
        assert!(row.created_at.is_some());
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let row: SurveyRecord = serde_json::from_str(
            r#"{"id": "7f2c1a90-0c64-4e0f-9d3a-6f6f3a6a2b11", "initial_range": "$401k–$500k"}"#,
        )
        .unwrap();
        assert!(row.created_at.is_none());
        assert!(row.specific_price.is_none());
        assert!(row.agent_email.is_none());
    }

    #[test]
    fn garbage_timestamps_become_none_not_errors() {
        for bad in ["\"not a date\"", "\"2025-99-99\"", "12345", "null", "{}"] {
            let json = format!(
                r#"{{"id": "7f2c1a90-0c64-4e0f-9d3a-6f6f3a6a2b11", "created_at": {bad}, "initial_range": "$501k–$600k"}}"#
            );
            let row: SurveyRecord = serde_json::from_str(&json).unwrap();
            assert!(row.created_at.is_none(), "expected None for {bad}");
        }
    }

    #[test]
    fn naive_postgres_timestamps_parse_as_utc() {
        let row: SurveyRecord = serde_json::from_str(
            r#"{"id": "7f2c1a90-0c64-4e0f-9d3a-6f6f3a6a2b11", "created_at": "2025-01-05T22:04:00.123456", "initial_range": "$501k–$600k"}"#,
        )
        .unwrap();
        let ts = row.created_at.unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-01-05T22:04:00.123456+00:00");
    }

    #[test]
    fn initial_insert_omits_followup_fields() {
        let new = NewRecord::initial("$601k–$700k", Some("a@x.com".into()), None);
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["initial_range"], "$601k–$700k");
        assert_eq!(json["agent_email"], "a@x.com");
        assert!(json.get("specific_price").is_none());
        assert!(json.get("session_token").is_none());
    }

    #[test]
    fn blank_email_still_serializes_as_null() {
        let new = NewRecord::initial("$601k–$700k", None, None);
        let json = serde_json::to_value(&new).unwrap();
        assert!(json["agent_email"].is_null());
    }

    #[test]
    fn patch_serializes_a_cleared_note_as_null() {
        let patch = RecordPatch {
            specific_price: "$521k–$540k".into(),
            best_feature: "Layout".into(),
            improvement_note: None,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert!(json["improvement_note"].is_null());
        assert_eq!(json["specific_price"], "$521k–$540k");
    }

    #[test]
    fn fallback_insert_carries_range_and_followup_together() {
        let new = NewRecord::initial("$501k–$600k", None, Some("tok".into())).with_followup(
            RecordPatch {
                specific_price: "$541k–$560k".into(),
                best_feature: "Price".into(),
                improvement_note: Some("paint the kitchen".into()),
            },
        );
        assert_eq!(new.initial_range, "$501k–$600k");
        assert_eq!(new.specific_price.as_deref(), Some("$541k–$560k"));
        assert_eq!(new.improvement_note.as_deref(), Some("paint the kitchen"));
    }
}
