//! Aggregation engine for the admin dashboard.
//!
//! Pure, read-only transformations over an in-memory snapshot of the
//! record set, fetched once. Nothing here touches the store; a failed
//! bulk fetch means the caller shows an error panel instead of calling
//! in with partial data.

pub mod distribution;
pub mod themes;
pub mod timefmt;

pub use distribution::{
    best_feature_distribution, percent_of_max, price_range_distribution, Distribution,
};
pub use themes::{improvement_themes, THEME_KEYWORDS};
pub use timefmt::{phoenix_time, INVALID_DATE};

use homepoll_core::SurveyRecord;

/// Records carrying a non-blank improvement note, in the order given
/// (the admin view passes records newest first).
pub fn comment_records(records: &[SurveyRecord]) -> Vec<&SurveyRecord> {
    records
        .iter()
        .filter(|record| {
            record
                .improvement_note
                .as_deref()
                .is_some_and(|note| !note.trim().is_empty())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn with_note(note: Option<&str>) -> SurveyRecord {
        SurveyRecord {
            id: Uuid::new_v4(),
            created_at: None,
            initial_range: "$501k–$600k".into(),
            specific_price: None,
            best_feature: None,
            improvement_note: note.map(String::from),
            agent_email: None,
            session_token: None,
        }
    }

    #[test]
    fn blank_and_missing_notes_are_not_comments() {
        let records = vec![
            with_note(Some("fix the roof")),
            with_note(None),
            with_note(Some("   ")),
            with_note(Some("paint")),
        ];
        let comments = comment_records(&records);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].improvement_note.as_deref(), Some("fix the roof"));
    }
}
