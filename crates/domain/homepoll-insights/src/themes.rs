//! Keyword-frequency extraction from improvement notes.
//!
//! Deliberately naive: lowercase the note, test each stemmed keyword
//! for substring containment, count one hit per note per keyword.
//! "renovated" matches "renovate", "landscaping" matches "landscape".

use crate::distribution::Distribution;
use homepoll_core::SurveyRecord;

/// The fixed stem list. Part of the external contract with the stored
/// data; order only breaks count ties.
pub const THEME_KEYWORDS: [&str; 14] = [
    "kitchen", "bathroom", "paint", "floor", "roof", "yard", "landscape", "update", "renovate",
    "clean", "repair", "modern", "curb", "appeal",
];

const TOP_THEMES: usize = 5;

/// Top keyword themes across all non-blank notes, capitalized, count
/// descending, capped at five. Keywords no note mentions are omitted.
pub fn improvement_themes(records: &[SurveyRecord]) -> Vec<Distribution> {
    let notes: Vec<String> = records
        .iter()
        .filter_map(|record| record.improvement_note.as_deref())
        .filter(|note| !note.trim().is_empty())
        .map(str::to_lowercase)
        .collect();

    let mut themes: Vec<Distribution> = THEME_KEYWORDS
        .iter()
        .map(|keyword| Distribution {
            label: capitalize(keyword),
            count: notes.iter().filter(|note| note.contains(keyword)).count(),
        })
        .filter(|theme| theme.count > 0)
        .collect();

    themes.sort_by(|a, b| b.count.cmp(&a.count));
    themes.truncate(TOP_THEMES);
    themes
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
