//! Count distributions for the admin charts.

use homepoll_core::{SurveyRecord, PRICE_BANDS};
use serde::Serialize;
use std::collections::HashMap;

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub label: String,
    pub count: usize,
}

/// Counts per fixed band, in enumeration order (not sorted by count).
/// Records with an unrecognized or absent band are silently excluded;
/// there is no "other" bucket.
pub fn price_range_distribution(records: &[SurveyRecord]) -> Vec<Distribution> {
    let mut counts = [0usize; PRICE_BANDS.len()];
    for record in records {
        if let Some(slot) = PRICE_BANDS.iter().position(|band| band.label == record.initial_range) {
            counts[slot] += 1;
        }
    }
    PRICE_BANDS
        .iter()
        .zip(counts)
        .map(|(band, count)| Distribution { label: band.label.to_string(), count })
        .collect()
}

/// Counts of each distinct stored feature string (open set, anything a
/// row carries counts), sorted by count descending. Ties keep no
/// guaranteed secondary order.
pub fn best_feature_distribution(records: &[SurveyRecord]) -> Vec<Distribution> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if let Some(feature) = record.best_feature.as_deref() {
            if !feature.is_empty() {
                *counts.entry(feature).or_default() += 1;
            }
        }
    }
    let mut bars: Vec<Distribution> = counts
        .into_iter()
        .map(|(label, count)| Distribution { label: label.to_string(), count })
        .collect();
    bars.sort_by(|a, b| b.count.cmp(&a.count));
    bars
}

/// Bar width as a percentage of the largest count (floor 1 so an empty
/// chart renders zero-width bars instead of dividing by zero).
pub fn percent_of_max(bars: &[Distribution], count: usize) -> f64 {
    let max = bars.iter().map(|bar| bar.count).max().unwrap_or(0).max(1);
    (count as f64 / max as f64) * 100.0
}
