//! $20k sub-band generation for the step-3 "more specific range" question.

use homepoll_core::PriceBand;

/// Partition a top-level band into contiguous $20k sub-ranges starting
/// at the band's lower bound, the final sub-range clipped to the upper
/// bound. Input is matched loosely (exact label or both boundary
/// numbers); unrecognized strings get the `$501k–$600k` partition.
pub fn price_increments(range: &str) -> Vec<String> {
    let band = PriceBand::match_loose(range).unwrap_or_else(PriceBand::fallback);
    let mut increments = Vec::new();
    let mut start = band.lower;
    while start + 19 <= band.upper {
        let end = (start + 19).min(band.upper);
        increments.push(format!("${start}k–${end}k"));
        start += 20;
    }
    increments
}
