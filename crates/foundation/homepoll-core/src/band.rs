//! Fixed price-band and best-feature enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A top-level price band a visitor first selects.
///
/// The `label` strings (en-dash included) are stored verbatim and are
/// matched exactly by the admin distribution, so they are never rebuilt
/// from the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBand {
    pub label: &'static str,
    /// Lower bound in $1k units.
    pub lower: u32,
    /// Upper bound in $1k units.
    pub upper: u32,
}

/// The three recognized bands, in contract order (highest first).
pub const PRICE_BANDS: [PriceBand; 3] = [
    PriceBand { label: "$601k–$700k", lower: 601, upper: 700 },
    PriceBand { label: "$501k–$600k", lower: 501, upper: 600 },
    PriceBand { label: "$401k–$500k", lower: 401, upper: 500 },
];

impl PriceBand {
    /// The band used whenever a stored or supplied range cannot be
    /// recognized: `$501k–$600k`.
    pub fn fallback() -> PriceBand {
        PRICE_BANDS[1]
    }

    /// Exact label match against the three recognized bands.
    pub fn match_exact(input: &str) -> Option<PriceBand> {
        let trimmed = input.trim();
        PRICE_BANDS.iter().copied().find(|b| b.label == trimmed)
    }

    /// Loose match: exact label, or case-insensitive containment of both
    /// boundary numbers. Tolerates minor formatting drift in stored
    /// range strings ("601k - 700K", "$601k to $700k", ...).
    pub fn match_loose(input: &str) -> Option<PriceBand> {
        if let Some(band) = Self::match_exact(input) {
            return Some(band);
        }
        let lowered = input.trim().to_lowercase();
        PRICE_BANDS.iter().copied().find(|b| {
            lowered.contains(&b.lower.to_string()) && lowered.contains(&b.upper.to_string())
        })
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// The five best-feature options offered in step 3.
pub const BEST_FEATURES: [&str; 5] = ["Location", "Layout", "Condition/Updates", "Yard/Lot", "Price"];

/// What a respondent likes most about the house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestFeature {
    Location,
    Layout,
    ConditionUpdates,
    YardLot,
    Price,
}

impl BestFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            BestFeature::Location => "Location",
            BestFeature::Layout => "Layout",
            BestFeature::ConditionUpdates => "Condition/Updates",
            BestFeature::YardLot => "Yard/Lot",
            BestFeature::Price => "Price",
        }
    }
}

impl fmt::Display for BestFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted feature string outside the five-value enumeration.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown best-feature option: {0}")]
pub struct UnknownFeature(pub String);

impl FromStr for BestFeature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Location" => Ok(BestFeature::Location),
            "Layout" => Ok(BestFeature::Layout),
            "Condition/Updates" => Ok(BestFeature::ConditionUpdates),
            "Yard/Lot" => Ok(BestFeature::YardLot),
            "Price" => Ok(BestFeature::Price),
            other => Err(UnknownFeature(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_recognizes_all_three_bands() {
        for band in PRICE_BANDS {
            assert_eq!(PriceBand::match_exact(band.label), Some(band));
        }
        assert_eq!(PriceBand::match_exact("$301k–$400k"), None);
    }

    #[test]
    fn exact_match_trims_whitespace() {
        assert_eq!(
            PriceBand::match_exact("  $501k–$600k "),
            Some(PRICE_BANDS[1])
        );
    }

    #[test]
    fn loose_match_tolerates_formatting_drift() {
        assert_eq!(PriceBand::match_loose("601K to 700K"), Some(PRICE_BANDS[0]));
        assert_eq!(PriceBand::match_loose("$401k - $500k"), Some(PRICE_BANDS[2]));
        assert_eq!(PriceBand::match_loose("somewhere around 501 and 600"), Some(PRICE_BANDS[1]));
    }

    #[test]
    fn loose_match_requires_both_boundaries() {
        assert_eq!(PriceBand::match_loose("about 601k"), None);
        assert_eq!(PriceBand::match_loose("mid 500s"), None);
    }

    #[test]
    fn fallback_is_the_middle_band() {
        assert_eq!(PriceBand::fallback().label, "$501k–$600k");
    }

    #[test]
    fn best_feature_round_trips_every_option() {
        for label in BEST_FEATURES {
            let parsed: BestFeature = label.parse().unwrap();
            assert_eq!(parsed.as_str(), label);
        }
        assert!("Garage".parse::<BestFeature>().is_err());
    }
}
