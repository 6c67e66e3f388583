//! Shared record model and fixed enumerations for the homepoll survey.
//!
//! Everything in this crate is part of the external contract: the
//! `responses` table schema, the three price bands, and the five
//! best-feature options. Field names and band strings must match the
//! stored data exactly or correlation and the admin distributions
//! stop lining up.

pub mod band;
pub mod record;

pub use band::{BestFeature, PriceBand, UnknownFeature, BEST_FEATURES, PRICE_BANDS};
pub use record::{NewRecord, RecordPatch, SurveyRecord};
