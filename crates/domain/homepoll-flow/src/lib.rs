//! Survey flow controller.
//!
//! Drives the landing-redirect → step 1 → step 2 → step 3 → success
//! wizard: step transitions, parameter propagation (range, email,
//! session token) across page loads, and correlation of a visitor's
//! follow-up answers back to the record written at the start.
//!
//! There is no server-side session. Identity is whatever the URL
//! carries, which is why correlation is a heuristic (token, else email,
//! else band + recency) rather than a key lookup.

pub mod controller;
pub mod navigation;
pub mod subbands;

use homepoll_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    /// Required step-3 answers missing or outside their enumerations.
    /// Blocks locally; no store call is made.
    #[error("{0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, FlowError>;

pub use controller::{Step2Choice, Step3Submission, SurveyFlow};
pub use navigation::{Navigation, SurveyStep};
pub use subbands::price_increments;
