//! Record-store client for the shared `responses` table.
//!
//! The `RecordStore` trait is the only surface the rest of the system
//! sees: insert, bulk select, filtered select, update by id. Each call
//! is independently atomic at the single-record level; there are no
//! transactions and no cross-call isolation, so "find then update" is
//! two separate calls by contract.
//!
//! Backends: `RestStore` speaks the PostgREST dialect over HTTP;
//! `MemoryStore` keeps rows in process for tests and local runs.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use homepoll_core::{NewRecord, RecordPatch, SurveyRecord};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store rejected request: {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed store payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("store returned no rows where one was required")]
    EmptyReply,

    #[error("invalid store url: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("record not found: {0}")]
    NotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Column filters for `select_filtered`. All set fields apply together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub agent_email: Option<String>,
    pub initial_range: Option<String>,
    pub session_token: Option<String>,
    /// Require a non-null `initial_range` (the "any record with a band"
    /// fallback query).
    pub range_present: bool,
}

impl RecordFilter {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self { agent_email: Some(email.into()), ..Self::default() }
    }

    pub fn by_token(token: impl Into<String>) -> Self {
        Self { session_token: Some(token.into()), ..Self::default() }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.initial_range = Some(range.into());
        self
    }

    pub fn range_present(mut self) -> Self {
        self.range_present = true;
        self
    }
}

/// The persistence collaborator. Every operation attempts exactly once;
/// callers decide whether a failure is fatal, surfaced, or ignored.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record; the store assigns `id` and `created_at`.
    async fn insert(&self, new: NewRecord) -> Result<SurveyRecord>;

    /// All records, newest first.
    async fn select_all(&self) -> Result<Vec<SurveyRecord>>;

    /// Matching records, newest first, optionally capped.
    async fn select_filtered(
        &self,
        filter: RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<SurveyRecord>>;

    /// Apply the step-3 follow-up patch to one existing record.
    async fn update_by_id(&self, id: Uuid, patch: RecordPatch) -> Result<()>;
}

pub use memory::MemoryStore;
pub use rest::RestStore;
