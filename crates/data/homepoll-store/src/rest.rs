//! PostgREST-dialect HTTP backend for the `responses` table.
//!
//! Filters become `column=eq.value` query pairs, ordering is
//! `order=created_at.desc`, inserts ask for `return=representation` so
//! the store-assigned id and timestamp come back in one round trip.

use crate::{RecordFilter, RecordStore, Result, StoreError};
use async_trait::async_trait;
use homepoll_core::{NewRecord, RecordPatch, SurveyRecord};
use url::Url;
use uuid::Uuid;

pub struct RestStore {
    http: reqwest::Client,
    table_url: Url,
    api_key: Option<String>,
}

impl RestStore {
    /// `base_url` is the REST root (e.g. `https://x.supabase.co/rest/v1`);
    /// the table name is appended as a path segment.
    pub fn new(base_url: &str, api_key: Option<String>, table: &str) -> Result<Self> {
        let mut table_url = Url::parse(base_url)?;
        table_url
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(table);
        Ok(Self { http: reqwest::Client::new(), table_url, api_key })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.table_url.clone());
        if let Some(key) = &self.api_key {
            builder = builder
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}"));
        }
        builder
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "record store rejected request");
        Err(StoreError::Rejected { status: status.as_u16(), body })
    }
}

/// Query pairs for a filtered select, in a fixed order so requests are
/// reproducible in logs and tests.
fn filter_pairs(filter: &RecordFilter, limit: Option<usize>) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];
    if let Some(token) = &filter.session_token {
        pairs.push(("session_token".into(), format!("eq.{token}")));
    }
    if let Some(email) = &filter.agent_email {
        pairs.push(("agent_email".into(), format!("eq.{email}")));
    }
    if let Some(range) = &filter.initial_range {
        pairs.push(("initial_range".into(), format!("eq.{range}")));
    }
    if filter.range_present {
        pairs.push(("initial_range".into(), "not.is.null".into()));
    }
    pairs.push(("order".into(), "created_at.desc".into()));
    if let Some(limit) = limit {
        pairs.push(("limit".into(), limit.to_string()));
    }
    pairs
}

#[async_trait]
impl RecordStore for RestStore {
    async fn insert(&self, new: NewRecord) -> Result<SurveyRecord> {
        let response = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .json(&new)
            .send()
            .await?;
        let rows: Vec<SurveyRecord> = Self::check(response).await?.json().await?;
        rows.into_iter().next().ok_or(StoreError::EmptyReply)
    }

    async fn select_all(&self) -> Result<Vec<SurveyRecord>> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn select_filtered(
        &self,
        filter: RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<SurveyRecord>> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&filter_pairs(&filter, limit))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_by_id(&self, id: Uuid, patch: RecordPatch) -> Result<()> {
        let response = self
            .request(reqwest::Method::PATCH)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
