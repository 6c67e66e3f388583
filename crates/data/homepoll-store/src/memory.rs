//! In-process record store for tests and local runs.

use crate::{RecordFilter, RecordStore, Result, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use homepoll_core::{NewRecord, RecordPatch, SurveyRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Rows live in insertion order; reads reverse them so equal timestamps
/// still come back newest-insert-first.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<SurveyRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot for test assertions.
    pub async fn dump(&self) -> Vec<SurveyRecord> {
        self.records.read().await.clone()
    }
}

fn matches(record: &SurveyRecord, filter: &RecordFilter) -> bool {
    if let Some(email) = &filter.agent_email {
        if record.agent_email.as_deref() != Some(email.as_str()) {
            return false;
        }
    }
    if let Some(range) = &filter.initial_range {
        if record.initial_range != *range {
            return false;
        }
    }
    if let Some(token) = &filter.session_token {
        if record.session_token.as_deref() != Some(token.as_str()) {
            return false;
        }
    }
    if filter.range_present && record.initial_range.trim().is_empty() {
        return false;
    }
    true
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, new: NewRecord) -> Result<SurveyRecord> {
        let record = SurveyRecord {
            id: Uuid::new_v4(),
            created_at: Some(Utc::now()),
            initial_range: new.initial_range,
            specific_price: new.specific_price,
            best_feature: new.best_feature,
            improvement_note: new.improvement_note,
            agent_email: new.agent_email,
            session_token: new.session_token,
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn select_all(&self) -> Result<Vec<SurveyRecord>> {
        let records = self.records.read().await;
        let mut rows: Vec<SurveyRecord> = records.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn select_filtered(
        &self,
        filter: RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<SurveyRecord>> {
        let mut rows: Vec<SurveyRecord> = self
            .select_all()
            .await?
            .into_iter()
            .filter(|record| matches(record, &filter))
            .collect();
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn update_by_id(&self, id: Uuid, patch: RecordPatch) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.specific_price = Some(patch.specific_price);
        record.best_feature = Some(patch.best_feature);
        record.improvement_note = patch.improvement_note;
        Ok(())
    }
}
