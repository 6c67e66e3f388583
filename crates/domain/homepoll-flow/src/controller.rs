//! Step transitions, record correlation, and the write paths.

use crate::navigation::{Navigation, SurveyStep};
use crate::subbands::price_increments;
use crate::{FlowError, Result};
use homepoll_core::{BestFeature, NewRecord, PriceBand, RecordPatch, SurveyRecord, UnknownFeature};
use homepoll_store::{RecordFilter, RecordStore};
use std::sync::Arc;

/// Drives the wizard against whatever store backend the server runs.
#[derive(Clone)]
pub struct SurveyFlow {
    store: Arc<dyn RecordStore>,
}

/// The step-2 branch: carry on to the follow-up questions or stop here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step2Choice {
    Continue,
    Finish,
}

/// Raw step-3 form values; empty strings mean unanswered.
#[derive(Debug, Clone, Default)]
pub struct Step3Submission {
    pub specific_price: String,
    pub best_feature: String,
    pub improvement_note: String,
}

/// Treat blank and whitespace-only parameters as absent.
fn presence(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn mint_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Fire-and-forget insert for the landing path. Errors are logged,
/// never surfaced; the caller navigates without waiting. Swapping this
/// for a queued/retried writer would not touch any navigation logic.
pub fn spawn_best_effort_insert(store: Arc<dyn RecordStore>, new: NewRecord) {
    tokio::spawn(async move {
        if let Err(err) = store.insert(new).await {
            tracing::warn!("entry insert failed, forwarding visitor anyway: {err}");
        }
    });
}

impl SurveyFlow {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Landing decision. A magic link carries both `range` and `email`:
    /// write the initial record best-effort and skip straight to step 2
    /// (email and a freshly minted session token travel on). Anything
    /// less starts the visitor at step 1.
    pub fn route_entry(&self, range: Option<&str>, email: Option<&str>) -> Navigation {
        match (presence(range), presence(email)) {
            (Some(range), Some(email)) => {
                let token = mint_token();
                spawn_best_effort_insert(
                    self.store.clone(),
                    NewRecord::initial(range, Some(email.to_string()), Some(token.clone())),
                );
                Navigation::to(SurveyStep::Step2)
                    .with_email(Some(email))
                    .with_token(Some(token))
            }
            _ => Navigation::to(SurveyStep::Step1),
        }
    }

    /// Persist the visitor's band choice, then hand them to step 2 with
    /// range, email, and token preserved. A failed insert is surfaced so
    /// the page can offer a retry; the visitor does not move on.
    pub async fn submit_step1(
        &self,
        range: &str,
        email: Option<&str>,
        token: Option<&str>,
    ) -> Result<Navigation> {
        let band = PriceBand::match_exact(range).ok_or_else(|| {
            FlowError::Validation("Please choose one of the listed price ranges.".into())
        })?;
        let email = presence(email).map(String::from);
        let token = presence(token).map(String::from).unwrap_or_else(mint_token);

        self.store
            .insert(NewRecord::initial(band.label, email.clone(), Some(token.clone())))
            .await?;

        Ok(Navigation::to(SurveyStep::Step2)
            .with_range(Some(band.label))
            .with_email(email)
            .with_token(Some(token)))
    }

    /// Pure branch, no persistence. "Finish" is terminal for visitors
    /// who decline the follow-up.
    pub fn step2_decision(
        choice: Step2Choice,
        range: Option<&str>,
        email: Option<&str>,
        token: Option<&str>,
    ) -> Navigation {
        match choice {
            Step2Choice::Continue => Navigation::to(SurveyStep::Step3)
                .with_range(presence(range))
                .with_email(presence(email))
                .with_token(presence(token)),
            Step2Choice::Finish => Navigation::to(SurveyStep::Success),
        }
    }

    /// Which band should step 3 partition into sub-bands?
    ///
    /// Sequential fallback chain, each step consulted only when the
    /// prior yields nothing: the URL parameter (always trusted, even
    /// over stored data), the most recent record for this email, the
    /// most recent record overall, then the hardcoded default. Read
    /// failures fall through silently so the page always renders.
    pub async fn resolve_range(&self, range_param: Option<&str>, email: Option<&str>) -> String {
        if let Some(range) = presence(range_param) {
            return range.to_string();
        }

        if let Some(email) = presence(email) {
            match self
                .store
                .select_filtered(RecordFilter::by_email(email).range_present(), Some(1))
                .await
            {
                Ok(rows) => {
                    if let Some(row) = rows.into_iter().next() {
                        return row.initial_range;
                    }
                }
                Err(err) => tracing::debug!("range lookup by email failed: {err}"),
            }
        }

        match self
            .store
            .select_filtered(RecordFilter::default().range_present(), Some(1))
            .await
        {
            Ok(rows) => {
                if let Some(row) = rows.into_iter().next() {
                    return row.initial_range;
                }
            }
            Err(err) => tracing::debug!("range lookup failed: {err}"),
        }

        PriceBand::fallback().label.to_string()
    }

    /// Validate the follow-up answers, locate the visitor's record, and
    /// apply the three fields as one update. No record found means a
    /// fallback insert combining the resolved range with the answers.
    pub async fn submit_step3(
        &self,
        range_param: Option<&str>,
        email: Option<&str>,
        token: Option<&str>,
        submission: &Step3Submission,
    ) -> Result<Navigation> {
        let specific_price = submission.specific_price.trim();
        let best_feature = submission.best_feature.trim();
        if specific_price.is_empty() || best_feature.is_empty() {
            return Err(FlowError::Validation(
                "Please answer all required questions.".into(),
            ));
        }
        let feature: BestFeature = best_feature
            .parse()
            .map_err(|err: UnknownFeature| FlowError::Validation(err.to_string()))?;

        let email = presence(email);
        let token = presence(token);
        let resolved = self.resolve_range(range_param, email).await;

        if !price_increments(&resolved).iter().any(|tile| tile == specific_price) {
            return Err(FlowError::Validation(format!(
                "{specific_price} is not one of the offered price ranges."
            )));
        }

        let note = submission.improvement_note.trim();
        let patch = RecordPatch {
            specific_price: specific_price.to_string(),
            best_feature: feature.as_str().to_string(),
            improvement_note: (!note.is_empty()).then(|| note.to_string()),
        };

        match self.find_target(&resolved, email, token).await? {
            Some(target) => {
                self.store.update_by_id(target.id, patch).await?;
                tracing::info!(id = %target.id, "updated survey record with follow-up answers");
            }
            None => {
                let new = NewRecord::initial(
                    resolved.clone(),
                    email.map(String::from),
                    token.map(String::from),
                )
                .with_followup(patch);
                let inserted = self.store.insert(new).await?;
                tracing::info!(id = %inserted.id, "no prior record matched, inserted follow-up record");
            }
        }

        Ok(Navigation::to(SurveyStep::Success))
    }

    /// Correlation: most recent record for the session token, else most
    /// recent record matching the resolved range (and email when one is
    /// carried). Best-effort heuristic, not a unique key; two rapid
    /// sessions without a token can still pick each other's record.
    async fn find_target(
        &self,
        range: &str,
        email: Option<&str>,
        token: Option<&str>,
    ) -> Result<Option<SurveyRecord>> {
        if let Some(token) = token {
            let rows = self
                .store
                .select_filtered(RecordFilter::by_token(token), Some(1))
                .await?;
            if let Some(hit) = rows.into_iter().next() {
                return Ok(Some(hit));
            }
        }

        let mut filter = RecordFilter::default().with_range(range);
        filter.agent_email = email.map(String::from);
        let rows = self.store.select_filtered(filter, Some(1)).await?;
        Ok(rows.into_iter().next())
    }
}
