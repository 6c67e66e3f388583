//! Route handlers: extract parameters, call the flow, render.

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;
use crate::templates;
use homepoll_core::PRICE_BANDS;
use homepoll_flow::{price_increments, FlowError, Step2Choice, Step3Submission, SurveyFlow};

const RETRY_MESSAGE: &str = "Something went wrong. Please try again.";
const ADMIN_FETCH_ERROR: &str = "Failed to load responses. Please check the record store connection.";

/// The range/email/sid triple every survey page may carry.
#[derive(Debug, Default, Deserialize)]
pub struct StepQuery {
    pub range: Option<String>,
    pub email: Option<String>,
    pub sid: Option<String>,
}

/// Entry routing. Never blocks on persistence: a magic link fires a
/// best-effort insert and redirects immediately.
pub async fn entry(State(state): State<Arc<AppState>>, Query(query): Query<StepQuery>) -> Redirect {
    let nav = state
        .flow
        .route_entry(query.range.as_deref(), query.email.as_deref());
    Redirect::to(&nav.location())
}

pub async fn step1_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StepQuery>,
) -> Html<String> {
    Html(render_step1(&state, &query, None))
}

fn render_step1(state: &AppState, query: &StepQuery, error: Option<&str>) -> String {
    let bands: Vec<&str> = PRICE_BANDS.iter().map(|band| band.label).collect();
    templates::step1_page(
        state.property_label(),
        &bands,
        query.email.as_deref(),
        query.sid.as_deref(),
        error,
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Step1Form {
    pub range: String,
    pub email: Option<String>,
    pub sid: Option<String>,
}

pub async fn step1_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<Step1Form>,
) -> Response {
    match state
        .flow
        .submit_step1(&form.range, form.email.as_deref(), form.sid.as_deref())
        .await
    {
        Ok(nav) => Redirect::to(&nav.location()).into_response(),
        Err(err) => {
            let message = match &err {
                FlowError::Validation(message) => message.clone(),
                FlowError::Store(_) => {
                    tracing::error!("step 1 insert failed: {err}");
                    RETRY_MESSAGE.to_string()
                }
            };
            let query = StepQuery { range: None, email: form.email, sid: form.sid };
            Html(render_step1(&state, &query, Some(&message))).into_response()
        }
    }
}

pub async fn step2_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StepQuery>,
) -> Html<String> {
    let continue_nav = SurveyFlow::step2_decision(
        Step2Choice::Continue,
        query.range.as_deref(),
        query.email.as_deref(),
        query.sid.as_deref(),
    );
    let finish_nav = SurveyFlow::step2_decision(Step2Choice::Finish, None, None, None);
    Html(templates::step2_page(
        state.property_label(),
        &continue_nav.location(),
        &finish_nav.location(),
    ))
}

pub async fn step3_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StepQuery>,
) -> Html<String> {
    Html(render_step3(&state, &query, None).await)
}

async fn render_step3(state: &AppState, query: &StepQuery, error: Option<&str>) -> String {
    let resolved = state
        .flow
        .resolve_range(query.range.as_deref(), query.email.as_deref())
        .await;
    let increments = price_increments(&resolved);
    templates::step3_page(
        state.property_label(),
        &resolved,
        &increments,
        query.email.as_deref(),
        query.sid.as_deref(),
        error,
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Step3Form {
    pub range: Option<String>,
    pub email: Option<String>,
    pub sid: Option<String>,
    pub specific_price: String,
    pub best_feature: String,
    pub improvement_note: String,
}

pub async fn step3_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<Step3Form>,
) -> Response {
    let submission = Step3Submission {
        specific_price: form.specific_price,
        best_feature: form.best_feature,
        improvement_note: form.improvement_note,
    };
    match state
        .flow
        .submit_step3(
            form.range.as_deref(),
            form.email.as_deref(),
            form.sid.as_deref(),
            &submission,
        )
        .await
    {
        Ok(nav) => Redirect::to(&nav.location()).into_response(),
        Err(err) => {
            let message = match &err {
                FlowError::Validation(message) => message.clone(),
                FlowError::Store(_) => {
                    tracing::error!("step 3 save failed: {err}");
                    RETRY_MESSAGE.to_string()
                }
            };
            let query = StepQuery { range: form.range, email: form.email, sid: form.sid };
            Html(render_step3(&state, &query, Some(&message)).await).into_response()
        }
    }
}

pub async fn success_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::success_page(state.property_label()))
}

/// Admin dashboard: one bulk fetch, then pure aggregation. A failed
/// fetch shows the error panel and nothing else.
pub async fn admin_dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let records = match state.store.select_all().await {
        Ok(records) => records,
        Err(err) => {
            tracing::error!("admin fetch failed: {err}");
            return Html(templates::admin_error_page(ADMIN_FETCH_ERROR));
        }
    };

    let price_bars = homepoll_insights::price_range_distribution(&records);
    let feature_bars = homepoll_insights::best_feature_distribution(&records);
    let themes = homepoll_insights::improvement_themes(&records);
    let comments = homepoll_insights::comment_records(&records);

    Html(templates::admin_page(
        state.property_label(),
        &records,
        &price_bars,
        &feature_bars,
        &themes,
        &comments,
    ))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime_secs(),
    }))
}

pub async fn api_responses(State(state): State<Arc<AppState>>) -> Response {
    match state.store.select_all().await {
        Ok(records) => {
            let count = records.len();
            Json(json!({ "responses": records, "count": count })).into_response()
        }
        Err(err) => {
            tracing::error!("responses fetch failed: {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "record store unavailable" })),
            )
                .into_response()
        }
    }
}
