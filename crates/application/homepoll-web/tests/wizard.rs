//! Full wizard walk-throughs against the real router and an in-memory
//! store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use homepoll_config::Config;
use homepoll_core::{NewRecord, RecordPatch, SurveyRecord};
use homepoll_store::{MemoryStore, RecordFilter, RecordStore, Result as StoreResult, StoreError};
use homepoll_web::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::with_store(Config::default(), store.clone()));
    (create_router(state), store)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, pairs: &[(&str, &str)]) -> axum::response::Response {
    let mut body = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        body.append_pair(key, value);
    }
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.finish()))
                .unwrap(),
        )
        .await
        .unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn bare_entry_redirects_to_step1() {
    let (app, _store) = test_app();
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/survey/step1");
}

#[tokio::test]
async fn magic_link_inserts_and_skips_to_step2() {
    let (app, store) = test_app();
    let response = get(&app, "/?range=%24501k%E2%80%93%24600k&email=a%40x.com").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = location(&response);
    assert!(location.starts_with("/survey/step2?"), "got {location}");
    assert!(location.contains("email=a%40x.com"));
    assert!(location.contains("sid="));

    // The insert is fire-and-forget; give the spawned task a moment.
    tokio::time::sleep(Duration::from_millis(30)).await;
    let rows = store.dump().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].initial_range, "$501k–$600k");
    assert_eq!(rows[0].agent_email.as_deref(), Some("a@x.com"));
}

#[tokio::test]
async fn full_wizard_updates_the_entry_record() {
    let (app, store) = test_app();

    // Magic-link entry writes the initial record.
    let response = get(&app, "/?range=%24501k%E2%80%93%24600k&email=a%40x.com").await;
    let step2 = location(&response);
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(store.dump().await.len(), 1);

    // Step 2 offers the follow-up branch carrying the same parameters.
    let step2_html = body_text(get(&app, &step2).await).await;
    assert!(step2_html.contains("Yes, I can help"));
    assert!(step2_html.contains("No, I am finished"));

    // Step 3 resolves the range from the URL and offers the $20k tiles.
    let sid = step2
        .split("sid=")
        .nth(1)
        .map(|s| s.split('&').next().unwrap().to_string())
        .unwrap();
    let step3_uri = format!("/survey/step3?range=%24501k%E2%80%93%24600k&email=a%40x.com&sid={sid}");
    let step3_html = body_text(get(&app, &step3_uri).await).await;
    assert!(step3_html.contains("$501k–$520k"));
    assert!(step3_html.contains("$581k–$600k"));
    assert!(step3_html.contains("3 Quick Questions"));

    // Submit the follow-up answers.
    let response = post_form(
        &app,
        "/survey/step3",
        &[
            ("range", "$501k–$600k"),
            ("email", "a@x.com"),
            ("sid", &sid),
            ("specific_price", "$521k–$540k"),
            ("best_feature", "Layout"),
            ("improvement_note", ""),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/survey/success");

    // The one existing record was updated; nothing new was inserted.
    let rows = store.dump().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].specific_price.as_deref(), Some("$521k–$540k"));
    assert_eq!(rows[0].best_feature.as_deref(), Some("Layout"));

    // The admin view shows the record in the table and the feature count.
    let admin_html = body_text(get(&app, "/admin").await).await;
    assert!(admin_html.contains("Survey Responses (1 total)"));
    assert!(admin_html.contains("Layout"));
    assert!(admin_html.contains("a@x.com"));
}

#[tokio::test]
async fn step1_submit_without_email_stores_null_and_forwards() {
    let (app, store) = test_app();
    let response = post_form(&app, "/survey/step1", &[("range", "$401k–$500k")]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/survey/step2?range="));

    let rows = store.dump().await;
    assert_eq!(rows.len(), 1);
    assert!(rows[0].agent_email.is_none());

    // Step 3 reached later with no email falls back to the most recent
    // record with a band.
    let step3_html = body_text(get(&app, "/survey/step3").await).await;
    assert!(step3_html.contains("$401k–$420k"));
}

#[tokio::test]
async fn step3_validation_rerenders_with_message_and_writes_nothing() {
    let (app, store) = test_app();
    store
        .insert(NewRecord::initial("$501k–$600k", None, None))
        .await
        .unwrap();

    let response = post_form(
        &app,
        "/survey/step3",
        &[
            ("range", "$501k–$600k"),
            ("specific_price", "$521k–$540k"),
            ("best_feature", ""),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Please answer all required questions."));

    let rows = store.dump().await;
    assert!(rows[0].specific_price.is_none(), "no update happened");
}

#[tokio::test]
async fn success_page_is_terminal_copy() {
    let (app, _store) = test_app();
    let html = body_text(get(&app, "/survey/success").await).await;
    assert!(html.contains("Thank you for your help."));
    assert!(html.contains("I will email the full report to you next week!"));
}

#[tokio::test]
async fn api_responses_reports_count() {
    let (app, store) = test_app();
    store
        .insert(NewRecord::initial("$601k–$700k", None, None))
        .await
        .unwrap();

    let response = get(&app, "/api/responses").await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload: serde_json::Value =
        serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["responses"][0]["initial_range"], "$601k–$700k");
}

/// Store double whose reads fail; proves the admin page never shows
/// partial data.
struct DownStore;

#[async_trait::async_trait]
impl RecordStore for DownStore {
    async fn insert(&self, _new: NewRecord) -> StoreResult<SurveyRecord> {
        Err(StoreError::Rejected { status: 500, body: "down".into() })
    }
    async fn select_all(&self) -> StoreResult<Vec<SurveyRecord>> {
        Err(StoreError::Rejected { status: 500, body: "down".into() })
    }
    async fn select_filtered(
        &self,
        _filter: RecordFilter,
        _limit: Option<usize>,
    ) -> StoreResult<Vec<SurveyRecord>> {
        Err(StoreError::Rejected { status: 500, body: "down".into() })
    }
    async fn update_by_id(&self, _id: Uuid, _patch: RecordPatch) -> StoreResult<()> {
        Err(StoreError::Rejected { status: 500, body: "down".into() })
    }
}

#[tokio::test]
async fn admin_shows_error_panel_when_fetch_fails() {
    let state = Arc::new(AppState::with_store(Config::default(), Arc::new(DownStore)));
    let app = create_router(state);

    let html = body_text(get(&app, "/admin").await).await;
    assert!(html.contains("Failed to load responses."));
    assert!(!html.contains("Survey Responses ("));
}

#[tokio::test]
async fn step1_store_failure_shows_retry_without_navigating() {
    let state = Arc::new(AppState::with_store(Config::default(), Arc::new(DownStore)));
    let app = create_router(state);

    let response = post_form(&app, "/survey/step1", &[("range", "$501k–$600k")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Something went wrong. Please try again."));
}
