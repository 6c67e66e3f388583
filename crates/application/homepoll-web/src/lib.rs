//! homepoll web layer.
//!
//! Server-rendered survey wizard plus the admin dashboard, no client
//! framework. Handlers translate URL/form parameters into flow calls
//! and render whatever the domain crates hand back.

pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::entry))
        .route("/survey/step1", get(handlers::step1_page))
        .route("/survey/step1", post(handlers::step1_submit))
        .route("/survey/step2", get(handlers::step2_page))
        .route("/survey/step3", get(handlers::step3_page))
        .route("/survey/step3", post(handlers::step3_submit))
        .route("/survey/success", get(handlers::success_page))
        .route("/admin", get(handlers::admin_dashboard))
        .route("/api/health", get(handlers::health))
        .route("/api/responses", get(handlers::api_responses))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn serve(state: Arc<AppState>, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("homepoll listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
