//! HTTP surface of the dev server: the rendered page, a status probe, and
//! a flat 404 for everything else (wrong methods included).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::ServerState;

pub(crate) fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(serve_resume).fallback(not_found))
        .route("/status", get(serve_status).fallback(not_found))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves whatever the last regeneration produced, error page included.
async fn serve_resume(State(state): State<ServerState>) -> Html<String> {
    Html(state.html.read().await.clone())
}

async fn serve_status(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "role": state.role.name,
        "roleCode": state.role_code,
        "theme": state.theme_id,
        "sourceFile": state.source.display().to_string(),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
