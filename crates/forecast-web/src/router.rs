//! Web router using Axum

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use forecast_core::{export::html_escape, ConfigParser, ErrorKind, Forecast, ForecastError};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use crate::WebState;

const INDEX_HTML: &str = include_str!("index.html");

/// Create the web router
pub fn create_router(state: Arc<WebState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/render", post(render_handler))
        .route("/api/health", get(health_handler))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(cors)
        .with_state(state)
}

/// Editor page with the preload config filled in
async fn index_handler(State(state): State<Arc<WebState>>) -> Html<String> {
    let preload = state.preload.as_deref().unwrap_or_default();
    Html(INDEX_HTML.replace("{YAML}", &html_escape(preload)))
}

/// Parse the posted YAML and render the report from scratch
async fn render_handler(State(state): State<Arc<WebState>>, body: String) -> Response {
    let result = ConfigParser::parse_str(&body)
        .and_then(|config| Forecast::compute(&config, state.holidays.as_ref()));

    match result {
        Ok(report) => {
            info!(
                projects = report.projects.len(),
                months = report.months.len(),
                "Rendered preview"
            );
            Html(forecast_core::render_html(&report)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Preview render failed");
            error_response(&e)
        }
    }
}

fn error_response(err: &ForecastError) -> Response {
    let status = match err.kind() {
        ErrorKind::Configuration | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let mut message = format!("Render failed: {err}");
    if let Some(hint) = err.suggestion() {
        message.push('\n');
        message.push_str(&hint);
    }
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
