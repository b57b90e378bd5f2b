//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use oracle_client::{
    render_page, AnalysisBackend, CaptureSurface, PageOptions, PageState, PresentationContext,
    QueryController, TracingStatus,
};
use oracle_common::logging::RequestContext;
use oracle_render::Section;
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::WebError;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn AnalysisBackend>,
}

impl AppState {
    pub fn new(backend: impl AnalysisBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/view", post(view))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

// ============ Page ============

async fn index() -> Html<String> {
    let options = PageOptions {
        interactive: true,
        ..PageOptions::default()
    };
    Html(render_page(PageState::Empty, &options))
}

// ============ Health Check ============

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "oracle-web",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============ View ============

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub status: &'static str,
    pub query: String,
    pub sections: Vec<Section>,
    pub html: String,
}

async fn view(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ViewRequest>, JsonRejection>,
) -> Result<Json<ViewResponse>, WebError> {
    let Json(request) = payload.map_err(|e| WebError::InvalidRequest(e.body_text()))?;

    // Each request owns its surface; nothing is shared between requests.
    let surface = CaptureSurface::new();
    let context = PresentationContext::new(surface, TracingStatus);
    let mut controller = QueryController::new(Arc::clone(&state.backend), context);

    let ctx = RequestContext::from_headers(&headers, "oracle-web");
    let view = controller.submit_with_context(&request.query, ctx).await?;
    let html = view.to_html();

    Ok(Json(ViewResponse {
        status: "success",
        query: request.query.trim().to_string(),
        sections: view.sections,
        html,
    }))
}
