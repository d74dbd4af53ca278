use axum::{
    routing::get,
    Router,
    extract::{Form, Query, State},
    response::{Html, IntoResponse},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::api::models::{selection_from_pairs, DigestResponse, FormPairs};
use crate::api::response;
use crate::digest::Digest;
use crate::render::render_page;
use crate::topics::TopicSelection;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/api/papers", get(papers_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Router::new()
        .route("/", get(home_handler).post(home_handler))
        .route("/health", get(health_handler))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// The page. GET reads `topics` from the query string, POST from the form body.
async fn home_handler(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Result<Html<String>> {
    let selection = selection_from_pairs(&pairs);
    let digest = build_digest(&state, &selection).await?;
    Ok(Html(render_page(&digest)?))
}

async fn papers_handler(
    State(state): State<AppState>,
    Query(pairs): Query<FormPairs>,
) -> impl IntoResponse {
    let selection = selection_from_pairs(&pairs);
    match build_digest(&state, &selection).await {
        Ok(digest) => response::success(DigestResponse::from(digest)),
        Err(err) => response::error(err.status(), err.to_string()),
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn build_digest(state: &AppState, selection: &TopicSelection) -> Result<Digest> {
    let start_time = std::time::Instant::now();
    info!(topics = ?selection.labels(), "building digest");

    if state.config.reset_cache_on_request {
        state.summarizer.reset_cache().await;
    }

    let digest = state.sources.collect(selection, &state.summarizer).await?;

    info!(
        arxiv = digest.arxiv_papers.len(),
        jmlr = digest.jmlr_papers.len(),
        "digest ready in {:?}",
        start_time.elapsed()
    );
    Ok(digest)
}
