//! HTTP API server for integration with other systems.
//!
//! Thin adapters over the ingestion and query pipelines. Initialization
//! happens before the socket binds; a failed load aborts startup.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::HarkError;
use crate::ingest::IngestionPipeline;
use crate::lifecycle::{LifecycleState, ModelContext};
use crate::rag::{QueryPipeline, RetrievalEngine};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    ctx: Arc<ModelContext>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check_api_access(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hark doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let ctx = Arc::new(ModelContext::new(settings));
    ctx.initialize().await?;

    let state = Arc::new(AppState { ctx: ctx.clone() });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/search", post(search))
        .route("/ingest", post(ingest))
        .route("/sources", get(sources))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Hark API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask (RAG)", "POST /ask");
    Output::kv("Search", "POST /search");
    Output::kv("Ingest", "POST /ingest");
    Output::kv("Sources", "GET  /sources");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    println!();
    Output::info("Shutting down...");
    ctx.shutdown().await;
    Ok(())
}

// === Request/Response Types ===

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state: LifecycleState,
    documents: usize,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Serialize)]
struct SearchHit {
    content: String,
    source: String,
    score: f32,
}

#[derive(Deserialize)]
struct IngestRequest {
    text: String,
    source: String,
}

#[derive(Serialize)]
struct IngestResponse {
    source: String,
    chunks_added: usize,
}

#[derive(Serialize)]
struct SourceInfo {
    source: String,
    chunk_count: u32,
    last_indexed: DateTime<Utc>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(e: HarkError) -> axum::response::Response {
    let status = if e.is_recoverable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let documents = match state.ctx.ensure_ready() {
        Ok(models) => models.store.document_count().await.unwrap_or(0),
        Err(_) => 0,
    };
    Json(HealthResponse {
        status: "ok",
        state: state.ctx.state(),
        documents,
    })
}

/// Always 200: failures are part of the result contract, not HTTP errors.
async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    let result = QueryPipeline::new(state.ctx.clone()).answer(&req.question).await;
    Json(result)
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    let limit = req.limit.unwrap_or(state.ctx.settings().rag.top_k as usize);
    match RetrievalEngine::new(state.ctx.clone()).search(&req.query, limit).await {
        Ok(results) => Json(SearchResponse {
            results: results
                .into_iter()
                .map(|r| SearchHit {
                    content: r.record.content,
                    source: r.record.source,
                    score: r.score,
                })
                .collect(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> impl IntoResponse {
    match IngestionPipeline::new(state.ctx.clone()).ingest(&req.text, &req.source).await {
        Ok(chunks_added) => Json(IngestResponse {
            source: req.source,
            chunks_added,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn sources(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let models = match state.ctx.ensure_ready() {
        Ok(models) => models,
        Err(e) => return error_response(e),
    };
    match models.store.list_sources().await {
        Ok(sources) => Json(
            sources
                .into_iter()
                .map(|s| SourceInfo {
                    source: s.source,
                    chunk_count: s.chunk_count,
                    last_indexed: s.indexed_at,
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => error_response(e),
    }
}
