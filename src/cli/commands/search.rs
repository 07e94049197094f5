//! Search command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::lifecycle::ModelContext;
use crate::rag::RetrievalEngine;
use std::sync::Arc;

/// Run the search command: raw retrieval with scores, no generation.
pub async fn run_search(
    query: &str,
    limit: Option<usize>,
    settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check_api_access(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hark doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let limit = limit.unwrap_or(settings.rag.top_k as usize);
    let ctx = Arc::new(ModelContext::new(settings));
    ctx.initialize().await?;

    let engine = RetrievalEngine::new(ctx.clone());
    let spinner = Output::spinner("Searching...");
    let results = engine.search(query, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) if results.is_empty() => {
            Output::warning("No results found matching your query.");
        }
        Ok(results) => {
            Output::success(&format!("Found {} result(s)", results.len()));
            for result in &results {
                Output::search_result(&result.record.source, result.score, &result.record.content);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            ctx.shutdown().await;
            return Err(e.into());
        }
    }

    ctx.shutdown().await;
    Ok(())
}
