//! Ask command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::lifecycle::ModelContext;
use crate::rag::QueryPipeline;
use std::sync::Arc;

/// Run the ask command: one question, one rendered answer.
pub async fn run_ask(question: &str, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check_api_access(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hark doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let ctx = Arc::new(ModelContext::new(settings));
    ctx.initialize().await?;

    let pipeline = QueryPipeline::new(ctx.clone());
    let spinner = Output::spinner("Thinking...");
    let result = pipeline.answer(question).await;
    spinner.finish_and_clear();

    Output::query_result(&result);

    ctx.shutdown().await;
    Ok(())
}
