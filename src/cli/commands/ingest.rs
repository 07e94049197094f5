//! Ingest command - one-shot transcript or audio ingestion.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::ingest::IngestionPipeline;
use crate::lifecycle::ModelContext;
use crate::transcription::{Transcriber, WhisperTranscriber};
use std::path::Path;
use std::sync::Arc;

/// Run the ingest command for a single file.
pub async fn run_ingest(
    file: &str,
    source: Option<String>,
    settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check_api_access(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hark doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let path = Path::new(file);
    if !path.is_file() {
        anyhow::bail!("File not found: {}", file);
    }

    let source_name = source.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string())
    });

    let ctx = Arc::new(ModelContext::new(settings));
    ctx.initialize().await?;

    let text = if path.extension().and_then(|e| e.to_str()) == Some("txt") {
        tokio::fs::read_to_string(path).await?
    } else {
        let transcriber = WhisperTranscriber::new(
            &ctx.settings().transcription.model,
            ctx.settings().api.base_url.as_deref(),
        )?;
        let spinner = Output::spinner("Transcribing...");
        let result = transcriber.transcribe(path).await;
        spinner.finish_and_clear();
        result?
    };

    let spinner = Output::spinner("Indexing...");
    let result = IngestionPipeline::new(ctx.clone()).ingest(&text, &source_name).await;
    spinner.finish_and_clear();

    match result {
        Ok(0) => Output::warning(&format!("{} held no text to index", source_name)),
        Ok(chunks) => {
            Output::success(&format!("Indexed {} chunk(s) from {}", chunks, source_name))
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            ctx.shutdown().await;
            return Err(e.into());
        }
    }

    ctx.shutdown().await;
    Ok(())
}
