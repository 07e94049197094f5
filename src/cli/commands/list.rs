//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::lifecycle::ModelContext;
use std::sync::Arc;

/// Run the list command.
pub async fn run_list(settings: Settings) -> anyhow::Result<()> {
    let ctx = Arc::new(ModelContext::new(settings));
    ctx.initialize().await?;
    let models = ctx.ensure_ready()?;

    match models.store.list_sources().await {
        Ok(sources) if sources.is_empty() => {
            Output::info("No recordings indexed yet. Use 'hark watch' or 'hark ingest <file>'.");
        }
        Ok(sources) => {
            Output::header(&format!("Indexed Sources ({})", sources.len()));
            println!();

            for item in &sources {
                Output::list_item(&format!(
                    "{} ({} chunk(s), indexed {})",
                    item.source,
                    item.chunk_count,
                    item.indexed_at.format("%Y-%m-%d %H:%M")
                ));
            }

            let total_chunks: u32 = sources.iter().map(|s| s.chunk_count).sum();
            println!();
            Output::kv("Total sources", &sources.len().to_string());
            Output::kv("Total chunks", &total_chunks.to_string());
        }
        Err(e) => {
            Output::error(&format!("Failed to list sources: {}", e));
            ctx.shutdown().await;
            return Err(e.into());
        }
    }

    ctx.shutdown().await;
    Ok(())
}
