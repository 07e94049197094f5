//! Watch command - run the folder watcher end-to-end.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::lifecycle::ModelContext;
use crate::transcription::WhisperTranscriber;
use crate::watcher::FolderWatcher;
use std::sync::Arc;

/// Run the watch command until ctrl-c.
pub async fn run_watch(settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check_api_access(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hark doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let ctx = Arc::new(ModelContext::new(settings));
    let spinner = Output::spinner("Initializing pipeline...");
    if let Err(e) = ctx.initialize().await {
        spinner.finish_and_clear();
        Output::error(&format!("Initialization failed: {}", e));
        return Err(e.into());
    }
    spinner.finish_and_clear();

    let transcriber = Arc::new(WhisperTranscriber::new(
        &ctx.settings().transcription.model,
        ctx.settings().api.base_url.as_deref(),
    )?);
    let watcher = FolderWatcher::new(ctx.clone(), transcriber);

    Output::success(&format!(
        "Watching {} for new recordings",
        ctx.settings().audio_dir().display()
    ));
    Output::info("Press Ctrl+C to stop.");

    tokio::select! {
        result = watcher.run() => {
            // The loop only returns on a startup error (e.g. unreadable dir)
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            Output::info("Stopping watcher...");
        }
    }

    ctx.shutdown().await;
    Output::success("Stopped.");
    Ok(())
}
