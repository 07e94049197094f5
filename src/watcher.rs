//! Folder watching: poll an audio directory and feed new recordings through
//! transcription and ingestion.
//!
//! Files already present at startup count as processed. Every per-file
//! failure is logged and contained; the watch loop never dies over one bad
//! recording.

use crate::error::Result;
use crate::ingest::IngestionPipeline;
use crate::lifecycle::ModelContext;
use crate::transcription::Transcriber;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

/// Watches the configured audio directory for new voice memos.
pub struct FolderWatcher {
    ctx: Arc<ModelContext>,
    transcriber: Arc<dyn Transcriber>,
}

impl FolderWatcher {
    pub fn new(ctx: Arc<ModelContext>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self { ctx, transcriber }
    }

    /// Poll the audio directory until the future is dropped. Callers pair
    /// this with a ctrl-c signal via `select!`.
    pub async fn run(&self) -> Result<()> {
        let settings = self.ctx.settings();
        let audio_dir = settings.audio_dir();
        tokio::fs::create_dir_all(&audio_dir).await?;

        let mut seen: HashSet<PathBuf> = self.scan(&audio_dir).await?.into_iter().collect();
        info!(
            dir = %audio_dir.display(),
            existing = seen.len(),
            "Watching for new recordings"
        );

        let mut ticker = interval(settings.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.poll_once(&mut seen).await;
        }
    }

    /// One pass over the audio directory. Unseen files with the configured
    /// extension are processed; returns how many were indexed.
    async fn poll_once(&self, seen: &mut HashSet<PathBuf>) -> usize {
        let audio_dir = self.ctx.settings().audio_dir();
        let paths = match self.scan(&audio_dir).await {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Audio directory scan failed: {}", e);
                return 0;
            }
        };

        let mut indexed = 0;
        for path in paths {
            // Mark before processing so a bad file is not retried every tick
            if !seen.insert(path.clone()) {
                continue;
            }
            match self.process_file(&path).await {
                Ok(chunks) if chunks > 0 => {
                    indexed += 1;
                    info!(file = %path.display(), chunks, "Recording indexed");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(file = %path.display(), "Failed to process recording: {}", e);
                }
            }
        }
        indexed
    }

    /// Matching files in `dir`, non-recursive, sorted for stable ordering.
    async fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let extension = self.ctx.settings().watcher.extension.clone();
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && has_extension(&path, &extension) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Settle, transcribe, archive, ingest. A missing transcript means skip,
    /// not failure.
    #[instrument(skip(self), fields(file = %path.display()))]
    async fn process_file(&self, path: &Path) -> Result<usize> {
        // Give the recorder time to finish writing the file
        sleep(self.ctx.settings().settle_delay()).await;

        let transcript = match self.transcriber.transcribe(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Transcription failed, skipping: {}", e);
                return Ok(0);
            }
        };

        self.archive_transcript(path, &transcript).await;

        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        IngestionPipeline::new(self.ctx.clone()).ingest(&transcript, &source).await
    }

    /// Persist the transcript as `<stem>.txt` next to its peers. Best-effort:
    /// failures are warnings, never ingestion failures.
    async fn archive_transcript(&self, audio_path: &Path, transcript: &str) {
        let dir = self.ctx.settings().transcripts_dir();
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            warn!(dir = %dir.display(), "Could not create transcripts directory: {}", e);
            return;
        }

        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "transcript".to_string());
        let target = dir.join(format!("{}.txt", stem));
        if let Err(e) = tokio::fs::write(&target, transcript).await {
            warn!(file = %target.display(), "Could not archive transcript: {}", e);
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.ends_with(extension))
        .unwrap_or(false)
}
