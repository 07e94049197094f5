//! Transcript ingestion: chunk a transcript and index it under its source.

use crate::chunking::{Chunk, TextChunker};
use crate::error::{HarkError, Result};
use crate::lifecycle::ModelContext;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Turns one transcript into indexed chunks.
///
/// Safe to call repeatedly for the same source: chunk IDs are deterministic,
/// so a re-ingested transcript replaces its earlier chunks in place.
pub struct IngestionPipeline {
    ctx: Arc<ModelContext>,
}

impl IngestionPipeline {
    pub fn new(ctx: Arc<ModelContext>) -> Self {
        Self { ctx }
    }

    /// Chunk `text` and index every chunk under `source`, returning the
    /// number of chunks added. An empty transcript is a no-op returning zero.
    /// Fails fast with `NotInitialized` when the pipeline is not ready.
    #[instrument(skip(self, text), fields(source = %source))]
    pub async fn ingest(&self, text: &str, source: &str) -> Result<usize> {
        let models = self.ctx.ensure_ready()?;

        if source.trim().is_empty() {
            return Err(HarkError::InvalidInput("Source name is empty".to_string()));
        }

        let chunking = &self.ctx.settings().chunking;
        let chunker = TextChunker::new(chunking.chunk_size as usize, chunking.chunk_overlap as usize);
        let chunks: Vec<Chunk> = chunker
            .split(text)
            .into_iter()
            .enumerate()
            .map(|(index, piece)| Chunk::new(piece, source, index))
            .collect();

        if chunks.is_empty() {
            debug!("Transcript produced no chunks");
            return Ok(0);
        }

        let added = models
            .index
            .add(&chunks)
            .await
            .map_err(|e| HarkError::Ingestion {
                source_name: source.to_string(),
                message: e.to_string(),
            })?;
        info!(chunks = added, "Transcript indexed");
        Ok(added)
    }
}
