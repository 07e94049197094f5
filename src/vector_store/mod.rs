//! Vector store abstraction for Hark.
//!
//! Provides a trait-based interface over the persisted collection of
//! embedded transcript chunks. The collection's logical name is fixed:
//! `voice_transcripts`.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::chunking::Chunk;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An embedded chunk as stored in the vector collection.
///
/// The ID is the chunk's stable external key (`"<source>_<index>"`), so
/// re-ingesting a source upserts over its previous records instead of
/// accumulating duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Stable record ID.
    pub id: String,
    /// Source file the chunk came from.
    pub source: String,
    /// Text content of the chunk.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this record was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl VectorRecord {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        content: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            content: content.into(),
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// Build a record from a chunk and its embedding.
    pub fn from_chunk(chunk: &Chunk, embedding: Vec<f32>) -> Self {
        Self::new(chunk.id(), chunk.source.clone(), chunk.text.clone(), embedding)
    }
}

/// A search hit with its similarity score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched record.
    pub record: VectorRecord,
    /// Cosine similarity to the query (higher is closer).
    pub score: f32,
}

/// Summary of one indexed source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedSource {
    /// Source file name.
    pub source: String,
    /// Number of indexed chunks.
    pub chunk_count: u32,
    /// Most recent indexing time for this source.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store records, replacing any existing records with the same IDs.
    async fn upsert_batch(&self, records: &[VectorRecord]) -> Result<usize>;

    /// Return up to `limit` records ordered most-similar first. An empty
    /// collection yields an empty result, not an error.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Summaries of all indexed sources, most recently indexed first.
    async fn list_sources(&self) -> Result<Vec<IndexedSource>>;

    /// Total number of stored records.
    async fn document_count(&self) -> Result<usize>;
}

/// Cosine similarity between two vectors. Mismatched dimensions and
/// zero-magnitude vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rank candidate records against a query embedding: score, sort
/// most-similar first, keep the top `limit`. Shared by store backends.
pub(crate) fn rank_by_similarity(
    candidates: impl IntoIterator<Item = VectorRecord>,
    query_embedding: &[f32],
    limit: usize,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = candidates
        .into_iter()
        .map(|record| {
            let score = cosine_similarity(query_embedding, &record.embedding);
            SearchResult { record, score }
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    results
}
