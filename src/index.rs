//! The vector index: embedding model plus vector store, addressed by chunk
//! identity.

use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{HarkError, Result};
use crate::vector_store::{SearchResult, VectorRecord, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Persistent index of embedded transcript chunks.
///
/// `add` embeds chunks in one batched call and upserts them under their
/// stable `"<source>_<index>"` keys; `query` embeds the query text and
/// returns the nearest stored chunks.
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl VectorIndex {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// The underlying store, for source listings and counts.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Embed and upsert `chunks`, returning the number of records written.
    /// An empty slice writes nothing and returns 0.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn add(&self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(HarkError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| VectorRecord::from_chunk(chunk, embedding))
            .collect();

        let written = self.store.upsert_batch(&records).await?;
        debug!("Indexed {} chunks", written);
        Ok(written)
    }

    /// Return up to `k` stored chunks nearest to `text`, most similar first.
    /// An empty collection yields an empty result, not an error.
    #[instrument(skip(self, text))]
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query_embedding = self.embedder.embed(text).await?;
        self.store.search(&query_embedding, k).await
    }
}
