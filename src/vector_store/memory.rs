//! In-memory vector store.
//!
//! Backs tests and ephemeral runs where persistence is not wanted.

use super::{rank_by_similarity, IndexedSource, SearchResult, VectorRecord, VectorStore};
use crate::error::{HarkError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store keyed by record ID.
pub struct MemoryVectorStore {
    records: RwLock<HashMap<String, VectorRecord>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, records: &[VectorRecord]) -> Result<usize> {
        let mut store = self
            .records
            .write()
            .map_err(|e| HarkError::VectorStore(format!("Failed to acquire lock: {}", e)))?;
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let store = self
            .records
            .read()
            .map_err(|e| HarkError::VectorStore(format!("Failed to acquire lock: {}", e)))?;
        Ok(rank_by_similarity(
            store.values().cloned(),
            query_embedding,
            limit,
        ))
    }

    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let store = self
            .records
            .read()
            .map_err(|e| HarkError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let mut by_source: HashMap<String, IndexedSource> = HashMap::new();
        for record in store.values() {
            let entry = by_source
                .entry(record.source.clone())
                .or_insert_with(|| IndexedSource {
                    source: record.source.clone(),
                    chunk_count: 0,
                    indexed_at: record.indexed_at,
                });
            entry.chunk_count += 1;
            if record.indexed_at > entry.indexed_at {
                entry.indexed_at = record.indexed_at;
            }
        }

        let mut sources: Vec<IndexedSource> = by_source.into_values().collect();
        sources.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));
        Ok(sources)
    }

    async fn document_count(&self) -> Result<usize> {
        let store = self
            .records
            .read()
            .map_err(|e| HarkError::VectorStore(format!("Failed to acquire lock: {}", e)))?;
        Ok(store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_orders_by_similarity() {
        let store = MemoryVectorStore::new();

        store
            .upsert_batch(&[
                VectorRecord::new("a_0", "a", "close", vec![1.0, 0.1]),
                VectorRecord::new("a_1", "a", "far", vec![0.0, 1.0]),
                VectorRecord::new("b_0", "b", "exact", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].record.content, "exact");
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[tokio::test]
    async fn upserts_by_id_replace_prior_records() {
        let store = MemoryVectorStore::new();

        store
            .upsert_batch(&[VectorRecord::new("a_0", "a", "first", vec![1.0])])
            .await
            .unwrap();
        store
            .upsert_batch(&[VectorRecord::new("a_0", "a", "second", vec![1.0])])
            .await
            .unwrap();

        assert_eq!(store.document_count().await.unwrap(), 1);
        let results = store.search(&[1.0], 1).await.unwrap();
        assert_eq!(results[0].record.content, "second");
    }

    #[tokio::test]
    async fn sources_aggregate_chunk_counts() {
        let store = MemoryVectorStore::new();

        store
            .upsert_batch(&[
                VectorRecord::new("x_0", "x", "1", vec![1.0]),
                VectorRecord::new("x_1", "x", "2", vec![1.0]),
                VectorRecord::new("x_2", "x", "3", vec![1.0]),
                VectorRecord::new("y_0", "y", "4", vec![1.0]),
            ])
            .await
            .unwrap();

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 2);
        let x = sources.iter().find(|s| s.source == "x").unwrap();
        assert_eq!(x.chunk_count, 3);
    }
}
