//! SQLite-backed vector store.
//!
//! Stores embeddings as little-endian f32 blobs and computes cosine
//! similarity in Rust. Collections here are small (one row per transcript
//! chunk), so a full scan per query is fine; swap in a dedicated vector
//! database behind the trait if that stops being true.

use super::{rank_by_similarity, IndexedSource, SearchResult, VectorRecord, VectorStore};
use crate::error::{HarkError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS voice_transcripts (
        id TEXT PRIMARY KEY,
        source TEXT NOT NULL,
        content TEXT NOT NULL,
        embedding BLOB NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_voice_transcripts_source
        ON voice_transcripts(source);
"#;

/// SQLite-backed vector store holding the `voice_transcripts` collection.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) the store at `path`, creating parent directories as
    /// needed.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL lets queries proceed while an ingestion writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests and ephemeral runs.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| HarkError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn parse_timestamp(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<VectorRecord> {
        let embedding_bytes: Vec<u8> = row.get(3)?;
        let indexed_at_str: String = row.get(4)?;
        Ok(VectorRecord {
            id: row.get(0)?,
            source: row.get(1)?,
            content: row.get(2)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: Self::parse_timestamp(&indexed_at_str),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, records))]
    async fn upsert_batch(&self, records: &[VectorRecord]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for record in records {
            let embedding_bytes = Self::embedding_to_bytes(&record.embedding);
            tx.execute(
                r#"
                INSERT OR REPLACE INTO voice_transcripts
                    (id, source, content, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record.id,
                    record.source,
                    record.content,
                    embedding_bytes,
                    record.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        debug!("Upserted {} records", records.len());
        Ok(records.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, source, content, embedding, indexed_at FROM voice_transcripts",
        )?;
        let records: Vec<VectorRecord> = stmt
            .query_map([], Self::row_to_record)?
            .filter_map(|r| r.ok())
            .collect();

        let results = rank_by_similarity(records, query_embedding, limit);
        debug!("Found {} matching records", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source, COUNT(*) as chunk_count, MAX(indexed_at) as indexed_at
            FROM voice_transcripts
            GROUP BY source
            ORDER BY indexed_at DESC
            "#,
        )?;

        let sources = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(2)?;
            Ok(IndexedSource {
                source: row.get(0)?,
                chunk_count: row.get(1)?,
                indexed_at: Self::parse_timestamp(&indexed_at_str),
            })
        })?;

        Ok(sources.filter_map(|s| s.ok()).collect())
    }

    async fn document_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM voice_transcripts", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, source: &str, content: &str, embedding: Vec<f32>) -> VectorRecord {
        VectorRecord::new(id, source, content, embedding)
    }

    #[tokio::test]
    async fn upsert_and_search_round_trip() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store
            .upsert_batch(&[
                record("call1.m4a_0", "call1.m4a", "Alice called", vec![1.0, 0.0]),
                record("call1.m4a_1", "call1.m4a", "Bob confirmed", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.id, "call1.m4a_0");
        assert!((results[0].score - 1.0).abs() < 0.001);
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn search_never_exceeds_the_limit() {
        let store = SqliteVectorStore::in_memory().unwrap();
        let records: Vec<VectorRecord> = (0..8)
            .map(|i| {
                record(
                    &format!("call1.m4a_{i}"),
                    "call1.m4a",
                    "text",
                    vec![1.0, i as f32],
                )
            })
            .collect();
        store.upsert_batch(&records).await.unwrap();

        assert_eq!(store.search(&[1.0, 0.0], 3).await.unwrap().len(), 3);
        assert_eq!(store.search(&[1.0, 0.0], 100).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn empty_store_searches_to_nothing() {
        let store = SqliteVectorStore::in_memory().unwrap();
        assert!(store.search(&[1.0, 0.0], 5).await.unwrap().is_empty());
        assert_eq!(store.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn same_id_upserts_replace_instead_of_duplicating() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store
            .upsert_batch(&[record("call1.m4a_0", "call1.m4a", "old text", vec![1.0, 0.0])])
            .await
            .unwrap();
        store
            .upsert_batch(&[record("call1.m4a_0", "call1.m4a", "new text", vec![1.0, 0.0])])
            .await
            .unwrap();

        assert_eq!(store.document_count().await.unwrap(), 1);
        let results = store.search(&[1.0, 0.0], 5).await.unwrap();
        assert_eq!(results[0].record.content, "new text");
    }

    #[tokio::test]
    async fn list_sources_groups_by_source() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store
            .upsert_batch(&[
                record("call1.m4a_0", "call1.m4a", "a", vec![1.0]),
                record("call1.m4a_1", "call1.m4a", "b", vec![1.0]),
                record("call2.m4a_0", "call2.m4a", "c", vec![1.0]),
            ])
            .await
            .unwrap();

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 2);
        let call1 = sources.iter().find(|s| s.source == "call1.m4a").unwrap();
        assert_eq!(call1.chunk_count, 2);
    }

    #[tokio::test]
    async fn collection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        {
            let store = SqliteVectorStore::new(&path).unwrap();
            store
                .upsert_batch(&[record("call1.m4a_0", "call1.m4a", "persisted", vec![0.0, 1.0])])
                .await
                .unwrap();
        }

        let reopened = SqliteVectorStore::new(&path).unwrap();
        let results = reopened.search(&[0.0, 1.0], 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.content, "persisted");
    }
}
