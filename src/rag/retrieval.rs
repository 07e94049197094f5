//! Retrieval over the vector index, collapsed to documents plus sources.

use crate::error::Result;
use crate::lifecycle::ModelContext;
use crate::vector_store::SearchResult;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Documents retrieved for one question, with their deduplicated sources.
#[derive(Debug, Clone, Default)]
pub struct Retrieved {
    /// Chunk texts, most similar first.
    pub documents: Vec<String>,
    /// Source file names behind the documents.
    pub sources: BTreeSet<String>,
}

impl Retrieved {
    /// True when retrieval found nothing; the "no information" case, not an
    /// error.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Fetches the most similar transcript chunks for a question.
pub struct RetrievalEngine {
    ctx: Arc<ModelContext>,
}

impl RetrievalEngine {
    pub fn new(ctx: Arc<ModelContext>) -> Self {
        Self { ctx }
    }

    /// Top-`k` chunk texts for `question`, most similar first, with their
    /// sources collapsed into a set.
    #[instrument(skip(self), fields(question = %question, k = k))]
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Retrieved> {
        let results = self.search(question, k).await?;

        let mut documents = Vec::with_capacity(results.len());
        let mut sources = BTreeSet::new();
        for result in results {
            documents.push(result.record.content);
            sources.insert(result.record.source);
        }

        debug!(documents = documents.len(), sources = sources.len(), "Retrieved context");
        Ok(Retrieved { documents, sources })
    }

    /// Raw scored matches, for search-style callers that want scores and
    /// per-chunk sources.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let models = self.ctx.ensure_ready()?;
        models.index.query(query, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;
    use crate::testing::{ready_context, ScriptedGenerator};

    async fn seeded_context() -> Arc<ModelContext> {
        let ctx = ready_context(Arc::new(ScriptedGenerator::answering("unused")));
        let models = ctx.ensure_ready().unwrap();
        let chunks = vec![
            Chunk::new("Alice called about the invoice.", "one.m4a", 0),
            Chunk::new("Bob confirmed the payment went through.", "one.m4a", 1),
            Chunk::new("Reminder to renew the office lease.", "two.m4a", 0),
        ];
        models.index.add(&chunks).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn respects_the_limit() {
        let ctx = seeded_context().await;
        let engine = RetrievalEngine::new(ctx);

        let retrieved = engine.retrieve("payment invoice lease", 2).await.unwrap();
        assert_eq!(retrieved.documents.len(), 2);
    }

    #[tokio::test]
    async fn most_similar_document_comes_first() {
        let ctx = seeded_context().await;
        let engine = RetrievalEngine::new(ctx);

        let retrieved = engine
            .retrieve("Bob confirmed the payment went through.", 3)
            .await
            .unwrap();
        assert_eq!(
            retrieved.documents[0],
            "Bob confirmed the payment went through."
        );
    }

    #[tokio::test]
    async fn sources_are_deduplicated() {
        let ctx = seeded_context().await;
        let engine = RetrievalEngine::new(ctx);

        let retrieved = engine.retrieve("invoice payment lease", 3).await.unwrap();
        assert_eq!(retrieved.documents.len(), 3);
        assert_eq!(retrieved.sources.len(), 2);
        assert!(retrieved.sources.contains("one.m4a"));
        assert!(retrieved.sources.contains("two.m4a"));
    }

    #[tokio::test]
    async fn empty_index_retrieves_nothing() {
        let ctx = ready_context(Arc::new(ScriptedGenerator::answering("unused")));
        let engine = RetrievalEngine::new(ctx);

        let retrieved = engine.retrieve("anything", 5).await.unwrap();
        assert!(retrieved.is_empty());
        assert!(retrieved.sources.is_empty());
    }

    #[tokio::test]
    async fn scored_search_keeps_scores_descending() {
        let ctx = seeded_context().await;
        let engine = RetrievalEngine::new(ctx);

        let results = engine.search("invoice payment", 3).await.unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
