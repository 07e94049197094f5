//! The question-answering pipeline: retrieve, build a prompt, generate.

use super::{PromptBuilder, QueryResult, RetrievalEngine};
use crate::lifecycle::ModelContext;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Answers questions strictly from indexed transcripts.
pub struct QueryPipeline {
    ctx: Arc<ModelContext>,
    retrieval: RetrievalEngine,
}

impl QueryPipeline {
    pub fn new(ctx: Arc<ModelContext>) -> Self {
        Self {
            retrieval: RetrievalEngine::new(ctx.clone()),
            ctx,
        }
    }

    /// Answer one question. Never fails: an unready pipeline, empty
    /// retrieval, and model errors all fold into a [`QueryResult`] carrying
    /// an explanatory answer and the matching outcome.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn answer(&self, question: &str) -> QueryResult {
        let models = match self.ctx.ensure_ready() {
            Ok(models) => models,
            Err(e) => {
                warn!("Query before readiness: {}", e);
                return QueryResult::not_ready();
            }
        };

        let top_k = self.ctx.settings().rag.top_k as usize;
        let retrieved = match self.retrieval.retrieve(question, top_k).await {
            Ok(retrieved) => retrieved,
            Err(e) => {
                error!("Retrieval failed: {}", e);
                return QueryResult::failed();
            }
        };

        if retrieved.is_empty() {
            info!("No relevant context found");
            return QueryResult::no_information();
        }

        let prompt = PromptBuilder::build(question, &retrieved.documents);
        match models.generation.generate(&prompt).await {
            Ok(answer) => {
                info!(sources = retrieved.sources.len(), "Question answered");
                QueryResult::answered(answer, retrieved.sources)
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                QueryResult::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::IngestionPipeline;
    use crate::rag::{QueryOutcome, FALLBACK_PHRASE, GENERATION_FAILED_ANSWER, NOT_READY_ANSWER};
    use crate::testing::{ready_context, FailingGenerator, ScriptedGenerator};

    #[tokio::test]
    async fn answers_from_an_ingested_memo_with_its_source() {
        let generator = Arc::new(ScriptedGenerator::answering("Bob confirmed the payment."));
        let ctx = ready_context(generator.clone());

        let added = IngestionPipeline::new(ctx.clone())
            .ingest("Alice called about the invoice. Bob confirmed payment.", "call1.m4a")
            .await
            .unwrap();
        assert_eq!(added, 1);

        let models = ctx.ensure_ready().unwrap();
        let hits = models.index.query("Who confirmed payment?", 1).await.unwrap();
        assert_eq!(hits[0].record.id, "call1.m4a_0");

        let result = QueryPipeline::new(ctx).answer("Who confirmed payment?").await;
        assert_eq!(result.outcome, QueryOutcome::Answered);
        assert!(result.answer.contains("Bob"));
        assert_eq!(result.sources.len(), 1);
        assert!(result.sources.contains("call1.m4a"));

        // The model saw the retrieved transcript and the question
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Bob confirmed payment."));
        assert!(prompts[0].contains("Question: Who confirmed payment?"));
    }

    #[tokio::test]
    async fn empty_index_short_circuits_to_the_sentinel() {
        let generator = Arc::new(ScriptedGenerator::answering("should not run"));
        let ctx = ready_context(generator.clone());

        let result = QueryPipeline::new(ctx).answer("Anything at all?").await;
        assert_eq!(result.outcome, QueryOutcome::NoInformation);
        assert_eq!(result.answer, FALLBACK_PHRASE);
        assert!(result.sources.is_empty());
        // Generation never runs without context
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn generation_failure_becomes_an_apology() {
        let ctx = ready_context(Arc::new(FailingGenerator));
        IngestionPipeline::new(ctx.clone())
            .ingest("Something worth retrieving.", "memo.m4a")
            .await
            .unwrap();

        let result = QueryPipeline::new(ctx).answer("What is worth retrieving?").await;
        assert_eq!(result.outcome, QueryOutcome::Failed);
        assert_eq!(result.answer, GENERATION_FAILED_ANSWER);
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn unready_pipeline_reports_not_ready() {
        let ctx = Arc::new(ModelContext::new(Default::default()));

        let result = QueryPipeline::new(ctx).answer("Hello?").await;
        assert_eq!(result.outcome, QueryOutcome::NotReady);
        assert_eq!(result.answer, NOT_READY_ANSWER);
        assert!(result.sources.is_empty());
    }
}
