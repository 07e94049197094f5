//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! Answers are grounded strictly in retrieved transcript chunks; when
//! retrieval comes up empty the pipeline returns a fixed sentinel instead of
//! letting the model invent one.

mod prompt;
mod query;
mod retrieval;

pub use prompt::{PromptBuilder, FALLBACK_PHRASE};
pub use query::QueryPipeline;
pub use retrieval::{Retrieved, RetrievalEngine};

use serde::Serialize;
use std::collections::BTreeSet;

/// Answer shown when the pipeline has not finished initializing.
pub const NOT_READY_ANSWER: &str =
    "The pipeline is not ready yet. Initialize it and ask again.";

/// Answer shown when the generative model call fails.
pub const GENERATION_FAILED_ANSWER: &str =
    "Sorry, something went wrong while generating an answer. Please try again.";

/// How a query concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Generated from retrieved context.
    Answered,
    /// Retrieval found nothing; answer is the fallback sentinel.
    NoInformation,
    /// The pipeline was not `READY`.
    NotReady,
    /// Retrieval or generation failed; answer is an apology.
    Failed,
}

/// Result of one question through the [`QueryPipeline`].
///
/// Always carries a displayable `answer`; `sources` is the deduplicated set
/// of source files behind it, empty for every outcome but `Answered`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub answer: String,
    pub sources: BTreeSet<String>,
    pub outcome: QueryOutcome,
}

impl QueryResult {
    pub fn answered(answer: String, sources: BTreeSet<String>) -> Self {
        Self {
            answer,
            sources,
            outcome: QueryOutcome::Answered,
        }
    }

    pub fn no_information() -> Self {
        Self {
            answer: FALLBACK_PHRASE.to_string(),
            sources: BTreeSet::new(),
            outcome: QueryOutcome::NoInformation,
        }
    }

    pub fn not_ready() -> Self {
        Self {
            answer: NOT_READY_ANSWER.to_string(),
            sources: BTreeSet::new(),
            outcome: QueryOutcome::NotReady,
        }
    }

    pub fn failed() -> Self {
        Self {
            answer: GENERATION_FAILED_ANSWER.to_string(),
            sources: BTreeSet::new(),
            outcome: QueryOutcome::Failed,
        }
    }
}
