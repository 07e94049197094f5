//! Answer generation against the generative model.

mod openai;
mod queue;

pub use openai::CompletionGenerator;
pub use queue::GenerationQueue;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for answer generation implementations.
///
/// A call may take seconds to tens of seconds; callers must not assume
/// sub-second latency.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`, trimmed of surrounding whitespace.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
