//! Shared fakes for unit tests: deterministic embeddings, scripted
//! generation, and a ready-to-use in-memory pipeline context.

use crate::config::Settings;
use crate::embedding::Embedder;
use crate::error::{HarkError, Result};
use crate::generation::Generator;
use crate::lifecycle::ModelContext;
use crate::vector_store::MemoryVectorStore;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

/// Deterministic bag-of-words embedder. Texts sharing words get similar
/// vectors, which is all retrieval tests need.
pub(crate) struct StubEmbedder {
    dims: usize,
}

impl StubEmbedder {
    pub(crate) fn new() -> Self {
        Self { dims: 32 }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dims];
        let words = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        for word in words {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            vector[(hasher.finish() as usize) % self.dims] += 1.0;
        }
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// Embedder that always fails, for error-containment tests.
pub(crate) struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(HarkError::Embedding("stub embedder offline".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(HarkError::Embedding("stub embedder offline".to_string()))
    }

    fn dimensions(&self) -> usize {
        0
    }
}

/// Generator that replies with a fixed answer and records every prompt it
/// was given.
pub(crate) struct ScriptedGenerator {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub(crate) fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }
}

/// Generator that always fails, for apology-path tests.
pub(crate) struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(HarkError::Generation("stub backend offline".to_string()))
    }
}

/// A `READY` context over an in-memory store with stub models.
pub(crate) fn ready_context(generator: Arc<dyn Generator>) -> Arc<ModelContext> {
    Arc::new(ModelContext::with_components(
        Settings::default(),
        Arc::new(StubEmbedder::new()),
        Arc::new(MemoryVectorStore::new()),
        generator,
    ))
}
