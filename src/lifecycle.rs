//! Model lifecycle: one explicit context object owning the heavyweight
//! resources.
//!
//! The embedding model, vector store, and generative model are loaded once,
//! in that order, behind a single-initialization lock. Pipelines hold the
//! context by `Arc` and call [`ModelContext::ensure_ready`] before touching
//! a model; the accessor fails fast with a typed error instead of handing
//! out half-built resources.

use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{HarkError, Result};
use crate::generation::{CompletionGenerator, GenerationQueue, Generator};
use crate::index::VectorIndex;
use crate::vector_store::{MemoryVectorStore, SqliteVectorStore, VectorStore};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Lifecycle of the shared model resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Ready => "ready",
            LifecycleState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Initialization stages, in load order. A failure leaves later stages
/// unattempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    EmbeddingModel,
    VectorStore,
    GenerativeModel,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::EmbeddingModel => "embedding model",
            InitStage::VectorStore => "vector store",
            InitStage::GenerativeModel => "generative model",
        };
        write!(f, "{}", name)
    }
}

/// Shared handles to the loaded resources.
///
/// Read-only once built. Embedding and store calls are reentrant; the
/// generative model is reached only through its admission queue.
pub struct ModelSet {
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorStore>,
    pub index: Arc<VectorIndex>,
    pub generation: GenerationQueue,
}

struct Inner {
    state: LifecycleState,
    models: Option<Arc<ModelSet>>,
}

/// The pipeline's lifecycle manager, constructed once at startup.
///
/// `initialize()` is idempotent: a `READY` context returns immediately, a
/// `FAILED` one re-attempts, and concurrent callers serialize on an async
/// lock so a model is never loaded twice.
pub struct ModelContext {
    settings: Settings,
    inner: RwLock<Inner>,
    init_lock: Mutex<()>,
}

impl ModelContext {
    /// Create an uninitialized context over `settings`.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            inner: RwLock::new(Inner {
                state: LifecycleState::Uninitialized,
                models: None,
            }),
            init_lock: Mutex::new(()),
        }
    }

    /// Assemble a context from prebuilt components, entering `READY`
    /// directly. The injection seam for tests and alternative backends.
    /// Must be called from within the async runtime, as it starts the
    /// generation worker.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let generation = GenerationQueue::start(generator);
        let index = Arc::new(VectorIndex::new(embedder.clone(), store.clone()));
        let models = ModelSet {
            embedder,
            store,
            index,
            generation,
        };
        Self {
            settings,
            inner: RwLock::new(Inner {
                state: LifecycleState::Ready,
                models: Some(Arc::new(models)),
            }),
            init_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.inner
            .read()
            .map(|inner| inner.state)
            .unwrap_or(LifecycleState::Failed)
    }

    /// Shared handles if `READY`, a typed error otherwise. Fails fast
    /// rather than waiting for an initialization in flight.
    pub fn ensure_ready(&self) -> Result<Arc<ModelSet>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| HarkError::NotInitialized(LifecycleState::Failed))?;
        match (inner.state, &inner.models) {
            (LifecycleState::Ready, Some(models)) => Ok(models.clone()),
            (state, _) => Err(HarkError::NotInitialized(state)),
        }
    }

    /// Load the embedding model, vector store, and generative model, in that
    /// order. Safe to call repeatedly: a no-op once `READY`, a fresh attempt
    /// after a failure.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.init_lock.lock().await;

        if self.state() == LifecycleState::Ready {
            debug!("Pipeline already initialized");
            return Ok(());
        }

        self.set_state(LifecycleState::Initializing);
        info!("Initializing pipeline resources");

        match self.load_models() {
            Ok(models) => {
                if let Ok(mut inner) = self.inner.write() {
                    inner.models = Some(Arc::new(models));
                    inner.state = LifecycleState::Ready;
                }
                info!("Pipeline ready");
                Ok(())
            }
            Err(e) => {
                self.set_state(LifecycleState::Failed);
                error!("Initialization failed: {}", e);
                Err(e)
            }
        }
    }

    /// Release the model set and return to `UNINITIALIZED`.
    ///
    /// Dropping the queue handle stops the generation worker once queued
    /// jobs drain. A later `initialize()` starts from scratch.
    pub async fn shutdown(&self) {
        let _guard = self.init_lock.lock().await;
        if let Ok(mut inner) = self.inner.write() {
            if inner.models.take().is_some() {
                info!("Released pipeline resources");
            }
            inner.state = LifecycleState::Uninitialized;
        }
    }

    fn set_state(&self, state: LifecycleState) {
        if let Ok(mut inner) = self.inner.write() {
            inner.state = state;
        }
    }

    fn load_models(&self) -> Result<ModelSet> {
        let embedder = self
            .build_embedder()
            .map_err(|e| stage_error(InitStage::EmbeddingModel, e))?;
        info!(model = %self.settings.embedding.model, "Embedding model ready");

        let store = self
            .open_store()
            .map_err(|e| stage_error(InitStage::VectorStore, e))?;
        info!(provider = %self.settings.vector_store.provider, "Vector store ready");

        let generator = self
            .build_generator()
            .map_err(|e| stage_error(InitStage::GenerativeModel, e))?;
        info!(model = %self.settings.generation.model, "Generative model ready");

        let generation = GenerationQueue::start(generator);
        let index = Arc::new(VectorIndex::new(embedder.clone(), store.clone()));

        Ok(ModelSet {
            embedder,
            store,
            index,
            generation,
        })
    }

    fn build_embedder(&self) -> Result<Arc<dyn Embedder>> {
        let cfg = &self.settings.embedding;
        match cfg.provider.as_str() {
            "openai" => Ok(Arc::new(OpenAIEmbedder::new(
                &cfg.model,
                cfg.dimensions as usize,
                self.settings.api.base_url.as_deref(),
            )?)),
            other => Err(HarkError::Config(format!(
                "Unknown embedding provider: {}",
                other
            ))),
        }
    }

    fn open_store(&self) -> Result<Arc<dyn VectorStore>> {
        let cfg = &self.settings.vector_store;
        match cfg.provider.as_str() {
            "sqlite" => Ok(Arc::new(SqliteVectorStore::new(&self.settings.sqlite_path())?)),
            "memory" => Ok(Arc::new(MemoryVectorStore::new())),
            other => Err(HarkError::Config(format!(
                "Unknown vector store provider: {}",
                other
            ))),
        }
    }

    fn build_generator(&self) -> Result<Arc<dyn Generator>> {
        let cfg = &self.settings.generation;
        match cfg.provider.as_str() {
            "openai" => Ok(Arc::new(CompletionGenerator::new(
                &cfg.model,
                cfg.max_tokens,
                cfg.stop.clone(),
                self.settings.api.base_url.as_deref(),
            )?)),
            other => Err(HarkError::Config(format!(
                "Unknown generation provider: {}",
                other
            ))),
        }
    }
}

fn stage_error(stage: InitStage, source: HarkError) -> HarkError {
    HarkError::Initialization {
        stage,
        message: source.to_string(),
    }
}
