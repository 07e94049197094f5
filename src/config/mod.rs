//! Configuration module for Hark.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    ApiSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings, GenerationSettings,
    RagSettings, Settings, TranscriptionSettings, VectorStoreSettings, WatcherSettings,
};
