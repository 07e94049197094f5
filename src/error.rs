//! Error types for Hark.

use thiserror::Error;

use crate::lifecycle::{InitStage, LifecycleState};

/// Library-level error type for Hark operations.
#[derive(Error, Debug)]
pub enum HarkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed at the {stage} stage: {message}")]
    Initialization { stage: InitStage, message: String },

    #[error("Pipeline is not initialized (state: {0}); call initialize() first")]
    NotInitialized(LifecycleState),

    // The field cannot be called `source`: thiserror reserves that name
    // for the error cause and requires it to be an Error itself.
    #[error("Ingestion failed for '{source_name}': {message}")]
    Ingestion {
        source_name: String,
        message: String,
    },

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl HarkError {
    /// True for the failure modes a caller can recover from by
    /// (re-)initializing the pipeline and trying again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HarkError::NotInitialized(_))
    }
}

/// Result type alias for Hark operations.
pub type Result<T> = std::result::Result<T, HarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingestion_errors_name_the_failing_source() {
        let err = HarkError::Ingestion {
            source_name: "call1.m4a".to_string(),
            message: "store offline".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Ingestion failed for 'call1.m4a': store offline"
        );
        // Per-file failures carry no cause chain
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn only_not_initialized_is_recoverable() {
        assert!(HarkError::NotInitialized(LifecycleState::Failed).is_recoverable());
        assert!(!HarkError::Generation("backend offline".to_string()).is_recoverable());
    }
}
