//! Speech-to-text transcription.
//!
//! One trait, one production implementation backed by the OpenAI audio
//! transcription API. Voice memos are short, so a file is sent whole; there
//! is no splitting or timestamp handling here.

mod whisper;

pub use whisper::{is_api_key_configured, WhisperTranscriber};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}
