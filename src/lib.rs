//! Hark - Voice Memo Transcription and RAG
//!
//! A local-first CLI tool that turns a folder of voice memos into a
//! searchable, askable knowledge base.
//!
//! To "hark" is to listen attentively.
//!
//! # Overview
//!
//! Hark allows you to:
//! - Watch a folder and transcribe new voice memos as they appear
//! - Build a persistent vector index from the transcripts
//! - Ask questions answered strictly from your own recordings, with sources
//! - Search through your memos semantically
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `lifecycle` - Model loading, readiness, and shutdown
//! - `watcher` - Audio folder polling
//! - `transcription` - Speech-to-text transcription
//! - `chunking` - Transcript chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `index` - Chunk indexing and similarity queries
//! - `ingest` - Transcript-to-index pipeline
//! - `generation` - Answer generation behind an admission queue
//! - `rag` - Retrieval and question answering
//!
//! # Example
//!
//! ```rust,no_run
//! use hark::config::Settings;
//! use hark::ingest::IngestionPipeline;
//! use hark::lifecycle::ModelContext;
//! use hark::rag::QueryPipeline;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let ctx = Arc::new(ModelContext::new(settings));
//!     ctx.initialize().await?;
//!
//!     let indexed = IngestionPipeline::new(ctx.clone())
//!         .ingest("Bob confirmed the payment went through.", "call1.m4a")
//!         .await?;
//!     println!("Indexed {} chunks", indexed);
//!
//!     let result = QueryPipeline::new(ctx.clone())
//!         .answer("Who confirmed the payment?")
//!         .await;
//!     println!("{}", result.answer);
//!
//!     ctx.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingest;
pub mod lifecycle;
pub mod openai;
pub mod rag;
pub mod transcription;
pub mod vector_store;
pub mod watcher;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{HarkError, Result};
