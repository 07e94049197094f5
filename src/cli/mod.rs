//! CLI module for Hark.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Hark - Voice Memo Transcription and RAG
///
/// A local-first CLI tool that watches a folder of voice memos, transcribes
/// them, and answers questions from their content. To "hark" is to listen
/// attentively.
#[derive(Parser, Debug)]
#[command(name = "hark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Hark: create config and data directories
    Init,

    /// Check configuration and environment
    Doctor,

    /// Watch the audio folder and index new voice memos
    Watch,

    /// Ingest a single file: .txt as a transcript, anything else as audio
    Ingest {
        /// Path to the transcript or audio file
        file: String,

        /// Source name to record instead of the file name
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Ask a question answered from your voice memos
    Ask {
        /// The question to ask
        question: String,
    },

    /// Search indexed memos without generating an answer
    Search {
        /// Search query
        query: String,

        /// Maximum number of results (defaults to the configured top-k)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Start an interactive question-answering session
    Chat,

    /// List indexed sources
    List,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Open configuration file in editor
    Edit,
}
