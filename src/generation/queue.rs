//! Single-worker admission queue for the generative model.
//!
//! The generative backend is treated as a serially reentrant resource: many
//! callers may ask at once, but only one completion runs at a time. Requests
//! flow through a bounded FIFO channel into a single worker task that owns
//! the generator; each reply comes back on its request's oneshot channel.

use super::Generator;
use crate::error::{HarkError, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Requests admitted before further callers wait for a slot.
const QUEUE_DEPTH: usize = 32;

struct Job {
    prompt: String,
    reply: oneshot::Sender<Result<String>>,
}

/// Serialized front door to the generative model.
///
/// Clones share one worker. The worker stops once every clone is dropped and
/// the queued jobs have drained.
#[derive(Clone)]
pub struct GenerationQueue {
    tx: mpsc::Sender<Job>,
}

impl GenerationQueue {
    /// Spawn the worker task owning `generator`; jobs run one at a time in
    /// arrival order.
    pub fn start(generator: Arc<dyn Generator>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Job>(QUEUE_DEPTH);

        tokio::spawn(async move {
            debug!("Generation worker started");
            while let Some(job) = rx.recv().await {
                let result = generator.generate(&job.prompt).await;
                // The caller may have gone away in the meantime
                let _ = job.reply.send(result);
            }
            debug!("Generation worker stopped");
        });

        Self { tx }
    }

    /// Run one generation: wait for admission, then for the worker's reply.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Job {
                prompt: prompt.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| HarkError::Generation("Generation worker is not running".to_string()))?;

        reply_rx
            .await
            .map_err(|_| HarkError::Generation("Generation worker dropped the request".to_string()))?
    }
}
