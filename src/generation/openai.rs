//! Text completion over the OpenAI-compatible API.

use super::Generator;
use crate::error::{HarkError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateCompletionRequestArgs, Stop};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Generator backed by an OpenAI-compatible text-completion endpoint.
///
/// Uses the completions API rather than chat: the prompt carries its own
/// instruction block and ends with an answer cue, and the stop sequences cut
/// the model off before it invents follow-up questions.
pub struct CompletionGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    stop: Vec<String>,
}

impl CompletionGenerator {
    /// Create a generator for `model` with a hard output cap and stop
    /// sequences. `api_base` selects a non-default (local) endpoint.
    pub fn new(
        model: &str,
        max_tokens: u32,
        stop: Vec<String>,
        api_base: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client(api_base)?,
            model: model.to_string(),
            max_tokens,
            stop,
        })
    }
}

#[async_trait]
impl Generator for CompletionGenerator {
    #[instrument(skip(self, prompt), fields(prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut builder = CreateCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .prompt(prompt)
            .max_tokens(self.max_tokens)
            .echo(false);
        if !self.stop.is_empty() {
            builder.stop(Stop::StringArray(self.stop.clone()));
        }
        let request = builder
            .build()
            .map_err(|e| HarkError::Generation(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .completions()
            .create(request)
            .await
            .map_err(|e| HarkError::OpenAI(format!("Completion API error: {}", e)))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| HarkError::Generation("Empty completion response".to_string()))?;

        debug!("Generated {} characters", text.len());
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_for_hosted_and_local_endpoints() {
        assert!(CompletionGenerator::new("gpt-4o-mini", 512, vec![], None).is_ok());
        assert!(CompletionGenerator::new(
            "llama3",
            512,
            vec!["Question:".to_string(), "\n".to_string()],
            Some("http://localhost:8080/v1"),
        )
        .is_ok());
    }
}
