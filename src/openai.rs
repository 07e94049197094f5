//! OpenAI-compatible client configuration.

use crate::error::{HarkError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;
use url::Url;

/// Default timeout for model API requests (5 minutes). Generation against
/// local backends can take a while.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for the configured OpenAI-compatible endpoint.
///
/// `api_base` replaces the default endpoint, which points the client at a
/// local OpenAI-compatible server (llama.cpp, Ollama, vLLM) instead of the
/// hosted API.
pub fn create_client(api_base: Option<&str>) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(api_base, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a client with a custom request timeout.
pub fn create_client_with_timeout(
    api_base: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = api_base {
        let parsed = Url::parse(base)
            .map_err(|e| HarkError::Config(format!("Invalid API base URL '{}': {}", base, e)))?;
        // async-openai appends "/<path>" itself; a trailing slash here
        // would produce double slashes
        config = config.with_api_base(parsed.as_str().trim_end_matches('/'));
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_needs_no_base_url() {
        assert!(create_client(None).is_ok());
    }

    #[test]
    fn local_base_url_is_accepted() {
        assert!(create_client(Some("http://localhost:11434/v1")).is_ok());
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let err = create_client(Some("not a url")).unwrap_err();
        assert!(matches!(err, HarkError::Config(_)));
    }
}
