//! Pre-flight checks before expensive operations.
//!
//! Validates that API access is configured before starting operations that
//! would otherwise fail midway.

use crate::config::Settings;
use crate::error::{HarkError, Result};

/// Verify the process can reach a model backend.
///
/// A configured OpenAI-compatible base URL counts as access (local servers
/// need no key); otherwise `OPENAI_API_KEY` must be set and non-empty.
pub fn check_api_access(settings: &Settings) -> Result<()> {
    if settings.api.base_url.is_some() {
        return Ok(());
    }

    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(HarkError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(HarkError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_base_url_needs_no_key() {
        let mut settings = Settings::default();
        settings.api.base_url = Some("http://localhost:8080/v1".to_string());
        assert!(check_api_access(&settings).is_ok());
    }
}
