//! LLM provider factory.
//!
//! Builds an [`LlmClient`] from the configured provider name.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use bharata_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently only "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `timeout` - Optional per-request HTTP timeout
///
/// # Errors
/// Returns `AppError::Config` for unknown providers and `AppError::Llm`
/// if the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    timeout: Option<Duration>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let client = match timeout {
                Some(timeout) => OllamaClient::with_timeout(base_url, timeout)?,
                None => OllamaClient::with_base_url(base_url),
            };
            tracing::debug!("Created Ollama client for {}", base_url);
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint_and_timeout() {
        let client = create_client(
            "Ollama",
            Some("http://localhost:8080"),
            Some(Duration::from_secs(5)),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None) {
            Err(AppError::Config(msg)) => assert!(msg.contains("Unknown provider")),
            _ => panic!("Expected config error for unknown provider"),
        }
    }
}
