//! Rewriting retrieved excerpts into direct answers.

use crate::enhance::Enhanced;
use async_trait::async_trait;
use bharata_core::AppResult;
use bharata_llm::{LlmClient, LlmRequest};
use bharata_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Label some models echo back before the rewritten text.
const PARAPHRASE_LABEL: &str = "paraphrase:";

/// Best-effort rewrite of an answer for a question. Never fails; problems
/// come back as [`Enhanced::Fallback`] holding the input text.
#[async_trait]
pub trait Paraphraser: Send + Sync {
    async fn paraphrase(&self, text: &str, question: &str) -> Enhanced<String>;
}

/// Returns the text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopParaphraser;

#[async_trait]
impl Paraphraser for NoopParaphraser {
    async fn paraphrase(&self, text: &str, _question: &str) -> Enhanced<String> {
        Enhanced::Skipped(text.to_string())
    }
}

/// Paraphraser backed by an LLM and the `paraphrase.default` prompt.
pub struct LlmParaphraser {
    client: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
}

impl LlmParaphraser {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, prompt: PromptDefinition) -> Self {
        Self {
            client,
            model: model.into(),
            prompt,
        }
    }

    async fn generate(&self, text: &str, question: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("answer".to_string(), text.to_string());

        let built = build_prompt(&self.prompt, variables)?;
        let behavior = &built.metadata.behavior;

        let mut request =
            LlmRequest::new(built.user, &self.model).with_temperature(behavior.temperature.unwrap_or(0.0));
        if let Some(max_tokens) = behavior.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        let response = self.client.complete(&request).await?;
        Ok(strip_label(&response.content).to_string())
    }
}

#[async_trait]
impl Paraphraser for LlmParaphraser {
    async fn paraphrase(&self, text: &str, question: &str) -> Enhanced<String> {
        if text.trim().is_empty() {
            return Enhanced::Skipped(text.to_string());
        }

        match self.generate(text, question).await {
            Ok(output) if !output.is_empty() => Enhanced::Enhanced(output),
            Ok(_) => Enhanced::fallback(text.to_string(), "paraphraser returned empty output"),
            Err(e) => Enhanced::fallback(text.to_string(), format!("paraphrase failed: {}", e)),
        }
    }
}

/// Trim and drop a leading "Paraphrase:" label in any case.
fn strip_label(output: &str) -> &str {
    let output = output.trim();
    match output.get(..PARAPHRASE_LABEL.len()) {
        Some(head) if head.eq_ignore_ascii_case(PARAPHRASE_LABEL) => {
            output[PARAPHRASE_LABEL.len()..].trim_start()
        }
        _ => output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bharata_core::AppError;
    use bharata_llm::{LlmResponse, LlmUsage};
    use bharata_prompt::{builtin_prompt, PARAPHRASE_PROMPT_ID};
    use std::sync::Mutex;

    /// Replies with a fixed string and remembers the last request.
    struct CannedClient {
        reply: AppResult<String>,
        last: Mutex<Option<LlmRequest>>,
    }

    impl CannedClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                last: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(AppError::Llm("connection refused".to_string())),
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmClient for CannedClient {
        fn provider_name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            *self.last.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(content) => Ok(LlmResponse {
                    content: content.clone(),
                    model: request.model.clone(),
                    usage: LlmUsage::default(),
                    done: true,
                }),
                Err(e) => Err(AppError::Llm(e.to_string())),
            }
        }
    }

    fn paraphraser(client: Arc<CannedClient>) -> LlmParaphraser {
        LlmParaphraser::new(client, "test-model", builtin_prompt(PARAPHRASE_PROMPT_ID).unwrap())
    }

    #[test]
    fn test_strip_label() {
        assert_eq!(strip_label("Paraphrase: Bhima won."), "Bhima won.");
        assert_eq!(strip_label("  PARAPHRASE:Bhima won.  "), "Bhima won.");
        assert_eq!(strip_label("Bhima won."), "Bhima won.");
        assert_eq!(strip_label("भीम"), "भीम");
    }

    #[tokio::test]
    async fn test_noop_paraphraser_skips() {
        let result = NoopParaphraser.paraphrase("Karna was generous.", "Who was Karna?").await;
        assert_eq!(result, Enhanced::Skipped("Karna was generous.".to_string()));
    }

    #[tokio::test]
    async fn test_llm_paraphraser_builds_request() {
        let client = Arc::new(CannedClient::replying("Paraphrase: Bhima killed Bakasura."));
        let result = paraphraser(client.clone())
            .paraphrase("Bhima slays Bakasura.", "Who killed Bakasura?")
            .await;

        assert_eq!(result, Enhanced::Enhanced("Bhima killed Bakasura.".to_string()));

        let request = client.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "test-model");
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.prompt.contains("Q: Who killed Bakasura?"));
        assert!(request.prompt.contains("A: Bhima slays Bakasura."));
        assert!(request.system.is_some());
    }

    #[tokio::test]
    async fn test_llm_paraphraser_falls_back() {
        let failing = paraphraser(Arc::new(CannedClient::failing()));
        let result = failing.paraphrase("Bhima slays Bakasura.", "q").await;
        assert!(result.is_fallback());
        assert_eq!(result.value(), "Bhima slays Bakasura.");

        let empty = paraphraser(Arc::new(CannedClient::replying("  Paraphrase:  ")));
        let result = empty.paraphrase("Bhima slays Bakasura.", "q").await;
        assert!(result.is_fallback());
        assert_eq!(result.into_value(), "Bhima slays Bakasura.");
    }

    #[tokio::test]
    async fn test_empty_input_is_not_sent() {
        let client = Arc::new(CannedClient::replying("anything"));
        let result = paraphraser(client.clone()).paraphrase("  ", "q").await;
        assert_eq!(result.status(), crate::enhance::EnhancementStatus::Skipped);
        assert!(client.last.lock().unwrap().is_none());
    }
}
