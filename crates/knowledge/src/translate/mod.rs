//! Delivering answers in the reader's language.

pub mod cache;

pub use cache::PairCache;

use crate::corpus::split_sentences;
use crate::enhance::Enhanced;
use crate::language::Language;
use async_trait::async_trait;
use bharata_core::AppResult;
use bharata_llm::{LlmClient, LlmRequest};
use bharata_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Largest chunk sent to the model in one request, in characters.
pub const MAX_CHUNK_CHARS: usize = 900;

/// Sentence ends for chunking; includes the Devanagari danda.
const CHUNK_TERMINALS: &[char] = &['.', '!', '?', '।'];

/// Best-effort translation. Never fails; problems come back as
/// [`Enhanced::Fallback`] holding the input text.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Enhanced<String>;
}

/// Returns the text untouched. Used when no translation backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str, _source: Language, _target: Language) -> Enhanced<String> {
        Enhanced::Skipped(text.to_string())
    }
}

/// Translator backed by an LLM and the `translate.default` prompt.
///
/// Before a pair is first used, the translation model is installed through
/// [`LlmClient::ensure_model`]; the outcome is kept in the [`PairCache`].
pub struct LlmTranslator {
    client: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
    pairs: PairCache,
}

impl LlmTranslator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, prompt: PromptDefinition) -> Self {
        Self {
            client,
            model: model.into(),
            prompt,
            pairs: PairCache::new(),
        }
    }

    pub fn pairs(&self) -> &PairCache {
        &self.pairs
    }

    async fn translate_chunk(&self, chunk: &str, source: Language, target: Language) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("sourceName".to_string(), source.name().to_string());
        variables.insert("targetName".to_string(), target.name().to_string());
        variables.insert("text".to_string(), chunk.to_string());

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
        Ok(response.content.trim().to_string())
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Enhanced<String> {
        if source == target {
            return Enhanced::Skipped(text.to_string());
        }
        if text.trim().is_empty() {
            return Enhanced::Skipped(String::new());
        }

        let client = self.client.clone();
        let model = self.model.clone();
        let usable = self
            .pairs
            .ensure(source, target, || async move { client.ensure_model(&model).await })
            .await;
        if !usable {
            return Enhanced::fallback(
                text.to_string(),
                format!("translation pair {}->{} is not installed", source, target),
            );
        }

        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        tracing::debug!("Translating {} chunk(s) {}->{}", chunks.len(), source, target);

        let mut translated = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            match self.translate_chunk(chunk, source, target).await {
                Ok(output) => translated.push(output),
                Err(e) => {
                    return Enhanced::fallback(text.to_string(), format!("translation failed: {}", e))
                }
            }
        }

        Enhanced::Enhanced(translated.join(" "))
    }
}

/// Pack sentences greedily into chunks of at most `max_chars` characters.
///
/// A single sentence longer than `max_chars` becomes its own chunk.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(text, CHUNK_TERMINALS) {
        let len = sentence.chars().count();

        if current.is_empty() {
            current.push_str(sentence);
            current_len = len;
        } else if current_len + len + 1 <= max_chars {
            current.push(' ');
            current.push_str(sentence);
            current_len += len + 1;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_len = len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use bharata_core::AppError;
    use bharata_llm::{LlmResponse, LlmUsage};
    use bharata_prompt::{builtin_prompt, TRANSLATE_PROMPT_ID};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Echoes the prompt in upper case and counts calls.
    #[derive(Default)]
    struct ShoutingClient {
        fail_install: bool,
        fail_complete: bool,
        installs: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for ShoutingClient {
        fn provider_name(&self) -> &str {
            "shouting"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            if self.fail_complete {
                return Err(AppError::Llm("model crashed".to_string()));
            }
            self.prompts.lock().unwrap().push(request.prompt.clone());
            Ok(LlmResponse {
                content: request.prompt.to_uppercase(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
                done: true,
            })
        }

        async fn ensure_model(&self, _model: &str) -> AppResult<()> {
            self.installs.fetch_add(1, Ordering::SeqCst);
            if self.fail_install {
                Err(AppError::Llm("pull failed".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn translator(client: Arc<ShoutingClient>) -> LlmTranslator {
        LlmTranslator::new(client, "test-model", builtin_prompt(TRANSLATE_PROMPT_ID).unwrap())
    }

    #[test]
    fn test_chunk_text_packs_sentences() {
        let chunks = chunk_text("Aaaa. Bbbb. Cccc.", 11);
        assert_eq!(chunks, vec!["Aaaa. Bbbb.", "Cccc."]);

        let chunks = chunk_text("Short. This sentence is far too long.", 10);
        assert_eq!(chunks, vec!["Short.", "This sentence is far too long."]);
        assert!(chunk_text("  ", 10).is_empty());
    }

    #[test]
    fn test_chunk_text_splits_on_danda() {
        let chunks = chunk_text("अर्जुन धनुर्धर थे। भीम बलवान थे।", 18);
        assert_eq!(chunks, vec!["अर्जुन धनुर्धर थे।", "भीम बलवान थे।"]);
    }

    #[tokio::test]
    async fn test_identity_pair_and_blank_text_are_skipped() {
        let client = Arc::new(ShoutingClient::default());
        let translator = translator(client.clone());

        let same = translator.translate("Karna.", Language::Hindi, Language::Hindi).await;
        assert_eq!(same, Enhanced::Skipped("Karna.".to_string()));

        let blank = translator.translate("  \n", Language::English, Language::Hindi).await;
        assert_eq!(blank, Enhanced::Skipped(String::new()));
        assert_eq!(client.installs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translates_each_chunk_and_installs_once() {
        let client = Arc::new(ShoutingClient::default());
        let translator = translator(client.clone());

        let text = format!("{} {}", "a".repeat(600) + ".", "b".repeat(600) + ".");
        let result = translator.translate(&text, Language::English, Language::German).await;
        assert_eq!(result.value(), &text.to_uppercase());

        let again = translator.translate("Bhima.", Language::English, Language::German).await;
        assert_eq!(again, Enhanced::Enhanced("BHIMA.".to_string()));

        assert_eq!(client.prompts.lock().unwrap().len(), 3);
        assert_eq!(client.installs.load(Ordering::SeqCst), 1);
        assert_eq!(
            translator.pairs().status(Language::English, Language::German),
            Some(true)
        );
    }

    #[tokio::test]
    async fn test_failures_fall_back_to_source_text() {
        let install_fails = translator(Arc::new(ShoutingClient {
            fail_install: true,
            ..Default::default()
        }));
        let result = install_fails.translate("Drona.", Language::English, Language::Tamil).await;
        assert!(result.is_fallback());
        assert_eq!(result.value(), "Drona.");

        let complete_fails = translator(Arc::new(ShoutingClient {
            fail_complete: true,
            ..Default::default()
        }));
        let result = complete_fails.translate("Drona.", Language::English, Language::Tamil).await;
        assert!(result.is_fallback());
        assert_eq!(result.into_value(), "Drona.");
    }

    #[tokio::test]
    async fn test_identity_translator() {
        let result = IdentityTranslator.translate("Vyasa.", Language::English, Language::Hindi).await;
        assert_eq!(result, Enhanced::Skipped("Vyasa.".to_string()));
    }
}
