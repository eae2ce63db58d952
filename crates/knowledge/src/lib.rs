//! Domain-gated question answering over the Mahabharata.
//!
//! Questions are checked against a keyword gate, answered from a table of
//! canned answers when one matches, and otherwise answered with sentences
//! retrieved from an in-memory reference text. The English answer can then be
//! paraphrased and translated by an LLM backend.

pub mod chatbot;
pub mod corpus;
pub mod enhance;
pub mod gate;
pub mod language;
pub mod overrides;
pub mod paraphrase;
pub mod retriever;
pub mod translate;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chatbot::{
    AnswerSettings, AskResponse, Chatbot, Explanation, Provenance, OUT_OF_DOMAIN_MESSAGE,
    SOURCE_TITLE,
};
pub use corpus::Corpus;
pub use enhance::{Enhanced, EnhancementStatus, StepOutcome};
pub use gate::DomainGate;
pub use language::Language;
pub use overrides::{OverrideRule, OverrideTable};
pub use paraphrase::{LlmParaphraser, NoopParaphraser, Paraphraser};
pub use retriever::{ScoredSentence, SentenceRetriever};
pub use translate::{IdentityTranslator, LlmTranslator, PairCache, Translator};

use bharata_core::{AppConfig, AppResult};
use bharata_llm::create_client;
use bharata_prompt::{load_prompt, PARAPHRASE_PROMPT_ID, TRANSLATE_PROMPT_ID};
use std::sync::Arc;
use std::time::Duration;

/// Assemble the pipeline described by `config`.
///
/// The offline provider gets pass-through paraphrasing and translation; any
/// other provider gets LLM-backed ones using the workspace's prompts.
pub fn build_chatbot(config: &AppConfig) -> AppResult<Chatbot> {
    let corpus = match config.resolved_corpus_path() {
        Some(path) => Corpus::load(&path)?,
        None => Corpus::builtin()?,
    };
    let settings = AnswerSettings::from(&config.answer);

    if config.is_offline() {
        tracing::info!("Offline mode: answers are not paraphrased or translated");
        return Chatbot::new(
            corpus,
            Arc::new(NoopParaphraser),
            Arc::new(IdentityTranslator),
            settings,
        );
    }

    let client = create_client(
        &config.provider,
        config.endpoint.as_deref(),
        Some(Duration::from_secs(config.llm_timeout_secs)),
    )?;

    tracing::info!(
        "Using provider '{}' (model: {}, translation model: {})",
        client.provider_name(),
        config.model,
        config.translation_model()
    );

    let paraphraser: Arc<dyn Paraphraser> = if config.answer.paraphrase {
        let prompt = load_prompt(&config.workspace, PARAPHRASE_PROMPT_ID)?;
        Arc::new(LlmParaphraser::new(client.clone(), config.model.clone(), prompt))
    } else {
        Arc::new(NoopParaphraser)
    };

    let prompt = load_prompt(&config.workspace, TRANSLATE_PROMPT_ID)?;
    let translator = Arc::new(LlmTranslator::new(
        client,
        config.translation_model(),
        prompt,
    ));

    Chatbot::new(corpus, paraphraser, translator, settings)
}
