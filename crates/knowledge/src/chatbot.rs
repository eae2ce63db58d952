//! Answer orchestration.
//!
//! A question runs through the gate, the override table and the retriever,
//! then the English answer is paraphrased (retrieved answers only) and
//! translated into the requested language. Paraphrasing and translation are
//! best-effort: a slow or broken backend degrades the answer to the English
//! text it started from.

use crate::corpus::Corpus;
use crate::enhance::{Enhanced, StepOutcome};
use crate::gate::DomainGate;
use crate::language::Language;
use crate::overrides::OverrideTable;
use crate::paraphrase::Paraphraser;
use crate::retriever::{ScoredSentence, SentenceRetriever, DEFAULT_CHAR_BUDGET};
use crate::translate::Translator;
use bharata_core::config::AnswerConfig;
use bharata_core::AppResult;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Returned, translated, for questions outside the epic.
pub const OUT_OF_DOMAIN_MESSAGE: &str = "I can only answer questions related to the Mahabharata epic and Hindu mythology. Please ask about characters, events, or teachings from the Mahabharata.";

/// Source reported for every answer produced from the knowledge base.
pub const SOURCE_TITLE: &str = "Mahabharata (in-memory)";

/// Number of ranked sentences reported by [`Chatbot::explain`].
const EXPLAIN_TOP_SENTENCES: usize = 5;

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Overridden,
    Retrieved,
}

/// Per-request tuning of the pipeline.
#[derive(Debug, Clone)]
pub struct AnswerSettings {
    pub char_budget: usize,
    pub paraphrase: bool,
    pub paraphrase_timeout: Duration,
    pub translate_timeout: Duration,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            char_budget: DEFAULT_CHAR_BUDGET,
            paraphrase: true,
            paraphrase_timeout: Duration::from_secs(30),
            translate_timeout: Duration::from_secs(60),
        }
    }
}

impl From<&AnswerConfig> for AnswerSettings {
    fn from(config: &AnswerConfig) -> Self {
        Self {
            char_budget: config.char_budget,
            paraphrase: config.paraphrase,
            paraphrase_timeout: Duration::from_secs(config.paraphrase_timeout_secs),
            translate_timeout: Duration::from_secs(config.translate_timeout_secs),
        }
    }
}

/// Answer to one question.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub answer: String,

    /// Language the answer was requested in
    pub language: Language,

    /// None when the question was rejected
    pub provenance: Option<Provenance>,

    pub source_title: Option<String>,

    pub paraphrase: StepOutcome,

    pub translation: StepOutcome,
}

impl AskResponse {
    pub fn is_answered(&self) -> bool {
        self.provenance.is_some()
    }

    /// Whether a best-effort step fell back to untransformed text.
    pub fn is_degraded(&self) -> bool {
        self.paraphrase.reason.is_some() || self.translation.reason.is_some()
    }
}

/// How the pipeline sees a question, without calling any backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation<'a> {
    pub in_domain: bool,
    pub matched_term: Option<String>,
    pub override_rule: Option<String>,
    pub top_sentences: Vec<ScoredSentence<'a>>,
}

/// The question-answering pipeline.
pub struct Chatbot {
    gate: DomainGate,
    overrides: OverrideTable,
    retriever: SentenceRetriever,
    paraphraser: Arc<dyn Paraphraser>,
    translator: Arc<dyn Translator>,
    settings: AnswerSettings,
}

impl Chatbot {
    /// Pipeline over `corpus` with the built-in gate and override table.
    pub fn new(
        corpus: Corpus,
        paraphraser: Arc<dyn Paraphraser>,
        translator: Arc<dyn Translator>,
        settings: AnswerSettings,
    ) -> AppResult<Self> {
        Ok(Self {
            gate: DomainGate::new()?,
            overrides: OverrideTable::builtin()?,
            retriever: SentenceRetriever::new(corpus),
            paraphraser,
            translator,
            settings,
        })
    }

    /// Replace the override table.
    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the domain gate.
    pub fn with_gate(mut self, gate: DomainGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn settings(&self) -> &AnswerSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AnswerSettings {
        &mut self.settings
    }

    /// Answer `question` in `target`.
    pub async fn ask(&self, question: &str, target: Language) -> AskResponse {
        let question = question.trim();

        if !self.gate.is_in_domain(question) {
            tracing::info!("Question rejected by domain gate");
            let translation = self.translate(OUT_OF_DOMAIN_MESSAGE.to_string(), target).await;
            return AskResponse {
                answer: translation.value().clone(),
                language: target,
                provenance: None,
                source_title: None,
                paraphrase: StepOutcome::skipped(),
                translation: translation.outcome(),
            };
        }

        let (english, provenance, paraphrase) = match self.overrides.lookup_rule(question) {
            Some(rule) => {
                tracing::info!("Override rule '{}' matched", rule.id());
                (rule.answer().to_string(), Provenance::Overridden, StepOutcome::skipped())
            }
            None => {
                let retrieved = self.retriever.retrieve(question, self.settings.char_budget);
                tracing::info!("Retrieved {} chars from corpus", retrieved.chars().count());

                let paraphrased = self.paraphrase(retrieved, question).await;
                let outcome = paraphrased.outcome();
                (paraphrased.into_value(), Provenance::Retrieved, outcome)
            }
        };

        let translation = self.translate(english, target).await;
        let outcome = translation.outcome();

        AskResponse {
            answer: translation.into_value(),
            language: target,
            provenance: Some(provenance),
            source_title: Some(SOURCE_TITLE.to_string()),
            paraphrase,
            translation: outcome,
        }
    }

    /// Answer with the target given as a language code; unknown codes mean
    /// English.
    pub async fn ask_code(&self, question: &str, code: &str) -> AskResponse {
        self.ask(question, Language::resolve(code)).await
    }

    /// Gate, override and ranking decisions for `question`.
    pub fn explain<'a>(&'a self, question: &str) -> Explanation<'a> {
        let question = question.trim();
        let mut top_sentences = self.retriever.rank(question);
        top_sentences.truncate(EXPLAIN_TOP_SENTENCES);

        Explanation {
            in_domain: self.gate.is_in_domain(question),
            matched_term: self.gate.matched_term(question).map(str::to_string),
            override_rule: self
                .overrides
                .lookup_rule(question)
                .map(|rule| rule.id().to_string()),
            top_sentences,
        }
    }

    async fn paraphrase(&self, text: String, question: &str) -> Enhanced<String> {
        if !self.settings.paraphrase {
            return Enhanced::Skipped(text);
        }

        let timeout = self.settings.paraphrase_timeout;
        let attempt = tokio::time::timeout(timeout, self.paraphraser.paraphrase(&text, question)).await;
        let result = match attempt {
            Ok(result) => result,
            Err(_) => Enhanced::fallback(text, format!("paraphrase timed out after {:?}", timeout)),
        };

        if let Enhanced::Fallback { reason, .. } = &result {
            tracing::warn!("Using retrieved text unchanged: {}", reason);
        }
        result
    }

    async fn translate(&self, text: String, target: Language) -> Enhanced<String> {
        if target == Language::DOMAIN {
            return Enhanced::Skipped(text);
        }

        let timeout = self.settings.translate_timeout;
        let attempt =
            tokio::time::timeout(timeout, self.translator.translate(&text, Language::DOMAIN, target)).await;
        let result = match attempt {
            Ok(result) => result,
            Err(_) => Enhanced::fallback(text, format!("translation timed out after {:?}", timeout)),
        };

        if let Enhanced::Fallback { reason, .. } = &result {
            tracing::warn!("Answering in English: {}", reason);
        }
        result
    }
}
