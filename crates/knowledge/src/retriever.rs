//! Lexical sentence retrieval over the corpus.
//!
//! Every sentence is scored against the question's alphabetic tokens, the
//! list is ordered by score, and sentences are taken from the top until the
//! character budget is used up. The answer is always made of verbatim corpus
//! sentences.

use crate::corpus::Corpus;
use serde::Serialize;

/// Appended when the joined answer is cut at the budget.
pub const TRUNCATION_MARKER: &str = " ...";

/// Default character budget for an answer.
pub const DEFAULT_CHAR_BUDGET: usize = 900;

/// Sentences returned when nothing in the corpus scores.
const FALLBACK_SENTENCES: usize = 3;

/// Terms that earn a sentence a flat bonus whatever the question is.
pub const IMPORTANT_TERMS: &[&str] = &[
    "pandava",
    "kaurava",
    "krishna",
    "arjuna",
    "bhishma",
    "drona",
    "karna",
    "draupadi",
    "duryodhana",
    "vyasa",
    "kurukshetra",
    "bhagavad gita",
    "dharma",
];

const SUBSTRING_POINTS: u32 = 1;
const WHOLE_WORD_POINTS: u32 = 2;
const IMPORTANT_TERM_POINTS: u32 = 1;

/// A sentence and its score for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredSentence<'a> {
    /// Position in the corpus
    pub index: usize,
    pub text: &'a str,
    pub score: u32,
}

/// Scores and selects corpus sentences for a question.
#[derive(Debug, Clone)]
pub struct SentenceRetriever {
    corpus: Corpus,
    /// Lower-cased copies, index-aligned with the corpus
    lowered: Vec<String>,
}

impl SentenceRetriever {
    pub fn new(corpus: Corpus) -> Self {
        let lowered = corpus.sentences().iter().map(|s| s.to_lowercase()).collect();
        Self { corpus, lowered }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// All sentences ordered by descending score. Equal scores keep corpus
    /// order.
    pub fn rank(&self, question: &str) -> Vec<ScoredSentence<'_>> {
        let tokens = query_tokens(question);

        let mut scored: Vec<ScoredSentence<'_>> = self
            .corpus
            .sentences()
            .iter()
            .zip(&self.lowered)
            .enumerate()
            .map(|(index, (text, lowered))| ScoredSentence {
                index,
                text: text.as_str(),
                score: score_sentence(lowered, &tokens),
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Assemble an answer of at most `char_budget` characters (plus the
    /// truncation marker when a single sentence overflows it).
    pub fn retrieve(&self, question: &str, char_budget: usize) -> String {
        let ranked = self.rank(question);
        let has_match = ranked.first().is_some_and(|s| s.score > 0);

        let chosen: Vec<&str> = if has_match {
            select_within_budget(&ranked, char_budget)
        } else {
            tracing::debug!("No sentence scored, using the opening sentences");
            self.corpus
                .sentences()
                .iter()
                .take(FALLBACK_SENTENCES)
                .map(String::as_str)
                .collect()
        };

        tracing::debug!("Selected {} sentence(s) for the answer", chosen.len());
        truncate_to_budget(chosen.join(" ").trim(), char_budget)
    }
}

/// Maximal runs of ASCII letters in the lower-cased question, duplicates kept.
fn query_tokens(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn score_sentence(lowered: &str, tokens: &[String]) -> u32 {
    let mut score = 0;

    for token in tokens {
        if lowered.contains(token.as_str()) {
            score += SUBSTRING_POINTS;
            if contains_word(lowered, token) {
                score += WHOLE_WORD_POINTS;
            }
        }
    }

    if IMPORTANT_TERMS.iter().any(|term| lowered.contains(term)) {
        score += IMPORTANT_TERM_POINTS;
    }

    score
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `word` occurs with no word character directly before or after it.
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Walk the ranking, stopping at the first unscored sentence or the first
/// sentence that would overflow the budget. The top sentence is always taken.
fn select_within_budget<'a>(ranked: &[ScoredSentence<'a>], char_budget: usize) -> Vec<&'a str> {
    let mut chosen = Vec::new();
    let mut total = 0;

    for sentence in ranked {
        if sentence.score == 0 && !chosen.is_empty() {
            break;
        }

        let cost = sentence.text.chars().count() + 1;
        if total + cost > char_budget && !chosen.is_empty() {
            break;
        }

        chosen.push(sentence.text);
        total += cost;
    }

    chosen
}

/// Cut `text` to `char_budget` characters at the last whitespace and append
/// [`TRUNCATION_MARKER`]. Text within budget is returned unchanged.
fn truncate_to_budget(text: &str, char_budget: usize) -> String {
    let cut = match text.char_indices().nth(char_budget) {
        Some((byte_idx, _)) => byte_idx,
        None => return text.to_string(),
    };

    let head = &text[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(space) => &head[..space],
        None => head,
    };

    format!("{}{}", head.trim_end(), TRUNCATION_MARKER)
}
