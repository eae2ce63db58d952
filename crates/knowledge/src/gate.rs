//! Domain gate: decides whether a question is about the Mahabharata at all.

use bharata_core::{AppError, AppResult};
use regex::{Regex, RegexBuilder};

/// Names, places, concepts and umbrella terms accepted by the default gate.
///
/// Matching is whole-word, so plural clan names are listed explicitly.
/// Multi-word entries match with any run of whitespace between words.
pub const DOMAIN_TERMS: &[&str] = &[
    "mahabharata",
    "mahabaratha",
    "mahabharat",
    "pandava",
    "pandavas",
    "kaurava",
    "kauravas",
    "kurukshetra",
    "bhishma",
    "drona",
    "karna",
    "krishna",
    "arjuna",
    "yudhishthira",
    "bhima",
    "nakula",
    "sahadeva",
    "draupadi",
    "duryodhana",
    "ashvatthama",
    "ashwatthama",
    "vyasa",
    "vedavyasa",
    "indraprastha",
    "hastinapura",
    "gita",
    "bhagavad gita",
    "dharma",
    "karma",
    "exile",
    "dice game",
    "swayamvara",
    "bakasura",
    "vidura",
    "shakuni",
    "kunti",
    "gandhari",
    "dhritarashtra",
    "pandu",
    "janamejaya",
    "vaishampayana",
    "sauti",
    "naimisha",
    "bharata",
    "kuru",
    "ekachakra",
    "lacquer house",
    "lakshagriha",
    "shikhandi",
    "dhrishtadyumna",
    "epic",
    "mythology",
    "hindu",
    "vedas",
    "sanskrit",
    "ancient india",
    "indian epic",
];

/// Keyword gate over a fixed term set.
///
/// The whole set is compiled into one case-insensitive alternation, so a
/// check is a single linear scan of the question regardless of its length.
#[derive(Debug, Clone)]
pub struct DomainGate {
    pattern: Regex,
}

impl DomainGate {
    /// Gate over [`DOMAIN_TERMS`].
    pub fn new() -> AppResult<Self> {
        Self::with_terms(DOMAIN_TERMS)
    }

    /// Gate over a caller-supplied term list.
    pub fn with_terms<S: AsRef<str>>(terms: &[S]) -> AppResult<Self> {
        let alternatives: Vec<String> = terms
            .iter()
            .map(|term| term_pattern(term.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();

        if alternatives.is_empty() {
            return Err(AppError::Knowledge(
                "Domain gate needs at least one term".to_string(),
            ));
        }

        let source = format!(r"\b(?:{})\b", alternatives.join("|"));
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Knowledge(format!("Invalid domain gate pattern: {}", e)))?;

        Ok(Self { pattern })
    }

    /// True iff `question` contains a domain term as a whole word.
    pub fn is_in_domain(&self, question: &str) -> bool {
        !question.trim().is_empty() && self.pattern.is_match(question)
    }

    /// The first domain term found in `question`, as written there.
    pub fn matched_term<'q>(&self, question: &'q str) -> Option<&'q str> {
        self.pattern.find(question).map(|m| m.as_str())
    }
}

/// Escape each word of a term and allow any whitespace run between words.
fn term_pattern(term: &str) -> String {
    term.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}
