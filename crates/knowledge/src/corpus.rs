//! Sentence corpus built once from the reference text.

use bharata_core::{AppError, AppResult};
use std::path::Path;

/// Reference text shipped with the binary.
pub const REFERENCE_TEXT: &str = include_str!("../data/mahabharata.txt");

/// Punctuation that ends a sentence in the reference text.
pub const SENTENCE_TERMINALS: &[char] = &['.', '!', '?'];

/// Immutable, ordered list of sentences.
///
/// Sentences keep their terminal punctuation, are trimmed, and are never
/// empty. A corpus always holds at least one sentence.
#[derive(Debug, Clone)]
pub struct Corpus {
    sentences: Vec<String>,
}

impl Corpus {
    /// Split `text` into sentences.
    ///
    /// # Errors
    /// Returns `AppError::Knowledge` if the text contains no sentences.
    pub fn from_text(text: &str) -> AppResult<Self> {
        let sentences: Vec<String> = split_sentences(text, SENTENCE_TERMINALS)
            .into_iter()
            .map(str::to_string)
            .collect();

        if sentences.is_empty() {
            return Err(AppError::Knowledge(
                "Reference text contains no sentences".to_string(),
            ));
        }

        tracing::debug!("Corpus built with {} sentences", sentences.len());
        Ok(Self { sentences })
    }

    /// Corpus over the built-in reference text.
    pub fn builtin() -> AppResult<Self> {
        Self::from_text(REFERENCE_TEXT)
    }

    /// Read a UTF-8 reference text from disk.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read corpus {:?}: {}", path, e))
        })?;

        tracing::info!("Loading corpus from {:?}", path);
        Self::from_text(&text)
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// A loaded corpus always holds at least one sentence.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Split text at any of `terminals` followed by whitespace or the end of the
/// text. The terminal stays with its sentence; fragments are trimmed and
/// empty ones dropped.
pub fn split_sentences<'a>(text: &'a str, terminals: &[char]) -> Vec<&'a str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !terminals.contains(&ch) {
            continue;
        }

        let end = idx + ch.len_utf8();
        if matches!(chars.peek(), Some((_, next)) if next.is_whitespace()) {
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, fragment: &'a str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        sentences.push(fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_punctuation_and_order() {
        let text = "Bhima slays Bakasura. Who saw it?  Everyone!\n\nThe end";
        let sentences = split_sentences(text, SENTENCE_TERMINALS);
        assert_eq!(
            sentences,
            vec!["Bhima slays Bakasura.", "Who saw it?", "Everyone!", "The end"]
        );
    }

    #[test]
    fn test_split_ignores_inner_punctuation() {
        let text = "It has 100,000 verses. The 18-day war... ended. Done.";
        let sentences = split_sentences(text, SENTENCE_TERMINALS);
        assert_eq!(
            sentences,
            vec!["It has 100,000 verses.", "The 18-day war...", "ended.", "Done."]
        );
    }

    #[test]
    fn test_split_drops_empty_fragments() {
        assert!(split_sentences("   \n ", SENTENCE_TERMINALS).is_empty());
        assert_eq!(split_sentences(". . Yes.", SENTENCE_TERMINALS), vec![".", ".", "Yes."]);
    }

    #[test]
    fn test_split_custom_terminals() {
        let text = "अर्जुन धनुर्धर थे। भीम बलवान थे।";
        let sentences = split_sentences(text, &['।']);
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        assert!(matches!(Corpus::from_text("  "), Err(AppError::Knowledge(_))));
    }

    #[test]
    fn test_builtin_corpus() {
        let corpus = Corpus::builtin().unwrap();
        assert!(corpus.len() > 50);
        assert!(corpus.sentences()[0].starts_with("The Mahabharata, attributed traditionally to Vyasa"));
        assert!(corpus.sentences().iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epic.txt");
        std::fs::write(&path, "Karna was generous. Kunti was his mother.").unwrap();

        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 2);
        assert!(Corpus::load(&dir.path().join("missing.txt")).is_err());
    }
}
