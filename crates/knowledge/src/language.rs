//! The answer-language menu.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A language answers can be delivered in. English is the language of the
/// reference text, override answers and the out-of-domain message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "pa")]
    Punjabi,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "ur")]
    Urdu,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "zh")]
    Chinese,
}

impl Language {
    /// Menu order.
    pub const ALL: [Language; 18] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Bengali,
        Language::Marathi,
        Language::Kannada,
        Language::Gujarati,
        Language::Punjabi,
        Language::Malayalam,
        Language::Urdu,
        Language::French,
        Language::Spanish,
        Language::German,
        Language::Arabic,
        Language::Russian,
        Language::Japanese,
        Language::Chinese,
    ];

    /// The language the corpus and canned answers are written in.
    pub const DOMAIN: Language = Language::English;

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Tamil => "ta",
            Self::Telugu => "te",
            Self::Bengali => "bn",
            Self::Marathi => "mr",
            Self::Kannada => "kn",
            Self::Gujarati => "gu",
            Self::Punjabi => "pa",
            Self::Malayalam => "ml",
            Self::Urdu => "ur",
            Self::French => "fr",
            Self::Spanish => "es",
            Self::German => "de",
            Self::Arabic => "ar",
            Self::Russian => "ru",
            Self::Japanese => "ja",
            Self::Chinese => "zh",
        }
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Bengali => "Bengali",
            Self::Marathi => "Marathi",
            Self::Kannada => "Kannada",
            Self::Gujarati => "Gujarati",
            Self::Punjabi => "Punjabi",
            Self::Malayalam => "Malayalam",
            Self::Urdu => "Urdu",
            Self::French => "French",
            Self::Spanish => "Spanish",
            Self::German => "German",
            Self::Arabic => "Arabic",
            Self::Russian => "Russian",
            Self::Japanese => "Japanese",
            Self::Chinese => "Chinese",
        }
    }

    /// Menu label, e.g. "Hindi (hi)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.name(), self.code())
    }

    /// Parse a language code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }

    /// Parse a language code, falling back to the domain language for
    /// codes outside the menu.
    pub fn resolve(code: &str) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            tracing::debug!("Unsupported language code '{}', using {}", code, Self::DOMAIN.code());
            Self::DOMAIN
        })
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::DOMAIN
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_has_eighteen_unique_codes() {
        let mut codes: Vec<_> = Language::ALL.iter().map(|l| l.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 18);
        assert_eq!(Language::ALL[0], Language::English);
    }

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(Language::from_code("HI"), Some(Language::Hindi));
        assert_eq!(Language::from_code(" zh "), Some(Language::Chinese));
        assert_eq!(Language::from_code("xx"), None);
    }

    #[test]
    fn test_resolve_unknown_defaults_to_english() {
        assert_eq!(Language::resolve("klingon"), Language::English);
        assert_eq!(Language::resolve(""), Language::English);
        assert_eq!(Language::resolve("ta"), Language::Tamil);
    }

    #[test]
    fn test_label_and_serde_use_code() {
        assert_eq!(Language::Urdu.label(), "Urdu (ur)");
        assert_eq!(serde_json::to_string(&Language::German).unwrap(), "\"de\"");
        let parsed: Language = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(parsed, Language::Japanese);
    }
}
