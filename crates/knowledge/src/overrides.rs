//! Canned answers for common questions, checked before retrieval.
//!
//! The table is a priority list: rules are tried in declaration order and
//! the first match wins. Several rules can match one question (a question
//! about Karna's death also mentions Karna), so a rule must be declared
//! before every broader rule it specialises.

use bharata_core::{AppError, AppResult};
use regex::{Regex, RegexBuilder};

/// A single (matcher, answer) pair.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    id: String,
    pattern: Regex,
    answer: String,
}

impl OverrideRule {
    /// Compile a rule. `pattern` is matched case-insensitively against the
    /// raw question.
    pub fn new(
        id: impl Into<String>,
        pattern: &str,
        answer: impl Into<String>,
    ) -> AppResult<Self> {
        let id = id.into();
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Knowledge(format!("Invalid pattern for rule '{}': {}", id, e)))?;

        Ok(Self {
            id,
            pattern,
            answer: answer.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn matches(&self, question: &str) -> bool {
        self.pattern.is_match(question)
    }
}

/// Ordered override rules; first match wins.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    pub fn new(rules: Vec<OverrideRule>) -> Self {
        Self { rules }
    }

    /// The built-in table, in [`BUILTIN_RULES`] order.
    pub fn builtin() -> AppResult<Self> {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(id, pattern, answer)| OverrideRule::new(*id, pattern, *answer))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self::new(rules))
    }

    /// Answer of the first rule matching `question`.
    pub fn lookup(&self, question: &str) -> Option<&str> {
        self.lookup_rule(question).map(OverrideRule::answer)
    }

    /// First rule matching `question`.
    pub fn lookup_rule(&self, question: &str) -> Option<&OverrideRule> {
        self.rules.iter().find(|rule| rule.matches(question))
    }

    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

const AUTHOR_ANSWER: &str = "Vyasa (Krishna Dvaipayana, also called Vedavyasa) is traditionally credited as the author/compiler of the Mahabharata.";

/// Built-in rules as (id, pattern, answer), highest priority first.
///
/// Order: authorship and length, then deaths, then events, then people,
/// then concepts, then the catch-all "what is the Mahabharata".
pub const BUILTIN_RULES: &[(&str, &str, &str)] = &[
    (
        "author.who-wrote",
        r"\b(who\s+wrote|who\s+is\s+the\s+author\s+of)\s+(the\s+)?mahabh?arath?a?\b",
        AUTHOR_ANSWER,
    ),
    (
        "author.mentioned",
        r"\bauthor\b.*\bmahabh?arath?a?\b",
        "Vyasa (Krishna Dvaipayana, Vedavyasa) is traditionally regarded as the author/compiler of the Mahabharata.",
    ),
    (
        "mahabharata.length",
        r"\b(how\s+long\s+is\s+the\s+mahabh?arath?a?|mahabh?arath?a?\s+length)\b",
        "The Mahabharata contains over 100,000 verses, making it one of the longest epic poems in the world. It is approximately 1.8 million words long.",
    ),
    (
        "karna.death",
        r"\b(how\s+did\s+karna\s+die|karna'?s?\s+death)\b",
        "Karna died on the 17th day of the Kurukshetra war when his chariot wheel got stuck in the mud and Arjuna killed him while he was defenseless.",
    ),
    (
        "bhishma.death",
        r"\b(how\s+did\s+bhishma\s+die|bhishma'?s?\s+death)\b",
        "Bhishma was mortally wounded by Arjuna on the 10th day of the war using Shikhandi as a shield, and he chose to die on the bed of arrows.",
    ),
    (
        "drona.death",
        r"\b(how\s+did\s+drona\s+die|drona'?s?\s+death)\b",
        "Drona was killed when Yudhishthira lied about Ashwatthama's death, causing Drona to lay down his weapons in grief, after which Dhrishtadyumna beheaded him.",
    ),
    (
        "event.bhagavad-gita",
        r"\b(what\s+is\s+the\s+bhagavad\s+gita|bhagavad\s+gita)\b",
        "The Bhagavad Gita is a 700-verse Hindu scripture that is part of the Mahabharata. It contains a conversation between Prince Arjuna and Krishna, who serves as his charioteer.",
    ),
    (
        "event.kurukshetra-war",
        r"\b(what\s+is\s+the\s+kurukshetra\s+war|kurukshetra\s+war)\b",
        "The Kurukshetra War is the central conflict of the Mahabharata, fought between the Pandavas and Kauravas for 18 days on the battlefield of Kurukshetra.",
    ),
    (
        "event.dice-game",
        r"\b(what\s+is\s+the\s+dice\s+game|dice\s+game)\b",
        "The dice game is a crucial event where Yudhishthira gambles away his kingdom, brothers, and even Draupadi to the Kauravas, leading to the Pandavas' 13-year exile.",
    ),
    (
        "event.exile",
        r"\b(what\s+is\s+the\s+exile|exile)\b",
        "The Pandavas were exiled for 13 years (12 years in the forest and 1 year incognito) after losing everything in the dice game to the Kauravas.",
    ),
    (
        "people.pandavas",
        r"\b(who\s+are\s+the\s+pandavas|pandavas)\b",
        "The Pandavas are the five sons of King Pandu: Yudhishthira (eldest), Bhima, Arjuna, Nakula, and Sahadeva. They are the heroes of the Mahabharata.",
    ),
    (
        "people.kauravas",
        r"\b(who\s+are\s+the\s+kauravas|kauravas)\b",
        "The Kauravas are the hundred sons of King Dhritarashtra, led by Duryodhana. They are the antagonists in the Mahabharata.",
    ),
    (
        "people.krishna",
        r"\b(who\s+is\s+krishna|krishna)\b",
        "Krishna is the eighth avatar of Vishnu, who serves as Arjuna's charioteer and guide during the Kurukshetra war. He delivers the Bhagavad Gita to Arjuna.",
    ),
    (
        "people.arjuna",
        r"\b(who\s+is\s+arjuna|arjuna)\b",
        "Arjuna is the third Pandava, known as the greatest archer. He is the recipient of the Bhagavad Gita from Krishna and plays a central role in the Kurukshetra war.",
    ),
    (
        "people.bhishma",
        r"\b(who\s+is\s+bhishma|bhishma)\b",
        "Bhishma is the granduncle of both Pandavas and Kauravas, known for his vow of celibacy and his role as the commander of the Kaurava army.",
    ),
    (
        "people.drona",
        r"\b(who\s+is\s+drona|drona)\b",
        "Drona is the royal preceptor who taught archery to both Pandavas and Kauravas. He becomes the commander of the Kaurava army after Bhishma's fall.",
    ),
    (
        "people.karna",
        r"\b(who\s+is\s+karna|karna)\b",
        "Karna is the eldest son of Kunti and Surya, raised by a charioteer. He is Duryodhana's closest friend and a formidable warrior who fights for the Kauravas.",
    ),
    (
        "people.draupadi",
        r"\b(who\s+is\s+draupadi|draupadi)\b",
        "Draupadi is the common wife of all five Pandavas, known for her beauty and intelligence. She plays a crucial role in the dice game incident.",
    ),
    (
        "concept.dharma",
        r"\b(what\s+is\s+dharma|dharma)\b",
        "Dharma in the Mahabharata refers to righteous duty, moral law, and the path of righteousness. It is a central theme throughout the epic.",
    ),
    (
        "concept.karma",
        r"\b(what\s+is\s+karma|karma)\b",
        "Karma refers to the law of cause and effect, where every action has consequences. It is a fundamental concept in the Mahabharata's philosophy.",
    ),
    (
        "mahabharata.what",
        r"\b(what\s+is\s+the\s+mahabharata|mahabharata)\b",
        "The Mahabharata is one of the two major Sanskrit epics of ancient India, containing over 100,000 verses. It tells the story of the Kuru dynasty and the great war between Pandavas and Kauravas.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> OverrideTable {
        OverrideTable::builtin().unwrap()
    }

    fn rule_id<'a>(table: &'a OverrideTable, question: &str) -> Option<&'a str> {
        table.lookup_rule(question).map(OverrideRule::id)
    }

    #[test]
    fn test_builtin_rules_compile() {
        assert_eq!(table().len(), BUILTIN_RULES.len());
    }

    #[test]
    fn test_who_wrote_names_vyasa() {
        let table = table();
        let answer = table.lookup("Who wrote the Mahabharata?").unwrap();
        assert!(answer.contains("Vyasa"));
        assert_eq!(rule_id(&table, "who WROTE mahabharat"), Some("author.who-wrote"));
    }

    #[test]
    fn test_epic_spellings() {
        let table = table();
        for name in ["Mahabharata", "Mahabharatha", "Mahabharat", "Mahabaratha"] {
            let cases = [
                (format!("Who wrote the {}?", name), "author.who-wrote"),
                (format!("Who is the author of {}?", name), "author.who-wrote"),
                (format!("Tell me about the author of {}", name), "author.mentioned"),
                (format!("How long is the {}?", name), "mahabharata.length"),
                (format!("{} length", name), "mahabharata.length"),
            ];
            for (question, expected) in cases {
                assert_eq!(rule_id(&table, &question), Some(expected), "{}", question);
            }
        }
    }

    #[test]
    fn test_first_declared_rule_wins() {
        let table = OverrideTable::new(vec![
            OverrideRule::new("specific", r"\bkarna\s+death\b", "specific").unwrap(),
            OverrideRule::new("broad", r"\bkarna\b", "broad").unwrap(),
        ]);
        assert_eq!(table.lookup("Tell me about Karna death"), Some("specific"));
        assert_eq!(table.lookup("Tell me about Karna"), Some("broad"));

        let reversed = OverrideTable::new(table.rules().iter().rev().cloned().collect());
        assert_eq!(reversed.lookup("Tell me about Karna death"), Some("broad"));
    }

    #[test]
    fn test_specific_builtin_rules_precede_broad_ones() {
        let table = table();
        assert_eq!(rule_id(&table, "How did Karna die?"), Some("karna.death"));
        assert_eq!(rule_id(&table, "Who is Karna?"), Some("people.karna"));
        assert_eq!(rule_id(&table, "How did Bhishma die?"), Some("bhishma.death"));
        assert_eq!(rule_id(&table, "Describe Drona's death"), Some("drona.death"));
        assert_eq!(
            rule_id(&table, "How long is the Mahabharata?"),
            Some("mahabharata.length")
        );
        assert_eq!(
            rule_id(&table, "What did Krishna say in the Bhagavad Gita?"),
            Some("event.bhagavad-gita")
        );
        assert_eq!(
            rule_id(&table, "What is dharma according to the Mahabharata?"),
            Some("concept.dharma")
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let table = table();
        assert_eq!(
            rule_id(&table, "Tell me about Draupadi's swayamvara"),
            Some("people.draupadi")
        );
        assert!(table.lookup("Who was Vidura?").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let result = OverrideRule::new("broken", r"(unclosed", "x");
        assert!(matches!(result, Err(AppError::Knowledge(msg)) if msg.contains("broken")));
    }
}
