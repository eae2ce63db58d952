//! Command handlers for the Bharata CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod languages;
pub mod prompts;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use languages::LanguagesCommand;
pub use prompts::PromptsCommand;

use bharata_knowledge::Language;

/// Language for `code`, warning when it is not on the menu.
pub(crate) fn resolve_language(code: &str) -> Language {
    Language::from_code(code).unwrap_or_else(|| {
        tracing::warn!("Unsupported language '{}', answering in English", code);
        Language::DOMAIN
    })
}
