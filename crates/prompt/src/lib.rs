//! Prompt system for Bharata.
//!
//! The paraphraser and translator never hard-code their LLM instructions.
//! They load a prompt definition by id and render it here:
//! - YAML prompt definitions, built in or overridden per workspace
//! - Handlebars template rendering (strict, no HTML escaping)

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{builtin_prompt, list_prompts, load_prompt, PARAPHRASE_PROMPT_ID, TRANSLATE_PROMPT_ID};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition, PromptInputSpec,
    PromptOrigin, PromptSummary,
};
