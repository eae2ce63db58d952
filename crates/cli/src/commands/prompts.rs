//! Prompts command handler.

use bharata_core::{config::AppConfig, AppResult};
use bharata_prompt::{list_prompts, PromptOrigin};
use clap::Args;

/// List the available prompt definitions
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let prompts = list_prompts(&config.workspace)?;
        tracing::debug!("Found {} prompt(s)", prompts.len());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&prompts)?);
            return Ok(());
        }

        for prompt in &prompts {
            let origin = match prompt.origin {
                PromptOrigin::BuiltIn => "built-in",
                PromptOrigin::Workspace => "workspace",
            };
            println!("{:<24} {}", prompt.id, origin);
        }

        Ok(())
    }
}
