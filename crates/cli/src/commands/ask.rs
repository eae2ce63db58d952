//! Ask command handler.
//!
//! Answers one question and prints it as text or JSON.

use super::resolve_language;
use bharata_core::{config::AppConfig, AppError, AppResult};
use bharata_knowledge::{build_chatbot, AskResponse, Explanation};
use clap::Args;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Answer language code (e.g. hi, ta, fr); defaults to the configured language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show gate, override and ranking decisions
    #[arg(long)]
    pub explain: bool,

    /// Return retrieved sentences without paraphrasing
    #[arg(long)]
    pub no_paraphrase: bool,

    /// Skip the LLM backend entirely (English, unparaphrased answers)
    #[arg(long)]
    pub offline: bool,

    /// Character budget for retrieved answers
    #[arg(long)]
    pub budget: Option<usize>,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let config = self.apply(config)?;
        let chatbot = build_chatbot(&config)?;

        let code = self
            .lang
            .as_deref()
            .unwrap_or(&config.answer.default_language);
        let language = resolve_language(code);

        let response = chatbot.ask(&self.question, language).await;
        let explanation = self.explain.then(|| chatbot.explain(&self.question));

        if self.json {
            let mut output = serde_json::to_value(&response)?;
            if let Some(explanation) = &explanation {
                output = serde_json::json!({
                    "response": output,
                    "explanation": serde_json::to_value(explanation)?,
                });
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            if let Some(explanation) = &explanation {
                print_explanation(explanation);
            }
            print_response(&response);
        }

        Ok(())
    }

    /// Command flags layered over the loaded configuration.
    fn apply(&self, config: &AppConfig) -> AppResult<AppConfig> {
        let mut config = config.clone();

        if self.offline {
            config.provider = "offline".to_string();
        }

        if self.no_paraphrase {
            config.answer.paraphrase = false;
        }

        if let Some(budget) = self.budget {
            if budget == 0 {
                return Err(AppError::Config(
                    "--budget must be greater than zero".to_string(),
                ));
            }
            config.answer.char_budget = budget;
        }

        Ok(config)
    }
}

pub(crate) fn print_response(response: &AskResponse) {
    println!("{}", response.answer);

    if let Some(source) = &response.source_title {
        println!("\n[source: {}]", source);
    }
}

fn print_explanation(explanation: &Explanation<'_>) {
    println!("In domain:     {}", explanation.in_domain);
    println!(
        "Matched term:  {}",
        explanation.matched_term.as_deref().unwrap_or("-")
    );
    println!(
        "Override rule: {}",
        explanation.override_rule.as_deref().unwrap_or("-")
    );
    println!("Top sentences:");
    for sentence in &explanation.top_sentences {
        println!("  [{:>3}] #{:<4} {}", sentence.score, sentence.index, sentence.text);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> AskCommand {
        use clap::Parser;

        #[derive(Parser)]
        struct Harness {
            #[command(flatten)]
            ask: AskCommand,
        }

        let mut argv = vec!["bharata"];
        argv.extend_from_slice(args);
        Harness::parse_from(argv).ask
    }

    #[test]
    fn test_flags_override_config() {
        let cmd = command(&["Who is Karna?", "--offline", "--no-paraphrase", "--budget", "300"]);
        let config = cmd.apply(&AppConfig::default()).unwrap();

        assert!(config.is_offline());
        assert!(!config.answer.paraphrase);
        assert_eq!(config.answer.char_budget, 300);
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let cmd = command(&["Who is Karna?", "--budget", "0"]);
        assert!(matches!(
            cmd.apply(&AppConfig::default()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cmd = command(&["Who is Karna?", "--lang", "hi"]);
        let base = AppConfig::default();
        let config = cmd.apply(&base).unwrap();

        assert_eq!(cmd.lang.as_deref(), Some("hi"));
        assert_eq!(config.provider, base.provider);
        assert_eq!(config.answer.char_budget, base.answer.char_budget);
    }
}
