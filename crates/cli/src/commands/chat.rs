//! Chat command handler.
//!
//! Interactive console session: pick a language, then ask questions until a
//! blank line or end of input.

use super::ask::print_response;
use super::resolve_language;
use bharata_core::{config::AppConfig, AppResult};
use bharata_knowledge::{build_chatbot, Language};
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const EXAMPLE_QUESTIONS: &[&str] = &[
    "Who was Karna and how did he die?",
    "What is the Bhagavad Gita about?",
    "Why did the Pandavas go to exile?",
    "Who are the main characters in Mahabharata?",
    "What happened in the Kurukshetra war?",
    "Tell me about Draupadi's swayamvara",
    "What is dharma according to Mahabharata?",
];

/// Interactive question session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Answer language code; skips the language menu
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Skip the LLM backend entirely (English, unparaphrased answers)
    #[arg(long)]
    pub offline: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let mut config = config.clone();
        if self.offline {
            config.provider = "offline".to_string();
        }
        let chatbot = build_chatbot(&config)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let language = match &self.lang {
            Some(code) => resolve_language(code),
            None => match choose_language(&mut lines).await? {
                Some(language) => language,
                None => return Ok(()),
            },
        };
        tracing::debug!("Chat language: {}", language.label());

        println!("\nAsk a Mahabharata question (blank to exit). Examples:");
        for example in EXAMPLE_QUESTIONS {
            println!("  • {}", example);
        }
        println!();

        loop {
            prompt("Your question: ")?;
            let question = match lines.next_line().await? {
                Some(line) => line.trim().to_string(),
                None => break,
            };

            if question.is_empty() {
                println!("Goodbye!");
                break;
            }

            let response = chatbot.ask(&question, language).await;
            println!("\n=== Answer ===");
            print_response(&response);
            println!();
        }

        Ok(())
    }
}

/// Show the numbered menu until a valid choice is made. Blank means English;
/// end of input yields None.
async fn choose_language(lines: &mut Lines<BufReader<Stdin>>) -> AppResult<Option<Language>> {
    println!("\nSelect answer language:");
    for (i, language) in Language::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, language.label());
    }

    loop {
        prompt("\nEnter choice number (default 1): ")?;
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => return Ok(None),
        };

        match parse_menu_choice(&line) {
            Some(language) => return Ok(Some(language)),
            None => println!("Please enter a valid number from the list."),
        }
    }
}

/// 1-based menu index; blank selects the domain language.
fn parse_menu_choice(input: &str) -> Option<Language> {
    let input = input.trim();
    if input.is_empty() {
        return Some(Language::DOMAIN);
    }

    let number: usize = input.parse().ok()?;
    number
        .checked_sub(1)
        .and_then(|idx| Language::ALL.get(idx))
        .copied()
}

fn prompt(text: &str) -> AppResult<()> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(())
}
