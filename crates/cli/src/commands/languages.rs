//! Languages command handler.

use bharata_core::AppResult;
use bharata_knowledge::Language;
use clap::Args;
use serde::Serialize;

/// List the supported answer languages
#[derive(Args, Debug)]
pub struct LanguagesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct LanguageEntry {
    name: &'static str,
    code: &'static str,
}

impl LanguagesCommand {
    pub fn execute(&self) -> AppResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries())?);
            return Ok(());
        }

        for (i, language) in Language::ALL.iter().enumerate() {
            println!("{:>2}. {}", i + 1, language.label());
        }

        Ok(())
    }
}

fn entries() -> Vec<LanguageEntry> {
    Language::ALL
        .iter()
        .map(|language| LanguageEntry {
            name: language.name(),
            code: language.code(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_entries() {
        let value = serde_json::to_value(entries()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 18);
        assert_eq!(value[0], serde_json::json!({"name": "English", "code": "en"}));
        assert_eq!(value[17]["code"], "zh");
    }
}
