//! Prompt loader for built-in and workspace YAML prompt definitions.

use crate::types::{PromptDefinition, PromptOrigin, PromptSummary};
use bharata_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Prompt used to turn a retrieved excerpt into a direct answer.
pub const PARAPHRASE_PROMPT_ID: &str = "paraphrase.default";

/// Prompt used to translate answers out of English.
pub const TRANSLATE_PROMPT_ID: &str = "translate.default";

const BUILTIN_PROMPTS: [(&str, &str); 2] = [
    (
        PARAPHRASE_PROMPT_ID,
        include_str!("../prompts/paraphrase.default.yml"),
    ),
    (
        TRANSLATE_PROMPT_ID,
        include_str!("../prompts/translate.default.yml"),
    ),
];

/// Load a prompt definition by ID.
///
/// A workspace file `.bharata/prompts/<id>.yml` takes precedence over the
/// built-in definition with the same id.
///
/// # Example
/// ```no_run
/// use bharata_prompt::{load_prompt, PARAPHRASE_PROMPT_ID};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), PARAPHRASE_PROMPT_ID)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if prompt_file.exists() {
        tracing::debug!("Loading prompt from: {:?}", prompt_file);

        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;

        let definition = parse_prompt(&contents).map_err(|e| {
            AppError::Prompt(format!("Invalid prompt file {:?}: {}", prompt_file, e))
        })?;

        if definition.id != prompt_id {
            return Err(AppError::Prompt(format!(
                "Prompt file {:?} declares id '{}', expected '{}'",
                prompt_file, definition.id, prompt_id
            )));
        }

        tracing::info!("Loaded workspace prompt: {} ({})", definition.id, definition.title);
        return Ok(definition);
    }

    builtin_prompt(prompt_id)
}

/// Load one of the prompts compiled into the binary.
pub fn builtin_prompt(prompt_id: &str) -> AppResult<PromptDefinition> {
    let (_, contents) = BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))?;

    parse_prompt(contents)
}

/// List all available prompts, workspace overrides included.
///
/// Built-in ids are listed first; a workspace file with a built-in id is
/// reported once, as `Workspace`.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<PromptSummary>> {
    let mut prompts: Vec<PromptSummary> = BUILTIN_PROMPTS
        .iter()
        .map(|(id, _)| PromptSummary {
            id: id.to_string(),
            origin: PromptOrigin::BuiltIn,
        })
        .collect();

    let dir = prompts_dir(workspace_path);
    if !dir.exists() {
        return Ok(prompts);
    }

    let mut workspace_ids = Vec::new();
    for entry in walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                workspace_ids.push(stem.to_string());
            }
        }
    }
    workspace_ids.sort();

    for id in workspace_ids {
        match prompts.iter_mut().find(|p| p.id == id) {
            Some(existing) => existing.origin = PromptOrigin::Workspace,
            None => prompts.push(PromptSummary {
                id,
                origin: PromptOrigin::Workspace,
            }),
        }
    }

    Ok(prompts)
}

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".bharata").join("prompts")
}

fn parse_prompt(contents: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML: {}", e)))?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, body: &str) -> PathBuf {
        let prompts_dir = dir.join(".bharata/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();

        let file_path = prompts_dir.join(format!("{}.yml", id));
        fs::write(&file_path, body).unwrap();
        file_path
    }

    fn valid_body(id: &str) -> String {
        format!(
            "id: {}\ntitle: \"Custom\"\napiVersion: \"1.0\"\ntemplate: \"Q: {{{{question}}}}\"\n",
            id
        )
    }

    #[test]
    fn test_builtin_prompts_parse() {
        let paraphrase = builtin_prompt(PARAPHRASE_PROMPT_ID).unwrap();
        assert!(paraphrase.template.contains("{{question}}"));
        assert!(paraphrase.template.contains("{{answer}}"));
        assert_eq!(paraphrase.behavior.max_tokens, Some(196));

        let translate = builtin_prompt(TRANSLATE_PROMPT_ID).unwrap();
        assert!(translate.system.unwrap().contains("{{targetName}}"));
    }

    #[test]
    fn test_load_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt(temp_dir.path(), PARAPHRASE_PROMPT_ID).unwrap();
        assert_eq!(prompt.id, PARAPHRASE_PROMPT_ID);
    }

    #[test]
    fn test_workspace_prompt_overrides_builtin() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), PARAPHRASE_PROMPT_ID, &valid_body(PARAPHRASE_PROMPT_ID));

        let prompt = load_prompt(temp_dir.path(), PARAPHRASE_PROMPT_ID).unwrap();
        assert_eq!(prompt.title, "Custom");
    }

    #[test]
    fn test_workspace_prompt_with_mismatched_id() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "custom.one", &valid_body("custom.two"));

        assert!(load_prompt(temp_dir.path(), "custom.one").is_err());
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt(temp_dir.path(), "nonexistent");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "invalid", "invalid: yaml: content:");

        assert!(load_prompt(temp_dir.path(), "invalid").is_err());
    }

    #[test]
    fn test_list_prompts_merges_workspace() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), TRANSLATE_PROMPT_ID, &valid_body(TRANSLATE_PROMPT_ID));
        write_prompt(temp_dir.path(), "summary.short", &valid_body("summary.short"));

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(prompts.len(), 3);
        assert_eq!(prompts[0].id, PARAPHRASE_PROMPT_ID);
        assert_eq!(prompts[0].origin, PromptOrigin::BuiltIn);
        assert_eq!(prompts[1].origin, PromptOrigin::Workspace);
        assert_eq!(prompts[2].id, "summary.short");
    }
}
