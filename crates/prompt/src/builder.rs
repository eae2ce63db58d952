//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use bharata_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Renders both the system message (if any) and the user template with
/// Handlebars. Rendering is strict: a variable used by the template but
/// missing from `variables` is an error rather than an empty string.
///
/// # Example
/// ```no_run
/// use bharata_prompt::{build_prompt, builtin_prompt, PARAPHRASE_PROMPT_ID};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = builtin_prompt(PARAPHRASE_PROMPT_ID)?;
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "Who was Vidura?".to_string());
/// vars.insert("answer".to_string(), "Vidura's subtle warning helps the Pandavas.".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    for required in &definition.input.variables {
        if !variables.contains_key(required) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' requires variable '{}'",
                definition.id, required
            )));
        }
    }

    let user = render_template(&definition.template, &variables)?;
    let system = definition
        .system
        .as_deref()
        .map(|system| render_template(system, &variables))
        .transpose()?;

    Ok(BuiltPrompt::new(
        system,
        user,
        definition.id.clone(),
        definition.behavior.clone(),
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, never HTML
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
