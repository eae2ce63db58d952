//! Configuration management for Bharata.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - The workspace config file (`.bharata/config.yaml`, or `BHARATA_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Nothing is ever written back; the workspace directory only holds optional
//! config and prompt overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers accepted by `validate`.
pub const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "offline"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (may contain .bharata/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider used for paraphrasing and translation ("ollama", "offline")
    pub provider: String,

    /// Model used for paraphrasing
    pub model: String,

    /// Model used for translation (defaults to `model`)
    pub translation_model: Option<String>,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// HTTP timeout for provider calls, in seconds
    pub llm_timeout_secs: u64,

    /// Answer pipeline settings
    pub answer: AnswerConfig,

    /// Replacement reference text for the retriever
    pub corpus_path: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Settings for the answering pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerConfig {
    /// Maximum characters of retrieved text before truncation
    pub char_budget: usize,

    /// Run retrieved answers through the paraphraser
    pub paraphrase: bool,

    /// Language code used when none is requested
    pub default_language: String,

    pub paraphrase_timeout_secs: u64,

    pub translate_timeout_secs: u64,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            char_budget: 900,
            paraphrase: true,
            default_language: "en".to_string(),
            paraphrase_timeout_secs: 30,
            translate_timeout_secs: 60,
        }
    }
}

/// Full configuration file structure. Every field is optional so a file
/// only needs to mention what it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    answer: Option<AnswerSection>,
    corpus: Option<CorpusSection>,
    workspace: Option<WorkspaceSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    provider: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    translation_model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerSection {
    char_budget: Option<usize>,
    paraphrase: Option<bool>,
    default_language: Option<String>,
    paraphrase_timeout_secs: Option<u64>,
    translate_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CorpusSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WorkspaceSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            translation_model: None,
            endpoint: None,
            llm_timeout_secs: 60,
            answer: AnswerConfig::default(),
            corpus_path: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `BHARATA_WORKSPACE`: Override workspace path
    /// - `BHARATA_CONFIG`: Path to config file
    /// - `BHARATA_PROVIDER`: LLM provider
    /// - `BHARATA_MODEL`: Paraphrasing model
    /// - `BHARATA_ENDPOINT`: Provider endpoint
    /// - `BHARATA_LANG`: Default answer language
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use bharata_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration, giving an explicit workspace and config file
    /// precedence over their environment variables.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env_path("BHARATA_WORKSPACE")) {
            config.workspace = workspace;
        }

        config.config_file = config_file.or_else(|| env_path("BHARATA_CONFIG"));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.bharata_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("BHARATA_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("BHARATA_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("BHARATA_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(lang) = std::env::var("BHARATA_LANG") {
            config.answer.default_language = lang;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.translation_model.is_some() {
                result.translation_model = llm.translation_model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if let Some(timeout) = llm.timeout_secs {
                result.llm_timeout_secs = timeout;
            }
        }

        if let Some(answer) = config_file.answer {
            if let Some(budget) = answer.char_budget {
                result.answer.char_budget = budget;
            }
            if let Some(paraphrase) = answer.paraphrase {
                result.answer.paraphrase = paraphrase;
            }
            if let Some(lang) = answer.default_language {
                result.answer.default_language = lang;
            }
            if let Some(secs) = answer.paraphrase_timeout_secs {
                result.answer.paraphrase_timeout_secs = secs;
            }
            if let Some(secs) = answer.translate_timeout_secs {
                result.answer.translate_timeout_secs = secs;
            }
        }

        if let Some(corpus) = config_file.corpus {
            if let Some(path) = corpus.path {
                result.corpus_path = Some(PathBuf::from(path));
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .bharata directory.
    pub fn bharata_dir(&self) -> PathBuf {
        self.workspace.join(".bharata")
    }

    /// Model to use for translation requests.
    pub fn translation_model(&self) -> &str {
        self.translation_model.as_deref().unwrap_or(&self.model)
    }

    /// Corpus path resolved against the workspace, if one is configured.
    pub fn resolved_corpus_path(&self) -> Option<PathBuf> {
        self.corpus_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.workspace.join(p)
            }
        })
    }

    /// Whether the configured provider runs without any network backend.
    pub fn is_offline(&self) -> bool {
        self.provider.eq_ignore_ascii_case("offline")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.answer.char_budget == 0 {
            return Err(AppError::Config(
                "answer.charBudget must be greater than zero".to_string(),
            ));
        }

        if self.answer.paraphrase_timeout_secs == 0
            || self.answer.translate_timeout_secs == 0
            || self.llm_timeout_secs == 0
        {
            return Err(AppError::Config(
                "Timeouts must be greater than zero seconds".to_string(),
            ));
        }

        if let Some(path) = self.resolved_corpus_path() {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Corpus file not found: {:?}",
                    path
                )));
            }
        }

        Ok(())
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var(var).ok().map(PathBuf::from)
}
