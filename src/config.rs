//! Configuration for the evaluation harness.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Chat model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the OpenAI-compatible API (e.g., "https://api.openai.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model used for metric scoring calls
    pub model: String,

    /// Model used for answer judging
    #[serde(default = "default_judge_model")]
    pub judge_model: String,

    /// Maximum tokens for response (optional)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for generation (optional)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_judge_model() -> String {
    "gpt-4-turbo-preview".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.1
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            model: default_model(),
            judge_model: default_judge_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Embedding model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model used for text-to-vector calls
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
        }
    }
}

/// External tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to the knowledge CLI binary
    pub knowledge_bin: String,

    /// Path to the gptscript binary used to run agents
    pub gptscript_bin: String,

    /// Number of results requested from the retrieve tool
    #[serde(default = "default_retrieve_top_k")]
    pub retrieve_top_k: usize,

    /// System prompt passed to the agent runtime
    #[serde(default = "default_agent_system_prompt")]
    pub agent_system_prompt: String,
}

fn default_retrieve_top_k() -> usize {
    20
}

fn default_agent_system_prompt() -> String {
    "You are an expert in understanding context and extracting information".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            knowledge_bin: "knowledge".to_string(),
            gptscript_bin: "gptscript".to_string(),
            retrieve_top_k: default_retrieve_top_k(),
            agent_system_prompt: default_agent_system_prompt(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat model settings
    pub llm: LlmConfig,
    /// Embedding model settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// External tool settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileSection>,
    embedding: Option<EmbeddingFileSection>,
    tools: Option<ToolsFileSection>,
}

#[derive(Debug, Deserialize)]
struct LlmFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    judge_model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingFileSection {
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ToolsFileSection {
    knowledge_bin: Option<String>,
    gptscript_bin: Option<String>,
    retrieve_top_k: Option<usize>,
    agent_system_prompt: Option<String>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (OPENAI_API_KEY, OPENAI_BASE_URL, ...)
    /// 2. Config file (~/.config/knowledge-evals/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file first
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        // Override with environment variables
        if let Ok(api_key) = env::var("OPENAI_API_KEY") {
            config.llm.api_key = api_key;
        }

        if let Ok(api_base) = env::var("OPENAI_BASE_URL") {
            config.llm.api_base = api_base;
        }

        if let Ok(model) = env::var("EVALS_CHAT_MODEL") {
            config.llm.model = model;
        }

        if let Ok(model) = env::var("EVALS_JUDGE_MODEL") {
            config.llm.judge_model = model;
        }

        if let Ok(model) = env::var("EVALS_EMBEDDING_MODEL") {
            config.embedding.model = model;
        }

        if let Ok(bin) = env::var("KNOWLEDGE_BIN") {
            config.tools.knowledge_bin = bin;
        }

        if let Ok(bin) = env::var("GPTSCRIPT_BIN") {
            config.tools.gptscript_bin = bin;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| EvalError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(llm) = file_config.llm {
            if let Some(api_base) = llm.api_base {
                config.llm.api_base = api_base;
            }
            if let Some(api_key) = llm.api_key {
                config.llm.api_key = api_key;
            }
            if let Some(model) = llm.model {
                config.llm.model = model;
            }
            if let Some(judge_model) = llm.judge_model {
                config.llm.judge_model = judge_model;
            }
            if let Some(max_tokens) = llm.max_tokens {
                config.llm.max_tokens = max_tokens;
            }
            if let Some(temperature) = llm.temperature {
                config.llm.temperature = temperature;
            }
        }

        if let Some(embedding) = file_config.embedding {
            if let Some(model) = embedding.model {
                config.embedding.model = model;
            }
        }

        if let Some(tools) = file_config.tools {
            if let Some(bin) = tools.knowledge_bin {
                config.tools.knowledge_bin = bin;
            }
            if let Some(bin) = tools.gptscript_bin {
                config.tools.gptscript_bin = bin;
            }
            if let Some(top_k) = tools.retrieve_top_k {
                config.tools.retrieve_top_k = top_k;
            }
            if let Some(prompt) = tools.agent_system_prompt {
                config.tools.agent_system_prompt = prompt;
            }
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "knowledge-evals")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.is_empty() {
            return Err(EvalError::Config(
                "API key is required. Set OPENAI_API_KEY environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.api_base.is_empty() {
            return Err(EvalError::Config(
                "API base URL is required. Set OPENAI_BASE_URL environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.model.is_empty() || self.llm.judge_model.is_empty() {
            return Err(EvalError::Config(
                "Chat and judge model names must not be empty.".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a config from explicit values (useful for testing).
    pub fn with_api(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            llm: LlmConfig {
                api_base: api_base.into(),
                api_key: api_key.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.llm.api_key.is_empty());
        assert_eq!(config.llm.api_base, "https://api.openai.com");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.judge_model, "gpt-4-turbo-preview");
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.tools.retrieve_top_k, 20);
    }

    #[test]
    fn test_validate_fails_without_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_api() {
        let config = Config::with_api("https://api.example.com", "test-key");
        assert_eq!(config.llm.api_base, "https://api.example.com");
        assert_eq!(config.llm.api_key, "test-key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_section_overrides() {
        let yaml = r#"
llm:
  api_key: from-file
  judge_model: gpt-4o-mini
tools:
  knowledge_bin: /usr/local/bin/knowledge
"#;
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        let llm = file.llm.unwrap();
        assert_eq!(llm.api_key.as_deref(), Some("from-file"));
        assert_eq!(llm.judge_model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(
            file.tools.unwrap().knowledge_bin.as_deref(),
            Some("/usr/local/bin/knowledge")
        );
    }
}
