//! Translation configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Settings for the rule translator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Whether extended rules are sent for translation (default: true)
    pub enabled: bool,
    /// Chat model name (default: `gpt-4o`)
    pub model: String,
    /// Sampling temperature for rule translation (default: 0.1)
    pub temperature: f32,
    /// Base URL of the chat-completions API
    pub api_base: String,
    /// Environment variable holding the API key (default: `OPENAI_API_KEY`)
    pub api_key_env: String,
    /// Reference text embedded in the system prompt
    pub knowledge_base: Option<PathBuf>,
    /// Number of rules sampled for variable declarations (default: 10)
    pub variable_sample_size: usize,
    /// File name of the extracted declarations, written next to the report
    pub variables_file: String,
    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            knowledge_base: None,
            variable_sample_size: 10,
            variables_file: "extracted_variables.js".to_string(),
            timeout_secs: 120,
        }
    }
}

impl TranslationConfig {
    /// Read the knowledge base text; no configured file yields an empty text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the configured file cannot be read.
    pub fn load_knowledge_base(&self) -> Result<String> {
        match &self.knowledge_base {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| Error::io(path.display().to_string(), e)),
            None => Ok(String::new()),
        }
    }

    /// API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the variable is unset or blank.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(Error::Config(format!(
                "environment variable {} is not set",
                self.api_key_env
            ))),
        }
    }
}
