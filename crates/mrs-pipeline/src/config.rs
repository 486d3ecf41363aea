//! Run configuration

use std::path::Path;

use mrs_report::SectionBounds;
use mrs_translate::TranslationConfig;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// File format of the generated table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Configuration for a run, loadable from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Markers around the parsed report section
    pub section: SectionBounds,
    /// Fail a pair on unrecognized report lines (default: false)
    pub strict: bool,
    /// Output format (default: xlsx)
    pub output_format: OutputFormat,
    /// Worksheet name for xlsx output (default: `MappingSpec`)
    pub sheet_name: String,
    /// Appended to the report stem to name the output (default: `__MRS_Doc`)
    pub output_suffix: String,
    /// Removed from the report stem to name the output (default: `PTFFormat_`)
    pub strip_prefix: String,
    /// Field delimiter for csv output (default: comma)
    pub csv_delimiter: char,
    /// Log file written next to each report; `None` disables it
    /// (default: `mrs_generation_log.log`)
    pub pair_log_file: Option<String>,
    pub translation: TranslationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            section: SectionBounds::default(),
            strict: false,
            output_format: OutputFormat::default(),
            sheet_name: mrs_adapter_xlsx::DEFAULT_SHEET_NAME.to_string(),
            output_suffix: "__MRS_Doc".to_string(),
            strip_prefix: "PTFFormat_".to_string(),
            csv_delimiter: ',',
            pair_log_file: Some(crate::pair_log::DEFAULT_PAIR_LOG.to_string()),
            translation: TranslationConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML document; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML or unknown values.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::parse_yaml(text, "<inline>")
    }

    /// Load a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| Error::config(&origin, e.to_string()))?;
        Self::parse_yaml(&text, &origin)
    }

    fn parse_yaml(text: &str, origin: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).map_err(|e| Error::config(origin, e.to_string()))?;
        config.csv_delimiter_byte().map_err(|message| Error::config(origin, message))?;
        Ok(config)
    }

    /// The csv delimiter as a single byte
    ///
    /// # Errors
    ///
    /// Returns a message when the delimiter is not an ASCII character.
    pub fn csv_delimiter_byte(&self) -> std::result::Result<u8, String> {
        u8::try_from(self.csv_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| format!("csv_delimiter '{}' is not an ASCII character", self.csv_delimiter))
    }
}
