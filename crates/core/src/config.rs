//! Configuration for the complexity engine

use crate::error::{LingoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the perceptron model directory
pub const TAGGER_DIR_ENV: &str = "LINGO_TAGGER_DIR";

/// Name of the NLTK-format perceptron model
pub const PERCEPTRON_MODEL_NAME: &str = "averaged_perceptron_tagger_eng";

/// How the finished report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-readable derivation of every metric
    #[default]
    Verbose,
    /// A single structured record
    Json,
}

/// Part-of-speech tagger selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggerBackend {
    /// Averaged perceptron over an NLTK-format JSON model
    #[default]
    Perceptron,
    /// spaCy pipeline through Python (requires the `spacy` feature)
    Spacy,
    /// Suffix and word-list heuristics; always reported as degraded
    Rules,
}

/// Tagger resource settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    pub backend: TaggerBackend,

    /// Directory holding the perceptron model files
    pub model_dir: Option<PathBuf>,

    /// Base URL serving the model files, fetched once when they are missing
    pub download_url: Option<String>,

    pub download_timeout_secs: u64,

    pub download_retries: usize,

    /// spaCy model name, used by the `spacy` backend
    pub spacy_model: String,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            backend: TaggerBackend::default(),
            model_dir: None,
            download_url: None,
            download_timeout_secs: 30,
            download_retries: 3,
            spacy_model: "en_core_web_sm".to_string(),
        }
    }
}

impl TaggerConfig {
    /// Resolve the model directory: explicit setting, then `LINGO_TAGGER_DIR`,
    /// then the platform data directory.
    pub fn resolved_model_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.model_dir {
            return Some(dir.clone());
        }
        if let Ok(dir) = std::env::var(TAGGER_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Some(PathBuf::from(dir));
            }
        }
        dirs::data_dir().map(|d| d.join("lingo").join(PERCEPTRON_MODEL_NAME))
    }
}

/// Configuration for a complexity analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Line prefixes that attribute a line to the user
    pub markers: Vec<String>,

    /// Match markers regardless of case
    pub case_insensitive_markers: bool,

    pub output: OutputMode,

    pub tagger: TaggerConfig,

    /// Truncation width of the combined-text preview in verbose reports
    pub preview_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            markers: vec!["You:".to_string(), "You ".to_string()],
            case_insensitive_markers: false,
            output: OutputMode::default(),
            tagger: TaggerConfig::default(),
            preview_chars: 100,
        }
    }

    /// Load a configuration from a TOML file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LingoError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot extract anything
    pub fn validate(&self) -> Result<()> {
        if self.markers.is_empty() {
            return Err(LingoError::Config("at least one marker is required".into()));
        }
        if self.markers.iter().any(|m| m.trim().is_empty()) {
            return Err(LingoError::Config("markers must not be blank".into()));
        }
        Ok(())
    }

    /// Replace the marker set
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether markers match regardless of case
    pub fn with_case_insensitive_markers(mut self, enable: bool) -> Self {
        self.case_insensitive_markers = enable;
        self
    }

    /// Set the output mode
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Set the tagger backend
    pub fn with_tagger_backend(mut self, backend: TaggerBackend) -> Self {
        self.tagger.backend = backend;
        self
    }

    /// Set the perceptron model directory
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tagger.model_dir = Some(dir.into());
        self
    }

    /// Set the model download base URL
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.tagger.download_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.markers, vec!["You:", "You "]);
        assert!(!config.case_insensitive_markers);
        assert_eq!(config.output, OutputMode::Verbose);
        assert_eq!(config.tagger.backend, TaggerBackend::Perceptron);
        assert_eq!(config.tagger.download_retries, 3);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AnalysisConfig::new()
            .with_markers(["Student:"])
            .with_case_insensitive_markers(true)
            .with_output(OutputMode::Json)
            .with_tagger_backend(TaggerBackend::Rules);

        assert_eq!(config.markers, vec!["Student:"]);
        assert!(config.case_insensitive_markers);
        assert_eq!(config.output, OutputMode::Json);
        assert_eq!(config.tagger.backend, TaggerBackend::Rules);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml(
            r#"
            output = "json"

            [tagger]
            backend = "rules"
            download_retries = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.output, OutputMode::Json);
        assert_eq!(config.tagger.backend, TaggerBackend::Rules);
        assert_eq!(config.tagger.download_retries, 5);
        assert_eq!(config.tagger.download_timeout_secs, 30);
        assert_eq!(config.markers, vec!["You:", "You "]);
    }

    #[test]
    fn test_empty_markers_rejected() {
        let err = AnalysisConfig::from_toml("markers = []").unwrap_err();
        assert!(matches!(err, LingoError::Config(_)));
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let err = AnalysisConfig::from_toml("[tagger]\nbackend = \"bert\"").unwrap_err();
        assert!(matches!(err, LingoError::ConfigParse(_)));
    }

    #[test]
    fn test_explicit_model_dir_wins() {
        let config = AnalysisConfig::new().with_model_dir("/opt/models/tagger");
        assert_eq!(
            config.tagger.resolved_model_dir(),
            Some(PathBuf::from("/opt/models/tagger"))
        );
    }
}
