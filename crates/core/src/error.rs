//! Error types for the complexity engine
//!
//! Only input failures are fatal. Tagger resource problems are recovered by
//! falling back to rule-based tagging, and degenerate transcripts are reported
//! through flags on the result rather than as errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LingoError {
    #[error("cannot read transcript from {source_name}: {source}")]
    InputUnavailable {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no transcript provided")]
    EmptyInput,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to parse configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("tagger resource unavailable: {0}")]
    Resource(String),

    #[error("tagger model file {path} is corrupt: {source}")]
    CorruptModel {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("tagging failed: {0}")]
    Tagging(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LingoError {
    /// Wrap an IO failure on the named input source
    pub fn input_unavailable(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::InputUnavailable {
            source_name: source_name.into(),
            source,
        }
    }

    /// Whether this error is recovered locally by degrading to rule-based tagging
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Resource(_) | Self::CorruptModel { .. })
    }
}

pub type Result<T> = std::result::Result<T, LingoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_unavailable_message() {
        let err = LingoError::input_unavailable(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(
            err.to_string(),
            "cannot read transcript from missing.txt: no such file"
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_resource_errors_are_recoverable() {
        assert!(LingoError::Resource("model dir missing".into()).is_recoverable());
        assert!(!LingoError::EmptyInput.is_recoverable());
    }
}
