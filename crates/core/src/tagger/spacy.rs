//! spaCy tagging backend
//!
//! Runs a spaCy pipeline over a `Doc` built from our own tokens, so spaCy's
//! tokenizer never changes the token boundaries the metrics depend on. Only
//! the fine-grained `tag_` (Penn Treebank) is used.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::PosTagger;
use crate::error::{LingoError, Result};

/// Helper macro for PyO3 error mapping to reduce boilerplate
macro_rules! py_err {
    ($operation:expr, $e:expr) => {
        LingoError::Tagging(format!("Failed to {}: {}", $operation, $e))
    };
}

/// spaCy-backed statistical tagger
///
/// Common models:
/// - "en_core_web_sm" - Small English model (fast, ~15MB)
/// - "en_core_web_md" - Medium English model (balanced, ~45MB)
///
/// Make sure to download the model first:
/// ```bash
/// python -m spacy download en_core_web_sm
/// ```
pub struct SpacyTagger {
    nlp: Py<PyAny>,
}

impl SpacyTagger {
    /// Import spaCy and load the model. Failure here means the resource is
    /// unavailable and the caller should fall back.
    pub fn load(model_name: &str) -> Result<Self> {
        Python::with_gil(|py| {
            // Configure Python path if PYTHON_HOME is set
            if let Ok(python_home) = std::env::var("PYTHON_HOME") {
                Self::configure_python_path(py, &python_home)?;
            }

            let spacy = py.import_bound("spacy").map_err(|e| {
                LingoError::Resource(format!(
                    "Failed to import spacy: {}. Make sure spacy is installed: pip install spacy",
                    e
                ))
            })?;

            let nlp = spacy.call_method1("load", (model_name,)).map_err(|e| {
                LingoError::Resource(format!(
                    "Failed to load SpaCy model '{}': {}. Download it with: python -m spacy download {}",
                    model_name, e, model_name
                ))
            })?;

            tracing::info!(model = model_name, "loaded spaCy model");
            Ok(Self { nlp: nlp.unbind() })
        })
    }

    /// Configure Python's sys.path to use a virtual environment
    fn configure_python_path(py: Python, python_home: &str) -> Result<()> {
        let sys = py
            .import_bound("sys")
            .map_err(|e| py_err!("import sys", e))?;

        let version_info = sys
            .getattr("version_info")
            .map_err(|e| py_err!("get version_info", e))?;

        let major = version_info
            .getattr("major")
            .and_then(|v| v.extract::<i32>())
            .map_err(|e| py_err!("get major version", e))?;

        let minor = version_info
            .getattr("minor")
            .and_then(|v| v.extract::<i32>())
            .map_err(|e| py_err!("get minor version", e))?;

        let site_packages = format!(
            "{}/lib/python{}.{}/site-packages",
            python_home, major, minor
        );

        // Insert at the beginning so venv packages take precedence
        sys.getattr("path")
            .and_then(|path| path.call_method1("insert", (0, &site_packages)))
            .map_err(|e| py_err!("insert into sys.path", e))?;

        Ok(())
    }
}

impl PosTagger for SpacyTagger {
    fn tag(&self, tokens: &[&str]) -> Result<Vec<String>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        Python::with_gil(|py| {
            let nlp = self.nlp.bind(py);

            let doc_cls = py
                .import_bound("spacy.tokens")
                .and_then(|m| m.getattr("Doc"))
                .map_err(|e| py_err!("import spacy.tokens.Doc", e))?;
            let vocab = nlp.getattr("vocab").map_err(|e| py_err!("get vocab", e))?;

            let kwargs = PyDict::new_bound(py);
            kwargs
                .set_item("words", tokens.to_vec())
                .map_err(|e| py_err!("set words", e))?;

            let doc = doc_cls
                .call((vocab,), Some(&kwargs))
                .map_err(|e| py_err!("build Doc", e))?;
            let doc = nlp.call1((doc,)).map_err(|e| py_err!("process Doc", e))?;

            let mut tags = Vec::with_capacity(tokens.len());
            for token in doc.iter().map_err(|e| py_err!("get iterator", e))? {
                let tag = token
                    .and_then(|t| t.getattr("tag_"))
                    .and_then(|t| t.extract::<String>())
                    .map_err(|e| py_err!("extract tag", e))?;
                tags.push(tag);
            }

            Ok(tags)
        })
    }

    fn name(&self) -> &str {
        "spacy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_resource_error() {
        match SpacyTagger::load("no_such_model_xyz") {
            Ok(_) => panic!("loading a nonexistent model must fail"),
            Err(e) => assert!(e.is_recoverable()),
        }
    }
}
