//! Tagger resource acquisition
//!
//! The perceptron model lives in a data directory as three JSON files. When
//! they are missing and a download URL is configured, each file is fetched
//! once with a per-request timeout and bounded exponential retry. Any failure
//! here is reported as a recoverable resource error.

use crate::config::{TaggerConfig, PERCEPTRON_MODEL_NAME};
use crate::error::{LingoError, Result};
use backon::{BlockingRetryable, ExponentialBuilder};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound on a single model file
const MAX_MODEL_BYTES: u64 = 64 * 1024 * 1024;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(8);

/// Paths of the three perceptron model files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub weights: PathBuf,
    pub tagdict: PathBuf,
    pub classes: PathBuf,
}

impl ModelFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            weights: dir.join(file_name("weights")),
            tagdict: dir.join(file_name("tagdict")),
            classes: dir.join(file_name("classes")),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.weights, &self.tagdict, &self.classes]
    }

    pub fn all_present(&self) -> bool {
        self.all().iter().all(|p| p.is_file())
    }
}

fn file_name(part: &str) -> String {
    format!("{}.{}.json", PERCEPTRON_MODEL_NAME, part)
}

/// Locate the model, downloading it first if it is missing and a URL is set
#[tracing::instrument(skip_all)]
pub fn acquire(config: &TaggerConfig) -> Result<ModelFiles> {
    let dir = model_dir(config)?;
    let files = ModelFiles::in_dir(&dir);

    if files.all_present() {
        tracing::debug!(dir = %dir.display(), "found perceptron model");
        return Ok(files);
    }

    match &config.download_url {
        Some(url) => download(url, &dir, config),
        None => Err(LingoError::Resource(format!(
            "perceptron model not found in {}",
            dir.display()
        ))),
    }
}

/// Download the model into the configured directory, replacing any copy
pub fn fetch(config: &TaggerConfig) -> Result<ModelFiles> {
    let url = config
        .download_url
        .as_deref()
        .ok_or_else(|| LingoError::Config("no tagger download URL configured".into()))?;
    let dir = model_dir(config)?;
    download(url, &dir, config)
}

fn model_dir(config: &TaggerConfig) -> Result<PathBuf> {
    config
        .resolved_model_dir()
        .ok_or_else(|| LingoError::Resource("no data directory for the tagger model".into()))
}

#[tracing::instrument(skip(config))]
fn download(base_url: &str, dir: &Path, config: &TaggerConfig) -> Result<ModelFiles> {
    std::fs::create_dir_all(dir)?;

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(config.download_timeout_secs)))
        .build()
        .into();

    let files = ModelFiles::in_dir(dir);
    for path in files.all() {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| LingoError::Resource(format!("bad model path {}", path.display())))?;
        let url = file_url(base_url, name);

        let body = fetch_with_retry(&agent, &url, config.download_retries)
            .map_err(|e| LingoError::Resource(format!("download of {} failed: {}", url, e)))?;

        // Parse before installing so a truncated body never replaces a model
        serde_json::from_str::<serde_json::Value>(&body).map_err(|source| {
            LingoError::CorruptModel {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let partial = path.with_extension("json.part");
        std::fs::write(&partial, body)?;
        std::fs::rename(&partial, path)?;
    }

    tracing::info!(dir = %dir.display(), "downloaded perceptron model");
    Ok(files)
}

fn file_url(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name)
}

fn fetch_with_retry(
    agent: &ureq::Agent,
    url: &str,
    retries: usize,
) -> std::result::Result<String, ureq::Error> {
    let backoff = ExponentialBuilder::default()
        .with_jitter()
        .with_max_delay(MAX_RETRY_DELAY)
        .with_max_times(retries);

    (|| fetch_once(agent, url))
        .retry(backoff)
        .sleep(std::thread::sleep)
        .when(is_retryable)
        .notify(|err, dur| {
            tracing::warn!(
                url,
                error = %err,
                retry_delay_ms = dur.as_millis(),
                "retrying_model_download"
            );
        })
        .call()
}

fn fetch_once(agent: &ureq::Agent, url: &str) -> std::result::Result<String, ureq::Error> {
    agent
        .get(url)
        .call()?
        .body_mut()
        .with_config()
        .limit(MAX_MODEL_BYTES)
        .read_to_string()
}

/// Client errors will not change on retry; everything else might
fn is_retryable(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::StatusCode(code) => *code >= 500 || *code == 429,
        ureq::Error::BadUri(_) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_file_names() {
        let files = ModelFiles::in_dir(Path::new("/data/tagger"));
        assert_eq!(
            files.weights,
            PathBuf::from("/data/tagger/averaged_perceptron_tagger_eng.weights.json")
        );
        assert_eq!(
            files.classes,
            PathBuf::from("/data/tagger/averaged_perceptron_tagger_eng.classes.json")
        );
    }

    #[test]
    fn test_file_url_joins_once() {
        assert_eq!(
            file_url("https://example.com/models/", "a.json"),
            "https://example.com/models/a.json"
        );
        assert_eq!(
            file_url("https://example.com/models", "a.json"),
            "https://example.com/models/a.json"
        );
    }

    #[test]
    fn test_acquire_finds_existing_model() {
        let dir = tempfile::tempdir().unwrap();
        let files = ModelFiles::in_dir(dir.path());
        for path in files.all() {
            std::fs::write(path, "{}").unwrap();
        }

        let config = TaggerConfig {
            model_dir: Some(dir.path().to_path_buf()),
            ..TaggerConfig::default()
        };
        assert_eq!(acquire(&config).unwrap(), files);
    }

    #[test]
    fn test_acquire_without_url_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = TaggerConfig {
            model_dir: Some(dir.path().to_path_buf()),
            ..TaggerConfig::default()
        };
        let err = acquire(&config).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_fetch_requires_url() {
        let err = fetch(&TaggerConfig::default()).unwrap_err();
        assert!(matches!(err, LingoError::Config(_)));
    }

    #[test]
    fn test_retry_policy() {
        assert!(!is_retryable(&ureq::Error::StatusCode(404)));
        assert!(is_retryable(&ureq::Error::StatusCode(503)));
        assert!(is_retryable(&ureq::Error::StatusCode(429)));
    }

    #[test]
    fn test_unreachable_download_fails_without_hanging() {
        let dir = tempfile::tempdir().unwrap();
        let config = TaggerConfig {
            model_dir: Some(dir.path().to_path_buf()),
            download_url: Some("http://127.0.0.1:9/models".to_string()),
            download_timeout_secs: 2,
            download_retries: 0,
            ..TaggerConfig::default()
        };
        let err = acquire(&config).unwrap_err();
        assert!(err.is_recoverable());
        assert!(!ModelFiles::in_dir(dir.path()).all_present());
    }
}
