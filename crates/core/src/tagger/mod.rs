//! Part-of-speech tagging
//!
//! Two kinds of tagger sit behind the `PosTagger` trait:
//! - Statistical taggers (`PerceptronTagger`, and `SpacyTagger` with the
//!   `spacy` feature) that need an external resource.
//! - `RuleBasedTagger`, which needs nothing and is used whenever the
//!   statistical resource cannot be acquired. Its output is flagged as
//!   degraded.
//!
//! The choice is made once per process by [`init`] and carried in a
//! [`TaggerHandle`] together with the degraded flag.

pub mod perceptron;
pub mod resource;
pub mod rules;
#[cfg(feature = "spacy")]
pub mod spacy;

pub use perceptron::PerceptronTagger;
pub use rules::RuleBasedTagger;
#[cfg(feature = "spacy")]
pub use spacy::SpacyTagger;

use crate::config::{TaggerBackend, TaggerConfig};
use crate::error::Result;
use crate::tokenizers::Token;
use crate::util::TaggedToken;
use serde::Serialize;
use std::sync::OnceLock;

/// Coarse word classes used by the metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Conjunction,
    Other,
}

impl WordClass {
    /// Map a Penn Treebank tag to its class
    pub fn from_tag(tag: &str) -> Self {
        if tag.starts_with("NN") {
            Self::Noun
        } else if tag.starts_with("VB") {
            Self::Verb
        } else if tag.starts_with("JJ") {
            Self::Adjective
        } else if tag.starts_with("RB") || tag == "WRB" {
            Self::Adverb
        } else if tag == "CC" || tag == "IN" {
            Self::Conjunction
        } else {
            Self::Other
        }
    }

    /// Content words: nouns, verbs, adjectives, adverbs
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            Self::Noun | Self::Verb | Self::Adjective | Self::Adverb
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Conjunction => "conjunction",
            Self::Other => "other",
        }
    }
}

/// Trait for part-of-speech taggers
pub trait PosTagger: Send + Sync {
    /// Tag a token sequence, returning one Penn Treebank tag per token
    fn tag(&self, tokens: &[&str]) -> Result<Vec<String>>;

    /// Get the name of this tagger
    fn name(&self) -> &str;

    /// Whether this tagger runs in reduced-accuracy mode
    fn is_degraded(&self) -> bool {
        false
    }
}

/// The selected tagger and whether it is a fallback
pub struct TaggerHandle {
    tagger: Box<dyn PosTagger>,
    fallback: RuleBasedTagger,
    degraded: bool,
    fallback_reason: Option<String>,
}

impl TaggerHandle {
    /// Wrap a tagger. Degraded if the tagger says so.
    pub fn new(tagger: Box<dyn PosTagger>) -> Self {
        let degraded = tagger.is_degraded();
        Self {
            tagger,
            fallback: RuleBasedTagger::new(),
            degraded,
            fallback_reason: None,
        }
    }

    /// A rule-based handle, recording why the statistical tagger was not used
    pub fn rule_based(reason: Option<String>) -> Self {
        Self {
            tagger: Box::new(RuleBasedTagger::new()),
            fallback: RuleBasedTagger::new(),
            degraded: true,
            fallback_reason: reason,
        }
    }

    /// Build a handle for the configured backend, falling back to rules when
    /// the backend's resource is unavailable. Never fails.
    #[tracing::instrument(skip_all, fields(backend = ?config.backend))]
    pub fn select(config: &TaggerConfig) -> Self {
        let selected = match config.backend {
            TaggerBackend::Rules => return Self::rule_based(None),
            TaggerBackend::Perceptron => resource::acquire(config)
                .and_then(|files| PerceptronTagger::load(&files))
                .map(|t| Box::new(t) as Box<dyn PosTagger>),
            TaggerBackend::Spacy => load_spacy(config),
        };

        match selected {
            Ok(tagger) => {
                tracing::info!(tagger = tagger.name(), "statistical tagger ready");
                Self::new(tagger)
            }
            Err(e) => {
                tracing::warn!(error = %e, "tagger resource unavailable, using rule-based tagging");
                Self::rule_based(Some(e.to_string()))
            }
        }
    }

    pub fn name(&self) -> &str {
        self.tagger.name()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }

    /// Tag one utterance's tokens.
    ///
    /// Returns the tagged tokens and whether this call had to fall back to
    /// rule-based tagging.
    pub fn tag(&self, tokens: Vec<Token>) -> (Vec<TaggedToken>, bool) {
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        let (tags, degraded) = match self.tagger.tag(&texts) {
            Ok(tags) if tags.len() == texts.len() => (tags, self.degraded),
            Ok(tags) => {
                tracing::warn!(
                    expected = texts.len(),
                    got = tags.len(),
                    "tagger returned misaligned tags, using rule-based tagging"
                );
                (self.fallback.tag_tokens(&texts), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "tagging failed, using rule-based tagging");
                (self.fallback.tag_tokens(&texts), true)
            }
        };

        let tagged = tokens
            .into_iter()
            .zip(tags)
            .map(|(token, tag)| TaggedToken::new(token, tag))
            .collect();
        (tagged, degraded)
    }
}

impl std::fmt::Debug for TaggerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggerHandle")
            .field("tagger", &self.tagger.name())
            .field("degraded", &self.degraded)
            .field("fallback_reason", &self.fallback_reason)
            .finish()
    }
}

static TAGGER: OnceLock<TaggerHandle> = OnceLock::new();

/// Initialize the process-wide tagger. Only the first call's configuration
/// is used; later calls return the cached handle.
pub fn init(config: &TaggerConfig) -> &'static TaggerHandle {
    TAGGER.get_or_init(|| TaggerHandle::select(config))
}

#[cfg(feature = "spacy")]
fn load_spacy(config: &TaggerConfig) -> Result<Box<dyn PosTagger>> {
    Ok(Box::new(SpacyTagger::load(&config.spacy_model)?))
}

#[cfg(not(feature = "spacy"))]
fn load_spacy(_config: &TaggerConfig) -> Result<Box<dyn PosTagger>> {
    Err(crate::error::LingoError::Resource(
        "built without the `spacy` feature".to_string(),
    ))
}
