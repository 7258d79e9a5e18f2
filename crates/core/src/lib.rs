//! # Lingo Library
//!
//! Linguistic complexity metrics for the user side of a conversation
//! transcript: type-token ratio, lexical density, mean T-unit length and
//! clauses per T-unit.
//!
//! ## Core Concepts
//!
//! - **Extractor**: Picks user utterances out of a transcript by line marker
//! - **Tokenizers**: Split an utterance into Treebank-style tokens
//! - **Taggers**: Assign Penn Treebank tags, falling back to rules (flagged as
//!   degraded) when no statistical model is available
//! - **Segmenter**: Splits tagged utterances into T-units and counts clauses
//! - **ComplexityEngine**: Runs the whole pipeline and produces a report
//!
//! ## Example
//!
//! ```rust
//! use lingo_core::{AnalysisConfig, ComplexityEngine, TaggerHandle};
//!
//! let tagger = TaggerHandle::rule_based(None);
//! let engine = ComplexityEngine::with_tagger(AnalysisConfig::default(), &tagger);
//!
//! let report = engine.analyze("Agent: Hi!\nYou: Hello, I want to rent an apartment.");
//! assert_eq!(report.metrics.tunit_count, 1);
//! println!("{}", lingo_core::report::render_json(&report).unwrap());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod report;
pub mod segmenter;
pub mod tagger;
pub mod tokenizers;
pub mod transcript;
pub mod util;

// Re-export main types
pub use config::{AnalysisConfig, OutputMode, TaggerBackend, TaggerConfig};
pub use engine::ComplexityEngine;
pub use error::{LingoError, Result};
pub use metrics::ComplexityMetrics;
pub use report::{ComplexityReport, ReportFormatter, SummaryRecord};
pub use segmenter::{Segmenter, TUnit};
pub use tagger::{PosTagger, TaggerHandle, WordClass};
pub use transcript::{Utterance, UtteranceExtractor};

/// Main entry point for analyzing a transcript
///
/// # Arguments
///
/// * `transcript` - The raw transcript text
/// * `config` - Optional configuration (uses default if None)
///
/// # Returns
///
/// A complete `ComplexityReport`. Never fails: missing tagger resources
/// degrade to rule-based tagging, and a transcript without user utterances
/// yields zeroed metrics.
///
/// The tagger is chosen once per process from the first call's
/// `config.tagger`.
///
/// # Example
///
/// ```rust
/// use lingo_core::{analyze_transcript, AnalysisConfig, TaggerBackend};
///
/// let config = AnalysisConfig::default().with_tagger_backend(TaggerBackend::Rules);
/// let report = analyze_transcript("You: We need two rooms.", Some(config));
/// println!("TTR: {:.3}", report.metrics.ttr);
/// ```
pub fn analyze_transcript(transcript: &str, config: Option<AnalysisConfig>) -> ComplexityReport {
    let config = config.unwrap_or_default();
    let engine = ComplexityEngine::new(config);
    engine.analyze(transcript)
}
