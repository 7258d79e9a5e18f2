//! Main complexity engine that orchestrates the analysis

use crate::config::AnalysisConfig;
use crate::metrics::ComplexityMetrics;
use crate::report::ComplexityReport;
use crate::segmenter::{Segmenter, TUnit};
use crate::tagger::{self, TaggerHandle};
use crate::tokenizers::{Tokenizer, TreebankTokenizer};
use crate::transcript::UtteranceExtractor;
use crate::util::TaggedToken;

/// The main complexity engine
pub struct ComplexityEngine<'t> {
    config: AnalysisConfig,
    extractor: UtteranceExtractor,
    tokenizer: Box<dyn Tokenizer>,
    tagger: &'t TaggerHandle,
    segmenter: Segmenter,
}

impl ComplexityEngine<'static> {
    /// Create an engine using the process-wide tagger, initializing it from
    /// `config.tagger` on first use
    pub fn new(config: AnalysisConfig) -> Self {
        let tagger = tagger::init(&config.tagger);
        Self::with_tagger(config, tagger)
    }
}

impl<'t> ComplexityEngine<'t> {
    /// Create an engine with an explicit tagger
    pub fn with_tagger(config: AnalysisConfig, tagger: &'t TaggerHandle) -> Self {
        let extractor = UtteranceExtractor::new(config.markers.iter().cloned())
            .with_case_insensitive(config.case_insensitive_markers);

        Self {
            config,
            extractor,
            tokenizer: Box::new(TreebankTokenizer::new()),
            tagger,
            segmenter: Segmenter::new(),
        }
    }

    /// Replace the default Treebank tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn tagger(&self) -> &TaggerHandle {
        self.tagger
    }

    /// Analyze a transcript
    ///
    /// 1. Extract user utterances
    /// 2. Tokenize and tag each utterance
    /// 3. Segment each utterance into T-units
    /// 4. Aggregate metrics over all utterances
    #[tracing::instrument(skip_all, fields(bytes = transcript.len()))]
    pub fn analyze(&self, transcript: &str) -> ComplexityReport {
        let extraction = self.extractor.extract(transcript);
        if extraction.is_empty() {
            tracing::warn!(
                markers = ?self.extractor.markers(),
                "no user utterances found"
            );
        }

        let mut degraded = self.tagger.is_degraded();
        let mut tagged: Vec<TaggedToken> = Vec::new();
        let mut tunits: Vec<TUnit> = Vec::new();

        for (index, utterance) in extraction.utterances.iter().enumerate() {
            let tokens = self.tokenizer.tokenize(&utterance.text);
            let (tokens, call_degraded) = self.tagger.tag(tokens);
            degraded |= call_degraded;

            let units = self.segmenter.segment(index, &tokens);
            tracing::debug!(
                utterance = index,
                tokens = tokens.len(),
                tunits = units.len(),
                "segmented utterance"
            );

            tunits.extend(units);
            tagged.extend(tokens);
        }

        let metrics = ComplexityMetrics::compute(&tagged, &tunits);
        tracing::info!(
            utterances = extraction.utterances.len(),
            words = metrics.total_tokens,
            tunits = metrics.tunit_count,
            degraded,
            "analysis complete"
        );

        ComplexityReport {
            utterances: extraction.utterances,
            extraction: extraction.stats,
            markers: self.extractor.markers().to_vec(),
            tunits,
            metrics,
            tagger: self.tagger.name().to_string(),
            degraded_tagging: degraded,
        }
    }
}

impl std::fmt::Debug for ComplexityEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplexityEngine")
            .field("config", &self.config)
            .field("tokenizer", &self.tokenizer.name())
            .field("tagger", &self.tagger)
            .finish()
    }
}
