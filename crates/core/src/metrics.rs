//! Complexity metrics computation
//!
//! All four metrics are pure functions of aggregated counts:
//! - TTR: distinct lower-cased words / words
//! - Lexical density: nouns, verbs, adjectives and adverbs / words
//! - Mean T-unit length: T-unit words / T-units
//! - Clauses per T-unit: clauses / T-units
//!
//! Punctuation and clitics are never words. Ratios over zero words are 0; the
//! two T-unit means are `None` when there are no T-units.

use crate::segmenter::TUnit;
use crate::tagger::WordClass;
use crate::util::token_statistics::word_class_distribution;
use crate::util::TaggedToken;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Metrics computed for a whole transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityMetrics {
    pub ttr: f64,
    pub lexical_density: f64,
    pub mean_tunit_length: Option<f64>,
    pub mean_clauses_per_tunit: Option<f64>,

    // Supporting counts
    pub total_tokens: usize,
    pub unique_tokens: usize,
    pub lexical_words: usize,
    pub tunit_count: usize,
    pub tunit_words: usize,
    pub clause_count: usize,

    /// Words per coarse class
    pub word_classes: BTreeMap<WordClass, usize>,
}

impl ComplexityMetrics {
    /// Compute metrics from every utterance's tagged tokens and all T-units
    pub fn compute<'a, I>(tokens: I, tunits: &[TUnit]) -> Self
    where
        I: IntoIterator<Item = &'a TaggedToken>,
    {
        let words: Vec<&TaggedToken> = tokens.into_iter().filter(|t| t.is_word()).collect();

        let unique_tokens = words
            .iter()
            .map(|t| t.text.to_lowercase())
            .collect::<HashSet<_>>()
            .len();
        let lexical_words = words.iter().filter(|t| t.is_lexical()).count();
        let shape: Vec<(usize, usize)> = tunits
            .iter()
            .map(|u| (u.word_count, u.clause_count))
            .collect();

        let mut metrics = Self::from_counts(words.len(), unique_tokens, lexical_words, &shape);
        metrics.word_classes = word_class_distribution(words.iter().copied());
        metrics
    }

    /// Compute metrics from raw counts; `tunits` holds (words, clauses) per
    /// T-unit
    pub fn from_counts(
        total_tokens: usize,
        unique_tokens: usize,
        lexical_words: usize,
        tunits: &[(usize, usize)],
    ) -> Self {
        let tunit_count = tunits.len();
        let tunit_words: usize = tunits.iter().map(|(words, _)| words).sum();
        let clause_count: usize = tunits.iter().map(|(_, clauses)| clauses).sum();

        Self {
            ttr: ratio(unique_tokens, total_tokens),
            lexical_density: ratio(lexical_words, total_tokens),
            mean_tunit_length: mean(tunit_words, tunit_count),
            mean_clauses_per_tunit: mean(clause_count, tunit_count),
            total_tokens,
            unique_tokens,
            lexical_words,
            tunit_count,
            tunit_words,
            clause_count,
            word_classes: BTreeMap::new(),
        }
    }

    /// True when there are no T-units and the means are undefined
    pub fn tunit_metrics_undefined(&self) -> bool {
        self.tunit_count == 0
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64
    } else {
        0.0
    }
}

fn mean(sum: usize, count: usize) -> Option<f64> {
    (count > 0).then(|| sum as f64 / count as f64)
}
