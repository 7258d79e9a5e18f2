//! Report rendering
//!
//! A [`ComplexityReport`] is built once by the engine and never changed. The
//! formatter only renders it: the JSON summary and the verbose derivation
//! read the same fields, so both show the same numbers.

use crate::config::{AnalysisConfig, OutputMode};
use crate::error::Result;
use crate::metrics::ComplexityMetrics;
use crate::segmenter::TUnit;
use crate::transcript::{ExtractionStats, Utterance};
use crate::util::token_statistics::describe_distribution;
use serde::Serialize;
use std::fmt;

const RULE_WIDTH: usize = 70;
const TUNIT_PREVIEW_CHARS: usize = 60;

/// Everything computed for one transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityReport {
    pub utterances: Vec<Utterance>,
    pub extraction: ExtractionStats,

    /// Markers that were searched for
    pub markers: Vec<String>,

    pub tunits: Vec<TUnit>,
    pub metrics: ComplexityMetrics,

    /// Name of the tagger that produced the tags
    pub tagger: String,

    /// Set when any tagging used the rule-based fallback
    pub degraded_tagging: bool,
}

impl ComplexityReport {
    /// The flat summary record
    pub fn summary(&self) -> SummaryRecord {
        let m = &self.metrics;
        SummaryRecord {
            ttr: m.ttr,
            lexical_density: m.lexical_density,
            mean_tunit_length: m.mean_tunit_length.unwrap_or(0.0),
            clauses_per_tunit: m.mean_clauses_per_tunit.unwrap_or(0.0),
            total_tokens: m.total_tokens,
            unique_tokens: m.unique_tokens,
            lexical_words: m.lexical_words,
            tunit_count: m.tunit_count,
            degraded_tagging: self.degraded_tagging,
            utterance_count: self.utterances.len(),
            tunit_metrics_undefined: m.tunit_metrics_undefined(),
        }
    }

    /// All utterances joined with single spaces
    pub fn combined_text(&self) -> String {
        self.utterances
            .iter()
            .map(|u| u.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Machine-readable summary. Field order is the output key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub ttr: f64,
    pub lexical_density: f64,
    pub mean_tunit_length: f64,
    pub clauses_per_tunit: f64,
    pub total_tokens: usize,
    pub unique_tokens: usize,
    pub lexical_words: usize,
    pub tunit_count: usize,
    pub degraded_tagging: bool,
    pub utterance_count: usize,
    /// The two T-unit means are placeholders (no T-units)
    pub tunit_metrics_undefined: bool,
}

/// Renders reports in the configured output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFormatter {
    mode: OutputMode,
    preview_chars: usize,
}

impl ReportFormatter {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            preview_chars: 100,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.output).with_preview_chars(config.preview_chars)
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    pub fn render(&self, report: &ComplexityReport) -> Result<String> {
        match self.mode {
            OutputMode::Json => render_json(report),
            OutputMode::Verbose => Ok(render_verbose(report, self.preview_chars)),
        }
    }
}

/// Pretty-printed JSON summary record
pub fn render_json(report: &ComplexityReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.summary())?)
}

/// Human-readable derivation of every metric
pub fn render_verbose(report: &ComplexityReport, preview_chars: usize) -> String {
    Verbose {
        report,
        preview_chars,
    }
    .to_string()
}

struct Verbose<'a> {
    report: &'a ComplexityReport,
    preview_chars: usize,
}

impl fmt::Display for Verbose<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let m = &report.metrics;
        let rule = "=".repeat(RULE_WIDTH);
        let thin = "-".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "COMPLEXITY ANALYSIS")?;
        writeln!(f, "{rule}")?;

        if report.utterances.is_empty() {
            writeln!(f, "\nWARNING: No user utterances found in transcript.")?;
            writeln!(f, "Looking for lines starting with {}", quote_list(&report.markers))?;
        } else {
            writeln!(f, "\nFound {} user utterance(s):", report.utterances.len())?;
            for (i, utterance) in report.utterances.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, utterance.text)?;
            }
            writeln!(
                f,
                "\nCombined text: {}",
                preview(&report.combined_text(), self.preview_chars)
            )?;
        }
        if report.extraction.empty_marker_lines > 0 {
            writeln!(
                f,
                "Skipped {} marker line(s) with no text",
                report.extraction.empty_marker_lines
            )?;
        }
        writeln!(f, "\n{rule}")?;

        writeln!(f, "\n1. TYPE-TOKEN RATIO (TTR)")?;
        writeln!(f, "{thin}")?;
        writeln!(f, "   Total tokens (words): {}", m.total_tokens)?;
        writeln!(f, "   Unique types (unique words): {}", m.unique_tokens)?;
        writeln!(f, "   TTR = unique_types / total_tokens")?;
        writeln!(f, "   TTR = {} / {}", m.unique_tokens, m.total_tokens)?;
        writeln!(f, "   TTR = {:.3}", m.ttr)?;

        writeln!(f, "\n2. LEXICAL DENSITY")?;
        writeln!(f, "{thin}")?;
        writeln!(f, "   Total words: {}", m.total_tokens)?;
        writeln!(
            f,
            "   Lexical words (nouns, verbs, adjectives, adverbs): {}",
            m.lexical_words
        )?;
        writeln!(f, "   Word classes: {}", describe_distribution(&m.word_classes))?;
        writeln!(f, "   Lexical Density = lexical_words / total_words")?;
        writeln!(f, "   Lexical Density = {} / {}", m.lexical_words, m.total_tokens)?;
        writeln!(f, "   Lexical Density = {:.3}", m.lexical_density)?;

        writeln!(f, "\n3. MEAN LENGTH OF T-UNIT")?;
        writeln!(f, "{thin}")?;
        writeln!(f, "   Number of T-units: {}", m.tunit_count)?;
        for (i, unit) in report.tunits.iter().enumerate() {
            writeln!(
                f,
                "   T-unit {}: {} words - \"{}\"",
                i + 1,
                unit.word_count,
                preview(&unit.text, TUNIT_PREVIEW_CHARS)
            )?;
        }
        writeln!(f, "   Mean Length = sum(lengths) / number_of_tunits")?;
        match m.mean_tunit_length {
            Some(mean) => {
                writeln!(f, "   Mean Length = {} / {}", m.tunit_words, m.tunit_count)?;
                writeln!(f, "   Mean Length = {:.2} words", mean)?;
            }
            None => writeln!(f, "   Mean Length = N/A (no T-units)")?,
        }

        writeln!(f, "\n4. CLAUSES PER T-UNIT")?;
        writeln!(f, "{thin}")?;
        writeln!(f, "   Number of T-units: {}", m.tunit_count)?;
        for (i, unit) in report.tunits.iter().enumerate() {
            writeln!(
                f,
                "   T-unit {}: {} clause(s) - \"{}\"",
                i + 1,
                unit.clause_count,
                preview(&unit.text, TUNIT_PREVIEW_CHARS)
            )?;
        }
        writeln!(f, "   Mean Clauses = sum(clause_counts) / number_of_tunits")?;
        match m.mean_clauses_per_tunit {
            Some(mean) => {
                writeln!(f, "   Mean Clauses = {} / {}", m.clause_count, m.tunit_count)?;
                writeln!(f, "   Mean Clauses = {:.2}", mean)?;
            }
            None => writeln!(f, "   Mean Clauses = N/A (no T-units)")?,
        }

        writeln!(f, "\n{rule}")?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Type-Token Ratio (TTR):           {:.3}", m.ttr)?;
        writeln!(f, "Lexical Density:                  {:.3}", m.lexical_density)?;
        match m.mean_tunit_length {
            Some(mean) => writeln!(f, "Mean Length of T-unit:            {:.2} words", mean)?,
            None => writeln!(f, "Mean Length of T-unit:            N/A")?,
        }
        match m.mean_clauses_per_tunit {
            Some(mean) => writeln!(f, "Clauses per T-unit:               {:.2}", mean)?,
            None => writeln!(f, "Clauses per T-unit:               N/A")?,
        }
        if report.degraded_tagging {
            writeln!(
                f,
                "Tagging:                          {} (degraded, rule-based fallback)",
                report.tagger
            )?;
        } else {
            writeln!(f, "Tagging:                          {}", report.tagger)?;
        }
        writeln!(f, "{rule}")
    }
}

/// First `max_chars` characters, with `...` when truncated
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(" or ")
}
