//! Clause and T-unit segmentation
//!
//! Heuristic, per utterance:
//! - Terminal punctuation (`.`, `?`, `!`) closes a T-unit. Spans made only of
//!   punctuation are dropped; a bare number still forms a T-unit.
//! - Each T-unit has one main clause. A subordinator (`because`, `which`,
//!   `so that`, ...) adds a clause only when a verb follows it before the next
//!   subordinator or the end of the T-unit.
//! - A T-unit without any verb still counts as one T-unit with one clause.

use crate::tokenizers::TokenKind;
use crate::util::TaggedToken;
use serde::Serialize;

/// Single-word subordinators
const SUBORDINATORS: &[&str] = &[
    "because", "since", "although", "though", "while", "when", "if", "unless", "until", "after",
    "before", "as", "that", "which", "who", "whom", "whose", "where", "why", "how", "what",
    "whether",
];

/// Multi-word subordinators, matched before single words
const SUBORDINATOR_PHRASES: &[&[&str]] = &[&["in", "order", "that"], &["so", "that"]];

/// One T-unit: an independent clause with its dependent clauses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TUnit {
    /// Index of the utterance this T-unit came from
    pub utterance: usize,

    /// Tokens joined by single spaces
    pub text: String,

    pub word_count: usize,

    pub clause_count: usize,
}

/// Splits tagged utterances into T-units and counts their clauses
#[derive(Debug, Clone, Default)]
pub struct Segmenter;

impl Segmenter {
    pub fn new() -> Self {
        Self
    }

    /// Segment one utterance, preserving token order
    pub fn segment(&self, utterance: usize, tokens: &[TaggedToken]) -> Vec<TUnit> {
        tokens
            .split_inclusive(|t| t.is_terminal())
            .filter(|span| span.iter().any(|t| t.kind != TokenKind::Punctuation))
            .map(|span| TUnit {
                utterance,
                text: span
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                word_count: span.iter().filter(|t| t.is_word()).count(),
                clause_count: count_clauses(span),
            })
            .collect()
    }
}

/// 1 for the main clause plus one per subordinator followed by a verb
pub fn count_clauses(span: &[TaggedToken]) -> usize {
    let triggers = find_triggers(span);

    let subordinate = triggers
        .iter()
        .enumerate()
        .filter(|(n, (_, after))| {
            let region_end = triggers.get(n + 1).map(|(start, _)| *start).unwrap_or(span.len());
            span[*after..region_end].iter().any(|t| t.is_verb())
        })
        .count();

    1 + subordinate
}

/// (start, end) token ranges of each subordinator in the span
fn find_triggers(span: &[TaggedToken]) -> Vec<(usize, usize)> {
    let mut triggers = Vec::new();
    let mut i = 0;

    while i < span.len() {
        if let Some(len) = phrase_at(span, i) {
            triggers.push((i, i + len));
            i += len;
        } else if is_subordinator(&span[i]) {
            triggers.push((i, i + 1));
            i += 1;
        } else {
            i += 1;
        }
    }

    triggers
}

fn is_subordinator(token: &TaggedToken) -> bool {
    token.is_word() && SUBORDINATORS.contains(&token.text.to_lowercase().as_str())
}

fn phrase_at(span: &[TaggedToken], i: usize) -> Option<usize> {
    SUBORDINATOR_PHRASES.iter().find_map(|phrase| {
        let window = span.get(i..i + phrase.len())?;
        window
            .iter()
            .zip(phrase.iter())
            .all(|(token, word)| token.text.eq_ignore_ascii_case(word))
            .then_some(phrase.len())
    })
}
