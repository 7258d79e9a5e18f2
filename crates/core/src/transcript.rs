//! Utterance extraction
//!
//! A transcript is free-form text with one speaker turn per line. Lines that
//! start with one of the configured user markers (e.g. `You:`) are user
//! utterances; every other line belongs to another speaker and is ignored.

use serde::Serialize;

/// A single user turn, in transcript order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    /// The utterance text with the marker removed and whitespace trimmed
    pub text: String,

    /// 1-based line number in the transcript
    pub line: usize,
}

/// Counters collected while scanning a transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Number of lines scanned
    pub lines: usize,

    /// Lines that started with a user marker
    pub marker_lines: usize,

    /// Marker lines with nothing after the marker (discarded)
    pub empty_marker_lines: usize,
}

/// Result of extracting user utterances from a transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub utterances: Vec<Utterance>,
    pub stats: ExtractionStats,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }
}

/// Extracts user utterances by line prefix
#[derive(Debug, Clone)]
pub struct UtteranceExtractor {
    markers: Vec<String>,
    case_insensitive: bool,
}

impl UtteranceExtractor {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    pub fn with_case_insensitive(mut self, enable: bool) -> Self {
        self.case_insensitive = enable;
        self
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Scan the transcript and return the user utterances in order
    pub fn extract(&self, transcript: &str) -> Extraction {
        let mut extraction = Extraction::default();

        for (idx, raw_line) in transcript.lines().enumerate() {
            extraction.stats.lines += 1;
            let line = raw_line.trim();

            let Some(rest) = self.strip_marker(line) else {
                continue;
            };
            extraction.stats.marker_lines += 1;

            let text = rest.trim();
            if text.is_empty() {
                extraction.stats.empty_marker_lines += 1;
                tracing::warn!(line = idx + 1, "user marker with no utterance text");
                continue;
            }

            extraction.utterances.push(Utterance {
                text: text.to_string(),
                line: idx + 1,
            });
        }

        tracing::debug!(
            lines = extraction.stats.lines,
            utterances = extraction.utterances.len(),
            "extracted user utterances"
        );

        extraction
    }

    /// Remove the longest matching marker from the start of `line`
    fn strip_marker<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.markers
            .iter()
            .filter_map(|marker| strip_prefix(line, marker, self.case_insensitive))
            .min_by_key(|rest| rest.len())
    }
}

impl Default for UtteranceExtractor {
    fn default() -> Self {
        Self::new(["You:", "You "])
    }
}

fn strip_prefix<'a>(line: &'a str, marker: &str, case_insensitive: bool) -> Option<&'a str> {
    if !case_insensitive {
        return line.strip_prefix(marker);
    }

    let mut line_chars = line.char_indices();
    for expected in marker.chars() {
        let (_, actual) = line_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }

    let offset = line_chars.next().map(|(pos, _)| pos).unwrap_or(line.len());
    Some(&line[offset..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "\
Agent: Welcome to the leasing office. How can I help?
You: Hello, I want to rent an apartment.
Agent: Great. What size are you looking for?
You: Two bedrooms, if possible.
Your call is important to us.
You
You:
  You: I need it because my family is moving here.
";

    #[test]
    fn test_extracts_user_lines_in_order() {
        let extraction = UtteranceExtractor::default().extract(TRANSCRIPT);
        let texts: Vec<&str> = extraction.utterances.iter().map(|u| u.text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                "Hello, I want to rent an apartment.",
                "Two bedrooms, if possible.",
                "I need it because my family is moving here.",
            ]
        );
        assert_eq!(extraction.utterances[0].line, 2);
        assert_eq!(extraction.utterances[2].line, 8);
    }

    #[test]
    fn test_empty_marker_lines_are_counted_but_discarded() {
        let extraction = UtteranceExtractor::default().extract(TRANSCRIPT);

        assert_eq!(extraction.stats.lines, 8);
        assert_eq!(extraction.stats.marker_lines, 4);
        assert_eq!(extraction.stats.empty_marker_lines, 1);
        assert_eq!(extraction.utterances.len(), 3);
    }

    #[test]
    fn test_no_matching_lines_is_not_an_error() {
        let extraction = UtteranceExtractor::default().extract("Agent: hi\nAgent: bye");
        assert!(extraction.is_empty());
    }

    #[test]
    fn test_markers_are_case_sensitive_by_default() {
        let extraction = UtteranceExtractor::default().extract("you: lowercase marker");
        assert!(extraction.is_empty());

        let extraction = UtteranceExtractor::default()
            .with_case_insensitive(true)
            .extract("you: lowercase marker\nYOU: shouting");
        assert_eq!(extraction.utterances.len(), 2);
        assert_eq!(extraction.utterances[0].text, "lowercase marker");
        assert_eq!(extraction.utterances[1].text, "shouting");
    }

    #[test]
    fn test_custom_markers() {
        let extraction = UtteranceExtractor::new(["Student:", "S:"])
            .extract("Teacher: Go on.\nS: I go home.\nStudent: Yes.");
        let texts: Vec<&str> = extraction.utterances.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["I go home.", "Yes."]);
    }
}
