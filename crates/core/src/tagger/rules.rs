//! Rule-based fallback tagger
//!
//! Closed word lists, suffix heuristics and one token of left context. Emits
//! a representative Penn Treebank tag for each class so downstream code sees
//! the same tag vocabulary as with a statistical tagger.

use super::PosTagger;
use crate::error::Result;
use crate::tokenizers::is_terminal_text;

/// Heuristic tagger used when no statistical resource is available
#[derive(Debug, Clone, Default)]
pub struct RuleBasedTagger;

impl RuleBasedTagger {
    pub fn new() -> Self {
        Self
    }

    /// Tag a token sequence
    pub fn tag_tokens(&self, tokens: &[&str]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(tokens.len());
        let mut prev_word: Option<String> = None;

        for token in tokens {
            let word = token.to_lowercase();
            let prev_tag = tags.last().map(String::as_str);
            let tag = tag_word(&word, prev_word.as_deref(), prev_tag);
            tags.push(tag.to_string());
            prev_word = Some(word);
        }

        tags
    }
}

impl PosTagger for RuleBasedTagger {
    fn tag(&self, tokens: &[&str]) -> Result<Vec<String>> {
        Ok(self.tag_tokens(tokens))
    }

    fn name(&self) -> &str {
        "rule_based"
    }

    fn is_degraded(&self) -> bool {
        true
    }
}

fn tag_word(word: &str, prev_word: Option<&str>, prev_tag: Option<&str>) -> &'static str {
    let Some(first) = word.chars().next() else {
        return "SYM";
    };

    let is_clitic = first == '\'' && word.len() > 1;
    if !first.is_alphanumeric() && !is_clitic {
        return punctuation_tag(word);
    }
    if first.is_numeric() {
        return "CD";
    }
    if let Some(tag) = closed_class_tag(word) {
        return tag;
    }
    open_class_tag(word, prev_word, prev_tag)
}

fn punctuation_tag(token: &str) -> &'static str {
    match token {
        "," => ",",
        ";" | ":" | "-" | "--" | "..." | "\u{2026}" => ":",
        "(" | "[" | "{" | "<" => "(",
        ")" | "]" | "}" | ">" => ")",
        "\"" | "'" | "`" | "``" | "''" | "\u{201C}" | "\u{201D}" => "''",
        "$" => "$",
        "#" => "#",
        t if is_terminal_text(t) => ".",
        _ => "SYM",
    }
}

fn closed_class_tag(word: &str) -> Option<&'static str> {
    let tag = match word {
        "the" | "a" | "an" | "this" | "these" | "those" | "every" | "each" | "some" | "any"
        | "no" | "another" | "all" | "both" | "either" | "neither" => "DT",

        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "her" | "us"
        | "them" | "myself" | "yourself" | "itself" | "ourselves" | "themselves" => "PRP",

        "my" | "your" | "his" | "its" | "our" | "their" => "PRP$",

        "who" | "whom" | "what" => "WP",
        "whose" => "WP$",
        "which" => "WDT",
        "when" | "where" | "why" | "how" => "WRB",

        "and" | "but" | "or" | "nor" | "yet" => "CC",

        "of" | "in" | "on" | "at" | "by" | "for" | "with" | "about" | "against" | "between"
        | "into" | "through" | "during" | "before" | "after" | "above" | "below" | "from"
        | "over" | "under" | "since" | "because" | "although" | "though" | "while" | "if"
        | "unless" | "until" | "as" | "than" | "whether" | "that" | "like" | "without"
        | "near" | "per" | "via" => "IN",

        "to" => "TO",
        "there" => "EX",

        "can" | "could" | "will" | "would" | "shall" | "should" | "may" | "might" | "must"
        | "ca" | "wo" | "'ll" | "'d" => "MD",

        "be" | "do" | "have" | "go" | "get" | "make" | "take" | "see" | "know" | "think"
        | "want" | "need" | "come" | "give" | "say" | "tell" | "find" | "look" | "let" => "VB",
        "am" | "are" | "'m" | "'re" | "'ve" => "VBP",
        "is" | "'s" | "has" | "does" | "says" | "goes" | "gets" => "VBZ",
        "was" | "were" | "had" | "did" | "said" | "went" | "got" | "made" | "took" | "saw"
        | "knew" | "thought" | "came" | "gave" | "told" | "found" => "VBD",
        "been" | "done" | "gone" | "seen" | "known" | "taken" | "given" => "VBN",
        "being" | "having" | "doing" | "going" => "VBG",

        "not" | "n't" | "very" | "really" | "also" | "just" | "too" | "so" | "now" | "then"
        | "here" | "always" | "never" | "often" | "sometimes" | "maybe" | "still"
        | "already" | "soon" | "again" | "well" | "quite" | "only" | "even" | "ever"
        | "together" | "perhaps" | "almost" => "RB",
        "more" | "less" => "RBR",
        "most" | "least" => "RBS",

        "good" | "bad" | "big" | "small" | "new" | "old" | "great" | "little" | "large"
        | "nice" | "happy" | "sure" | "possible" | "long" | "short" | "high" | "low"
        | "cheap" | "expensive" | "quiet" | "right" | "wrong" | "few" | "many" | "much"
        | "other" | "same" | "different" | "next" | "last" | "own" => "JJ",
        "better" | "worse" | "bigger" | "smaller" | "larger" | "cheaper" => "JJR",
        "best" | "worst" | "biggest" | "cheapest" => "JJS",

        "hello" | "hi" | "yes" | "yeah" | "okay" | "ok" | "oh" | "please" | "um" | "uh"
        | "wow" | "thanks" | "bye" => "UH",

        "one" | "two" | "three" | "four" | "five" | "six" | "seven" | "eight" | "nine"
        | "ten" | "hundred" | "thousand" => "CD",

        _ => return None,
    };
    Some(tag)
}

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "al", "ic", "less", "ish", "ary",
];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ship", "ance", "ence", "ism", "ist", "er", "or",
];

const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];

fn has_suffix(word: &str, suffix: &str) -> bool {
    word.len() > suffix.len() + 2 && word.ends_with(suffix)
}

fn open_class_tag(word: &str, prev_word: Option<&str>, prev_tag: Option<&str>) -> &'static str {
    // Base form after infinitival `to` or a modal
    if matches!(prev_tag, Some("TO") | Some("MD")) {
        return "VB";
    }

    if has_suffix(word, "ly") {
        return "RB";
    }
    if has_suffix(word, "ing") {
        return "VBG";
    }
    if has_suffix(word, "ed") {
        return "VBD";
    }

    // Finite verb right after a subject pronoun
    if prev_word.is_some_and(|w| SUBJECT_PRONOUNS.contains(&w)) {
        return if word.ends_with('s') && !word.ends_with("ss") {
            "VBZ"
        } else {
            "VBP"
        };
    }

    if ADJECTIVE_SUFFIXES.iter().any(|s| has_suffix(word, s)) {
        return "JJ";
    }
    if NOUN_SUFFIXES.iter().any(|s| has_suffix(word, s)) {
        return "NN";
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return "NNS";
    }

    "NN"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::WordClass;

    fn tag(tokens: &[&str]) -> Vec<String> {
        RuleBasedTagger::new().tag_tokens(tokens)
    }

    fn classes(tokens: &[&str]) -> Vec<WordClass> {
        tag(tokens).iter().map(|t| WordClass::from_tag(t)).collect()
    }

    #[test]
    fn test_simple_request() {
        assert_eq!(
            tag(&["hello", ",", "i", "want", "to", "rent", "an", "apartment", "."]),
            vec!["UH", ",", "PRP", "VB", "TO", "VB", "DT", "NN", "."]
        );
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(
            classes(&["quickly", "running", "painted", "dangerous", "information", "rooms"]),
            vec![
                WordClass::Adverb,
                WordClass::Verb,
                WordClass::Verb,
                WordClass::Adjective,
                WordClass::Noun,
                WordClass::Noun,
            ]
        );
    }

    #[test]
    fn test_pronoun_context_marks_finite_verb() {
        assert_eq!(tag(&["they", "rent"]), vec!["PRP", "VBP"]);
        assert_eq!(tag(&["it", "costs", "money"]), vec!["PRP", "VBZ", "NN"]);
        assert_eq!(tag(&["my", "rent"]), vec!["PRP$", "NN"]);
    }

    #[test]
    fn test_modal_context() {
        assert_eq!(tag(&["we", "could", "visit"]), vec!["PRP", "MD", "VB"]);
    }

    #[test]
    fn test_subordinators_are_conjunctions() {
        for word in ["because", "although", "if", "that"] {
            assert_eq!(classes(&[word]), vec![WordClass::Conjunction]);
        }
        assert_eq!(tag(&["who"]), vec!["WP"]);
    }

    #[test]
    fn test_numbers_and_punctuation() {
        assert_eq!(tag(&["2", "?", "...", "(", "\""]), vec!["CD", ".", ":", "(", "''"]);
    }

    #[test]
    fn test_always_degraded() {
        let tagger = RuleBasedTagger::new();
        assert!(tagger.is_degraded());
        assert_eq!(tagger.name(), "rule_based");
    }
}
