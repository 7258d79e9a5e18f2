//! Word tokenizers
//!
//! Provides the `Tokenizer` trait and the Penn-Treebank-style tokenizer the
//! metrics are calibrated against. The metrics are numerically sensitive to
//! tokenization, so the rules below are a fixed contract:
//!
//! 1. Text is lower-cased and split on whitespace.
//! 2. Punctuation `, ; : ! ? ( ) [ ] { } " < >` becomes separate tokens, except
//!    commas and colons between digits (`1,000`, `10:30`).
//! 3. Leading quotes and trailing quotes/periods are split off. Runs of three
//!    or more periods form one ellipsis token. A final period stays attached
//!    only to dotted abbreviations containing a letter (`e.g.`, `u.s.`);
//!    numbers always lose it (`3.5.` → `3.5 .`).
//! 4. Contractions are split: `n't`, `'s`, `'m`, `'d`, `'re`, `'ve`, `'ll`, plus
//!    `can't` → `ca n't`, `won't` → `wo n't`, `cannot` → `can not`,
//!    `gonna` → `gon na`, `wanna` → `wan na`, `gotta` → `got ta`.
//! 5. Hyphenated words are kept whole.
//!
//! A *word* is a token whose first character is alphabetic. Punctuation,
//! numbers and clitics such as `'s` stay in the token stream but are not words.

use serde::Serialize;

/// Coarse token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Word,
    Number,
    /// Contraction suffix starting with an apostrophe (`'s`, `'ll`)
    Clitic,
    Punctuation,
}

/// A single token in utterance order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = classify_token(&text);
        Self { text, kind }
    }

    /// Counted as a word for every metric
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Sentence-final punctuation (`.`, `?`, `!` and runs of them)
    pub fn is_terminal(&self) -> bool {
        is_terminal_text(&self.text)
    }
}

pub(crate) fn is_terminal_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| matches!(c, '.' | '?' | '!'))
}

/// Trait for tokenizers that split an utterance into tokens
pub trait Tokenizer: Send + Sync {
    /// Tokenize one utterance
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Get the name of this tokenizer
    fn name(&self) -> &str;

    /// Clone this tokenizer into a Box
    fn clone_box(&self) -> Box<dyn Tokenizer>;
}

// Implement Clone for Box<dyn Tokenizer>
impl Clone for Box<dyn Tokenizer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// ============================================================================
// Built-in Tokenizers
// ============================================================================

/// Penn-Treebank-style word tokenizer; always lower-cases
#[derive(Clone, Default)]
pub struct TreebankTokenizer;

impl TreebankTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for TreebankTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let text = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");

        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            for piece in split_separators(chunk) {
                match piece {
                    Piece::Separator(sep) => tokens.push(Token::new(sep)),
                    Piece::Word(word) => split_word(word, &mut tokens),
                }
            }
        }
        tokens
    }

    fn name(&self) -> &str {
        "treebank"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(self.clone())
    }
}

/// Character-run tokenizer: splits on whitespace and at every change between
/// letters, digits and punctuation. Does not split contractions.
#[derive(Clone)]
pub struct CharClassTokenizer {
    /// Whether to include punctuation as separate tokens
    pub include_punctuation: bool,
}

impl CharClassTokenizer {
    pub fn new() -> Self {
        Self {
            include_punctuation: true,
        }
    }

    pub fn with_punctuation(mut self, include: bool) -> Self {
        self.include_punctuation = include;
        self
    }
}

impl Default for CharClassTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for CharClassTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let text = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut current_start = 0;
        let mut current_type: Option<CharClass> = None;

        for (pos, ch) in text.char_indices() {
            let char_type = classify_char(ch);

            match current_type {
                Some(prev) if prev == char_type && prev != CharClass::Punctuation => {}
                Some(prev) => {
                    self.emit(&text[current_start..pos], prev, &mut tokens);
                    current_start = pos;
                    current_type = Some(char_type);
                }
                None => {
                    current_start = pos;
                    current_type = Some(char_type);
                }
            }
        }

        if let Some(prev) = current_type {
            self.emit(&text[current_start..], prev, &mut tokens);
        }

        tokens
    }

    fn name(&self) -> &str {
        "char_class"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(self.clone())
    }
}

impl CharClassTokenizer {
    fn emit(&self, text: &str, class: CharClass, tokens: &mut Vec<Token>) {
        match class {
            CharClass::Whitespace => {}
            CharClass::Punctuation if !self.include_punctuation => {}
            _ => tokens.push(Token::new(text)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Letter,
    Digit,
    Punctuation,
    Whitespace,
}

fn classify_char(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Whitespace
    } else if ch.is_alphabetic() || ch == '\'' || ch == '-' {
        CharClass::Letter
    } else if ch.is_numeric() {
        CharClass::Digit
    } else {
        CharClass::Punctuation
    }
}

fn classify_token(text: &str) -> TokenKind {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() => TokenKind::Word,
        Some(c) if c.is_numeric() => TokenKind::Number,
        Some('\'') if chars.next().is_some_and(|c| c.is_alphabetic()) => TokenKind::Clitic,
        _ => TokenKind::Punctuation,
    }
}

// ============================================================================
// Treebank rules
// ============================================================================

enum Piece<'a> {
    Separator(&'a str),
    Word(&'a str),
}

const SEPARATORS: &[char] = &[
    ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '<', '>', '\u{201C}', '\u{201D}',
    '\u{2026}',
];

/// Split a whitespace-free chunk at separator punctuation and ellipses
fn split_separators(chunk: &str) -> Vec<Piece<'_>> {
    let chars: Vec<(usize, char)> = chunk.char_indices().collect();
    let mut pieces = Vec::new();
    let mut word_start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, ch) = chars[i];

        let separator_len = if ch == '.' {
            let run = chars[i..].iter().take_while(|(_, c)| *c == '.').count();
            if run >= 3 {
                run
            } else {
                0
            }
        } else if SEPARATORS.contains(&ch) && !is_digit_joiner(&chars, i) {
            1
        } else {
            0
        };

        if separator_len == 0 {
            i += 1;
            continue;
        }

        if word_start < pos {
            pieces.push(Piece::Word(&chunk[word_start..pos]));
        }
        let end = chars
            .get(i + separator_len)
            .map(|(p, _)| *p)
            .unwrap_or(chunk.len());
        pieces.push(Piece::Separator(&chunk[pos..end]));
        word_start = end;
        i += separator_len;
    }

    if word_start < chunk.len() {
        pieces.push(Piece::Word(&chunk[word_start..]));
    }
    pieces
}

fn is_digit_joiner(chars: &[(usize, char)], i: usize) -> bool {
    if !matches!(chars[i].1, ',' | ':') || i == 0 {
        return false;
    }
    let before = chars[i - 1].1.is_ascii_digit();
    let after = chars.get(i + 1).is_some_and(|(_, c)| c.is_ascii_digit());
    before && after
}

/// Split quotes, final periods and contractions off a separator-free word
fn split_word(word: &str, tokens: &mut Vec<Token>) {
    let mut rest = word;

    while let Some(stripped) = rest.strip_prefix(['\'', '`']) {
        tokens.push(Token::new(&rest[..1]));
        rest = stripped;
    }

    let mut trailing = Vec::new();
    loop {
        if let Some(stripped) = rest.strip_suffix('\'') {
            if stripped.is_empty() {
                break;
            }
            trailing.push("'");
            rest = stripped;
        } else if let Some(stripped) = rest.strip_suffix('.') {
            if stripped.is_empty() || is_abbreviation(stripped) {
                break;
            }
            trailing.push(".");
            rest = stripped;
        } else {
            break;
        }
    }

    if !rest.is_empty() {
        for part in split_contraction(rest) {
            tokens.push(Token::new(part));
        }
    }

    for punct in trailing.into_iter().rev() {
        tokens.push(Token::new(punct));
    }
}

/// Dotted letters such as `e.g` or `u.s` keep their final period
fn is_abbreviation(stripped: &str) -> bool {
    stripped.contains('.') && stripped.chars().any(char::is_alphabetic)
}

const SPECIAL_SPLITS: &[(&str, usize)] = &[
    ("cannot", 3),
    ("gonna", 3),
    ("wanna", 3),
    ("gotta", 3),
    ("gimme", 3),
    ("lemme", 3),
];

const CLITICS: &[&str] = &["'s", "'m", "'d", "'re", "'ve", "'ll"];

fn split_contraction(word: &str) -> Vec<&str> {
    let lower = word.to_lowercase();

    if let Some((_, at)) = SPECIAL_SPLITS.iter().find(|(w, _)| *w == lower) {
        return vec![&word[..*at], &word[*at..]];
    }

    if lower.len() > 3 && lower.ends_with("n't") {
        let at = word.len() - 3;
        return vec![&word[..at], &word[at..]];
    }

    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) {
            let at = word.len() - clitic.len();
            return vec![&word[..at], &word[at..]];
        }
    }

    vec![word]
}
