use crate::tagger::WordClass;
use crate::tokenizers::{is_terminal_text, Token, TokenKind};
use serde::Serialize;

/// A token with its part-of-speech tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedToken {
    pub text: String,
    pub kind: TokenKind,
    pub tag: String, // Penn Treebank tag
    pub class: WordClass, // Coarse class derived from `tag`
}

impl TaggedToken {
    pub fn new(token: Token, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            class: WordClass::from_tag(&tag),
            text: token.text,
            kind: token.kind,
            tag,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn is_verb(&self) -> bool {
        self.class == WordClass::Verb
    }

    /// Nouns, verbs, adjectives and adverbs
    pub fn is_lexical(&self) -> bool {
        self.is_word() && self.class.is_lexical()
    }

    pub fn is_terminal(&self) -> bool {
        is_terminal_text(&self.text)
    }
}
