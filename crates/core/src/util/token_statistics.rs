/// Utility functions for word-class distributions
use crate::tagger::WordClass;
use crate::util::TaggedToken;
use std::collections::BTreeMap;

/// Count word tokens per coarse class; punctuation and clitics are skipped
pub fn word_class_distribution<'a, I>(tokens: I) -> BTreeMap<WordClass, usize>
where
    I: IntoIterator<Item = &'a TaggedToken>,
{
    let mut distribution = BTreeMap::new();
    for token in tokens {
        if token.is_word() {
            *distribution.entry(token.class).or_insert(0) += 1;
        }
    }
    distribution
}

/// Render a class distribution as "noun 3, verb 2", in class order
pub fn describe_distribution(distribution: &BTreeMap<WordClass, usize>) -> String {
    if distribution.is_empty() {
        return "none".to_string();
    }
    distribution
        .iter()
        .map(|(class, count)| format!("{} {}", class.label(), count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizers::Token;

    fn tokens() -> Vec<TaggedToken> {
        [
            ("we", "PRP"),
            ("need", "VBP"),
            ("two", "CD"),
            ("rooms", "NNS"),
            ("'s", "POS"),
            (".", "."),
        ]
        .into_iter()
        .map(|(text, tag)| TaggedToken::new(Token::new(text), tag))
        .collect()
    }

    #[test]
    fn test_word_class_distribution() {
        let tokens = tokens();
        let distribution = word_class_distribution(&tokens);

        assert_eq!(distribution.get(&WordClass::Noun), Some(&1));
        assert_eq!(distribution.get(&WordClass::Verb), Some(&1));
        assert_eq!(distribution.get(&WordClass::Other), Some(&2));
        assert_eq!(distribution.get(&WordClass::Adverb), None);
    }

    #[test]
    fn test_describe_distribution() {
        let tokens = tokens();
        assert_eq!(
            describe_distribution(&word_class_distribution(&tokens)),
            "noun 1, verb 1, other 2"
        );
        assert_eq!(describe_distribution(&BTreeMap::new()), "none");
    }
}
