//! Averaged perceptron tagger
//!
//! Inference over models in NLTK's `averaged_perceptron_tagger_eng` JSON
//! format: a weights file (feature → tag → weight), a tag dictionary for
//! unambiguous frequent words, and the list of tag classes. Feature templates
//! and word normalisation follow that model's training so the weights apply
//! unchanged.

use super::resource::ModelFiles;
use super::PosTagger;
use crate::error::{LingoError, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const START: [&str; 2] = ["-START-", "-START2-"];
const END: [&str; 2] = ["-END-", "-END2-"];

/// Feature → (tag → weight)
pub type Weights = HashMap<String, HashMap<String, f64>>;

/// Statistical tagger backed by an averaged perceptron model
#[derive(Debug, Clone)]
pub struct PerceptronTagger {
    weights: Weights,
    tagdict: HashMap<String, String>,
    classes: Vec<String>,
}

impl PerceptronTagger {
    /// Build a tagger from in-memory model parts
    pub fn from_parts(
        weights: Weights,
        tagdict: HashMap<String, String>,
        mut classes: Vec<String>,
    ) -> Result<Self> {
        if classes.is_empty() {
            return Err(LingoError::Resource("perceptron model has no classes".into()));
        }
        classes.sort();
        classes.dedup();
        Ok(Self {
            weights,
            tagdict,
            classes,
        })
    }

    /// Load a model from its three JSON files
    pub fn load(files: &ModelFiles) -> Result<Self> {
        let weights: Weights = read_json(&files.weights)?;
        let tagdict: HashMap<String, String> = read_json(&files.tagdict)?;
        let classes: Vec<String> = read_json(&files.classes)?;

        tracing::debug!(
            features = weights.len(),
            tagdict = tagdict.len(),
            classes = classes.len(),
            "loaded perceptron model"
        );

        Self::from_parts(weights, tagdict, classes)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Tag a token sequence
    pub fn tag_tokens(&self, tokens: &[&str]) -> Vec<String> {
        let context: Vec<String> = START
            .iter()
            .map(|s| s.to_string())
            .chain(tokens.iter().map(|w| normalize(w)))
            .chain(END.iter().map(|s| s.to_string()))
            .collect();

        let mut prev = START[0].to_string();
        let mut prev2 = START[1].to_string();
        let mut output = Vec::with_capacity(tokens.len());

        for (i, word) in tokens.iter().enumerate() {
            let tag = match self.tagdict.get(*word) {
                Some(tag) => tag.clone(),
                None => {
                    let features = features(i, word, &context, &prev, &prev2);
                    self.predict(&features)
                }
            };
            prev2 = std::mem::replace(&mut prev, tag.clone());
            output.push(tag);
        }

        output
    }

    /// Highest-scoring class; ties go to the greatest label
    fn predict(&self, features: &[String]) -> String {
        let mut scores: HashMap<&str, f64> = HashMap::new();
        for feature in features {
            if let Some(weights) = self.weights.get(feature) {
                for (label, weight) in weights {
                    *scores.entry(label.as_str()).or_insert(0.0) += weight;
                }
            }
        }

        let score = |label: &str| scores.get(label).copied().unwrap_or(0.0);
        self.classes
            .iter()
            .max_by(|a, b| score(a).total_cmp(&score(b)).then_with(|| a.cmp(b)))
            .cloned()
            .unwrap_or_default()
    }
}

impl PosTagger for PerceptronTagger {
    fn tag(&self, tokens: &[&str]) -> Result<Vec<String>> {
        Ok(self.tag_tokens(tokens))
    }

    fn name(&self) -> &str {
        "perceptron"
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        LingoError::Resource(format!("cannot open {}: {}", path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LingoError::CorruptModel {
        path: path.to_path_buf(),
        source,
    })
}

/// Normalisation applied to context words
fn normalize(word: &str) -> String {
    let first = word.chars().next();
    if word.contains('-') && first != Some('-') {
        "!HYPHEN".to_string()
    } else if word.chars().count() == 4 && word.chars().all(|c| c.is_ascii_digit()) {
        "!YEAR".to_string()
    } else if first.is_some_and(|c| c.is_ascii_digit()) {
        "!DIGITS".to_string()
    } else {
        word.to_lowercase()
    }
}

fn suffix(word: &str, n: usize) -> &str {
    let count = word.chars().count();
    if count <= n {
        return word;
    }
    let start = word
        .char_indices()
        .nth(count - n)
        .map(|(pos, _)| pos)
        .unwrap_or(0);
    &word[start..]
}

/// Feature strings for position `i`; `context` is padded with two start and
/// two end markers
fn features(i: usize, word: &str, context: &[String], prev: &str, prev2: &str) -> Vec<String> {
    let i = i + START.len();
    let first = word.chars().next().map(String::from).unwrap_or_default();

    vec![
        "bias".to_string(),
        format!("i suffix {}", suffix(word, 3)),
        format!("i pref1 {}", first),
        format!("i-1 tag {}", prev),
        format!("i-2 tag {}", prev2),
        format!("i tag+i-2 tag {} {}", prev, prev2),
        format!("i word {}", context[i]),
        format!("i-1 tag+i word {} {}", prev, context[i]),
        format!("i-1 word {}", context[i - 1]),
        format!("i-1 suffix {}", suffix(&context[i - 1], 3)),
        format!("i-2 word {}", context[i - 2]),
        format!("i+1 word {}", context[i + 1]),
        format!("i+1 suffix {}", suffix(&context[i + 1], 3)),
        format!("i+2 word {}", context[i + 2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(entries: &[(&str, &[(&str, f64)])]) -> Weights {
        entries
            .iter()
            .map(|(feature, labels)| {
                (
                    feature.to_string(),
                    labels.iter().map(|(l, w)| (l.to_string(), *w)).collect(),
                )
            })
            .collect()
    }

    fn classes(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("two-bedroom"), "!HYPHEN");
        assert_eq!(normalize("-ish"), "-ish");
        assert_eq!(normalize("1999"), "!YEAR");
        assert_eq!(normalize("12"), "!DIGITS");
        assert_eq!(normalize("3.5"), "!DIGITS");
        assert_eq!(normalize("Rent"), "rent");
    }

    #[test]
    fn test_suffix_is_char_based() {
        assert_eq!(suffix("apartment", 3), "ent");
        assert_eq!(suffix("an", 3), "an");
        assert_eq!(suffix("café", 3), "afé");
    }

    #[test]
    fn test_feature_templates() {
        let context: Vec<String> = ["-START-", "-START2-", "i", "rent", "-END-", "-END2-"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let feats = features(1, "rent", &context, "PRP", "-START-");

        assert_eq!(feats[0], "bias");
        assert!(feats.contains(&"i suffix ent".to_string()));
        assert!(feats.contains(&"i pref1 r".to_string()));
        assert!(feats.contains(&"i tag+i-2 tag PRP -START-".to_string()));
        assert!(feats.contains(&"i-1 tag+i word PRP rent".to_string()));
        assert!(feats.contains(&"i-1 word i".to_string()));
        assert!(feats.contains(&"i+1 word -END-".to_string()));
        assert!(feats.contains(&"i+2 word -END2-".to_string()));
    }

    #[test]
    fn test_tagdict_short_circuits_weights() {
        let tagger = PerceptronTagger::from_parts(
            weights(&[("bias", &[("NN", 5.0)])]),
            [("the".to_string(), "DT".to_string())].into_iter().collect(),
            classes(&["DT", "NN"]),
        )
        .unwrap();

        assert_eq!(tagger.tag_tokens(&["the", "flat"]), vec!["DT", "NN"]);
    }

    #[test]
    fn test_previous_tag_feature_drives_prediction() {
        let tagger = PerceptronTagger::from_parts(
            weights(&[
                ("bias", &[("NN", 1.0)]),
                ("i-1 tag PRP", &[("VBP", 2.0)]),
            ]),
            [("i".to_string(), "PRP".to_string())].into_iter().collect(),
            classes(&["NN", "PRP", "VBP"]),
        )
        .unwrap();

        assert_eq!(tagger.tag_tokens(&["i", "rent", "flats"]), vec!["PRP", "VBP", "NN"]);
    }

    #[test]
    fn test_ties_go_to_greatest_label() {
        let tagger = PerceptronTagger::from_parts(
            Weights::new(),
            HashMap::new(),
            classes(&["NN", "JJ", "VB"]),
        )
        .unwrap();

        assert_eq!(tagger.tag_tokens(&["word"]), vec!["VB"]);
    }

    #[test]
    fn test_empty_classes_rejected() {
        let result = PerceptronTagger::from_parts(Weights::new(), HashMap::new(), Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = ModelFiles::in_dir(dir.path());
        std::fs::write(&files.weights, r#"{"bias": {"NN": 1.0}}"#).unwrap();
        std::fs::write(&files.tagdict, r#"{"a": "DT"}"#).unwrap();
        std::fs::write(&files.classes, r#"["DT", "NN"]"#).unwrap();

        let tagger = PerceptronTagger::load(&files).unwrap();
        assert_eq!(tagger.classes(), &["DT".to_string(), "NN".to_string()]);
        assert_eq!(tagger.tag_tokens(&["a", "flat"]), vec!["DT", "NN"]);
    }

    #[test]
    fn test_corrupt_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = ModelFiles::in_dir(dir.path());
        std::fs::write(&files.weights, "{not json").unwrap();
        std::fs::write(&files.tagdict, "{}").unwrap();
        std::fs::write(&files.classes, "[]").unwrap();

        let err = PerceptronTagger::load(&files).unwrap_err();
        assert!(matches!(err, LingoError::CorruptModel { .. }));
        assert!(err.is_recoverable());
    }
}
