//! Basic usage example of the lingo library

use lingo_core::report::{render_json, render_verbose};
use lingo_core::tokenizers::{Tokenizer, TreebankTokenizer};
use lingo_core::{AnalysisConfig, ComplexityEngine, TaggerHandle};

const LINE: &str = "----------------------------------------";

const TRANSCRIPT: &str = "\
Agent: Good afternoon! How can I help you today?
You: Hello, I want to rent an apartment.
Agent: Of course. How many bedrooms do you need?
You: Two bedrooms, because my sister is moving in with me.
Agent: Do you have a budget in mind?
You: I can't pay more than 1,200 dollars a month.
";

fn main() {
    println!("=== Lingo Complexity Examples ===\n");

    // Example 1: Tokenization
    example_tokenize();

    // Example 2: Verbose report with the rule-based tagger
    example_verbose();

    // Example 3: JSON summary with custom markers
    example_json();
}

fn example_tokenize() {
    println!("Example 1: Tokenization");
    println!("{}", LINE);

    let tokenizer = TreebankTokenizer::new();
    let tokens = tokenizer.tokenize("I can't pay more than 1,200 dollars... really!");
    for token in &tokens {
        println!("  {:<10} {:?}", token.text, token.kind);
    }
    println!("\n");
}

fn example_verbose() {
    println!("Example 2: Verbose Report");
    println!("{}", LINE);

    let tagger = TaggerHandle::rule_based(None);
    let engine = ComplexityEngine::with_tagger(AnalysisConfig::default(), &tagger);
    let report = engine.analyze(TRANSCRIPT);

    println!("{}", render_verbose(&report, 100));
    println!("\n");
}

fn example_json() {
    println!("Example 3: JSON Summary");
    println!("{}", LINE);

    let transcript =
        "Tutor: Tell me about your weekend.\nLearner: I went hiking when it stopped raining.";
    let config = AnalysisConfig::default().with_markers(["Learner:"]);
    let tagger = TaggerHandle::rule_based(None);
    let engine = ComplexityEngine::with_tagger(config, &tagger);
    let report = engine.analyze(transcript);

    match render_json(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to render report: {}", e),
    }
}
