//! Token types and statistics shared by the tagger, segmenter and metrics

pub mod tagged_token;
pub mod token_statistics;

pub use tagged_token::TaggedToken;
