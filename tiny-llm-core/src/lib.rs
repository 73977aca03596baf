//! Character-level bigram text model.
//!
//! This crate provides a small statistical language model including:
//! - Character tokenization of training text
//! - Bigram frequency accumulation, rebuilt whole on every corpus change
//! - Top-K ranking of next-character probabilities
//! - Temperature-controlled generation, optionally seeded for determinism
//!
//! The caller-facing surface is four operations: `build_model`,
//! `merge_corpus`, `rank_next_tokens` and `generate_text`.

/// Core model, ranking and generation logic.
pub mod model;

/// Built-in training text.
pub mod corpus;

/// Error type and result alias.
pub mod error;

/// Corpus file helpers (reading training text from disk).
pub mod io;

pub use corpus::BASE_CORPUS;
pub use error::{Result, TinyLlmError};
pub use model::generation_options::{
	DEFAULT_MAX_TOKENS, DEFAULT_PROMPT, DEFAULT_TEMPERATURE, GenerationOptions, MAX_TOKENS_LIMIT, RANK_LIMIT,
};
pub use model::generator::{generate_text, generate_text_with};
pub use model::random::{FixedDraws, RandomSource, RngSource};
pub use model::ranker::{Candidate, rank_next_tokens};
pub use model::tiny_llm_model::{TinyLlmModel, build_model, merge_corpus};
pub use model::tokenizer::{FALLBACK_CHAR, FALLBACK_GLYPH, detokenize, display_token, tokenize};
