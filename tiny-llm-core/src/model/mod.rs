//! Top-level module for the character bigram language model.
//!
//! This module provides:
//! - Character tokenization and the fallback token (`tokenizer`)
//! - Bigram count accumulation (`BigramTable`, `Bucket`)
//! - The immutable model aggregate (`TinyLlmModel`)
//! - Next-token ranking (`rank_next_tokens`)
//! - Temperature-controlled autoregressive generation (`generate_text`)

/// Character tokenizer and the `FALLBACK_CHAR` sentinel.
pub mod tokenizer;

/// Follower counts for a single preceding token.
///
/// Keeps followers in first-observed order for deterministic reads.
pub mod bucket;

/// Bigram table built from a token sequence in one linear pass.
pub mod bigram_table;

/// Corpus, vocabulary and bigram table as one immutable value.
///
/// Provides `build_model` and `merge_corpus`.
pub mod tiny_llm_model;

/// Top-K next-token ranking.
pub mod ranker;

/// Autoregressive sampling with temperature reshaping.
pub mod generator;

/// Generation parameters, their defaults and validation.
pub mod generation_options;

/// Uniform draw sources (seeded, thread-local, scripted).
pub mod random;
