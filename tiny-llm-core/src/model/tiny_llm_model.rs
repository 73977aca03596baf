use std::collections::HashSet;

use super::bigram_table::BigramTable;
use super::bucket::Bucket;
use super::tokenizer::{detokenize, tokenize};

/// The character-level bigram language model.
///
/// This struct owns:
/// - `corpus`: the ordered token sequence of all training text seen so far.
/// - `vocabulary`: the distinct tokens of `corpus`, in first-observed order.
/// - `bigrams`: follower counts for every token that opens a pair.
///
/// A model is immutable once built. Adding training text goes through
/// `merge`, which re-derives a whole new model from the concatenated
/// corpus, so `bigrams` and `vocabulary` can never drift from `corpus`.
/// Callers can keep querying an older model while a new one is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TinyLlmModel {
	corpus: Vec<char>,
	vocabulary: Vec<char>,
	bigrams: BigramTable,
}

impl TinyLlmModel {
	/// Builds a model from raw training text.
	///
	/// Empty text yields an empty corpus, vocabulary and table.
	pub fn build(text: &str) -> Self {
		Self::from_tokens(tokenize(text))
	}

	/// Builds a model from an already tokenized corpus.
	pub fn from_tokens(corpus: Vec<char>) -> Self {
		let mut seen = HashSet::new();
		let vocabulary: Vec<char> = corpus.iter().copied().filter(|token| seen.insert(*token)).collect();
		let bigrams = BigramTable::from_tokens(&corpus);

		log::debug!(
			"built model: {} tokens, {} vocabulary entries, {} contexts",
			corpus.len(),
			vocabulary.len(),
			bigrams.contexts().len()
		);

		Self { corpus, vocabulary, bigrams }
	}

	/// Builds a new model from `corpus` followed directly by `additional_text`.
	///
	/// # Behavior
	/// - The splice is a plain concatenation: the last token of `corpus` and the
	///   first token of `additional_text` form a regular pair.
	/// - The whole result is re-tokenized and re-counted.
	pub fn merge(corpus: &[char], additional_text: &str) -> Self {
		let mut text = detokenize(corpus);
		text.push_str(additional_text);
		log::debug!("merging {} new characters into a corpus of {} tokens", additional_text.chars().count(), corpus.len());
		Self::build(&text)
	}

	/// Builds a new model extending this one with `additional_text`.
	///
	/// `self` is left untouched.
	pub fn extended(&self, additional_text: &str) -> Self {
		Self::merge(&self.corpus, additional_text)
	}

	/// Ordered token sequence.
	pub fn corpus(&self) -> &[char] {
		&self.corpus
	}

	/// The corpus joined back into text.
	pub fn corpus_text(&self) -> String {
		detokenize(&self.corpus)
	}

	/// Distinct tokens in first-observed order.
	pub fn vocabulary(&self) -> &[char] {
		&self.vocabulary
	}

	pub fn bigrams(&self) -> &BigramTable {
		&self.bigrams
	}

	pub fn token_count(&self) -> usize {
		self.corpus.len()
	}

	pub fn vocabulary_size(&self) -> usize {
		self.vocabulary.len()
	}

	/// Follower counts of `context`, if it opens at least one pair.
	pub fn followers(&self, context: char) -> Option<&Bucket> {
		self.bigrams.followers(context)
	}

	/// Full, untruncated next-token distribution for `context`.
	///
	/// Returns an empty vector if `context` has no observed follower.
	pub fn probabilities(&self, context: char) -> Vec<(char, f64)> {
		self.followers(context).map(Bucket::probabilities).unwrap_or_default()
	}
}

/// Builds a model from `corpus_text`. See `TinyLlmModel::build`.
pub fn build_model(corpus_text: &str) -> TinyLlmModel {
	TinyLlmModel::build(corpus_text)
}

/// Builds a new model from `existing_corpus` followed by `additional_text`.
/// See `TinyLlmModel::merge`.
pub fn merge_corpus(existing_corpus: &[char], additional_text: &str) -> TinyLlmModel {
	TinyLlmModel::merge(existing_corpus, additional_text)
}
