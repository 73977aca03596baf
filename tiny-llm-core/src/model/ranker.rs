use serde::Serialize;

use super::tiny_llm_model::TinyLlmModel;
use super::tokenizer::{FALLBACK_CHAR, display_token, last_token};

/// A ranked next-token prediction.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Candidate {
	pub token: char,
	/// Normalized probability in `[0, 1]`.
	pub probability: f64,
}

impl Candidate {
	/// Printable form of the token (see `display_token`).
	pub fn display(&self) -> String {
		display_token(self.token)
	}
}

/// Resolves the context token used for ranking.
///
/// The last token of `prompt`, unless the prompt is empty or its last token
/// never opens a pair, in which case `FALLBACK_CHAR` is used.
pub(crate) fn ranking_context(model: &TinyLlmModel, prompt: &str) -> char {
	match last_token(prompt) {
		Some(token) if model.bigrams().contains(token) => token,
		_ => FALLBACK_CHAR,
	}
}

/// Returns the `limit` most probable next tokens after `prompt`.
///
/// # Behavior
/// - The context is resolved with `ranking_context`.
/// - Counts are normalized by the bucket total.
/// - Candidates are sorted by non-increasing probability. Ties keep the
///   first-observed order of the bucket (the sort is stable).
/// - Returns an empty vector when `limit` is 0 or the context has no followers.
///
/// # Notes
/// - Never mutates the model.
pub fn rank_next_tokens(model: &TinyLlmModel, prompt: &str, limit: usize) -> Vec<Candidate> {
	if limit == 0 {
		return Vec::new();
	}

	let context = ranking_context(model, prompt);
	let mut candidates: Vec<Candidate> = model
		.probabilities(context)
		.into_iter()
		.map(|(token, probability)| Candidate { token, probability })
		.collect();

	candidates.sort_by(|a, b| b.probability.total_cmp(&a.probability));
	candidates.truncate(limit);
	candidates
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn certain_continuation_has_probability_one() {
		let model = TinyLlmModel::build("ab ab ab");
		let candidates = rank_next_tokens(&model, "a", 5);
		assert_eq!(candidates, vec![Candidate { token: 'b', probability: 1.0 }]);
	}

	#[test]
	fn sorted_and_truncated() {
		let model = TinyLlmModel::build("xa xb xb xc xc xc");
		let candidates = rank_next_tokens(&model, "x", 2);

		assert_eq!(candidates.len(), 2);
		assert_eq!(candidates[0].token, 'c');
		assert_eq!(candidates[1].token, 'b');
		assert!(candidates[0].probability >= candidates[1].probability);
	}

	#[test]
	fn ties_follow_first_observed_order() {
		let model = TinyLlmModel::build("qz qy qx");
		let tokens: Vec<char> = rank_next_tokens(&model, "q", 3).iter().map(|c| c.token).collect();
		assert_eq!(tokens, vec!['z', 'y', 'x']);
	}

	#[test]
	fn zero_limit_is_empty() {
		let model = TinyLlmModel::build("ab ab");
		assert!(rank_next_tokens(&model, "a", 0).is_empty());
	}

	#[test]
	fn empty_prompt_uses_fallback_context() {
		let model = TinyLlmModel::build("a b a c");
		let from_empty = rank_next_tokens(&model, "", 5);
		let from_space = rank_next_tokens(&model, " ", 5);
		assert_eq!(from_empty, from_space);
		assert_eq!(from_empty.len(), 3);
	}

	#[test]
	fn unseen_context_falls_back_then_empties() {
		// 'z' is unseen, fallback ' ' has followers
		let model = TinyLlmModel::build("a b");
		assert_eq!(rank_next_tokens(&model, "z", 5), vec![Candidate { token: 'b', probability: 1.0 }]);

		// no fallback bucket either
		let model = TinyLlmModel::build("abc");
		assert!(rank_next_tokens(&model, "z", 5).is_empty());
		assert!(rank_next_tokens(&model, "", 5).is_empty());
	}

	#[test]
	fn empty_model_ranks_nothing() {
		let model = TinyLlmModel::build("");
		assert!(rank_next_tokens(&model, "anything", 3).is_empty());
	}
}
