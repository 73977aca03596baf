use super::bucket::Bucket;
use std::collections::HashMap;

/// Bigram frequency table for a character corpus.
///
/// The `BigramTable` maps each preceding token to the `Bucket` of tokens
/// observed immediately after it. Only raw counts are stored, the ranker
/// and the sampler normalize them lazily.
///
/// # Responsibilities
/// - Build the table from a token sequence in a single linear pass
/// - Expose per-context buckets for ranking and sampling
///
/// # Invariants
/// - `count(a, b)` equals the number of adjacent positions where `a` is
///   immediately followed by `b` in the source sequence
/// - The last token of the sequence never opens a pair
/// - Every context in `contexts` has a non-empty bucket
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BigramTable {
	/// Mapping from a preceding token to its follower counts
	buckets: HashMap<char, Bucket>,

	/// Contexts in first-observed order
	contexts: Vec<char>,
}

impl BigramTable {
	/// Builds the table from an ordered token sequence.
	///
	/// # Notes
	/// - Sequences shorter than 2 tokens produce an empty table.
	pub fn from_tokens(tokens: &[char]) -> Self {
		let mut table = Self::default();

		// For each adjacent pair in the sequence
		for pair in tokens.windows(2) {
			let (preceding, following) = (pair[0], pair[1]);
			table.bucket_mut(preceding).add_follower(following);
		}

		table
	}

	/// Returns the bucket for `preceding`, creating it if needed.
	fn bucket_mut(&mut self, preceding: char) -> &mut Bucket {
		if !self.buckets.contains_key(&preceding) {
			self.contexts.push(preceding);
		}
		self.buckets.entry(preceding).or_default()
	}

	/// Returns the follower counts observed after `preceding`.
	///
	/// Returns `None` if `preceding` never opens a pair.
	pub fn followers(&self, preceding: char) -> Option<&Bucket> {
		self.buckets.get(&preceding)
	}

	/// Returns `true` if `preceding` has at least one observed follower.
	pub fn contains(&self, preceding: char) -> bool {
		self.buckets.contains_key(&preceding)
	}

	/// Count for the pair `preceding -> following`.
	pub fn count(&self, preceding: char, following: char) -> usize {
		self.followers(preceding).map_or(0, |bucket| bucket.count(following))
	}

	/// Total number of pairs accumulated over all buckets.
	pub fn total_pairs(&self) -> usize {
		self.buckets.values().map(Bucket::total).sum()
	}

	/// Contexts in first-observed order.
	pub fn contexts(&self) -> &[char] {
		&self.contexts
	}

	pub fn is_empty(&self) -> bool {
		self.buckets.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chars(text: &str) -> Vec<char> {
		text.chars().collect()
	}

	#[test]
	fn counts_every_adjacent_pair() {
		let table = BigramTable::from_tokens(&chars("ab ab ab"));

		assert_eq!(table.count('a', 'b'), 3);
		assert_eq!(table.count('b', ' '), 2);
		assert_eq!(table.count(' ', 'a'), 2);
		assert_eq!(table.total_pairs(), 7);
		assert_eq!(table.contexts(), &['a', 'b', ' ']);
	}

	#[test]
	fn last_token_opens_no_pair() {
		let table = BigramTable::from_tokens(&chars("xyz"));

		assert!(table.contains('y'));
		assert!(!table.contains('z'));
		assert_eq!(table.total_pairs(), 2);
	}

	#[test]
	fn short_sequences_give_an_empty_table() {
		assert!(BigramTable::from_tokens(&[]).is_empty());
		assert!(BigramTable::from_tokens(&['a']).is_empty());
	}

	#[test]
	fn identical_sequences_give_identical_tables() {
		let tokens = chars("the cat sat on the mat");
		assert_eq!(BigramTable::from_tokens(&tokens), BigramTable::from_tokens(&tokens));
	}
}
