use std::collections::HashMap;

/// Counts of the tokens observed immediately after one preceding token.
///
/// A `Bucket` is the row of the bigram table for a single context token:
/// each entry says how often one character directly followed it.
///
/// ## Responsibilities:
/// - Accumulate follower occurrences during table construction
/// - Keep followers in first-observed order, so every read is deterministic
/// - Expose raw counts; normalization happens at query time
///
/// ## Invariants
/// - Each follower appears exactly once in `followers`
/// - Each follower count is strictly positive
/// - `index[token]` is the position of `token` in `followers`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
	/// Followers in first-observed order with their occurrence count.
	/// Example: [('e', 42), ('a', 3)]
	followers: Vec<(char, usize)>,
	/// Position of each follower in `followers`.
	index: HashMap<char, usize>,
	/// Sum of all follower counts.
	total: usize,
}

impl Bucket {
	/// Creates a new empty bucket.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of `next_token` after this bucket's context.
	///
	/// - If the follower already exists, its occurrence count is increased.
	/// - Otherwise, it is appended with an initial count of 1.
	pub fn add_follower(&mut self, next_token: char) {
		match self.index.get(&next_token) {
			Some(&position) => self.followers[position].1 += 1,
			None => {
				self.index.insert(next_token, self.followers.len());
				self.followers.push((next_token, 1));
			}
		}
		self.total += 1;
	}

	/// Returns the occurrence count of `token` in this bucket (0 if unseen).
	pub fn count(&self, token: char) -> usize {
		self.index.get(&token).map_or(0, |&position| self.followers[position].1)
	}

	/// Total number of observed pairs starting from this context.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of distinct followers.
	pub fn len(&self) -> usize {
		self.followers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.followers.is_empty()
	}

	/// Iterates over `(follower, count)` in first-observed order.
	pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
		self.followers.iter().copied()
	}

	/// Converts counts to probabilities, in first-observed order.
	///
	/// Returns an empty vector if the bucket has no followers.
	pub fn probabilities(&self) -> Vec<(char, f64)> {
		if self.total == 0 {
			return Vec::new();
		}
		let total = self.total as f64;
		self.followers
			.iter()
			.map(|&(token, occurrence)| (token, occurrence as f64 / total))
			.collect()
	}
}
