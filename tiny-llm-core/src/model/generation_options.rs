use serde::{Deserialize, Serialize};

use crate::error::{Result, TinyLlmError};

/// Prompt used when the caller does not provide one.
pub const DEFAULT_PROMPT: &str = "once upon a time ";

/// Default number of generated tokens.
pub const DEFAULT_MAX_TOKENS: usize = 160;

/// Upper bound on the number of generated tokens per call.
pub const MAX_TOKENS_LIMIT: usize = 800;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.85;

/// Default number of ranked candidates.
pub const RANK_LIMIT: usize = 6;

/// Parameters of a `generate_text` call.
///
/// # Fields
/// - `max_tokens`: number of tokens to generate (at most `MAX_TOKENS_LIMIT`).
/// - `temperature`: sampling sharpness, strictly positive. Below 1 sharpens
///   toward the most frequent continuation, above 1 flattens toward uniform.
/// - `seed`: when set, generation is fully reproducible; when `None`, a
///   non-deterministic source is used.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GenerationOptions {
	pub max_tokens: usize,
	pub temperature: f64,
	pub seed: Option<u64>,
}

impl Default for GenerationOptions {
	fn default() -> Self {
		Self {
			max_tokens: DEFAULT_MAX_TOKENS,
			temperature: DEFAULT_TEMPERATURE,
			seed: None,
		}
	}
}

impl GenerationOptions {
	pub fn new(max_tokens: usize, temperature: f64, seed: Option<u64>) -> Self {
		Self { max_tokens, temperature, seed }
	}

	#[must_use]
	pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
		self.max_tokens = max_tokens;
		self
	}

	#[must_use]
	pub fn with_temperature(mut self, temperature: f64) -> Self {
		self.temperature = temperature;
		self
	}

	#[must_use]
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Checks the options without altering them.
	///
	/// # Errors
	/// - `InvalidTemperature` if `temperature` is not finite or `<= 0`.
	///   The value is never clamped.
	/// - `MaxTokensOutOfRange` if `max_tokens > MAX_TOKENS_LIMIT`.
	pub fn validate(&self) -> Result<()> {
		validate_temperature(self.temperature)?;
		validate_max_tokens(self.max_tokens)
	}
}

pub(crate) fn validate_max_tokens(max_tokens: usize) -> Result<()> {
	if max_tokens > MAX_TOKENS_LIMIT {
		return Err(TinyLlmError::MaxTokensOutOfRange {
			requested: max_tokens,
			limit: MAX_TOKENS_LIMIT,
		});
	}
	Ok(())
}

pub(crate) fn validate_temperature(temperature: f64) -> Result<()> {
	if !temperature.is_finite() || temperature <= 0.0 {
		return Err(TinyLlmError::InvalidTemperature(temperature));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		assert!(GenerationOptions::default().validate().is_ok());
	}

	#[test]
	fn rejects_non_positive_temperature() {
		for temperature in [0.0, -0.5, f64::NAN, f64::INFINITY] {
			let options = GenerationOptions::default().with_temperature(temperature);
			assert!(matches!(options.validate(), Err(TinyLlmError::InvalidTemperature(_))));
		}
	}

	#[test]
	fn rejects_too_many_tokens() {
		let options = GenerationOptions::default().with_max_tokens(MAX_TOKENS_LIMIT + 1);
		assert!(matches!(
			options.validate(),
			Err(TinyLlmError::MaxTokensOutOfRange { requested: 801, limit: 800 })
		));
		assert!(options.with_max_tokens(MAX_TOKENS_LIMIT).validate().is_ok());
	}
}
