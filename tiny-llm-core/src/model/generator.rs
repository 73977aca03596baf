use crate::error::Result;
use crate::model::generation_options::{GenerationOptions, validate_max_tokens, validate_temperature};
use crate::model::random::{RandomSource, RngSource};
use crate::model::tiny_llm_model::TinyLlmModel;
use crate::model::tokenizer::{FALLBACK_CHAR, last_token};

/// Generates text autoregressively from `prompt`.
///
/// # Parameters
/// - `options`: number of tokens, temperature and optional seed.
///
/// # Returns
/// - `Ok(String)` with exactly `max_tokens` generated characters (the prompt
///   is not repeated), or an empty string if the vocabulary is empty.
/// - `Err(TinyLlmError)` if the options are invalid.
///
/// # Notes
/// - With `seed = Some(s)`, identical inputs always produce identical output.
/// - With `seed = None`, the thread-local generator is used.
pub fn generate_text(model: &TinyLlmModel, prompt: &str, options: &GenerationOptions) -> Result<String> {
	options.validate()?;
	match options.seed {
		Some(seed) => {
			let mut source = RngSource::seeded(seed);
			generate_text_with(model, prompt, options.max_tokens, options.temperature, &mut source)
		}
		None => {
			let mut source = RngSource::entropy();
			generate_text_with(model, prompt, options.max_tokens, options.temperature, &mut source)
		}
	}
}

/// Sampling loop shared by seeded, unseeded and scripted generation.
///
/// # Behavior
/// At each step:
/// - The context is the last generated token, starting from the last token
///   of `prompt` (`FALLBACK_CHAR` if the prompt is empty).
/// - The follower distribution of the context is used, or a uniform
///   distribution over the vocabulary if the context has no follower.
/// - The distribution is reshaped by `temperature`, then one token is drawn
///   from `source` and appended.
///
/// # Errors
/// Returns an error if `temperature` is not a finite positive number, or if
/// `max_tokens` exceeds `MAX_TOKENS_LIMIT`.
pub fn generate_text_with(
	model: &TinyLlmModel,
	prompt: &str,
	max_tokens: usize,
	temperature: f64,
	source: &mut dyn RandomSource,
) -> Result<String> {
	validate_temperature(temperature)?;
	validate_max_tokens(max_tokens)?;

	let mut output = String::new();
	if model.vocabulary().is_empty() {
		return Ok(output);
	}

	let mut context = last_token(prompt).unwrap_or(FALLBACK_CHAR);
	for step in 0..max_tokens {
		let distribution = apply_temperature(&next_distribution(model, context), temperature);
		let Some(token) = draw(&distribution, source.next_unit()) else {
			// Unreachable with a non-empty vocabulary
			break;
		};
		log::trace!("step {step}: {context:?} -> {token:?}");
		output.push(token);
		context = token;
	}

	Ok(output)
}

/// Next-token distribution for `context`.
///
/// Falls back to a uniform distribution over the vocabulary when `context`
/// has no observed follower, so generation never stalls.
fn next_distribution(model: &TinyLlmModel, context: char) -> Vec<(char, f64)> {
	let probabilities = model.probabilities(context);
	if !probabilities.is_empty() {
		return probabilities;
	}

	let vocabulary = model.vocabulary();
	let uniform = 1.0 / vocabulary.len() as f64;
	vocabulary.iter().map(|&token| (token, uniform)).collect()
}

/// Reshapes a distribution by `temperature`.
///
/// Each probability `p` becomes `p^(1/temperature)` and the result is
/// renormalized. Probabilities are first divided by the largest one (which
/// cancels out after renormalization) so the top entry stays at 1 and the
/// sum cannot underflow to 0 at low temperatures.
pub fn apply_temperature(distribution: &[(char, f64)], temperature: f64) -> Vec<(char, f64)> {
	let max = distribution.iter().map(|&(_, p)| p).fold(0.0, f64::max);
	if max <= 0.0 {
		return Vec::new();
	}

	let exponent = 1.0 / temperature;
	let weights: Vec<(char, f64)> = distribution
		.iter()
		.map(|&(token, p)| (token, (p / max).powf(exponent)))
		.collect();
	let sum: f64 = weights.iter().map(|&(_, w)| w).sum();

	weights.into_iter().map(|(token, w)| (token, w / sum)).collect()
}

/// Draws a token from a normalized distribution using `unit` in `[0, 1)`.
///
/// Walks the cumulative distribution and returns the first token whose
/// cumulative probability exceeds `unit`. Returns the last token if rounding
/// leaves the cumulative sum just below `unit`, and `None` if the
/// distribution is empty.
pub fn draw(distribution: &[(char, f64)], unit: f64) -> Option<char> {
	let mut cumulative = 0.0;
	for &(token, probability) in distribution {
		cumulative += probability;
		if unit < cumulative {
			return Some(token);
		}
	}

	// Fallback: rounding error on the last bucket
	distribution.last().map(|&(token, _)| token)
}
