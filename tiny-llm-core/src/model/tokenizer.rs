/// Sentinel token used when no real context is available.
///
/// An empty prompt has no last character, so ranking and generation
/// substitute this token instead. It is an ordinary token everywhere else.
pub const FALLBACK_CHAR: char = ' ';

/// Visible placeholder glyph for `FALLBACK_CHAR`.
pub const FALLBACK_GLYPH: &str = "␠";

/// Splits `text` into character tokens.
///
/// Whitespace and punctuation are ordinary tokens and nothing is dropped,
/// so `detokenize(&tokenize(text)) == text` for every input.
pub fn tokenize(text: &str) -> Vec<char> {
	text.chars().collect()
}

/// Joins tokens back into text.
pub fn detokenize(tokens: &[char]) -> String {
	tokens.iter().collect()
}

/// Returns the last token of `text`, if any.
pub fn last_token(text: &str) -> Option<char> {
	text.chars().next_back()
}

/// Returns a printable representation of `token`.
///
/// `FALLBACK_CHAR` is rendered as `FALLBACK_GLYPH`, every other token as itself.
pub fn display_token(token: char) -> String {
	if token == FALLBACK_CHAR {
		FALLBACK_GLYPH.to_owned()
	} else {
		token.to_string()
	}
}
