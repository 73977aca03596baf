//! Error type shared by every fallible operation of the crate.

use thiserror::Error;

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, TinyLlmError>;

#[derive(Error, Debug)]
pub enum TinyLlmError {
	/// Temperature must be a finite, strictly positive number.
	#[error("temperature must be a positive number, got {0}")]
	InvalidTemperature(f64),

	/// Requested generation length exceeds the supported bound.
	#[error("max_tokens must be at most {limit}, got {requested}")]
	MaxTokensOutOfRange { requested: usize, limit: usize },

	/// A corpus path could not be interpreted.
	#[error("invalid path: {0}")]
	InvalidPath(String),

	/// Reading a corpus file failed.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl TinyLlmError {
	/// Returns `true` for errors caused by caller input rather than the environment.
	pub fn is_usage_error(&self) -> bool {
		matches!(
			self,
			Self::InvalidTemperature(_) | Self::MaxTokensOutOfRange { .. } | Self::InvalidPath(_)
		)
	}
}
