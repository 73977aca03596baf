use std::env;
use std::path::PathBuf;

use tiny_llm_core::io::normalize_folder;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_FOLDER: &str = "./data";

/// Server settings, read from `TINY_LLM_*` environment variables.
///
/// - `TINY_LLM_HOST`: bind address (default `127.0.0.1`)
/// - `TINY_LLM_PORT`: bind port (default `5000`)
/// - `TINY_LLM_DATA`: folder of extra `.txt` training files (default `./data`)
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	pub data_folder: PathBuf,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_owned(),
			port: DEFAULT_PORT,
			data_folder: PathBuf::from(DEFAULT_DATA_FOLDER),
		}
	}
}

impl ServerConfig {
	pub fn from_env() -> Self {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the config from an arbitrary variable lookup.
	///
	/// Blank values are ignored; an unparsable port falls back to the default
	/// with a warning.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
		let mut config = Self::default();

		if let Some(host) = get("TINY_LLM_HOST") {
			config.host = host;
		}

		if let Some(port) = get("TINY_LLM_PORT") {
			match port.parse::<u16>() {
				Ok(port) => config.port = port,
				Err(_) => log::warn!("ignoring invalid TINY_LLM_PORT={port:?}, using {DEFAULT_PORT}"),
			}
		}

		if let Some(folder) = get("TINY_LLM_DATA") {
			config.data_folder = normalize_folder(&folder);
		}

		config
	}
}
