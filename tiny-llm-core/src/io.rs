use std::fs;
use std::path::{Path, PathBuf};
use std::{env, io};

use crate::error::{Result, TinyLlmError};

/// Reads a training text file into memory.
///
/// - Reads the entire file as UTF-8
/// - Line endings are kept as ordinary tokens
pub fn read_corpus_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let contents = fs::read_to_string(&filename)?;
	log::debug!("read {} bytes from {}", contents.len(), filename.as_ref().display());
	Ok(contents)
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Resolves a bare corpus name (`"fables"`) to a file inside `folder`.
///
/// # Errors
/// Returns `InvalidPath` if the name is empty or would escape `folder`.
pub fn corpus_path<P: AsRef<Path>>(folder: P, name: &str, extension: &str) -> Result<PathBuf> {
	let name = name.trim();
	if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
		return Err(TinyLlmError::InvalidPath(format!("invalid corpus name: {name:?}")));
	}

	let mut path = folder.as_ref().join(name);
	path.set_extension(extension);
	Ok(path)
}

/// Reads a named corpus from `folder` (see `corpus_path`).
pub fn read_named_corpus<P: AsRef<Path>>(folder: P, name: &str, extension: &str) -> Result<String> {
	let path = corpus_path(folder, name, extension)?;
	if !path.is_file() {
		return Err(TinyLlmError::Io(io::Error::new(
			io::ErrorKind::NotFound,
			format!("corpus not found: {}", path.display()),
		)));
	}
	read_corpus_file(path)
}
