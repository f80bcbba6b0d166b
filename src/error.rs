//! Error types for the menu server.
//!
//! The taxonomy mirrors the failure surface of the menu pipeline: the
//! catalog document may be absent or malformed, the media directory may be
//! unlistable, and the boot-script template may be missing or broken.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the menu synthesis pipeline.
#[derive(Debug, Error)]
pub enum MenuError {
	/// The catalog document does not exist at the configured path.
	#[error("catalog {} does not exist", path.display())]
	CatalogNotFound {
		/// Configured catalog path.
		path: PathBuf,
	},

	/// The catalog document exists but is not valid JSON.
	#[error("catalog {} could not be parsed: {source}", path.display())]
	CatalogParse {
		/// Configured catalog path.
		path: PathBuf,
		/// Underlying JSON error.
		source: serde_json::Error,
	},

	/// The media directory could not be listed.
	#[error("media directory {} could not be listed: {source}", path.display())]
	MediaUnavailable {
		/// Configured media directory.
		path: PathBuf,
		/// Underlying I/O error.
		source: std::io::Error,
	},

	/// The boot-script template could not be loaded.
	#[error("boot script template {} could not be loaded: {source}", path.display())]
	TemplateMissing {
		/// Configured template path.
		path: PathBuf,
		/// Underlying template engine error.
		source: tera::Error,
	},

	/// Template substitution failed at render time.
	#[error("boot script rendering failed: {0}")]
	Render(#[from] tera::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MenuError>;
