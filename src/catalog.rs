//! Catalog document loading.
//!
//! The catalog is a JSON document describing categorized boot images:
//!
//! ```json
//! {
//!     "Categories": {
//!         "Linux": { "Ubuntu 22.04": "ubuntu.iso" }
//!     },
//!     "Memdisk": "memdisk.bin"
//! }
//! ```
//!
//! Category and entry order is preserved (document order drives menu
//! order), so the mappings are backed by [`IndexMap`]. Parsing is purely
//! syntactic: missing fields default to an empty mapping / disabled
//! memdisk, and unknown fields are ignored.

use crate::error::MenuError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Entries of a single category: display name -> filename or absolute URL.
pub type Entries = IndexMap<String, String>;

/// The declarative image catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
	/// Category name -> entries, in document order.
	#[serde(default, rename = "Categories")]
	pub categories: IndexMap<String, Entries>,

	/// Auxiliary disk-emulation image chained after an initrd-style boot.
	#[serde(default, rename = "Memdisk")]
	pub memdisk: Memdisk,
}

/// The `Memdisk` field: either an image filename or the `false` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Memdisk {
	/// Filename of the memdisk image, relative to the media root.
	Image(String),
	/// Boolean sentinel; the document writes `false` to disable memdisk.
	Disabled(bool),
}

impl Default for Memdisk {
	fn default() -> Self {
		Memdisk::Disabled(false)
	}
}

impl Memdisk {
	/// The configured image filename, if any.
	pub fn image(&self) -> Option<&str> {
		match self {
			Memdisk::Image(name) => Some(name),
			Memdisk::Disabled(_) => None,
		}
	}
}

impl Catalog {
	/// Load and parse the catalog document at `path`.
	///
	/// Fails with [`MenuError::CatalogNotFound`] when `path` is not an
	/// existing file and [`MenuError::CatalogParse`] when the content is
	/// not valid JSON. No validation beyond parsing is performed.
	pub fn load(path: &Path) -> crate::error::Result<Self> {
		if !path.is_file() {
			return Err(MenuError::CatalogNotFound {
				path: path.to_path_buf(),
			});
		}

		let raw = fs::read_to_string(path).map_err(|_| MenuError::CatalogNotFound {
			path: path.to_path_buf(),
		})?;

		serde_json::from_str(&raw).map_err(|source| MenuError::CatalogParse {
			path: path.to_path_buf(),
			source,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	fn write_catalog(content: &str) -> NamedTempFile {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	#[test]
	fn load_parses_categories_in_document_order() {
		let file = write_catalog(
			r#"{
				"Categories": {
					"Linux": { "Ubuntu 22.04": "ubuntu.iso", "Debian 12": "debian.iso" },
					"Tools": { "Memtest": "memtest.iso" }
				},
				"Memdisk": "memdisk.bin"
			}"#,
		);

		let catalog = Catalog::load(file.path()).unwrap();
		let names: Vec<_> = catalog.categories.keys().collect();
		assert_eq!(names, vec!["Linux", "Tools"]);
		assert_eq!(
			catalog.categories["Linux"].get("Ubuntu 22.04"),
			Some(&"ubuntu.iso".to_string())
		);
		assert_eq!(catalog.memdisk.image(), Some("memdisk.bin"));
	}

	#[test]
	fn load_defaults_missing_fields() {
		let file = write_catalog("{}");
		let catalog = Catalog::load(file.path()).unwrap();
		assert!(catalog.categories.is_empty());
		assert_eq!(catalog.memdisk, Memdisk::Disabled(false));
	}

	#[test]
	fn load_accepts_memdisk_false_sentinel() {
		let file = write_catalog(r#"{"Categories": {}, "Memdisk": false}"#);
		let catalog = Catalog::load(file.path()).unwrap();
		assert_eq!(catalog.memdisk.image(), None);
	}

	#[test]
	fn load_missing_file_is_not_found() {
		let err = Catalog::load(Path::new("/nonexistent/Images.json")).unwrap_err();
		assert!(matches!(err, MenuError::CatalogNotFound { .. }));
		assert!(err.to_string().contains("/nonexistent/Images.json"));
	}

	#[test]
	fn load_invalid_json_is_parse_error() {
		let file = write_catalog("{not json");
		let err = Catalog::load(file.path()).unwrap_err();
		assert!(matches!(err, MenuError::CatalogParse { .. }));
	}

	#[test]
	fn load_ignores_unknown_fields() {
		let file = write_catalog(r#"{"Categories": {}, "Memdisk": false, "Comment": "x"}"#);
		assert!(Catalog::load(file.path()).is_ok());
	}
}
