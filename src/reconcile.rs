//! Catalog/media reconciliation.
//!
//! The catalog only declares what someone bothered to write down; the
//! media directory holds what is actually there. Reconciliation lists the
//! `.iso` files directly inside the media directory and appends every file
//! the catalog does not reference to a synthetic `"Other"` category, so
//! nothing on disk is invisible to the menu.

use crate::catalog::Catalog;
use crate::error::MenuError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Name of the synthetic category collecting untracked images.
pub const OTHER_CATEGORY: &str = "Other";

/// Extension of image files eligible for auto-discovery.
const IMAGE_EXTENSION: &str = "iso";

/// Merge on-disk image files into `catalog`.
///
/// Every `.iso` file directly inside `media_dir` whose base name is not
/// already referenced by some entry value (URLs count as references even
/// though they never match a local filename) is added to the `"Other"`
/// category under a `iso_<n>: <filename>` display name. Numbering is
/// 1-based and continues from the entries `"Other"` already held, so it is
/// only stable within a single pass. When nothing is untracked the catalog
/// is returned unmodified and no empty `"Other"` category is created.
///
/// Fails with [`MenuError::MediaUnavailable`] only when the directory
/// itself cannot be listed.
pub fn reconcile(mut catalog: Catalog, media_dir: &Path) -> crate::error::Result<Catalog> {
	let referenced: HashSet<&str> = catalog
		.categories
		.values()
		.flat_map(|entries| entries.values())
		.map(String::as_str)
		.collect();

	let mut untracked: Vec<String> = list_images(media_dir)?
		.into_iter()
		.filter(|name| !referenced.contains(name.as_str()))
		.collect();
	// Sorted so numbering does not depend on directory iteration order.
	untracked.sort();

	if !untracked.is_empty() {
		let other = catalog.categories.entry(OTHER_CATEGORY.to_string()).or_default();
		let offset = other.len();
		for (i, filename) in untracked.into_iter().enumerate() {
			other.insert(format!("iso_{}: {}", offset + i + 1, filename), filename);
		}
	}

	Ok(catalog)
}

/// List the base names of image files directly inside `media_dir`.
fn list_images(media_dir: &Path) -> crate::error::Result<Vec<String>> {
	let entries = fs::read_dir(media_dir).map_err(|source| MenuError::MediaUnavailable {
		path: media_dir.to_path_buf(),
		source,
	})?;

	let mut images = Vec::new();
	for entry in entries.flatten() {
		let path = entry.path();
		if !path.is_file() {
			continue;
		}
		if path.extension().and_then(|ext| ext.to_str()) != Some(IMAGE_EXTENSION) {
			continue;
		}
		if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
			images.push(name.to_string());
		}
	}
	Ok(images)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::Entries;
	use std::fs::File;
	use tempfile::TempDir;

	fn media_with(files: &[&str]) -> TempDir {
		let dir = TempDir::new().unwrap();
		for file in files {
			File::create(dir.path().join(file)).unwrap();
		}
		dir
	}

	fn catalog_with(category: &str, entries: &[(&str, &str)]) -> Catalog {
		let mut catalog = Catalog::default();
		let mapped: Entries = entries
			.iter()
			.map(|(name, target)| (name.to_string(), target.to_string()))
			.collect();
		catalog.categories.insert(category.to_string(), mapped);
		catalog
	}

	#[test]
	fn untracked_files_land_in_other() {
		let media = media_with(&["ubuntu.iso", "freebsd.iso"]);
		let catalog = catalog_with("Linux", &[("Ubuntu 22.04", "ubuntu.iso")]);

		let merged = reconcile(catalog, media.path()).unwrap();
		let other = &merged.categories[OTHER_CATEGORY];
		assert_eq!(other.len(), 1);
		assert_eq!(other.get("iso_1: freebsd.iso"), Some(&"freebsd.iso".to_string()));
	}

	#[test]
	fn fully_tracked_media_leaves_catalog_unmodified() {
		let media = media_with(&["ubuntu.iso"]);
		let catalog = catalog_with("Linux", &[("Ubuntu 22.04", "ubuntu.iso")]);

		let merged = reconcile(catalog.clone(), media.path()).unwrap();
		assert_eq!(merged, catalog);
		assert!(!merged.categories.contains_key(OTHER_CATEGORY));
	}

	#[test]
	fn every_file_is_referenced_exactly_once() {
		let media = media_with(&["a.iso", "b.iso", "c.iso"]);
		let catalog = catalog_with("Linux", &[("Alpha", "a.iso")]);

		let merged = reconcile(catalog, media.path()).unwrap();
		for file in ["a.iso", "b.iso", "c.iso"] {
			let count = merged
				.categories
				.values()
				.flat_map(|entries| entries.values())
				.filter(|target| target.as_str() == file)
				.count();
			assert_eq!(count, 1, "{file} referenced {count} times");
		}
	}

	#[test]
	fn numbering_continues_after_existing_other_entries() {
		let media = media_with(&["extra.iso", "tracked.iso"]);
		let catalog = catalog_with(OTHER_CATEGORY, &[("iso_1: tracked.iso", "tracked.iso")]);

		let merged = reconcile(catalog, media.path()).unwrap();
		let other = &merged.categories[OTHER_CATEGORY];
		assert_eq!(other.len(), 2);
		assert_eq!(other.get("iso_2: extra.iso"), Some(&"extra.iso".to_string()));
	}

	#[test]
	fn url_entries_count_as_references_but_never_match() {
		let media = media_with(&["netboot.iso"]);
		let catalog = catalog_with("Net", &[("Netboot", "http://example.com/netboot.iso")]);

		let merged = reconcile(catalog, media.path()).unwrap();
		// The local file has the same base name embedded in the URL but is
		// still untracked, because references are compared verbatim.
		assert_eq!(
			merged.categories[OTHER_CATEGORY].get("iso_1: netboot.iso"),
			Some(&"netboot.iso".to_string())
		);
	}

	#[test]
	fn non_iso_files_are_ignored() {
		let media = media_with(&["notes.txt", "vmlinuz"]);
		let catalog = Catalog::default();

		let merged = reconcile(catalog, media.path()).unwrap();
		assert!(merged.categories.is_empty());
	}

	#[test]
	fn missing_media_dir_is_media_unavailable() {
		let err = reconcile(Catalog::default(), Path::new("/nonexistent/mount")).unwrap_err();
		assert!(matches!(err, MenuError::MediaUnavailable { .. }));
	}
}
