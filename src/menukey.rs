//! Menu key derivation.

/// Derive a script-safe menu key from a display name.
///
/// Alphanumeric characters are lowercased, everything else becomes a
/// hyphen, and leading/trailing hyphens are trimmed. The key doubles as
/// the iPXE jump label for the entry's boot section. Collisions between
/// distinct display names are accepted; keys are shortcuts and labels,
/// not identifiers. Punctuation-only names yield the empty string.
///
/// # Examples
///
/// ```
/// use ipxe_menu_server::menukey::derive_key;
///
/// assert_eq!(derive_key("Ubuntu 22.04"), "ubuntu-22-04");
/// assert_eq!(derive_key("!!!"), "");
/// ```
pub fn derive_key(name: &str) -> String {
	let mapped: String = name
		.chars()
		.flat_map(|c| {
			if c.is_alphanumeric() {
				c.to_lowercase().collect::<Vec<_>>()
			} else {
				vec!['-']
			}
		})
		.collect();
	mapped.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lowercases_and_hyphenates() {
		assert_eq!(derive_key("Ubuntu 22.04"), "ubuntu-22-04");
		assert_eq!(derive_key("Memtest86+"), "memtest86");
	}

	#[test]
	fn is_deterministic() {
		assert_eq!(derive_key("FreeBSD 14"), derive_key("FreeBSD 14"));
	}

	#[test]
	fn punctuation_only_yields_empty_key() {
		assert_eq!(derive_key("!!!"), "");
		assert_eq!(derive_key(""), "");
		assert_eq!(derive_key("---"), "");
	}

	#[test]
	fn interior_punctuation_keeps_hyphens() {
		assert_eq!(derive_key("a b"), "a-b");
		assert_eq!(derive_key("  spaced  "), "spaced");
	}

	#[test]
	fn consecutive_punctuation_is_not_collapsed() {
		assert_eq!(derive_key("iso_1: freebsd.iso"), "iso-1--freebsd-iso");
	}

	#[test]
	fn distinct_names_may_collide() {
		assert_eq!(derive_key("Arch Linux"), derive_key("arch linux"));
	}
}
