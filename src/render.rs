//! Boot-script rendering.
//!
//! A reconciled catalog is turned into an iPXE script by substituting a
//! menu-items block and a boot-sections block into an external template
//! with three insertion points (`base_url`, `menu_items`,
//! `boot_sections`). Two variants exist, differing only in the boot
//! directive each section issues; the traversal is shared and
//! parameterized by [`Variant`].

use crate::catalog::Catalog;
use crate::error::MenuError;
use crate::menukey::derive_key;
use std::path::Path;
use tera::{Context, Tera};

/// Internal name the template is registered under.
const TEMPLATE_NAME: &str = "menu.ipxe";

/// Boot strategy selecting which directive the boot sections issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
	/// Load the image as an initrd, then chain the memdisk image.
	MemdiskBoot,
	/// Boot the image directly via `sanboot`.
	DirectBoot,
}

/// Renders boot scripts from a reconciled catalog.
///
/// Construction loads the template once; rendering is a pure function of
/// the catalog, base URL and variant.
#[derive(Debug)]
pub struct ScriptRenderer {
	tera: Tera,
}

impl ScriptRenderer {
	/// Load the boot-script template from `path`.
	///
	/// Fails with [`MenuError::TemplateMissing`] when the template file
	/// cannot be read or parsed.
	pub fn from_template(path: &Path) -> crate::error::Result<Self> {
		let mut tera = Tera::default();
		tera.add_template_file(path, Some(TEMPLATE_NAME))
			.map_err(|source| MenuError::TemplateMissing {
				path: path.to_path_buf(),
				source,
			})?;
		// The output is an iPXE script, not markup.
		tera.autoescape_on(vec![]);
		Ok(Self { tera })
	}

	/// Render the boot script for `variant`.
	///
	/// For each non-empty category, in catalog order: a gap line naming
	/// the category, a menu line per entry carrying the derived key and
	/// trimmed display name, and a blank `item` separator. Each entry also
	/// gets a boot section labeled with the same key. Entry targets that
	/// already contain a scheme separator are used verbatim; everything
	/// else is resolved against the iPXE `base-url` variable.
	pub fn render(
		&self,
		catalog: &Catalog,
		base_url: &str,
		variant: Variant,
	) -> crate::error::Result<String> {
		let mut menu_items: Vec<String> = Vec::new();
		let mut boot_sections: Vec<String> = Vec::new();
		let memdisk = catalog.memdisk.image().unwrap_or_default();

		for (category, entries) in &catalog.categories {
			if entries.is_empty() {
				continue;
			}

			menu_items.push(format!("item --gap --   --- {category} ---"));

			for (name, target) in entries {
				let key = derive_key(name);
				let label = name.trim();
				menu_items.push(format!("item --key v {key} {label}"));

				let url = if target.contains("://") {
					target.clone()
				} else {
					format!("${{base-url}}{target}")
				};

				boot_sections.push(match variant {
					Variant::MemdiskBoot => format!(
						":{key}\necho Booting {label}...\n\ninitrd {url}\nchain ${{base-url}}{memdisk} iso || goto failed\ngoto start\n"
					),
					Variant::DirectBoot => format!(
						":{key}\necho Booting {label}...\n\nsanboot {url} || goto failed\ngoto start\n"
					),
				});
			}

			menu_items.push("item".to_string());
		}

		let mut context = Context::new();
		context.insert("base_url", base_url);
		context.insert("menu_items", menu_items.join("\n").trim());
		context.insert("boot_sections", boot_sections.join("\n").trim());

		Ok(self.tera.render(TEMPLATE_NAME, &context)?)
	}
}
