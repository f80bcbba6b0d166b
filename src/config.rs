//! Startup configuration.

use std::path::PathBuf;

/// Startup configuration for the menu server.
///
/// Everything here is thin plumbing: the bind address, the identification
/// string advertised to clients, and the paths the menu pipeline reads
/// from. Values come from the CLI (see `main.rs`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
	/// Host/interface to bind.
	pub host: String,
	/// Port to bind.
	pub port: u16,
	/// `Server` header value advertised to clients.
	pub ident: String,
	/// Directory holding the boot image files.
	pub media_dir: PathBuf,
	/// URL path segment under which image files are served.
	pub files_path: String,
	/// Path of the catalog document.
	pub catalog_path: PathBuf,
	/// Path of the boot-script template.
	pub template_path: PathBuf,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 80,
			ident: "iPXE".to_string(),
			media_dir: PathBuf::from("/mount"),
			files_path: "files".to_string(),
			catalog_path: PathBuf::from("/Images.json"),
			template_path: PathBuf::from("templates/menu.ipxe.tera"),
		}
	}
}
