//! CLI entry point.

use clap::Parser;
use ipxe_menu_server::{HttpServer, MenuCache, ScriptRenderer, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Network-boot menu server: serves a generated iPXE menu script and the
/// boot images it references.
#[derive(Debug, Parser)]
#[command(name = "ipxe-menu-server", version, about)]
struct Cli {
	/// Host/interface to bind
	#[arg(long, default_value = "0.0.0.0")]
	host: String,

	/// Port to bind
	#[arg(long, default_value_t = 80)]
	port: u16,

	/// Server identification string advertised to clients
	#[arg(long, default_value = "iPXE")]
	ident: String,

	/// Directory holding the boot image files
	#[arg(long, default_value = "/mount")]
	media_dir: PathBuf,

	/// URL path segment under which image files are served
	#[arg(long, default_value = "files")]
	files_path: String,

	/// Path of the catalog document
	#[arg(long, default_value = "/Images.json")]
	catalog: PathBuf,

	/// Path of the boot-script template
	#[arg(long, default_value = "templates/menu.ipxe.tera")]
	template: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let cli = Cli::parse();
	let config = ServerConfig {
		host: cli.host,
		port: cli.port,
		ident: cli.ident,
		media_dir: cli.media_dir,
		files_path: cli.files_path,
		catalog_path: cli.catalog,
		template_path: cli.template,
	};

	// A missing template is a configuration error; fail before binding.
	let renderer = ScriptRenderer::from_template(&config.template_path)?;
	let cache = MenuCache::new(config.catalog_path.clone(), config.media_dir.clone(), renderer);

	let server = HttpServer::bind(config, cache).await?;
	server.serve().await?;
	Ok(())
}
