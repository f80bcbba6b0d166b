//! # iPXE Menu Server
//!
//! A network-boot menu server for PXE-style chainloading. Clients fetch
//! an iPXE boot script over HTTP; the script lists bootable images
//! grouped into categories and issues boot directives for the image the
//! user selects. A second endpoint serves the underlying image files.
//!
//! The core is the menu synthesis pipeline:
//!
//! - [`catalog`]: loads the declarative JSON catalog of categorized
//!   boot images.
//! - [`reconcile`]: merges the catalog with the image files actually
//!   present in the media directory, so untracked files still show up.
//! - [`menukey`]: derives script-safe menu keys from display names.
//! - [`render`]: renders the two boot-script variants (memdisk chainload
//!   vs. direct `sanboot`) from a shared template.
//! - [`cache`]: memoizes both variants and re-renders only when the
//!   reconciled catalog changes.
//! - [`server`]: the hyper HTTP boundary.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod menukey;
pub mod reconcile;
pub mod render;
pub mod server;

pub use cache::MenuCache;
pub use catalog::{Catalog, Memdisk};
pub use config::ServerConfig;
pub use error::MenuError;
pub use render::{ScriptRenderer, Variant};
pub use server::HttpServer;
