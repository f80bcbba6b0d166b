//! Change-driven menu cache.
//!
//! The cache orchestrates catalog loading, reconciliation and rendering.
//! Every menu request triggers [`MenuCache::refresh`]; the two script
//! variants are only re-rendered when the reconciled catalog differs from
//! the previous snapshot, so steady-state requests pay for one catalog
//! load and one directory listing but no template work.

use crate::catalog::Catalog;
use crate::reconcile::reconcile;
use crate::render::{ScriptRenderer, Variant};
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::{debug, info};

/// Timestamp sentinel served before the first successful refresh.
pub const NEVER_UPDATED: &str = "never";

/// Mutable cache state, swapped wholesale on re-render.
#[derive(Default)]
struct CacheState {
	/// Last successfully reconciled catalog, for staleness detection.
	snapshot: Option<Catalog>,
	/// Rendered memdisk-boot script.
	memdisk_script: Option<String>,
	/// Rendered direct-boot script.
	direct_script: Option<String>,
	/// UTC time of the last re-render.
	last_updated: Option<DateTime<Utc>>,
}

/// Memoizing orchestrator for the menu pipeline.
///
/// A single instance is shared across all request tasks. The whole
/// load -> compare -> render -> swap region runs under one lock, so
/// concurrent refreshes never double-render and readers never observe a
/// torn snapshot/variant/timestamp combination.
pub struct MenuCache {
	catalog_path: PathBuf,
	media_dir: PathBuf,
	renderer: ScriptRenderer,
	state: Mutex<CacheState>,
}

impl MenuCache {
	/// Create a cache over the given catalog document and media directory.
	pub fn new(catalog_path: PathBuf, media_dir: PathBuf, renderer: ScriptRenderer) -> Self {
		Self {
			catalog_path,
			media_dir,
			renderer,
			state: Mutex::new(CacheState::default()),
		}
	}

	/// Path of the catalog document this cache loads from.
	pub fn catalog_path(&self) -> &std::path::Path {
		&self.catalog_path
	}

	/// Reload the catalog, reconcile it against the media directory and
	/// re-render both script variants if the result differs from the
	/// cached snapshot.
	///
	/// On any load or reconcile failure the cache is left exactly as it
	/// was and the error is returned; previously rendered variants stay
	/// servable. `base_url` is baked into the rendered scripts, so cached
	/// output keeps the base URL of the request that triggered the last
	/// re-render.
	pub fn refresh(&self, base_url: &str) -> crate::error::Result<()> {
		let mut state = self.state.lock();

		let catalog = Catalog::load(&self.catalog_path)?;
		let reconciled = reconcile(catalog, &self.media_dir)?;

		if state.snapshot.as_ref() == Some(&reconciled) {
			debug!("menu unchanged, serving cached scripts");
			return Ok(());
		}

		let memdisk_script = self.renderer.render(&reconciled, base_url, Variant::MemdiskBoot)?;
		let direct_script = self.renderer.render(&reconciled, base_url, Variant::DirectBoot)?;

		*state = CacheState {
			snapshot: Some(reconciled),
			memdisk_script: Some(memdisk_script),
			direct_script: Some(direct_script),
			last_updated: Some(Utc::now()),
		};
		info!("menu changed, re-rendered both boot script variants");
		Ok(())
	}

	/// The cached script text for `variant` and the last-updated
	/// timestamp (RFC 3339 UTC, or `"never"` before the first successful
	/// refresh). Returns `None` when no refresh has ever succeeded.
	pub fn variant(&self, variant: Variant) -> Option<(String, String)> {
		let state = self.state.lock();
		let script = match variant {
			Variant::MemdiskBoot => state.memdisk_script.clone(),
			Variant::DirectBoot => state.direct_script.clone(),
		};
		let timestamp = state
			.last_updated
			.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Micros, true))
			.unwrap_or_else(|| NEVER_UPDATED.to_string());
		script.map(|text| (text, timestamp))
	}
}

/// Map the `type` query parameter to a boot variant.
///
/// Preserved exactly for client compatibility: absent or `"1"` selects
/// [`Variant::DirectBoot`], `"2"` selects [`Variant::MemdiskBoot`], and
/// anything else is a client error handled at the HTTP boundary.
pub fn select_variant(requested: Option<&str>) -> Option<Variant> {
	match requested {
		None | Some("1") => Some(Variant::DirectBoot),
		Some("2") => Some(Variant::MemdiskBoot),
		Some(_) => None,
	}
}
