//! HTTP boundary.
//!
//! Thin plumbing around the menu cache: an accept loop with one task per
//! connection, and a hyper [`Service`] that routes the two endpoints.
//! All real logic lives in the pipeline modules; handlers here only
//! translate between HTTP and the cache.

use crate::cache::{MenuCache, select_variant};
use crate::config::ServerConfig;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HOST, HeaderValue, SERVER};
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper::{Method, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Response header carrying the last re-render time.
const LAST_UPDATED_HEADER: &str = "X-Last-Updated";

/// Shared per-process state handed to every connection task.
pub struct AppState {
	/// Startup configuration.
	pub config: ServerConfig,
	/// The menu cache.
	pub cache: MenuCache,
}

/// The menu HTTP server.
pub struct HttpServer {
	listener: TcpListener,
	state: Arc<AppState>,
}

impl HttpServer {
	/// Bind the configured address.
	pub async fn bind(config: ServerConfig, cache: MenuCache) -> std::io::Result<Self> {
		let addr = format!("{}:{}", config.host, config.port);
		let listener = TcpListener::bind(&addr).await?;
		Ok(Self {
			listener,
			state: Arc::new(AppState { config, cache }),
		})
	}

	/// The address the server is bound to.
	pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
		self.listener.local_addr()
	}

	/// Accept connections until an accept error occurs.
	pub async fn serve(self) -> std::io::Result<()> {
		let addr = self.listener.local_addr()?;
		info!(
			"serving menu at http://{}/menu.ipxe (catalog {}, media {})",
			addr,
			self.state.config.catalog_path.display(),
			self.state.config.media_dir.display()
		);

		loop {
			let (stream, _peer) = self.listener.accept().await?;
			let service = MenuService {
				state: self.state.clone(),
			};

			tokio::task::spawn(async move {
				let io = TokioIo::new(stream);
				if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
					debug!("connection error: {err:?}");
				}
			});
		}
	}
}

/// Service implementation for hyper.
struct MenuService {
	state: Arc<AppState>,
}

impl Service<hyper::Request<Incoming>> for MenuService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = std::convert::Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let state = self.state.clone();

		Box::pin(async move {
			let ident = HeaderValue::from_str(&state.config.ident)
				.unwrap_or_else(|_| HeaderValue::from_static("iPXE"));
			let mut response = route(state, &req).await;
			response.headers_mut().insert(SERVER, ident);
			Ok(response)
		})
	}
}

/// Dispatch a request to the menu or file endpoint.
async fn route(
	state: Arc<AppState>,
	req: &hyper::Request<Incoming>,
) -> hyper::Response<Full<Bytes>> {
	if req.method() != Method::GET {
		return plain_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
	}

	let files_prefix = format!("/{}/", state.config.files_path);
	let path = req.uri().path();

	if path == "/menu.ipxe" {
		menu_endpoint(state, req).await
	} else if let Some(filename) = path.strip_prefix(&files_prefix) {
		let filename = filename.to_string();
		file_endpoint(&state, &filename).await
	} else {
		plain_response(StatusCode::NOT_FOUND, "Not Found")
	}
}

/// `GET /menu.ipxe?type=N`: refresh the cache and serve the selected
/// boot-script variant.
async fn menu_endpoint(
	state: Arc<AppState>,
	req: &hyper::Request<Incoming>,
) -> hyper::Response<Full<Bytes>> {
	// Client input is validated before the cache is touched.
	let params = parse_query_params(req.uri());
	let Some(variant) = select_variant(params.get("type").map(String::as_str)) else {
		return plain_response(StatusCode::BAD_REQUEST, "Error: Allowed types are 1 or 2");
	};

	let base_url = base_url(&state, req);
	let refreshed = {
		let state = state.clone();
		let base_url = base_url.clone();
		tokio::task::spawn_blocking(move || state.cache.refresh(&base_url)).await
	};

	match refreshed {
		Ok(Ok(())) => {}
		Ok(Err(err)) => {
			warn!("menu refresh failed: {err}");
			return plain_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {err}"));
		}
		Err(err) => {
			warn!("menu refresh task failed: {err}");
			return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Error: internal failure");
		}
	}

	match state.cache.variant(variant) {
		Some((script, timestamp)) => {
			let mut response = plain_response(StatusCode::OK, script);
			if let Ok(value) = HeaderValue::from_str(&timestamp) {
				response.headers_mut().insert(LAST_UPDATED_HEADER, value);
			}
			response
		}
		// Unreachable after a successful refresh; kept as an error path
		// rather than a panic.
		None => plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Error: menu cache is empty"),
	}
}

/// `GET /<files_path>/<filename>`: serve an image file from the media
/// directory as a download attachment.
async fn file_endpoint(state: &AppState, raw_name: &str) -> hyper::Response<Full<Bytes>> {
	let Some(filename) = sanitize_filename(raw_name) else {
		return plain_response(StatusCode::NOT_FOUND, "Not Found");
	};

	let path = state.config.media_dir.join(&filename);
	match tokio::fs::read(&path).await {
		Ok(contents) => {
			debug!("serving {}", path.display());
			let mut response = hyper::Response::new(Full::new(Bytes::from(contents)));
			response.headers_mut().insert(
				CONTENT_TYPE,
				HeaderValue::from_static("application/octet-stream"),
			);
			let disposition = format!("attachment; filename=\"{filename}\"");
			response.headers_mut().insert(
				CONTENT_DISPOSITION,
				HeaderValue::from_str(&disposition)
					.unwrap_or_else(|_| HeaderValue::from_static("attachment")),
			);
			response
		}
		Err(err) => {
			debug!("file {} not served: {err}", path.display());
			plain_response(StatusCode::NOT_FOUND, "Not Found")
		}
	}
}

/// Base URL for image downloads, derived from the request `Host` header
/// (falling back to the configured bind address).
fn base_url(state: &AppState, req: &hyper::Request<Incoming>) -> String {
	let host = req
		.headers()
		.get(HOST)
		.and_then(|value| value.to_str().ok())
		.map(str::to_string)
		.unwrap_or_else(|| format!("{}:{}", state.config.host, state.config.port));
	format!("http://{}/{}/", host, state.config.files_path)
}

/// Parse query parameters from the request URI.
fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
	uri.query()
		.map(|q| {
			q.split('&')
				.filter_map(|pair| {
					// Split on first '=' only to preserve '=' in values.
					let mut parts = pair.splitn(2, '=');
					Some((
						parts.next()?.to_string(),
						parts.next().unwrap_or("").to_string(),
					))
				})
				.collect()
		})
		.unwrap_or_default()
}

/// Reduce a client-supplied name to a bare file name.
///
/// Percent-decodes, then keeps only the final path component, rejecting
/// anything that would escape the media directory. Returns `None` for
/// names with no usable file component.
fn sanitize_filename(raw: &str) -> Option<String> {
	let decoded = percent_decode_str(raw).decode_utf8_lossy();
	let name = Path::new(decoded.as_ref()).file_name()?.to_str()?;
	if name.is_empty() || name.contains('"') {
		return None;
	}
	Some(name.to_string())
}

/// Build a `text/plain` response.
fn plain_response(status: StatusCode, body: impl Into<String>) -> hyper::Response<Full<Bytes>> {
	let mut response = hyper::Response::new(Full::new(Bytes::from(body.into())));
	*response.status_mut() = status;
	response.headers_mut().insert(
		CONTENT_TYPE,
		HeaderValue::from_static("text/plain; charset=utf-8"),
	);
	response
}
