//! HTTP server and operator jobs for the Kisan portal.
//!
//! Mounts the [`kisan_api`] router under `/api` behind request tracing, and
//! hosts the one-shot jobs the binary can run instead of serving.

pub mod stats;

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use kisan_api::{DEFAULT_IDENTITY_HEADER, IdentityConfig};
use kisan_core::store::PortalStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `KISAN_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  /// Header in which the identity service forwards the signed-in user id.
  #[serde(default = "default_identity_header")]
  pub identity_header: String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("kisan.db") }

fn default_identity_header() -> String { DEFAULT_IDENTITY_HEADER.to_owned() }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: PortalStore + 'static,
{
  let identity = IdentityConfig { header: config.identity_header.to_lowercase() };
  Router::new()
    .nest("/api", kisan_api::api_router(store, identity))
    .layer(TraceLayer::new_for_http())
}
