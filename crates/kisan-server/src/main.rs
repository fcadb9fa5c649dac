//! kisan-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `KISAN_*` environment variables on top, opens the SQLite store and serves
//! the JSON API under `/api`.
//!
//! # Operator jobs
//!
//! ```text
//! kisan-server --update-stats          # recompute the public stats and exit
//! kisan-server --grant-admin <USER_ID> # set the admin flag on a profile and exit
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use kisan_core::{profile::UserId, store::PortalStore};
use kisan_server::{ServerConfig, app, stats::refresh_stats};
use kisan_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Kisan farmer community portal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Recompute the public portal stats and exit.
  #[arg(long)]
  update_stats: bool,

  /// Grant the admin flag to a registered user and exit.
  #[arg(long, value_name = "USER_ID", conflicts_with = "update_stats")]
  grant_admin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("KISAN"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Job modes: run once and exit.
  if cli.update_stats {
    refresh_stats(&store, Utc::now())
      .await
      .context("failed to update stats")?;
    return Ok(());
  }
  if let Some(user) = cli.grant_admin {
    let user_id = UserId::new(user).context("invalid user id")?;
    store
      .set_admin(&user_id, true)
      .await
      .context("failed to set admin flag")?
      .with_context(|| format!("no profile registered for {user_id}"))?;
    tracing::info!(%user_id, "admin granted");
    return Ok(());
  }

  let app = app(Arc::new(store), &server_cfg);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
