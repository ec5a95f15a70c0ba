//! Entry point for the tracker storage configuration check.
//!
//! Loads a storage document, applies Redis defaults when any store role uses
//! the Redis backend, and logs the resolved configuration. A configuration
//! the stores could not start with (for example a Redis block without
//! `addr`) exits non-zero.
//!
//! # Usage
//!
//! ```text
//! tracker-storage-check --config <PATH> [--log-level <LEVEL>]
//! ```
//!
//! | Variable                 | Description                               |
//! |--------------------------|-------------------------------------------|
//! | `TRACKER_STORAGE_CONFIG` | Path to the storage document              |
//! | `TRACKER_LOG_LEVEL`      | Log level when `RUST_LOG` is unset        |

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tracker_storage::{load_config, RedisConfig, StorageConfig, REDIS_BACKEND};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Validates a tracker storage configuration file.
#[derive(Debug, Parser)]
#[command(
    name = "tracker-storage-check",
    about = "Loads and validates a tracker storage configuration file",
    version
)]
struct Cli {
    /// Storage document to load (`.yaml`, `.yml` or `.toml`).
    #[arg(long, env = "TRACKER_STORAGE_CONFIG")]
    config: PathBuf,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info", env = "TRACKER_LOG_LEVEL")]
    log_level: String,
}

/// Storage configuration after start-up defaulting.
#[derive(Debug)]
struct ResolvedStorage {
    config: StorageConfig,
    /// `Some` only when a store role uses Redis.
    redis: Option<RedisConfig>,
}

/// Loads the document at `path` and defaults the Redis block if it is used.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or if a Redis-backed role is
/// configured without a Redis address.
fn resolve(path: &std::path::Path) -> anyhow::Result<ResolvedStorage> {
    let config = load_config(path)
        .with_context(|| format!("failed to load storage config from {}", path.display()))?;

    let redis = if config.uses_backend(REDIS_BACKEND) {
        let redis = config
            .redis
            .clone()
            .apply_defaults()
            .context("invalid redis storage config")?;
        Some(redis)
    } else {
        None
    };

    Ok(ResolvedStorage { config, redis })
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let resolved = resolve(&cli.config)?;
    debug!("loaded storage config:\n{}", resolved.config);

    info!(
        "storage roles: peer_store={:?}, torrent_store={:?}, manifest_store={:?}",
        resolved.config.peer_store, resolved.config.torrent_store, resolved.config.manifest_store
    );

    match &resolved.redis {
        Some(redis) => {
            info!(
                "redis storage config (peer history spans {}):\n{redis}",
                humantime::format_duration(redis.peer_set_retention())
            );
        }
        None => info!("no store role uses redis; redis block not validated"),
    }

    if let Some(dir) = &resolved.config.mysql.migrations_dir {
        info!("mysql migrations directory: {}", dir.display());
    }

    info!("storage config OK");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
