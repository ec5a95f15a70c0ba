//! Storage configuration schema and Redis defaulting.
//!
//! The storage document names the backend used for each of the three store
//! roles and carries one block per backend:
//!
//! ```yaml
//! peer_store: redis
//! torrent_store: mysql
//! manifest_store: mysql
//! redis:
//!   addr: localhost:6379
//!   dial_timeout: 5s
//!   max_active_conns: 100
//! mysql:
//!   migration_dir: db/migrations
//! ```
//!
//! Every optional Redis field decodes to `None` when it is omitted.
//! [`RedisConfig::apply_defaults`] fills those fields once at startup, before
//! the value is handed to a Redis client constructor.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend identifier for Redis-backed stores.
pub const REDIS_BACKEND: &str = "redis";
/// Backend identifier for MySQL-backed stores.
pub const MYSQL_BACKEND: &str = "mysql";

/// Connection establishment timeout.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for a single read from the server.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for a single write to the server.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);
/// Width of one peer-set window.
pub const DEFAULT_PEER_SET_WINDOW_SIZE: Duration = Duration::from_secs(60 * 60);
/// Number of peer-set windows kept at once.
pub const DEFAULT_MAX_PEER_SET_WINDOWS: usize = 10;
/// Age at which a torrent record expires.
pub const DEFAULT_TORRENT_TTL: Duration = Duration::from_secs(60 * 60);
/// Idle connections kept in the pool.
pub const DEFAULT_MAX_IDLE_CONNS: usize = 10;
/// Upper bound on open pooled connections.
pub const DEFAULT_MAX_ACTIVE_CONNS: usize = 50;
/// Idle time after which a pooled connection is closed.
pub const DEFAULT_IDLE_CONN_TIMEOUT: Duration = Duration::from_secs(60);
/// Expiry of cached origin resolutions.
pub const DEFAULT_ORIGINS_TTL: Duration = Duration::from_secs(10 * 60 * 60);

/// Error type for storage configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The Redis block has no network address. There is no safe default.
    #[error("no addr configured")]
    MissingAddr,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML content could not be parsed.
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension does not name a supported document format.
    #[error("unsupported config format for {path}: expected .yaml, .yml or .toml")]
    UnsupportedFormat { path: PathBuf },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend identifier for the peer store.
    pub peer_store: String,
    /// Backend identifier for the torrent store.
    pub torrent_store: String,
    /// Backend identifier for the manifest store.
    pub manifest_store: String,
    pub redis: RedisConfig,
    pub mysql: MySqlConfig,
}

impl StorageConfig {
    /// Parses a YAML storage document. Defaults are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document is malformed.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        // An empty document decodes to `null`, which maps to no fields set.
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parses a TOML storage document. Defaults are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reports whether any store role is configured to use `backend`.
    pub fn uses_backend(&self, backend: &str) -> bool {
        [&self.peer_store, &self.torrent_store, &self.manifest_store]
            .into_iter()
            .any(|role| role == backend)
    }
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_yaml(f, self)
    }
}

/// Configuration for MySQL storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MySqlConfig {
    /// Directory holding the schema migration files.
    #[serde(rename = "migration_dir", skip_serializing_if = "Option::is_none")]
    pub migrations_dir: Option<PathBuf>,
}

/// Configuration for Redis storage.
///
/// Optional fields are `None` until [`RedisConfig::apply_defaults`] runs.
/// The accessor methods of the same name always return a usable value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RedisConfig {
    /// Network address of the Redis server (`host:port`). Mandatory.
    pub addr: String,
    #[serde(with = "humantime_serde")]
    pub dial_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub read_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub write_timeout: Option<Duration>,
    /// Width of one peer-set window. Announcements are bucketed per window.
    #[serde(with = "humantime_serde")]
    pub peer_set_window_size: Option<Duration>,
    /// Number of peer-set windows retained before the oldest is evicted.
    pub max_peer_set_windows: Option<usize>,
    #[serde(with = "humantime_serde")]
    pub torrent_ttl: Option<Duration>,
    pub max_idle_conns: Option<usize>,
    pub max_active_conns: Option<usize>,
    #[serde(with = "humantime_serde")]
    pub idle_conn_timeout: Option<Duration>,
    /// Expiry of cached origin resolutions.
    #[serde(with = "humantime_serde")]
    pub origins_ttl: Option<Duration>,
}

impl RedisConfig {
    /// Returns a copy with every unset field replaced by its default.
    ///
    /// An explicit zero counts as unset. `addr` is checked before anything
    /// else and is passed through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAddr`] when `addr` is empty.
    pub fn apply_defaults(self) -> Result<Self, ConfigError> {
        if self.addr.is_empty() {
            return Err(ConfigError::MissingAddr);
        }
        Ok(Self {
            dial_timeout: Some(or_duration(self.dial_timeout, DEFAULT_DIAL_TIMEOUT)),
            read_timeout: Some(or_duration(self.read_timeout, DEFAULT_READ_TIMEOUT)),
            write_timeout: Some(or_duration(self.write_timeout, DEFAULT_WRITE_TIMEOUT)),
            peer_set_window_size: Some(or_duration(
                self.peer_set_window_size,
                DEFAULT_PEER_SET_WINDOW_SIZE,
            )),
            max_peer_set_windows: Some(or_count(
                self.max_peer_set_windows,
                DEFAULT_MAX_PEER_SET_WINDOWS,
            )),
            torrent_ttl: Some(or_duration(self.torrent_ttl, DEFAULT_TORRENT_TTL)),
            max_idle_conns: Some(or_count(self.max_idle_conns, DEFAULT_MAX_IDLE_CONNS)),
            max_active_conns: Some(or_count(self.max_active_conns, DEFAULT_MAX_ACTIVE_CONNS)),
            idle_conn_timeout: Some(or_duration(
                self.idle_conn_timeout,
                DEFAULT_IDLE_CONN_TIMEOUT,
            )),
            origins_ttl: Some(or_duration(self.origins_ttl, DEFAULT_ORIGINS_TTL)),
            addr: self.addr,
        })
    }

    pub fn dial_timeout(&self) -> Duration {
        or_duration(self.dial_timeout, DEFAULT_DIAL_TIMEOUT)
    }

    pub fn read_timeout(&self) -> Duration {
        or_duration(self.read_timeout, DEFAULT_READ_TIMEOUT)
    }

    pub fn write_timeout(&self) -> Duration {
        or_duration(self.write_timeout, DEFAULT_WRITE_TIMEOUT)
    }

    pub fn peer_set_window_size(&self) -> Duration {
        or_duration(self.peer_set_window_size, DEFAULT_PEER_SET_WINDOW_SIZE)
    }

    pub fn max_peer_set_windows(&self) -> usize {
        or_count(self.max_peer_set_windows, DEFAULT_MAX_PEER_SET_WINDOWS)
    }

    pub fn torrent_ttl(&self) -> Duration {
        or_duration(self.torrent_ttl, DEFAULT_TORRENT_TTL)
    }

    pub fn max_idle_conns(&self) -> usize {
        or_count(self.max_idle_conns, DEFAULT_MAX_IDLE_CONNS)
    }

    pub fn max_active_conns(&self) -> usize {
        or_count(self.max_active_conns, DEFAULT_MAX_ACTIVE_CONNS)
    }

    pub fn idle_conn_timeout(&self) -> Duration {
        or_duration(self.idle_conn_timeout, DEFAULT_IDLE_CONN_TIMEOUT)
    }

    pub fn origins_ttl(&self) -> Duration {
        or_duration(self.origins_ttl, DEFAULT_ORIGINS_TTL)
    }

    /// How far back peer presence history extends: window size times the
    /// number of retained windows. Saturates instead of overflowing.
    pub fn peer_set_retention(&self) -> Duration {
        let windows = u32::try_from(self.max_peer_set_windows()).unwrap_or(u32::MAX);
        self.peer_set_window_size().saturating_mul(windows)
    }
}

impl fmt::Display for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_yaml(f, self)
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn or_duration(value: Option<Duration>, default: Duration) -> Duration {
    value.filter(|d| !d.is_zero()).unwrap_or(default)
}

fn or_count(value: Option<usize>, default: usize) -> usize {
    value.filter(|&n| n != 0).unwrap_or(default)
}

/// Renders `value` as YAML. Encoder failures become a placeholder line.
fn write_yaml<T: Serialize>(f: &mut fmt::Formatter<'_>, value: &T) -> fmt::Result {
    match serde_yaml::to_string(value) {
        Ok(s) => f.write_str(&s),
        Err(e) => write!(f, "yaml marshal error: {e}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
