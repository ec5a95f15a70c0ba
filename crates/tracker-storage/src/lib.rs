//! # tracker-storage
//!
//! Configuration for the tracker's storage subsystem: which backend serves
//! the peer, torrent and manifest stores, and the settings for the Redis and
//! MySQL backends.
//!
//! Start-up code loads the document once, applies Redis defaults once, and
//! passes the resulting value into the store constructors:
//!
//! ```rust
//! use tracker_storage::StorageConfig;
//!
//! let cfg = StorageConfig::from_yaml_str("redis:\n  addr: localhost:6379\n").unwrap();
//! let redis = cfg.redis.apply_defaults().unwrap();
//! assert_eq!(redis.max_active_conns, Some(50));
//! ```
//!
//! The store implementations themselves live elsewhere.

pub mod config;
pub mod loader;

pub use config::{
    ConfigError, MySqlConfig, RedisConfig, StorageConfig, MYSQL_BACKEND, REDIS_BACKEND,
};
pub use loader::{load_config, ConfigFormat};
