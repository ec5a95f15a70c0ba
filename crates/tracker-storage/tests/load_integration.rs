//! Integration tests for loading storage documents from disk.
//!
//! Each test writes a document into its own temp directory, loads it through
//! `load_config`, and applies Redis defaults the way start-up code does.

use std::path::PathBuf;
use std::time::Duration;

use tracker_storage::{load_config, ConfigError, REDIS_BACKEND};
use uuid::Uuid;

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("tracker_storage_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.0.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

#[test]
fn test_load_yaml_and_apply_defaults_to_minimal_redis_block() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.write(
        "storage.yaml",
        "peer_store: redis\ntorrent_store: mysql\nmanifest_store: mysql\nredis:\n  addr: localhost:6379\n",
    );

    // Act
    let cfg = load_config(&path).expect("load");
    let redis = cfg.redis.clone().apply_defaults().expect("defaults");

    // Assert
    assert!(cfg.uses_backend(REDIS_BACKEND));
    assert_eq!(redis.addr, "localhost:6379");
    assert_eq!(redis.dial_timeout, Some(Duration::from_secs(5)));
    assert_eq!(redis.read_timeout, Some(Duration::from_secs(30)));
    assert_eq!(redis.write_timeout, Some(Duration::from_secs(30)));
    assert_eq!(redis.peer_set_window_size, Some(Duration::from_secs(3600)));
    assert_eq!(redis.max_peer_set_windows, Some(10));
    assert_eq!(redis.torrent_ttl, Some(Duration::from_secs(3600)));
    assert_eq!(redis.max_idle_conns, Some(10));
    assert_eq!(redis.max_active_conns, Some(50));
    assert_eq!(redis.idle_conn_timeout, Some(Duration::from_secs(60)));
    assert_eq!(redis.origins_ttl, Some(Duration::from_secs(36000)));
}

#[test]
fn test_load_yaml_without_addr_fails_when_defaulting() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.write("storage.yml", "peer_store: redis\nredis:\n  dial_timeout: 2s\n");

    // Act
    let cfg = load_config(&path).expect("load succeeds; addr is checked later");
    let result = cfg.redis.apply_defaults();

    // Assert
    assert!(matches!(result, Err(ConfigError::MissingAddr)));
}

#[test]
fn test_load_toml_preserves_explicit_fields() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.write(
        "storage.toml",
        "peer_store = \"redis\"\n\n[redis]\naddr = \"x:1\"\nmax_active_conns = 100\n\n[mysql]\nmigration_dir = \"migrations\"\n",
    );

    // Act
    let cfg = load_config(&path).expect("load");
    let redis = cfg.redis.clone().apply_defaults().expect("defaults");

    // Assert
    assert_eq!(redis.max_active_conns, Some(100));
    assert_eq!(redis.max_idle_conns, Some(10));
    assert_eq!(cfg.mysql.migrations_dir, Some(PathBuf::from("migrations")));
}

#[test]
fn test_load_malformed_yaml_returns_yaml_error() {
    let dir = TempDir::new();
    let path = dir.write("storage.yaml", "redis: [unclosed\n");

    let result = load_config(&path);

    assert!(matches!(result, Err(ConfigError::Yaml(_))));
}

#[test]
fn test_loaded_config_can_be_shared_across_threads() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.write("storage.yaml", "redis:\n  addr: localhost:6379\n");
    let redis = std::sync::Arc::new(
        load_config(&path)
            .expect("load")
            .redis
            .apply_defaults()
            .expect("defaults"),
    );

    // Act
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let redis = std::sync::Arc::clone(&redis);
            std::thread::spawn(move || redis.max_active_conns())
        })
        .collect();

    // Assert
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 50);
    }
}
