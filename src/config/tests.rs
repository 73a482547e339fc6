use super::*;
use std::net::IpAddr;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.catalog_path, PathBuf::from("./catalog.json"));
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert!(config.generation_model.is_none());
    assert_eq!(config.retrieve_k, 10);
    assert_eq!(config.rerank_top_n, 5);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
fn test_validate_rejects_zero_retrieve_k() {
    let config = Config {
        retrieve_k: 0,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_top_n() {
    let config = Config {
        rerank_top_n: 0,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_validate_rejects_directory_catalog_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        catalog_path: dir.path().to_path_buf(),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotAFile { .. })
    ));
}

#[test]
fn test_validate_accepts_missing_catalog_path() {
    // The catalog may be created later; validation only rejects wrong kinds.
    let config = Config {
        catalog_path: PathBuf::from("./does-not-exist.json"),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}
