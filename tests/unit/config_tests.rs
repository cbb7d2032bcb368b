use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use sgwc_registry::{config::GlobalConfig, AppError};

fn sample_toml() -> &'static str {
    r#"
db_path = "/var/lib/sgwc/registry.db"
bind_address = "0.0.0.0"
http_port = 8080
public_host = "forms.example.org"
form_limit_per_admin = 250

[counter]
floor = 1000

[assets]
background_url = "https://cdn.example.org/formbg.jpg"
logo_url = "https://cdn.example.org/logo.png"
fetch_timeout_seconds = 4
"#
}

#[test]
fn parses_full_config() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("valid config");
    assert_eq!(config.db_path, PathBuf::from("/var/lib/sgwc/registry.db"));
    assert_eq!(config.bind_address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.public_host, "forms.example.org");
    assert_eq!(config.form_limit_per_admin, 250);
    assert_eq!(config.counter.floor, 1000);
    assert_eq!(config.assets.background_url, "https://cdn.example.org/formbg.jpg");
    assert_eq!(config.assets.logo_url, "https://cdn.example.org/logo.png");
    assert_eq!(config.assets.fetch_timeout(), Duration::from_secs(4));
    assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
}

#[test]
fn empty_config_uses_defaults() {
    let config = GlobalConfig::from_toml_str("").expect("defaults are valid");
    assert_eq!(config.db_path, PathBuf::from("data").join("sgwc-registry.db"));
    assert_eq!(config.bind_addr().to_string(), "127.0.0.1:5000");
    assert_eq!(config.public_host, "localhost:5000");
    assert_eq!(config.form_limit_per_admin, 500);
    assert_eq!(config.counter.floor, 500);
    assert!(config.assets.background_url.is_empty());
    assert!(config.assets.logo_url.is_empty());
    assert_eq!(config.assets.fetch_timeout(), Duration::from_secs(10));
}

#[test]
fn zero_form_limit_is_rejected() {
    let result = GlobalConfig::from_toml_str("form_limit_per_admin = 0");
    assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("form_limit_per_admin")));
}

#[test]
fn negative_floor_is_rejected() {
    let result = GlobalConfig::from_toml_str("[counter]\nfloor = -1");
    assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("counter.floor")));
}

#[test]
fn zero_fetch_timeout_is_rejected() {
    let result = GlobalConfig::from_toml_str("[assets]\nfetch_timeout_seconds = 0");
    assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("fetch_timeout_seconds")));
}

#[test]
fn public_host_must_be_bare() {
    for host in ["", "  ", "example.org/forms", "https://example.org"] {
        let raw = format!("public_host = {host:?}");
        assert!(
            matches!(GlobalConfig::from_toml_str(&raw), Err(AppError::Config(_))),
            "public_host {host:?} should be rejected"
        );
    }
}

#[test]
fn malformed_toml_is_config_error() {
    let result = GlobalConfig::from_toml_str("http_port = \"not a number\"");
    assert!(matches!(result, Err(AppError::Config(msg)) if msg.starts_with("invalid config")));
}

#[test]
fn load_from_path_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, sample_toml()).expect("write config");

    let config = GlobalConfig::load_from_path(&path).expect("load config");
    assert_eq!(config.http_port, 8080);
}

#[test]
fn load_from_missing_path_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = GlobalConfig::load_from_path(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("failed to read config")));
}
