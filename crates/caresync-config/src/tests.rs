// crates/caresync-config/src/tests.rs
// ============================================================================
// Module: Config Validation Tests
// Description: Unit tests for configuration validation and loading.
// Purpose: Ensure validation is fail-closed and URLs are normalized.
// Dependencies: caresync-config, tempfile
// ============================================================================

//! ## Overview
//! Validates fail-closed behavior for every config section and the TOML
//! loading path, including test-override consistency rules.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use super::CaresyncConfig;
use super::ConfigError;
use super::EndpointConfig;
use super::OAuthConfig;
use super::PortalApiConfig;
use super::ServerConfig;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Builds a configuration that passes validation.
fn valid_config() -> CaresyncConfig {
    CaresyncConfig {
        gateway: EndpointConfig {
            url: "https://gateway.example.com:4985/".to_string(),
            user: "sync".to_string(),
            password: "secret".to_string(),
        },
        analytics: EndpointConfig {
            url: "https://analytics.example.com:8095".to_string(),
            user: "cbq".to_string(),
            password: "secret".to_string(),
        },
        portal_api: PortalApiConfig {
            url: "https://portal.example.com/api/v1".to_string(),
        },
        oauth: OAuthConfig {
            android_client_id: "android-client".to_string(),
            ios_client_id: "ios-client".to_string(),
            verifier_url: "https://oauth.example.com/tokeninfo".to_string(),
            allow_test_oauth: false,
            test_oauth_value: None,
        },
        server: ServerConfig {
            bind: "127.0.0.1:8080".to_string(),
        },
    }
}

/// Asserts validation fails with a message containing `needle`.
fn assert_invalid(mut config: CaresyncConfig, needle: &str) {
    match config.validate() {
        Err(ConfigError::Invalid(message)) => {
            assert!(message.contains(needle), "'{message}' missing '{needle}'");
        }
        other => panic!("expected invalid config, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Validation Tests
// ============================================================================

#[test]
fn valid_config_passes_and_trims_trailing_slash() {
    let mut config = valid_config();
    config.validate().unwrap();
    assert_eq!(config.gateway.url, "https://gateway.example.com:4985");
    assert_eq!(config.analytics.url, "https://analytics.example.com:8095");
}

#[test]
fn rejects_non_http_schemes() {
    let mut config = valid_config();
    config.gateway.url = "ftp://gateway.example.com".to_string();
    assert_invalid(config, "gateway.url");
}

#[test]
fn rejects_unparseable_urls() {
    let mut config = valid_config();
    config.portal_api.url = "not a url".to_string();
    assert_invalid(config, "portal_api.url");
}

#[test]
fn rejects_empty_credentials() {
    let mut config = valid_config();
    config.analytics.password = String::new();
    assert_invalid(config, "analytics.password");
}

#[test]
fn test_override_requires_value_when_enabled() {
    let mut config = valid_config();
    config.oauth.allow_test_oauth = true;
    config.oauth.test_oauth_value = None;
    assert_invalid(config, "test_oauth_value");
}

#[test]
fn test_override_value_requires_enable_flag() {
    let mut config = valid_config();
    config.oauth.test_oauth_value = Some("secret".to_string());
    assert_invalid(config, "allow_test_oauth");
}

#[test]
fn rejects_bad_bind_address() {
    let mut config = valid_config();
    config.server.bind = "localhost".to_string();
    assert_invalid(config, "server.bind");
}

// ============================================================================
// SECTION: Loading Tests
// ============================================================================

#[test]
fn load_parses_and_validates_toml() {
    let toml = r#"
[gateway]
url = "https://gateway.example.com:4985/"
user = "sync"
password = "secret"

[analytics]
url = "https://analytics.example.com:8095"
user = "cbq"
password = "secret"

[portal_api]
url = "https://portal.example.com/api/v1"

[oauth]
android_client_id = "android-client"
ios_client_id = "ios-client"
verifier_url = "https://oauth.example.com/tokeninfo"
allow_test_oauth = true
test_oauth_value = "secret"

[server]
bind = "127.0.0.1:8080"
"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    let config = CaresyncConfig::load(file.path()).unwrap();
    assert_eq!(config.gateway.url, "https://gateway.example.com:4985");
    assert!(config.oauth.allow_test_oauth);
}

#[test]
fn load_rejects_unknown_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"[gateway]\nurl = \"https://g\"\nuser = \"u\"\npassword = \"p\"\nextra = 1\n")
        .unwrap();
    assert!(matches!(CaresyncConfig::load(file.path()), Err(ConfigError::Parse(_))));
}
