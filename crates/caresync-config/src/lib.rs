// crates/caresync-config/src/lib.rs
// ============================================================================
// Module: CareSync Config
// Description: Canonical configuration model for CareSync services.
// Purpose: Provide explicit, validated configuration passed into constructors.
// Dependencies: serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! Configuration is an explicit struct handed by reference into the
//! collaborator constructors; there is no process-wide singleton. Loading is
//! TOML-based and validation is fail-closed: unknown schemes, empty
//! credentials, and inconsistent test-override settings are rejected before
//! any client is built. Base URLs are normalized without a trailing slash.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation failures.
///
/// # Invariants
/// - Messages name the offending field for operator diagnosis.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("config file read failed: {0}")]
    Io(String),
    /// Configuration file could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// A field failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Base URL plus basic-auth credentials for an HTTP collaborator.
///
/// # Invariants
/// - `url` is http(s) and stored without a trailing slash after validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Base URL of the service.
    pub url: String,
    /// Basic-auth user.
    pub user: String,
    /// Basic-auth password.
    pub password: String,
}

/// Portal identity-service endpoint (token introspection only; no creds).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortalApiConfig {
    /// Base URL of the portal API.
    pub url: String,
}

/// OAuth front-door settings for mobile clients.
///
/// # Invariants
/// - `test_oauth_value` is honored only when `allow_test_oauth` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OAuthConfig {
    /// OAuth client id expected for Android callers.
    pub android_client_id: String,
    /// OAuth client id expected for iOS callers.
    pub ios_client_id: String,
    /// Token-info endpoint of the external verifier.
    pub verifier_url: String,
    /// Enables the test-token override (never default-on).
    #[serde(default)]
    pub allow_test_oauth: bool,
    /// Override token value compared case-insensitively when enabled.
    #[serde(default)]
    pub test_oauth_value: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the API binds to.
    pub bind: String,
}

/// Root configuration for the CareSync API.
///
/// # Invariants
/// - All sections are validated before any collaborator is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaresyncConfig {
    /// Document gateway endpoint.
    pub gateway: EndpointConfig,
    /// Analytics query service endpoint.
    pub analytics: EndpointConfig,
    /// Portal identity service endpoint.
    pub portal_api: PortalApiConfig,
    /// OAuth front-door settings.
    pub oauth: OAuthConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl CaresyncConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when any field fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let mut config: Self =
            toml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section and normalizes base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        validate_base_url(&mut self.gateway.url, "gateway.url")?;
        require_non_empty(&self.gateway.user, "gateway.user")?;
        require_non_empty(&self.gateway.password, "gateway.password")?;
        validate_base_url(&mut self.analytics.url, "analytics.url")?;
        require_non_empty(&self.analytics.user, "analytics.user")?;
        require_non_empty(&self.analytics.password, "analytics.password")?;
        validate_base_url(&mut self.portal_api.url, "portal_api.url")?;
        validate_base_url(&mut self.oauth.verifier_url, "oauth.verifier_url")?;
        require_non_empty(&self.oauth.android_client_id, "oauth.android_client_id")?;
        require_non_empty(&self.oauth.ios_client_id, "oauth.ios_client_id")?;
        if self.oauth.allow_test_oauth {
            let value = self.oauth.test_oauth_value.as_deref().unwrap_or_default();
            if value.is_empty() {
                return Err(ConfigError::Invalid(
                    "oauth.test_oauth_value must be set when allow_test_oauth is enabled"
                        .to_string(),
                ));
            }
        } else if self.oauth.test_oauth_value.is_some() {
            return Err(ConfigError::Invalid(
                "oauth.test_oauth_value requires allow_test_oauth".to_string(),
            ));
        }
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("server.bind must be a socket address".to_string()))?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates an http(s) base URL and strips any trailing slash in place.
fn validate_base_url(url: &mut String, field: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url)
        .map_err(|_| ConfigError::Invalid(format!("{field} must be a valid URL")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::Invalid(format!("{field} must use http or https")));
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::Invalid(format!("{field} must include a host")));
    }
    let trimmed_len = url.trim_end_matches('/').len();
    url.truncate(trimmed_len);
    Ok(())
}

/// Rejects empty required string fields.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
