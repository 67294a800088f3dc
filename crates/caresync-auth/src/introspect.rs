// crates/caresync-auth/src/introspect.rs
// ============================================================================
// Module: Portal Token Introspection
// Description: Delegated validation of portal session tokens.
// Purpose: Pass the caller's token headers through to the identity service.
// Dependencies: caresync-config, reqwest, serde
// ============================================================================

//! ## Overview
//! Portal bearer tokens are opaque here; the identity service owns them. The
//! introspector forwards the caller's five token headers verbatim and reports
//! whether the service confirmed the session. A non-200 answer or a missing
//! success flag is a plain `false`, not an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use caresync_config::PortalApiConfig;
use reqwest::Client;
use serde::Deserialize;

use crate::error::AuthError;
use crate::headers::PortalAuthHeaders;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Connect timeout for introspection requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall timeout for introspection requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Seam
// ============================================================================

/// Validates portal session tokens with the identity service.
#[async_trait]
pub trait TokenIntrospector: Send + Sync {
    /// True when the identity service confirms the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] on transport failure only.
    async fn validate(&self, headers: &PortalAuthHeaders) -> Result<bool, AuthError>;
}

// ============================================================================
// SECTION: HTTP Implementation
// ============================================================================

/// Identity-service confirmation body.
#[derive(Debug, Deserialize)]
struct ValidateTokenResponse {
    /// True when the session is valid.
    #[serde(default)]
    success: bool,
}

/// Identity-service-backed introspector.
///
/// # Invariants
/// - `base_url` carries no trailing slash.
pub struct HttpTokenIntrospector {
    /// Identity service base URL.
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpTokenIntrospector {
    /// Builds an introspector from portal API configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &PortalApiConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AuthError::Http(err.to_string()))?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl TokenIntrospector for HttpTokenIntrospector {
    async fn validate(&self, headers: &PortalAuthHeaders) -> Result<bool, AuthError> {
        let url = format!("{}/auth/validate_token", self.base_url);
        let response = self
            .client
            .get(url)
            .header("access-token", &headers.access_token)
            .header("client", &headers.client)
            .header("expiry", &headers.expiry)
            .header("uid", &headers.uid)
            .header("token-type", &headers.token_type)
            .send()
            .await
            .map_err(|err| AuthError::Http(err.to_string()))?;
        if response.status().as_u16() != 200 {
            return Ok(false);
        }
        let body: ValidateTokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Http(err.to_string()))?;
        Ok(body.success)
    }
}
