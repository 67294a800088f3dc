// crates/caresync-auth/src/verifier.rs
// ============================================================================
// Module: OAuth Verifier
// Description: External verification of mobile OAuth id tokens.
// Purpose: Delegate token cryptography to the provider's token-info endpoint.
// Dependencies: caresync-config, caresync-gateway, reqwest, serde
// ============================================================================

//! ## Overview
//! Token signatures are never checked in process. The verifier posts the id
//! token to the provider's token-info endpoint, requires the audience to
//! match the per-platform client id, and hands back the verified email claim
//! for the front door's case-sensitive comparison.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use caresync_config::OAuthConfig;
use caresync_gateway::encode_component;
use reqwest::Client;
use serde::Deserialize;

use crate::error::AuthError;
use crate::headers::SourceOs;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Connect timeout for verifier requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall timeout for verifier requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Seam
// ============================================================================

/// Claims extracted from a verified id token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiedClaims {
    /// Verified email claim, when the token carries one.
    pub email: Option<String>,
}

/// Verifies mobile OAuth id tokens with an external provider.
#[async_trait]
pub trait OAuthVerifier: Send + Sync {
    /// Verifies one token for the given platform.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] on transport failure or provider rejection.
    async fn verify(&self, token: &str, source_os: SourceOs)
    -> Result<VerifiedClaims, AuthError>;
}

// ============================================================================
// SECTION: HTTP Implementation
// ============================================================================

/// Token-info response fields the front door consumes.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    /// Audience the token was issued for.
    #[serde(default)]
    aud: Option<String>,
    /// Verified email claim.
    #[serde(default)]
    email: Option<String>,
}

/// Token-info-backed verifier.
///
/// # Invariants
/// - `verifier_url` carries no trailing slash.
pub struct HttpOAuthVerifier {
    /// Token-info endpoint URL.
    verifier_url: String,
    /// Expected audience for Android tokens.
    android_client_id: String,
    /// Expected audience for iOS tokens.
    ios_client_id: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpOAuthVerifier {
    /// Builds a verifier from OAuth configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &OAuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AuthError::Http(err.to_string()))?;
        Ok(Self {
            verifier_url: config.verifier_url.trim_end_matches('/').to_string(),
            android_client_id: config.android_client_id.clone(),
            ios_client_id: config.ios_client_id.clone(),
            client,
        })
    }

    /// Expected audience for the platform.
    fn expected_audience(&self, source_os: SourceOs) -> &str {
        match source_os {
            SourceOs::Ios => &self.ios_client_id,
            SourceOs::Android => &self.android_client_id,
        }
    }
}

#[async_trait]
impl OAuthVerifier for HttpOAuthVerifier {
    async fn verify(
        &self,
        token: &str,
        source_os: SourceOs,
    ) -> Result<VerifiedClaims, AuthError> {
        let url = format!("{}?id_token={}", self.verifier_url, encode_component(token));
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| AuthError::Http(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| AuthError::Http(err.to_string()))?;
        if status != 200 {
            return Err(AuthError::Rejected(format!("token-info status {status}")));
        }
        let info: TokenInfo = serde_json::from_str(&body)
            .map_err(|err| AuthError::Rejected(format!("token-info body: {err}")))?;
        if info.aud.as_deref() != Some(self.expected_audience(source_os)) {
            return Err(AuthError::Rejected("audience mismatch".to_string()));
        }
        Ok(VerifiedClaims { email: info.email })
    }
}
