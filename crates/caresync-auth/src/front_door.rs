// crates/caresync-auth/src/front_door.rs
// ============================================================================
// Module: Authentication Front Door
// Description: OAuth bearer and portal-token authentication flows.
// Purpose: Produce AuthOutcome values; the sole gate before CallerContext.
// Dependencies: caresync-config, caresync-core, caresync-gateway
// ============================================================================

//! ## Overview
//! Two schemes, both returning [`AuthOutcome`] values rather than errors.
//! Mobile callers present an OAuth bearer token with an email and a
//! source-OS header; the email shape gate runs before everything else,
//! including the explicitly enabled test-token override. Portal callers
//! present the five-header token set: `bearer` tokens introspect at the
//! identity service and then bind to the caller's sync-admin profile (the
//! profile email must equal the uid exactly); `basic` is a database health
//! probe. Every external failure maps to an unauthorized outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use caresync_config::OAuthConfig;
use caresync_core::AuthOutcome;
use caresync_gateway::DocumentStore;
use caresync_gateway::buckets;

use crate::email::is_valid_email;
use crate::headers::PortalAuthHeaders;
use crate::headers::SourceOs;
use crate::introspect::TokenIntrospector;
use crate::profile::portal_sync_admin_doc_id;
use crate::profile::profile_email;
use crate::profile::profile_facility_ids;
use crate::profile::profile_role;
use crate::verifier::OAuthVerifier;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of the `Bearer ` scheme prefix stripped from OAuth tokens.
const BEARER_PREFIX_LEN: usize = 7;

// ============================================================================
// SECTION: Front Door
// ============================================================================

/// Authentication front door over the external checkers and the store.
pub struct Authenticator {
    /// OAuth settings, including the test-token override.
    oauth: OAuthConfig,
    /// External id-token verifier.
    verifier: Arc<dyn OAuthVerifier>,
    /// Portal session introspector.
    introspector: Arc<dyn TokenIntrospector>,
    /// Document store holding sync-admin profiles.
    store: Arc<dyn DocumentStore>,
}

impl Authenticator {
    /// Builds a front door over the given collaborators.
    #[must_use]
    pub fn new(
        oauth: OAuthConfig,
        verifier: Arc<dyn OAuthVerifier>,
        introspector: Arc<dyn TokenIntrospector>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            oauth,
            verifier,
            introspector,
            store,
        }
    }

    /// Authenticates a mobile OAuth caller.
    ///
    /// The email shape gate runs first; the test-token override is honored
    /// only when explicitly enabled; the source-OS header must name a
    /// supported platform; the verified email claim must equal the caller's
    /// email case-sensitively.
    pub async fn authenticate_oauth(
        &self,
        bearer_token: &str,
        email: &str,
        source_os: &str,
    ) -> AuthOutcome {
        if !is_valid_email(email) {
            return AuthOutcome::invalid_email();
        }
        if self.oauth.allow_test_oauth
            && let Some(override_value) = &self.oauth.test_oauth_value
        {
            let presented = bearer_token.to_lowercase();
            if presented == *override_value || presented == format!("bearer {override_value}") {
                return AuthOutcome::authorized();
            }
        }
        let token = if bearer_token.len() > BEARER_PREFIX_LEN {
            bearer_token.get(BEARER_PREFIX_LEN ..).unwrap_or("")
        } else {
            ""
        };
        let Some(source_os) = SourceOs::parse(source_os) else {
            return AuthOutcome::invalid_source_os();
        };
        match self.verifier.verify(token, source_os).await {
            Ok(claims) if claims.email.as_deref() == Some(email) => AuthOutcome::authorized(),
            Ok(_) | Err(_) => AuthOutcome::unauthorized(),
        }
    }

    /// Authenticates a portal caller from its token headers.
    pub async fn authenticate_portal_token(&self, headers: &PortalAuthHeaders) -> AuthOutcome {
        match headers.token_type.to_lowercase().as_str() {
            "bearer" => self.authenticate_portal_bearer(headers).await,
            "basic" => self.authenticate_portal_basic().await,
            _ => AuthOutcome::unauthorized(),
        }
    }

    /// Bearer flow: introspection, then sync-admin profile binding.
    async fn authenticate_portal_bearer(&self, headers: &PortalAuthHeaders) -> AuthOutcome {
        let confirmed = matches!(self.introspector.validate(headers).await, Ok(true));
        if !confirmed {
            return AuthOutcome::unauthorized_with_empty_scope();
        }
        let doc_id = portal_sync_admin_doc_id(&headers.uid);
        let profile = match self.store.get(buckets::ACCOUNT_DATA, &doc_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) | Err(_) => return AuthOutcome::unauthorized(),
        };
        if profile_email(&profile) != Some(headers.uid.as_str()) {
            return AuthOutcome::unauthorized();
        }
        AuthOutcome {
            is_authorized: true,
            account_id: Some(profile.account_id.clone().unwrap_or_default()),
            email: Some(profile_email(&profile).unwrap_or_default().to_string()),
            facility_ids: Some(profile_facility_ids(&profile)),
            role: Some(profile_role(&profile).to_string()),
            error_message: None,
            error_code: None,
        }
    }

    /// Basic flow: account bucket health probe.
    async fn authenticate_portal_basic(&self) -> AuthOutcome {
        match self.store.db_info(buckets::ACCOUNT_DATA).await {
            Ok(info)
                if info.db_name.as_deref() == Some(buckets::ACCOUNT_DATA)
                    && info.state.as_deref() == Some("Online")
                    && info.error.is_none() =>
            {
                AuthOutcome::authorized()
            }
            Ok(_) | Err(_) => AuthOutcome::unauthorized(),
        }
    }
}
