// crates/caresync-auth/src/lib.rs
// ============================================================================
// Module: CareSync Auth
// Description: Authentication front door for mobile and portal callers.
// Purpose: Produce authentication outcomes; the sole producer of caller scope.
// Dependencies: caresync-config, caresync-core, caresync-gateway, regex, reqwest
// ============================================================================

//! ## Overview
//! Two authentication schemes converge on [`caresync_core::AuthOutcome`]:
//! the mobile OAuth bearer flow (email shape gate, explicit test override,
//! source-OS gate, external verifier) and the portal token flow (identity
//! service introspection plus sync-admin profile binding, or a basic
//! database health probe). External checkers sit behind the
//! [`OAuthVerifier`] and [`TokenIntrospector`] seams.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod email;
pub mod error;
pub mod front_door;
pub mod headers;
pub mod introspect;
pub mod profile;
pub mod verifier;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use email::is_valid_email;
pub use error::AuthError;
pub use front_door::Authenticator;
pub use headers::PortalAuthHeaders;
pub use headers::SourceOs;
pub use introspect::HttpTokenIntrospector;
pub use introspect::TokenIntrospector;
pub use profile::SYNC_ADMIN_DOC_PREFIX;
pub use profile::portal_sync_admin_doc_id;
pub use profile::sync_username;
pub use verifier::HttpOAuthVerifier;
pub use verifier::OAuthVerifier;
pub use verifier::VerifiedClaims;
