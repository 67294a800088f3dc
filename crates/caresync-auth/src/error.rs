// crates/caresync-auth/src/error.rs
// ============================================================================
// Module: Auth Errors
// Description: Failure taxonomy for external credential checks.
// Purpose: Distinguish transport failures from verifier rejections.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Errors here never reach callers as errors: the front door maps every
//! failure of an external check to an unauthorized outcome. The split between
//! transport and rejection exists for logging and tests.

use thiserror::Error;

/// External credential-check failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Transport-level request failure.
    #[error("auth request failed: {0}")]
    Http(String),
    /// The external checker rejected the credential.
    #[error("credential rejected: {0}")]
    Rejected(String),
}
