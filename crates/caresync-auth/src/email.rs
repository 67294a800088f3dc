// crates/caresync-auth/src/email.rs
// ============================================================================
// Module: Email Validation
// Description: Shape validation for caller-supplied email addresses.
// Purpose: Reject malformed emails before any verifier round trip.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! The email check is a shape gate, not deliverability: word characters with
//! optional single dot/dash separators on both sides of the `@`, ending in
//! one or more 2-3 character TLD segments. Validation fails closed if the
//! pattern itself ever fails to compile.

use std::sync::LazyLock;

use regex::Regex;

/// Accepted email shape.
const EMAIL_PATTERN: &str = r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$";

/// Compiled pattern; `None` would fail every check closed.
static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

/// True when `email` matches the accepted shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_REGEX.as_ref().is_some_and(|pattern| pattern.is_match(email))
}
