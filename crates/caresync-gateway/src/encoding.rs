// crates/caresync-gateway/src/encoding.rs
// ============================================================================
// Module: URL Encoding
// Description: Percent-encoding helpers for gateway URLs.
// Purpose: Encode path segments and full view URLs the way the store expects.
// Dependencies: percent-encoding
// ============================================================================

//! ## Overview
//! Two encoding profiles are used against the store. Path segments (document
//! ids, usernames) use the strict component profile that leaves only
//! unreserved characters intact. Full view URLs use the looser URI profile
//! that preserves separators (`?`, `&`, `=`, `,`, `/`) so the assembled query
//! string survives encoding; the encoded length is also what the split
//! thresholds measure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

// ============================================================================
// SECTION: Encoding Profiles
// ============================================================================

/// Escaped characters for whole-URI encoding; separators stay intact.
const URI_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'|')
    .add(b'%');

/// Escaped characters for path-segment encoding; only unreserved survive.
const COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// ============================================================================
// SECTION: Public Helpers
// ============================================================================

/// Encodes a complete URL, preserving query-string separators.
#[must_use]
pub fn encode_uri(raw: &str) -> String {
    utf8_percent_encode(raw, URI_SET).to_string()
}

/// Encodes a single path segment or identifier.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT_SET).to_string()
}
