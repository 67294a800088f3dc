// crates/caresync-server/src/error.rs
// ============================================================================
// Module: Server Errors
// Description: Startup and transport failures for the server binary.
// Purpose: Give the entry point one error type to render and exit on.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Failures that stop the server before or while it serves requests.
//! Request-level denials never appear here; those travel as
//! [`caresync_core::AuthOutcome`] values and HTTP status codes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server startup and transport failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Config(String),
    /// A downstream client failed to initialize.
    #[error("initialization error: {0}")]
    Init(String),
    /// The listener failed to bind or the server loop failed.
    #[error("transport error: {0}")]
    Transport(String),
}
