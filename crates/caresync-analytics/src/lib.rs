// crates/caresync-analytics/src/lib.rs
// ============================================================================
// Module: CareSync Analytics
// Description: Analytics query client and role-scoped id resolution.
// Purpose: Answer "which document ids can this caller list" via the engine.
// Dependencies: caresync-config, caresync-core, reqwest
// ============================================================================

//! ## Overview
//! Listing visibility is computed by the analytics engine, not in process:
//! the resolver binds the caller's scope into one of three parameterized
//! statements and returns bare ids in engine order. The [`QueryExecutor`]
//! trait is the seam tests substitute for the HTTP client.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod error;
pub mod queries;
pub mod resolver;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use client::AnalyticsClient;
pub use client::QueryExecutor;
pub use client::quote_param;
pub use client::quote_param_list;
pub use error::AnalyticsError;
pub use error::ResolveError;
pub use resolver::IdResolver;
