// crates/caresync-analytics/src/queries.rs
// ============================================================================
// Module: Query Templates
// Description: Parameterized analytics statements for id resolution.
// Purpose: Keep the role-scoped statements in one reviewable place.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Three statements, one per visibility scope. All bind `$DOC_TYPE` with a
//! `like` pattern so a bare namespace resolves with a `%` wildcard; the
//! scoped variants additionally bind `$ACCOUNT_ID` and `$FACILITY_IDS`.
//! Statements are trimmed before they go on the wire.

/// Global scope: every id of the matching doc type.
pub const ID_BY_DOC_TYPE: &str =
    "select value meta().id from account_data where doc_type like $DOC_TYPE";

/// Account scope: the account's own doc plus docs owned by the account.
pub const ID_BY_DOC_TYPE_ACCOUNT: &str = r"
    select value meta().id from account_data
    where doc_type like $DOC_TYPE
    and (meta().id = $ACCOUNT_ID or account_id = $ACCOUNT_ID)";

/// Facility scope: the account doc plus docs that are, or belong to, one of
/// the caller's facilities.
pub const ID_BY_DOC_TYPE_ACCOUNT_FACILITIES: &str = r"
    select value meta().id from account_data
    where doc_type like $DOC_TYPE
    and (
      meta().id = $ACCOUNT_ID
      or array_contains($FACILITY_IDS, meta().id)
      or array_contains($FACILITY_IDS, facility_id)
    )";
