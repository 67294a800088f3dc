// crates/caresync-core/src/role/tests.rs
// ============================================================================
// Module: Role Tests
// Description: Unit tests for role parsing and wire-string stability.
// Purpose: Validate parse/as_str round-trips and unknown-role rejection.
// Dependencies: caresync-core
// ============================================================================

//! ## Overview
//! Validates the closed role set round-trips its wire strings and that
//! unrecognized role strings stay unparsed.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::Role;

// ============================================================================
// SECTION: Parsing Tests
// ============================================================================

#[test]
fn parse_round_trips_every_role() {
    for role in [
        Role::PlatformAdmin,
        Role::PlatformContentAdmin,
        Role::AccountAdmin,
        Role::FacilityAdmin,
        Role::FacilityUser,
    ] {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
}

#[test]
fn parse_rejects_unknown_strings() {
    assert_eq!(Role::parse(""), None);
    assert_eq!(Role::parse("admin"), None);
    assert_eq!(Role::parse("IN2L-ADMIN"), None);
    assert_eq!(Role::parse("facility-admin "), None);
}

#[test]
fn portal_roles_exclude_facility_user() {
    assert!(!Role::PORTAL_ROLES.contains(&Role::FacilityUser));
    assert_eq!(Role::PORTAL_ROLES.len(), 4);
}

#[test]
fn serde_uses_wire_strings() {
    let json = serde_json::to_string(&Role::AccountAdmin).unwrap();
    assert_eq!(json, "\"account-admin\"");
    let parsed: Role = serde_json::from_str("\"in2l\"").unwrap();
    assert_eq!(parsed, Role::PlatformContentAdmin);
    assert!(serde_json::from_str::<Role>("\"resident\"").is_err());
}
