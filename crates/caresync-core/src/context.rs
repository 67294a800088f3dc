// crates/caresync-core/src/context.rs
// ============================================================================
// Module: Caller Context
// Description: Resolved role and ownership scope for one request.
// Purpose: Carry validated scope attributes into every permission decision.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`CallerContext`] is built once per authenticated request from the
//! caller's sync-admin profile and discarded at request end. The constructor
//! enforces the scope invariants so the evaluators never see a context whose
//! shape disagrees with its role.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::outcome::AuthOutcome;
use crate::role::Role;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Caller-context construction failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// Role requires an account id that was not supplied.
    #[error("role {0} requires an account id")]
    MissingAccountId(Role),
    /// Role must not carry an account id.
    #[error("role {0} must not carry an account id")]
    UnexpectedAccountId(Role),
    /// Only facility administrators may carry facility ids.
    #[error("role {0} must not carry facility ids")]
    UnexpectedFacilityIds(Role),
    /// Outcome was not authorized or carried no recognized role.
    #[error("outcome is not authorized with a recognized role")]
    Unauthorized,
}

// ============================================================================
// SECTION: Caller Context
// ============================================================================

/// Resolved role plus ownership scope for one authenticated request.
///
/// # Invariants
/// - `account_id` is present iff role is `AccountAdmin` or `FacilityAdmin`.
/// - `facility_ids` is non-empty only for `FacilityAdmin`.
/// - Immutable after construction; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Parsed caller role.
    role: Role,
    /// Scoping account id for account- and facility-scoped roles.
    account_id: Option<String>,
    /// Scoping facility ids for facility administrators.
    facility_ids: Vec<String>,
}

impl CallerContext {
    /// Builds a context, enforcing the role/scope invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when the scope shape disagrees with the role.
    pub fn new(
        role: Role,
        account_id: Option<String>,
        facility_ids: Vec<String>,
    ) -> Result<Self, ContextError> {
        match role {
            Role::AccountAdmin | Role::FacilityAdmin => {
                if account_id.is_none() {
                    return Err(ContextError::MissingAccountId(role));
                }
            }
            Role::PlatformAdmin | Role::PlatformContentAdmin | Role::FacilityUser => {
                if account_id.is_some() {
                    return Err(ContextError::UnexpectedAccountId(role));
                }
            }
        }
        if role != Role::FacilityAdmin && !facility_ids.is_empty() {
            return Err(ContextError::UnexpectedFacilityIds(role));
        }
        Ok(Self {
            role,
            account_id,
            facility_ids,
        })
    }

    /// Builds a context from an authorized authentication outcome.
    ///
    /// Scope fields absent from the outcome default to empty, matching the
    /// profile-loading defaults; an empty account id is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Unauthorized`] when the outcome is not
    /// authorized or its role string is unrecognized, and propagates shape
    /// errors from [`CallerContext::new`].
    pub fn from_outcome(outcome: &AuthOutcome) -> Result<Self, ContextError> {
        if !outcome.is_authorized {
            return Err(ContextError::Unauthorized);
        }
        let role = outcome
            .role
            .as_deref()
            .and_then(Role::parse)
            .ok_or(ContextError::Unauthorized)?;
        let account_id = outcome.account_id.clone().filter(|id| !id.is_empty());
        Self::new(role, account_id, outcome.facility_ids.clone().unwrap_or_default())
    }

    /// Returns the caller role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the scoping account id, when the role carries one.
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Returns the scoping facility ids (empty unless FacilityAdmin).
    #[must_use]
    pub fn facility_ids(&self) -> &[String] {
        &self.facility_ids
    }
}
