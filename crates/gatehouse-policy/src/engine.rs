//! The access policy engine
//!
//! The gatekeeper the login/registration flow consults before calling
//! the protocol's authentication endpoint. Deny is a normal return
//! value, never an error; only store I/O failures travel through
//! `Result`, and those never reach the evaluate methods (`has_valid`
//! fails closed inside the store).

use crate::matcher::HomeserverMatcher;
use gatehouse_core::{AccessControlConfig, Result, UserId};
use gatehouse_store::InviteStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stable deny codes surfaced to the login flow
///
/// These two codes are the only discrimination a denied caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyCode {
    /// The principal's realm is not this deployment's realm
    Forbidden,
    /// An out-of-realm principal needs a currently-valid invite
    InviteRequired,
}

/// Allow/deny decision
///
/// Tagged so a reason and code exist exactly when the decision is a
/// denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    /// The attempt may proceed to authentication
    Allow,
    /// The attempt is rejected before authentication
    Deny {
        /// Stable machine-readable code
        code: DenyCode,
        /// Human-readable reason
        reason: String,
    },
}

impl Verdict {
    fn deny(code: DenyCode, reason: impl Into<String>) -> Self {
        Self::Deny {
            code,
            reason: reason.into(),
        }
    }

    /// Whether the attempt is allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The deny code, when denied
    pub fn code(&self) -> Option<DenyCode> {
        match self {
            Self::Allow => None,
            Self::Deny { code, .. } => Some(*code),
        }
    }
}

/// Pre-authentication allow/deny decisions for the login flow
///
/// Stateless beyond the injected configuration and invite store.
pub struct AccessPolicyEngine {
    config: AccessControlConfig,
    invites: Arc<dyn InviteStore>,
}

impl AccessPolicyEngine {
    /// Build an engine from the startup configuration and the store
    /// chosen for this execution context
    pub fn new(config: AccessControlConfig, invites: Arc<dyn InviteStore>) -> Self {
        Self { config, invites }
    }

    /// Decide whether a login attempt claiming `claimed_realm` may proceed
    pub fn evaluate_login(&self, claimed_realm: &str) -> Verdict {
        if self.config.public_mode() {
            return Verdict::Allow;
        }
        let Some(allowed) = self.config.allowed_realm() else {
            // Misconfiguration: nothing to compare against. The config
            // layer warned at startup; fail open rather than lock the
            // operator out.
            return Verdict::Allow;
        };
        if HomeserverMatcher::matches(claimed_realm, allowed) {
            Verdict::Allow
        } else {
            tracing::debug!(%claimed_realm, "login denied: external realm");
            Verdict::deny(DenyCode::Forbidden, "external realm")
        }
    }

    /// Decide whether `principal`'s embedded realm belongs here
    pub fn evaluate_user(&self, principal: &str) -> Verdict {
        if self.config.public_mode() {
            return Verdict::Allow;
        }
        let Ok(user) = UserId::parse(principal) else {
            return Verdict::deny(DenyCode::Forbidden, "malformed principal");
        };
        let Some(allowed) = self.config.allowed_realm() else {
            return Verdict::Allow;
        };
        if HomeserverMatcher::matches(user.realm(), allowed) {
            Verdict::Allow
        } else {
            Verdict::deny(DenyCode::Forbidden, "external realm")
        }
    }

    /// Decide a login attempt, letting a valid invite override an
    /// external-realm denial
    ///
    /// Same-realm principals never need an invite; at most one store read
    /// is performed, and only for the out-of-realm case.
    pub async fn evaluate_login_with_invite(
        &self,
        claimed_realm: &str,
        principal: Option<&str>,
    ) -> Verdict {
        let base = self.evaluate_login(claimed_realm);
        if base.is_allowed() {
            return base;
        }
        let Some(principal) = principal else {
            return base;
        };
        // invite_only is always on while private; checked anyway so a
        // future decoupling cannot widen access by accident
        if !self.config.invite_only() {
            return base;
        }
        let Ok(user) = UserId::parse(principal) else {
            return base;
        };
        if self.invites.has_valid(&user).await {
            tracing::debug!(%user, "external realm admitted by invite");
            return Verdict::Allow;
        }
        Verdict::deny(DenyCode::InviteRequired, "invitation required")
    }

    /// Mark the invite that admitted `principal` as used
    ///
    /// Called by the login flow after the external authentication
    /// succeeded. Idempotent-safe: once consumed, later calls return
    /// `Ok(false)`. A storage failure is surfaced for the caller to log;
    /// it must not fail the already-granted login.
    pub async fn consume(&self, principal: &UserId) -> Result<bool> {
        self.invites.mark_used(principal).await
    }
}
