//! The invite store seam
//!
//! Both store implementations satisfy this trait identically; the policy
//! engine and the admin surface only ever see the trait. Reads filter but
//! never mutate. `has_valid` deliberately returns a plain `bool`: a broken
//! store must fail closed without crashing the login path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::{Invite, InviteId, NewInvite, Result, UserId};

/// Filter options for [`InviteStore::list`]
///
/// Defaults exclude used and expired records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Include records that have already been consumed
    pub include_used: bool,
    /// Include records past their expiry
    pub include_expired: bool,
}

impl ListOptions {
    /// Include everything, used and expired records alike
    pub fn everything() -> Self {
        Self {
            include_used: true,
            include_expired: true,
        }
    }
}

/// Lifecycle operations over invitation records
#[async_trait]
pub trait InviteStore: Send + Sync {
    /// Create an invite, idempotently by invited principal
    ///
    /// If a currently-valid invite already exists for the candidate's
    /// principal (case-insensitive), that record is returned instead of a
    /// duplicate being created.
    async fn create(&self, candidate: NewInvite) -> Result<Invite>;

    /// Whether a currently-valid invite exists for `principal`
    ///
    /// Never errors: any storage failure degrades to `false`.
    async fn has_valid(&self, principal: &UserId) -> bool;

    /// Consume the earliest-created valid invite for `principal`
    ///
    /// Sets `used`/`used_at` together, exactly once. Returns `false` when
    /// no valid invite exists, including on repeat calls after a
    /// successful consumption.
    async fn mark_used(&self, principal: &UserId) -> Result<bool>;

    /// List records matching `options`
    async fn list(&self, options: ListOptions) -> Result<Vec<Invite>>;

    /// Hard-delete a record; `false` if the id is unknown
    async fn revoke(&self, id: &InviteId) -> Result<bool>;

    /// Remove unused records whose expiry is at or before `now`
    ///
    /// Used records are never removed (audit trail). Returns the number of
    /// records removed; idempotent.
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}
