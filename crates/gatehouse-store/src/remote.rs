//! Account-data-backed invite store
//!
//! The authenticated store: invite records created through the admin
//! surface live in a single versioned account-data record on the admin's
//! own account, durable only while a session exists. The document shape
//! and mutation semantics are shared with the file-backed store through
//! [`InviteDocument`], so the two cannot drift apart.
//!
//! Every mutation reads the full record, mutates the in-memory list, and
//! writes the record back. An async lock serializes those cycles within
//! this process; concurrent admins on other devices remain a documented
//! last-writer-wins race at whole-record granularity.

use crate::account_data::AccountData;
use crate::document::InviteDocument;
use crate::store::{InviteStore, ListOptions};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::{
    system_clock, GatehouseError, Invite, InviteId, NewInvite, Result, SharedClock, UserId,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Account-data key holding the invite document
pub const INVITES_ACCOUNT_DATA_KEY: &str = "org.gatehouse.invites";

/// Durable-while-authenticated invite store
pub struct RemoteInviteStore {
    session: Arc<dyn AccountData>,
    clock: SharedClock,
    // Serializes read-modify-write cycles across await points.
    write_lock: Mutex<()>,
}

impl RemoteInviteStore {
    /// Wrap an authenticated session handle
    ///
    /// Fails when the handle has no authenticated principal; the remote
    /// store cannot exist outside a session.
    pub fn new(session: Arc<dyn AccountData>) -> Result<Self> {
        if session.current_principal_id().is_none() {
            return Err(GatehouseError::permission_denied(
                "remote invite store requires an authenticated session",
            ));
        }
        Ok(Self {
            session,
            clock: system_clock(),
            write_lock: Mutex::new(()),
        })
    }

    /// Replace the wall clock, for tests
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// All records, unfiltered. Reconciliation reads through this.
    pub async fn snapshot(&self) -> Result<Vec<Invite>> {
        Ok(self.load().await?.invites)
    }

    // Absent record is an empty store; a corrupt record is surfaced as a
    // warning and treated as empty, same posture as the file store.
    async fn load(&self) -> Result<InviteDocument> {
        let value = self
            .session
            .get_own_account_record(INVITES_ACCOUNT_DATA_KEY)
            .await?;
        let Some(value) = value else {
            return Ok(InviteDocument::empty(self.clock.now()));
        };
        match serde_json::from_value(value) {
            Ok(doc) => Ok(doc),
            Err(err) => {
                tracing::warn!(%err, "invite account record corrupt, treating as empty");
                Ok(InviteDocument::empty(self.clock.now()))
            }
        }
    }

    async fn save(&self, doc: &InviteDocument) -> Result<()> {
        let value = serde_json::to_value(doc)?;
        self.session
            .set_own_account_record(INVITES_ACCOUNT_DATA_KEY, value)
            .await
    }
}

#[async_trait]
impl InviteStore for RemoteInviteStore {
    async fn create(&self, candidate: NewInvite) -> Result<Invite> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();
        let mut doc = self.load().await?;
        let (invite, created) = doc.create(candidate, now);
        if created {
            self.save(&doc).await?;
            tracing::debug!(id = %invite.id, principal = %invite.invited_user_id, "invite created in account data");
        }
        Ok(invite)
    }

    async fn has_valid(&self, principal: &UserId) -> bool {
        match self.load().await {
            Ok(doc) => doc.has_valid(principal, self.clock.now()),
            Err(err) => {
                tracing::debug!(%err, "account data unavailable, failing closed");
                false
            }
        }
    }

    async fn mark_used(&self, principal: &UserId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();
        let mut doc = self.load().await?;
        if !doc.mark_used(principal, now) {
            return Ok(false);
        }
        self.save(&doc).await?;
        Ok(true)
    }

    async fn list(&self, options: ListOptions) -> Result<Vec<Invite>> {
        let now = self.clock.now();
        Ok(self
            .load()
            .await?
            .list(options.include_used, options.include_expired, now))
    }

    async fn revoke(&self, id: &InviteId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();
        let mut doc = self.load().await?;
        if !doc.revoke(id, now) {
            return Ok(false);
        }
        self.save(&doc).await?;
        Ok(true)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let removed = doc.cleanup_expired(now);
        if removed > 0 {
            self.save(&doc).await?;
        }
        Ok(removed)
    }
}
