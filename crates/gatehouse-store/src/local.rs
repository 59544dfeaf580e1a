//! File-backed invite store
//!
//! The pre-authentication store: the login path consults it before any
//! session exists, so it must come up from nothing but a path. The whole
//! invite list lives in one JSON document; every mutation is a full
//! read-modify-write under an in-process lock, and the document is
//! replaced by atomic rename so a concurrent reader never observes a
//! truncated file.
//!
//! A missing or corrupt file is an empty store, never a fatal error: a
//! broken pre-auth check fails closed (`has_valid` → `false`) but must
//! not crash the login path. Writers in other processes are not locked
//! out; the read-modify-write race across processes is an accepted,
//! documented risk.

use crate::document::InviteDocument;
use crate::store::{InviteStore, ListOptions};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::{
    system_clock, AccessControlConfig, GatehouseError, Invite, InviteId, NewInvite, Result,
    SharedClock, UserId,
};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

const INVITES_FILE: &str = "invites.json";

/// Durable, pre-authentication-readable invite store
pub struct LocalInviteStore {
    path: PathBuf,
    clock: SharedClock,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalInviteStore {
    /// Open the store under the configured data directory
    pub fn new(config: &AccessControlConfig) -> Self {
        Self::at_path(config.data_dir().join(INVITES_FILE))
    }

    /// Open the store at an explicit file path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: system_clock(),
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the wall clock, for tests
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, unfiltered. Reconciliation reads through this.
    pub fn snapshot(&self) -> Vec<Invite> {
        self.load().invites
    }

    /// Insert or replace a record keyed by id
    ///
    /// Reserved for the sync reconciler; the admin and login paths go
    /// through [`InviteStore`].
    pub fn upsert(&self, invite: Invite) -> Result<()> {
        let _guard = self.write_lock.lock();
        let now = self.clock.now();
        let mut doc = self.load();
        doc.upsert(invite, now);
        self.save(&doc)
    }

    // Lenient load: the read path degrades to an empty document rather
    // than failing, so pre-auth checks fail closed instead of crashing.
    fn load(&self) -> InviteDocument {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return InviteDocument::empty(self.clock.now());
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "invite file unreadable, treating as empty");
                return InviteDocument::empty(self.clock.now());
            }
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "invite file corrupt, treating as empty");
                InviteDocument::empty(self.clock.now())
            }
        }
    }

    // Write to a sibling temp file, then rename over the target.
    fn save(&self, doc: &InviteDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| GatehouseError::storage(format!("create {}: {err}", parent.display())))?;
        }
        let raw = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)
            .map_err(|err| GatehouseError::storage(format!("write {}: {err}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|err| GatehouseError::storage(format!("rename {}: {err}", self.path.display())))?;
        Ok(())
    }
}

#[async_trait]
impl InviteStore for LocalInviteStore {
    async fn create(&self, candidate: NewInvite) -> Result<Invite> {
        let _guard = self.write_lock.lock();
        let now = self.clock.now();
        let mut doc = self.load();
        let (invite, created) = doc.create(candidate, now);
        if created {
            self.save(&doc)?;
            tracing::debug!(id = %invite.id, principal = %invite.invited_user_id, "invite created");
        }
        Ok(invite)
    }

    async fn has_valid(&self, principal: &UserId) -> bool {
        self.load().has_valid(principal, self.clock.now())
    }

    async fn mark_used(&self, principal: &UserId) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let now = self.clock.now();
        let mut doc = self.load();
        if !doc.mark_used(principal, now) {
            return Ok(false);
        }
        self.save(&doc)?;
        tracing::debug!(%principal, "invite consumed");
        Ok(true)
    }

    async fn list(&self, options: ListOptions) -> Result<Vec<Invite>> {
        let now = self.clock.now();
        Ok(self
            .load()
            .list(options.include_used, options.include_expired, now))
    }

    async fn revoke(&self, id: &InviteId) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let now = self.clock.now();
        let mut doc = self.load();
        if !doc.revoke(id, now) {
            return Ok(false);
        }
        self.save(&doc)?;
        Ok(true)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let _guard = self.write_lock.lock();
        let mut doc = self.load();
        let removed = doc.cleanup_expired(now);
        if removed > 0 {
            self.save(&doc)?;
        }
        Ok(removed)
    }
}
