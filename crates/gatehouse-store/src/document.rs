//! The persisted invite document
//!
//! One versioned JSON document holds the whole invite list. The local
//! store writes it to disk, the remote store writes it into the admin's
//! account data; both perform every mutation as a full read-modify-write
//! of this document, and both share the mutation helpers below so their
//! semantics cannot drift apart.

use chrono::{DateTime, Utc};
use gatehouse_core::{Invite, InviteId, NewInvite, UserId};
use serde::{Deserialize, Serialize};

/// Current document schema version
pub const DOCUMENT_VERSION: u32 = 1;

/// Versioned invite document, the unit of persistence for both stores
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteDocument {
    /// Schema version, currently `1`
    pub version: u32,
    /// Time of the last mutation
    pub last_updated: DateTime<Utc>,
    /// All records, used and expired ones included
    pub invites: Vec<Invite>,
}

impl InviteDocument {
    /// A fresh empty document
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            last_updated: now,
            invites: Vec::new(),
        }
    }

    /// Whether a currently-valid invite exists for `principal`
    pub fn has_valid(&self, principal: &UserId, now: DateTime<Utc>) -> bool {
        self.invites
            .iter()
            .any(|invite| invite.is_for(principal) && invite.is_valid(now))
    }

    /// The currently-valid invite for `principal`, earliest-created first
    pub fn find_valid(&self, principal: &UserId, now: DateTime<Utc>) -> Option<&Invite> {
        self.invites
            .iter()
            .filter(|invite| invite.is_for(principal) && invite.is_valid(now))
            .min_by_key(|invite| invite.created_at)
    }

    /// Insert `candidate` unless a valid invite for its principal exists
    ///
    /// Returns the surviving record either way. Idempotent creation by
    /// invited principal.
    pub fn create(&mut self, candidate: NewInvite, now: DateTime<Utc>) -> (Invite, bool) {
        if let Some(existing) = self.find_valid(&candidate.invited_user_id, now) {
            return (existing.clone(), false);
        }
        let invite = candidate.into_invite(now);
        self.invites.push(invite.clone());
        self.last_updated = now;
        (invite, true)
    }

    /// Consume the earliest-created valid invite for `principal`
    pub fn mark_used(&mut self, principal: &UserId, now: DateTime<Utc>) -> bool {
        let target = self
            .invites
            .iter()
            .enumerate()
            .filter(|(_, invite)| invite.is_for(principal) && invite.is_valid(now))
            .min_by_key(|(_, invite)| invite.created_at)
            .map(|(index, _)| index);
        match target {
            Some(index) => {
                let marked = self.invites[index].mark_used(now);
                if marked {
                    self.last_updated = now;
                }
                marked
            }
            None => false,
        }
    }

    /// Records matching the list filter
    pub fn list(
        &self,
        include_used: bool,
        include_expired: bool,
        now: DateTime<Utc>,
    ) -> Vec<Invite> {
        self.invites
            .iter()
            .filter(|invite| include_used || !invite.used)
            .filter(|invite| include_expired || !invite.is_expired(now))
            .cloned()
            .collect()
    }

    /// Hard-delete by id; `false` if the id is unknown
    pub fn revoke(&mut self, id: &InviteId, now: DateTime<Utc>) -> bool {
        let before = self.invites.len();
        self.invites.retain(|invite| &invite.id != id);
        let removed = self.invites.len() != before;
        if removed {
            self.last_updated = now;
        }
        removed
    }

    /// Remove unused expired records; used records stay for audit
    pub fn cleanup_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.invites.len();
        self.invites
            .retain(|invite| invite.used || !invite.is_expired(now));
        let removed = before - self.invites.len();
        if removed > 0 {
            self.last_updated = now;
        }
        removed
    }

    /// Insert or replace a record keyed by id
    ///
    /// Reconciliation path: an incoming record always replaces the
    /// same-id record already present.
    pub fn upsert(&mut self, incoming: Invite, now: DateTime<Utc>) {
        match self
            .invites
            .iter_mut()
            .find(|invite| invite.id == incoming.id)
        {
            Some(existing) => *existing = incoming,
            None => self.invites.push(incoming),
        }
        self.last_updated = now;
    }
}
