//! Invitation entity
//!
//! An invite is a time-boxed authorization permitting one specific
//! out-of-realm principal to log in. Records move between the pre-auth
//! file store and the authenticated account-data store unchanged; the
//! serde names here are the persisted document's field names.

use crate::identifiers::{InviteId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored invitation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    /// Stable identity across stores
    pub id: InviteId,
    /// The principal this invite admits
    pub invited_user_id: UserId,
    /// The admin who issued the invite
    pub created_by: UserId,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Expiry; absent means the invite never expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the invite has been consumed
    pub used: bool,
    /// When the invite was consumed; set together with `used`, exactly once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
    /// Free-text admin note, no semantic meaning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Invite {
    /// Whether this invite currently admits its principal
    ///
    /// An invite is valid while it is unused and not past its expiry.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at.map_or(true, |expires| expires > now)
    }

    /// Whether this invite is past its expiry, regardless of `used`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }

    /// Whether this invite is addressed to `principal` (case-insensitive)
    pub fn is_for(&self, principal: &UserId) -> bool {
        self.invited_user_id.eq_ignore_case(principal)
    }

    /// Consume the invite
    ///
    /// Sets `used` and `used_at` together. Monotonic: once used, further
    /// calls change nothing and return `false`.
    pub fn mark_used(&mut self, now: DateTime<Utc>) -> bool {
        if self.used {
            return false;
        }
        self.used = true;
        self.used_at = Some(now);
        true
    }
}

/// Creation candidate for an invite
///
/// `id`, `created_at`, and the usage fields are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewInvite {
    /// The principal to admit
    pub invited_user_id: UserId,
    /// The admin issuing the invite
    pub created_by: UserId,
    /// Optional expiry
    pub expires_at: Option<DateTime<Utc>>,
    /// Optional free-text note
    pub notes: Option<String>,
}

impl NewInvite {
    /// Materialize the candidate into a fresh unused record
    pub fn into_invite(self, now: DateTime<Utc>) -> Invite {
        Invite {
            id: InviteId::generate(),
            invited_user_id: self.invited_user_id,
            created_by: self.created_by,
            created_at: now,
            expires_at: self.expires_at,
            used: false,
            used_at: None,
            notes: self.notes,
        }
    }
}
