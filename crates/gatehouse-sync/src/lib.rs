//! Gatehouse Sync
//!
//! Invites created through the authenticated admin surface live in
//! account data, which pre-authentication login checks cannot read. The
//! reconciler bridges the gap: whenever an authenticated admin session
//! becomes available, the login flow calls [`SyncReconciler::pull`] once
//! to refresh the file-backed store from account data.
//!
//! The merge is one-directional and last-writer-wins by record id: a
//! remote record always overwrites the same-id local record, records
//! only present locally (created through the pre-auth registration path)
//! are left untouched, and nothing is ever pushed back into account
//! data.

#![forbid(unsafe_code)]

use gatehouse_core::Result;
use gatehouse_store::{LocalInviteStore, RemoteInviteStore};

/// Outcome of a reconciliation pull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PullSummary {
    /// Records read from account data and applied locally
    pub pulled: usize,
}

/// Merges account-data invites into the pre-auth file store
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncReconciler;

impl SyncReconciler {
    /// Copy every remote record into the local store, keyed by id
    ///
    /// Used and expired records are pulled too: the local store is also
    /// the audit trail the cleanup sweep and admin listings read before
    /// a session exists. Remote is the source of truth on collision.
    pub async fn pull(remote: &RemoteInviteStore, local: &LocalInviteStore) -> Result<PullSummary> {
        let records = remote.snapshot().await?;
        let pulled = records.len();
        for invite in records {
            local.upsert(invite)?;
        }
        tracing::info!(pulled, "reconciled account-data invites into local store");
        Ok(PullSummary { pulled })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::{NewInvite, UserId};
    use gatehouse_store::testing::MemoryAccountData;
    use gatehouse_store::InviteStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn principal(raw: &str) -> UserId {
        UserId::parse(raw).unwrap()
    }

    fn candidate(invited: &str) -> NewInvite {
        NewInvite {
            invited_user_id: principal(invited),
            created_by: principal("@admin:chat.example.com"),
            expires_at: None,
            notes: None,
        }
    }

    fn stores(dir: &TempDir) -> (RemoteInviteStore, LocalInviteStore) {
        let session = Arc::new(MemoryAccountData::authenticated(principal(
            "@admin:chat.example.com",
        )));
        let remote = RemoteInviteStore::new(session).unwrap();
        let local = LocalInviteStore::at_path(dir.path().join("invites.json"));
        (remote, local)
    }

    #[tokio::test]
    async fn pull_makes_admin_invites_visible_pre_auth() {
        let dir = TempDir::new().unwrap();
        let (remote, local) = stores(&dir);
        let bob = principal("@bob:evil.org");

        remote.create(candidate("@bob:evil.org")).await.unwrap();
        assert!(!local.has_valid(&bob).await);

        let summary = SyncReconciler::pull(&remote, &local).await.unwrap();
        assert_eq!(summary.pulled, 1);
        assert!(local.has_valid(&bob).await);
    }

    #[tokio::test]
    async fn remote_wins_on_id_collision() {
        let dir = TempDir::new().unwrap();
        let (remote, local) = stores(&dir);
        let bob = principal("@bob:evil.org");

        remote.create(candidate("@bob:evil.org")).await.unwrap();
        SyncReconciler::pull(&remote, &local).await.unwrap();

        // the invite gets consumed remotely; a second pull must carry
        // the used flag over the stale local copy
        remote.mark_used(&bob).await.unwrap();
        assert!(local.has_valid(&bob).await);
        SyncReconciler::pull(&remote, &local).await.unwrap();
        assert!(!local.has_valid(&bob).await);
    }

    #[tokio::test]
    async fn local_only_records_survive_the_pull() {
        let dir = TempDir::new().unwrap();
        let (remote, local) = stores(&dir);

        local.create(candidate("@carol:other.org")).await.unwrap();
        remote.create(candidate("@bob:evil.org")).await.unwrap();

        SyncReconciler::pull(&remote, &local).await.unwrap();
        assert!(local.has_valid(&principal("@carol:other.org")).await);
        assert!(local.has_valid(&principal("@bob:evil.org")).await);
        assert_eq!(local.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn pull_never_pushes_back() {
        let dir = TempDir::new().unwrap();
        let (remote, local) = stores(&dir);

        local.create(candidate("@carol:other.org")).await.unwrap();
        SyncReconciler::pull(&remote, &local).await.unwrap();
        assert!(remote.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pull_twice_is_stable() {
        let dir = TempDir::new().unwrap();
        let (remote, local) = stores(&dir);

        remote.create(candidate("@bob:evil.org")).await.unwrap();
        SyncReconciler::pull(&remote, &local).await.unwrap();
        let summary = SyncReconciler::pull(&remote, &local).await.unwrap();
        assert_eq!(summary.pulled, 1);
        assert_eq!(local.snapshot().len(), 1);
    }
}
