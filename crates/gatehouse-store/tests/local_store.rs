use chrono::{Duration, Utc};
use gatehouse_core::{FixedClock, NewInvite, UserId};
use gatehouse_store::{InviteStore, ListOptions, LocalInviteStore};
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

fn store_in(dir: &TempDir) -> LocalInviteStore {
    LocalInviteStore::at_path(dir.path().join("invites.json"))
}

#[tokio::test]
async fn create_then_has_valid_then_consume() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let bob = principal("@bob:evil.org");

    assert!(!store.has_valid(&bob).await);

    let invite = store.create(candidate("@bob:evil.org")).await.unwrap();
    assert!(!invite.used);
    assert!(store.has_valid(&bob).await);

    assert!(store.mark_used(&bob).await.unwrap());
    assert!(!store.has_valid(&bob).await);

    // second consumption is a no-op, not an error
    assert!(!store.mark_used(&bob).await.unwrap());
}

#[tokio::test]
async fn create_is_idempotent_while_valid() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let first = store.create(candidate("@bob:evil.org")).await.unwrap();
    let second = store.create(candidate("@bob:evil.org")).await.unwrap();
    assert_eq!(first.id, second.id);

    let all = store.list(ListOptions::everything()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let bob = principal("@bob:evil.org");
    {
        let store = store_in(&dir);
        store.create(candidate("@bob:evil.org")).await.unwrap();
    }
    let reopened = store_in(&dir);
    assert!(reopened.has_valid(&bob).await);
}

#[tokio::test]
async fn missing_and_corrupt_files_are_empty_stores() {
    let dir = TempDir::new().unwrap();
    let bob = principal("@bob:evil.org");

    // missing file
    let store = store_in(&dir);
    assert!(!store.has_valid(&bob).await);
    assert!(store.list(ListOptions::default()).await.unwrap().is_empty());

    // corrupt file
    std::fs::write(dir.path().join("invites.json"), "{definitely not json").unwrap();
    let store = store_in(&dir);
    assert!(!store.has_valid(&bob).await);
    assert!(!store.mark_used(&bob).await.unwrap());

    // and a write through the empty view replaces the corrupt document
    store.create(candidate("@bob:evil.org")).await.unwrap();
    assert!(store.has_valid(&bob).await);
}

#[tokio::test]
async fn expired_invite_is_invisible_but_not_removed_by_reads() {
    let dir = TempDir::new().unwrap();
    let now = Utc::now();
    let store = store_in(&dir).with_clock(Arc::new(FixedClock(now)));

    let mut expired = candidate("@late:evil.org");
    expired.expires_at = Some(now - Duration::seconds(1));
    store.create(expired).await.unwrap();

    assert!(!store.has_valid(&principal("@late:evil.org")).await);
    assert!(store.list(ListOptions::default()).await.unwrap().is_empty());

    // the record is still on disk until the cleanup sweep runs
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.cleanup_expired(now).await.unwrap(), 1);
    assert_eq!(store.cleanup_expired(now).await.unwrap(), 0);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn cleanup_keeps_used_records_for_audit() {
    let dir = TempDir::new().unwrap();
    let now = Utc::now();
    let store = store_in(&dir).with_clock(Arc::new(FixedClock(now)));

    let mut consumed = candidate("@bob:evil.org");
    consumed.expires_at = Some(now + Duration::hours(1));
    store.create(consumed).await.unwrap();
    store.mark_used(&principal("@bob:evil.org")).await.unwrap();

    // long past expiry, the used record still survives the sweep
    assert_eq!(
        store.cleanup_expired(now + Duration::days(30)).await.unwrap(),
        0
    );
    let all = store.list(ListOptions::everything()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].used);
}

#[tokio::test]
async fn revoke_deletes_hard() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let invite = store.create(candidate("@bob:evil.org")).await.unwrap();
    assert!(store.revoke(&invite.id).await.unwrap());
    assert!(!store.revoke(&invite.id).await.unwrap());
    assert!(!store.has_valid(&principal("@bob:evil.org")).await);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn list_filters_default_and_expanded() {
    let dir = TempDir::new().unwrap();
    let now = Utc::now();
    let store = store_in(&dir).with_clock(Arc::new(FixedClock(now)));

    store.create(candidate("@live:a.org")).await.unwrap();
    let mut stale = candidate("@stale:b.org");
    stale.expires_at = Some(now - Duration::hours(1));
    store.create(stale).await.unwrap();
    store.create(candidate("@done:c.org")).await.unwrap();
    store.mark_used(&principal("@done:c.org")).await.unwrap();

    assert_eq!(store.list(ListOptions::default()).await.unwrap().len(), 1);
    let with_used = store
        .list(ListOptions {
            include_used: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(with_used.len(), 2);
    assert_eq!(store.list(ListOptions::everything()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn new_places_the_file_under_the_configured_data_dir() {
    let dir = TempDir::new().unwrap();
    let config = gatehouse_core::AccessControlConfig::new(
        true,
        Some("https://chat.example.com".to_string()),
        dir.path().to_path_buf(),
    );
    let store = LocalInviteStore::new(&config);
    assert_eq!(store.path(), dir.path().join("invites.json"));

    store.create(candidate("@bob:evil.org")).await.unwrap();
    assert!(dir.path().join("invites.json").exists());
}

#[tokio::test]
async fn document_on_disk_is_versioned() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.create(candidate("@bob:evil.org")).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("invites.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["version"], 1);
    assert!(doc["lastUpdated"].is_string());
    assert_eq!(doc["invites"].as_array().unwrap().len(), 1);
    assert_eq!(doc["invites"][0]["invitedUserId"], "@bob:evil.org");
    // no stray temp file left behind
    assert!(!dir.path().join("invites.json.tmp").exists());
}
