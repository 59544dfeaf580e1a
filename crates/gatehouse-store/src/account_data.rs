//! Account-data collaborator seam
//!
//! The external chat-protocol client exposes per-principal authenticated
//! key-value storage ("account data"). This trait is the narrow slice of
//! that client the remote store and the reconciler consume; the real
//! implementation lives with the protocol client, outside this workspace.

use async_trait::async_trait;
use gatehouse_core::{Result, UserId};

/// Authenticated per-account key-value storage
#[async_trait]
pub trait AccountData: Send + Sync {
    /// Read the record stored under `key` on the session's own account
    async fn get_own_account_record(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Write the record stored under `key` on the session's own account
    async fn set_own_account_record(&self, key: &str, value: serde_json::Value) -> Result<()>;

    /// The authenticated principal, or `None` when the session has lapsed
    fn current_principal_id(&self) -> Option<UserId>;
}
