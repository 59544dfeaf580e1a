//! In-memory account-data double
//!
//! Stands in for the external protocol client in tests and simulations.

use crate::account_data::AccountData;
use async_trait::async_trait;
use gatehouse_core::{GatehouseError, Result, UserId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory [`AccountData`] implementation
pub struct MemoryAccountData {
    principal: Option<UserId>,
    records: Mutex<HashMap<String, serde_json::Value>>,
    fail_writes: AtomicBool,
}

impl MemoryAccountData {
    /// An authenticated handle for `principal`
    pub fn authenticated(principal: UserId) -> Self {
        Self {
            principal: Some(principal),
            records: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// A handle with no session, for constructor-guard tests
    pub fn unauthenticated() -> Self {
        Self {
            principal: None,
            records: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail, simulating a network error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw record access for assertions
    pub fn record(&self, key: &str) -> Option<serde_json::Value> {
        self.records.lock().get(key).cloned()
    }

    /// Seed a raw record, e.g. a corrupt one
    pub fn put_record(&self, key: &str, value: serde_json::Value) {
        self.records.lock().insert(key.to_string(), value);
    }
}

#[async_trait]
impl AccountData for MemoryAccountData {
    async fn get_own_account_record(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.records.lock().get(key).cloned())
    }

    async fn set_own_account_record(&self, key: &str, value: serde_json::Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatehouseError::account_data("simulated write failure"));
        }
        self.records.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn current_principal_id(&self) -> Option<UserId> {
        self.principal.clone()
    }
}
