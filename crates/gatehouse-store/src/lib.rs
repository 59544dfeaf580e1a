//! Gatehouse Invite Stores
//!
//! Two durable homes for invitation records, behind one seam:
//! - [`LocalInviteStore`] - file-backed, readable before authentication
//! - [`RemoteInviteStore`] - account-data-backed, requires a session
//!
//! # Architecture
//!
//! Both stores persist the same versioned [`InviteDocument`] and share
//! its mutation helpers, so create/consume/cleanup semantics are
//! identical on both sides. The concrete store is constructed once at
//! process start and passed by handle into the policy engine; business
//! logic never branches on execution context.
//!
//! # Design Principles
//!
//! - Full read-modify-write per mutation, at document granularity
//! - Reads filter but never mutate
//! - Pre-auth reads fail closed on broken storage instead of crashing

#![forbid(unsafe_code)]

/// Account-data collaborator seam
pub mod account_data;

/// The shared persisted document
pub mod document;

/// File-backed store
pub mod local;

/// Account-data-backed store
pub mod remote;

/// The invite store trait
pub mod store;

/// In-memory account-data double for tests
pub mod testing;

pub use account_data::AccountData;
pub use document::{InviteDocument, DOCUMENT_VERSION};
pub use local::LocalInviteStore;
pub use remote::{RemoteInviteStore, INVITES_ACCOUNT_DATA_KEY};
pub use store::{InviteStore, ListOptions};
