//! Gatehouse Access Policy
//!
//! The decision function consumed by the login/registration flow: given
//! the startup configuration and an invite store, produce an allow/deny
//! verdict for every login attempt before authentication happens, and
//! consume the admitting invite after it succeeds.
//!
//! # Architecture
//!
//! - `matcher` - Realm identifier normalization and comparison
//! - `engine` - `AccessPolicyEngine` and the `Verdict` type
//!
//! # Design Principles
//!
//! - Deny is a value with a stable code, never an error
//! - The engine holds no state beyond its injected collaborators
//! - At most one store read per evaluation

#![forbid(unsafe_code)]

/// Realm identifier matching
pub mod matcher;

/// Allow/deny decisions
pub mod engine;

pub use engine::{AccessPolicyEngine, DenyCode, Verdict};
pub use matcher::HomeserverMatcher;
